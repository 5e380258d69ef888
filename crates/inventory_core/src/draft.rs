//! Unsaved edit state behind the name/quantity inputs.

use shared::domain::{Item, ItemId};

/// Whether submitting the draft creates a new item or rewrites an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DraftMode {
    #[default]
    Create,
    Update(ItemId),
}

/// Why a draft was refused before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyName,
    InvalidQuantity,
}

/// A draft that passed validation, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub mode: DraftMode,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    name: String,
    quantity: String,
    mode: DraftMode,
}

impl Draft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn mode(&self) -> DraftMode {
        self.mode
    }

    pub fn editing_id(&self) -> Option<ItemId> {
        match self.mode {
            DraftMode::Create => None,
            DraftMode::Update(id) => Some(id),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_quantity(&mut self, quantity: impl Into<String>) {
        self.quantity = quantity.into();
    }

    /// Label for the submit control.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            DraftMode::Create => "Save Item",
            DraftMode::Update(_) => "Update Item",
        }
    }

    pub(crate) fn load_item(&mut self, item: &Item) {
        self.name = item.name.clone();
        self.quantity = item.quantity.to_string();
        self.mode = DraftMode::Update(item.id);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Trims the name and parses the quantity as a base-10 integer.
    pub fn validate(&self) -> Result<Submission, ValidationIssue> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationIssue::EmptyName);
        }
        let quantity = self
            .quantity
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationIssue::InvalidQuantity)?;

        Ok(Submission {
            mode: self.mode,
            name: name.to_string(),
            quantity,
        })
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
