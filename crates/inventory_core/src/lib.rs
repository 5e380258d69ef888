//! List controller: the in-memory item list, its sort order and the edit draft,
//! orchestrating calls against an [`ItemStore`].

use shared::domain::{Item, ItemId, SortOption};
use storage::{ItemStore, StoreError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub mod draft;
pub mod sort;

pub use draft::{Draft, DraftMode, Submission, ValidationIssue};
pub use sort::{sort_items, sort_items_by_key};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to load items: {0}")]
    Load(#[source] StoreError),
    #[error("failed to save item: {0}")]
    Save(#[source] StoreError),
    #[error("failed to delete item {id}: {source}")]
    Delete {
        id: ItemId,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(ItemId),
    Updated(ItemId),
    /// Nothing was sent to the store and the draft is unchanged.
    Rejected(ValidationIssue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Blocking accept/cancel choice shown before an item is deleted.
pub trait DeletePrompt {
    fn confirm_delete(&self, id: ItemId) -> bool;
}

impl<F> DeletePrompt for F
where
    F: Fn(ItemId) -> bool,
{
    fn confirm_delete(&self, id: ItemId) -> bool {
        self(id)
    }
}

pub struct ListController<S: ItemStore> {
    store: S,
    items: Vec<Item>,
    sort: SortOption,
    draft: Draft,
}

impl<S: ItemStore> ListController<S> {
    pub fn new(store: S) -> Self {
        Self::with_sort(store, SortOption::default())
    }

    pub fn with_sort(store: S, sort: SortOption) -> Self {
        Self {
            store,
            items: Vec::new(),
            sort,
            draft: Draft::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The full item set, in the active sort order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Replaces the list with a freshly fetched and sorted copy of the store.
    /// On failure the current list is kept as is.
    pub async fn load_items(&mut self) -> Result<(), ControllerError> {
        match self.store.fetch_items().await {
            Ok(fetched) => {
                self.items = sort_items(&fetched, self.sort);
                debug!(count = self.items.len(), sort = %self.sort, "loaded items");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to load items");
                Err(ControllerError::Load(err))
            }
        }
    }

    pub fn handle_sort_change(&mut self, option: Option<SortOption>) {
        let Some(option) = option else {
            return;
        };
        self.sort = option;
        self.items = sort_items(&self.items, option);
    }

    /// Submits the draft: creates in create mode, updates in update mode.
    pub async fn save_or_update(&mut self) -> Result<SaveOutcome, ControllerError> {
        let submission = match self.draft.validate() {
            Ok(submission) => submission,
            Err(issue) => {
                debug!(?issue, "draft rejected");
                return Ok(SaveOutcome::Rejected(issue));
            }
        };

        let written = match submission.mode {
            DraftMode::Create => self
                .store
                .insert_item(&submission.name, submission.quantity)
                .await
                .map(SaveOutcome::Created),
            DraftMode::Update(id) => self
                .store
                .update_item(id, &submission.name, submission.quantity)
                .await
                .map(|()| SaveOutcome::Updated(id)),
        };

        let outcome = match written {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, mode = ?submission.mode, "failed to save item");
                return Err(ControllerError::Save(err));
            }
        };

        info!(?outcome, name = %submission.name, quantity = submission.quantity, "saved item");
        self.reload_after_write().await;
        self.draft.reset();
        Ok(outcome)
    }

    /// Switches the draft to update mode for `item`.
    pub fn start_edit(&mut self, item: &Item) {
        self.draft.load_item(item);
    }

    pub fn cancel_edit(&mut self) {
        self.draft.reset();
    }

    pub async fn confirm_delete(
        &mut self,
        id: ItemId,
        prompt: &impl DeletePrompt,
    ) -> Result<DeleteOutcome, ControllerError> {
        if !prompt.confirm_delete(id) {
            debug!(item_id = id.0, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(err) = self.store.delete_item(id).await {
            error!(error = %err, item_id = id.0, "failed to delete item");
            return Err(ControllerError::Delete { id, source: err });
        }

        info!(item_id = id.0, "deleted item");
        self.reload_after_write().await;
        if self.draft.editing_id() == Some(id) {
            self.draft.reset();
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.load_items().await {
            warn!(error = %err, "write succeeded but the item list could not be refreshed");
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
