use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort option '{key}' (expected one of name-asc, name-desc, quantity-asc, quantity-desc)")]
pub struct ParseSortOptionError {
    pub key: String,
}

impl ParseSortOptionError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
