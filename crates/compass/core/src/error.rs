use thiserror::Error;

/// Errors raised while turning user or file input into a [`crate::CategoryId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("category identifier is empty")]
    Empty,

    #[error("category identifier {input:?} contains invalid character {found:?}")]
    InvalidCharacter { input: String, found: char },
}
