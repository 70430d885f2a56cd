pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Element not found")]
    ElementNotFound,

    #[error("Duplicate node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("Invalid tree input: {message}")]
    InvalidTree { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_tree(message: impl Into<String>) -> Self {
        Self::InvalidTree {
            message: message.into(),
        }
    }
}
