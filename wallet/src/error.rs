use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("wallet file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("wallet file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("wallet private key is malformed: {0}")]
    BadPrivateKey(String),

    #[error(transparent)]
    Core(#[from] obscura_core::Error),

    #[error("no contact named {0:?}")]
    UnknownContact(String),
}

pub type Result<T> = std::result::Result<T, Error>;
