//! 库存操作错误。

use vss_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),
    #[error("duplicate value for {0}")]
    DuplicateKey(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("nvr {0} has no free channel")]
    CapacityExceeded(String),
    #[error("invalid import file: {0}")]
    InvalidFormat(String),
    #[error("no cameras imported")]
    EmptyImport,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for InventoryError {
    fn from(err: StorageError) -> Self {
        match err.duplicate_field() {
            Some(field) => InventoryError::DuplicateKey(field.to_string()),
            None => InventoryError::Storage(err.to_string()),
        }
    }
}
