use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record with id {0}")]
    NotFound(i64),

    #[error("no verified record with id {0} to consume")]
    NotConsumable(i64),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Label(#[from] fraudlens_core::LabelError),

    #[error("bad timestamp in record: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("store lock poisoned")]
    Poisoned,
}
