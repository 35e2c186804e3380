use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    /// A unique index rejected the write.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Stored JSON does not deserialize into the expected record type.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}
