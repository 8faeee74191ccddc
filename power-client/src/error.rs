#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("timestamp formatting failed: {0}")]
    Format(#[from] time::error::Format),
    #[error("malformed stored timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: time::error::Parse,
    },
}
