use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("No categories available")]
    NoCategories,

    #[error(transparent)]
    Fetch(#[from] hqdeals_fetch::FetchError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
