use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmarkError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bookmark not found: uid {uid}")]
    NotFound { uid: i64 },

    #[error("Migration failed: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, BookmarkError>;
