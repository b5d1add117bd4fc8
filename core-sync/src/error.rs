use core_bookmarks::BookmarkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Store error: {0}")]
    Store(#[from] BookmarkError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
