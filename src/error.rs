use crate::types::RoomId;
use thiserror::Error;

/// Domain errors surfaced to clients.
///
/// None of these are fatal: handlers either ignore the request or report the
/// error back to the requesting connection only. Other rooms are never
/// affected.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("room {0} already exists")]
    RoomExists(RoomId),

    #[error("word list {0:?} is missing or empty")]
    ListUnavailable(String),

    #[error("word list {list:?} entry {entry:?} is not a \"word,word\" pair")]
    MalformedPair { list: String, entry: String },

    #[error("spy count must be between 1 and {max}, got {got}")]
    BadSpyCount { got: usize, max: usize },
}
