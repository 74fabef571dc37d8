use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("room {0} is full")]
    RoomFull(String),
    #[error("already in room {0}")]
    AlreadyInRoom(String),
    #[error("not in a room")]
    NotInRoom,
    #[error("transport closed")]
    TransportClosed,
    #[error("invalid field snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type MatchResult<T> = Result<T, MatchError>;
