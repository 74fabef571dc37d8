//! puyo-match - drives rounds: the per-player state machine, a local match
//! against the placement search, and the relay used for online play.

mod config;
mod error;
mod relay;
mod round;
mod session;
mod versus;

pub use config::RoundConfig;
pub use error::{MatchError, MatchResult};
pub use relay::{
    ClientId, ClientMessage, LocalTransport, RoomRegistry, ServerMessage, Transport,
    ROOM_CAPACITY,
};
pub use round::{Command, Round, RoundEvent, RoundInput, GAME_OVER_CELL};
pub use session::{Notice, OnlineSession};
pub use versus::{CpuMatch, MatchEvents, Side};
