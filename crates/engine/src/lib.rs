//! puyo-engine - rules and simulation for the chain puzzle.
//!
//! Everything here is a pure function of its inputs (plus an explicit RNG
//! where randomness is involved), so the round orchestrator and the move
//! search share the same code paths.

pub mod apply;
pub mod attack;
pub mod bag;
pub mod chain;
pub mod collision;
pub mod config;
pub mod connect;
pub mod garbage;
pub mod gravity;
pub mod movement;
pub mod rng;

pub use apply::{lock_pair, simulate_placement};
pub use attack::{chain_bonus, chain_score, outgoing_attack, total_chain_score};
pub use bag::PairGenerator;
pub use chain::{resolve_chains, ChainOutcome, ChainStep, ChainStepper};
pub use collision::{can_place, fits, hard_drop};
pub use config::{AttackConfig, TimingConfig};
pub use connect::{resolve_connections, Connections, MIN_GROUP_SIZE};
pub use garbage::{clamp_incoming, materialize, settle_attack, Settlement};
pub use gravity::{apply_gravity, is_settled};
pub use movement::{try_drop, try_move, try_rotate};
pub use rng::GameRng;
