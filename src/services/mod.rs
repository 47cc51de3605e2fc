pub mod broadcast;
pub mod commands;
pub mod rounds;

pub use broadcast::{broadcast, Audience};
pub use commands::ClientSession;
pub use rounds::{begin_round, finish_round, spawn_round_timer};
