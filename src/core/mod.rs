pub mod constants;
pub mod player;
pub mod room;
pub mod store;

pub use constants::*;
pub use player::Player;
pub use room::{ChatMessage, GameError, Room, RoomState};
pub use store::RoomStore;
