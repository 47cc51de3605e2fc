pub mod commands;
pub mod events;

pub use commands::{validate_username, ClientCommand, DrawingStroke};
pub use events::{ChatMessageInfo, PlayerInfo, ServerEvent};
