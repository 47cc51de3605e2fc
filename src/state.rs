use std::sync::Arc;

use crate::core::RoomStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registry of all live rooms
    pub rooms: Arc<RoomStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RoomStore::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
