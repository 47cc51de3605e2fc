use rand::Rng;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::constants::{ROOM_CODE_CHARSET, ROOM_CODE_LENGTH};
use super::Room;

/// Registry of all live rooms, keyed by normalized room code.
///
/// The map lock is held only long enough to insert, clone out, or drop
/// an `Arc`; each room then serializes its own mutations behind its own
/// mutex. Rooms therefore never block one another, and map operations
/// never wait on any room. No method here ever locks a room.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Canonical form of a room code: trimmed, ASCII-uppercased.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }

    /// Draw a fresh 6-character code uniformly from `A-Z0-9`.
    ///
    /// Uniqueness is not guaranteed here; `create` rejects collisions
    /// and `create_with_unique_code` retries until one sticks.
    pub fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        (0..ROOM_CODE_LENGTH)
            .map(|_| ROOM_CODE_CHARSET[rng.gen_range(0..ROOM_CODE_CHARSET.len())] as char)
            .collect()
    }

    /// Insert a new empty room under `code`.
    ///
    /// Returns `None` if the code is already taken. The room is fully
    /// constructed before it becomes visible to any other caller.
    pub async fn create(&self, code: &str) -> Option<Arc<Mutex<Room>>> {
        let code = Self::normalize_code(code);
        let mut rooms = self.rooms.write().await;
        match rooms.entry(code.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let room = Arc::new(Mutex::new(Room::new(code)));
                slot.insert(Arc::clone(&room));
                Some(room)
            }
        }
    }

    /// Create a room under a freshly generated, guaranteed-unused code.
    pub async fn create_with_unique_code(&self) -> (String, Arc<Mutex<Room>>) {
        loop {
            let code = Self::generate_code();
            if let Some(room) = self.create(&code).await {
                return (code, room);
            }
        }
    }

    /// Look up a room by code.
    pub async fn get(&self, code: &str) -> Option<Arc<Mutex<Room>>> {
        let code = Self::normalize_code(code);
        self.rooms.read().await.get(&code).cloned()
    }

    /// Drop a room from the registry.
    ///
    /// Returns whether anything was removed. Handlers still holding the
    /// room's `Arc` see its `closed` flag instead of dangling state.
    pub async fn delete(&self, code: &str) -> bool {
        let code = Self::normalize_code(code);
        self.rooms.write().await.remove(&code).is_some()
    }

    /// Room and player totals across the registry.
    pub async fn stats(&self) -> (usize, usize) {
        let rooms: Vec<Arc<Mutex<Room>>> =
            self.rooms.read().await.values().cloned().collect();

        let mut players = 0;
        for room in &rooms {
            players += room.lock().await.players.len();
        }
        (rooms.len(), players)
    }
}
