use serde::{Deserialize, Serialize};

/// One drawn line segment.
///
/// The server relays strokes verbatim and never interprets the fields;
/// the shape exists so malformed payloads are rejected at the parse
/// boundary instead of reaching other clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingStroke {
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
    /// CSS color string chosen by the drawer
    pub color: String,
    /// Brush width in canvas pixels
    pub width: f64,
    /// Tool action, e.g. "draw" or "erase"
    pub action: String,
}

/// Everything a client can ask the server to do over its socket.
///
/// Frames are JSON envelopes `{"type": ..., "data": ...}` with
/// snake_case type tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Open a fresh room and join it as the first player
    CreateRoom { username: String },
    /// Join an existing room by code
    JoinRoom { code: String, username: String },
    /// Begin the first round
    StartGame { code: String },
    /// Relay a stroke to everyone else in the room (drawer only)
    SendDrawing { code: String, stroke: DrawingStroke },
    /// Chat, or a guess at the current word
    SendMessage { code: String, text: String },
    /// End the round early (drawer's countdown expired client-side)
    EndRound { code: String },
    /// Begin the next round after a round ended
    NextRound { code: String },
    /// Wipe everyone's canvas (drawer only)
    ClearCanvas { code: String },
}

/// Validate and clean a username
///
/// # Arguments
///
/// * `username` - Raw username input
///
/// # Returns
///
/// Cleaned username if valid, error message otherwise
///
/// # Validation Rules
///
/// - Must not be empty after trimming
/// - Length: 1-20 characters
/// - Only alphanumeric characters and spaces allowed
pub fn validate_username(username: &str) -> Result<String, String> {
    let cleaned = username.trim();

    if cleaned.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    if cleaned.len() > 20 {
        return Err("Username must be 20 characters or less".to_string());
    }

    if !cleaned
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace())
    {
        return Err("Username must contain only letters, numbers, and spaces".to_string());
    }

    Ok(cleaned.to_string())
}
