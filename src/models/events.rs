use serde::{Deserialize, Serialize};

use super::commands::DrawingStroke;
use crate::core::{ChatMessage, Player};

/// Player information carried by roster-bearing events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Connection id, stable for the player's session
    pub id: String,
    /// Player's display name
    pub username: String,
    /// Total score across rounds
    pub score: u32,
    /// Whether this player currently holds the brush
    pub is_drawing: bool,
    /// Whether this player has guessed the current word
    pub has_guessed_correctly: bool,
}

impl PlayerInfo {
    /// Create a PlayerInfo from a Player
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            username: player.username.clone(),
            score: player.score,
            is_drawing: player.is_drawing,
            has_guessed_correctly: player.has_guessed_correctly,
        }
    }

    /// Roster projection in join order.
    pub fn roster(players: &[Player]) -> Vec<Self> {
        players.iter().map(Self::from_player).collect()
    }

    /// Roster sorted by score, highest first.
    pub fn scoreboard(players: &[Player]) -> Vec<Self> {
        let mut infos = Self::roster(players);
        infos.sort_by(|a, b| b.score.cmp(&a.score));
        infos
    }
}

/// Chat log entry as it crosses the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageInfo {
    /// Author's username; empty for server announcements
    pub username: String,
    pub text: String,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub is_system_message: bool,
    pub is_correct_guess: bool,
}

impl ChatMessageInfo {
    /// Create a ChatMessageInfo from a chat log entry
    pub fn from_message(message: &ChatMessage) -> Self {
        Self {
            username: message.username.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp.unix_timestamp(),
            is_system_message: message.is_system_message,
            is_correct_guess: message.is_correct_guess,
        }
    }

    /// Project a whole chat log, oldest first.
    pub fn history(messages: &[ChatMessage]) -> Vec<Self> {
        messages.iter().map(Self::from_message).collect()
    }
}

/// Everything the server can push to a client.
///
/// Same envelope as commands: `{"type": ..., "data": ...}`, snake_case
/// tags. Events carrying a roster always carry the whole roster so
/// clients re-render instead of patching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// To the creator: the room is ready under this code
    RoomCreated {
        code: String,
        players: Vec<PlayerInfo>,
    },
    /// To the room: someone joined
    PlayerJoined {
        username: String,
        players: Vec<PlayerInfo>,
    },
    /// To a joiner only: the chat log so far
    ChatHistory { messages: Vec<ChatMessageInfo> },
    /// To the room: one new chat entry
    ChatMessage { message: ChatMessageInfo },
    /// To the drawer only: the secret word for this round
    YourTurn {
        round: u32,
        word: String,
        duration_seconds: u32,
    },
    /// To everyone except the drawer: a round began
    RoundStarted {
        round: u32,
        drawer: String,
        masked_word: String,
        word_length: usize,
        duration_seconds: u32,
    },
    /// To everyone except the drawer: a stroke to replay
    Drawing { stroke: DrawingStroke },
    /// To the room: scores changed
    ScoreUpdated { players: Vec<PlayerInfo> },
    /// To the room: the round is over, word revealed, roster by score
    RoundEnded {
        word: String,
        players: Vec<PlayerInfo>,
    },
    /// To the room: wipe the canvas
    CanvasCleared,
    /// To the room: someone left
    PlayerLeft {
        username: String,
        players: Vec<PlayerInfo>,
    },
    /// To one client: its last command failed
    Error { message: String },
}
