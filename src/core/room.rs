use rand::seq::SliceRandom;
use rand::thread_rng;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::constants::{BASE_GUESS_SCORE, MIN_PLAYERS, ROUND_DURATION_SECONDS, WORD_POOL};
use super::Player;

/// Errors a game operation can report back to the caller.
///
/// The display strings double as the machine-readable reasons carried
/// by error events, so they are part of the protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Username already taken in this room")]
    UsernameTaken,

    #[error("Need at least 2 players to start")]
    NotEnoughPlayers,

    #[error("Not a member of this room")]
    NotInRoom,

    #[error("Already in a room")]
    AlreadyInRoom,

    #[error("{0}")]
    InvalidUsername(String),
}

/// Room lifecycle state
///
/// `ChoosingWord` and `GameEnd` are reserved for a word-choice phase and
/// a match-end screen; nothing transitions into them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Waiting,
    ChoosingWord,
    Drawing,
    RoundEnd,
    GameEnd,
}

/// One entry in a room's chat log. Append-only, never edited.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Author's username; empty for server-generated messages
    pub username: String,
    pub text: String,
    pub timestamp: OffsetDateTime,
    pub is_system_message: bool,
    pub is_correct_guess: bool,
}

impl ChatMessage {
    /// An ordinary message typed by a player.
    pub fn user(username: String, text: String) -> Self {
        Self {
            username,
            text,
            timestamp: OffsetDateTime::now_utc(),
            is_system_message: false,
            is_correct_guess: false,
        }
    }

    /// A server-generated announcement (joins, departures, reveals).
    pub fn system(text: String) -> Self {
        Self {
            username: String::new(),
            text,
            timestamp: OffsetDateTime::now_utc(),
            is_system_message: true,
            is_correct_guess: false,
        }
    }

    /// The announcement for a correct guess. Carries the guesser's name
    /// but never the guessed word.
    pub fn correct_guess(username: String) -> Self {
        Self {
            text: format!("{} guessed the word!", username),
            username,
            timestamp: OffsetDateTime::now_utc(),
            is_system_message: true,
            is_correct_guess: true,
        }
    }
}

/// All mutable state for one game session.
///
/// A room is always accessed through its mutex in the store, so every
/// method here may assume it has exclusive access. Methods are
/// synchronous and never perform I/O; the gateway turns their results
/// into broadcasts.
#[derive(Debug)]
pub struct Room {
    /// Six-character code, uppercase, immutable after creation
    pub code: String,
    /// Players in join order; the order defines turn rotation
    pub players: Vec<Player>,
    /// Current lifecycle state
    pub state: RoomState,
    /// Connection id of the current drawer, if a round has ever started
    pub current_drawer_id: Option<Uuid>,
    /// The secret word; `None` outside an active round
    pub current_word: Option<String>,
    /// Catalog words are drawn from; static, swappable in tests
    pub word_pool: &'static [&'static str],
    /// Count of rounds started in this room
    pub round_number: u32,
    /// When the active round began
    pub round_started_at: Option<OffsetDateTime>,
    /// Length of the scoring window for each round
    pub round_duration_seconds: u32,
    /// Append-only chat and announcement log
    pub chat_history: Vec<ChatMessage>,
    /// When the room was created
    pub created_at: OffsetDateTime,
    /// Set when the last player leaves; a closed room rejects joins so
    /// that a join racing room deletion observes "Room not found"
    pub closed: bool,
}

impl Room {
    /// Create an empty room in the waiting state.
    pub fn new(code: String) -> Self {
        Self {
            code,
            players: Vec::new(),
            state: RoomState::Waiting,
            current_drawer_id: None,
            current_word: None,
            word_pool: WORD_POOL,
            round_number: 0,
            round_started_at: None,
            round_duration_seconds: ROUND_DURATION_SECONDS,
            chat_history: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
            closed: false,
        }
    }

    /// Look up a member by connection id.
    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Reject work on a room that has been emptied and is on its way
    /// out of the store; callers racing the deletion see the same
    /// error as a lookup miss.
    pub fn ensure_open(&self) -> Result<(), GameError> {
        if self.closed {
            return Err(GameError::RoomNotFound);
        }
        Ok(())
    }

    /// Whether a username is already in use, compared case-insensitively.
    pub fn username_taken(&self, username: &str) -> bool {
        let wanted = username.to_lowercase();
        self.players.iter().any(|p| p.username.to_lowercase() == wanted)
    }

    /// Append a player to the roster.
    ///
    /// # Errors
    ///
    /// `UsernameTaken` if another member's name matches case-insensitively.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.username_taken(&player.username) {
            return Err(GameError::UsernameTaken);
        }
        self.players.push(player);
        Ok(())
    }

    /// Remove a member, preserving the join order of everyone else.
    ///
    /// Returns the removed player so the caller can announce the
    /// departure. Removing an unknown id returns `None` and changes
    /// nothing.
    pub fn remove_player(&mut self, id: Uuid) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether the room meets the player minimum for starting a round.
    pub fn can_start(&self) -> bool {
        self.players.len() >= MIN_PLAYERS
    }

    /// Begin the next round.
    ///
    /// Clears every player's round flags, hands the brush to the player
    /// after the current drawer in join order (first round: the first
    /// joiner; a departed drawer also restarts rotation at the top),
    /// picks a fresh word uniformly from the pool and stamps the clock.
    ///
    /// The player-count precondition belongs to the caller; rotation
    /// itself only needs a non-empty roster.
    pub fn start_new_round(&mut self) {
        if self.players.is_empty() {
            return;
        }

        for player in &mut self.players {
            player.has_guessed_correctly = false;
            player.is_drawing = false;
        }

        let next_index = match self
            .current_drawer_id
            .and_then(|id| self.players.iter().position(|p| p.id == id))
        {
            Some(current) => (current + 1) % self.players.len(),
            None => 0,
        };

        let drawer = &mut self.players[next_index];
        drawer.is_drawing = true;
        self.current_drawer_id = Some(drawer.id);

        let mut rng = thread_rng();
        self.current_word = self.word_pool.choose(&mut rng).map(|w| w.to_string());

        self.round_started_at = Some(OffsetDateTime::now_utc());
        self.round_number += 1;
        self.state = RoomState::Drawing;
    }

    /// Evaluate a guess from `id` against the current word.
    ///
    /// Returns `false` with no state change when the player is unknown,
    /// already guessed this round, is the drawer, there is no active
    /// word, or the trimmed text does not match case-insensitively.
    /// On a match the player is flagged and awarded the base score plus
    /// the seconds left on the round clock.
    pub fn check_guess(&mut self, id: Uuid, text: &str) -> bool {
        let Some(word) = self.current_word.as_deref() else {
            return false;
        };
        if text.trim().to_lowercase() != word.to_lowercase() {
            return false;
        }

        let award = self.current_award();
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if player.has_guessed_correctly || player.is_drawing {
            return false;
        }

        player.has_guessed_correctly = true;
        player.score += award;
        true
    }

    /// Score for a correct guess at this instant: the flat base plus
    /// one point per second remaining in the round.
    fn current_award(&self) -> u32 {
        let remaining = match self.round_started_at {
            Some(started) => {
                let elapsed = (OffsetDateTime::now_utc() - started).whole_seconds();
                (self.round_duration_seconds as i64 - elapsed)
                    .clamp(0, self.round_duration_seconds as i64)
            }
            None => 0,
        };
        BASE_GUESS_SCORE + remaining as u32
    }

    /// The current word with every character hidden: one underscore per
    /// `char`, spaces and punctuation included.
    pub fn masked_word(&self) -> String {
        self.current_word
            .as_deref()
            .unwrap_or_default()
            .chars()
            .map(|_| '_')
            .collect()
    }

    /// Whether every player except the drawer has guessed correctly.
    pub fn all_guessers_done(&self) -> bool {
        self.players
            .iter()
            .filter(|p| !p.is_drawing)
            .all(|p| p.has_guessed_correctly)
    }

    /// Close out the active round, returning the word to reveal.
    ///
    /// Round transitions are idempotent: when no round is in progress
    /// this is a no-op returning `None`, so duplicate end-round requests
    /// (a drawer's countdown racing the server's, or a desynced client)
    /// cause exactly one reveal.
    pub fn end_round(&mut self) -> Option<String> {
        if self.state != RoomState::Drawing {
            return None;
        }
        self.state = RoomState::RoundEnd;
        self.round_started_at = None;
        Some(self.current_word.take().unwrap_or_default())
    }

    /// Append an entry to the chat log.
    pub fn push_chat(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
    }
}
