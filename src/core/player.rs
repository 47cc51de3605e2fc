use time::OffsetDateTime;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::models::events::ServerEvent;

/// A player in a room.
///
/// A player is bound to exactly one live connection: `id` is the
/// connection identifier minted by the gateway, and `sender` is that
/// connection's outbound event channel. Game logic never touches the
/// sender; only the broadcast path does.
#[derive(Debug, Clone)]
pub struct Player {
    /// Connection identifier, unique among live connections
    pub id: Uuid,
    /// Display name, unique within the room (case-insensitive)
    pub username: String,
    /// Accumulated score; never decreases within a game
    pub score: u32,
    /// Whether this player is the current drawer
    pub is_drawing: bool,
    /// Whether this player already guessed the word this round
    pub has_guessed_correctly: bool,
    /// Timestamp when the player joined the room
    pub joined_at: OffsetDateTime,
    /// Outbound channel for events destined to this player's connection
    pub sender: UnboundedSender<ServerEvent>,
}

impl Player {
    /// Create a new player with a zero score and no round flags set.
    pub fn new(id: Uuid, username: String, sender: UnboundedSender<ServerEvent>) -> Self {
        Self {
            id,
            username,
            score: 0,
            is_drawing: false,
            has_guessed_correctly: false,
            joined_at: OffsetDateTime::now_utc(),
            sender,
        }
    }

    /// Push an event to this player's connection.
    ///
    /// Sends never block; a closed receiver (connection already torn
    /// down) is reported as `false` and otherwise ignored.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn test_player(name: &str) -> (Player, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Player::new(Uuid::new_v4(), name.to_string(), tx), rx)
    }

    #[test]
    fn test_new_player_defaults() {
        let (player, _rx) = test_player("Alice");

        assert_eq!(player.username, "Alice");
        assert_eq!(player.score, 0);
        assert!(!player.is_drawing);
        assert!(!player.has_guessed_correctly);
    }

    #[test]
    fn test_send_delivers_event() {
        let (player, mut rx) = test_player("Alice");

        assert!(player.send(ServerEvent::CanvasCleared));
        assert!(matches!(rx.try_recv(), Ok(ServerEvent::CanvasCleared)));
    }

    #[test]
    fn test_send_to_dropped_receiver_reports_false() {
        let (player, rx) = test_player("Alice");
        drop(rx);

        assert!(!player.send(ServerEvent::CanvasCleared));
    }
}
