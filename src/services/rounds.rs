use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::broadcast::{broadcast, Audience};
use crate::core::{ChatMessage, Room, RoomState};
use crate::models::{ChatMessageInfo, PlayerInfo, ServerEvent};

/// Start the next round and announce it.
///
/// The drawer alone receives the word; everyone else receives its
/// masked form, its length and the drawer's name. The caller checks
/// any player-count precondition before calling and arms the countdown
/// afterwards with [`spawn_round_timer`].
pub fn begin_round(room: &mut Room) {
    if room.players.is_empty() {
        return;
    }
    room.start_new_round();

    let Some(drawer_id) = room.current_drawer_id else {
        return;
    };
    let drawer = room
        .player(drawer_id)
        .map(|p| p.username.clone())
        .unwrap_or_default();
    let word = room.current_word.clone().unwrap_or_default();
    let word_length = word.chars().count();

    tracing::info!(
        "Round {} started in room {}: {} is drawing",
        room.round_number,
        room.code,
        drawer
    );

    broadcast(
        room,
        Audience::One(drawer_id),
        ServerEvent::YourTurn {
            round: room.round_number,
            word,
            duration_seconds: room.round_duration_seconds,
        },
    );
    broadcast(
        room,
        Audience::RoomExcept(drawer_id),
        ServerEvent::RoundStarted {
            round: room.round_number,
            drawer,
            masked_word: room.masked_word(),
            word_length,
            duration_seconds: room.round_duration_seconds,
        },
    );
}

/// Close the active round: reveal the word in chat, then broadcast it
/// with the roster sorted by score.
///
/// No-op outside an active round, so the server countdown, the
/// drawer's client and an everyone-guessed finish can race without a
/// double reveal. Returns whether a round actually ended.
pub fn finish_round(room: &mut Room) -> bool {
    let Some(word) = room.end_round() else {
        return false;
    };

    tracing::info!(
        "Round {} ended in room {}: the word was {:?}",
        room.round_number,
        room.code,
        word
    );

    let note = ChatMessage::system(format!("The word was: {}", word));
    room.push_chat(note.clone());
    broadcast(
        room,
        Audience::Room,
        ServerEvent::ChatMessage {
            message: ChatMessageInfo::from_message(&note),
        },
    );
    broadcast(
        room,
        Audience::Room,
        ServerEvent::RoundEnded {
            word,
            players: PlayerInfo::scoreboard(&room.players),
        },
    );
    true
}

/// Arm the server-side countdown for one round.
///
/// After `duration_seconds` the round is ended unless it already was:
/// the task re-checks that the room is still live, still drawing and
/// still on the same round number, so a round ended early (everyone
/// guessed, drawer's client announced the end, drawer disconnected)
/// makes the expiry a no-op instead of cutting into the next round.
pub fn spawn_round_timer(room: Arc<Mutex<Room>>, round_number: u32, duration_seconds: u32) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(u64::from(duration_seconds))).await;

        let mut room = room.lock().await;
        if room.closed || room.state != RoomState::Drawing || room.round_number != round_number {
            return;
        }
        tracing::info!("Round {} timed out in room {}", round_number, room.code);
        finish_round(&mut room);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use uuid::Uuid;

    fn room_with(names: &[&str]) -> (Room, Vec<(Uuid, UnboundedReceiver<ServerEvent>)>) {
        let mut room = Room::new("TEST01".to_string());
        let mut receivers = Vec::new();
        for name in names {
            let (tx, rx) = mpsc::unbounded_channel();
            let player = Player::new(Uuid::new_v4(), name.to_string(), tx);
            let id = player.id;
            room.add_player(player).unwrap();
            receivers.push((id, rx));
        }
        (room, receivers)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_begin_round_sends_word_only_to_drawer() {
        let (mut room, mut receivers) = room_with(&["Alice", "Bob"]);
        room.word_pool = &["penguin"];

        begin_round(&mut room);

        let alice_events = drain(&mut receivers[0].1);
        let bob_events = drain(&mut receivers[1].1);

        assert!(matches!(
            alice_events.as_slice(),
            [ServerEvent::YourTurn { word, round: 1, .. }] if word == "penguin"
        ));
        assert!(matches!(
            bob_events.as_slice(),
            [ServerEvent::RoundStarted {
                drawer,
                masked_word,
                word_length: 7,
                ..
            }] if drawer == "Alice" && masked_word == "_______"
        ));
    }

    #[test]
    fn test_begin_round_in_empty_room_is_noop() {
        let mut room = Room::new("TEST01".to_string());

        begin_round(&mut room);

        assert_eq!(room.state, RoomState::Waiting);
        assert_eq!(room.round_number, 0);
    }

    #[test]
    fn test_finish_round_reveals_word_to_everyone() {
        let (mut room, mut receivers) = room_with(&["Alice", "Bob"]);
        room.word_pool = &["penguin"];
        begin_round(&mut room);
        for (_, rx) in &mut receivers {
            drain(rx);
        }

        assert!(finish_round(&mut room));

        for (_, rx) in &mut receivers {
            let events = drain(rx);
            assert_eq!(events.len(), 2);
            assert!(matches!(
                &events[0],
                ServerEvent::ChatMessage { message } if message.text == "The word was: penguin"
            ));
            assert!(matches!(
                &events[1],
                ServerEvent::RoundEnded { word, .. } if word == "penguin"
            ));
        }
    }

    #[test]
    fn test_finish_round_scoreboard_is_sorted() {
        let (mut room, mut receivers) = room_with(&["Alice", "Bob", "Carol"]);
        room.word_pool = &["penguin"];
        begin_round(&mut room);
        let bob = receivers[1].0;
        let carol = receivers[2].0;
        room.check_guess(bob, "penguin");
        room.round_started_at = Some(time::OffsetDateTime::now_utc() - time::Duration::seconds(60));
        room.check_guess(carol, "penguin");
        for (_, rx) in &mut receivers {
            drain(rx);
        }

        finish_round(&mut room);

        let events = drain(&mut receivers[0].1);
        let Some(ServerEvent::RoundEnded { players, .. }) = events.last() else {
            panic!("expected a round end, got {:?}", events);
        };
        assert_eq!(players[0].username, "Bob");
        assert!(players[0].score >= players[1].score);
        assert!(players[1].score >= players[2].score);
    }

    #[test]
    fn test_finish_round_twice_reveals_once() {
        let (mut room, mut receivers) = room_with(&["Alice", "Bob"]);
        begin_round(&mut room);
        for (_, rx) in &mut receivers {
            drain(rx);
        }

        assert!(finish_round(&mut room));
        assert!(!finish_round(&mut room));

        // Two events from the first call, none from the second.
        assert_eq!(drain(&mut receivers[0].1).len(), 2);
    }

    #[tokio::test]
    async fn test_round_timer_ends_round_on_expiry() {
        let (mut inner, _receivers) = room_with(&["Alice", "Bob"]);
        begin_round(&mut inner);
        let round_number = inner.round_number;
        let room = Arc::new(Mutex::new(inner));

        spawn_round_timer(room.clone(), round_number, 0);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(room.lock().await.state, RoomState::RoundEnd);
    }

    #[tokio::test]
    async fn test_stale_round_timer_does_not_fire() {
        let (mut inner, _receivers) = room_with(&["Alice", "Bob"]);
        begin_round(&mut inner);
        finish_round(&mut inner);
        begin_round(&mut inner);
        let room = Arc::new(Mutex::new(inner));

        // A countdown armed for round 1 expires during round 2.
        spawn_round_timer(room.clone(), 1, 0);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let room = room.lock().await;
        assert_eq!(room.state, RoomState::Drawing);
        assert_eq!(room.round_number, 2);
    }

    #[tokio::test]
    async fn test_timer_on_closed_room_is_noop() {
        let (mut inner, receivers) = room_with(&["Alice", "Bob"]);
        begin_round(&mut inner);
        inner.closed = true;
        let round_number = inner.round_number;
        let room = Arc::new(Mutex::new(inner));

        spawn_round_timer(room.clone(), round_number, 0);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(room.lock().await.state, RoomState::Drawing);
        drop(receivers);
    }
}
