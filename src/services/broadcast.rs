use uuid::Uuid;

use crate::core::Room;
use crate::models::ServerEvent;

/// Which members of a room an event is addressed to.
///
/// Every outbound event names exactly one of these modes; there is no
/// other routing path, so the delivery contract can be tested without
/// a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Exactly one member, by connection id
    One(Uuid),
    /// Every member
    Room,
    /// Every member except one, by connection id
    RoomExcept(Uuid),
}

/// Push one event to every member the audience selects.
///
/// Runs under the room's lock, so all members observe events in the
/// same order. Sends never block and never fail the caller; a member
/// whose receiver is gone is skipped, and their own disconnect path
/// removes them from the roster.
pub fn broadcast(room: &Room, audience: Audience, event: ServerEvent) {
    for player in &room.players {
        let selected = match audience {
            Audience::One(id) => player.id == id,
            Audience::Room => true,
            Audience::RoomExcept(id) => player.id != id,
        };
        if selected {
            player.send(event.clone());
        }
    }
}
