use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::broadcast::{broadcast, Audience};
use super::rounds;
use crate::core::{ChatMessage, GameError, Player, Room};
use crate::models::{
    validate_username, ChatMessageInfo, ClientCommand, DrawingStroke, PlayerInfo, ServerEvent,
};
use crate::state::AppState;

/// One client's seat at the server: its connection id, its outbound
/// event channel and the room it has joined, if any.
///
/// The socket loop owns exactly one of these per connection and feeds
/// it parsed commands; every room mutation and every broadcast happens
/// inside one of its handlers, under the room's lock. A connection
/// belongs to at most one room and never migrates.
pub struct ClientSession {
    /// Connection id, minted at accept time
    pub connection_id: Uuid,
    /// Code of the joined room; `None` until a create or join succeeds
    pub room_code: Option<String>,
    sender: UnboundedSender<ServerEvent>,
    state: AppState,
}

impl ClientSession {
    pub fn new(connection_id: Uuid, sender: UnboundedSender<ServerEvent>, state: AppState) -> Self {
        Self {
            connection_id,
            room_code: None,
            sender,
            state,
        }
    }

    /// Dispatch one parsed command.
    ///
    /// Precondition failures become an Error event to this client only;
    /// drawer-authorization failures and stale round controls are
    /// silently dropped because they indicate client desync, not user
    /// error.
    pub async fn handle(&mut self, command: ClientCommand) {
        let result = match command {
            ClientCommand::CreateRoom { username } => self.create_room(username).await,
            ClientCommand::JoinRoom { code, username } => self.join_room(code, username).await,
            ClientCommand::StartGame { code } => self.start_game(code).await,
            ClientCommand::SendDrawing { code, stroke } => self.send_drawing(code, stroke).await,
            ClientCommand::SendMessage { code, text } => self.send_message(code, text).await,
            ClientCommand::EndRound { code } => self.end_round(code).await,
            ClientCommand::NextRound { code } => self.next_round(code).await,
            ClientCommand::ClearCanvas { code } => self.clear_canvas(code).await,
        };

        if let Err(error) = result {
            tracing::debug!(
                "Command rejected for connection={}: {}",
                self.connection_id,
                error
            );
            self.reply(ServerEvent::Error {
                message: error.to_string(),
            });
        }
    }

    /// Push an event to this client alone, outside any room fanout.
    fn reply(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    async fn resolve_room(&self, code: &str) -> Result<Arc<Mutex<Room>>, GameError> {
        self.state
            .rooms
            .get(code)
            .await
            .ok_or(GameError::RoomNotFound)
    }

    /// Open a fresh room with this client as its first player.
    async fn create_room(&mut self, username: String) -> Result<(), GameError> {
        if self.room_code.is_some() {
            return Err(GameError::AlreadyInRoom);
        }
        let username = validate_username(&username).map_err(GameError::InvalidUsername)?;

        let (code, handle) = self.state.rooms.create_with_unique_code().await;
        let mut room = handle.lock().await;
        room.add_player(Player::new(
            self.connection_id,
            username.clone(),
            self.sender.clone(),
        ))?;
        self.room_code = Some(code.clone());

        tracing::info!(
            "Room {} created by {} (connection={})",
            code,
            username,
            self.connection_id
        );

        broadcast(
            &room,
            Audience::One(self.connection_id),
            ServerEvent::RoomCreated {
                code,
                players: PlayerInfo::roster(&room.players),
            },
        );
        Ok(())
    }

    /// Join an existing room by code.
    ///
    /// The joiner receives the chat log so far; everyone receives the
    /// updated roster and a system announcement.
    async fn join_room(&mut self, code: String, username: String) -> Result<(), GameError> {
        if self.room_code.is_some() {
            return Err(GameError::AlreadyInRoom);
        }
        let username = validate_username(&username).map_err(GameError::InvalidUsername)?;

        let handle = self.resolve_room(&code).await?;
        let mut room = handle.lock().await;
        room.ensure_open()?;
        room.add_player(Player::new(
            self.connection_id,
            username.clone(),
            self.sender.clone(),
        ))?;
        self.room_code = Some(room.code.clone());

        tracing::info!(
            "{} joined room {} (connection={})",
            username,
            room.code,
            self.connection_id
        );

        broadcast(
            &room,
            Audience::Room,
            ServerEvent::PlayerJoined {
                username: username.clone(),
                players: PlayerInfo::roster(&room.players),
            },
        );
        broadcast(
            &room,
            Audience::One(self.connection_id),
            ServerEvent::ChatHistory {
                messages: ChatMessageInfo::history(&room.chat_history),
            },
        );
        let note = ChatMessage::system(format!("{} joined the room", username));
        room.push_chat(note.clone());
        broadcast(
            &room,
            Audience::Room,
            ServerEvent::ChatMessage {
                message: ChatMessageInfo::from_message(&note),
            },
        );
        Ok(())
    }

    /// Begin the first round. Any member may start once enough players
    /// are present.
    async fn start_game(&mut self, code: String) -> Result<(), GameError> {
        let handle = self.resolve_room(&code).await?;
        let mut room = handle.lock().await;
        room.ensure_open()?;
        if !room.can_start() {
            return Err(GameError::NotEnoughPlayers);
        }

        tracing::info!("Game started in room {}", room.code);

        rounds::begin_round(&mut room);
        rounds::spawn_round_timer(handle.clone(), room.round_number, room.round_duration_seconds);
        Ok(())
    }

    /// Relay a stroke to everyone but the drawer. Non-drawers are
    /// silently ignored.
    async fn send_drawing(&mut self, code: String, stroke: DrawingStroke) -> Result<(), GameError> {
        let handle = self.resolve_room(&code).await?;
        let room = handle.lock().await;
        room.ensure_open()?;
        if room.current_drawer_id != Some(self.connection_id) {
            return Ok(());
        }

        broadcast(
            &room,
            Audience::RoomExcept(self.connection_id),
            ServerEvent::Drawing { stroke },
        );
        Ok(())
    }

    /// Chat, or a guess. A correct guess is announced without its text
    /// and scores are rebroadcast; when every guesser is done the
    /// round ends. Anything else lands in chat as-is.
    async fn send_message(&mut self, code: String, text: String) -> Result<(), GameError> {
        let handle = self.resolve_room(&code).await?;
        let mut room = handle.lock().await;
        room.ensure_open()?;
        let username = room
            .player(self.connection_id)
            .map(|p| p.username.clone())
            .ok_or(GameError::NotInRoom)?;

        if room.check_guess(self.connection_id, &text) {
            tracing::info!("{} guessed the word in room {}", username, room.code);

            let note = ChatMessage::correct_guess(username);
            room.push_chat(note.clone());
            broadcast(
                &room,
                Audience::Room,
                ServerEvent::ChatMessage {
                    message: ChatMessageInfo::from_message(&note),
                },
            );
            broadcast(
                &room,
                Audience::Room,
                ServerEvent::ScoreUpdated {
                    players: PlayerInfo::roster(&room.players),
                },
            );
            if room.all_guessers_done() {
                rounds::finish_round(&mut room);
            }
            return Ok(());
        }

        let message = ChatMessage::user(username, text);
        room.push_chat(message.clone());
        broadcast(
            &room,
            Audience::Room,
            ServerEvent::ChatMessage {
                message: ChatMessageInfo::from_message(&message),
            },
        );
        Ok(())
    }

    /// End the active round. A stale request outside a round is
    /// silently dropped.
    async fn end_round(&mut self, code: String) -> Result<(), GameError> {
        let handle = self.resolve_room(&code).await?;
        let mut room = handle.lock().await;
        room.ensure_open()?;
        rounds::finish_round(&mut room);
        Ok(())
    }

    /// Clear canvases and rotate the brush to the next player.
    async fn next_round(&mut self, code: String) -> Result<(), GameError> {
        let handle = self.resolve_room(&code).await?;
        let mut room = handle.lock().await;
        room.ensure_open()?;

        broadcast(&room, Audience::Room, ServerEvent::CanvasCleared);
        rounds::begin_round(&mut room);
        rounds::spawn_round_timer(handle.clone(), room.round_number, room.round_duration_seconds);
        Ok(())
    }

    /// Relay a canvas wipe. Non-drawers are silently ignored.
    async fn clear_canvas(&mut self, code: String) -> Result<(), GameError> {
        let handle = self.resolve_room(&code).await?;
        let room = handle.lock().await;
        room.ensure_open()?;
        if room.current_drawer_id != Some(self.connection_id) {
            return Ok(());
        }

        broadcast(&room, Audience::Room, ServerEvent::CanvasCleared);
        Ok(())
    }

    /// Tear down this connection's room membership.
    ///
    /// Runs exactly once, when the socket loop exits; taking the room
    /// code makes a second call a no-op. The last player out closes
    /// the room and removes it from the store; otherwise the departure
    /// is announced, and the round ends if the drawer just left.
    pub async fn disconnect(&mut self) {
        let Some(code) = self.room_code.take() else {
            return;
        };
        let Some(handle) = self.state.rooms.get(&code).await else {
            return;
        };

        let mut room = handle.lock().await;
        let Some(player) = room.remove_player(self.connection_id) else {
            return;
        };

        tracing::info!(
            "{} left room {} (connection={})",
            player.username,
            room.code,
            self.connection_id
        );

        if room.is_empty() {
            room.closed = true;
            drop(room);
            self.state.rooms.delete(&code).await;
            tracing::info!("Room {} deleted (last player left)", code);
            return;
        }

        broadcast(
            &room,
            Audience::Room,
            ServerEvent::PlayerLeft {
                username: player.username.clone(),
                players: PlayerInfo::roster(&room.players),
            },
        );
        let note = ChatMessage::system(format!("{} left the room", player.username));
        room.push_chat(note.clone());
        broadcast(
            &room,
            Audience::Room,
            ServerEvent::ChatMessage {
                message: ChatMessageInfo::from_message(&note),
            },
        );

        if room.current_drawer_id == Some(self.connection_id) {
            rounds::finish_round(&mut room);
        }
    }
}
