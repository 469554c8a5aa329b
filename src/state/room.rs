use super::AppState;
use crate::error::GameError;
use crate::protocol::ServerMessage;
use crate::types::*;
use crate::wordlist::{self, WordSource};

impl AppState {
    /// Create a room with the caller as host and sole player.
    pub async fn create_room(
        &self,
        room_id: &str,
        conn_id: &str,
        name: &str,
        list_name: Option<&str>,
    ) -> Result<(), GameError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(room_id) {
            return Err(GameError::RoomExists(room_id.to_string()));
        }

        let list_name = match list_name {
            Some(requested) => {
                if self.words.contains(requested).await {
                    requested.to_string()
                } else {
                    wordlist::DEFAULT_LIST.to_string()
                }
            }
            None => wordlist::DEFAULT_LIST.to_string(),
        };

        let room = Room::new(room_id, conn_id, name, list_name);
        rooms.insert(room_id.to_string(), room.clone());
        tracing::info!(room_id, host = conn_id, "Room created");
        self.send_to_room(&room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
        Ok(())
    }

    /// Add a player to an existing room. Unknown rooms and duplicate
    /// connection ids are ignored.
    pub async fn join_room(&self, room_id: &str, conn_id: &str, name: &str) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        if room.contains(conn_id) {
            return;
        }

        room.players.push(Player::new(conn_id, name));
        room.ensure_host();
        tracing::info!(room_id, player = conn_id, "Player joined");
        self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
    }

    /// Remove a player; destroys an emptied room and reassigns the host if
    /// the host left.
    pub async fn leave_room(&self, room_id: &str, conn_id: &str) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        let Some(idx) = room.players.iter().position(|p| p.id == conn_id) else {
            return;
        };

        room.players.remove(idx);
        tracing::info!(room_id, player = conn_id, "Player left");

        if room.players.is_empty() {
            rooms.remove(room_id);
            tracing::info!(room_id, "Room destroyed, last player left");
            return;
        }

        if room.host == conn_id {
            room.host = room.players[0].id.clone();
            tracing::info!(room_id, new_host = %room.host, "Host reassigned");
        }
        self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
    }

    /// Leave semantics for every room still holding this connection. Used
    /// when a disconnect grace period expires.
    pub async fn remove_from_all_rooms(&self, conn_id: &str) {
        let room_ids: Vec<RoomId> = {
            let rooms = self.rooms.read().await;
            rooms
                .values()
                .filter(|r| r.contains(conn_id))
                .map(|r| r.id.clone())
                .collect()
        };
        for room_id in room_ids {
            self.leave_room(&room_id, conn_id).await;
        }
    }

    /// Host-only removal of another player. The target is notified
    /// individually before the room update goes out.
    pub async fn kick_player(&self, room_id: &str, requester: &str, target: &str) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        if room.host != requester {
            return;
        }
        let Some(idx) = room.players.iter().position(|p| p.id == target) else {
            return;
        };

        self.send_to_connection(target, ServerMessage::KickedFromRoom)
            .await;
        room.players.remove(idx);
        tracing::info!(room_id, target, "Player kicked");

        if room.players.is_empty() {
            rooms.remove(room_id);
            return;
        }

        room.ensure_host();
        self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
    }

    /// Switch the room's word list; unknown lists are ignored
    pub async fn change_list(&self, room_id: &str, list_name: &str) {
        if !self.words.contains(list_name).await {
            return;
        }
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        room.list_name = list_name.to_string();
        self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
    }

    /// Existence probe clients use before joining
    pub async fn room_status(&self, room_id: &str) -> ServerMessage {
        let rooms = self.rooms.read().await;
        match rooms.get(room_id) {
            Some(room) => ServerMessage::RoomStatus {
                exists: true,
                status: Some(room.status),
                player_count: Some(room.players.len()),
            },
            None => ServerMessage::RoomStatus {
                exists: false,
                status: None,
                player_count: None,
            },
        }
    }
}
