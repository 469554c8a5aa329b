use crate::error::GameError;
use crate::protocol::ServerMessage;
use crate::state::{deal, AppState};
use crate::types::*;
use crate::wordlist::{self, WordSource};

impl AppState {
    /// Start a round: validate the spy count, draw a word pair from the
    /// room's list, assign roles over the full roster and deal each living
    /// player their private word. Fails without touching the room if the
    /// spy count is out of range or the list is missing or malformed.
    pub async fn start_game(
        &self,
        room_id: &str,
        requester: &str,
        spy_count: usize,
    ) -> Result<(), GameError> {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return Ok(());
        };

        let player_count = room.players.len();
        if spy_count == 0 || spy_count >= player_count {
            return Err(GameError::BadSpyCount {
                got: spy_count,
                max: player_count.saturating_sub(1),
            });
        }
        let entries = self
            .words
            .get(&room.list_name)
            .await
            .ok_or_else(|| GameError::ListUnavailable(room.list_name.clone()))?;
        let keep_order = room.list_name == wordlist::FIXED_ORDER_LIST;
        let (civilian_word, spy_word) = deal::draw_pair(&room.list_name, &entries, keep_order)?;

        room.round.clear();
        let spy_indices = deal::assign_spy_indices(player_count, spy_count);
        for (i, player) in room.players.iter_mut().enumerate() {
            let role = if spy_indices.contains(&i) {
                Role::Spy
            } else {
                Role::Civilian
            };
            player.role = Some(role);
            player.alive = true;
            player.in_punishment = false;
        }
        room.round.spy_ids = room
            .players
            .iter()
            .filter(|p| p.role == Some(Role::Spy))
            .map(|p| p.id.clone())
            .collect();
        room.status = RoomStatus::Playing;
        room.game_started = true;
        room.voting_started = true;
        deal::deal_words(room, &civilian_word, &spy_word);

        tracing::info!(room_id, requester, spy_count, "Game started");
        self.send_to_room(room, &ServerMessage::GameStarted { room: room.clone() })
            .await;
        for (conn_id, assignment) in &room.round.word_map {
            self.send_to_connection(
                conn_id,
                ServerMessage::DealWords {
                    word: assignment.word.clone(),
                    role: assignment.role,
                },
            )
            .await;
        }
        Ok(())
    }

    /// Host-only: wipe all round state and return the room to the lobby
    pub async fn reset_game(&self, room_id: &str, requester: &str) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        if room.host != requester {
            return;
        }

        room.round.clear();
        for player in room.players.iter_mut() {
            player.role = None;
            player.alive = false;
            player.in_punishment = false;
        }
        room.status = RoomStatus::Waiting;
        room.game_started = false;
        room.voting_started = false;

        tracing::info!(room_id, "Room reset to waiting");
        self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
    }

    pub async fn punishment_completed(&self, room_id: &str, conn_id: &str) {
        if !self.config.punishment_enabled {
            return;
        }
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        let Some(player) = room.player_mut(conn_id) else {
            return;
        };
        if !player.in_punishment {
            return;
        }
        player.in_punishment = false;
        tracing::debug!(room_id, conn_id, "Punishment completed");
        self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
            .await;
    }

    /// Relay a host's word-visibility toggle to the whole room
    pub async fn toggle_visibility(&self, room_id: &str, visible: bool) {
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(room_id) else {
            return;
        };
        self.send_to_room(room, &ServerMessage::VisibilityUpdated { visible })
            .await;
    }
}
