//! Reconnection handling. A websocket drop does not free a player's seat
//! right away: a grace timer holds it, and a rejoin under the same display
//! name rewrites the old connection id into the new one across the room,
//! the dealt words and the ballot box.

use crate::error::GameError;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::*;

/// Rewrite every occurrence of `old_id` in the room to `new_id`
fn migrate_identity(room: &mut Room, old_id: &str, new_id: &str) {
    if let Some(player) = room.player_mut(old_id) {
        player.id = new_id.to_string();
    }
    if room.host == old_id {
        room.host = new_id.to_string();
    }
    if room.round.spy_ids.remove(old_id) {
        room.round.spy_ids.insert(new_id.to_string());
    }
    if let Some(assignment) = room.round.word_map.remove(old_id) {
        room.round.word_map.insert(new_id.to_string(), assignment);
    } else {
        // An assignment can sit under an even older id after repeated
        // drops: fall back to matching the recorded player name.
        let name = room.player(new_id).map(|p| p.name.clone());
        let stale_key = name.and_then(|name| {
            room.round
                .word_map
                .iter()
                .find(|(_, a)| a.player_name == name)
                .map(|(k, _)| k.clone())
        });
        if let Some(key) = stale_key {
            if let Some(assignment) = room.round.word_map.remove(&key) {
                room.round.word_map.insert(new_id.to_string(), assignment);
            }
        }
    }
    if let Some(target) = room.round.votes.remove(old_id) {
        room.round.votes.insert(new_id.to_string(), target);
    }
    for target in room.round.votes.values_mut() {
        if let VoteTarget::Player(id) = target {
            if id == old_id {
                *id = new_id.to_string();
            }
        }
    }
}

impl AppState {
    /// Reattach a returning player to their seat by display name. A name
    /// nobody holds joins fresh instead, as a spectator if a game is
    /// already running. Returns the room snapshot sent to everyone.
    pub async fn rejoin_room(
        &self,
        room_id: &str,
        new_conn: &str,
        player_name: &str,
    ) -> Result<Room, GameError> {
        let matched_old_id;
        let snapshot;
        {
            let mut rooms = self.rooms.write().await;
            let Some(room) = rooms.get_mut(room_id) else {
                return Err(GameError::RoomNotFound(room_id.to_string()));
            };

            matched_old_id = room
                .players
                .iter()
                .find(|p| p.name == player_name)
                .map(|p| p.id.clone());

            match &matched_old_id {
                Some(old_id) => {
                    migrate_identity(room, old_id, new_conn);
                    // No dealt word in a running game means the round
                    // started without them
                    if room.status == RoomStatus::Playing
                        && !room.round.word_map.contains_key(new_conn)
                    {
                        if let Some(player) = room.player_mut(new_conn) {
                            player.alive = false;
                        }
                    }
                    tracing::info!(
                        room_id,
                        player_name,
                        old_id = %old_id,
                        new_id = new_conn,
                        "Player reconnected"
                    );
                }
                None => {
                    let mut player = Player::new(new_conn, player_name);
                    player.alive = !room.game_started;
                    room.players.push(player);
                    room.ensure_host();
                    tracing::info!(
                        room_id,
                        player_name,
                        conn_id = new_conn,
                        "Unknown name on rejoin, joined as new player"
                    );
                }
            }

            snapshot = room.clone();
            self.send_to_room(
                room,
                &ServerMessage::RoomUpdated {
                    room: snapshot.clone(),
                },
            )
            .await;
        }

        if let Some(old_id) = matched_old_id {
            self.cancel_grace_timer(&old_id).await;
        }
        Ok(snapshot)
    }

    /// Called when a websocket closes. The seat is held for the configured
    /// grace period; only when it expires does the player actually leave.
    pub async fn handle_disconnect(&self, conn_id: &str) {
        self.unregister_connection(conn_id).await;

        let in_any_room = {
            let rooms = self.rooms.read().await;
            rooms.values().any(|r| r.contains(conn_id))
        };
        if !in_any_room {
            return;
        }

        let grace = self.config.grace_period;
        tracing::info!(
            conn_id,
            grace_secs = grace.as_secs(),
            "Player disconnected, holding seat"
        );
        let state = self.clone();
        let id = conn_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            tracing::info!(conn_id = %id, "Grace period expired, removing player");
            state.grace_timers.write().await.remove(&id);
            state.remove_from_all_rooms(&id).await;
        });
        let previous = self
            .grace_timers
            .write()
            .await
            .insert(conn_id.to_string(), handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    pub async fn cancel_grace_timer(&self, conn_id: &str) {
        if let Some(handle) = self.grace_timers.write().await.remove(conn_id) {
            handle.abort();
            tracing::debug!(conn_id, "Grace timer cancelled");
        }
    }
}
