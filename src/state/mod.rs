mod deal;
mod game;
mod rejoin;
mod room;
mod vote;

use crate::config::ServerConfig;
use crate::protocol::ServerMessage;
use crate::types::*;
use crate::wordlist::WordListStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<RoomId, Room>>>,
    /// Outbound message channel per connected client
    pub connections: Arc<RwLock<HashMap<ConnId, mpsc::UnboundedSender<ServerMessage>>>>,
    /// Pending disconnect grace timers, keyed by the vanished connection id
    pub grace_timers: Arc<RwLock<HashMap<ConnId, JoinHandle<()>>>>,
    pub words: Arc<WordListStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(words: Arc<WordListStore>, config: ServerConfig) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            connections: Arc::new(RwLock::new(HashMap::new())),
            grace_timers: Arc::new(RwLock::new(HashMap::new())),
            words,
            config: Arc::new(config),
        }
    }

    /// Register a connection's outbox; the receiver side feeds the socket
    pub async fn register_connection(
        &self,
        conn_id: &str,
    ) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections
            .write()
            .await
            .insert(conn_id.to_string(), tx);
        rx
    }

    pub async fn unregister_connection(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Fire-and-forget send to a single connection. A missing or closed
    /// receiver is dropped silently.
    pub async fn send_to_connection(&self, conn_id: &str, msg: ServerMessage) {
        let connections = self.connections.read().await;
        if let Some(tx) = connections.get(conn_id) {
            let _ = tx.send(msg);
        }
    }

    /// Fire-and-forget send to every player of a room
    pub async fn send_to_room(&self, room: &Room, msg: &ServerMessage) {
        let connections = self.connections.read().await;
        for player in &room.players {
            if let Some(tx) = connections.get(&player.id) {
                let _ = tx.send(msg.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlist;

    pub(crate) async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let words = Arc::new(WordListStore::load(dir.path().join("wordlists.json")).await);
        // Single fixed-order pair makes dealt words predictable in tests
        words
            .replace(wordlist::FIXED_ORDER_LIST, vec!["river,lake".to_string()])
            .await;
        (AppState::new(words, ServerConfig::default()), dir)
    }

    #[tokio::test]
    async fn test_send_to_unknown_connection_is_silent() {
        let (state, _dir) = test_state().await;
        state
            .send_to_connection("ghost", ServerMessage::VoteTie)
            .await;
    }

    #[tokio::test]
    async fn test_outbox_round_trip() {
        let (state, _dir) = test_state().await;
        let mut rx = state.register_connection("c1").await;

        state
            .send_to_connection("c1", ServerMessage::StartNextVote)
            .await;
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::StartNextVote)));

        state.unregister_connection("c1").await;
        state
            .send_to_connection("c1", ServerMessage::StartNextVote)
            .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_room_reaches_every_member() {
        let (state, _dir) = test_state().await;
        let mut rx_a = state.register_connection("a").await;
        let mut rx_b = state.register_connection("b").await;

        let mut room = Room::new("r1", "a", "Alice", "default".to_string());
        room.players.push(Player::new("b", "Bob"));

        state.send_to_room(&room, &ServerMessage::VoteTie).await;
        assert!(matches!(rx_a.try_recv(), Ok(ServerMessage::VoteTie)));
        assert!(matches!(rx_b.try_recv(), Ok(ServerMessage::VoteTie)));
    }
}
