use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Messages clients send over the WebSocket.
///
/// The wire format keeps the historical shape: kebab-case event names in the
/// `t` tag, camelCase payload fields. The voter/requester identity is always
/// the sending connection and never part of the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "kebab-case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        room_id: RoomId,
        name: String,
        /// Preselect a word list; falls back to the default list if unknown
        #[serde(default)]
        list_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomId, name: String },
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    RejoinRoom { room_id: RoomId, player_name: String },
    #[serde(rename_all = "camelCase")]
    CheckRoomStatus { room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    KickPlayer { room_id: RoomId, player_id: ConnId },
    #[serde(rename_all = "camelCase")]
    ChangeList { room_id: RoomId, list_name: String },
    #[serde(rename_all = "camelCase")]
    StartGame { room_id: RoomId, spy_count: usize },
    /// `to_id` is a player's connection id or the literal "abstain"
    #[serde(rename_all = "camelCase")]
    SubmitVote { room_id: RoomId, to_id: String },
    #[serde(rename_all = "camelCase")]
    ToggleVisibility { room_id: RoomId, visible: bool },
    #[serde(rename_all = "camelCase")]
    ResetGame { room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    PunishmentCompleted { room_id: RoomId },
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Welcome; tells the client the connection id the server will know it by
    #[serde(rename_all = "camelCase")]
    Connected { conn_id: ConnId, server_now: String },
    #[serde(rename_all = "camelCase")]
    RoomUpdated { room: Room },
    /// Reply to a create attempt with a taken room id
    RoomExists,
    #[serde(rename_all = "camelCase")]
    RoomStatus {
        exists: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<RoomStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        player_count: Option<usize>,
    },
    KickedFromRoom,
    #[serde(rename_all = "camelCase")]
    GameStarted { room: Room },
    /// Private: the receiving player's own word and role, nobody else's
    #[serde(rename_all = "camelCase")]
    DealWords { word: String, role: Role },
    /// Private to each living player after a mid-round elimination
    StartNextVote,
    VoteTie,
    #[serde(rename_all = "camelCase")]
    SpyEliminated { eliminated_id: ConnId },
    SpyWin,
    /// Full reveal: every dealt word and role, keyed by player id
    #[serde(rename_all = "camelCase")]
    RoundSummary {
        summary: HashMap<ConnId, WordAssignment>,
    },
    #[serde(rename_all = "camelCase")]
    VisibilityUpdated { visible: bool },
    #[serde(rename_all = "camelCase")]
    GameError { message: String },
    #[serde(rename_all = "camelCase")]
    RejoinSuccess { room: Room },
    #[serde(rename_all = "camelCase")]
    RejoinFailed { message: String },
}
