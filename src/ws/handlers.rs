//! WebSocket message dispatch
//!
//! The sending connection is the player identity for every operation:
//! payloads never carry a trusted "who am I" field. Room traffic goes out
//! through the per-connection outboxes; the return value here is only for
//! direct replies to the sender.

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::VoteTarget;
use std::sync::Arc;

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    conn_id: &str,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Room membership
        ClientMessage::CreateRoom {
            room_id,
            name,
            list_name,
        } => match state
            .create_room(&room_id, conn_id, &name, list_name.as_deref())
            .await
        {
            Ok(()) => None,
            Err(GameError::RoomExists(_)) => Some(ServerMessage::RoomExists),
            Err(e) => Some(ServerMessage::GameError {
                message: e.to_string(),
            }),
        },

        ClientMessage::JoinRoom { room_id, name } => {
            state.join_room(&room_id, conn_id, &name).await;
            None
        }

        ClientMessage::LeaveRoom { room_id } => {
            state.leave_room(&room_id, conn_id).await;
            None
        }

        ClientMessage::RejoinRoom {
            room_id,
            player_name,
        } => match state.rejoin_room(&room_id, conn_id, &player_name).await {
            Ok(room) => Some(ServerMessage::RejoinSuccess { room }),
            Err(e) => Some(ServerMessage::RejoinFailed {
                message: e.to_string(),
            }),
        },

        ClientMessage::CheckRoomStatus { room_id } => Some(state.room_status(&room_id).await),

        ClientMessage::KickPlayer { room_id, player_id } => {
            state.kick_player(&room_id, conn_id, &player_id).await;
            None
        }

        ClientMessage::ChangeList { room_id, list_name } => {
            state.change_list(&room_id, &list_name).await;
            None
        }

        // Round control
        ClientMessage::StartGame { room_id, spy_count } => {
            match state.start_game(&room_id, conn_id, spy_count).await {
                Ok(()) => None,
                Err(e) => Some(ServerMessage::GameError {
                    message: e.to_string(),
                }),
            }
        }

        ClientMessage::SubmitVote { room_id, to_id } => {
            state
                .submit_vote(&room_id, conn_id, VoteTarget::from_wire(&to_id))
                .await;
            None
        }

        ClientMessage::ToggleVisibility { room_id, visible } => {
            state.toggle_visibility(&room_id, visible).await;
            None
        }

        ClientMessage::ResetGame { room_id } => {
            state.reset_game(&room_id, conn_id).await;
            None
        }

        ClientMessage::PunishmentCompleted { room_id } => {
            state.punishment_completed(&room_id, conn_id).await;
            None
        }
    }
}
