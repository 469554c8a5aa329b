use std::collections::HashMap;

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::*;

/// Outcome of tallying a complete vote set
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TallyOutcome {
    Tie,
    Eliminate(ConnId),
}

/// Count votes per target. Abstain is excluded from the candidate set but
/// its count participates in the tie rule: there must be a single top target
/// strictly above zero and at least as high as the abstain count.
pub(crate) fn tally(votes: &HashMap<ConnId, VoteTarget>) -> TallyOutcome {
    let mut counts: HashMap<&ConnId, usize> = HashMap::new();
    let mut abstain = 0usize;
    for target in votes.values() {
        match target {
            VoteTarget::Abstain => abstain += 1,
            VoteTarget::Player(id) => *counts.entry(id).or_insert(0) += 1,
        }
    }

    let max_votes = counts.values().copied().max().unwrap_or(0);
    if max_votes == 0 || abstain >= max_votes {
        return TallyOutcome::Tie;
    }

    let top_ids: Vec<&ConnId> = counts
        .iter()
        .filter(|(_, count)| **count == max_votes)
        .map(|(id, _)| *id)
        .collect();
    if top_ids.len() > 1 {
        return TallyOutcome::Tie;
    }
    TallyOutcome::Eliminate(top_ids[0].clone())
}

fn round_summary(room: &Room) -> ServerMessage {
    ServerMessage::RoundSummary {
        summary: room.round.word_map.clone(),
    }
}

impl AppState {
    /// Record a vote and resolve the round once every living player has
    /// voted. Votes from spectators, the dead, or outside an active vote are
    /// dropped; a repeat vote overwrites the previous one.
    pub async fn submit_vote(&self, room_id: &str, voter: &str, target: VoteTarget) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        if room.status != RoomStatus::Playing || !room.voting_started {
            return;
        }
        if !room.player(voter).map(|p| p.alive).unwrap_or(false) {
            return;
        }

        room.round.votes.insert(voter.to_string(), target);
        tracing::debug!(room_id, voter, "Vote recorded");

        let alive_count = room.alive_count();

        // With two alive players left, one of each role, the spy can no
        // longer be outvoted: the first vote ends the round.
        if alive_count == 2 {
            let (civilians, spies) = room.alive_count_by_role();
            if civilians == 1 && spies == 1 {
                self.finish_round(room, ServerMessage::SpyWin).await;
                return;
            }
        }

        if room.round.votes.len() < alive_count {
            return;
        }

        match tally(&room.round.votes) {
            TallyOutcome::Tie => {
                tracing::info!(room_id, "Vote tied, restarting vote");
                self.send_to_room(room, &ServerMessage::VoteTie).await;
                room.round.votes.clear();
            }
            TallyOutcome::Eliminate(eliminated_id) => {
                self.eliminate(room, &eliminated_id).await;
            }
        }
    }

    async fn eliminate(&self, room: &mut Room, eliminated_id: &str) {
        // A top-voted id that no longer maps to a living member resolves as
        // a tie: votes can outlive a leaver.
        let Some(role) = room
            .player(eliminated_id)
            .filter(|p| p.alive)
            .and_then(|p| p.role)
        else {
            self.send_to_room(room, &ServerMessage::VoteTie).await;
            room.round.votes.clear();
            return;
        };

        if role == Role::Spy {
            tracing::info!(room_id = %room.id, eliminated = eliminated_id, "Spy voted out");
            self.finish_round(
                room,
                ServerMessage::SpyEliminated {
                    eliminated_id: eliminated_id.to_string(),
                },
            )
            .await;
            return;
        }

        tracing::info!(room_id = %room.id, eliminated = eliminated_id, "Civilian voted out");
        if let Some(player) = room.player_mut(eliminated_id) {
            player.alive = false;
            if self.config.punishment_enabled {
                player.in_punishment = true;
            }
        }

        let (civilians, spies) = room.alive_count_by_role();
        if (civilians == 1 && spies == 1) || (civilians == 0 && spies == 1) {
            self.finish_round(room, ServerMessage::SpyWin).await;
            return;
        }

        // Round continues: only the eliminated player sees the reveal,
        // everyone still alive votes again.
        self.send_to_connection(eliminated_id, round_summary(room))
            .await;
        let alive_ids: Vec<ConnId> = room
            .players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id.clone())
            .collect();
        for id in &alive_ids {
            self.send_to_connection(id, ServerMessage::StartNextVote)
                .await;
        }
        if self.config.punishment_enabled {
            self.send_to_room(room, &ServerMessage::RoomUpdated { room: room.clone() })
                .await;
        }
        room.round.votes.clear();
    }

    /// Close the round: full reveal to the room, then the closing event
    async fn finish_round(&self, room: &mut Room, closing: ServerMessage) {
        room.status = RoomStatus::Finished;
        room.voting_started = false;
        self.send_to_room(room, &round_summary(room)).await;
        self.send_to_room(room, &closing).await;
        room.round.votes.clear();
    }
}
