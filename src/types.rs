use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Opaque ID types for type safety
pub type ConnId = String;
pub type RoomId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Civilian,
    Spy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Connection id; replaced when the player reconnects
    pub id: ConnId,
    /// Display name, stable across reconnects and used as the rejoin key
    pub name: String,
    pub role: Option<Role>,
    pub alive: bool,
    #[serde(default)]
    pub in_punishment: bool,
}

impl Player {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: None,
            alive: false,
            in_punishment: false,
        }
    }
}

/// One player's secret for the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAssignment {
    pub word: String,
    pub role: Role,
    /// Recorded so a reconnecting player can be matched to their word even
    /// after their connection id changed
    pub player_name: String,
}

/// A vote's target: another player's connection id, or the abstain sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTarget {
    Player(ConnId),
    Abstain,
}

impl VoteTarget {
    /// Wire sentinel clients send instead of a player id
    pub const ABSTAIN: &'static str = "abstain";

    pub fn from_wire(raw: &str) -> Self {
        if raw == Self::ABSTAIN {
            VoteTarget::Abstain
        } else {
            VoteTarget::Player(raw.to_string())
        }
    }
}

/// Per-round state owned by its room, never serialized to clients.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// Player id -> dealt word and role; replaced wholesale on every deal
    pub word_map: HashMap<ConnId, WordAssignment>,
    /// Connection ids of the current spies, captured at assignment time so
    /// later list reordering cannot desynchronize roles
    pub spy_ids: HashSet<ConnId>,
    /// Voter id -> target; cleared after every resolution
    pub votes: HashMap<ConnId, VoteTarget>,
}

impl RoundState {
    pub fn clear(&mut self) {
        self.word_map.clear();
        self.spy_ids.clear();
        self.votes.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub host: ConnId,
    pub list_name: String,
    /// Insertion order is meaningful: role assignment is by index
    pub players: Vec<Player>,
    pub status: RoomStatus,
    pub game_started: bool,
    pub voting_started: bool,
    #[serde(skip)]
    pub round: RoundState,
}

impl Room {
    pub fn new(id: &str, host_id: &str, host_name: &str, list_name: String) -> Self {
        Self {
            id: id.to_string(),
            host: host_id.to_string(),
            list_name,
            players: vec![Player::new(host_id, host_name)],
            status: RoomStatus::Waiting,
            game_started: false,
            voting_started: false,
            round: RoundState::default(),
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Living (civilians, spies)
    pub fn alive_count_by_role(&self) -> (usize, usize) {
        let mut civilians = 0;
        let mut spies = 0;
        for player in self.players.iter().filter(|p| p.alive) {
            match player.role {
                Some(Role::Civilian) => civilians += 1,
                Some(Role::Spy) => spies += 1,
                None => {}
            }
        }
        (civilians, spies)
    }

    /// Promote the first player if the recorded host is no longer present
    pub fn ensure_host(&mut self) {
        if self.players.is_empty() {
            return;
        }
        if !self.players.iter().any(|p| p.id == self.host) {
            self.host = self.players[0].id.clone();
        }
    }
}
