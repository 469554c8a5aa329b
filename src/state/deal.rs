use rand::Rng;
use std::collections::HashSet;

use crate::error::GameError;
use crate::types::*;

/// Draw `spy_count` distinct player indices uniformly from `[0, player_count)`.
///
/// Callers must uphold `0 < spy_count < player_count`; the loop only
/// terminates under that precondition.
pub(crate) fn assign_spy_indices(player_count: usize, spy_count: usize) -> HashSet<usize> {
    debug_assert!(spy_count > 0 && spy_count < player_count);
    let mut rng = rand::rng();
    let mut indices = HashSet::new();
    while indices.len() < spy_count {
        indices.insert(rng.random_range(0..player_count));
    }
    indices
}

/// Pick a random entry from the list and split it into
/// `(civilian word, spy word)`.
///
/// Every entry must be exactly two non-empty comma-separated words, not just
/// the drawn one: a malformed entry is a data problem better surfaced at
/// start. A coin flip decides which word goes to which side unless
/// `keep_order` is set, in which case the first word is always the
/// civilians'.
pub(crate) fn draw_pair(
    list_name: &str,
    entries: &[String],
    keep_order: bool,
) -> Result<(String, String), GameError> {
    if entries.is_empty() {
        return Err(GameError::ListUnavailable(list_name.to_string()));
    }

    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        match split_pair(entry) {
            Some(pair) => pairs.push(pair),
            None => {
                return Err(GameError::MalformedPair {
                    list: list_name.to_string(),
                    entry: entry.clone(),
                })
            }
        }
    }

    let mut rng = rand::rng();
    let (first, second) = pairs[rng.random_range(0..pairs.len())];
    let swap = !keep_order && rng.random_bool(0.5);
    if swap {
        Ok((second.to_string(), first.to_string()))
    } else {
        Ok((first.to_string(), second.to_string()))
    }
}

fn split_pair(entry: &str) -> Option<(&str, &str)> {
    let mut tokens = entry.split(',');
    let first = tokens.next()?;
    let second = tokens.next()?;
    if tokens.next().is_some() || first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first, second))
}

/// Record one word per living player from their assigned role
pub(crate) fn deal_words(room: &mut Room, civilian_word: &str, spy_word: &str) {
    room.round.word_map.clear();
    for player in &room.players {
        if !player.alive {
            continue;
        }
        let Some(role) = player.role else {
            continue;
        };
        let word = match role {
            Role::Spy => spy_word,
            Role::Civilian => civilian_word,
        };
        room.round.word_map.insert(
            player.id.clone(),
            WordAssignment {
                word: word.to_string(),
                role,
                player_name: player.name.clone(),
            },
        );
    }
}
