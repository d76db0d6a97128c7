//! Lineup rules
//!
//! Pure functions over a roster and an ordered lineup of player ids. The
//! store calls these after every mutation instead of keeping derived state.

use std::collections::HashSet;

use crate::error::{Result, WalkupError};
use crate::types::{Player, PlayerId};

/// Roster players not in the lineup, in roster order
pub fn available_players(roster: &[Player], lineup: &[PlayerId]) -> Vec<Player> {
    let in_lineup: HashSet<&PlayerId> = lineup.iter().collect();
    roster
        .iter()
        .filter(|player| !in_lineup.contains(&player.id))
        .cloned()
        .collect()
}

/// Check a proposed lineup order
///
/// Every id must belong to the roster and appear at most once.
pub fn validate_order(roster: &[Player], ids: &[PlayerId]) -> Result<()> {
    let known: HashSet<&PlayerId> = roster.iter().map(|p| &p.id).collect();
    let mut seen = HashSet::with_capacity(ids.len());

    for id in ids {
        if !known.contains(id) {
            return Err(WalkupError::invalid_lineup(format!(
                "player {id} is not on the roster"
            )));
        }
        if !seen.insert(id) {
            return Err(WalkupError::invalid_lineup(format!(
                "player {id} appears more than once"
            )));
        }
    }

    Ok(())
}

/// Move `id` to `target` within the lineup, inserting it if absent
///
/// Mirrors a drop onto slot `target`: when the player is already in the
/// lineup at a lower index the target shifts down by one once the player has
/// been lifted out. `target` is clamped to the lineup length.
///
/// Returns `true` if the lineup changed.
pub fn move_within(lineup: &mut Vec<PlayerId>, id: &PlayerId, target: usize) -> bool {
    match lineup.iter().position(|p| p == id) {
        Some(current) => {
            let mut index = target;
            if index > current {
                index -= 1;
            }
            let index = index.min(lineup.len() - 1);
            if index == current {
                return false;
            }
            let moved = lineup.remove(current);
            lineup.insert(index, moved);
            true
        }
        None => {
            let index = target.min(lineup.len());
            lineup.insert(index, id.clone());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MusicRef, SourceKind};

    fn player(id: &str) -> Player {
        Player {
            id: PlayerId::new(id),
            name: format!("Player {id}"),
            number: id.to_string(),
            walkup_music: MusicRef::embedded(SourceKind::YouTube, "t", "u", 0, 10),
        }
    }

    fn ids(values: &[&str]) -> Vec<PlayerId> {
        values.iter().map(|v| PlayerId::new(*v)).collect()
    }

    #[test]
    fn available_excludes_lineup_and_keeps_roster_order() {
        let roster = vec![player("1"), player("2"), player("3"), player("4")];
        let available = available_players(&roster, &ids(&["3", "1"]));
        let available_ids: Vec<&str> = available.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(available_ids, vec!["2", "4"]);
    }

    #[test]
    fn validate_rejects_unknown_ids() {
        let roster = vec![player("1"), player("2")];
        let err = validate_order(&roster, &ids(&["1", "9"])).unwrap_err();
        assert!(matches!(err, WalkupError::InvalidLineup(_)));
    }

    #[test]
    fn validate_rejects_duplicates() {
        let roster = vec![player("1"), player("2")];
        assert!(validate_order(&roster, &ids(&["1", "2", "1"])).is_err());
        assert!(validate_order(&roster, &ids(&["2", "1"])).is_ok());
    }

    #[test]
    fn move_inserts_new_player_at_target() {
        let mut lineup = ids(&["1", "2", "3"]);
        assert!(move_within(&mut lineup, &PlayerId::new("4"), 1));
        assert_eq!(lineup, ids(&["1", "4", "2", "3"]));
    }

    #[test]
    fn move_clamps_target_past_end() {
        let mut lineup = ids(&["1"]);
        assert!(move_within(&mut lineup, &PlayerId::new("2"), 99));
        assert_eq!(lineup, ids(&["1", "2"]));
    }

    #[test]
    fn move_down_adjusts_for_lifted_player() {
        let mut lineup = ids(&["1", "2", "3", "4"]);
        // Drop "1" onto slot 3 (before "4")
        assert!(move_within(&mut lineup, &PlayerId::new("1"), 3));
        assert_eq!(lineup, ids(&["2", "3", "1", "4"]));
    }

    #[test]
    fn move_up() {
        let mut lineup = ids(&["1", "2", "3", "4"]);
        assert!(move_within(&mut lineup, &PlayerId::new("4"), 0));
        assert_eq!(lineup, ids(&["4", "1", "2", "3"]));
    }

    #[test]
    fn move_to_current_position_is_noop() {
        let mut lineup = ids(&["1", "2", "3"]);
        assert!(!move_within(&mut lineup, &PlayerId::new("2"), 1));
        assert!(!move_within(&mut lineup, &PlayerId::new("2"), 2));
        assert_eq!(lineup, ids(&["1", "2", "3"]));
    }

    #[test]
    fn move_to_end_from_middle() {
        let mut lineup = ids(&["1", "2", "3"]);
        assert!(move_within(&mut lineup, &PlayerId::new("1"), 99));
        assert_eq!(lineup, ids(&["2", "3", "1"]));
    }
}
