//! Property-based tests for lineup rules and link normalization
//!
//! Uses proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use walkup_core::{
    available_players, move_within, normalize, validate_order, MusicRef, Player, PlayerId,
    SourceKind,
};

// ===== Helpers =====

fn roster_of(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| Player {
            id: PlayerId::new(i.to_string()),
            name: format!("Player {i}"),
            number: i.to_string(),
            walkup_music: MusicRef::embedded(SourceKind::Spotify, "t", "u", 0, 10),
        })
        .collect()
}

fn arbitrary_kind() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::Spotify),
        Just(SourceKind::YouTube),
        Just(SourceKind::Local),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: any sequence of drops keeps the lineup duplicate-free and
    /// available ∪ lineup = roster, available ∩ lineup = ∅
    #[test]
    fn drops_keep_lineup_and_available_partitioned(
        roster_size in 1usize..12,
        moves in prop::collection::vec((0usize..12, 0usize..14), 1..40)
    ) {
        let roster = roster_of(roster_size);
        let mut lineup: Vec<PlayerId> = Vec::new();

        for (who, target) in moves {
            let id = PlayerId::new((who % roster_size).to_string());
            move_within(&mut lineup, &id, target);

            let unique: HashSet<&PlayerId> = lineup.iter().collect();
            prop_assert_eq!(unique.len(), lineup.len(), "lineup has duplicates");
            prop_assert!(validate_order(&roster, &lineup).is_ok());

            let available = available_players(&roster, &lineup);
            let available_ids: HashSet<&PlayerId> = available.iter().map(|p| &p.id).collect();
            prop_assert!(available_ids.is_disjoint(&unique));
            prop_assert_eq!(available.len() + lineup.len(), roster.len());
        }
    }

    /// Property: dropping the same player onto the same slot twice changes
    /// nothing the second time
    #[test]
    fn repeated_drop_is_idempotent(
        roster_size in 1usize..10,
        who in 0usize..10,
        target in 0usize..12
    ) {
        let mut lineup: Vec<PlayerId> = roster_of(roster_size)
            .into_iter()
            .take(roster_size / 2)
            .map(|p| p.id)
            .collect();
        let id = PlayerId::new((who % roster_size).to_string());

        move_within(&mut lineup, &id, target);
        let after_first = lineup.clone();
        let index = lineup.iter().position(|p| p == &id).unwrap();

        prop_assert!(!move_within(&mut lineup, &id, index));
        prop_assert_eq!(&lineup, &after_first);
        prop_assert_eq!(lineup.iter().filter(|p| **p == id).count(), 1);
    }

    /// Property: normalization never panics, and unrecognised input is
    /// returned unchanged
    #[test]
    fn normalize_is_total(link in ".{0,80}", kind in arbitrary_kind()) {
        let out = normalize(&link, kind);
        if kind == SourceKind::Local {
            prop_assert_eq!(out, link);
        } else if out != link {
            prop_assert!(
                out.starts_with("https://open.spotify.com/embed/track/")
                    || out.starts_with("https://www.youtube.com/embed/")
            );
        }
    }

    /// Property: Spotify track ids survive the round trip through any
    /// sharing suffix
    #[test]
    fn spotify_track_id_extracted(id in "[A-Za-z0-9]{1,22}", suffix in "(\\?si=[a-z0-9]{0,8})?") {
        let link = format!("https://open.spotify.com/track/{id}{suffix}");
        prop_assert_eq!(
            normalize(&link, SourceKind::Spotify),
            format!("https://open.spotify.com/embed/track/{id}")
        );
    }

    /// Property: YouTube ids survive extra query parameters
    #[test]
    fn youtube_video_id_extracted(id in "[A-Za-z0-9_-]{1,11}", t in 0u32..600) {
        let link = format!("https://www.youtube.com/watch?v={id}&t={t}s");
        prop_assert_eq!(
            normalize(&link, SourceKind::YouTube),
            format!("https://www.youtube.com/embed/{id}")
        );
    }
}
