//! Built-in sample roster
//!
//! Loaded whenever no valid roster record exists.

use walkup_core::{MusicRef, Player, PlayerId, SourceKind};

fn sample(
    id: &str,
    name: &str,
    number: &str,
    kind: SourceKind,
    title: &str,
    url: &str,
    start: u32,
    end: u32,
) -> Player {
    Player {
        id: PlayerId::new(id),
        name: name.to_string(),
        number: number.to_string(),
        walkup_music: MusicRef::embedded(kind, title, url, start, end),
    }
}

/// The five sample players, ids `"1"` to `"5"`
pub fn sample_roster() -> Vec<Player> {
    vec![
        sample(
            "1",
            "Alex Johnson",
            "7",
            SourceKind::Spotify,
            "Eye of the Tiger - Survivor",
            "https://open.spotify.com/embed/track/2KH16WveTQWT6KOG9Rg6e2",
            15,
            30,
        ),
        sample(
            "2",
            "Brandon Smith",
            "12",
            SourceKind::YouTube,
            "We Will Rock You - Queen",
            "https://www.youtube.com/embed/zBUJztI884M",
            0,
            15,
        ),
        sample(
            "3",
            "Carlos Rodriguez",
            "24",
            SourceKind::Spotify,
            "Start Me Up - Rolling Stones",
            "https://open.spotify.com/embed/track/4JiEyzf0Md7KEFFGWDDdCr",
            5,
            20,
        ),
        sample(
            "4",
            "Daniel Wilson",
            "3",
            SourceKind::YouTube,
            "Welcome to the Jungle - Guns N' Roses",
            "https://www.youtube.com/embed/o1tj2zJ2Wvg",
            30,
            45,
        ),
        sample(
            "5",
            "Ethan Brown",
            "18",
            SourceKind::Spotify,
            "Thunderstruck - AC/DC",
            "https://open.spotify.com/embed/track/57bgtoPSgt236HzfBOd8kj",
            10,
            25,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkup_core::normalize;

    #[test]
    fn sample_ids_are_one_to_five() {
        let ids: Vec<String> = sample_roster()
            .into_iter()
            .map(|p| p.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn sample_urls_are_already_canonical() {
        for player in sample_roster() {
            let music = &player.walkup_music;
            assert_eq!(
                normalize(&music.canonical_url, music.source_kind),
                music.canonical_url
            );
            assert!(music.end_offset_seconds > music.start_offset_seconds);
        }
    }
}
