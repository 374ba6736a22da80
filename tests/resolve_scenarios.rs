//! End-to-end resolution scenarios against small hand-built libraries.

use playmatch::catalog::{CatalogIndexSet, FacetHit};
use playmatch::config::ResolverConfig;
use playmatch::library::FileLibrary;
use playmatch::models::{CatalogMatch, Facet, LibrarySnapshot, Playlist, Track, TrackKind};
use playmatch::normalize::normalize;
use playmatch::playback::{PlaybackAction, PlaybackQueue, RecordingController};
use playmatch::resolve::{resolve, Ranker, Resolver};
use playmatch::session::{PlayOutcome, Session};

fn adele_library() -> LibrarySnapshot {
    LibrarySnapshot {
        tracks: vec![
            Track::file("Hello", "Adele", "25", 1),
            Track::file("Rolling in the Deep", "Adele", "21", 1),
            Track::file("Someone Like You", "Adele", "21", 11),
            Track::file("Set Fire to the Rain", "Adele", "21", 5),
            Track::file("Ironic", "Alanis Morissette", "Jagged Little Pill", 10),
        ],
        playlists: vec![Playlist::named("Road Trip"), Playlist::named("Library")],
    }
}

fn build(snapshot: &LibrarySnapshot) -> CatalogIndexSet {
    CatalogIndexSet::build(snapshot, &ResolverConfig::default())
}

#[test]
fn test_road_trip_and_adele() {
    let catalog = build(&adele_library());

    let road_trip = resolve("road trip", &catalog).unwrap();
    assert_eq!(
        road_trip.matched,
        CatalogMatch::Playlist {
            name: "Road Trip".to_string()
        }
    );
    assert_eq!(road_trip.trace_line(), "\"road trip\" to playlist \"Road Trip\"");

    let adele = resolve("adele", &catalog).unwrap();
    assert_eq!(
        adele.matched,
        CatalogMatch::Artist {
            name: "Adele".to_string()
        }
    );
    assert_eq!(adele.score, 0.0);
}

#[test]
fn test_playlist_alias_variants() {
    let catalog = build(&adele_library());
    for phrase in ["playlist road trip", "road trip playlist", "Road   Trip"] {
        let resolution = resolve(phrase, &catalog).unwrap();
        assert_eq!(resolution.facet(), Facet::Playlist, "{}", phrase);
        assert_eq!(resolution.score, -1.0, "{}", phrase);
    }
}

#[test]
fn test_album_by_artist_prefers_album_artist() {
    let catalog = build(&adele_library());
    let resolution = resolve("21 by adele", &catalog).unwrap();
    assert_eq!(
        resolution.matched,
        CatalogMatch::AlbumArtist {
            album: "21".to_string(),
            artist: "Adele".to_string()
        }
    );
    assert_eq!(resolution.trace_line(), "\"21 by adele\" to album_artist \"21 & Adele\"");
    assert_eq!(
        resolution.alias_parts(),
        Some(("21".to_string(), "adele".to_string()))
    );
}

#[test]
fn test_song_by_artist() {
    let catalog = build(&adele_library());
    let resolution = resolve("Someone Like You by Adele", &catalog).unwrap();
    assert_eq!(
        resolution.matched,
        CatalogMatch::SongArtist {
            song: "Someone Like You".to_string(),
            artist: "Adele".to_string()
        }
    );
}

#[test]
fn test_without_songs_never_matches_songs() {
    let config = ResolverConfig {
        include_songs: false,
        ..ResolverConfig::default()
    };
    let catalog = CatalogIndexSet::build(&adele_library(), &config);
    assert!(catalog.is_empty(Facet::Song));
    assert!(catalog.is_empty(Facet::SongArtist));
    assert!(catalog.lookup(Facet::Song, "hello").is_none());

    for phrase in ["hello", "song hello", "hello by adele", "", "by"] {
        if let Some(resolution) = resolve(phrase, &catalog) {
            assert!(
                !matches!(resolution.facet(), Facet::Song | Facet::SongArtist),
                "{} resolved to {}",
                phrase,
                resolution.trace_line()
            );
        }
    }

    // Album-artist still works
    let resolution = resolve("21 by adele", &catalog).unwrap();
    assert_eq!(resolution.facet(), Facet::AlbumArtist);
}

#[test]
fn test_exact_aliases_score_zero() {
    let catalog = build(&adele_library());
    let cases = [
        (Facet::Artist, "artist adele"),
        (Facet::Album, "album jagged little pill"),
        (Facet::Song, "song set fire to the rain"),
        (Facet::AlbumArtist, "album 21 & adele"),
        (Facet::SongArtist, "hello & adele"),
        (Facet::Playlist, "playlist road trip"),
    ];
    for (facet, alias) in cases {
        let hit = catalog.lookup(facet, alias).unwrap();
        assert_eq!(hit.score, 0.0, "{} {}", facet, alias);
        assert_eq!(hit.alias, alias);
    }
}

#[test]
fn test_case_and_whitespace_invariance() {
    let catalog = build(&adele_library());
    let lower = resolve("road trip", &catalog).unwrap();
    let upper = resolve("  ROAD   TRIP ", &catalog).unwrap();
    assert_eq!(lower.matched, upper.matched);
    assert_eq!(lower.score, upper.score);
    assert_eq!(normalize("Road Trip"), normalize("ROAD TRIP"));
}

#[test]
fn test_excluded_playlist_not_indexed() {
    let catalog = build(&adele_library());
    // "Library" is a pseudo-playlist; the query falls through to another facet
    let resolution = resolve("library", &catalog).unwrap();
    assert_ne!(resolution.facet(), Facet::Playlist);
    assert_eq!(catalog.stats().playlists, 1);
}

#[test]
fn test_non_file_kinds_never_resolve() {
    let mut snapshot = adele_library();
    snapshot.tracks.push(Track {
        kind: TrackKind::from("podcast"),
        ..Track::file("Episode 1", "Some Podcast", "Season 1", 1)
    });
    let catalog = build(&snapshot);
    let resolution = resolve("some podcast", &catalog).unwrap();
    assert_ne!(
        resolution.matched,
        CatalogMatch::Artist {
            name: "Some Podcast".to_string()
        }
    );
}

#[test]
fn test_nickname_resolves_to_artist() {
    let catalog = build(&adele_library());
    let resolution = resolve("the wet cat", &catalog).unwrap();
    assert_eq!(
        resolution.matched,
        CatalogMatch::Artist {
            name: "Alanis Morissette".to_string()
        }
    );
}

#[test]
fn test_multi_by_reaches_second_split() {
    let snapshot = LibrarySnapshot {
        tracks: vec![Track::file("Stand by Me", "Ben E. King", "Don't Play That Song", 1)],
        playlists: vec![],
    };
    let catalog = build(&snapshot);
    let resolution = resolve("stand by me by ben e. king", &catalog).unwrap();
    assert_eq!(resolution.facet(), Facet::SongArtist);
    assert_eq!(resolution.score, 0.0);
}

#[test]
fn test_certain_match_is_never_overridden() {
    let mut ranker = Ranker::new();
    ranker.consider(Facet::Playlist, || {
        Some(FacetHit {
            score: 0.0,
            alias: "road trip".to_string(),
            matched: CatalogMatch::Playlist {
                name: "Road Trip".to_string(),
            },
        })
    });
    let ran = ranker.consider(Facet::Artist, || {
        Some(FacetHit {
            score: -50.0,
            alias: "adele".to_string(),
            matched: CatalogMatch::Artist {
                name: "Adele".to_string(),
            },
        })
    });
    assert!(!ran);
    let (facet, hit) = ranker.into_best().unwrap();
    assert_eq!(facet, Facet::Playlist);
    assert_eq!(hit.score, 0.0);
}

#[test]
fn test_exact_playlist_hit_is_final() {
    // Every single facet and the album-artist facet hold an exact alias for the query
    let snapshot = LibrarySnapshot {
        tracks: vec![
            Track::file("Adele", "Adele", "Adele", 1),
            Track::file("21 by Adele", "Adele", "21 by Adele", 1),
        ],
        playlists: vec![Playlist::named("Adele"), Playlist::named("21 by Adele")],
    };
    let catalog = build(&snapshot);
    for facet in [Facet::Artist, Facet::Album, Facet::Song] {
        assert_eq!(catalog.lookup(facet, "adele").unwrap().score, 0.0);
    }
    assert_eq!(catalog.lookup(Facet::AlbumArtist, "21 & adele").unwrap().score, 0.0);

    // Without the bias the playlist only ties, and still nothing later replaces it
    for resolver in [Resolver::default(), Resolver::new(0.0)] {
        for phrase in ["adele", "21 by adele"] {
            let resolution = resolver.resolve(phrase, &catalog).unwrap();
            assert_eq!(resolution.facet(), Facet::Playlist, "{}", phrase);
            assert!(resolution.score <= 0.0);
        }
    }
}

#[test]
fn test_album_queue_order() {
    let session = Session::new(adele_library(), ResolverConfig::default());
    let mut controller = RecordingController::new();

    let outcome = session.play("album 21", &mut controller).unwrap();
    let PlayOutcome::Played { queue, .. } = outcome else {
        panic!("expected a played outcome");
    };
    let PlaybackQueue::Tracks(tracks) = queue else {
        panic!("expected tracks");
    };
    let numbers: Vec<u32> = tracks.iter().map(|t| t.track_number).collect();
    assert_eq!(numbers, vec![1, 5, 11]);
}

#[test]
fn test_file_library_goes_stale_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(&path, serde_json::to_string(&adele_library()).unwrap()).unwrap();

    let session = Session::new(FileLibrary::new(&path), ResolverConfig::default());
    let mut controller = RecordingController::new();
    assert_eq!(session.catalog().unwrap().stats().playlists, 1);

    // The playlist is deleted from the library behind the catalog's back
    let mut changed = adele_library();
    changed.playlists.retain(|p| p.name != "Road Trip");
    std::fs::write(&path, serde_json::to_string(&changed).unwrap()).unwrap();

    let outcome = session.play("road trip", &mut controller).unwrap();
    assert!(matches!(outcome, PlayOutcome::Stale { .. }));
    assert!(controller.actions.is_empty());
    assert_eq!(session.catalog().unwrap().stats().playlists, 0);

    // After the rebuild the phrase resolves elsewhere and plays
    let outcome = session.play("road trip", &mut controller).unwrap();
    match outcome {
        PlayOutcome::Played { resolution, .. } => assert_ne!(resolution.facet(), Facet::Playlist),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(matches!(controller.last(), Some(PlaybackAction::Tracks(_))));
}
