//! Catalog index set: the six fuzzy indexes built from one library snapshot.
//!
//! A catalog is immutable once built. Refreshing means building a new one and
//! swapping it into a [`CatalogHandle`]; readers holding the previous `Arc`
//! finish against the old catalog and never see a half-built one.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info};

use crate::compound;
use crate::config::ResolverConfig;
use crate::fuzzy::FuzzyIndex;
use crate::models::{CatalogMatch, Facet, LibrarySnapshot};
use crate::normalize::Normalizer;

/// A (thing, artist) pair in display case.
pub type Pair = (String, String);

/// Distinct entities indexed per facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub songs: usize,
    pub albums: usize,
    pub artists: usize,
    pub playlists: usize,
}

/// Best hit from one facet index, with the facet payload already typed.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetHit {
    pub score: f64,
    pub alias: String,
    pub matched: CatalogMatch,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogIndexSet {
    normalizer: Normalizer,
    songs: FuzzyIndex<String>,
    albums: FuzzyIndex<String>,
    artists: FuzzyIndex<String>,
    playlists: FuzzyIndex<String>,
    song_artists: FuzzyIndex<Pair>,
    album_artists: FuzzyIndex<Pair>,
    stats: CatalogStats,
}

impl CatalogIndexSet {
    /// Build every index from `snapshot`.
    ///
    /// Song and SongArtist stay empty when `config.include_songs` is false.
    pub fn build(snapshot: &LibrarySnapshot, config: &ResolverConfig) -> Self {
        let start = Instant::now();
        let normalizer = config.normalizer();
        let include_songs = config.include_songs;

        let nicknames: FxHashMap<String, Vec<String>> = config
            .artist_nicknames
            .iter()
            .map(|(artist, aliases)| {
                let aliases = aliases
                    .iter()
                    .map(|a| normalizer.normalize(a))
                    .filter(|a| !a.is_empty())
                    .collect();
                (normalizer.normalize(artist), aliases)
            })
            .collect();

        let mut catalog = Self {
            normalizer,
            ..Self::default()
        };

        let mut songs = FxHashSet::default();
        let mut albums = FxHashSet::default();
        let mut artists = FxHashSet::default();
        let mut playlists = FxHashSet::default();

        for track in snapshot.playable_tracks() {
            let song_key = catalog.normalizer.normalize(&track.name);
            let artist_key = catalog.normalizer.normalize(&track.artist);
            let album_key = catalog.normalizer.normalize(&track.album);

            if !artist_key.is_empty() {
                catalog.artists.insert(artist_key.clone(), track.artist.clone());
                catalog
                    .artists
                    .insert(format!("artist {}", artist_key), track.artist.clone());
                if let Some(aliases) = nicknames.get(&artist_key) {
                    for alias in aliases {
                        catalog.artists.insert(alias.clone(), track.artist.clone());
                    }
                }
                artists.insert(track.artist.as_str());
            }

            if include_songs && !song_key.is_empty() {
                catalog.songs.insert(song_key.clone(), track.name.clone());
                catalog
                    .songs
                    .insert(format!("song {}", song_key), track.name.clone());
                songs.insert(track.name.as_str());

                if !artist_key.is_empty() {
                    let joined = compound::join(&song_key, &artist_key);
                    let pair = (track.name.clone(), track.artist.clone());
                    catalog.song_artists.insert(format!("song {}", joined), pair.clone());
                    catalog.song_artists.insert(joined, pair);
                }
            }

            if !album_key.is_empty() {
                catalog.albums.insert(album_key.clone(), track.album.clone());
                catalog
                    .albums
                    .insert(format!("album {}", album_key), track.album.clone());
                albums.insert(track.album.as_str());

                if !artist_key.is_empty() {
                    let joined = compound::join(&album_key, &artist_key);
                    let pair = (track.album.clone(), track.artist.clone());
                    catalog.album_artists.insert(format!("album {}", joined), pair.clone());
                    catalog.album_artists.insert(joined, pair);
                }
            }
        }

        for playlist in &snapshot.playlists {
            if config.is_excluded_playlist(&playlist.name) {
                continue;
            }
            let key = catalog.normalizer.normalize(&playlist.name);
            if key.is_empty() {
                continue;
            }
            catalog.playlists.insert(key.clone(), playlist.name.clone());
            catalog
                .playlists
                .insert(format!("playlist {}", key), playlist.name.clone());
            catalog
                .playlists
                .insert(format!("{} playlist", key), playlist.name.clone());
            playlists.insert(playlist.name.as_str());
        }

        catalog.stats = CatalogStats {
            songs: songs.len(),
            albums: albums.len(),
            artists: artists.len(),
            playlists: playlists.len(),
        };

        if include_songs {
            info!(songs = catalog.stats.songs, "Indexed songs");
        }
        info!(
            albums = catalog.stats.albums,
            artists = catalog.stats.artists,
            playlists = catalog.stats.playlists,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Catalog built"
        );
        for facet in Facet::ALL {
            debug!(facet = %facet, aliases = catalog.alias_count(facet), "Index size");
        }

        catalog
    }

    /// Normalizer the aliases were built with. Queries must use the same one.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn stats(&self) -> CatalogStats {
        self.stats
    }

    /// Alias count of the index backing `facet`.
    pub fn alias_count(&self, facet: Facet) -> usize {
        match facet {
            Facet::Song => self.songs.len(),
            Facet::Album => self.albums.len(),
            Facet::Artist => self.artists.len(),
            Facet::Playlist => self.playlists.len(),
            Facet::SongArtist => self.song_artists.len(),
            Facet::AlbumArtist => self.album_artists.len(),
        }
    }

    pub fn is_empty(&self, facet: Facet) -> bool {
        self.alias_count(facet) == 0
    }

    /// Nearest alias in the index for `facet`, raw score (no bias).
    /// `query` must already be normalized (or joined from normalized parts).
    pub fn lookup(&self, facet: Facet, query: &str) -> Option<FacetHit> {
        let single = |index: &FuzzyIndex<String>, wrap: fn(String) -> CatalogMatch| {
            index.get(query).map(|hit| FacetHit {
                score: hit.score,
                alias: hit.alias.to_string(),
                matched: wrap(hit.value.clone()),
            })
        };
        let paired = |index: &FuzzyIndex<Pair>, wrap: fn(Pair) -> CatalogMatch| {
            index.get(query).map(|hit| FacetHit {
                score: hit.score,
                alias: hit.alias.to_string(),
                matched: wrap(hit.value.clone()),
            })
        };

        let hit = match facet {
            Facet::Song => single(&self.songs, |name| CatalogMatch::Song { name }),
            Facet::Album => single(&self.albums, |name| CatalogMatch::Album { name }),
            Facet::Artist => single(&self.artists, |name| CatalogMatch::Artist { name }),
            Facet::Playlist => single(&self.playlists, |name| CatalogMatch::Playlist { name }),
            Facet::SongArtist => paired(&self.song_artists, |(song, artist)| {
                CatalogMatch::SongArtist { song, artist }
            }),
            Facet::AlbumArtist => paired(&self.album_artists, |(album, artist)| {
                CatalogMatch::AlbumArtist { album, artist }
            }),
        };

        if let Some(ref h) = hit {
            debug!(facet = %facet, query, alias = %h.alias, score = h.score, "Facet lookup");
        }
        hit
    }
}

// ============================================================================
// Atomic swap handle
// ============================================================================

/// Shared slot holding the current catalog.
///
/// Single writer: `replace` swaps in a fully built catalog in one step.
/// Readers clone the `Arc` and keep using it for the whole resolution.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Option<Arc<CatalogIndexSet>>>,
}

impl CatalogHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current catalog, or `None` before the first build.
    pub fn current(&self) -> Option<Arc<CatalogIndexSet>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new catalog, returning the previous one.
    pub fn replace(&self, catalog: CatalogIndexSet) -> Option<Arc<CatalogIndexSet>> {
        self.replace_arc(Arc::new(catalog))
    }

    /// Swap in an already shared catalog.
    pub fn replace_arc(&self, catalog: Arc<CatalogIndexSet>) -> Option<Arc<CatalogIndexSet>> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(catalog)
    }

    /// Drop the current catalog so the next use rebuilds it.
    pub fn invalidate(&self) {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

// ============================================================================
// Tests
// ============================================================================
