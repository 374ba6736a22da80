//! Locating live library items for a resolved match.
//!
//! The catalog can lag behind the library. When nothing live matches a
//! resolution the catalog is stale: the caller rebuilds it and reports
//! "no playable match" instead of retrying.

use anyhow::Result;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::info;

use crate::models::{CatalogMatch, LibrarySnapshot, Track};

/// Amount `louder` / `quieter` change the volume by.
pub const VOLUME_STEP: i32 = 10;

/// What to hand the playback controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackQueue {
    /// An existing playlist, played by name.
    Playlist(String),
    /// Tracks to load into the working playlist, already ordered.
    Tracks(Vec<Track>),
}

impl PlaybackQueue {
    pub fn len(&self) -> usize {
        match self {
            PlaybackQueue::Playlist(_) => 1,
            PlaybackQueue::Tracks(tracks) => tracks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// No live item corresponds to the resolved match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("catalog is stale: no live item for {} \"{}\"", .matched.facet(), .matched.display_value())]
pub struct StaleCatalog {
    pub matched: CatalogMatch,
}

/// Queue order: artist, then album, then track number. Stable for equal keys.
pub fn queue_order(a: &Track, b: &Track) -> Ordering {
    a.artist
        .cmp(&b.artist)
        .then_with(|| a.album.cmp(&b.album))
        .then_with(|| a.track_number.cmp(&b.track_number))
}

/// Find what to play for `matched` in the live `snapshot`.
pub fn locate(matched: &CatalogMatch, snapshot: &LibrarySnapshot) -> Result<PlaybackQueue, StaleCatalog> {
    let queue = match matched {
        CatalogMatch::Playlist { name } => snapshot
            .playlists
            .iter()
            .find(|p| &p.name == name)
            .map(|p| PlaybackQueue::Playlist(p.name.clone())),
        CatalogMatch::Song { name } => first_matching(snapshot, |t| &t.name == name),
        CatalogMatch::SongArtist { song, artist } => {
            first_matching(snapshot, |t| &t.name == song && &t.artist == artist)
        }
        CatalogMatch::Album { name } => all_matching(snapshot, |t| &t.album == name),
        CatalogMatch::AlbumArtist { album, artist } => {
            all_matching(snapshot, |t| &t.album == album && &t.artist == artist)
        }
        CatalogMatch::Artist { name } => all_matching(snapshot, |t| &t.artist == name),
    };

    queue.ok_or_else(|| StaleCatalog {
        matched: matched.clone(),
    })
}

fn first_matching(snapshot: &LibrarySnapshot, keep: impl Fn(&Track) -> bool) -> Option<PlaybackQueue> {
    snapshot
        .playable_tracks()
        .find(|t| keep(t))
        .map(|t| PlaybackQueue::Tracks(vec![t.clone()]))
}

fn all_matching(snapshot: &LibrarySnapshot, keep: impl Fn(&Track) -> bool) -> Option<PlaybackQueue> {
    let mut tracks: Vec<Track> = snapshot.playable_tracks().filter(|t| keep(t)).cloned().collect();
    if tracks.is_empty() {
        return None;
    }
    tracks.sort_by(queue_order);
    Some(PlaybackQueue::Tracks(tracks))
}

// ============================================================================
// Controller
// ============================================================================

/// The player being driven. Implemented outside this crate for real players.
pub trait PlaybackController {
    fn play_playlist(&mut self, name: &str) -> Result<()>;

    /// Replace the working playlist with `tracks` and start from the first.
    fn play_tracks(&mut self, tracks: &[Track]) -> Result<()>;

    fn resume(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn next_track(&mut self) -> Result<()>;

    fn adjust_volume(&mut self, delta: i32) -> Result<()>;

    fn play(&mut self, queue: &PlaybackQueue) -> Result<()> {
        match queue {
            PlaybackQueue::Playlist(name) => self.play_playlist(name),
            PlaybackQueue::Tracks(tracks) => self.play_tracks(tracks),
        }
    }
}

/// Action recorded by [`RecordingController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackAction {
    Playlist(String),
    Tracks(Vec<Track>),
    Resume,
    Stop,
    Next,
    Volume(i32),
}

/// Controller that only logs and records what it was asked to do.
/// Backs the CLI and tests.
#[derive(Debug, Default)]
pub struct RecordingController {
    pub actions: Vec<PlaybackAction>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&PlaybackAction> {
        self.actions.last()
    }
}

impl PlaybackController for RecordingController {
    fn play_playlist(&mut self, name: &str) -> Result<()> {
        info!(playlist = name, "Playing playlist");
        self.actions.push(PlaybackAction::Playlist(name.to_string()));
        Ok(())
    }

    fn play_tracks(&mut self, tracks: &[Track]) -> Result<()> {
        info!(tracks = tracks.len(), "Playing queue");
        self.actions.push(PlaybackAction::Tracks(tracks.to_vec()));
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        info!("Resume");
        self.actions.push(PlaybackAction::Resume);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        info!("Pause");
        self.actions.push(PlaybackAction::Stop);
        Ok(())
    }

    fn next_track(&mut self) -> Result<()> {
        info!("Next track");
        self.actions.push(PlaybackAction::Next);
        Ok(())
    }

    fn adjust_volume(&mut self, delta: i32) -> Result<()> {
        info!(delta, "Volume");
        self.actions.push(PlaybackAction::Volume(delta));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
