//! Library snapshot sources.
//!
//! The real media library lives elsewhere; the engine only needs a full
//! enumeration of tracks and playlists. Snapshots can be read from a JSON
//! export or from a SQLite database with `tracks` and `playlists` tables.

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{LibrarySnapshot, Playlist, Track, TrackKind};

/// Supplies a fresh snapshot of the media library on demand.
pub trait LibraryProvider {
    fn snapshot(&self) -> Result<LibrarySnapshot>;
}

impl<T: LibraryProvider + ?Sized> LibraryProvider for &T {
    fn snapshot(&self) -> Result<LibrarySnapshot> {
        (**self).snapshot()
    }
}

/// A fixed snapshot is its own provider.
impl LibraryProvider for LibrarySnapshot {
    fn snapshot(&self) -> Result<LibrarySnapshot> {
        Ok(self.clone())
    }
}

/// Library stored in a file, re-read on every snapshot.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    path: PathBuf,
}

impl FileLibrary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LibraryProvider for FileLibrary {
    fn snapshot(&self) -> Result<LibrarySnapshot> {
        load(&self.path)
    }
}

/// Load a snapshot, picking the format from the file extension.
pub fn load(path: &Path) -> Result<LibrarySnapshot> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => load_json(path),
        "sqlite" | "sqlite3" | "db" => load_sqlite(path),
        _ => bail!(
            "Unsupported library format '{}': expected .json, .sqlite, .sqlite3 or .db",
            path.display()
        ),
    }
}

pub fn load_json(path: &Path) -> Result<LibrarySnapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read library {}", path.display()))?;
    let snapshot: LibrarySnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse library {}", path.display()))?;
    debug!(
        tracks = snapshot.tracks.len(),
        playlists = snapshot.playlists.len(),
        "Loaded JSON library"
    );
    Ok(snapshot)
}

/// Read `tracks(name, artist, album, kind, track_number)` and `playlists(name)`.
/// Every column except `name` may be NULL.
pub fn load_sqlite(path: &Path) -> Result<LibrarySnapshot> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open library database {}", path.display()))?;

    let mut stmt = conn.prepare(
        "SELECT name, artist, album, kind, track_number
         FROM tracks
         ORDER BY rowid",
    )?;
    let tracks = stmt
        .query_map([], |row| {
            let artist: Option<String> = row.get(1)?;
            let album: Option<String> = row.get(2)?;
            let kind: Option<String> = row.get(3)?;
            let track_number: Option<i64> = row.get(4)?;
            Ok(Track {
                name: row.get(0)?,
                artist: artist.unwrap_or_default(),
                album: album.unwrap_or_default(),
                kind: kind.as_deref().map(TrackKind::from).unwrap_or_default(),
                track_number: track_number.unwrap_or(0).clamp(0, u32::MAX as i64) as u32,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read tracks")?;

    let mut stmt = conn.prepare("SELECT name FROM playlists ORDER BY rowid")?;
    let playlists = stmt
        .query_map([], |row| Ok(Playlist { name: row.get(0)? }))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read playlists")?;

    debug!(tracks = tracks.len(), playlists = playlists.len(), "Loaded SQLite library");
    Ok(LibrarySnapshot { tracks, playlists })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use std::io::Write;

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "tracks": [
                    {{"name": "Hello", "artist": "Adele", "album": "25", "track_number": 1}},
                    {{"name": "Radio", "kind": "url"}}
                ],
                "playlists": [{{"name": "Road Trip"}}]
            }}"#
        )
        .unwrap();

        let snapshot = load(file.path()).unwrap();
        assert_eq!(snapshot.tracks.len(), 2);
        assert_eq!(snapshot.tracks[0], Track::file("Hello", "Adele", "25", 1));
        assert_eq!(snapshot.tracks[1].kind, TrackKind::Url);
        assert_eq!(snapshot.playlists, vec![Playlist::named("Road Trip")]);
    }

    #[test]
    fn test_load_sqlite() {
        let file = tempfile::Builder::new().suffix(".sqlite3").tempfile().unwrap();
        {
            let conn = Connection::open(file.path()).unwrap();
            conn.execute_batch(
                "CREATE TABLE tracks (name TEXT NOT NULL, artist TEXT, album TEXT, kind TEXT, track_number INTEGER);
                 CREATE TABLE playlists (name TEXT NOT NULL);",
            )
            .unwrap();
            conn.execute(
                "INSERT INTO tracks VALUES (?1, ?2, ?3, ?4, ?5)",
                params!["Hello", "Adele", "25", "file", 1],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO tracks (name) VALUES (?1)",
                params!["Untitled"],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO tracks VALUES (?1, ?2, ?3, ?4, ?5)",
                params!["Episode 1", "Some Podcast", "Season 1", "podcast", 1],
            )
            .unwrap();
            conn.execute("INSERT INTO playlists VALUES (?1)", params!["Road Trip"])
                .unwrap();
        }

        let snapshot = load(file.path()).unwrap();
        assert_eq!(snapshot.tracks[0], Track::file("Hello", "Adele", "25", 1));
        assert_eq!(snapshot.tracks[1], Track::file("Untitled", "", "", 0));
        // Unknown kinds load, but are never playable
        assert_eq!(snapshot.tracks[2].kind, TrackKind::Other);
        assert_eq!(snapshot.playable_tracks().count(), 2);
        assert_eq!(snapshot.playlists, vec![Playlist::named("Road Trip")]);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load(Path::new("/tmp/library.xml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported library format"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_json(Path::new("/nonexistent/library.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read library"));
    }

    #[test]
    fn test_file_library_provider() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"playlists": [{{"name": "Focus"}}]}}"#).unwrap();
        let provider = FileLibrary::new(file.path());
        assert_eq!(provider.path(), file.path());
        assert_eq!(provider.snapshot().unwrap().playlists.len(), 1);
    }
}
