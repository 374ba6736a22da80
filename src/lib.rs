//! playmatch - resolve noisy spoken phrases to typed music-library matches.
//!
//! A phrase is normalized, looked up against fuzzy indexes built from a
//! library snapshot (songs, albums, artists, playlists and the compound
//! "thing by artist" facets) and resolved to one [`models::CatalogMatch`].

pub mod catalog;
pub mod command;
pub mod compound;
pub mod config;
pub mod fuzzy;
pub mod library;
pub mod models;
pub mod normalize;
pub mod playback;
pub mod progress;
pub mod resolve;
pub mod session;
