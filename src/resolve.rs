//! Match resolution: one spoken phrase → one typed catalog match.
//!
//! Facets are consulted in a fixed order (playlist, artist, album, song),
//! then every " by " split point is tried against the compound indexes.
//! The first certain score (`<= 0`) ends the search.

use tracing::{debug, info};

use crate::catalog::{CatalogIndexSet, FacetHit};
use crate::compound;
use crate::config::ResolverConfig;
use crate::models::{Facet, Resolution};

/// Single-facet lookup order. Playlists and artists are the most common
/// requests, so they get the first chance at an early exit.
pub const FACET_PRIORITY: [Facet; 4] = [Facet::Playlist, Facet::Artist, Facet::Album, Facet::Song];

/// Compound facets tried for every " by " split.
pub const COMPOUND_PRIORITY: [Facet; 2] = [Facet::AlbumArtist, Facet::SongArtist];

pub const BY_CLAUSE: &str = " by ";

// ============================================================================
// Running best
// ============================================================================

/// Running best candidate across facets.
///
/// Lookups are passed as closures so nothing is evaluated once a certain
/// match is held.
#[derive(Debug, Default)]
pub struct Ranker {
    best: Option<(Facet, FacetHit)>,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the held score can no longer be improved.
    pub fn is_certain(&self) -> bool {
        self.best.as_ref().is_some_and(|(_, hit)| hit.score <= 0.0)
    }

    /// Evaluate `lookup` unless already certain; keep its hit if strictly better.
    /// Returns whether `lookup` ran.
    pub fn consider<F>(&mut self, facet: Facet, lookup: F) -> bool
    where
        F: FnOnce() -> Option<FacetHit>,
    {
        if self.is_certain() {
            return false;
        }

        if let Some(hit) = lookup() {
            let better = self
                .best
                .as_ref()
                .map_or(true, |(_, best)| hit.score < best.score);
            if better {
                self.best = Some((facet, hit));
            }
        }
        true
    }

    pub fn best(&self) -> Option<&(Facet, FacetHit)> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<(Facet, FacetHit)> {
        self.best
    }
}

// ============================================================================
// Resolver
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Resolver {
    playlist_bias: f64,
}

impl Default for Resolver {
    fn default() -> Self {
        Self { playlist_bias: 1.0 }
    }
}

impl Resolver {
    pub fn new(playlist_bias: f64) -> Self {
        Self { playlist_bias }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.playlist_bias)
    }

    /// Resolve `raw_query` against `catalog`.
    ///
    /// `None` only when every consulted index is empty.
    pub fn resolve(&self, raw_query: &str, catalog: &CatalogIndexSet) -> Option<Resolution> {
        let query = catalog.normalizer().normalize(raw_query);
        let mut ranker = Ranker::new();

        for facet in FACET_PRIORITY {
            ranker.consider(facet, || {
                let mut hit = catalog.lookup(facet, &query)?;
                if facet == Facet::Playlist {
                    hit.score -= self.playlist_bias;
                }
                Some(hit)
            });
        }

        for (thing, artist) in by_split_points(&query) {
            let joined = compound::join(thing, artist);
            for facet in COMPOUND_PRIORITY {
                ranker.consider(facet, || catalog.lookup(facet, &joined));
            }
        }

        let Some((facet, hit)) = ranker.into_best() else {
            info!(query = raw_query, "No catalog match");
            return None;
        };

        let resolution = Resolution {
            query: raw_query.to_string(),
            score: hit.score,
            alias: hit.alias,
            matched: hit.matched,
        };
        debug!(facet = %facet, score = resolution.score, alias = %resolution.alias, "Resolved");
        if let Some((thing, artist)) = resolution.alias_parts() {
            debug!(%thing, %artist, "Compound alias");
        }
        info!("{}", resolution.trace_line());
        Some(resolution)
    }
}

/// Resolve with the default playlist bias.
pub fn resolve(raw_query: &str, catalog: &CatalogIndexSet) -> Option<Resolution> {
    Resolver::default().resolve(raw_query, catalog)
}

/// Every way to read `query` as "thing by artist", in left-to-right order.
/// Occurrences may overlap ("a by by b" splits twice).
pub fn by_split_points(query: &str) -> Vec<(&str, &str)> {
    let mut splits = Vec::new();
    let mut start = 0;
    while let Some(pos) = query[start..].find(BY_CLAUSE) {
        let at = start + pos;
        splits.push((&query[..at], &query[at + BY_CLAUSE.len()..]));
        // BY_CLAUSE starts with an ASCII space, so at + 1 is a char boundary
        start = at + 1;
    }
    splits
}

// ============================================================================
// Tests
// ============================================================================
