//! Play requests end to end: resolve, locate, hand off, rebuild when stale.
//!
//! The catalog is built on first use. When a resolution has no live
//! counterpart the catalog is rebuilt once and the request reports
//! [`PlayOutcome::Stale`]; it is never retried within the same call.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::catalog::{CatalogHandle, CatalogIndexSet};
use crate::command::Command;
use crate::config::ResolverConfig;
use crate::library::LibraryProvider;
use crate::models::{LibrarySnapshot, Resolution};
use crate::playback::{locate, PlaybackController, PlaybackQueue};
use crate::resolve::Resolver;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// Empty phrase: playback resumed without resolving anything.
    Resumed,
    Played {
        resolution: Resolution,
        queue: PlaybackQueue,
    },
    /// Every index was empty.
    NoMatch,
    /// The match had no live item; the catalog has been rebuilt.
    Stale { resolution: Resolution },
}

pub struct Session<P> {
    provider: P,
    config: ResolverConfig,
    resolver: Resolver,
    catalog: CatalogHandle,
}

impl<P: LibraryProvider> Session<P> {
    pub fn new(provider: P, config: ResolverConfig) -> Self {
        Self {
            resolver: Resolver::from_config(&config),
            provider,
            config,
            catalog: CatalogHandle::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Current catalog, building it from a fresh snapshot on first use.
    pub fn catalog(&self) -> Result<Arc<CatalogIndexSet>> {
        match self.catalog.current() {
            Some(catalog) => Ok(catalog),
            None => self.rebuild(),
        }
    }

    /// Build a new catalog from a fresh snapshot and swap it in.
    pub fn rebuild(&self) -> Result<Arc<CatalogIndexSet>> {
        let snapshot = self.provider.snapshot()?;
        Ok(self.rebuild_from(&snapshot))
    }

    fn rebuild_from(&self, snapshot: &LibrarySnapshot) -> Arc<CatalogIndexSet> {
        let start = Instant::now();
        let catalog = Arc::new(CatalogIndexSet::build(snapshot, &self.config));
        self.catalog.replace_arc(Arc::clone(&catalog));
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Catalog refreshed");
        catalog
    }

    /// Resolve without touching playback.
    pub fn resolve(&self, query: &str) -> Result<Option<Resolution>> {
        let catalog = self.catalog()?;
        Ok(self.resolver.resolve(query, &catalog))
    }

    /// Resolve `query` and start playing it on `controller`.
    pub fn play<C: PlaybackController + ?Sized>(&self, query: &str, controller: &mut C) -> Result<PlayOutcome> {
        let query = query.trim();
        if query.is_empty() {
            controller.resume()?;
            return Ok(PlayOutcome::Resumed);
        }

        let snapshot = self.provider.snapshot()?;
        let catalog = match self.catalog.current() {
            Some(catalog) => catalog,
            None => self.rebuild_from(&snapshot),
        };

        let Some(resolution) = self.resolver.resolve(query, &catalog) else {
            return Ok(PlayOutcome::NoMatch);
        };

        match locate(&resolution.matched, &snapshot) {
            Ok(queue) => {
                controller.play(&queue)?;
                Ok(PlayOutcome::Played { resolution, queue })
            }
            Err(stale) => {
                warn!(%stale, "Rebuilding catalog");
                self.rebuild_from(&snapshot);
                Ok(PlayOutcome::Stale { resolution })
            }
        }
    }

    /// Execute a notification command. Only `Play` yields an outcome.
    pub fn dispatch<C: PlaybackController + ?Sized>(
        &self,
        command: &Command,
        controller: &mut C,
    ) -> Result<Option<PlayOutcome>> {
        match command {
            Command::Next => controller.next_track()?,
            Command::Pause => controller.stop()?,
            Command::Volume(delta) => controller.adjust_volume(*delta)?,
            Command::Play(phrase) => return self.play(phrase, controller).map(Some),
        }
        Ok(None)
    }
}
