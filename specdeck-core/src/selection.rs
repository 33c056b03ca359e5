//! Selection state manager with one load pipeline per side.
//!
//! Each side moves through `Empty -> Loading -> Ready`, or `Loading -> Failed`.
//! A load commits only if its ticket is still the side's latest request and
//! the slug it fetched is still the one being loaded; superseded responses
//! are dropped without touching state. There is no hard cancellation.
//!
//! Shareable parameters live in a [`ParamStore`]; every write goes through
//! its read-modify-write update so the two sides never clobber each other.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, SelectionError};
use crate::params::{ParamStore, ShareParams, Side};
use crate::source::SystemSource;
use crate::spec::{EffectiveSpecification, ResolvedMedia, SystemRecord, VariantRecord, resolve_media};

/// A loaded system with its active variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadySide {
    pub system: Arc<SystemRecord>,
    pub variant_id: Option<String>,
    pub effective: EffectiveSpecification,
}

impl ReadySide {
    /// Resolve the active variant (requested slug, then default, then first).
    pub fn new(system: Arc<SystemRecord>, requested_variant: Option<&str>) -> Self {
        let variant = system.active_variant(requested_variant);
        let variant_id = variant.map(|v| v.id.clone());
        let effective = system.effective_spec(variant);
        Self {
            system,
            variant_id,
            effective,
        }
    }

    pub fn variant(&self) -> Option<&VariantRecord> {
        let id = self.variant_id.as_deref()?;
        self.system.variants.iter().find(|v| v.id == id)
    }

    pub fn media(&self) -> ResolvedMedia {
        resolve_media(&self.system, self.variant())
    }
}

/// Lifecycle of one side.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SideState {
    #[default]
    Empty,
    Loading {
        slug: String,
    },
    Ready(ReadySide),
    Failed {
        slug: String,
        error: CatalogError,
    },
}

impl SideState {
    pub fn is_ready(&self) -> bool {
        matches!(self, SideState::Ready(_))
    }

    pub fn ready(&self) -> Option<&ReadySide> {
        match self {
            SideState::Ready(ready) => Some(ready),
            _ => None,
        }
    }

    /// Flattened view of this state.
    pub fn selection(&self) -> Selection {
        match self {
            SideState::Empty => Selection::default(),
            SideState::Loading { slug } => Selection {
                system_slug: Some(slug.clone()),
                is_loading: true,
                ..Selection::default()
            },
            SideState::Ready(ready) => Selection {
                system_slug: Some(ready.system.slug.clone()),
                variant_id: ready.variant_id.clone(),
                effective_spec: Some(ready.effective.clone()),
                is_loading: false,
            },
            SideState::Failed { slug, .. } => Selection {
                system_slug: Some(slug.clone()),
                ..Selection::default()
            },
        }
    }
}

impl std::fmt::Display for SideState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SideState::Empty => write!(f, "empty"),
            SideState::Loading { slug } => write!(f, "loading {slug}"),
            SideState::Ready(ready) => write!(f, "ready {}", ready.system.slug),
            SideState::Failed { slug, .. } => write!(f, "failed {slug}"),
        }
    }
}

/// What one side currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub system_slug: Option<String>,
    pub variant_id: Option<String>,
    pub effective_spec: Option<EffectiveSpecification>,
    pub is_loading: bool,
}

/// How a load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Failed,
    /// A newer request for the same side took over; nothing was committed.
    Superseded,
}

#[derive(Debug, Default)]
struct SideSlot {
    state: SideState,
    ticket: u64,
}

/// Owns both sides' state and the shared parameter store.
pub struct SelectionManager {
    source: Arc<dyn SystemSource>,
    params: Arc<ParamStore>,
    sides: Mutex<[SideSlot; 2]>,
}

impl SelectionManager {
    pub fn new(source: Arc<dyn SystemSource>, params: Arc<ParamStore>) -> Self {
        Self {
            source,
            params,
            sides: Mutex::new(Default::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, [SideSlot; 2]> {
        self.sides.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn params(&self) -> &Arc<ParamStore> {
        &self.params
    }

    pub fn state(&self, side: Side) -> SideState {
        self.slots()[side.index()].state.clone()
    }

    pub fn selection(&self, side: Side) -> Selection {
        self.slots()[side.index()].state.selection()
    }

    /// Derive both sides from the current parameters. The two loads run
    /// concurrently and may finish in either order.
    pub async fn mount(&self) {
        futures::join!(self.mount_side(Side::Left), self.mount_side(Side::Right));
    }

    async fn mount_side(&self, side: Side) -> Option<LoadOutcome> {
        match self.params.side(side).system {
            Some(slug) => Some(self.load(side, slug).await),
            None => {
                self.reset(side);
                None
            }
        }
    }

    /// The user picked a system from search. Supersedes any in-flight load
    /// for this side and clears its variant choice.
    pub async fn select_system(&self, side: Side, slug: &str) -> LoadOutcome {
        self.params.update_side(side, |p| {
            p.system = Some(slug.to_string());
            p.variant = None;
        });
        self.load(side, slug.to_string()).await
    }

    /// The user switched variant on a loaded side. No fetch is needed.
    pub fn select_variant(&self, side: Side, variant: &str) -> Result<(), SelectionError> {
        let variant_slug = {
            let mut slots = self.slots();
            let SideState::Ready(ready) = &mut slots[side.index()].state else {
                return Err(SelectionError::NotReady { side });
            };
            let chosen = ready.system.find_variant(variant).cloned().ok_or_else(|| {
                SelectionError::UnknownVariant {
                    side,
                    variant: variant.to_string(),
                }
            })?;
            ready.effective = ready.system.effective_spec(Some(&chosen));
            ready.variant_id = Some(chosen.id.clone());
            debug!(%side, variant = %chosen.slug, "Switched variant");
            chosen.slug
        };
        self.params
            .update_side(side, |p| p.variant = Some(variant_slug));
        Ok(())
    }

    /// Empty a side and drop its parameters.
    pub fn clear(&self, side: Side) {
        self.reset(side);
        self.params.update_side(side, |p| {
            p.system = None;
            p.variant = None;
        });
    }

    /// The address changed from outside (back/forward, pasted link). Sides
    /// whose system changed are reloaded; a changed variant on an already
    /// loaded system is applied in place.
    pub async fn navigate(&self, params: ShareParams) {
        self.params.replace(params);
        futures::join!(self.follow_params(Side::Left), self.follow_params(Side::Right));
    }

    async fn follow_params(&self, side: Side) {
        let wanted = self.params.side(side);
        let Some(slug) = wanted.system else {
            self.reset(side);
            return;
        };

        let same_system = {
            let mut slots = self.slots();
            match &mut slots[side.index()].state {
                SideState::Ready(ready) if ready.system.slug == slug => {
                    let refreshed = ReadySide::new(ready.system.clone(), wanted.variant.as_deref());
                    *ready = refreshed;
                    true
                }
                SideState::Loading { slug: loading } => *loading == slug,
                _ => false,
            }
        };

        if !same_system {
            self.load(side, slug).await;
        }
    }

    fn reset(&self, side: Side) {
        let mut slots = self.slots();
        let slot = &mut slots[side.index()];
        slot.ticket += 1;
        slot.state = SideState::Empty;
    }

    async fn load(&self, side: Side, slug: String) -> LoadOutcome {
        let ticket = {
            let mut slots = self.slots();
            let slot = &mut slots[side.index()];
            slot.ticket += 1;
            slot.state = SideState::Loading { slug: slug.clone() };
            slot.ticket
        };
        debug!(%side, %slug, ticket, "Loading system");

        let result = self.source.get_system_by_slug(&slug).await;

        let mut slots = self.slots();
        let slot = &mut slots[side.index()];
        let still_wanted = slot.ticket == ticket
            && matches!(&slot.state, SideState::Loading { slug: current } if *current == slug);
        if !still_wanted {
            debug!(%side, %slug, ticket, current = %slot.state, "Discarding superseded response");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(system) => {
                let requested = self.params.side(side).variant;
                let ready = ReadySide::new(system, requested.as_deref());
                info!(
                    %side,
                    %slug,
                    variant = ready.variant_id.as_deref().unwrap_or("base"),
                    "Selection ready"
                );
                slot.state = SideState::Ready(ready);
                LoadOutcome::Ready
            }
            Err(error) => {
                warn!(%side, %slug, %error, "Failed to load system");
                slot.state = SideState::Failed { slug, error };
                LoadOutcome::Failed
            }
        }
    }
}
