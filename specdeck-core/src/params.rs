//! Shareable link parameters and the single store both sides write to.
//!
//! The parameter set is the only mutable object shared by the two load
//! pipelines. Every write is a read-modify-write against the store's current
//! value and touches only the writing side's keys.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// One half of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Parameter holding this side's system slug.
    pub fn system_key(self) -> &'static str {
        match self {
            Side::Left => "a",
            Side::Right => "b",
        }
    }

    /// Parameter holding this side's variant slug.
    pub fn variant_key(self) -> &'static str {
        match self {
            Side::Left => "varA",
            Side::Right => "varB",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// The parameters owned by one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideParams {
    pub system: Option<String>,
    pub variant: Option<String>,
}

/// The full parameter set attached to the view's address.
///
/// Keys this engine does not own are carried through untouched, in their
/// original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pairs: Vec<(String, String)>,
}

impl ShareParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    ///
    /// Later duplicates of a key are ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if params.get(&key).is_none() {
                params.pairs.push((key.into_owned(), value.into_owned()));
            }
        }
        params
    }

    /// Serialize back to a query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, keeping its position if it already exists. Returns whether
    /// the set changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) if existing == value => false,
            Some((_, existing)) => {
                *existing = value.to_string();
                true
            }
            None => {
                self.pairs.push((key.to_string(), value.to_string()));
                true
            }
        }
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.len() != before
    }

    /// Read one side's parameters. Empty values count as absent.
    pub fn side(&self, side: Side) -> SideParams {
        let non_empty = |key: &str| {
            self.get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        SideParams {
            system: non_empty(side.system_key()),
            variant: non_empty(side.variant_key()),
        }
    }

    /// Write one side's parameters, touching only that side's keys. Returns
    /// whether anything changed.
    pub fn apply_side(&mut self, side: Side, values: &SideParams) -> bool {
        let mut changed = false;
        for (key, value) in [
            (side.system_key(), values.system.as_deref()),
            (side.variant_key(), values.variant.as_deref()),
        ] {
            changed |= match value {
                Some(v) => self.set(key, v),
                // An empty value already reads as absent.
                None if self.get(key).is_some_and(|v| !v.is_empty()) => self.remove(key),
                None => false,
            };
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl std::fmt::Display for ShareParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Shared, observable parameter set.
///
/// Writes happen inside the channel's lock, so each update sees the latest
/// value even when both sides write back to back. Subscribers are notified
/// only when a write actually changes something.
#[derive(Debug)]
pub struct ParamStore {
    tx: watch::Sender<ShareParams>,
}

impl ParamStore {
    pub fn new(initial: ShareParams) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current parameter set.
    pub fn snapshot(&self) -> ShareParams {
        self.tx.borrow().clone()
    }

    /// Current parameters for one side.
    pub fn side(&self, side: Side) -> SideParams {
        self.tx.borrow().side(side)
    }

    /// Observe in-place address updates.
    pub fn subscribe(&self) -> watch::Receiver<ShareParams> {
        self.tx.subscribe()
    }

    /// Read-modify-write one side's keys against the current value.
    pub fn update_side(&self, side: Side, edit: impl FnOnce(&mut SideParams)) -> bool {
        let changed = self.tx.send_if_modified(|params| {
            let mut values = params.side(side);
            edit(&mut values);
            params.apply_side(side, &values)
        });
        if changed {
            let query = self.tx.borrow().to_query_string();
            debug!(%side, params = %query, "Updated shareable parameters");
        }
        changed
    }

    /// Replace the whole set, as when the address changes from outside.
    pub fn replace(&self, params: ShareParams) -> ShareParams {
        self.tx.send_replace(params)
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new(ShareParams::new())
    }
}
