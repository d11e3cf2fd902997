//! In-memory mirror of the remote suppression list.
//!
//! ## Design
//!
//! - `entries` holds every address in provider casing, sorted case-insensitively
//! - `index` maps the lowercased address to its provider casing
//! - Both live behind one `RwLock` and are only ever replaced or pruned together
//! - Remote calls never run while the lock is held
//!
//! If the provider returns two case variants of one address, both stay in
//! `entries` while `index` keeps the one fetched last.

use super::directory::{DirectoryError, SuppressionDirectory};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Upper bound on addresses requested per page.
pub const MAX_PAGE_SIZE: i32 = 1000;

#[derive(Default)]
struct CacheState {
    entries: Vec<String>,
    index: HashMap<String, String>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Result of removing a single requested address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Deleted remotely and pruned locally; carries the provider casing.
    Removed(String),
    /// Not present in the cache; carries the input as given.
    NotFound(String),
    /// Remote delete failed; the cache is unchanged.
    Failed { input: String, detail: String },
}

impl RemovalOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed(_))
    }
}

impl fmt::Display for RemovalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalOutcome::Removed(address) => write!(f, "removed: {address}"),
            RemovalOutcome::NotFound(input) => write!(f, "not found: {input}"),
            RemovalOutcome::Failed { input, detail } => write!(f, "error: {input} ({detail})"),
        }
    }
}

/// Point-in-time summary of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub entries: usize,
    /// Time of the last successful refresh; `None` until one succeeds.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CacheStatus {
    pub fn is_fresh(&self) -> bool {
        self.refreshed_at.is_some()
    }
}

/// Thread-safe cache of suppressed addresses backed by a remote directory.
pub struct SuppressionCache {
    directory: Arc<dyn SuppressionDirectory>,
    page_size: i32,
    state: RwLock<CacheState>,
}

impl SuppressionCache {
    /// Create an empty cache. `page_size` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(directory: Arc<dyn SuppressionDirectory>, page_size: i32) -> Self {
        Self {
            directory,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Fetch the full remote list and swap it in, returning the entry count.
    ///
    /// Any failed page aborts the refresh; the previous contents stay in place.
    pub async fn refresh(&self) -> Result<usize, DirectoryError> {
        let mut addresses = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .directory
                .list_page(cursor.as_deref(), self.page_size)
                .await?;
            pages += 1;
            log::debug!(
                "fetched suppression page {} ({} addresses)",
                pages,
                page.addresses.len()
            );

            let more = page.has_more();
            // Blank addresses cannot be matched or deleted, so they are not cached.
            addresses.extend(
                page.addresses
                    .into_iter()
                    .filter(|address| !address.trim().is_empty()),
            );
            if !more {
                break;
            }
            cursor = page.next_cursor;
        }

        // Stable, so equal case-folded addresses keep fetch order.
        addresses.sort_by_cached_key(|address| address.to_lowercase());

        let mut index = HashMap::with_capacity(addresses.len());
        for address in &addresses {
            index.insert(address.to_lowercase(), address.clone());
        }

        let total = addresses.len();
        {
            let mut state = self.state.write();
            state.entries = addresses;
            state.index = index;
            state.refreshed_at = Some(Utc::now());
        }

        log::info!(
            "suppression cache refreshed: {} addresses across {} page(s)",
            total,
            pages
        );
        Ok(total)
    }

    /// Best-effort refresh used at startup. Failures are logged and the
    /// cache keeps its current (usually empty) contents.
    pub async fn warm(&self) {
        if let Err(err) = self.refresh().await {
            log::error!("initial suppression list refresh failed: {}", err);
        }
    }

    /// Copy of the ordered address list.
    pub fn snapshot(&self) -> Vec<String> {
        self.state.read().entries.clone()
    }

    /// Resolve an address case-insensitively to its provider casing.
    pub fn lookup(&self, address: &str) -> Option<String> {
        self.state.read().index.get(&address.to_lowercase()).cloned()
    }

    pub fn status(&self) -> CacheStatus {
        let state = self.state.read();
        CacheStatus {
            entries: state.entries.len(),
            refreshed_at: state.refreshed_at,
        }
    }

    /// Remove one address remotely, then prune it from the cache.
    pub async fn remove(&self, input: &str) -> RemovalOutcome {
        let Some(original) = self.lookup(input) else {
            return RemovalOutcome::NotFound(input.to_string());
        };

        if let Err(err) = self.directory.delete_one(&original).await {
            log::warn!("failed to delete suppressed address {}: {}", original, err);
            return RemovalOutcome::Failed {
                input: input.to_string(),
                detail: err.to_string(),
            };
        }

        self.prune(&original);
        log::info!("removed {} from suppression list", original);
        RemovalOutcome::Removed(original)
    }

    /// Remove each address in order; every input gets its own outcome.
    pub async fn remove_all(&self, inputs: &[String]) -> Vec<RemovalOutcome> {
        let mut outcomes = Vec::with_capacity(inputs.len());
        for input in inputs {
            outcomes.push(self.remove(input).await);
        }
        outcomes
    }

    // A concurrent refresh or removal may already have dropped the address,
    // so a missing key or entry is not an error.
    fn prune(&self, original: &str) {
        let mut state = self.state.write();
        state.index.remove(&original.to_lowercase());
        if let Some(position) = state.entries.iter().position(|entry| entry == original) {
            state.entries.remove(position);
        }
    }
}
