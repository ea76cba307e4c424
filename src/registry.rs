//! Concurrency-safe catalogue of named health checks.
//!
//! The registry owns every registered check, keyed by name. Registration
//! under an existing name replaces the entry per the kind merge rule, and
//! evaluation fans the selected checks out to run concurrently before
//! aggregating their results into a single report.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future;

use crate::check::{CheckKind, HealthCheck, HealthReport};
use crate::error::{HealthError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// One registered check: its kind tag and the probe instance.
struct RegistryEntry {
    kind: CheckKind,
    check: Arc<dyn HealthCheck>,
}

/// Catalogue of named checks with parallel evaluation.
///
/// The registry is explicitly constructed and handed around by the
/// composition root, typically as an `Arc<HealthRegistry>` shared between the
/// HTTP routes, the periodic reporter, and startup wiring. All operations are
/// safe under unbounded concurrent access; updates are atomic per key, and a
/// slow registration never stalls a concurrent evaluation.
pub struct HealthRegistry {
    entries: DashMap<String, RegistryEntry>,
}

impl HealthRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register a check under a name.
    ///
    /// A previously registered entry with the same name is replaced: the
    /// stored instance is always the new one, and the kind widens to
    /// [`CheckKind::Both`] when the old and new kinds differ. Rejects empty
    /// names.
    pub fn register(
        &self,
        name: impl Into<String>,
        kind: CheckKind,
        check: Arc<dyn HealthCheck>,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(HealthError::EmptyCheckName);
        }

        match self.entries.entry(name) {
            Entry::Occupied(mut occupied) => {
                let kind = occupied.get().kind.merge(kind);
                occupied.insert(RegistryEntry { kind, check });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(RegistryEntry { kind, check });
            }
        }

        Ok(())
    }

    /// Remove a check by name. No-op when absent.
    ///
    /// Safe concurrently with registration and evaluation; a check removed
    /// mid-evaluation either participates in that evaluation or does not.
    pub fn unregister(&self, name: &str) {
        self.entries.remove(name);
    }

    /// Evaluate every check selected by the filter and aggregate the results.
    ///
    /// The matching entries are snapshotted before dispatch, then invoked
    /// concurrently; the call completes once every invocation has finished.
    /// No timeout is applied here, that is the business of the individual
    /// checks. An `Err` from any selected check aborts the whole evaluation.
    /// Zero selected checks yield an up report with no results. Result order
    /// is unspecified.
    pub async fn evaluate(&self, filter: CheckKind) -> Result<HealthReport> {
        let selected: Vec<(String, Arc<dyn HealthCheck>)> = self
            .entries
            .iter()
            .filter(|entry| entry.value().kind.matches(filter))
            .map(|entry| (entry.key().clone(), Arc::clone(&entry.value().check)))
            .collect();

        let invocations = selected.into_iter().map(|(name, check)| async move {
            check
                .check()
                .await
                .map_err(|source| HealthError::Check { name, source })
        });

        let checks = future::try_join_all(invocations).await?;

        Ok(HealthReport::from_checks(checks))
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a check is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Kind of the check registered under the name, if any.
    pub fn kind_of(&self, name: &str) -> Option<CheckKind> {
        self.entries.get(name).map(|entry| entry.kind)
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
