//! # Ordered tier structure.
//!
//! [`PriorityIndex::build`] turns `(id, priority)` pairs into an ascending
//! sequence of [`Tier`]s. It is built once and never mutated afterwards.
//!
//! ## Rules
//! - Every id appears in exactly one tier.
//! - Tiers are sorted ascending by priority.
//! - Equal priorities keep input order (stable sort), so ordered inputs such as
//!   `Vec` or arrays give reproducible tiers; a `HashMap` gives its own iteration
//!   order.
//!
//! ## Example
//! ```rust
//! use tierload::PriorityIndex;
//!
//! let index = PriorityIndex::build([("a", 1), ("c", 2), ("b", 1)])?;
//! let tiers: Vec<Vec<&str>> = index.iter().map(|t| t.ids().collect()).collect();
//! assert_eq!(tiers, vec![vec!["a", "b"], vec!["c"]]);
//! # Ok::<(), tierload::ConfigError>(())
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ConfigError;

use super::value::{Coercion, PriorityValue};

/// One resource and its coerced priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityEntry {
    id: Arc<str>,
    priority: i64,
}

impl PriorityEntry {
    /// Resource identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Coerced priority.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub(crate) fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }
}

/// Maximal run of entries sharing the same priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    priority: i64,
    entries: Vec<PriorityEntry>,
}

impl Tier {
    /// Priority shared by every entry of this tier.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[PriorityEntry] {
        &self.entries
    }

    /// Resource identifiers in input order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(PriorityEntry::id)
    }

    /// Number of resources in this tier (never zero).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; tiers are never built empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable, ascending sequence of tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityIndex {
    tiers: Vec<Tier>,
    resources: usize,
}

impl PriorityIndex {
    /// Builds the tier sequence from `(id, priority)` pairs.
    ///
    /// ### Errors
    /// - [`ConfigError::NotNumeric`] / [`ConfigError::NotFinite`] /
    ///   [`ConfigError::OutOfRange`] when a priority does not coerce;
    /// - [`ConfigError::DuplicateId`] when an id repeats.
    ///
    /// No tiers are built when any entry fails.
    pub fn build<I, K, V>(map: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PriorityValue>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (id, value) in map {
            let id: String = id.into();
            let value: PriorityValue = value.into();
            let priority = value
                .coerce()
                .map_err(|c| priority_error(c, &id, &value))?;
            if !seen.insert(id.clone()) {
                return Err(ConfigError::DuplicateId { id });
            }
            entries.push(PriorityEntry {
                id: id.into(),
                priority,
            });
        }

        entries.sort_by_key(PriorityEntry::priority);
        Ok(Self::partition(entries))
    }

    /// Splits sorted entries into contiguous equal-priority runs.
    fn partition(entries: Vec<PriorityEntry>) -> Self {
        let resources = entries.len();
        let mut tiers: Vec<Tier> = Vec::new();

        for entry in entries {
            match tiers.last_mut() {
                Some(tier) if tier.priority == entry.priority => tier.entries.push(entry),
                _ => tiers.push(Tier {
                    priority: entry.priority,
                    entries: vec![entry],
                }),
            }
        }

        Self { tiers, resources }
    }

    /// Tiers in ascending priority order.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Iterates tiers in ascending priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// True if the input map was empty.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Total number of resources across all tiers.
    pub fn resource_count(&self) -> usize {
        self.resources
    }

    /// True if `id` is one of the indexed resources.
    pub fn contains(&self, id: &str) -> bool {
        self.priority_of(id).is_some()
    }

    /// Coerced priority of `id`, if indexed.
    pub fn priority_of(&self, id: &str) -> Option<i64> {
        self.tiers
            .iter()
            .flat_map(|t| t.entries.iter())
            .find(|e| e.id() == id)
            .map(PriorityEntry::priority)
    }
}

impl<'a> IntoIterator for &'a PriorityIndex {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

fn priority_error(c: Coercion, id: &str, value: &PriorityValue) -> ConfigError {
    let id = id.to_string();
    match c {
        Coercion::NotNumeric => ConfigError::NotNumeric {
            id,
            value: value.to_string(),
        },
        Coercion::NotFinite => ConfigError::NotFinite { id },
        Coercion::OutOfRange => ConfigError::OutOfRange {
            id,
            value: value.to_string(),
        },
    }
}
