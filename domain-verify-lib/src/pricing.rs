//! Retail pricing by domain suffix.
//!
//! The built-in table covers the `.ke` namespace. It is created once per
//! process and never mutated; config overrides produce a new table instead.

use crate::types::{DomainQuery, PricingEntry};
use std::collections::HashMap;

/// Built-in suffix prices in USD: (suffix, register, renew).
const DEFAULT_PRICES: &[(&str, u32, u32)] = &[
    (".ke", 30, 30),
    (".co.ke", 15, 15),
    (".or.ke", 15, 15),
    (".ac.ke", 12, 12),
    (".sc.ke", 12, 12),
    // Government registrations carry no retail fee
    (".go.ke", 0, 0),
    (".ne.ke", 12, 12),
    (".me.ke", 12, 12),
    (".mobi.ke", 12, 12),
    (".info.ke", 12, 12),
];

lazy_static::lazy_static! {
    static ref DEFAULT_TABLE: PricingTable = PricingTable::from_entries(
        DEFAULT_PRICES
            .iter()
            .map(|(suffix, register, renew)| (suffix.to_string(), Some(*register), Some(*renew))),
    );
}

/// Suffix → price lookup with longest-suffix-wins resolution.
#[derive(Debug, Clone)]
pub struct PricingTable {
    /// Sorted by descending suffix length so the first match is the most specific
    entries: Vec<PricingEntry>,
}

impl PricingTable {
    /// The process-wide built-in table.
    pub fn global() -> &'static PricingTable {
        &DEFAULT_TABLE
    }

    /// Build a table from `(suffix, register, renew)` rows.
    ///
    /// Later rows replace earlier rows with the same suffix.
    pub fn from_entries<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<u32>, Option<u32>)>,
    {
        let mut by_suffix: HashMap<String, PricingEntry> = HashMap::new();
        for (suffix, register_usd, renew_usd) in rows {
            let tld = canonical_suffix(&suffix);
            by_suffix.insert(
                tld.clone(),
                PricingEntry {
                    tld,
                    register_usd,
                    renew_usd,
                },
            );
        }

        let mut entries: Vec<PricingEntry> = by_suffix.into_values().collect();
        entries.sort_by(|a, b| b.tld.len().cmp(&a.tld.len()).then(a.tld.cmp(&b.tld)));

        Self { entries }
    }

    /// The built-in table with `overrides` layered on top.
    pub fn with_overrides(overrides: &HashMap<String, (Option<u32>, Option<u32>)>) -> Self {
        let base = Self::global()
            .entries
            .iter()
            .map(|e| (e.tld.clone(), e.register_usd, e.renew_usd));
        let extra = overrides
            .iter()
            .map(|(suffix, (register, renew))| (suffix.clone(), *register, *renew));
        Self::from_entries(base.chain(extra))
    }

    /// Resolve the price for a domain.
    ///
    /// The longest configured suffix that the domain ends with wins. Without
    /// a match the suffix falls back to everything from the first `.`, with
    /// both prices unknown.
    pub fn price_for(&self, domain: &DomainQuery) -> PricingEntry {
        let name = domain.as_str();
        self.entries
            .iter()
            .find(|entry| name.ends_with(&entry.tld))
            .cloned()
            .unwrap_or_else(|| PricingEntry {
                tld: domain.first_dot_suffix().to_string(),
                register_usd: None,
                renew_usd: None,
            })
    }

    /// Entries in lookup order.
    pub fn entries(&self) -> &[PricingEntry] {
        &self.entries
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::global().clone()
    }
}

/// Lowercase and ensure a leading dot (`co.ke` → `.co.ke`).
fn canonical_suffix(suffix: &str) -> String {
    let suffix = suffix.trim().to_lowercase();
    if suffix.starts_with('.') {
        suffix
    } else {
        format!(".{}", suffix)
    }
}
