//! Capability types: tools and integrations an agent may use.

use serde::{Deserialize, Serialize};

/// A capability from the catalog.
///
/// Identity is the `id`; the rest is display data copied from the catalog
/// at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRef {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub category: String,

    /// Shown with a "Popular" badge.
    pub popular: bool,

    /// Whether the capability exposes settings once selected.
    pub configurable: bool,
}
