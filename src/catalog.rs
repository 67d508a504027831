//! Capability catalog: the marketplace of tools an agent can be given.
//!
//! The session consults a catalog on demand and treats its results as
//! read-only. The only implementation is a fixed in-memory list.

use crate::model::CapabilityRef;

/// Source of selectable capabilities.
pub trait CapabilityCatalog {
    /// All capabilities matching `filter`, or all of them when there is none.
    fn list(&self, filter: Option<&str>) -> Vec<CapabilityRef>;

    fn get(&self, id: u32) -> Option<CapabilityRef> {
        self.list(None).into_iter().find(|c| c.id == id)
    }
}

/// The built-in marketplace.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<CapabilityRef>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        let entry = |id, name: &str, description: &str, category: &str, popular, configurable| {
            CapabilityRef {
                id,
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                popular,
                configurable,
            }
        };
        Self {
            entries: vec![
                entry(
                    1,
                    "Web Search",
                    "Search the web for up-to-date information",
                    "Information Retrieval",
                    true,
                    true,
                ),
                entry(
                    2,
                    "Document Analysis",
                    "Extract insights from documents and PDFs",
                    "Data Processing",
                    true,
                    true,
                ),
                entry(
                    3,
                    "Code Interpreter",
                    "Run code and analyze data with Python",
                    "Development",
                    true,
                    false,
                ),
                entry(
                    4,
                    "Email Integration",
                    "Send and analyze emails",
                    "Communication",
                    false,
                    true,
                ),
                entry(
                    5,
                    "Image Generator",
                    "Generate images from text descriptions",
                    "Creative",
                    true,
                    true,
                ),
                entry(
                    6,
                    "Weather API",
                    "Get real-time weather data",
                    "Information Retrieval",
                    false,
                    true,
                ),
            ],
        }
    }
}

impl CapabilityCatalog for StaticCatalog {
    /// Case-insensitive substring match on name, description, or category.
    fn list(&self, filter: Option<&str>) -> Vec<CapabilityRef> {
        let needle = filter.map(str::trim).unwrap_or_default().to_lowercase();
        if needle.is_empty() {
            return self.entries.clone();
        }
        self.entries
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
                    || c.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    fn get(&self, id: u32) -> Option<CapabilityRef> {
        self.entries.iter().find(|c| c.id == id).cloned()
    }
}
