use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::{Item, ItemKind};

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(include_str!("../data/catalog.json")).expect("embedded catalog is valid")
});

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate {} id {id}", .kind.label().to_lowercase())]
    DuplicateId { kind: ItemKind, id: u32 },
}

/// Webinar and course collections, fully materialized and immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    webinars: Vec<Item>,
    #[serde(default)]
    courses: Vec<Item>,
}

impl Catalog {
    pub fn new(webinars: Vec<Item>, courses: Vec<Item>) -> Result<Self, CatalogError> {
        let catalog = Self { webinars, courses };
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            webinars = catalog.webinars.len(),
            courses = catalog.courses.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn items(&self, kind: ItemKind) -> &[Item] {
        match kind {
            ItemKind::Webinar => &self.webinars,
            ItemKind::Course => &self.courses,
        }
    }

    /// Looks an item up by its textual id, the way it arrives in a route.
    pub fn find(&self, kind: ItemKind, id: &str) -> Option<&Item> {
        self.items(kind).iter().find(|item| item.id.to_string() == id)
    }

    fn check_unique_ids(&self) -> Result<(), CatalogError> {
        for kind in [ItemKind::Webinar, ItemKind::Course] {
            let mut seen = HashSet::new();
            for item in self.items(kind) {
                if !seen.insert(item.id) {
                    return Err(CatalogError::DuplicateId { kind, id: item.id });
                }
            }
        }
        Ok(())
    }
}
