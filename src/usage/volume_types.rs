use core::fmt::Debug;
use std::collections::HashMap;

/// Name reported for volumes whose type cannot be determined.
pub const DEFAULT_VOLUME_TYPE_NAME: &str = "unknown";

/// Resolves block-storage volume type ids to human readable names
///
/// Implementations backed by a remote service are expected to do their own caching;
/// resolvers call this once per row.
pub trait VolumeTypeNames: Debug + Send + Sync {
    /// Returns the display name for `id`, or a fallback name when `id` is `None`.
    fn name_from_id(&self, id: Option<&str>) -> String;
}

/// Fixed, in-memory table of volume types
#[derive(Debug, Clone)]
pub struct VolumeTypeCatalog {
    names: HashMap<String, String>,
    fallback: String,
}

impl VolumeTypeCatalog {
    #[must_use]
    pub fn new(names: HashMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            names,
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for VolumeTypeCatalog {
    fn default() -> Self {
        Self::new(HashMap::new(), DEFAULT_VOLUME_TYPE_NAME)
    }
}

impl VolumeTypeNames for VolumeTypeCatalog {
    fn name_from_id(&self, id: Option<&str>) -> String {
        match id {
            // Ids missing from the table are still more useful to a reader than the fallback
            Some(id) => self.names.get(id).map_or_else(|| id.to_string(), Clone::clone),
            None => self.fallback.clone(),
        }
    }
}
