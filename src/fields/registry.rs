use super::metadata_field::{MetadataKey, MetadataNamespace, image_metadata_field, metadata_field};
use super::{CostFormat, CostFormatter, FieldContext, FieldDef, FieldError, ITEM_FIELDS, READING_FIELDS, REPORT_FIELDS, Resolved};
use crate::usage::{Definition, FieldValue, Item, Reading, VolumeTypeCatalog, VolumeTypeNames};
use core::any::Any;
use core::panic::AssertUnwindSafe;
use std::collections::HashMap;
use std::panic;
use std::sync::LazyLock;

const LOG_TARGET: &str = "  registry";

/// The built-in field tables
pub const STANDARD_GROUPS: &[&[FieldDef]] = &[ITEM_FIELDS, READING_FIELDS, REPORT_FIELDS];

static DEFAULT_REGISTRY: LazyLock<FieldRegistry> = LazyLock::new(|| FieldRegistry::new(VolumeTypeCatalog::default()));

/// Name-indexed set of field resolvers
///
/// The registry is read-only once built and can be shared freely between threads.
#[derive(Debug)]
pub struct FieldRegistry {
    defs: HashMap<&'static str, &'static FieldDef>,
    volume_types: Box<dyn VolumeTypeNames>,
    cost_formatter: Box<dyn CostFormatter>,
}

impl FieldRegistry {
    /// Registry with every built-in field.
    #[must_use]
    pub fn new(volume_types: impl VolumeTypeNames + 'static) -> Self {
        let defs: HashMap<_, _> = STANDARD_GROUPS
            .iter()
            .copied()
            .flatten()
            .map(|def| (def.name, def))
            .collect();

        debug_assert_eq!(
            defs.len(),
            STANDARD_GROUPS.iter().map(|group| group.len()).sum::<usize>(),
            "built-in field names overlap"
        );

        Self::with_defs(defs, volume_types)
    }

    /// Registry made of the given tables.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DuplicateField`] if a name appears in more than one place.
    pub fn from_groups(groups: &[&'static [FieldDef]], volume_types: impl VolumeTypeNames + 'static) -> Result<Self, FieldError> {
        let mut defs = HashMap::new();
        for def in groups.iter().copied().flatten() {
            if defs.insert(def.name, def).is_some() {
                return Err(FieldError::DuplicateField { name: def.name });
            }
        }

        Ok(Self::with_defs(defs, volume_types))
    }

    fn with_defs(defs: HashMap<&'static str, &'static FieldDef>, volume_types: impl VolumeTypeNames + 'static) -> Self {
        Self {
            defs,
            volume_types: Box::new(volume_types),
            cost_formatter: Box::new(CostFormat::default()),
        }
    }

    /// Replace the formatter `cost` falls back to when a definition has no `cost_format`.
    #[must_use]
    pub fn with_cost_formatter(mut self, formatter: impl CostFormatter + 'static) -> Self {
        self.cost_formatter = Box::new(formatter);
        self
    }

    /// Whether `name` is a registered field or a `metadata:`/`image_metadata:` key.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name) || MetadataKey::parse(name).is_some()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static FieldDef> {
        self.defs.get(name).copied()
    }

    /// All registered fields, sorted by name.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static FieldDef> {
        let mut fields: Vec<_> = self.defs.values().copied().collect();
        fields.sort_unstable_by_key(|def| def.name);
        fields
    }

    /// Resolve the field called `name`.
    ///
    /// A resolver that fails, or panics, is logged and yields `Ok(None)`, as does a field that
    /// simply has no value for this row.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] if `name` is neither a registered field nor a
    /// metadata key.
    pub fn field_function(&self, name: &str, definition: &Definition, item: &Item, reading: &Reading) -> Resolved {
        if let Some(key) = MetadataKey::parse(name) {
            let lookup = match key.namespace {
                MetadataNamespace::Metadata => metadata_field,
                MetadataNamespace::ImageMetadata => image_metadata_field,
            };

            return Ok(guarded(name, || Ok(lookup(name, reading))));
        }

        let def = self.get(name).ok_or_else(|| FieldError::UnknownField { name: name.to_string() })?;
        let ctx = FieldContext {
            definition,
            item,
            reading,
            volume_types: self.volume_types.as_ref(),
            cost_formatter: self.cost_formatter.as_ref(),
        };

        Ok(guarded(name, || (def.resolver)(&ctx)))
    }

    /// Resolve every column for one row, in order.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] for the first column the registry does not know.
    pub fn row<S: AsRef<str>>(
        &self,
        columns: &[S],
        definition: &Definition,
        item: &Item,
        reading: &Reading,
    ) -> Result<Vec<Option<FieldValue>>, FieldError> {
        columns
            .iter()
            .map(|column| self.field_function(column.as_ref(), definition, item, reading))
            .collect()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new(VolumeTypeCatalog::default())
    }
}

/// Run a resolver, turning failures into absence.
fn guarded(name: &str, resolve: impl FnOnce() -> Resolved) -> Option<FieldValue> {
    match panic::catch_unwind(AssertUnwindSafe(resolve)) {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            log::warn!(target: LOG_TARGET, "Could not resolve field '{name}': {e}");
            None
        }
        Err(payload) => {
            log::error!(target: LOG_TARGET, "Field '{name}' panicked: {}", panic_message(payload.as_ref()));
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Resolve `name` with the process-wide registry.
///
/// The shared registry has no volume type table, so `volume_type` only ever reports raw ids
/// or the default name. Build a [`FieldRegistry`] to configure one.
///
/// # Errors
///
/// Returns [`FieldError::UnknownField`] if `name` is not a known field.
pub fn field_function(name: &str, definition: &Definition, item: &Item, reading: &Reading) -> Resolved {
    DEFAULT_REGISTRY.field_function(name, definition, item, reading)
}
