use super::{CostFormatter, FieldError, FieldGroup};
use crate::usage::{Definition, FieldValue, Item, Reading, VolumeTypeNames};

/// Outcome of a single resolver: a value, an expected absence, or a failure.
pub type Resolved = Result<Option<FieldValue>, FieldError>;

/// Everything a resolver may look at
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub definition: &'a Definition,
    pub item: &'a Item,
    pub reading: &'a Reading,
    pub volume_types: &'a dyn VolumeTypeNames,

    /// Used for `cost` when the definition does not name its own `cost_format`
    pub cost_formatter: &'a dyn CostFormatter,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub description: &'static str,
    pub group: FieldGroup,
    pub resolver: fn(&FieldContext<'_>) -> Resolved,
}

macro_rules! field_def {
    ($name:expr, $description:expr, $group:ident, $resolver:expr) => {
        $crate::fields::FieldDef {
            name: $name,
            description: $description,
            group: $crate::fields::FieldGroup::$group,
            resolver: $resolver,
        }
    };
}

pub(crate) use field_def;
