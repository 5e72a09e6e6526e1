use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum FieldGroup {
    /// Resolved from the per-row item overrides and the report definition
    Item,
    /// Resolved from the usage reading
    Reading,
    /// Properties of the report as a whole
    Report,
}
