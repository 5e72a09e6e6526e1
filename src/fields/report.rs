//! Fields describing the report as a whole

use super::field_def::field_def;
use super::{FieldContext, FieldDef, Resolved};

pub const REPORT_FIELDS: &[FieldDef] = &[field_def!(
    "invoice_id",
    "Invoice the line item belongs to, not assigned yet",
    Report,
    invoice_id
)];

// TODO: fill from the invoicing system once report runs are tied to an invoice
pub fn invoice_id(_ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some("".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::Fixture;
    use crate::usage::FieldValue;

    #[test]
    fn test_invoice_id_is_empty() {
        let fx = Fixture::default();
        assert_eq!(invoice_id(&fx.ctx()).unwrap(), Some(FieldValue::from("")));
    }
}
