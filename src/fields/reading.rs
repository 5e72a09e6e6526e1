//! Fields resolved from the usage reading

use super::cost_format::CostFormat;
use super::field_def::field_def;
use super::{CostFormatter, FieldContext, FieldDef, FieldError, Resolved};
use crate::usage::{FieldValue, isoformat};

pub const READING_FIELDS: &[FieldDef] = &[
    field_def!(
        "availability_zone",
        "Availability zone the resource runs in",
        Reading,
        availability_zone
    ),
    field_def!(
        "billing_period_end_date",
        "End of the billing period, in ISO-8601",
        Reading,
        billing_period_end_date
    ),
    field_def!(
        "billing_period_start_date",
        "Start of the billing period, in ISO-8601",
        Reading,
        billing_period_start_date
    ),
    field_def!("cost", "Item rate times the measured quantity, formatted", Reading, cost),
    field_def!("display_name", "Display name of the resource", Reading, display_name),
    field_def!("hours", "Length of the reading window in hours", Reading, hours),
    field_def!("instance_type", "Flavor of a compute instance", Reading, instance_type),
    field_def!(
        "payer_account_id",
        "Account paying for the usage, currently the project",
        Reading,
        payer_account_id
    ),
    field_def!("project_id", "Project that owns the resource", Reading, project_id),
    field_def!("resource_id", "Identifier of the metered resource", Reading, resource_id),
    field_def!(
        "timeinterval",
        "Reading window as an ISO-8601 start/stop interval",
        Reading,
        timeinterval
    ),
    field_def!(
        "usage_account_id",
        "Account that used the resource, currently the project",
        Reading,
        usage_account_id
    ),
    field_def!("usage_amount", "Measured quantity, as reported by the meter", Reading, usage_amount),
    field_def!("usage_end_date", "End of the reading window, in ISO-8601", Reading, usage_end_date),
    field_def!(
        "usage_start_date",
        "Start of the reading window, in ISO-8601",
        Reading,
        usage_start_date
    ),
    field_def!("volume_type", "Human readable block storage volume type", Reading, volume_type),
];

fn metadata_value(ctx: &FieldContext<'_>, key: &str) -> Option<FieldValue> {
    ctx.reading.metadata.get(key).cloned()
}

pub fn availability_zone(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(metadata_value(ctx, "availability_zone").unwrap_or_else(|| FieldValue::from(""))))
}

pub fn billing_period_end_date(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(isoformat(&ctx.reading.stop).into()))
}

pub fn billing_period_start_date(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(isoformat(&ctx.reading.start).into()))
}

/// Rate times quantity. A `cost_format` in the definition wins over the context's formatter.
pub fn cost(ctx: &FieldContext<'_>) -> Resolved {
    let own_format = match ctx.definition.get("cost_format") {
        Some(FieldValue::String(template)) => Some(CostFormat::parse(template)?),
        Some(other) => {
            return Err(FieldError::InvalidCostFormat {
                format: other.to_string(),
                reason: "the format must be a string".to_string(),
            });
        }
        None => None,
    };

    let value = ctx.reading.value.as_f64().ok_or_else(|| FieldError::InvalidNumber {
        what: "reading value",
        value: ctx.reading.value.to_string(),
    })?;

    let rate = match ctx.item.get("item_rate") {
        Some(rate) => rate.as_number().ok_or_else(|| FieldError::InvalidNumber {
            what: "item_rate",
            value: rate.to_string(),
        })?,
        None => 0.0,
    };

    let cost = match &own_format {
        Some(format) => format.format_cost(value * rate),
        None => ctx.cost_formatter.format_cost(value * rate),
    };

    Ok(Some(cost.into()))
}

pub fn display_name(ctx: &FieldContext<'_>) -> Resolved {
    Ok(metadata_value(ctx, "display_name"))
}

pub fn hours(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(FieldValue::Float(ctx.reading.hours())))
}

pub fn instance_type(ctx: &FieldContext<'_>) -> Resolved {
    Ok(metadata_value(ctx, "instance_type"))
}

pub fn payer_account_id(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(ctx.reading.project_id.as_str().into()))
}

pub fn project_id(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(ctx.reading.project_id.as_str().into()))
}

pub fn resource_id(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(ctx.reading.resource_id.as_str().into()))
}

pub fn timeinterval(ctx: &FieldContext<'_>) -> Resolved {
    let interval = format!("{}/{}", isoformat(&ctx.reading.start), isoformat(&ctx.reading.stop));
    Ok(Some(interval.into()))
}

pub fn usage_account_id(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(ctx.reading.project_id.as_str().into()))
}

pub fn usage_amount(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(ctx.reading.value.clone()))
}

pub fn usage_end_date(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(isoformat(&ctx.reading.stop).into()))
}

pub fn usage_start_date(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(isoformat(&ctx.reading.start).into()))
}

/// The volume type id from the metadata, mapped to its name; the lookup picks a fallback
/// name when the reading has no volume type at all.
pub fn volume_type(ctx: &FieldContext<'_>) -> Resolved {
    let id = metadata_value(ctx, "volume_type").map(|id| id.to_string());
    Ok(Some(ctx.volume_types.name_from_id(id.as_deref()).into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{Fixture, reading, reading_spanning, reading_with_metadata};
    use crate::usage::{Definition, Item, Metadata};
    use chrono::Duration;

    fn s(value: &str) -> Option<FieldValue> {
        Some(FieldValue::from(value))
    }

    fn resolve(resolver: fn(&FieldContext<'_>) -> Resolved, fx: &Fixture) -> Option<FieldValue> {
        resolver(&fx.ctx()).unwrap()
    }

    #[test]
    fn test_reading_identity_fields() {
        let fx = Fixture::default();
        assert_eq!(resolve(resource_id, &fx), s("resource_id"));
        assert_eq!(resolve(project_id, &fx), s("project_id"));
        assert_eq!(resolve(payer_account_id, &fx), s("project_id"));
        assert_eq!(resolve(usage_account_id, &fx), s("project_id"));
        assert_eq!(resolve(usage_amount, &fx), s("value"));
    }

    #[test]
    fn test_dates() {
        let fx = Fixture::with_reading(reading_spanning(Duration::hours(1)));
        let start = isoformat(&fx.reading.start);
        let stop = isoformat(&fx.reading.stop);

        assert_eq!(resolve(billing_period_start_date, &fx), s(&start));
        assert_eq!(resolve(usage_start_date, &fx), s(&start));
        assert_eq!(resolve(billing_period_end_date, &fx), s(&stop));
        assert_eq!(resolve(usage_end_date, &fx), s(&stop));
        assert_eq!(resolve(timeinterval, &fx), s(&format!("{start}/{stop}")));
    }

    #[test]
    fn test_timeinterval_literal() {
        let fx = Fixture::with_reading(reading_spanning(Duration::hours(1)));
        assert_eq!(resolve(timeinterval, &fx), s("2024-01-01T00:00:00/2024-01-01T01:00:00"));
    }

    #[test]
    fn test_hours() {
        let fx = Fixture::with_reading(reading_spanning(Duration::hours(1)));
        assert_eq!(resolve(hours, &fx), Some(FieldValue::Float(1.0)));

        let fx = Fixture::with_reading(reading_spanning(Duration::minutes(30)));
        assert_eq!(resolve(hours, &fx), Some(FieldValue::Float(0.5)));
    }

    #[test]
    fn test_cost_default_format() {
        let mut r = reading();
        r.value = FieldValue::from("1.2345");
        let fx = Fixture::new(Definition::new(), Item::new().with("item_rate", 1.0), r);
        assert_eq!(resolve(cost, &fx), s("1.23"));
    }

    #[test]
    fn test_cost_custom_format() {
        let mut r = reading();
        r.value = FieldValue::from("1.2345");
        let definition = Definition::new().with("cost_format", "{:.1f}");
        let fx = Fixture::new(definition, Item::new().with("item_rate", 1.0), r);
        assert_eq!(resolve(cost, &fx), s("1.2"));
    }

    #[test]
    fn test_cost_uses_the_context_formatter() {
        #[derive(Debug)]
        struct Cents;

        impl CostFormatter for Cents {
            fn format_cost(&self, cost: f64) -> String {
                format!("{:.0} cents", cost * 100.0)
            }
        }

        let mut r = reading();
        r.value = FieldValue::from("2");
        let fx = Fixture::new(Definition::new(), Item::new().with("item_rate", 0.25), r);
        let mut ctx = fx.ctx();
        ctx.cost_formatter = &Cents;
        assert_eq!(cost(&ctx).unwrap(), s("50 cents"));

        let fx = Fixture::new(
            Definition::new().with("cost_format", "{:.3f}"),
            Item::new().with("item_rate", 0.25),
            fx.reading.clone(),
        );
        let mut ctx = fx.ctx();
        ctx.cost_formatter = &Cents;
        assert_eq!(cost(&ctx).unwrap(), s("0.500"));
    }

    #[test]
    fn test_cost_without_rate_is_zero() {
        let mut r = reading();
        r.value = FieldValue::Integer(12);
        let fx = Fixture::with_reading(r);
        assert_eq!(resolve(cost, &fx), s("0.00"));
    }

    #[test]
    fn test_cost_rejects_non_numeric_value() {
        let fx = Fixture::new(Definition::new(), Item::new().with("item_rate", 1.0), reading());
        let err = cost(&fx.ctx()).unwrap_err();
        assert!(matches!(err, FieldError::InvalidNumber { what: "reading value", .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_cost_rejects_non_numeric_rate() {
        let mut r = reading();
        r.value = FieldValue::from("2");
        let fx = Fixture::new(Definition::new(), Item::new().with("item_rate", "cheap"), r);
        let err = cost(&fx.ctx()).unwrap_err();
        assert!(matches!(err, FieldError::InvalidNumber { what: "item_rate", .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_cost_rejects_bad_format() {
        let mut r = reading();
        r.value = FieldValue::from("2");
        let definition = Definition::new().with("cost_format", "{:.2q}");
        let fx = Fixture::new(definition, Item::new().with("item_rate", 1.0), r);
        assert!(matches!(cost(&fx.ctx()), Err(FieldError::InvalidCostFormat { .. })));
    }

    #[test]
    fn test_display_name_and_instance_type() {
        let fx = Fixture::default();
        assert_eq!(resolve(display_name, &fx), None);
        assert_eq!(resolve(instance_type, &fx), None);

        let metadata = Metadata::new()
            .with("display_name", "display_name")
            .with("instance_type", "instance_type");
        let fx = Fixture::with_reading(reading_with_metadata(metadata));
        assert_eq!(resolve(display_name, &fx), s("display_name"));
        assert_eq!(resolve(instance_type, &fx), s("instance_type"));
    }

    #[test]
    fn test_availability_zone_defaults_to_empty() {
        let fx = Fixture::default();
        assert_eq!(resolve(availability_zone, &fx), s(""));

        let metadata = Metadata::new().with("availability_zone", "nova");
        let fx = Fixture::with_reading(reading_with_metadata(metadata));
        assert_eq!(resolve(availability_zone, &fx), s("nova"));
    }

    #[test]
    fn test_volume_type_uses_the_lookup() {
        let fx = Fixture::default();
        assert_eq!(resolve(volume_type, &fx), s("fallback"));

        let metadata = Metadata::new().with("volume_type", "3f2a");
        let fx = Fixture::with_reading(reading_with_metadata(metadata));
        assert_eq!(resolve(volume_type, &fx), s("ssd"));
    }
}
