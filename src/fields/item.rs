//! Fields resolved from the per-row item, with the report definition as a fallback

use super::field_def::field_def;
use super::{FieldContext, FieldDef, Resolved};
use crate::usage::FieldValue;

pub const ITEM_FIELDS: &[FieldDef] = &[
    field_def!(
        "billing_entity",
        "Entity billed for the line item, item overrides definition",
        Item,
        billing_entity
    ),
    field_def!(
        "currency_code",
        "Currency of the cost column, item overrides definition",
        Item,
        currency_code
    ),
    field_def!("description", "Free-form description of the line item", Item, description),
    field_def!("item_rate", "Rate charged per unit of usage", Item, item_rate),
    field_def!("line_item_type", "Kind of line item (usage, tax, credit, ...)", Item, line_item_type),
    field_def!("meter_name", "Name of the meter the item prices", Item, meter_name),
    field_def!("operation", "Operation performed by the resource", Item, operation),
    field_def!("product_code", "Code of the billed product", Item, product_code),
    field_def!("product_name", "Display name of the billed product", Item, product_name),
    field_def!("usage_type", "Usage type of the billed product", Item, usage_type),
];

/// Item value first, then the definition value, then `None`.
fn item_then_definition(ctx: &FieldContext<'_>, key: &str) -> Option<FieldValue> {
    ctx.item.get(key).or_else(|| ctx.definition.get(key)).cloned()
}

#[expect(clippy::unnecessary_wraps, reason = "Resolvers share one signature")]
fn item_or_empty(ctx: &FieldContext<'_>, key: &str) -> Resolved {
    Ok(Some(ctx.item.get_or(key, "")))
}

pub fn billing_entity(ctx: &FieldContext<'_>) -> Resolved {
    Ok(item_then_definition(ctx, "billing_entity"))
}

pub fn currency_code(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(item_then_definition(ctx, "currency_code").unwrap_or_else(|| FieldValue::from(""))))
}

pub fn description(ctx: &FieldContext<'_>) -> Resolved {
    item_or_empty(ctx, "description")
}

pub fn item_rate(ctx: &FieldContext<'_>) -> Resolved {
    Ok(Some(ctx.item.get_or("item_rate", 0.0)))
}

pub fn line_item_type(ctx: &FieldContext<'_>) -> Resolved {
    item_or_empty(ctx, "line_item_type")
}

/// `None` when the item has no meter, which is different from a meter with an empty name.
pub fn meter_name(ctx: &FieldContext<'_>) -> Resolved {
    Ok(ctx.item.get("meter_name").cloned())
}

pub fn operation(ctx: &FieldContext<'_>) -> Resolved {
    item_or_empty(ctx, "operation")
}

pub fn product_code(ctx: &FieldContext<'_>) -> Resolved {
    item_or_empty(ctx, "product_code")
}

pub fn product_name(ctx: &FieldContext<'_>) -> Resolved {
    item_or_empty(ctx, "product_name")
}

pub fn usage_type(ctx: &FieldContext<'_>) -> Resolved {
    item_or_empty(ctx, "usage_type")
}
