use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// A scalar that can appear in a mapping, in reading metadata, or in an output row
///
/// Absence is never a variant: callers carry `Option<FieldValue>` and render `None`
/// as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value if it is a number, without attempting to parse strings.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Rates and quantities are well within f64 precision")]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Boolean(_) | Self::String(_) => None,
        }
    }

    /// Converts the value to a float the way a measured quantity is interpreted.
    ///
    /// Numbers convert directly, booleans become 1 or 0, and strings are trimmed and parsed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::String(s) => s.trim().parse().ok(),
            Self::Integer(_) | Self::Float(_) => self.as_number(),
        }
    }

    /// An empty string carries no information and is treated as unset by metadata lookups.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write_float(f, *v),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// Shortest round-trip form, positional for decimal exponents in `-4..16` and scientific
/// (`1e+16`, `1.5e-05`) outside that range.
fn write_float(f: &mut Formatter<'_>, v: f64) -> core::fmt::Result {
    if v.is_nan() {
        return f.write_str("nan");
    }
    if v.is_infinite() {
        return write!(f, "{v}");
    }
    if v == 0.0 {
        return write!(f, "{v:.1}");
    }

    let scientific = format!("{v:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        // Integral floats keep their trailing ".0" so they stay distinguishable from integers
        if v.fract() == 0.0 {
            write!(f, "{v:.1}")
        } else {
            write!(f, "{v}")
        }
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{exp_sign}{:02}", exponent.abs())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
