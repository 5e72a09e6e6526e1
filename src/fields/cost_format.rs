//! Rendering of cost values
//!
//! Report definitions carry their cost format as a `str.format` style template such as
//! `{:.2f}` or `{:,.2f} USD`. [`CostFormat`] understands the subset of that mini-language that
//! makes sense for a single number. Callers that need something else implement
//! [`CostFormatter`] themselves and hand it to the registry.

use super::FieldError;
use crate::usage::FieldValue;
use core::fmt::Debug;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_COST_FORMAT: &str = "{:.2f}";

/// Default precision of the `f`, `e` and `%` presentation types.
const DEFAULT_PRECISION: usize = 6;

static SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<fill>.)?(?P<align>[<>^=]))?(?P<sign>[+\- ])?(?P<zero>0)?(?P<width>\d+)?(?P<grouping>[,_])?(?:\.(?P<precision>\d+))?(?P<kind>[fFeE%])?$",
    )
    .expect("invalid regex")
});

/// Turns a cost into the text placed in the report
pub trait CostFormatter: Debug + Send + Sync {
    fn format_cost(&self, cost: f64) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// No presentation type: shortest round-trip representation
    Repr,
    Fixed { upper: bool },
    Exponent { upper: bool },
    Percent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Spec {
    fill: char,
    align: Align,
    sign: Option<char>,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Value(Spec),
}

/// A parsed cost template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostFormat {
    template: String,
    segments: Vec<Segment>,
}

impl CostFormat {
    /// Parse a template
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidCostFormat`] if the template is not a valid single-value
    /// format string.
    pub fn parse(template: &str) -> Result<Self, FieldError> {
        let invalid = |reason: &str| FieldError::InvalidCostFormat {
            format: template.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut auto_fields = 0;
        let mut indexed_fields = 0;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    let _ = chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    let _ = chars.next();
                    text.push('}');
                }
                '}' => return Err(invalid("single '}' encountered")),
                '{' => {
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("nested replacement fields are not supported")),
                            Some(c) => field.push(c),
                            None => return Err(invalid("unterminated replacement field")),
                        }
                    }

                    let (name, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                    match name {
                        "" => auto_fields += 1,
                        "0" => indexed_fields += 1,
                        _ => return Err(invalid("the replacement field must be '{}' or '{0}'")),
                    }

                    if !text.is_empty() {
                        segments.push(Segment::Text(core::mem::take(&mut text)));
                    }
                    segments.push(Segment::Value(Spec::parse(spec).ok_or_else(|| invalid("unsupported format specification"))?));
                }
                c => text.push(c),
            }
        }

        if auto_fields > 0 && indexed_fields > 0 {
            return Err(invalid("cannot mix automatic and manual field numbering"));
        }

        if auto_fields > 1 {
            return Err(invalid("only one value is available to format"));
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for CostFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_COST_FORMAT.to_string(),
            segments: vec![Segment::Value(Spec {
                fill: ' ',
                align: Align::Right,
                sign: None,
                width: 0,
                grouping: None,
                precision: Some(2),
                kind: Kind::Fixed { upper: false },
            })],
        }
    }
}

impl CostFormatter for CostFormat {
    fn format_cost(&self, cost: f64) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.clone(),
                Segment::Value(spec) => spec.render(cost),
            })
            .collect()
    }
}

impl Spec {
    fn parse(spec: &str) -> Option<Self> {
        let captures = SPEC_REGEX.captures(spec)?;
        let get = |name: &str| captures.name(name).map(|m| m.as_str());

        let kind = match get("kind") {
            None => Kind::Repr,
            Some("f") => Kind::Fixed { upper: false },
            Some("F") => Kind::Fixed { upper: true },
            Some("e") => Kind::Exponent { upper: false },
            Some("E") => Kind::Exponent { upper: true },
            Some("%") => Kind::Percent,
            Some(_) => return None,
        };

        let precision = match get("precision") {
            Some(p) => Some(bounded(p)?),
            None => None,
        };

        // Without a presentation type a precision would mean significant digits, which we don't do
        if kind == Kind::Repr && precision.is_some() {
            return None;
        }

        let explicit_align = match get("align") {
            Some("<") => Some(Align::Left),
            Some(">") => Some(Align::Right),
            Some("^") => Some(Align::Center),
            Some("=") => Some(Align::AfterSign),
            _ => None,
        };

        let zero = get("zero").is_some();
        let (fill, align) = match (explicit_align, zero) {
            (Some(align), _) => (get("fill").and_then(|f| f.chars().next()).unwrap_or(' '), align),
            (None, true) => ('0', Align::AfterSign),
            (None, false) => (' ', Align::Right),
        };

        Some(Self {
            fill,
            align,
            sign: get("sign").and_then(|s| s.chars().next()),
            width: match get("width") {
                Some(w) => bounded(w)?,
                None => 0,
            },
            grouping: get("grouping").and_then(|g| g.chars().next()),
            precision,
            kind,
        })
    }

    fn render(&self, value: f64) -> String {
        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else {
            match self.sign {
                Some('+') => "+",
                Some(' ') => " ",
                _ => "",
            }
        };

        let body = self.body(value.abs());
        let body = match self.grouping {
            Some(separator) => group_digits(&body, separator),
            None => body,
        };

        let len = sign.chars().count() + body.chars().count();
        let padding = self.width.saturating_sub(len);
        let pad = |n: usize| self.fill.to_string().repeat(n);

        match self.align {
            Align::Left => format!("{sign}{body}{}", pad(padding)),
            Align::Right => format!("{}{sign}{body}", pad(padding)),
            Align::Center => format!("{}{sign}{body}{}", pad(padding / 2), pad(padding - padding / 2)),
            Align::AfterSign => format!("{sign}{}{body}", pad(padding)),
        }
    }

    fn body(&self, magnitude: f64) -> String {
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        let upper = matches!(self.kind, Kind::Fixed { upper: true } | Kind::Exponent { upper: true });

        if !magnitude.is_finite() {
            let text = if magnitude.is_nan() { "nan" } else { "inf" };
            let text = if upper { text.to_uppercase() } else { text.to_string() };
            return if self.kind == Kind::Percent { format!("{text}%") } else { text };
        }

        match self.kind {
            Kind::Repr => FieldValue::Float(magnitude).to_string(),
            Kind::Fixed { .. } => format!("{magnitude:.precision$}"),
            Kind::Percent => format!("{:.precision$}%", magnitude * 100.0),
            Kind::Exponent { upper } => {
                let text = format!("{magnitude:.precision$e}");
                let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let e = if upper { 'E' } else { 'e' };
                let exp_sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}{e}{exp_sign}{:02}", exponent.abs())
            }
        }
    }
}

/// Widths and precisions are capped at `u16::MAX` so rendering stays small.
fn bounded(digits: &str) -> Option<usize> {
    digits.parse::<u16>().ok().map(usize::from)
}

/// Inserts `separator` between thousands in the integer part of `body`.
fn group_digits(body: &str, separator: char) -> String {
    let int_len = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
    let (int_part, rest) = body.split_at(int_len);

    let mut grouped = String::with_capacity(body.len() + int_len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped.push_str(rest);
    grouped
}
