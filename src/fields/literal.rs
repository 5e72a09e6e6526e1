//! Permissive parser for Python literal text
//!
//! Some metering sources store nested metadata as the `repr` of a Python structure rather than
//! as JSON, e.g. `{'key': u'value'}` or `[{'key': 'k', 'value': 'v'}]`. This parser accepts the
//! literal subset that shows up there: quoted strings (single or double, with `u`/`b`/`r`
//! prefixes), integers, floats, `True`/`False`/`None`, lists, tuples, sets and dicts.
//!
//! Parsing never fails loudly: anything malformed yields `None`.

use crate::usage::FieldValue;

/// Nesting deeper than this is rejected rather than risking the stack.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Lists, tuples and sets
    List(Vec<Self>),
    /// Dict entries in source order
    Dict(Vec<(Self, Self)>),
}

impl Literal {
    /// Converts scalar literals to a field value; containers and `None` have no scalar form.
    #[must_use]
    pub fn to_field_value(&self) -> Option<FieldValue> {
        match self {
            Self::Bool(b) => Some(FieldValue::Boolean(*b)),
            Self::Int(i) => Some(FieldValue::Integer(*i)),
            Self::Float(f) => Some(FieldValue::Float(*f)),
            Self::Str(s) => Some(FieldValue::String(s.clone())),
            Self::None | Self::List(_) | Self::Dict(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a string key in a dict. Non-dicts have no keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        let Self::Dict(entries) = self else {
            return None;
        };

        entries.iter().find(|(k, _)| k.as_str() == Some(key)).map(|(_, v)| v)
    }

    /// Like [`Self::get`], ignoring case.
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<&Self> {
        let Self::Dict(entries) = self else {
            return None;
        };

        let wanted = key.to_lowercase();
        entries
            .iter()
            .find(|(k, _)| k.as_str().is_some_and(|k| k.to_lowercase() == wanted))
            .map(|(_, v)| v)
    }
}

/// Parse `text` as a single Python literal.
#[must_use]
pub fn parse(text: &str) -> Option<Literal> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };

    let value = parser.value(0)?;
    parser.skip_whitespace();
    parser.at_end().then_some(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self, depth: usize) -> Option<Literal> {
        if depth > MAX_DEPTH {
            return None;
        }

        self.skip_whitespace();
        match self.peek()? {
            '[' => {
                self.pos += 1;
                self.sequence(']', depth).map(|(items, _)| Literal::List(items))
            }
            '(' => {
                self.pos += 1;
                let (mut items, trailing_comma) = self.sequence(')', depth)?;
                // `(x)` is just a parenthesized value, `(x,)` is a one element tuple
                if items.len() == 1 && !trailing_comma {
                    items.pop()
                } else {
                    Some(Literal::List(items))
                }
            }
            '{' => {
                self.pos += 1;
                self.dict_or_set(depth)
            }
            '\'' | '"' => self.strings(),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            c if c.is_alphabetic() => {
                if self.string_prefix_len().is_some() {
                    self.strings()
                } else {
                    self.keyword()
                }
            }
            _ => None,
        }
    }

    /// Comma separated values up to `close`. Also reports whether a trailing comma was present.
    fn sequence(&mut self, close: char, depth: usize) -> Option<(Vec<Literal>, bool)> {
        let mut items = Vec::new();
        let mut trailing_comma = false;

        loop {
            if self.eat(close) {
                return Some((items, trailing_comma));
            }

            items.push(self.value(depth + 1)?);

            if self.eat(',') {
                trailing_comma = true;
            } else if self.eat(close) {
                return Some((items, false));
            } else {
                return None;
            }
        }
    }

    fn dict_or_set(&mut self, depth: usize) -> Option<Literal> {
        if self.eat('}') {
            return Some(Literal::Dict(Vec::new()));
        }

        let first = self.value(depth + 1)?;
        if !self.eat(':') {
            // A set literal, which only matters to us as a sequence
            let mut items = vec![first];
            if self.eat(',') {
                let (rest, _) = self.sequence('}', depth)?;
                items.extend(rest);
            } else if !self.eat('}') {
                return None;
            }
            return Some(Literal::List(items));
        }

        let mut entries = vec![(first, self.value(depth + 1)?)];
        loop {
            if self.eat('}') {
                return Some(Literal::Dict(entries));
            }
            if !self.eat(',') {
                return None;
            }
            if self.eat('}') {
                return Some(Literal::Dict(entries));
            }

            let key = self.value(depth + 1)?;
            if !self.eat(':') {
                return None;
            }
            entries.push((key, self.value(depth + 1)?));
        }
    }

    /// Length of a string prefix such as `u`, `b`, `r` or `br` if one starts here.
    fn string_prefix_len(&self) -> Option<usize> {
        let is_prefix = |c: char| matches!(c.to_ascii_lowercase(), 'u' | 'b' | 'r');

        match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some(a), Some('\'' | '"'), _) if is_prefix(a) => Some(1),
            (Some(a), Some(b), Some('\'' | '"')) if is_prefix(a) && is_prefix(b) => Some(2),
            _ => None,
        }
    }

    /// One or more adjacent string literals, concatenated as Python does.
    fn strings(&mut self) -> Option<Literal> {
        let mut result = self.string()?;
        loop {
            let save = self.pos;
            self.skip_whitespace();
            let starts_string = matches!(self.peek(), Some('\'' | '"')) || self.string_prefix_len().is_some();
            if !starts_string {
                self.pos = save;
                return Some(Literal::Str(result));
            }
            result.push_str(&self.string()?);
        }
    }

    fn string(&mut self) -> Option<String> {
        let mut raw = false;
        if let Some(len) = self.string_prefix_len() {
            for _ in 0..len {
                raw |= self.bump()?.eq_ignore_ascii_case(&'r');
            }
        }

        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            let c = self.bump()?;
            if c == quote {
                return Some(out);
            }

            if c != '\\' {
                out.push(c);
                continue;
            }

            let escaped = self.bump()?;
            if raw {
                out.push('\\');
                out.push(escaped);
                continue;
            }

            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' | '\'' | '"' => out.push(escaped),
                '\n' => {}
                'x' => out.push(self.hex_escape(2)?),
                'u' => out.push(self.hex_escape(4)?),
                'U' => out.push(self.hex_escape(8)?),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            code = code * 16 + self.bump()?.to_digit(16)?;
        }
        char::from_u32(code)
    }

    fn number(&mut self) -> Option<Literal> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    if matches!(self.peek_at(1), Some('-' | '+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
            self.pos += 1;
        }

        let text: String = self.chars[start..self.pos].iter().filter(|c| **c != '_').collect();

        // Python 2 long integers carry an `L` suffix in their repr
        if !is_float && matches!(self.peek(), Some('L' | 'l')) {
            self.pos += 1;
        }

        if is_float {
            text.parse().ok().map(Literal::Float)
        } else {
            // Integers past the i64 range degrade to a float
            text.parse()
                .ok()
                .map(Literal::Int)
                .or_else(|| text.parse().ok().map(Literal::Float))
        }
    }

    fn keyword(&mut self) -> Option<Literal> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }

        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Some(Literal::Bool(true)),
            "False" => Some(Literal::Bool(false)),
            "None" => Some(Literal::None),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Literal {
        Literal::Str(value.to_string())
    }

    #[test]
    fn test_single_quoted_dict() {
        let parsed = parse("{'tESt': 'glance', 'size': 10}").unwrap();
        assert_eq!(parsed.get_ignore_case("TEST"), Some(&s("glance")));
        assert_eq!(parsed.get_ignore_case("size"), Some(&Literal::Int(10)));
        assert_eq!(parsed.get_ignore_case("missing"), None);
        assert_eq!(parsed.get("test"), None);
        assert_eq!(parsed.get("tESt"), Some(&s("glance")));
    }

    #[test]
    fn test_list_of_key_value_pairs() {
        let parsed = parse("[{'key': 'test', 'value': 'cinder'}, {'key': 'b', 'value': 2}]").unwrap();
        let Literal::List(items) = parsed else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get_ignore_case("value"), Some(&s("cinder")));
        assert_eq!(items[1].get_ignore_case("value"), Some(&Literal::Int(2)));
    }

    #[test]
    fn test_unicode_prefixes_and_escapes() {
        assert_eq!(parse(r"u'caf\xe9'"), Some(s("café")));
        assert_eq!(parse(r#""it's""#), Some(s("it's")));
        assert_eq!(parse(r"'it\'s'"), Some(s("it's")));
        assert_eq!(parse(r"'été'"), Some(s("été")));
        assert_eq!(parse(r"r'a\nb'"), Some(s(r"a\nb")));
        assert_eq!(parse("'a' 'b'"), Some(s("ab")));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("True"), Some(Literal::Bool(true)));
        assert_eq!(parse("None"), Some(Literal::None));
        assert_eq!(parse("-12"), Some(Literal::Int(-12)));
        assert_eq!(parse("10L"), Some(Literal::Int(10)));
        assert_eq!(parse("1.5e3"), Some(Literal::Float(1500.0)));
        assert_eq!(parse(".5"), Some(Literal::Float(0.5)));
    }

    #[test]
    fn test_oversized_integers_become_floats() {
        assert_eq!(parse("9223372036854775807"), Some(Literal::Int(i64::MAX)));
        assert_eq!(parse("9223372036854775808"), Some(Literal::Float(9_223_372_036_854_775_808.0)));
        assert_eq!(parse("-99999999999999999999L"), Some(Literal::Float(-1e20)));
    }

    #[test]
    fn test_tuples_and_sets() {
        assert_eq!(parse("(1)"), Some(Literal::Int(1)));
        assert_eq!(parse("(1,)"), Some(Literal::List(vec![Literal::Int(1)])));
        assert_eq!(parse("()"), Some(Literal::List(vec![])));
        assert_eq!(parse("{'a', 'b'}"), Some(Literal::List(vec![s("a"), s("b")])));
    }

    #[test]
    fn test_trailing_commas_and_whitespace() {
        let parsed = parse(" { 'a' : [ 1 , 2 , ] , } ").unwrap();
        assert_eq!(
            parsed.get_ignore_case("a"),
            Some(&Literal::List(vec![Literal::Int(1), Literal::Int(2)]))
        );
    }

    #[test]
    fn test_json_is_accepted() {
        let parsed = parse(r#"{"key": "value", "n": 1.25}"#).unwrap();
        assert_eq!(parsed.get_ignore_case("key"), Some(&s("value")));
        assert_eq!(parsed.get_ignore_case("n"), Some(&Literal::Float(1.25)));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for text in [
            "",
            "{'a': 1",
            "[1, 2",
            "{'a' 1}",
            "'unterminated",
            "nova-compute",
            "{'a': 1} trailing",
            "[1 2]",
            "__import__('os')",
            "'\\x4'",
        ] {
            assert_eq!(parse(text), None, "'{text}' should not parse");
        }
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 5), "]".repeat(MAX_DEPTH + 5));
        assert_eq!(parse(&deep), None);

        let shallow = format!("{}{}", "[".repeat(8), "]".repeat(8));
        assert!(parse(&shallow).is_some());
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(s("x").to_field_value(), Some(FieldValue::from("x")));
        assert_eq!(Literal::Int(3).to_field_value(), Some(FieldValue::Integer(3)));
        assert_eq!(Literal::None.to_field_value(), None);
        assert_eq!(Literal::List(vec![]).to_field_value(), None);
    }
}
