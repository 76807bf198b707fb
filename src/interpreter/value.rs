use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Runtime value produced by evaluating a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    /// Result of reading an undefined name, a declaration without an
    /// initializer, or a call that finished without `return`.
    Null,
}

impl Value {
    /// Builds a string value from literal source text, decoding backslash escapes.
    pub(crate) fn from_string_literal(raw: &str) -> Self {
        Value::String(decode_escapes(raw))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::String(value) => !value.is_empty(),
            Value::Bool(value) => *value,
            Value::Null => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Null => "undefined",
        }
    }

    pub fn to_output(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write_number(*value, f),
            Value::String(value) => f.write_str(value),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Null => f.write_str("undefined"),
        }
    }
}

fn write_number(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else if value == 0.0 {
        // Covers -0 as well.
        f.write_str("0")
    } else if (1e-6..1e21).contains(&value.abs()) {
        write!(f, "{value}")
    } else {
        write_exponent(value, f)
    }
}

/// Shortest digits in `1.5e+300` / `1e-7` form.
fn write_exponent(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&formatted),
    }
}

fn decode_escapes(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('r') => decoded.push('\r'),
            Some('0') => decoded.push('\0'),
            Some(quote @ ('\\' | '\'' | '"')) => decoded.push(quote),
            Some(prefix @ ('x' | 'u')) => {
                let digits = if prefix == 'x' { 2 } else { 4 };
                match read_hex_char(&mut chars, digits) {
                    Some(ch) => decoded.push(ch),
                    None => {
                        decoded.push('\\');
                        decoded.push(prefix);
                    }
                }
            }
            // Unknown escapes are kept verbatim.
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            }
            None => decoded.push('\\'),
        }
    }
    decoded
}

/// Consumes exactly `digits` hex digits if they are all present and form a valid char.
fn read_hex_char(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let lookahead = chars.clone().take(digits).collect::<String>();
    if lookahead.len() != digits || !lookahead.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let ch = u32::from_str_radix(&lookahead, 16)
        .ok()
        .and_then(char::from_u32)?;
    for _ in 0..digits {
        chars.next();
    }
    Some(ch)
}
