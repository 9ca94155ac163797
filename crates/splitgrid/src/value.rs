//! Cell values.
//!
//! A grid cell holds one of four scalar shapes. Display forms are lossless
//! for strings and booleans; numbers drop a trailing `.0` so integral values
//! print without a fraction.

/// A single field value inside a [`crate::row::Row`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Display form used by the default cell renderer and by identity
    /// concatenation. `Null` maps to the empty string.
    pub fn display(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }

    /// Numeric key used by the default sorter. `Null` counts as zero, numbers
    /// are taken as-is, and strings are parsed by longest numeric prefix
    /// (`"10px"` reads as `10`). Anything unparseable yields `None`, which the
    /// sorter treats as an equal pair.
    pub fn sort_key(&self) -> Option<f64> {
        match self {
            Value::Null => Some(0.0),
            Value::Num(n) => {
                if n.is_nan() {
                    None
                } else {
                    Some(*n)
                }
            }
            Value::Str(s) => parse_float_prefix(s),
            Value::Bool(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Parse the longest leading float out of `s`, skipping leading whitespace.
/// Accepts an optional sign, a literal `Infinity`, a decimal mantissa and an
/// exponent part; a dangling exponent marker (`"7e"`, `"7e-"`) is not
/// consumed, so only the mantissa counts.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse::<f64>().ok();
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Str("abc".into()).display(), "abc");
        assert_eq!(Value::Num(3.0).display(), "3");
        assert_eq!(Value::Num(3.5).display(), "3.5");
        assert_eq!(Value::Bool(true).display(), "true");
        assert_eq!(Value::Null.display(), "");
    }

    #[test]
    fn sort_key_null_is_zero() {
        assert_eq!(Value::Null.sort_key(), Some(0.0));
    }

    #[test]
    fn sort_key_parses_numeric_prefix() {
        assert_eq!(Value::Str("10".into()).sort_key(), Some(10.0));
        assert_eq!(Value::Str("10px".into()).sort_key(), Some(10.0));
        assert_eq!(Value::Str("-2.5".into()).sort_key(), Some(-2.5));
        assert_eq!(Value::Str("abc".into()).sort_key(), None);
        assert_eq!(Value::Str("".into()).sort_key(), None);
    }

    #[test]
    fn sort_key_handles_exponents_and_infinity() {
        assert_eq!(Value::Str("1e3".into()).sort_key(), Some(1000.0));
        assert_eq!(Value::Str("2.5e-1x".into()).sort_key(), Some(0.25));
        assert_eq!(Value::Str("-1E2".into()).sort_key(), Some(-100.0));
        // A bare exponent marker is not part of the number.
        assert_eq!(Value::Str("7e".into()).sort_key(), Some(7.0));
        assert_eq!(Value::Str("7e-".into()).sort_key(), Some(7.0));
        assert_eq!(
            Value::Str("Infinity".into()).sort_key(),
            Some(f64::INFINITY)
        );
        assert_eq!(
            Value::Str("-Infinity and beyond".into()).sort_key(),
            Some(f64::NEG_INFINITY)
        );
        assert_eq!(Value::Str("Inf".into()).sort_key(), None);
    }
}
