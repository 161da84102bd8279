//! # Number-like values.
//!
//! [`PriorityValue`] is what callers hand in for priorities and timeouts. It is
//! coerced to an `i64` with these rules:
//!
//! - `Int(n)` → `n`
//! - `Float(f)` → truncated toward zero; NaN and infinities are rejected
//! - `Text(s)` → leading whitespace skipped, optional sign, then the run of ASCII
//!   digits; anything after the digits is ignored (`"12px"` → `12`), no digits is
//!   rejected
//!
//! ## Example
//! ```rust
//! use tierload::PriorityValue;
//!
//! assert_eq!(PriorityValue::from(3), PriorityValue::Int(3));
//! assert_eq!(PriorityValue::from("2"), PriorityValue::Text("2".into()));
//! ```

use std::fmt;

/// Number-like input value.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorityValue {
    /// Integer value, used as-is.
    Int(i64),
    /// Floating point value, truncated.
    Float(f64),
    /// Numeric string, parsed as a decimal integer prefix.
    Text(String),
}

/// Why a value did not coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coercion {
    NotNumeric,
    NotFinite,
    OutOfRange,
}

impl PriorityValue {
    /// Coerces the value to an integer.
    pub(crate) fn coerce(&self) -> Result<i64, Coercion> {
        match self {
            PriorityValue::Int(n) => Ok(*n),
            PriorityValue::Float(f) => coerce_float(*f),
            PriorityValue::Text(s) => parse_int_prefix(s),
        }
    }
}

fn coerce_float(f: f64) -> Result<i64, Coercion> {
    if !f.is_finite() {
        return Err(Coercion::NotFinite);
    }
    let t = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which itself does not fit.
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return Err(Coercion::OutOfRange);
    }
    Ok(t as i64)
}

fn parse_int_prefix(s: &str) -> Result<i64, Coercion> {
    let s = s.trim_start();
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(Coercion::NotNumeric);
    }
    let sign_len = s.len() - unsigned.len();
    s[..sign_len + digits]
        .parse::<i64>()
        .map_err(|_| Coercion::OutOfRange)
}

impl fmt::Display for PriorityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityValue::Int(n) => write!(f, "{n}"),
            PriorityValue::Float(v) => write!(f, "{v}"),
            PriorityValue::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for PriorityValue {
            fn from(v: $t) -> Self {
                PriorityValue::Int(i64::from(v))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for PriorityValue {
    fn from(v: f32) -> Self {
        PriorityValue::Float(f64::from(v))
    }
}

impl From<f64> for PriorityValue {
    fn from(v: f64) -> Self {
        PriorityValue::Float(v)
    }
}

impl From<&str> for PriorityValue {
    fn from(v: &str) -> Self {
        PriorityValue::Text(v.to_string())
    }
}

impl From<String> for PriorityValue {
    fn from(v: String) -> Self {
        PriorityValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_pass_through() {
        assert_eq!(PriorityValue::Int(-4).coerce(), Ok(-4));
        assert_eq!(PriorityValue::from(7u32).coerce(), Ok(7));
    }

    #[test]
    fn test_floats_truncate_toward_zero() {
        assert_eq!(PriorityValue::Float(2.9).coerce(), Ok(2));
        assert_eq!(PriorityValue::Float(-2.9).coerce(), Ok(-2));
        assert_eq!(
            PriorityValue::Float(f64::NAN).coerce(),
            Err(Coercion::NotFinite)
        );
        assert_eq!(
            PriorityValue::Float(f64::INFINITY).coerce(),
            Err(Coercion::NotFinite)
        );
        assert_eq!(
            PriorityValue::Float(1e300).coerce(),
            Err(Coercion::OutOfRange)
        );
    }

    #[test]
    fn test_text_parses_integer_prefix() {
        assert_eq!(PriorityValue::from("10").coerce(), Ok(10));
        assert_eq!(PriorityValue::from("  -3").coerce(), Ok(-3));
        assert_eq!(PriorityValue::from("+8").coerce(), Ok(8));
        assert_eq!(PriorityValue::from("12px").coerce(), Ok(12));
        assert_eq!(PriorityValue::from("1.5").coerce(), Ok(1));
    }

    #[test]
    fn test_text_without_digits_is_rejected() {
        for bad in ["bad", "", "   ", "-", "+x", "x1"] {
            assert_eq!(
                PriorityValue::from(bad).coerce(),
                Err(Coercion::NotNumeric),
                "{bad:?} should not coerce"
            );
        }
    }

    #[test]
    fn test_text_overflow_is_out_of_range() {
        assert_eq!(
            PriorityValue::from("99999999999999999999").coerce(),
            Err(Coercion::OutOfRange)
        );
    }
}
