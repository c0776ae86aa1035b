//! The percent-directive scanners: `sscan`, `scan` and `cscan`.
//!
//! Scanning mirrors the printf driver in reverse: the format string is
//! walked once, each directive extracts a token from the input and parses
//! it into the caller's binding. The engine is fail-soft throughout; the
//! return value is the count of bindings actually assigned.

use std::io::{self, BufRead};

use crate::args::ArgKind;
use crate::hexfloat::parse_hex_float;
use crate::spec::{parse_spec, Conversion};

/// A parsed value handed to a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
}

/// A mutable scan binding.
///
/// `kind` declares what the binding can absorb; a directive whose
/// conversion expects a different kind resets the binding to its default
/// instead of assigning. `assign` receives a value of the matching kind.
pub trait ScanTarget {
    fn kind(&self) -> ArgKind;
    fn assign(&mut self, value: ScanValue);
    fn reset_default(&mut self);
}

macro_rules! impl_scan_int {
    ($($t:ty),*) => {$(
        impl ScanTarget for $t {
            fn kind(&self) -> ArgKind {
                ArgKind::Int
            }
            fn assign(&mut self, value: ScanValue) {
                if let ScanValue::Int(v) = value {
                    *self = v as $t;
                }
            }
            fn reset_default(&mut self) {
                *self = 0;
            }
        }
    )*};
}

macro_rules! impl_scan_uint {
    ($($t:ty),*) => {$(
        impl ScanTarget for $t {
            fn kind(&self) -> ArgKind {
                ArgKind::Uint
            }
            fn assign(&mut self, value: ScanValue) {
                if let ScanValue::Uint(v) = value {
                    *self = v as $t;
                }
            }
            fn reset_default(&mut self) {
                *self = 0;
            }
        }
    )*};
}

macro_rules! impl_scan_float {
    ($($t:ty),*) => {$(
        impl ScanTarget for $t {
            fn kind(&self) -> ArgKind {
                ArgKind::Float
            }
            fn assign(&mut self, value: ScanValue) {
                if let ScanValue::Float(v) = value {
                    *self = v as $t;
                }
            }
            fn reset_default(&mut self) {
                *self = 0.0;
            }
        }
    )*};
}

impl_scan_int!(i8, i16, i32, i64, isize);
impl_scan_uint!(u8, u16, u32, u64, usize);
impl_scan_float!(f32, f64);

impl ScanTarget for char {
    fn kind(&self) -> ArgKind {
        ArgKind::Char
    }
    fn assign(&mut self, value: ScanValue) {
        if let ScanValue::Char(c) = value {
            *self = c;
        }
    }
    fn reset_default(&mut self) {
        *self = '\0';
    }
}

impl ScanTarget for String {
    fn kind(&self) -> ArgKind {
        ArgKind::Str
    }
    fn assign(&mut self, value: ScanValue) {
        if let ScanValue::Str(s) = value {
            *self = s;
        }
    }
    fn reset_default(&mut self) {
        self.clear();
    }
}

/// Parse an integer with C's auto-base rules: `0x`/`0X` prefix means hex,
/// a leading `0` means octal, anything else decimal.
fn parse_auto_int(token: &str) -> Option<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

struct Cursor<'a> {
    rest: &'a str,
    consumed: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { rest: input, consumed: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        self.consumed += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    /// Take chars until a delimiter or the width cap.
    fn take_token(&mut self, delims: &[char], width: Option<usize>) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || delims.contains(&c) {
                break;
            }
            if width.is_some_and(|w| token.chars().count() >= w) {
                break;
            }
            token.push(c);
            self.bump();
        }
        token
    }
}

/// The literal chars that terminate a directive's token: whatever follows
/// the directive in the format string, up to the next `%` or whitespace.
fn trailing_delims(fmt: &[char]) -> Vec<char> {
    fmt.iter()
        .take_while(|&&c| c != '%' && !c.is_ascii_whitespace())
        .copied()
        .collect()
}

/// Scan `input` against `fmt`, filling `targets` in order. Returns how
/// many bindings were assigned.
///
/// Literal format chars must match the input one-for-one and whitespace
/// in the format skips any run of input whitespace; the first mismatch
/// stops the scan silently. A directive whose conversion disagrees with
/// its binding's kind resets the binding to its default and does not
/// count as assigned. A token that fails to parse leaves its binding
/// untouched.
///
/// Panics if the format string has more directives than bindings,
/// matching the printf driver's hard error for the same shape.
pub fn sscan(input: &str, fmt: &str, targets: &mut [&mut dyn ScanTarget]) -> usize {
    let fmt_chars: Vec<char> = fmt.chars().collect();
    let mut fmt_rest = &fmt_chars[..];
    let mut cursor = Cursor::new(input);
    let mut assigned = 0usize;
    let mut next_target = 0usize;

    while let Some(&fc) = fmt_rest.first() {
        if fc != '%' {
            fmt_rest = &fmt_rest[1..];
            if fc.is_ascii_whitespace() {
                cursor.skip_whitespace();
            } else {
                match cursor.peek() {
                    Some(c) if c == fc => {
                        cursor.bump();
                    }
                    _ => break,
                }
            }
            continue;
        }
        fmt_rest = &fmt_rest[1..];
        if fmt_rest.first() == Some(&'%') {
            fmt_rest = &fmt_rest[1..];
            match cursor.peek() {
                Some('%') => {
                    cursor.bump();
                }
                _ => break,
            }
            continue;
        }
        let Some((spec, len)) = parse_spec(fmt_rest) else {
            break;
        };
        fmt_rest = &fmt_rest[len..];

        if next_target >= targets.len() {
            panic!(
                "sscan: format has more directives than bindings (got {})",
                targets.len()
            );
        }
        let target = &mut targets[next_target];
        next_target += 1;

        if spec.conversion == Conversion::PassThrough {
            // %n: store the count of input chars consumed so far.
            if target.kind() == ArgKind::Int {
                target.assign(ScanValue::Int(cursor.consumed as i64));
            } else {
                target.reset_default();
            }
            continue;
        }

        let matches_kind = spec.conversion.expected_kind() == Some(target.kind());

        if spec.conversion == Conversion::Char {
            // %c takes the very next char, whitespace included.
            match cursor.bump() {
                Some(c) if matches_kind => {
                    target.assign(ScanValue::Char(c));
                    assigned += 1;
                }
                Some(_) => target.reset_default(),
                None => break,
            }
            continue;
        }

        cursor.skip_whitespace();
        let delims = trailing_delims(fmt_rest);
        let token = cursor.take_token(&delims, spec.width);
        if token.is_empty() {
            if cursor.peek().is_none() {
                break;
            }
            continue;
        }
        if !matches_kind {
            // The directive still consumes its field; the binding just
            // falls back to its default.
            target.reset_default();
            continue;
        }

        let value = match spec.conversion {
            Conversion::Int => token.parse::<i64>().ok().map(ScanValue::Int),
            Conversion::AutoInt => parse_auto_int(&token).map(ScanValue::Int),
            Conversion::Uint => token.parse::<u64>().ok().map(ScanValue::Uint),
            Conversion::Octal => u64::from_str_radix(&token, 8).ok().map(ScanValue::Uint),
            Conversion::Hex => {
                let digits = token
                    .strip_prefix("0x")
                    .or_else(|| token.strip_prefix("0X"))
                    .unwrap_or(&token);
                u64::from_str_radix(digits, 16).ok().map(ScanValue::Uint)
            }
            Conversion::HexFloat => parse_hex_float(&token)
                .ok()
                .filter(|&(_, n)| n == token.chars().count())
                .map(|(v, _)| ScanValue::Float(v)),
            Conversion::Fixed | Conversion::Scientific | Conversion::Auto => {
                token.parse::<f64>().ok().map(ScanValue::Float)
            }
            Conversion::Str => Some(ScanValue::Str(token)),
            Conversion::Char | Conversion::PassThrough | Conversion::Other(_) => None,
        };
        if let Some(value) = value {
            target.assign(value);
            assigned += 1;
        }
    }
    assigned
}

/// Scan the whole of a `BufRead` stream.
pub fn scan<R: BufRead>(
    reader: &mut R,
    fmt: &str,
    targets: &mut [&mut dyn ScanTarget],
) -> io::Result<usize> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(sscan(&input, fmt, targets))
}

/// Scan one line of standard input.
pub fn cscan(fmt: &str, targets: &mut [&mut dyn ScanTarget]) -> io::Result<usize> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(sscan(line.trim_end_matches(['\r', '\n']), fmt, targets))
}

/// Scan with the bindings listed inline:
/// `sscan!("12 34", "%i %i", a, b)`.
#[macro_export]
macro_rules! sscan {
    ($input:expr, $fmt:expr $(, $target:expr)* $(,)?) => {
        $crate::scan::sscan($input, $fmt, &mut [$(&mut $target),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sscan;

    #[test]
    fn test_basic_ints() {
        let (mut a, mut b) = (0i32, 0i32);
        assert_eq!(sscan!("12 -34", "%i %i", a, b), 2);
        assert_eq!((a, b), (12, -34));
    }

    #[test]
    fn test_auto_base() {
        let (mut a, mut b, mut c) = (0i64, 0i64, 0i64);
        assert_eq!(sscan!("0x1f 017 42", "%i %i %i", a, b, c), 3);
        assert_eq!((a, b, c), (31, 15, 42));
    }

    #[test]
    fn test_explicit_bases() {
        let (mut o, mut h) = (0u32, 0u32);
        assert_eq!(sscan!("777 ff", "%o %x", o, h), 2);
        assert_eq!((o, h), (0o777, 0xff));
    }

    #[test]
    fn test_floats_and_hex_floats() {
        let (mut f, mut a) = (0.0f64, 0.0f64);
        assert_eq!(sscan!("1.5e3 0x1.8p1", "%f %a", f, a), 2);
        assert_eq!((f, a), (1500.0, 3.0));
    }

    #[test]
    fn test_strings_and_literal_delims() {
        let (mut k, mut v) = (String::new(), String::new());
        assert_eq!(sscan!("name=value", "%s=%s", k, v), 2);
        assert_eq!((k.as_str(), v.as_str()), ("name", "value"));
    }

    #[test]
    fn test_width_caps_token() {
        let mut s = String::new();
        let mut n = 0i32;
        assert_eq!(sscan!("abcdef", "%3s%i", s, n), 1);
        assert_eq!(s, "abc");
        assert_eq!(n, 0);
    }

    #[test]
    fn test_char_takes_next_raw() {
        let (mut a, mut b) = ('\0', '\0');
        assert_eq!(sscan!("x y", "%c%c", a, b), 2);
        assert_eq!((a, b), ('x', ' '));
    }

    #[test]
    fn test_kind_mismatch_resets_default() {
        let mut s = String::from("stale");
        let mut n = 0i32;
        assert_eq!(sscan!("hello 5", "%i %i", s, n), 1);
        assert_eq!(s, "");
        assert_eq!(n, 5);
    }

    #[test]
    fn test_parse_failure_leaves_binding() {
        let mut n = 7i32;
        assert_eq!(sscan!("abc", "%d", n), 0);
        assert_eq!(n, 7);
    }

    #[test]
    fn test_literal_mismatch_stops() {
        let mut n = 0i32;
        assert_eq!(sscan!("a=1", "b=%i", n), 0);
        assert_eq!(n, 0);

        let (mut a, mut b) = (0i32, 0i32);
        assert_eq!(sscan!("1; 2", "%i;%i", a, b), 2);
        assert_eq!((a, b), (1, 2));
    }

    #[test]
    fn test_position_directive() {
        let mut s = String::new();
        let mut pos = -1i64;
        sscan!("hello rest", "%s %n", s, pos);
        assert_eq!(s, "hello");
        assert_eq!(pos, 6);
    }

    #[test]
    fn test_eof_stops() {
        let (mut a, mut b) = (0i32, 0i32);
        assert_eq!(sscan!("5", "%i %i", a, b), 1);
        assert_eq!(a, 5);
    }

    #[test]
    #[should_panic(expected = "more directives than bindings")]
    fn test_insufficient_bindings_panic() {
        let mut a = 0i32;
        sscan!("1 2", "%i %i", a);
    }

    #[test]
    fn test_scan_from_reader() {
        let mut input = io::Cursor::new("12 word");
        let mut n = 0i32;
        let mut s = String::new();
        let count = scan(&mut input, "%i %s", &mut [&mut n, &mut s]).unwrap();
        assert_eq!(count, 2);
        assert_eq!((n, s.as_str()), (12, "word"));
    }

    #[test]
    fn test_round_trip_with_sprint() {
        let text = crate::sprint!("%i %u %g", -42, 42u32, 2.5);
        let (mut i, mut u, mut g) = (0i64, 0u64, 0.0f64);
        assert_eq!(sscan!(&text, "%i %u %g", i, u, g), 3);
        assert_eq!((i, u, g), (-42, 42, 2.5));
    }
}
