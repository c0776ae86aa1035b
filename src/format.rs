//! The brace-style formatter: `{}` placeholders with optional explicit
//! indexes, subscripts and a fill/align spec.
//!
//! Unlike the percent engine, this one is loud: a malformed placeholder,
//! an out-of-range index or a bad subscript is a hard error, not a
//! best-effort default.

use crate::args::Arg;

/// Errors from the brace engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A placeholder could not be parsed, or auto and explicit indexes
    /// were mixed in one format string.
    #[error("invalid format placeholder at offset {offset}")]
    InvalidSpec { offset: usize },
    /// An explicit or implicit index had no matching argument.
    #[error("argument index {index} out of range for {count} arguments")]
    IndexOutOfRange { index: usize, count: usize },
    /// A subscript was applied to an argument that is not a string.
    #[error("argument {index} cannot be subscripted")]
    NotSubscriptable { index: usize },
    /// A subscript fell past the end of the string argument.
    #[error("subscript {subscript} out of range for argument {index} of length {len}")]
    SubscriptOutOfRange {
        subscript: usize,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
    /// Fill between the sign and the digits, as the `0` flag does.
    Internal,
}

#[derive(Debug, Clone, Copy)]
struct BraceSpec {
    index: Option<usize>,
    subscript: Option<usize>,
    fill: char,
    align: Option<Align>,
    show_plus: bool,
    space_sign: bool,
    width: usize,
    precision: Option<usize>,
}

impl Default for BraceSpec {
    fn default() -> Self {
        BraceSpec {
            index: None,
            subscript: None,
            fill: ' ',
            align: None,
            show_plus: false,
            space_sign: false,
            width: 0,
            precision: None,
        }
    }
}

fn parse_usize(chars: &[char], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    let mut value = 0usize;
    while let Some(d) = chars.get(*pos).and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(d as usize);
        *pos += 1;
    }
    (*pos > start).then_some(value)
}

/// Parse the inside of one placeholder, `chars[*pos]` sitting just past
/// the opening brace. On success `*pos` is left past the closing brace.
fn parse_brace_spec(chars: &[char], pos: &mut usize) -> Option<BraceSpec> {
    let mut spec = BraceSpec {
        index: parse_usize(chars, pos),
        ..BraceSpec::default()
    };

    if chars.get(*pos) == Some(&'[') {
        *pos += 1;
        spec.subscript = Some(parse_usize(chars, pos)?);
        if chars.get(*pos) != Some(&']') {
            return None;
        }
        *pos += 1;
    }

    if chars.get(*pos) == Some(&':') {
        *pos += 1;
        // A fill char is only a fill when an align char follows it.
        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '^' => Some(Align::Center),
            '>' => Some(Align::Right),
            '=' => Some(Align::Internal),
            _ => None,
        };
        if let (Some(&fill), Some(align)) = (
            chars.get(*pos),
            chars.get(*pos + 1).copied().and_then(align_of),
        ) {
            spec.fill = fill;
            spec.align = Some(align);
            *pos += 2;
        } else if let Some(align) = chars.get(*pos).copied().and_then(align_of) {
            spec.align = Some(align);
            *pos += 1;
        }
        loop {
            match chars.get(*pos) {
                Some('+') => spec.show_plus = true,
                Some(' ') => spec.space_sign = true,
                Some('-') => {
                    spec.align.get_or_insert(Align::Left);
                }
                _ => break,
            }
            *pos += 1;
        }
        if chars.get(*pos) == Some(&'0') {
            spec.fill = '0';
            spec.align.get_or_insert(Align::Internal);
            *pos += 1;
        }
        if let Some(width) = parse_usize(chars, pos) {
            spec.width = width;
        }
        if chars.get(*pos) == Some(&'.') {
            *pos += 1;
            spec.precision = Some(parse_usize(chars, pos)?);
        }
    }

    if chars.get(*pos) != Some(&'}') {
        return None;
    }
    *pos += 1;
    Some(spec)
}

fn is_numeric(arg: &Arg) -> bool {
    matches!(arg, Arg::Int(_) | Arg::Uint(_) | Arg::Float(_))
}

/// Render one argument's body, before padding.
fn brace_body(arg: &Arg, spec: &BraceSpec, index: usize) -> Result<String, FormatError> {
    if let Some(sub) = spec.subscript {
        let Arg::Str(s) = arg else {
            return Err(FormatError::NotSubscriptable { index });
        };
        let Some(c) = s.chars().nth(sub) else {
            return Err(FormatError::SubscriptOutOfRange {
                subscript: sub,
                index,
                len: s.chars().count(),
            });
        };
        return Ok(c.to_string());
    }

    let mut body = match *arg {
        Arg::Float(v) if !v.is_finite() => {
            if v.is_nan() {
                "nan".to_string()
            } else if v.is_sign_negative() {
                "-inf".to_string()
            } else {
                "inf".to_string()
            }
        }
        Arg::Float(v) => match spec.precision {
            Some(p) => format!("{:.*}", p, v),
            None => format!("{}", v),
        },
        ref other => format!("{}", other),
    };
    if is_numeric(arg) && !body.starts_with('-') {
        if spec.show_plus {
            body.insert(0, '+');
        } else if spec.space_sign {
            body.insert(0, ' ');
        }
    }
    Ok(body)
}

fn push_fill(out: &mut String, fill: char, n: usize) {
    for _ in 0..n {
        out.push(fill);
    }
}

fn push_padded(out: &mut String, body: &str, spec: &BraceSpec, arg: &Arg) {
    let len = body.chars().count();
    if len >= spec.width {
        out.push_str(body);
        return;
    }
    let pad = spec.width - len;
    let align = spec.align.unwrap_or(if is_numeric(arg) && spec.subscript.is_none() {
        Align::Right
    } else {
        Align::Left
    });
    match align {
        Align::Left => {
            out.push_str(body);
            push_fill(out, spec.fill, pad);
        }
        Align::Right => {
            push_fill(out, spec.fill, pad);
            out.push_str(body);
        }
        Align::Center => {
            // The odd fill char goes on the right.
            push_fill(out, spec.fill, pad / 2);
            out.push_str(body);
            push_fill(out, spec.fill, pad - pad / 2);
        }
        Align::Internal => {
            let sign_len =
                usize::from(matches!(body.as_bytes().first(), Some(b'-' | b'+' | b' ')));
            let (sign, digits) = body.split_at(sign_len);
            out.push_str(sign);
            push_fill(out, spec.fill, pad);
            out.push_str(digits);
        }
    }
}

/// Expand a brace format string against `args`.
///
/// Placeholders are either all automatic (`{}` in argument order) or all
/// explicit (`{0}`, `{1}`); mixing the two is an error. `{{` and `}}`
/// emit literal braces. The full placeholder shape is
/// `{index[sub]:fill-align flags width .precision}`, every part optional.
pub fn format(fmt: &str, args: &[Arg]) -> Result<String, FormatError> {
    let chars: Vec<char> = fmt.chars().collect();
    let mut out = String::with_capacity(fmt.len());
    let mut pos = 0usize;
    let mut next_auto = 0usize;
    // None until the first placeholder decides the indexing style.
    let mut explicit_style: Option<bool> = None;

    while pos < chars.len() {
        match chars[pos] {
            '{' if chars.get(pos + 1) == Some(&'{') => {
                out.push('{');
                pos += 2;
            }
            '}' if chars.get(pos + 1) == Some(&'}') => {
                out.push('}');
                pos += 2;
            }
            '{' => {
                let offset = pos;
                pos += 1;
                let Some(spec) = parse_brace_spec(&chars, &mut pos) else {
                    return Err(FormatError::InvalidSpec { offset });
                };
                let explicit = spec.index.is_some();
                if *explicit_style.get_or_insert(explicit) != explicit {
                    return Err(FormatError::InvalidSpec { offset });
                }
                let index = match spec.index {
                    Some(i) => i,
                    None => {
                        let i = next_auto;
                        next_auto += 1;
                        i
                    }
                };
                let Some(arg) = args.get(index) else {
                    return Err(FormatError::IndexOutOfRange {
                        index,
                        count: args.len(),
                    });
                };
                let body = brace_body(arg, &spec, index)?;
                push_padded(&mut out, &body, &spec, arg);
            }
            '}' => {
                return Err(FormatError::InvalidSpec { offset: pos });
            }
            c => {
                out.push(c);
                pos += 1;
            }
        }
    }
    Ok(out)
}

/// Brace formatting with automatic argument conversion:
/// `fmt!("{1}, {0}!", "world", "hello")`.
#[macro_export]
macro_rules! fmt {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::args::ToArg;
        $crate::format::format($fmt, &[$($arg.to_arg()),*])
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt;

    #[test]
    fn test_auto_indexing() {
        assert_eq!(fmt!("{} {} {}", 1, "two", 3.0).unwrap(), "1 two 3");
    }

    #[test]
    fn test_explicit_indexing() {
        assert_eq!(fmt!("{1}, {0}!", "world", "Hello").unwrap(), "Hello, world!");
        assert_eq!(fmt!("{0}{0}", "ab").unwrap(), "abab");
    }

    #[test]
    fn test_mixing_styles_is_error() {
        let err = fmt!("{} {1}", 1, 2).unwrap_err();
        assert!(matches!(err, FormatError::InvalidSpec { offset: 3 }));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = fmt!("{2}", 1, 2).unwrap_err();
        assert_eq!(err, FormatError::IndexOutOfRange { index: 2, count: 2 });
        let err = fmt!("{} {}", 1).unwrap_err();
        assert_eq!(err, FormatError::IndexOutOfRange { index: 1, count: 1 });
    }

    #[test]
    fn test_literal_braces() {
        assert_eq!(fmt!("{{{}}}", 5).unwrap(), "{5}");
        assert_eq!(fmt!("{{}}").unwrap(), "{}");
    }

    #[test]
    fn test_stray_brace_is_error() {
        assert!(fmt!("}", 1).is_err());
        assert!(fmt!("{", 1).is_err());
        assert!(fmt!("{:", 1).is_err());
    }

    #[test]
    fn test_default_alignment() {
        assert_eq!(fmt!("{:6}", 42).unwrap(), "    42");
        assert_eq!(fmt!("{:6}", "ab").unwrap(), "ab    ");
    }

    #[test]
    fn test_fill_and_align() {
        assert_eq!(fmt!("{:*<6}", 42).unwrap(), "42****");
        assert_eq!(fmt!("{:*>6}", 42).unwrap(), "****42");
        assert_eq!(fmt!("{:*^7}", "ab").unwrap(), "**ab***");
    }

    #[test]
    fn test_zero_flag_is_internal_fill() {
        assert_eq!(fmt!("{:06}", -42).unwrap(), "-00042");
        assert_eq!(fmt!("{:+06}", 42).unwrap(), "+00042");
    }

    #[test]
    fn test_explicit_internal_align() {
        assert_eq!(fmt!("{:0=6}", -42).unwrap(), "-00042");
        assert_eq!(fmt!("{:=6}", -42).unwrap(), "-   42");
    }

    #[test]
    fn test_minus_flag_left_justifies() {
        assert_eq!(fmt!("{:-6}", 42).unwrap(), "42    ");
    }

    #[test]
    fn test_sign_flags() {
        assert_eq!(fmt!("{:+}", 42).unwrap(), "+42");
        assert_eq!(fmt!("{: }", 42).unwrap(), " 42");
        assert_eq!(fmt!("{:+}", -42).unwrap(), "-42");
        assert_eq!(fmt!("{:+}", "x").unwrap(), "x");
    }

    #[test]
    fn test_precision() {
        assert_eq!(fmt!("{:.2}", 3.14159).unwrap(), "3.14");
        assert_eq!(fmt!("{:8.3}", 2.5).unwrap(), "   2.500");
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(fmt!("{0[0]}{0[4]}", "tower").unwrap(), "tr");
        let err = fmt!("{0[9]}", "ab").unwrap_err();
        assert_eq!(
            err,
            FormatError::SubscriptOutOfRange { subscript: 9, index: 0, len: 2 }
        );
        let err = fmt!("{0[0]}", 12).unwrap_err();
        assert_eq!(err, FormatError::NotSubscriptable { index: 0 });
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(fmt!("{}", f64::INFINITY).unwrap(), "inf");
        assert_eq!(fmt!("{}", f64::NEG_INFINITY).unwrap(), "-inf");
        assert_eq!(fmt!("{}", f64::NAN).unwrap(), "nan");
    }

    #[test]
    fn test_width_never_truncates() {
        assert_eq!(fmt!("{:2}", "abcdef").unwrap(), "abcdef");
    }
}
