//! Rendering of one argument under one directive.
//!
//! All formatting state here is local to a single call: the spec is built,
//! applied and dropped, so no width/precision/fill/case ever leaks from one
//! directive into the next.

use std::fmt::{self, Write};

use crate::args::{Arg, ArgKind};
use crate::spec::{Conversion, Flags, FormatSpec};

/// Write the default value of the expected kind, plainly rendered.
///
/// This is the fail-soft path for type mismatches: `%f` handed an integer
/// writes `0` (a bare default, not `0.000000`), `%s` handed a number writes
/// nothing, and so on. Width and precision do not apply.
fn write_default<W: Write>(w: &mut W, kind: ArgKind) -> fmt::Result {
    match kind {
        ArgKind::Int | ArgKind::Uint | ArgKind::Float => w.write_str("0"),
        ArgKind::Char => w.write_char('\0'),
        ArgKind::Str => Ok(()),
    }
}

fn write_fill<W: Write>(w: &mut W, fill: char, n: usize) -> fmt::Result {
    for _ in 0..n {
        w.write_char(fill)?;
    }
    Ok(())
}

/// Pad `body` out to the field width and write it. Width only ever pads;
/// a body longer than the field is written untouched. Under zero fill the
/// leading sign (`-`, `+` or the space flag's blank) stays at the left
/// margin and the zeros go between it and the digits.
fn write_padded<W: Write>(
    w: &mut W,
    flags: Flags,
    width: Option<usize>,
    body: &str,
) -> fmt::Result {
    let width = width.unwrap_or(0);
    let len = body.chars().count();
    if len >= width {
        return w.write_str(body);
    }
    let pad = width - len;
    if flags.contains(Flags::LEFT_ALIGN) {
        w.write_str(body)?;
        write_fill(w, ' ', pad)
    } else if flags.contains(Flags::ZERO_PAD) {
        let sign_len = usize::from(matches!(body.as_bytes().first(), Some(b'-' | b'+' | b' ')));
        let (sign, digits) = body.split_at(sign_len);
        w.write_str(sign)?;
        write_fill(w, '0', pad)?;
        w.write_str(digits)
    } else {
        write_fill(w, ' ', pad)?;
        w.write_str(body)
    }
}

/// Maybe prepend a sign to the given string.
/// This respects SHOW_PLUS and SPACE_SIGN; negative values keep only their
/// natural `-`.
pub(crate) fn maybe_prepend_sign(mut s: String, flags: Flags) -> String {
    if !s.starts_with('-') {
        if flags.contains(Flags::SHOW_PLUS) {
            s.insert(0, '+');
        } else if flags.contains(Flags::SPACE_SIGN) {
            s.insert(0, ' ');
        }
    }
    s
}

/// Split a finite float into a mantissa and a base-10 exponent.
fn split_float(value: f64, precision: usize) -> (String, i32) {
    debug_assert!(value.is_finite());
    let formatted = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = formatted.split_once('e').expect("e-notation has an exponent");
    (
        mantissa.to_string(),
        exponent.parse().expect("exponent is an integer"),
    )
}

/// Body for the `e` conversion: C-style scientific notation, exponent
/// always signed and at least two digits.
fn scientific_body(value: f64, precision: usize, flags: Flags) -> String {
    let (mantissa, exponent) = split_float(value, precision);
    let mut s = maybe_prepend_sign(mantissa, flags);
    let _ = write!(s, "e{:+03}", exponent);
    s
}

/// Body for the `g` conversion. Precision changes meaning here from
/// "digits after the decimal point" to "significant digits", at least 1;
/// style e is used when the exponent falls below -4 or reaches the
/// significant-digit count, and trailing zeros after the point are trimmed.
fn auto_body(value: f64, precision: usize, flags: Flags) -> String {
    let sigfigs = precision.max(1).min(i64::MAX as usize) as i64;

    fn exponent_of(v: f64) -> i64 {
        if v == 0.0 {
            0
        } else {
            v.log10().floor() as i64
        }
    }

    let vabs = value.abs();
    let rounder = if vabs == 0.0 {
        1.0
    } else {
        10.0_f64.powf((sigfigs - 1 - exponent_of(vabs)) as f64)
    };
    // Round first: rounding can carry into the next decade (9.99 -> 10).
    let rounded_exponent = exponent_of((vabs * rounder).round() / rounder);

    let (use_style_e, digits_after_decimal) =
        if rounded_exponent < -4 || rounded_exponent >= sigfigs {
            (true, (sigfigs - 1) as usize)
        } else {
            (false, (sigfigs - rounded_exponent - 1) as usize)
        };

    let mut mantissa;
    let mut exponent = String::new();
    if use_style_e {
        let (m, exp) = split_float(value, digits_after_decimal);
        mantissa = m;
        let _ = write!(exponent, "e{:+03}", exp);
    } else {
        mantissa = format!("{:.*}", digits_after_decimal, value);
    }

    // Trim trailing zeros after the decimal point, and a bare trailing point.
    if mantissa.contains('.') {
        let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
        mantissa.truncate(trimmed.len());
    }

    maybe_prepend_sign(mantissa, flags) + &exponent
}

/// Build the body for any float conversion, together with the effective
/// flags (non-finite values drop zero fill, and NaN drops the sign flags:
/// `+nan` and `00inf` make no sense).
fn float_body(value: f64, spec: &FormatSpec) -> (String, Flags) {
    let mut flags = spec.flags;
    let precision = spec.precision.unwrap_or(6);
    let body = if !value.is_finite() {
        flags.remove(Flags::ZERO_PAD);
        if value.is_nan() {
            flags.remove(Flags::SHOW_PLUS);
            flags.remove(Flags::SPACE_SIGN);
        }
        let base = if value.is_nan() {
            "nan"
        } else if value.is_sign_negative() {
            "-inf"
        } else {
            "inf"
        };
        maybe_prepend_sign(base.to_string(), flags)
    } else {
        match spec.conversion {
            Conversion::Scientific => scientific_body(value, precision, flags),
            Conversion::Auto => auto_body(value, precision, flags),
            // `a` renders like `f`; true hex-float output is not produced
            // (the scan side does parse hex floats).
            _ => maybe_prepend_sign(format!("{:.*}", precision, value), flags),
        }
    };
    let body = if spec.uppercase {
        body.to_ascii_uppercase()
    } else {
        body
    };
    (body, flags)
}

/// Render one argument under one directive.
///
/// The conversion's expected kind is checked against the argument's kind;
/// on mismatch the expected kind's default value is written instead (the
/// fail-soft policy). The pass-through conversions skip the check entirely.
pub fn render<W: Write>(w: &mut W, spec: &FormatSpec, arg: Arg) -> fmt::Result {
    match spec.conversion {
        Conversion::PassThrough | Conversion::Other(_) => write!(w, "{}", arg),
        Conversion::Int | Conversion::AutoInt => {
            let Arg::Int(v) = arg else {
                return write_default(w, ArgKind::Int);
            };
            let body = maybe_prepend_sign(v.to_string(), spec.flags);
            write_padded(w, spec.flags, spec.width, &body)
        }
        Conversion::Uint => {
            let Arg::Uint(v) = arg else {
                return write_default(w, ArgKind::Uint);
            };
            let body = maybe_prepend_sign(v.to_string(), spec.flags);
            write_padded(w, spec.flags, spec.width, &body)
        }
        Conversion::Octal => {
            let Arg::Uint(v) = arg else {
                return write_default(w, ArgKind::Uint);
            };
            write_padded(w, spec.flags, spec.width, &format!("{:o}", v))
        }
        Conversion::Hex => {
            let Arg::Uint(v) = arg else {
                return write_default(w, ArgKind::Uint);
            };
            let body = if spec.uppercase {
                format!("{:X}", v)
            } else {
                format!("{:x}", v)
            };
            write_padded(w, spec.flags, spec.width, &body)
        }
        Conversion::Fixed | Conversion::Scientific | Conversion::Auto | Conversion::HexFloat => {
            let Arg::Float(v) = arg else {
                return write_default(w, ArgKind::Float);
            };
            let (body, flags) = float_body(v, spec);
            write_padded(w, flags, spec.width, &body)
        }
        Conversion::Char => {
            let Arg::Char(c) = arg else {
                return write_default(w, ArgKind::Char);
            };
            let mut flags = spec.flags;
            flags.remove(Flags::ZERO_PAD);
            write_padded(w, flags, spec.width, &c.to_string())
        }
        Conversion::Str => {
            let Arg::Str(s) = arg else {
                return write_default(w, ArgKind::Str);
            };
            // Precision is accepted on strings but has no effect: it maps
            // to a float-only setting, so it neither truncates nor pads.
            let mut flags = spec.flags;
            flags.remove(Flags::ZERO_PAD);
            write_padded(w, flags, spec.width, s)
        }
    }
}
