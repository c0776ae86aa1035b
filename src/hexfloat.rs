//! Parsing of C99 hex floats (`0x1.8p+2`) into `f64`.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum HexFloatError {
    /// Missing `0x` prefix, no digits, or a malformed exponent.
    #[error("invalid hex float")]
    Syntax,
}

/// Parse a hex float from the start of `input`, returning the value and
/// the number of chars consumed. Trailing text is left for the caller.
///
/// Accepted shape: optional sign, `0x` or `0X`, hex digits with an
/// optional point (digits required on at least one side), then an
/// optional `p`/`P` exponent in decimal. Values outside f64's range
/// flush to infinity or zero with the proper sign.
pub(crate) fn parse_hex_float(input: &str) -> Result<(f64, usize), HexFloatError> {
    // Hex floats are pure ASCII, so byte offsets double as char counts.
    let bytes = input.as_bytes();
    let mut i = 0usize;

    let mut negative = false;
    match bytes.first() {
        Some(b'+') => i += 1,
        Some(b'-') => {
            negative = true;
            i += 1;
        }
        _ => {}
    }

    if bytes.get(i) != Some(&b'0') || !matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
        return Err(HexFloatError::Syntax);
    }
    i += 2;

    // Accumulate up to 16 hex digits of mantissa; further digits only
    // shift the point. `dot_exp` is the power of 16 that the accumulated
    // integer must be scaled by to recover the written value.
    let mut mantissa: u64 = 0;
    let mut digits_seen = false;
    let mut stored = 0u32;
    let mut dot_exp: i32 = 0;

    while let Some(d) = bytes.get(i).and_then(|&b| (b as char).to_digit(16)) {
        i += 1;
        digits_seen = true;
        if stored < 16 {
            if mantissa != 0 || d != 0 {
                mantissa = mantissa << 4 | u64::from(d);
                stored += 1;
            }
        } else {
            dot_exp += 1;
        }
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while let Some(d) = bytes.get(i).and_then(|&b| (b as char).to_digit(16)) {
            i += 1;
            digits_seen = true;
            if stored < 16 {
                if mantissa != 0 || d != 0 {
                    mantissa = mantissa << 4 | u64::from(d);
                    stored += 1;
                }
                // Leading zeros before the first set digit still move the
                // point; so does every kept fraction digit.
                dot_exp -= 1;
            }
        }
    }

    if !digits_seen {
        return Err(HexFloatError::Syntax);
    }

    let mut explicit_exp: i64 = 0;
    if matches!(bytes.get(i), Some(b'p' | b'P')) {
        i += 1;
        let mut exp_negative = false;
        match bytes.get(i) {
            Some(b'+') => i += 1,
            Some(b'-') => {
                exp_negative = true;
                i += 1;
            }
            _ => {}
        }
        let mut exp_digits = false;
        while let Some(d) = bytes.get(i).and_then(|&b| (b as char).to_digit(10)) {
            i += 1;
            exp_digits = true;
            explicit_exp = explicit_exp.saturating_mul(10).saturating_add(i64::from(d));
        }
        if !exp_digits {
            return Err(HexFloatError::Syntax);
        }
        if exp_negative {
            explicit_exp = -explicit_exp;
        }
    }
    let consumed = i;

    if mantissa == 0 {
        let zero = if negative { -0.0 } else { 0.0 };
        return Ok((zero, consumed));
    }

    // The value is mantissa * 16^dot_exp * 2^explicit_exp. Normalize so
    // the leading 1 bit sits at bit 63; its position gives the unbiased
    // binary exponent.
    let zeros = i64::from(mantissa.leading_zeros());
    let exp = 63 - zeros + 4 * i64::from(dot_exp) + explicit_exp;
    let mantissa = mantissa << zeros;

    let value = if exp > 1023 {
        f64::INFINITY
    } else if exp < -1022 {
        // Subnormals are flushed to zero.
        0.0
    } else {
        let fraction = (mantissa << 1) >> 12;
        let bits = ((exp + 1023) as u64) << 52 | fraction;
        f64::from_bits(bits)
    };
    Ok((if negative { -value } else { value }, consumed))
}
