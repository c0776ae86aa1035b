//! Parsing of one percent directive into a structured spec.
//!
//! The spec covers the text between `%` and its conversion character:
//! `%[flags][width][.precision]conversion`.

use crate::args::ArgKind;

bitflags::bitflags! {
    /// Directive flags. Any order, each optional, before the width.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Flags: u8 {
        /// `-`: left-justify within the field. (The default is to
        /// right-justify.)
        const LEFT_ALIGN = 0b0001;
        /// `+`: print a plus before non-negative numeric values.
        const SHOW_PLUS = 0b0010;
        /// ` `: print a space before non-negative numeric values.
        /// Ignored when [`SHOW_PLUS`][Flags::SHOW_PLUS] is set.
        const SPACE_SIGN = 0b0100;
        /// `0`: pad numeric fields with zeros between the sign and the
        /// digits. Ignored when [`LEFT_ALIGN`][Flags::LEFT_ALIGN] is set.
        const ZERO_PAD = 0b1000;
    }
}

/// A conversion character, case-folded to lowercase.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Conversion {
    /// `d`
    Int,
    /// `i`
    AutoInt,
    /// `u`
    Uint,
    /// `o`
    Octal,
    /// `x`
    Hex,
    /// `f`
    Fixed,
    /// `e`
    Scientific,
    /// `g`
    Auto,
    /// `a`
    HexFloat,
    /// `c`
    Char,
    /// `s`
    Str,
    /// `n`: the argument passes through unchanged, no conversion applied.
    PassThrough,
    /// Any unrecognized conversion character: also pass-through.
    Other(char),
}

impl Conversion {
    /// The argument kind this conversion requires, or `None` for the
    /// pass-through conversions which accept anything.
    pub fn expected_kind(&self) -> Option<ArgKind> {
        match self {
            Conversion::Int | Conversion::AutoInt => Some(ArgKind::Int),
            Conversion::Uint | Conversion::Octal | Conversion::Hex => Some(ArgKind::Uint),
            Conversion::Fixed | Conversion::Scientific | Conversion::Auto | Conversion::HexFloat => {
                Some(ArgKind::Float)
            }
            Conversion::Char => Some(ArgKind::Char),
            Conversion::Str => Some(ArgKind::Str),
            Conversion::PassThrough | Conversion::Other(_) => None,
        }
    }
}

/// One parsed directive. Created per directive encountered, consumed
/// immediately, never persisted; no formatting state survives it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FormatSpec {
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub conversion: Conversion,
    pub uppercase: bool,
}

fn next_char(sub: &[char]) -> &[char] {
    sub.get(1..).unwrap_or(&[])
}

/// Parse the flags field.
fn parse_flags(mut sub: &[char]) -> (Flags, &[char]) {
    let mut flags = Flags::empty();
    while let Some(&ch) = sub.first() {
        flags.insert(match ch {
            '-' => Flags::LEFT_ALIGN,
            '+' => Flags::SHOW_PLUS,
            ' ' => Flags::SPACE_SIGN,
            '0' => Flags::ZERO_PAD,
            _ => break,
        });
        sub = next_char(sub);
    }
    (flags, sub)
}

/// Parse the width field: a plain decimal digit sequence.
fn parse_width(mut sub: &[char]) -> (Option<usize>, &[char]) {
    let mut width: Option<usize> = None;
    while let Some(&ch) = sub.first() {
        match ch.to_digit(10) {
            Some(d) => {
                let w = width.unwrap_or(0);
                width = Some(w.saturating_mul(10).saturating_add(d as usize));
            }
            None => break,
        }
        sub = next_char(sub);
    }
    (width, sub)
}

/// Parse the precision field: `.` followed by decimal digits.
/// A bare `.` means precision zero.
fn parse_precision(sub: &[char]) -> (Option<usize>, &[char]) {
    match sub.first() {
        Some(&'.') => {
            let (prec, sub) = parse_width(next_char(sub));
            (Some(prec.unwrap_or(0)), sub)
        }
        _ => (None, sub),
    }
}

/// Parse the directive text following a `%`, up to and including the
/// conversion character. Returns the spec and the number of chars consumed,
/// or `None` if the format string ends before a conversion character (the
/// driver copies such an incomplete directive verbatim).
pub(crate) fn parse_spec(sub: &[char]) -> Option<(FormatSpec, usize)> {
    let start_len = sub.len();
    let (mut flags, sub) = parse_flags(sub);
    let (width, sub) = parse_width(sub);
    let (precision, sub) = parse_precision(sub);
    let &ch = sub.first()?;

    let uppercase = ch.is_ascii_uppercase();
    let conversion = match ch.to_ascii_lowercase() {
        'd' => Conversion::Int,
        'i' => Conversion::AutoInt,
        'u' => Conversion::Uint,
        'o' => Conversion::Octal,
        'x' => Conversion::Hex,
        'f' => Conversion::Fixed,
        'e' => Conversion::Scientific,
        'g' => Conversion::Auto,
        'a' => Conversion::HexFloat,
        'c' => Conversion::Char,
        's' => Conversion::Str,
        'n' => Conversion::PassThrough,
        _ => Conversion::Other(ch),
    };

    // Left-justified fields are space-filled on the right; zero fill makes
    // no sense there.
    if flags.contains(Flags::LEFT_ALIGN) {
        flags.remove(Flags::ZERO_PAD);
    }

    let consumed = start_len - sub.len() + 1;
    Some((
        FormatSpec {
            flags,
            width,
            precision,
            conversion,
            uppercase,
        },
        consumed,
    ))
}
