//! Tagged argument values consumed by the formatting drivers.

use std::fmt;

/// The kind of a formatting argument, checked against each conversion.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArgKind {
    Int,
    Uint,
    Float,
    Char,
    Str,
}

/// One argument as passed to the drivers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl Arg<'_> {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Int(_) => ArgKind::Int,
            Arg::Uint(_) => ArgKind::Uint,
            Arg::Float(_) => ArgKind::Float,
            Arg::Char(_) => ArgKind::Char,
            Arg::Str(_) => ArgKind::Str,
        }
    }
}

/// The natural, unformatted rendering of an argument. This is what the
/// pass-through conversions (`%n` and unrecognized characters) emit.
impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => fmt::Display::fmt(v, f),
            Arg::Uint(v) => fmt::Display::fmt(v, f),
            Arg::Float(v) => fmt::Display::fmt(v, f),
            Arg::Char(v) => fmt::Display::fmt(v, f),
            Arg::Str(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// Conversion from a raw value to a formatting argument.
pub trait ToArg<'a>: Copy {
    fn to_arg(self) -> Arg<'a>;
}

impl<'a> ToArg<'a> for &'a str {
    fn to_arg(self) -> Arg<'a> {
        Arg::Str(self)
    }
}

impl<'a> ToArg<'a> for &'a String {
    fn to_arg(self) -> Arg<'a> {
        Arg::Str(self.as_str())
    }
}

impl ToArg<'static> for f32 {
    fn to_arg(self) -> Arg<'static> {
        Arg::Float(self as f64)
    }
}

impl ToArg<'static> for f64 {
    fn to_arg(self) -> Arg<'static> {
        Arg::Float(self)
    }
}

impl ToArg<'static> for char {
    fn to_arg(self) -> Arg<'static> {
        Arg::Char(self)
    }
}

/// All signed types.
macro_rules! impl_to_arg {
    ($($t:ty),*) => {
        $(
            impl ToArg<'static> for $t {
                fn to_arg(self) -> Arg<'static> {
                    Arg::Int(self as i64)
                }
            }
        )*
    };
}
impl_to_arg!(i8, i16, i32, i64, isize);

/// All unsigned types.
macro_rules! impl_to_arg_u {
    ($($t:ty),*) => {
        $(
            impl ToArg<'static> for $t {
                fn to_arg(self) -> Arg<'static> {
                    Arg::Uint(self as u64)
                }
            }
        )*
    };
}
impl_to_arg_u!(u8, u16, u32, u64, usize);

/// List of arguments with a consumption cursor.
#[derive(Debug, Clone)]
pub struct ArgList<'a> {
    args: &'a [Arg<'a>],
    index: usize,
}

impl<'a> ArgList<'a> {
    pub fn new(args: &'a [Arg<'a>]) -> Self {
        Self { args, index: 0 }
    }

    /// Total number of arguments supplied.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Return how many args are remaining.
    pub fn remaining(&self) -> usize {
        self.args.len() - self.index
    }

    /// Take the next unconsumed argument, if any.
    pub fn next(&mut self) -> Option<Arg<'a>> {
        let arg = self.args.get(self.index).copied()?;
        self.index += 1;
        Some(arg)
    }
}
