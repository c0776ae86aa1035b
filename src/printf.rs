//! The percent-directive driver: `sprint`, `print` and `cprint`.

use std::fmt::{self, Write};
use std::io;

use crate::args::{Arg, ArgList};
use crate::output::render;
use crate::spec::parse_spec;

/// Errors from the percent engine. Most malformed input is absorbed
/// (incomplete directives are copied verbatim, mismatched kinds render a
/// default) so the only user-facing failure is a format string that
/// demands more arguments than were supplied.
#[derive(Debug, thiserror::Error)]
pub enum PrintfError {
    /// A conversion directive had no argument left to consume.
    #[error("format directive %{directive} has no argument (got {provided})")]
    MissingArguments { directive: char, provided: usize },
    /// The underlying writer failed.
    #[error(transparent)]
    Write(#[from] fmt::Error),
}

/// Format `fmt` with `args` into the given writer.
///
/// Directives are consumed left to right, each pairing with the next
/// argument. `%%` emits a literal percent and consumes nothing. An
/// incomplete directive at the end of the string (including a lone `%`)
/// is copied through verbatim. Arguments beyond the last directive are
/// ignored.
pub fn format_into<W: Write>(
    w: &mut W,
    fmt: &str,
    args: &mut ArgList,
) -> Result<(), PrintfError> {
    let chars: Vec<char> = fmt.chars().collect();
    let mut rest = &chars[..];
    while let Some(pos) = rest.iter().position(|&c| c == '%') {
        for &c in &rest[..pos] {
            w.write_char(c)?;
        }
        rest = &rest[pos + 1..];
        match rest.first() {
            None => {
                // Trailing lone percent, copied through.
                w.write_char('%')?;
            }
            Some('%') => {
                w.write_char('%')?;
                rest = &rest[1..];
            }
            Some(_) => match parse_spec(rest) {
                Some((spec, consumed)) => {
                    let directive = rest[consumed - 1];
                    rest = &rest[consumed..];
                    match args.next() {
                        Some(arg) => render(w, &spec, arg)?,
                        None => {
                            return Err(PrintfError::MissingArguments {
                                directive,
                                provided: args.len(),
                            })
                        }
                    }
                }
                None => {
                    // No conversion character before the end of the string;
                    // the fragment is not a directive, copy it through.
                    w.write_char('%')?;
                    for &c in rest {
                        w.write_char(c)?;
                    }
                    rest = &[];
                }
            },
        }
    }
    for &c in rest {
        w.write_char(c)?;
    }
    Ok(())
}

/// Format into a new `String`.
///
/// Panics if the format string has more directives than arguments; every
/// other malformed input is handled softly.
pub fn sprint(fmt: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(fmt.len());
    let mut args = ArgList::new(args);
    match format_into(&mut out, fmt, &mut args) {
        Ok(()) => out,
        Err(err) => panic!("sprint: {err}"),
    }
}

/// Format into any `fmt::Write` sink.
pub fn print<W: Write>(w: &mut W, fmt: &str, args: &[Arg]) -> Result<(), PrintfError> {
    let mut args = ArgList::new(args);
    format_into(w, fmt, &mut args)
}

/// Format to standard output.
pub fn cprint(fmt: &str, args: &[Arg]) -> io::Result<()> {
    use io::Write as _;
    let mut out = String::with_capacity(fmt.len());
    let mut args = ArgList::new(args);
    format_into(&mut out, fmt, &mut args)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    io::stdout().write_all(out.as_bytes())
}

/// Format with automatic argument conversion:
/// `sprint!("%i and %s", 42, "text")`.
#[macro_export]
macro_rules! sprint {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::args::ToArg;
        $crate::printf::sprint($fmt, &[$($arg.to_arg()),*])
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprint;

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(sprint("hello", &[]), "hello");
        assert_eq!(sprint!("100%% done"), "100% done");
        assert_eq!(sprint!("%"), "%");
        assert_eq!(sprint!("tail %-0"), "tail %-0");
    }

    #[test]
    fn test_args_in_order() {
        assert_eq!(sprint!("%s=%i", "x", 3), "x=3");
        assert_eq!(sprint!("%i then %i", 1, 2), "1 then 2");
    }

    #[test]
    fn test_extra_args_ignored() {
        assert_eq!(sprint!("%i", 1, 2, 3), "1");
        assert_eq!(sprint!("no directives", 9), "no directives");
    }

    #[test]
    #[should_panic(expected = "has no argument")]
    fn test_missing_args_panic() {
        sprint!("%i %i", 1);
    }

    #[test]
    fn test_percent_adjacent_directive() {
        assert_eq!(sprint!("Hello Year %%%i!!", 2017), "Hello Year %2017!!");
    }

    #[test]
    fn test_print_writes_through() {
        let mut out = String::new();
        print(&mut out, "%s-%u", &[crate::Arg::Str("v"), crate::Arg::Uint(7)])
            .unwrap();
        assert_eq!(out, "v-7");
    }
}
