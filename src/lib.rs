//! `printf`/`scanf`-style formatting and scanning for plain Rust strings,
//! plus a Python-style brace formatter.
//!
//! Two engines with deliberately different error policies:
//!
//! - The percent-style engine ([`sprint`], [`print`], [`sscan`], [`scan`])
//!   is fail-soft: a type mismatch between a conversion and its argument
//!   degrades to the expected type's default value, and malformed trailing
//!   text is copied through. The one hard error is a directive left without
//!   an argument.
//! - The brace-style engine ([`format`]) is fail-loud: malformed specifiers,
//!   out-of-range argument indices and bad subscripts all raise a
//!   [`FormatError`].

pub mod args;
pub mod format;
mod hexfloat;
pub mod output;
pub mod printf;
pub mod scan;
pub mod spec;

pub use args::{Arg, ArgKind, ArgList, ToArg};
pub use format::{format, FormatError};
pub use printf::{cprint, print, sprint, PrintfError};
pub use scan::{cscan, scan, sscan, ScanTarget, ScanValue};
pub use spec::{Conversion, Flags, FormatSpec};
