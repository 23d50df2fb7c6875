//! Include directive recognition.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A directive occupies a whole line:
//!
//! ```text
//!     //@include[header.js]
//! ```
//!
//! Leading and trailing spaces or tabs are allowed. The bracketed name must
//! be one or more of `A-Z a-z 0-9 . _ -`; anything else (an empty name, a
//! slash, a space inside the brackets, trailing text) makes the line
//! ordinary text that is copied through unchanged.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Matches a full line including its terminator.
///
/// The terminator may be `\n`, `\r\n`, or absent on the last line of a file.
/// Captures the include name in group 1.
static INCLUDE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*//@include\[([A-Za-z0-9._-]+)\][ \t]*(?:\r?\n)?$").unwrap()
});

/// Return the included name if `line` is an include directive.
pub fn parse_include(line: &[u8]) -> Option<&str> {
    let captures = INCLUDE_DIRECTIVE.captures(line)?;
    let name = captures.get(1)?;
    // The character class is ASCII-only, so this cannot fail
    std::str::from_utf8(name.as_bytes()).ok()
}
