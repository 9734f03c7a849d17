//! Export file banner.
//!
//! Every `.reg` export written by regedit 5.0 and later opens with a fixed
//! banner line. Older `REGEDIT4` exports use ANSI strings and are not
//! handled here.

use crate::error::{ErrorKind, ParseResult};

/// Required first non-blank line of an export.
pub const EXPORT_HEADER: &str = "Windows Registry Editor Version 5.00";

/// Checks that a line is exactly the export banner.
///
/// Surrounding whitespace is not allowed.
pub fn check_header(line: &str) -> ParseResult<()> {
    if line == EXPORT_HEADER {
        Ok(())
    } else {
        Err(ErrorKind::Header {
            expected: EXPORT_HEADER,
        })
    }
}
