//! # Windows Registry Export Parser
//!
//! A decoder for the text files written by regedit's *Export* command
//! (`.reg`, format version 5.00). It turns an export into an ordered list of
//! typed value records without touching a live registry.
//!
//! ## Features
//!
//! - **Typed data**: REG_SZ, REG_EXPAND_SZ, REG_MULTI_SZ, REG_DWORD, REG_QWORD,
//!   REG_BINARY and REG_NONE are decoded to native Rust values
//! - **Multi-line values**: open string literals and `\`-continued hex lists
//! - **Encodings**: UTF-16LE (as regedit writes it) and UTF-8 input
//! - **Fail-fast errors**: one error per failed parse, carrying the file
//!   name, line number and offending line
//!
//! ## File Layout
//!
//! ```text
//! Windows Registry Editor Version 5.00
//!
//! [HKEY_CURRENT_USER\Software\Vendor]
//! "Name"="Value"
//! "Count"=dword:0000002a
//! "Blob"=hex:01,02,03,\
//!   04,05
//! @="default value"
//! ```
//!
//! ## Parsing Stages
//!
//! 1. **Scanner**: counts unescaped quotes to find literal boundaries
//! 2. **Key headers**: `[HIVE\path]` lines set the current key
//! 3. **Value lines**: split into name, type prefix and first-line data
//! 4. **Continuations**: further lines are accumulated per value type
//! 5. **Finalizer**: decodes the raw payload and binds it to its key
//!
//! ## Examples
//!
//! ```rust
//! use reg_export::{Hive, RegFile, ValueData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = "Windows Registry Editor Version 5.00\r\n\
//!             \r\n\
//!             [HKEY_CURRENT_USER\\Software\\Test]\r\n\
//!             \"Name\"=\"Value\"\r\n\
//!             \"Num\"=dword:0000002a\r\n";
//!
//! let file = RegFile::parse_str("test.reg", text)?;
//! assert_eq!(file.len(), 2);
//!
//! let num = file.value(Hive::CurrentUser, r"Software\Test", "Num").unwrap();
//! assert_eq!(num.data(), &ValueData::Dword(42));
//! # Ok(())
//! # }
//! ```
//!
//! Files on disk are opened with [`RegFile::open`], which also detects the
//! encoding.
//!
//! ## Not Supported
//!
//! - Writing exports or modifying a live registry
//! - Deletion entries (`[-HKEY_...]`, `"name"=-`)
//! - `REGEDIT4` exports

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod header;
pub mod hive;
pub mod key;
pub mod parser;
pub mod regfile;
pub mod scanner;
pub mod utils;
pub mod value;

// Re-export main types for convenience
pub use error::{ErrorKind, RegistryError, Result};
pub use header::EXPORT_HEADER;
pub use hive::Hive;
pub use parser::{parse_lines, ParseState, Parser};
pub use regfile::RegFile;
pub use value::{RegistryValue, ValueData, ValueType, LINE_TERMINATOR};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
