//! Line-driven parse state machine.
//!
//! A [`Parser`] is fed one physical line at a time and keeps all of its
//! context (current key, value under construction, line number) to itself,
//! so separate parses never share state.
//!
//! ```text
//! Start --banner--> FirstKey --[key]--> NextItem <--+
//!                                        |  |       |
//!                        open "literal   |  | hex:..\ (trailing backslash)
//!                                        v  v       |
//!                           ReadingString  ReadingBytes
//! ```

use crate::error::{ErrorKind, ParseResult, RegistryError, Result};
use crate::header::check_header;
use crate::hive::Hive;
use crate::key::parse_key_header;
use crate::regfile::RegFile;
use crate::scanner::has_odd_quotes;
use crate::utils::decode_hex_list;
use crate::value::{parse_value_line, RawValue, RegistryValue, ValueType, LINE_TERMINATOR};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for the export banner.
    Start,
    /// Waiting for the first key header.
    FirstKey,
    /// Between items: a key header or a value line may follow.
    NextItem,
    /// Inside a string literal that spans lines.
    ReadingString,
    /// Inside a hex list continued with trailing backslashes.
    ReadingBytes,
}

/// Streaming `.reg` parser owning the context of a single parse.
#[derive(Debug)]
pub struct Parser {
    file: String,
    state: ParseState,
    current_key: Option<(Hive, String)>,
    pending: Option<RawValue>,
    line_number: usize,
    keys: Vec<(Hive, String)>,
    seen_keys: HashSet<(Hive, String)>,
    values: Vec<RegistryValue>,
}

impl Parser {
    /// Creates a parser. `file` names the source in error messages.
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            state: ParseState::Start,
            current_key: None,
            pending: None,
            line_number: 0,
            keys: Vec::new(),
            seen_keys: HashSet::new(),
            values: Vec::new(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Returns the number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consumes the next physical line, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Parse`] located at this line. The parser
    /// must not be fed again after an error.
    pub fn feed(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        self.step(line)
            .map_err(|kind| RegistryError::at(&self.file, self.line_number, line, kind))
    }

    /// Ends the input and returns everything parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnexpectedEndOfFile`] unless the parser is
    /// between items, i.e. after at least one key and not inside a value.
    pub fn finish(self) -> Result<RegFile> {
        if self.state != ParseState::NextItem {
            debug!(state = ?self.state, "Input ended early");
            return Err(RegistryError::at(
                &self.file,
                self.line_number.max(1),
                "",
                ErrorKind::UnexpectedEndOfFile,
            ));
        }
        Ok(RegFile::new(self.file, self.keys, self.values))
    }

    fn step(&mut self, line: &str) -> ParseResult<()> {
        let trimmed = line.trim();

        match self.state {
            ParseState::Start => {
                if trimmed.trim_start_matches('\u{feff}').is_empty() {
                    return Ok(());
                }
                check_header(line.trim_start_matches('\u{feff}'))?;
                self.state = ParseState::FirstKey;
            }
            ParseState::FirstKey => {
                if is_skippable(trimmed) {
                    return Ok(());
                }
                let (hive, path) = parse_key_header(trimmed).ok_or(ErrorKind::KeyParse)?;
                self.enter_key(hive, path);
                self.state = ParseState::NextItem;
            }
            ParseState::NextItem => self.next_item(line, trimmed)?,
            ParseState::ReadingString => self.read_string(line)?,
            ParseState::ReadingBytes => self.read_bytes(trimmed)?,
        }

        Ok(())
    }

    fn next_item(&mut self, line: &str, trimmed: &str) -> ParseResult<()> {
        if is_skippable(trimmed) {
            return Ok(());
        }

        if let Some((hive, path)) = parse_key_header(trimmed) {
            self.enter_key(hive, path);
            return Ok(());
        }

        let raw = parse_value_line(line)?.ok_or_else(|| {
            ErrorKind::ValueName("expected a key header or a \"name\"=data line".to_string())
        })?;

        if !raw.continues {
            return self.emit(raw);
        }

        self.state = match raw.value_type {
            ValueType::String => ParseState::ReadingString,
            value_type if value_type.is_hex_list() => ParseState::ReadingBytes,
            value_type => {
                return Err(ErrorKind::BadState(format!(
                    "{} value cannot continue",
                    value_type
                )))
            }
        };
        trace!(name = %raw.name, state = ?self.state, "Value continues on next line");
        self.pending = Some(raw);
        Ok(())
    }

    fn read_string(&mut self, line: &str) -> ParseResult<()> {
        let mut pending = self.take_pending()?;

        if !has_odd_quotes(line) {
            pending.push_text(line)?;
            pending.push_text(LINE_TERMINATOR)?;
            self.pending = Some(pending);
            return Ok(());
        }

        let body = line
            .trim_end()
            .strip_suffix('"')
            .ok_or(ErrorKind::Continuation)?;
        pending.push_text(body)?;
        pending.continues = false;
        self.state = ParseState::NextItem;
        self.emit(pending)
    }

    fn read_bytes(&mut self, trimmed: &str) -> ParseResult<()> {
        let mut pending = self.take_pending()?;

        let (list, continues) = match trimmed.strip_suffix('\\') {
            Some(list) => (list, true),
            None => (trimmed, false),
        };
        pending.push_bytes(&decode_hex_list(list)?)?;

        if continues {
            self.pending = Some(pending);
            return Ok(());
        }

        pending.continues = false;
        self.state = ParseState::NextItem;
        self.emit(pending)
    }

    fn take_pending(&mut self) -> ParseResult<RawValue> {
        self.pending.take().ok_or_else(|| {
            ErrorKind::BadState(format!("no value in progress in state {:?}", self.state))
        })
    }

    fn enter_key(&mut self, hive: Hive, path: String) {
        debug!(line = self.line_number, %hive, path = %path, "Key header");
        if self.seen_keys.insert((hive, path.clone())) {
            self.keys.push((hive, path.clone()));
        }
        self.current_key = Some((hive, path));
    }

    fn emit(&mut self, raw: RawValue) -> ParseResult<()> {
        let (hive, key_path) = self
            .current_key
            .as_ref()
            .ok_or_else(|| ErrorKind::BadState("value before any key header".to_string()))?;
        let value = raw.finalize(*hive, key_path)?;
        trace!(
            line = self.line_number,
            name = value.name(),
            value_type = %value.value_type(),
            "Parsed value"
        );
        self.values.push(value);
        Ok(())
    }
}

/// Blank lines and `;` comments carry nothing between items.
fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with(';')
}

/// Parses an ordered sequence of lines into value records.
///
/// No records are returned unless every line parses.
pub fn parse_lines<I, S>(file: &str, lines: I) -> Result<Vec<RegistryValue>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new(file);
    for line in lines {
        parser.feed(line.as_ref())?;
    }
    parser.finish().map(RegFile::into_values)
}
