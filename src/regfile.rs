//! Parsed `.reg` export files.

use crate::error::Result;
use crate::hive::Hive;
use crate::parser::Parser;
use crate::value::RegistryValue;
use encoding_rs::UTF_8;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, instrument};

/// A fully parsed registry export.
///
/// Holds every value record in file order, plus the key headers that were
/// seen (including keys without any values).
#[derive(Debug, Clone)]
pub struct RegFile {
    name: String,
    keys: Vec<(Hive, String)>,
    values: Vec<RegistryValue>,
}

impl RegFile {
    pub(crate) fn new(name: String, keys: Vec<(Hive, String)>, values: Vec<RegistryValue>) -> Self {
        Self { name, keys, values }
    }

    /// Opens and parses an export file.
    ///
    /// regedit writes exports as UTF-16LE with a byte order mark; UTF-8
    /// files, with or without a BOM, are read as well.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read or is not valid text
    /// - Any line fails to parse
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reg_export::RegFile;
    ///
    /// let file = RegFile::open("settings.reg").unwrap();
    /// for value in file.values() {
    ///     println!("{}", value);
    /// }
    /// ```
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening registry export");
        let bytes = fs::read(&path)?;
        debug!(size = bytes.len(), "Read export file");
        Self::from_bytes(&path.as_ref().display().to_string(), &bytes)
    }

    /// Reads an export from any byte stream.
    pub fn from_reader<R: Read>(name: &str, mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(name, &bytes)
    }

    /// Parses an export from raw file bytes, detecting the encoding from its BOM.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        let (text, encoding, had_errors) = UTF_8.decode(bytes);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid {}", name, encoding.name()),
            )
            .into());
        }
        debug!(encoding = encoding.name(), "Decoded export text");
        Self::parse_str(name, &text)
    }

    /// Parses an export that is already decoded to text.
    ///
    /// Lines may end in `\n` or `\r\n`.
    pub fn parse_str(name: &str, text: &str) -> Result<Self> {
        let mut parser = Parser::new(name);
        for line in text.lines() {
            parser.feed(line)?;
        }
        let file = parser.finish()?;
        info!(keys = file.keys.len(), values = file.values.len(), "Parsed registry export");
        Ok(file)
    }

    /// Returns the source name used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all value records in file order.
    pub fn values(&self) -> &[RegistryValue] {
        &self.values
    }

    /// Consumes the file, returning its value records.
    pub fn into_values(self) -> Vec<RegistryValue> {
        self.values
    }

    /// Returns the number of value records.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the export holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns each distinct key header in order of first appearance.
    pub fn keys(&self) -> impl Iterator<Item = (Hive, &str)> + '_ {
        self.keys.iter().map(|(hive, path)| (*hive, path.as_str()))
    }

    /// Returns the values stored under one key.
    ///
    /// Key paths compare case-insensitively, as they do in the registry.
    pub fn values_in<'a>(
        &'a self,
        hive: Hive,
        key_path: &'a str,
    ) -> impl Iterator<Item = &'a RegistryValue> + 'a {
        self.values
            .iter()
            .filter(move |v| in_key(v, hive, key_path))
    }

    /// Looks up a single value by key and name. Use `""` for the default value.
    pub fn value(&self, hive: Hive, key_path: &str, name: &str) -> Option<&RegistryValue> {
        self.values
            .iter()
            .find(|v| in_key(v, hive, key_path) && v.name().eq_ignore_ascii_case(name))
    }
}

fn in_key(value: &RegistryValue, hive: Hive, key_path: &str) -> bool {
    value.hive() == hive && value.key_path().eq_ignore_ascii_case(key_path)
}
