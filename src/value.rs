//! Registry value lines: type dispatch, raw accumulation and final decoding.

use crate::error::{ErrorKind, ParseResult};
use crate::hive::Hive;
use crate::scanner::{find_unescaped, has_odd_quotes};
use crate::utils::{
    decode_dword, decode_hex_list, decode_qword, decode_utf16_multi, decode_utf16_string,
    unescape,
};
use std::fmt;

/// Inserted between the pieces of a string literal that spans several lines.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Registry value data types found in `.reg` exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// No value type (`hex(0):`).
    None,

    /// String (`"..."`).
    String,

    /// String with environment variables (`hex(2):`).
    ExpandString,

    /// Binary data (`hex:`).
    Binary,

    /// 32-bit integer (`dword:`).
    Dword,

    /// Multiple strings (`hex(7):`).
    MultiString,

    /// 64-bit little-endian integer (`hex(b):`).
    Qword,
}

impl ValueType {
    /// Maps the text before `:` in a value's data to its type.
    ///
    /// String values have no prefix and are not matched here.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "dword" => Some(ValueType::Dword),
            "hex" => Some(ValueType::Binary),
            "hex(0)" => Some(ValueType::None),
            "hex(2)" => Some(ValueType::ExpandString),
            "hex(7)" => Some(ValueType::MultiString),
            "hex(b)" => Some(ValueType::Qword),
            _ => None,
        }
    }

    /// Returns the name of this value type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::None => "REG_NONE",
            ValueType::String => "REG_SZ",
            ValueType::ExpandString => "REG_EXPAND_SZ",
            ValueType::Binary => "REG_BINARY",
            ValueType::Dword => "REG_DWORD",
            ValueType::MultiString => "REG_MULTI_SZ",
            ValueType::Qword => "REG_QWORD",
        }
    }

    /// Returns true if the type is written as a hex byte list.
    pub fn is_hex_list(&self) -> bool {
        !matches!(self, ValueType::String | ValueType::Dword)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded registry value data.
///
/// Each variant matches exactly one [`ValueType`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueData {
    /// Raw bytes of a `REG_NONE` value.
    None(Vec<u8>),

    /// String value.
    String(String),

    /// Expandable string value.
    ExpandString(String),

    /// Binary data.
    Binary(Vec<u8>),

    /// 32-bit integer.
    Dword(u32),

    /// Multiple strings.
    MultiString(Vec<String>),

    /// 64-bit integer.
    Qword(u64),
}

impl ValueData {
    /// Returns the value type this data belongs to.
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueData::None(_) => ValueType::None,
            ValueData::String(_) => ValueType::String,
            ValueData::ExpandString(_) => ValueType::ExpandString,
            ValueData::Binary(_) => ValueType::Binary,
            ValueData::Dword(_) => ValueType::Dword,
            ValueData::MultiString(_) => ValueType::MultiString,
            ValueData::Qword(_) => ValueType::Qword,
        }
    }

    /// Returns the text of a `REG_SZ` or `REG_EXPAND_SZ` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueData::String(s) | ValueData::ExpandString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer of a `REG_DWORD` value.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ValueData::Dword(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the integer of a `REG_QWORD` value.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ValueData::Qword(q) => Some(*q),
            _ => None,
        }
    }

    /// Returns the bytes of a `REG_BINARY` or `REG_NONE` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ValueData::Binary(b) | ValueData::None(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the strings of a `REG_MULTI_SZ` value.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            ValueData::MultiString(strings) => Some(strings),
            _ => None,
        }
    }
}

fn fmt_hex_list(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{:02x}", b)?;
    }
    Ok(())
}

impl fmt::Display for ValueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueData::None(b) if b.is_empty() => f.write_str("(none)"),
            ValueData::None(b) | ValueData::Binary(b) => fmt_hex_list(f, b),
            ValueData::String(s) | ValueData::ExpandString(s) => f.write_str(s),
            ValueData::Dword(d) => write!(f, "{} (0x{:08x})", d, d),
            ValueData::Qword(q) => write!(f, "{} (0x{:016x})", q, q),
            ValueData::MultiString(strings) => f.write_str(&strings.join(", ")),
        }
    }
}

/// A fully decoded value, bound to the key it was found under.
///
/// The value type is not stored; it always follows from the data variant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryValue {
    hive: Hive,
    key_path: String,
    name: String,
    data: ValueData,
}

impl RegistryValue {
    /// Returns the hive of the owning key.
    pub fn hive(&self) -> Hive {
        self.hive
    }

    /// Returns the owning key's path below the hive, without brackets.
    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    /// Returns the value name. Empty for the key's default value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this is the key's default (unnamed) value.
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns the declared value type.
    pub fn value_type(&self) -> ValueType {
        self.data.value_type()
    }

    /// Returns the decoded data.
    pub fn data(&self) -> &ValueData {
        &self.data
    }

    /// Consumes the record, returning its data.
    pub fn into_data(self) -> ValueData {
        self.data
    }
}

impl fmt::Display for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.is_default() { "@" } else { self.name.as_str() };
        write!(
            f,
            "{}\\{} {} ({}) = {}",
            self.hive,
            self.key_path,
            name,
            self.value_type(),
            self.data
        )
    }
}

/// Undecoded payload collected from one or more lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawData {
    /// String literal body or DWORD digits.
    Text(String),

    /// Bytes from one or more hex lists.
    Bytes(Vec<u8>),
}

/// A value line split into name, type and first-line data.
///
/// While `continues` is set the parser keeps feeding lines into `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    /// Value name, taken literally from between the quotes.
    pub name: String,

    /// Declared type.
    pub value_type: ValueType,

    /// Payload accumulated so far.
    pub data: RawData,

    /// True while another continuation line is expected.
    pub continues: bool,
}

impl RawValue {
    /// Appends a piece of a string literal.
    pub fn push_text(&mut self, text: &str) -> ParseResult<()> {
        match &mut self.data {
            RawData::Text(buffer) => {
                buffer.push_str(text);
                Ok(())
            }
            RawData::Bytes(_) => Err(ErrorKind::BadState(format!(
                "{} value cannot take string continuation",
                self.value_type
            ))),
        }
    }

    /// Appends decoded bytes from a hex list continuation.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> ParseResult<()> {
        match &mut self.data {
            RawData::Bytes(buffer) => {
                buffer.extend_from_slice(bytes);
                Ok(())
            }
            RawData::Text(_) => Err(ErrorKind::BadState(format!(
                "{} value cannot take hex continuation",
                self.value_type
            ))),
        }
    }

    /// Decodes the accumulated payload and binds it to its key.
    ///
    /// String literals are unescaped here, once, after every continuation
    /// line has been joined.
    pub fn finalize(self, hive: Hive, key_path: &str) -> ParseResult<RegistryValue> {
        if self.continues {
            return Err(ErrorKind::BadState(format!(
                "value {:?} finalized before its last line",
                self.name
            )));
        }

        let data = match (self.value_type, self.data) {
            (ValueType::String, RawData::Text(text)) => ValueData::String(unescape(&text)?),
            (ValueType::Dword, RawData::Text(text)) => ValueData::Dword(decode_dword(&text)?),
            (ValueType::None, RawData::Bytes(bytes)) => ValueData::None(bytes),
            (ValueType::Binary, RawData::Bytes(bytes)) => ValueData::Binary(bytes),
            (ValueType::ExpandString, RawData::Bytes(bytes)) => {
                ValueData::ExpandString(decode_utf16_string(&bytes)?)
            }
            (ValueType::MultiString, RawData::Bytes(bytes)) => {
                ValueData::MultiString(decode_utf16_multi(&bytes)?)
            }
            (ValueType::Qword, RawData::Bytes(bytes)) => ValueData::Qword(decode_qword(&bytes)?),
            (value_type, _) => {
                return Err(ErrorKind::BadState(format!(
                    "{} value carries mismatched raw data",
                    value_type
                )))
            }
        };

        Ok(RegistryValue {
            hive,
            key_path: key_path.to_string(),
            name: self.name,
            data,
        })
    }
}

/// Reads the value name before `=`.
///
/// `@` is regedit's spelling of the default value and maps to an empty name.
fn parse_value_name(text: &str) -> ParseResult<String> {
    if text == "@" {
        return Ok(String::new());
    }
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .ok_or_else(|| ErrorKind::ValueName(format!("{} is not a quoted name", text)))
}

/// Splits a value line into name, type and first-line payload.
///
/// Returns `Ok(None)` when the line has no `=` outside a quoted literal.
pub fn parse_value_line(line: &str) -> ParseResult<Option<RawValue>> {
    let line = line.trim_start();
    let sep = match find_unescaped(line, '=') {
        Some(sep) => sep,
        None => return Ok(None),
    };

    let name = parse_value_name(line[..sep].trim_end())?;
    let data = line[sep + 1..].trim_start();

    if data.starts_with('"') {
        return Ok(Some(parse_string_data(name, data)?));
    }

    let (prefix, rest) = data
        .split_once(':')
        .ok_or_else(|| ErrorKind::data_type(format!("missing ':' in {:?}", data)))?;
    let value_type =
        ValueType::from_prefix(prefix).ok_or_else(|| ErrorKind::UnknownType(prefix.to_string()))?;
    let rest = rest.trim();

    if value_type == ValueType::Dword {
        if rest.ends_with('\\') {
            return Err(ErrorKind::data_type("DWORD values cannot continue"));
        }
        return Ok(Some(RawValue {
            name,
            value_type,
            data: RawData::Text(rest.to_string()),
            continues: false,
        }));
    }

    let (list, continues) = match rest.strip_suffix('\\') {
        Some(list) => (list, true),
        None => (rest, false),
    };

    Ok(Some(RawValue {
        name,
        value_type,
        data: RawData::Bytes(decode_hex_list(list)?),
        continues,
    }))
}

/// Handles `"..."` data, which may leave the literal open at end of line.
fn parse_string_data(name: String, data: &str) -> ParseResult<RawValue> {
    if has_odd_quotes(data) {
        let mut text = data[1..].to_string();
        text.push_str(LINE_TERMINATOR);
        return Ok(RawValue {
            name,
            value_type: ValueType::String,
            data: RawData::Text(text),
            continues: true,
        });
    }

    let body = data
        .trim_end()
        .get(1..)
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| ErrorKind::data_type(format!("text after closing quote in {:?}", data)))?;

    Ok(RawValue {
        name,
        value_type: ValueType::String,
        data: RawData::Text(body.to_string()),
        continues: false,
    })
}
