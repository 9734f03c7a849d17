//! Registry root namespaces.

use std::fmt;
use std::str::FromStr;

/// One of the five registry hives a `.reg` export may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hive {
    /// `HKEY_CLASSES_ROOT`
    #[cfg_attr(feature = "serde", serde(rename = "HKEY_CLASSES_ROOT"))]
    ClassesRoot,

    /// `HKEY_CURRENT_USER`
    #[cfg_attr(feature = "serde", serde(rename = "HKEY_CURRENT_USER"))]
    CurrentUser,

    /// `HKEY_LOCAL_MACHINE`
    #[cfg_attr(feature = "serde", serde(rename = "HKEY_LOCAL_MACHINE"))]
    LocalMachine,

    /// `HKEY_USERS`
    #[cfg_attr(feature = "serde", serde(rename = "HKEY_USERS"))]
    Users,

    /// `HKEY_CURRENT_CONFIG`
    #[cfg_attr(feature = "serde", serde(rename = "HKEY_CURRENT_CONFIG"))]
    CurrentConfig,
}

impl Hive {
    /// All recognized hives, in declaration order.
    pub const ALL: [Hive; 5] = [
        Hive::ClassesRoot,
        Hive::CurrentUser,
        Hive::LocalMachine,
        Hive::Users,
        Hive::CurrentConfig,
    ];

    /// Parses a hive from its full name, e.g. `HKEY_LOCAL_MACHINE`.
    ///
    /// Matching is exact; abbreviations such as `HKLM` are not accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "HKEY_CLASSES_ROOT" => Some(Hive::ClassesRoot),
            "HKEY_CURRENT_USER" => Some(Hive::CurrentUser),
            "HKEY_LOCAL_MACHINE" => Some(Hive::LocalMachine),
            "HKEY_USERS" => Some(Hive::Users),
            "HKEY_CURRENT_CONFIG" => Some(Hive::CurrentConfig),
            _ => None,
        }
    }

    /// Returns the full name of this hive.
    pub fn name(&self) -> &'static str {
        match self {
            Hive::ClassesRoot => "HKEY_CLASSES_ROOT",
            Hive::CurrentUser => "HKEY_CURRENT_USER",
            Hive::LocalMachine => "HKEY_LOCAL_MACHINE",
            Hive::Users => "HKEY_USERS",
            Hive::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognized hive name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hive {0:?}")]
pub struct UnknownHive(pub String);

impl FromStr for Hive {
    type Err = UnknownHive;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Hive::from_name(s).ok_or_else(|| UnknownHive(s.to_string()))
    }
}
