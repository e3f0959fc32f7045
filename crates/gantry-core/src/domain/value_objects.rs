//! Domain value objects: HttpMethod, ExitCode, TraceLevel, LogLevel, ConfigKind.
//!
//! Plain `Copy` value types. Each has a string form, and a `FromStr` parser
//! where the outside world hands us text.

use crate::domain::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── HttpMethod ───────────────────────────────────────────────────────────────

/// Request method. Not part of route matching; actions filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Safe methods never change server state.
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            other => Err(format!("unknown HTTP method: {other}")),
        }
    }
}

// ── ExitCode ─────────────────────────────────────────────────────────────────

/// Console exit status, following the BSD `sysexits` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitCode(u8);

impl ExitCode {
    pub const OK: Self = Self(0);
    pub const UNSPECIFIED_ERROR: Self = Self(1);
    pub const USAGE: Self = Self(64);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub const fn code(self) -> u8 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── TraceLevel ───────────────────────────────────────────────────────────────

/// How much call-site detail log records carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    /// Message only.
    Off,
    /// Message plus source file and line.
    Location,
    /// Everything: location, thread ids, span enter/exit events.
    Full,
}

impl TraceLevel {
    /// Debug mode gets the highest tier, everything else the lowest.
    pub const fn from_debug(debug: bool) -> Self {
        if debug { Self::Full } else { Self::Off }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Location => "location",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── LogLevel ─────────────────────────────────────────────────────────────────

/// Severity a log target accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Trace,
}

impl LogLevel {
    pub const ALL: [Self; 4] = [Self::Error, Self::Warning, Self::Info, Self::Trace];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ConfigKind ───────────────────────────────────────────────────────────────

/// Which entry point a configuration was assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Web,
    Console,
}

impl ConfigKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Console => "console",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Flag ─────────────────────────────────────────────────────────────────────

/// Boolean-like environment flag.
///
/// An integer is true when non-zero; `true`, `yes` and `on` are true in
/// any case. Anything else, including an empty value, is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flag(pub bool);

impl FromStr for Flag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Self(n != 0));
        }
        Ok(Self(matches!(
            s.to_ascii_lowercase().as_str(),
            "true" | "yes" | "on"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_method_parses_case_insensitively() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("BREW".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn flag_truthiness() {
        for truthy in ["1", "2", "-1", "true", "YES", "On"] {
            assert!(truthy.parse::<Flag>().unwrap().0, "{truthy}");
        }
        for falsy in ["0", "", "false", "no", "debug"] {
            assert!(!falsy.parse::<Flag>().unwrap().0, "{falsy}");
        }
    }

    #[test]
    fn trace_level_from_debug() {
        assert_eq!(TraceLevel::from_debug(true), TraceLevel::Full);
        assert_eq!(TraceLevel::from_debug(false), TraceLevel::Off);
    }

    #[test]
    fn exit_codes() {
        assert!(ExitCode::OK.is_success());
        assert_eq!(ExitCode::USAGE.code(), 64);
    }
}
