//! Protocol status vocabulary.
//!
//! These are the only outcomes an SFTP peer ever sees. Numeric values match
//! the `SSH_FX_*` codes so the protocol layer can put them on the wire as-is.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

/// Outcome code understood by the protocol layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[repr(u32)]
pub enum StatusCode {
    /// The call succeeded.
    #[default]
    Ok = 0,
    /// Normal end of iteration (read past end, exhausted directory).
    #[strum(serialize = "eof", serialize = "end_of_data")]
    Eof = 1,
    NoSuchFile = 2,
    PermissionDenied = 3,
    /// Catch-all for unclassified failures.
    Failure = 4,
    BadMessage = 5,
    NoConnection = 6,
    ConnectionLost = 7,
    /// The backend refuses the operation by policy.
    OpUnsupported = 8,
}

impl StatusCode {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Decode a wire value.
    pub fn from_u32(code: u32) -> Option<Self> {
        Some(match code {
            0 => StatusCode::Ok,
            1 => StatusCode::Eof,
            2 => StatusCode::NoSuchFile,
            3 => StatusCode::PermissionDenied,
            4 => StatusCode::Failure,
            5 => StatusCode::BadMessage,
            6 => StatusCode::NoConnection,
            7 => StatusCode::ConnectionLost,
            8 => StatusCode::OpUnsupported,
            _ => return None,
        })
    }

    /// Wire value of this code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "ok",
            StatusCode::Eof => "eof",
            StatusCode::NoSuchFile => "no_such_file",
            StatusCode::PermissionDenied => "permission_denied",
            StatusCode::Failure => "failure",
            StatusCode::BadMessage => "bad_message",
            StatusCode::NoConnection => "no_connection",
            StatusCode::ConnectionLost => "connection_lost",
            StatusCode::OpUnsupported => "op_unsupported",
        }
    }

    /// Default human-readable text, used when a status carries no message.
    pub fn description(&self) -> &'static str {
        match self {
            StatusCode::Ok => "success",
            StatusCode::Eof => "end of file",
            StatusCode::NoSuchFile => "no such file",
            StatusCode::PermissionDenied => "permission denied",
            StatusCode::Failure => "failure",
            StatusCode::BadMessage => "bad message",
            StatusCode::NoConnection => "no connection",
            StatusCode::ConnectionLost => "connection lost",
            StatusCode::OpUnsupported => "operation unsupported",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<StatusCode> for u32 {
    fn from(code: StatusCode) -> Self {
        code.as_u32()
    }
}

/// A status code with its message, as sent back to the peer on failure.
///
/// The message is empty for [`StatusCode::Ok`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", display_text(.code, .message))]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// Create a status with an explicit message.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The success status.
    pub fn ok() -> Self {
        Self::new(StatusCode::Ok, "")
    }

    /// A status carrying only a code.
    pub fn from_code(code: StatusCode) -> Self {
        Self::new(code, "")
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the code is [`StatusCode::Ok`].
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

fn display_text<'a>(code: &StatusCode, message: &'a str) -> &'a str {
    if message.is_empty() {
        code.description()
    } else {
        message
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ok()
    }
}

impl From<StatusCode> for Status {
    fn from(code: StatusCode) -> Self {
        Self::from_code(code)
    }
}
