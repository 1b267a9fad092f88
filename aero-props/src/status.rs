use std::collections::HashMap;
use std::fmt;

use http::StatusCode;

use super::config::CodecConfig;
use super::error::Error;

pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

/// The content of a `status` element, eg. `HTTP/1.1 404 Not Found`
///
/// The protocol version is not kept, `StatusCodec` renders it.
#[derive(Debug, PartialEq, Clone)]
pub struct Status {
    pub code: StatusCode,
    pub reason: Option<String>,
}

/// Granularity at which a status blocked an operation
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Scope {
    /// The top-level status of a response, covers the whole resource
    Resource,
    /// The status of a propstat group, covers only its properties
    PropStat,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Classification {
    Ok,
    Failed,
}

/// Only `200 OK` is a success, other 2xx codes and redirects fail.
/// An absent status does not block anything.
pub fn classify(status: Option<&Status>) -> Classification {
    match status {
        None => Classification::Ok,
        Some(s) if s.code == StatusCode::OK => Classification::Ok,
        Some(_) => Classification::Failed,
    }
}

impl Status {
    pub fn new(code: StatusCode) -> Self {
        Self { code, reason: None }
    }

    pub fn with_reason(code: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: Some(reason.into()),
        }
    }

    /// Parse `<protocol-version> <code> <reason>`
    ///
    /// The reason phrase may contain spaces, so only the first two
    /// spaces are separators. The reason field may be empty, as in
    /// `HTTP/1.1 599 `, which gives no reason.
    pub fn parse(text: &str) -> Result<Self, Error> {
        // the space after the code is a separator, only the reason is trimmed
        let parts = text.trim_start().splitn(3, ' ').collect::<Vec<_>>();
        let [_version, code, reason] = parts.as_slice() else {
            return Err(Error::format("HTTP status", text.trim(), "expected 3 fields"));
        };
        let code = StatusCode::from_bytes(code.as_bytes())
            .map_err(|e| Error::format("HTTP status", text.trim(), e))?;
        let reason = match reason.trim() {
            "" => None,
            r => Some(r.to_string()),
        };
        Ok(Self { code, reason })
    }

    pub fn is_success(&self) -> bool {
        classify(Some(self)) == Classification::Ok
    }

    /// Turn a failed classification into an error scoped to `scope`
    pub fn check(status: Option<&Status>, scope: Scope) -> Result<(), Error> {
        match (classify(status), status) {
            (Classification::Failed, Some(s)) => Err(Error::Status {
                status: s.clone(),
                scope,
            }),
            _ => Ok(()),
        }
    }
}

impl From<StatusCode> for Status {
    fn from(code: StatusCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(r) => write!(f, "{} {}", self.code.as_u16(), r),
            None => write!(f, "{}", self.code),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource => write!(f, "resource"),
            Self::PropStat => write!(f, "propstat"),
        }
    }
}

/// Reason phrases used when a status carries none
///
/// Overrides are checked first, then the standard HTTP table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReasonPhrases {
    overrides: HashMap<StatusCode, String>,
}
impl ReasonPhrases {
    pub fn new(overrides: HashMap<StatusCode, String>) -> Self {
        Self { overrides }
    }

    pub fn lookup(&self, code: StatusCode) -> Option<&str> {
        self.overrides
            .get(&code)
            .map(String::as_str)
            .or_else(|| code.canonical_reason())
    }
}

/// Renders statuses to their textual form
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCodec {
    protocol: String,
    phrases: ReasonPhrases,
}
impl Default for StatusCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL, ReasonPhrases::default())
    }
}
impl StatusCodec {
    pub fn new(protocol: impl Into<String>, phrases: ReasonPhrases) -> Self {
        Self {
            protocol: protocol.into(),
            phrases,
        }
    }

    pub fn from_config(config: &CodecConfig) -> Result<Self, Error> {
        let overrides = config
            .reasons
            .iter()
            .map(|(code, reason)| {
                let code = StatusCode::from_bytes(code.as_bytes())
                    .map_err(|e| Error::format("reason phrase code", code, e))?;
                Ok((code, reason.clone()))
            })
            .collect::<Result<HashMap<_, _>, Error>>()?;
        Ok(Self::new(
            config.protocol.clone(),
            ReasonPhrases::new(overrides),
        ))
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn encode(&self, status: &Status) -> String {
        let reason = match &status.reason {
            Some(r) if !r.is_empty() => r.as_str(),
            _ => self.phrases.lookup(status.code).unwrap_or(""),
        };
        format!("{} {} {}", self.protocol, status.code.as_u16(), reason)
    }

    pub fn decode(&self, text: &str) -> Result<Status, Error> {
        Status::parse(text)
    }
}
