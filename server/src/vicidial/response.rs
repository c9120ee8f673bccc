//! Non-Agent API Response Parsing
//!
//! The dialer answers with plain text, one result per line:
//!
//! ```text
//! SUCCESS: add_lead LEAD HAS BEEN ADDED - 15551234567|1234|193718|-5
//! NOTICE: add_lead CUSTOM FIELDS VALUES ADDED - 15551234567|193718|1234
//! ERROR: add_lead INVALID PHONE NUMBER LENGTH - 555|1234
//! ```
//!
//! The ` - fields` suffix is optional and the field layout depends on the
//! function and message. Anything that does not follow this shape (proxy
//! error pages, blank bodies) is kept verbatim as [`ApiStatus::Unknown`].

use serde::Serialize;

/// Outcome keyword at the start of a response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Notice,
    Error,
    Unknown,
}

impl ApiStatus {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "SUCCESS" => Some(Self::Success),
            "NOTICE" => Some(Self::Notice),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

/// One parsed response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiLine {
    pub status: ApiStatus,
    /// API function echoed back (`add_lead`, `update_lead`, ...).
    pub function: Option<String>,
    pub message: String,
    /// Pipe-separated values after ` - `, positional, blanks preserved.
    pub fields: Vec<String>,
}

impl ApiLine {
    /// Parse a single non-blank line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        let Some((status, rest)) = line
            .split_once(':')
            .and_then(|(keyword, rest)| Some((ApiStatus::from_keyword(keyword.trim())?, rest)))
        else {
            return Self::unknown(line);
        };

        let rest = rest.trim();
        let (function, rest) = match rest.split_once(char::is_whitespace) {
            Some((token, tail)) if is_function_name(token) => (Some(token.to_string()), tail.trim()),
            None if is_function_name(rest) => (Some(rest.to_string()), ""),
            _ => (None, rest),
        };

        let (message, fields) = match rest.split_once(" - ") {
            Some((message, fields)) => (
                message.trim(),
                fields.split('|').map(|f| f.trim().to_string()).collect(),
            ),
            None => (rest.trim_end_matches(" -").trim(), Vec::new()),
        };

        Self {
            status,
            function,
            message: message.to_string(),
            fields,
        }
    }

    fn unknown(line: &str) -> Self {
        Self {
            status: ApiStatus::Unknown,
            function: None,
            message: line.to_string(),
            fields: Vec::new(),
        }
    }
}

/// Function names are lowercase snake case; messages are upper case.
fn is_function_name(token: &str) -> bool {
    !token.is_empty()
        && token.chars().any(|c| c.is_ascii_lowercase())
        && token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Full parsed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiReply {
    pub lines: Vec<ApiLine>,
}

impl ApiReply {
    /// Parse a response body. Blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(ApiLine::parse)
                .collect(),
        }
    }

    /// Overall outcome: any error wins, otherwise the first line decides.
    pub fn status(&self) -> ApiStatus {
        if self.lines.iter().any(|l| l.status == ApiStatus::Error) {
            return ApiStatus::Error;
        }
        self.lines
            .first()
            .map_or(ApiStatus::Unknown, |line| line.status)
    }

    /// The line that decided [`Self::status`].
    pub fn primary(&self) -> Option<&ApiLine> {
        self.lines
            .iter()
            .find(|l| l.status == ApiStatus::Error)
            .or_else(|| self.lines.first())
    }

    /// Lead id assigned by a successful `add_lead`
    /// (`phone|list_id|lead_id|gmt_offset`).
    pub fn lead_id(&self) -> Option<&str> {
        self.lines
            .iter()
            .filter(|l| l.status == ApiStatus::Success && l.function.as_deref() == Some("add_lead"))
            .find_map(|l| l.fields.get(2))
            .map(String::as_str)
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
    }

    /// Caller-facing view of the reply.
    pub fn summary(&self) -> ReplySummary {
        let primary = self.primary();
        ReplySummary {
            status: self.status(),
            function: primary.and_then(|l| l.function.clone()),
            message: primary.map(|l| l.message.clone()).unwrap_or_default(),
            lead_id: self.lead_id().map(str::to_string),
            details: primary.map(|l| l.fields.clone()).unwrap_or_default(),
            lines: self.lines.clone(),
        }
    }
}

/// Parsed reply as returned to webhook callers under `result`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplySummary {
    pub status: ApiStatus,
    pub function: Option<String>,
    pub message: String,
    pub lead_id: Option<String>,
    pub details: Vec<String>,
    pub lines: Vec<ApiLine>,
}
