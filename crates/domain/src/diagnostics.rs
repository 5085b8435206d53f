use std::collections::BTreeMap;
use std::str::FromStr;

use backoffice_core::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Origin of a captured failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Uncaught runtime failure (panic or uncaught script error).
    Runtime,
    /// Asynchronous operation that finished with an unhandled error.
    RejectedPromise,
    /// Failure reported by a rendering component.
    ComponentFailure,
}

impl ErrorKind {
    /// Returns a stable transport value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::RejectedPromise => "rejectedPromise",
            Self::ComponentFailure => "componentFailure",
        }
    }
}

impl FromStr for ErrorKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "runtime" => Ok(Self::Runtime),
            "rejectedPromise" => Ok(Self::RejectedPromise),
            "componentFailure" => Ok(Self::ComponentFailure),
            _ => Err(AppError::Validation(format!(
                "unknown error kind '{value}'"
            ))),
        }
    }
}

/// Best-effort annotation derived from a failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHint {
    /// Property access or unwrap on a null, undefined, or absent value.
    MissingValue,
    /// Invalid operation on an array, string, or other collection.
    InvalidCollectionOperation,
    /// Request never reached or never came back from the server.
    NetworkFailure,
    /// No known pattern matched.
    Unknown,
}

const COLLECTION_PATTERNS: &[&str] = &[
    "map is not a function",
    "filter is not a function",
    "foreach is not a function",
    "reduce is not a function",
    "invalid array length",
    "index out of bounds",
    "out of range",
    "is not a char boundary",
];

const MISSING_VALUE_PATTERNS: &[&str] = &[
    "cannot read properties of undefined",
    "cannot read properties of null",
    "cannot read property",
    "undefined is not an object",
    "null is not an object",
    "on a `none` value",
];

const NETWORK_PATTERNS: &[&str] = &[
    "failed to fetch",
    "networkerror",
    "network error",
    "connection refused",
    "timed out",
];

impl ErrorHint {
    /// Returns a stable transport value for this hint.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingValue => "missing_value",
            Self::InvalidCollectionOperation => "invalid_collection_operation",
            Self::NetworkFailure => "network_failure",
            Self::Unknown => "unknown",
        }
    }

    /// Classifies a failure message by known substrings.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        let matches_any =
            |patterns: &[&str]| patterns.iter().any(|pattern| message.contains(pattern));

        if matches_any(COLLECTION_PATTERNS) {
            Self::InvalidCollectionOperation
        } else if matches_any(MISSING_VALUE_PATTERNS) {
            Self::MissingValue
        } else if matches_any(NETWORK_PATTERNS) {
            Self::NetworkFailure
        } else {
            Self::Unknown
        }
    }
}

/// One captured failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// Human-readable failure message.
    pub message: String,
    /// Stack or backtrace text, when available.
    pub stack: Option<String>,
    /// Page, route, or source location where the failure happened.
    pub source_url: String,
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    /// Reporting client user agent or process name.
    pub agent_string: String,
    /// Failure origin.
    pub kind: ErrorKind,
    /// Optional structured context supplied by the reporter.
    pub context: Option<Value>,
}

impl ErrorReport {
    /// Creates a report stamped with the current time.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            source_url: String::new(),
            timestamp: Utc::now(),
            agent_string: String::new(),
            kind,
            context: None,
        }
    }

    /// Sets the stack text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = source_url.into();
        self
    }

    /// Sets the reporting agent.
    #[must_use]
    pub fn with_agent_string(mut self, agent_string: impl Into<String>) -> Self {
        self.agent_string = agent_string.into();
        self
    }

    /// Attaches structured context.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the heuristic annotation for this report.
    #[must_use]
    pub fn hint(&self) -> ErrorHint {
        ErrorHint::classify(self.message.as_str())
    }
}

/// Aggregate view over the retained reports.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorSummary {
    /// Number of retained reports.
    pub total: usize,
    /// Retained report count per kind; kinds with no reports are absent.
    pub by_type: BTreeMap<ErrorKind, usize>,
    /// Most recent reports in arrival order.
    pub recent: Vec<ErrorReport>,
}
