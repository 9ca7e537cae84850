//! Remote image-generation jobs.
//!
//! A [`Job`] is a local snapshot of an upstream prediction record. It is
//! never mutated in place; a fresh snapshot is built every time the status
//! endpoint is queried.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Opaque identifier returned by the provider when a job is submitted.
///
/// A handle is always a single URL path segment: it never contains `/`,
/// `\`, `?` or `#`, and is never `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobHandle(String);

impl JobHandle {
    /// Validate a raw handle. Empty, whitespace-only and path-like input is
    /// rejected with [`CoreError::NotFound`].
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::NotFound("empty job handle".into()));
        }
        if raw == "." || raw == ".." || raw.contains(['/', '\\', '?', '#']) {
            return Err(CoreError::NotFound(format!("invalid job handle '{raw}'")));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobHandle {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<JobHandle> for String {
    fn from(handle: JobHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a remote job.
///
/// `Succeeded`, `Failed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for JobStatus {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    /// Map the provider's status vocabulary. The provider reports a job
    /// waiting for a worker as `starting`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starting" | "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "canceled" => Ok(Self::Canceled),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Snapshot of a remote job.
///
/// Deserialization goes through [`Job::from_prediction`], so a raw provider
/// record and a re-serialized `Job` are read by the same rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Job {
    pub id: JobHandle,
    pub status: JobStatus,
    /// Output URLs. Empty until the job succeeds.
    pub output: Vec<String>,
    /// Provider-reported failure reason, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl TryFrom<serde_json::Value> for Job {
    type Error = CoreError;

    fn try_from(record: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_prediction(&record)
    }
}

impl Job {
    /// Build a snapshot from a raw provider prediction record.
    ///
    /// `output` may be an array of URLs, a single URL string, or null.
    pub fn from_prediction(record: &serde_json::Value) -> Result<Self, CoreError> {
        let id = record
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::MalformedJob("missing 'id'".into()))?;
        let id = JobHandle::parse(id)?;

        let status = record
            .get("status")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::MalformedJob("missing 'status'".into()))?
            .parse::<JobStatus>()?;

        let output = match record.get("output") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(serde_json::Value::String(url)) => vec![url.clone()],
            _ => Vec::new(),
        };

        let error = match record.get("error") {
            Some(serde_json::Value::String(msg)) => Some(msg.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            id,
            status,
            output,
            error,
            created_at: parse_timestamp(record.get("created_at")),
            completed_at: parse_timestamp(record.get("completed_at")),
        })
    }

    /// First output URL, only once the job has succeeded.
    pub fn image_url(&self) -> Option<&str> {
        if self.status == JobStatus::Succeeded {
            self.output.first().map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

fn parse_timestamp(value: Option<&serde_json::Value>) -> Option<Timestamp> {
    value
        .and_then(|v| v.as_str())
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
