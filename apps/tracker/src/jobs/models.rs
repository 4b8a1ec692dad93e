use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend-reported lifecycle state of a processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// `completed` and `failed` end the status polling.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// `GET /jobs/{id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(alias = "job_id")]
    pub uid: String,
    pub status: JobStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /jobs/{id}/result` response. Only `resume` carries data the view model needs;
/// everything is kept as loose JSON because its shape drifts between backend versions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultDocument {
    #[serde(default)]
    pub resume: Value,
    #[serde(default)]
    pub review: Option<Value>,
    #[serde(default)]
    pub metadata: Value,
}

impl ResultDocument {
    /// Wraps an arbitrary payload. Payloads predating the `{resume, review, metadata}`
    /// envelope are the resume itself.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut envelope) if envelope.get("resume").is_some_and(Value::is_object) => {
                ResultDocument {
                    resume: envelope.remove("resume").unwrap_or_default(),
                    review: envelope.remove("review").filter(|v| !v.is_null()),
                    metadata: envelope.remove("metadata").unwrap_or_default(),
                }
            }
            resume => ResultDocument {
                resume,
                review: None,
                metadata: Value::Null,
            },
        }
    }

    /// The object section resolution runs against.
    pub fn resume_root(&self) -> &Value {
        &self.resume
    }
}

/// `POST /upload` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(alias = "uid")]
    pub job_id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Tagged view over what a poll handle has observed so far.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPhase<'a> {
    /// No status response has been applied yet.
    Unknown,
    Pending,
    Processing,
    /// `result` stays `None` until the result fetch succeeds.
    Completed { result: Option<&'a ResultDocument> },
    Failed { error: Option<&'a str> },
}

/// Serde adapter for backend timestamps: RFC 3339, or naive ISO 8601 read as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}
