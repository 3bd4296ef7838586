//! Recording metadata model.
//!
//! A recording row is created before its audio bytes are written and only
//! becomes visible once the file store reports success. The on-disk name is
//! derived from the identifier so user-supplied filenames never reach the
//! filesystem.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Prefix of the storage name derived from a recording id.
pub const STORED_FILENAME_PREFIX: &str = "recording-";

/// Validation errors returned by recording primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingValidationError {
    NonPositiveId,
    MalformedId,
    /// Neither a title nor a usable filename was supplied.
    EmptyTitle,
    UnknownStatus { value: i16 },
}

impl fmt::Display for RecordingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "recording id must be a positive integer"),
            Self::MalformedId => write!(f, "recording id must be an integer"),
            Self::EmptyTitle => write!(f, "a title or a named file is required"),
            Self::UnknownStatus { value } => write!(f, "unknown recording status {value}"),
        }
    }
}

impl std::error::Error for RecordingValidationError {}

/// Database-assigned recording identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordingId(i64);

impl RecordingId {
    /// Validate and construct a [`RecordingId`].
    pub fn new(id: i64) -> Result<Self, RecordingValidationError> {
        if id <= 0 {
            return Err(RecordingValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordingId {
    type Err = RecordingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .parse()
            .map_err(|_| RecordingValidationError::MalformedId)?;
        Self::new(raw)
    }
}

impl From<RecordingId> for i64 {
    fn from(value: RecordingId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for RecordingId {
    type Error = RecordingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Upload lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    /// Row exists but the audio file has not been stored yet.
    Pending,
    /// Audio file stored; visible to its owner.
    Uploaded,
}

impl RecordingStatus {
    /// Stored representation.
    #[must_use]
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Uploaded => 1,
        }
    }
}

impl TryFrom<i16> for RecordingStatus {
    type Error = RecordingValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Uploaded),
            other => Err(RecordingValidationError::UnknownStatus { value: other }),
        }
    }
}

/// Strip directory components, accepting both `/` and `\` separators.
///
/// # Examples
/// ```
/// use speech_portal::domain::recording::base_name;
///
/// assert_eq!(base_name("../../etc/evil.wav"), "evil.wav");
/// assert_eq!(base_name(r"C:\Users\ada\talk.ogg"), "talk.ogg");
/// ```
#[must_use]
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path).trim()
}

/// Recording metadata ready to be inserted with status pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecording {
    owner: UserId,
    title: String,
    filename: String,
    language: String,
}

impl NewRecording {
    /// Build metadata for a fresh upload.
    ///
    /// A blank title falls back to the base name of `original_filename`.
    pub fn new(
        owner: UserId,
        title: &str,
        original_filename: &str,
        language: &str,
    ) -> Result<Self, RecordingValidationError> {
        let filename = base_name(original_filename).to_owned();
        let title = match title.trim() {
            "" => filename.clone(),
            given => given.to_owned(),
        };
        if title.is_empty() {
            return Err(RecordingValidationError::EmptyTitle);
        }
        Ok(Self {
            owner,
            title,
            filename,
            language: language.trim().to_owned(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Stored recording metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    id: RecordingId,
    owner: UserId,
    title: String,
    filename: String,
    language: String,
    status: RecordingStatus,
    created_at: DateTime<Utc>,
}

/// Field bundle used to rebuild a [`Recording`] from storage.
#[derive(Debug, Clone)]
pub struct RecordingRecord {
    pub id: RecordingId,
    pub owner: UserId,
    pub title: String,
    pub filename: String,
    pub language: String,
    pub status: RecordingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<RecordingRecord> for Recording {
    fn from(record: RecordingRecord) -> Self {
        let RecordingRecord {
            id,
            owner,
            title,
            filename,
            language,
            status,
            created_at,
        } = record;
        Self {
            id,
            owner,
            title,
            filename,
            language,
            status,
            created_at,
        }
    }
}

impl Recording {
    #[must_use]
    pub fn id(&self) -> RecordingId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Base name of the file as uploaded.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Name under which the audio bytes are stored.
    #[must_use]
    pub fn stored_filename(&self) -> String {
        format!("{STORED_FILENAME_PREFIX}{}", self.id)
    }

    /// A recording is visible only to its owner and only once uploaded.
    #[must_use]
    pub fn is_visible_to(&self, user: UserId) -> bool {
        self.status != RecordingStatus::Pending && self.owner == user
    }

    #[must_use]
    pub fn with_status(mut self, status: RecordingStatus) -> Self {
        self.status = status;
        self
    }
}
