//! Wire representations of domain entities.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::negotiate::{Representable, encode_xml};
use crate::domain::{AccountStatus, Error, Recording, RecordingStatus, User};

/// Recording as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingDto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub filename: String,
    pub stored_filename: String,
    pub language: String,
    pub status: RecordingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Recording> for RecordingDto {
    fn from(recording: &Recording) -> Self {
        Self {
            id: recording.id().get(),
            user_id: recording.owner().get(),
            title: recording.title().to_owned(),
            filename: recording.filename().to_owned(),
            stored_filename: recording.stored_filename(),
            language: recording.language().to_owned(),
            status: recording.status(),
            created_at: recording.created_at(),
        }
    }
}

impl Representable for RecordingDto {
    const XML_ROOT: &'static str = "recording";
}

/// Recordings listing; a JSON array, or `<recordings>` with one
/// `<recording>` child per entry in XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordingListDto(pub Vec<RecordingDto>);

impl From<&[Recording]> for RecordingListDto {
    fn from(recordings: &[Recording]) -> Self {
        Self(recordings.iter().map(RecordingDto::from).collect())
    }
}

#[derive(Serialize)]
struct RecordingListXml<'a> {
    recording: &'a [RecordingDto],
}

impl Representable for RecordingListDto {
    const XML_ROOT: &'static str = "recordings";

    fn xml_body(&self) -> Result<String, Error> {
        encode_xml(
            Self::XML_ROOT,
            &RecordingListXml {
                recording: &self.0,
            },
        )
    }
}

/// Public view of an account. Never carries the password hash or token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub status: AccountStatus,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            email: user.email().as_ref().to_owned(),
            status: user.status(),
        }
    }
}

impl Representable for UserDto {
    const XML_ROOT: &'static str = "user";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordingId, RecordingRecord, UserId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn recording() -> Recording {
        Recording::from(RecordingRecord {
            id: RecordingId::new(3).expect("valid id"),
            owner: UserId::new(9).expect("valid id"),
            title: "Greeting".to_owned(),
            filename: "speech.wav".to_owned(),
            language: "en".to_owned(),
            status: RecordingStatus::Uploaded,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date"),
        })
    }

    #[rstest]
    fn recording_json_uses_camel_case(recording: Recording) {
        let json = serde_json::to_value(RecordingDto::from(&recording)).expect("json");

        assert_eq!(json["userId"], 9);
        assert_eq!(json["storedFilename"], "recording-3");
        assert_eq!(json["status"], "uploaded");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
    }

    #[rstest]
    fn list_is_a_plain_json_array(recording: Recording) {
        let list = RecordingListDto::from(std::slice::from_ref(&recording));
        let json = serde_json::to_value(&list).expect("json");

        assert!(json.is_array());
        assert_eq!(json[0]["id"], 3);
    }

    #[rstest]
    fn list_xml_wraps_each_recording(recording: Recording) {
        let list = RecordingListDto::from(vec![recording.clone(), recording].as_slice());
        let xml = list.xml_body().expect("xml");

        assert!(xml.starts_with("<recordings><recording><id>3</id>"));
        assert_eq!(xml.matches("<recording>").count(), 2);
        assert!(xml.ends_with("</recording></recordings>"));
    }

    #[rstest]
    fn empty_list_xml_has_no_children() {
        let xml = RecordingListDto(Vec::new()).xml_body().expect("xml");

        assert!(xml.starts_with("<recordings"));
        assert!(!xml.contains("<recording>"));
    }
}
