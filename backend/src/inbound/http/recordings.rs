//! Recording handlers.
//!
//! ```text
//! GET      /                              own recordings, or the login form
//! GET|POST /recording/upload              multipart: title, language, content
//! GET      /recording/view/{recording_id}
//! ```

use std::str::FromStr;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};

use super::ApiResult;
use super::context::{AuthenticatedUser, RequestContext};
use super::dto::{RecordingDto, RecordingListDto};
use super::negotiate::Representation;
use super::pages;
use super::state::HttpState;
use crate::domain::ports::UploadRecording;
use crate::domain::{Error, RecordingId};

/// Multipart body of `POST /recording/upload`.
#[derive(MultipartForm)]
pub struct UploadForm {
    pub title: Option<Text<String>>,
    pub language: Option<Text<String>>,
    pub content: TempFile,
}

impl UploadForm {
    fn to_upload(&self) -> UploadRecording {
        UploadRecording {
            title: self
                .title
                .as_ref()
                .map(|text| text.0.clone())
                .unwrap_or_default(),
            original_filename: self.content.file_name.clone().unwrap_or_default(),
            language: self
                .language
                .as_ref()
                .map(|text| text.0.clone())
                .unwrap_or_default(),
            source_path: self.content.file.path().to_path_buf(),
        }
    }
}

/// Home page: the caller's uploaded recordings, or the login form.
#[get("/")]
pub async fn index(
    context: RequestContext,
    representation: Representation,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let Some(user_id) = context.user_id else {
        return Ok(representation
            .respond_page(StatusCode::OK, || pages::login(&state.page(false), None)));
    };

    let recordings = state.recordings.list_by_owner(user_id).await?;
    let listing = RecordingListDto::from(recordings.as_slice());
    representation.respond(StatusCode::OK, &listing, || {
        pages::index(&state.page(true), &listing.0)
    })
}

/// Show the upload form.
#[get("/upload")]
pub async fn upload_page(
    _: AuthenticatedUser,
    representation: Representation,
    state: web::Data<HttpState>,
) -> HttpResponse {
    representation.respond_page(StatusCode::OK, || pages::upload_form(&state.page(true)))
}

/// Store an uploaded recording for the caller.
///
/// The spooled temporary file is removed when the form is dropped, after the
/// file store has copied it.
#[post("/upload")]
pub async fn upload(
    AuthenticatedUser(user_id): AuthenticatedUser,
    representation: Representation,
    state: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> ApiResult<HttpResponse> {
    let recording = state.recordings.upload(user_id, form.to_upload()).await?;
    let dto = RecordingDto::from(&recording);
    representation.respond(StatusCode::OK, &dto, || {
        pages::submission_successful(&state.page(true), &dto)
    })
}

/// Show one of the caller's recordings.
///
/// Identifiers that are not positive integers are reported as missing;
/// recordings owned by someone else are refused.
#[get("/view/{recording_id}")]
pub async fn view(
    AuthenticatedUser(user_id): AuthenticatedUser,
    representation: Representation,
    state: web::Data<HttpState>,
    recording_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = RecordingId::from_str(&recording_id)
        .map_err(|_| Error::not_found(format!("recording {recording_id} not found")))?;
    let recording = state.recordings.get_by_id(id).await?;

    if recording.owner() != user_id {
        return Err(Error::unauthorized("recording belongs to another user"));
    }
    if !recording.is_visible_to(user_id) {
        return Err(Error::not_found(format!("recording {id} not found")));
    }

    let dto = RecordingDto::from(&recording);
    representation.respond(StatusCode::OK, &dto, || {
        pages::recording(&state.page(true), &dto)
    })
}

#[cfg(test)]
#[path = "recordings_tests.rs"]
mod tests;
