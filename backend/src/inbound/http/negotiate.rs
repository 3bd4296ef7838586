//! Representation negotiation from the `Accept` header.
//!
//! Only the first listed media type is considered. JSON and XML replies
//! carry the payload alone; every other value gets the full HTML page.

use std::future::{Ready, ready};

use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use serde::Serialize;

use crate::domain::Error;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Negotiated response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Json,
    Xml,
    Html,
}

impl Representation {
    /// Pick the representation for an `Accept` header value.
    ///
    /// # Examples
    /// ```
    /// use speech_portal::inbound::http::negotiate::Representation;
    ///
    /// assert_eq!(Representation::from_accept(Some("application/json")), Representation::Json);
    /// assert_eq!(Representation::from_accept(Some("text/html, application/json")), Representation::Html);
    /// assert_eq!(Representation::from_accept(None), Representation::Html);
    /// ```
    #[must_use]
    pub fn from_accept(accept: Option<&str>) -> Self {
        let first = accept
            .and_then(|value| value.split(',').next())
            .and_then(|media| media.split(';').next())
            .map(|media| media.trim().to_ascii_lowercase());

        match first.as_deref() {
            Some("application/json") => Self::Json,
            Some("application/xml" | "text/xml") => Self::Xml,
            _ => Self::Html,
        }
    }

    /// Reply with `payload`, or with the page produced by `html`.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the payload cannot be encoded.
    pub fn respond<P, F>(self, status: StatusCode, payload: &P, html: F) -> Result<HttpResponse, Error>
    where
        P: Representable + ?Sized,
        F: FnOnce() -> String,
    {
        match self {
            Self::Json => Ok(HttpResponse::build(status).json(payload)),
            Self::Xml => Ok(HttpResponse::build(status)
                .content_type(XML_CONTENT_TYPE)
                .body(payload.xml_body()?)),
            Self::Html => Ok(html_response(status, html())),
        }
    }

    /// Reply for pages that carry no payload.
    ///
    /// JSON and XML callers get `204 No Content` when `status` is `200`.
    pub fn respond_page<F>(self, status: StatusCode, html: F) -> HttpResponse
    where
        F: FnOnce() -> String,
    {
        match self {
            Self::Html => html_response(status, html()),
            Self::Json | Self::Xml if status == StatusCode::OK => HttpResponse::NoContent().finish(),
            Self::Json | Self::Xml => HttpResponse::build(status).finish(),
        }
    }
}

impl FromRequest for Representation {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let accept = req
            .headers()
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok());
        ready(Ok(Self::from_accept(accept)))
    }
}

pub(crate) fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(HTML_CONTENT_TYPE)
        .body(body)
}

/// Payload that can be rendered as JSON or as an XML document.
pub trait Representable: Serialize {
    /// Name of the XML root element.
    const XML_ROOT: &'static str;

    /// Encode the payload as an XML document.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the value has no XML encoding.
    fn xml_body(&self) -> Result<String, Error> {
        encode_xml(Self::XML_ROOT, self)
    }
}

pub(crate) fn encode_xml<T: Serialize + ?Sized>(root: &str, value: &T) -> Result<String, Error> {
    quick_xml::se::to_string_with_root(root, value)
        .map_err(|err| Error::internal(format!("failed to encode XML payload: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[derive(Serialize)]
    struct Greeting {
        text: &'static str,
    }

    impl Representable for Greeting {
        const XML_ROOT: &'static str = "greeting";
    }

    #[rstest]
    #[case(Some("application/json"), Representation::Json)]
    #[case(Some("Application/JSON; charset=utf-8"), Representation::Json)]
    #[case(Some("application/xml"), Representation::Xml)]
    #[case(Some("text/xml, application/json"), Representation::Xml)]
    #[case(Some("text/html,application/xhtml+xml,application/xml;q=0.9"), Representation::Html)]
    #[case(Some("*/*"), Representation::Html)]
    #[case(Some(""), Representation::Html)]
    #[case(None, Representation::Html)]
    fn first_media_type_decides(
        #[case] accept: Option<&str>,
        #[case] expected: Representation,
    ) {
        assert_eq!(Representation::from_accept(accept), expected);
    }

    async fn body_text(response: HttpResponse) -> String {
        let bytes = to_bytes(response.into_body()).await.expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[actix_web::test]
    async fn json_carries_the_payload_only() {
        let response = Representation::Json
            .respond(StatusCode::OK, &Greeting { text: "hi" }, || "<html/>".to_owned())
            .expect("json response");

        assert_eq!(body_text(response).await, r#"{"text":"hi"}"#);
    }

    #[actix_web::test]
    async fn xml_uses_the_declared_root() {
        let response = Representation::Xml
            .respond(StatusCode::CREATED, &Greeting { text: "hi" }, || "<html/>".to_owned())
            .expect("xml response");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some(XML_CONTENT_TYPE)
        );
        assert_eq!(
            body_text(response).await,
            "<greeting><text>hi</text></greeting>"
        );
    }

    #[actix_web::test]
    async fn html_renders_the_page() {
        let response = Representation::Html
            .respond(StatusCode::OK, &Greeting { text: "hi" }, || "<p>page</p>".to_owned())
            .expect("html response");

        assert_eq!(body_text(response).await, "<p>page</p>");
    }

    #[rstest]
    #[case(Representation::Json, StatusCode::OK, StatusCode::NO_CONTENT)]
    #[case(Representation::Xml, StatusCode::BAD_REQUEST, StatusCode::BAD_REQUEST)]
    #[case(Representation::Html, StatusCode::OK, StatusCode::OK)]
    fn payloadless_pages(
        #[case] representation: Representation,
        #[case] status: StatusCode,
        #[case] expected: StatusCode,
    ) {
        let response = representation.respond_page(status, || "<p/>".to_owned());

        assert_eq!(response.status(), expected);
    }
}
