//! Server-rendered HTML pages.
//!
//! Every page shares one layout whose navigation depends on whether the
//! caller is logged in. Links are absolute, built from the configured URL
//! base. Values that originate from users are escaped with [`escape`].

use super::dto::RecordingDto;

/// Values every page needs.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub is_logged_in: bool,
    pub url_base: &'a str,
}

impl PageContext<'_> {
    fn link(&self, path: &str) -> String {
        format!("{}{path}", self.url_base.trim_end_matches('/'))
    }
}

/// Error banner shown above a form.
#[derive(Debug, Clone, Copy)]
pub struct FormError<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

/// Escape text for use in element content and quoted attributes.
///
/// # Examples
/// ```
/// use speech_portal::inbound::http::pages::escape;
///
/// assert_eq!(escape("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
#[must_use]
pub fn escape(raw: &str) -> String {
    quick_xml::escape::escape(raw).into_owned()
}

fn layout(ctx: &PageContext<'_>, title: &str, body: &str) -> String {
    let nav = if ctx.is_logged_in {
        format!(
            r#"<a href="{home}">Recordings</a> <a href="{upload}">Upload</a> <a href="{logout}">Logout</a>"#,
            home = ctx.link("/"),
            upload = ctx.link("/recording/upload"),
            logout = ctx.link("/u/logout"),
        )
    } else {
        format!(
            r#"<a href="{home}">Home</a> <a href="{login}">Login</a> <a href="{register}">Register</a>"#,
            home = ctx.link("/"),
            login = ctx.link("/u/login"),
            register = ctx.link("/u/register"),
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: sans-serif; margin: 0; line-height: 1.5; }}
        nav {{ background: #2a2a2a; padding: 12px 20px; }}
        nav a {{ color: #fff; margin-right: 16px; text-decoration: none; }}
        main {{ padding: 20px; max-width: 960px; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border-bottom: 1px solid #ddd; padding: 6px 8px; text-align: left; }}
        .error {{ border: 1px solid #c33; background: #fee; padding: 8px 12px; }}
        form label {{ display: block; margin-top: 10px; }}
    </style>
</head>
<body>
<nav>{nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn error_banner(error: Option<&FormError<'_>>) -> String {
    error.map_or_else(String::new, |error| {
        format!(
            r#"<div class="error"><strong>{}</strong><p>{}</p></div>"#,
            escape(error.title),
            escape(error.message)
        )
    })
}

fn credentials_form(ctx: &PageContext<'_>, action: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">{submit}</button>
</form>"#,
        action = ctx.link(action),
    )
}

/// Recording table for the logged-in user.
#[must_use]
pub fn index(ctx: &PageContext<'_>, recordings: &[RecordingDto]) -> String {
    let body = if recordings.is_empty() {
        format!(
            r#"<p>No recordings yet. <a href="{}">Upload one</a>.</p>"#,
            ctx.link("/recording/upload")
        )
    } else {
        let mut rows = String::new();
        for recording in recordings {
            rows.push_str(&format!(
                r#"<tr><td><a href="{href}">{title}</a></td><td>{filename}</td><td>{language}</td><td>{created}</td></tr>"#,
                href = ctx.link(&format!("/recording/view/{}", recording.id)),
                title = escape(&recording.title),
                filename = escape(&recording.filename),
                language = escape(&recording.language),
                created = recording.created_at.format("%Y-%m-%d %H:%M"),
            ));
        }
        format!(
            "<table><thead><tr><th>Title</th><th>File</th><th>Language</th><th>Uploaded</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };
    layout(ctx, "Recordings", &body)
}

/// Login form, optionally with the reason the last attempt failed.
#[must_use]
pub fn login(ctx: &PageContext<'_>, error: Option<&FormError<'_>>) -> String {
    let body = format!(
        "{}{}",
        error_banner(error),
        credentials_form(ctx, "/u/login", "Login")
    );
    layout(ctx, "Login", &body)
}

#[must_use]
pub fn login_successful(ctx: &PageContext<'_>) -> String {
    let body = format!(
        r#"<p>You are logged in. <a href="{}">Go to your recordings</a>.</p>"#,
        ctx.link("/")
    );
    layout(ctx, "Successful Login", &body)
}

/// Registration form, optionally with the reason the last attempt failed.
#[must_use]
pub fn register(ctx: &PageContext<'_>, error: Option<&FormError<'_>>) -> String {
    let body = format!(
        "{}{}",
        error_banner(error),
        credentials_form(ctx, "/u/register", "Register")
    );
    layout(ctx, "Register", &body)
}

#[must_use]
pub fn register_successful(ctx: &PageContext<'_>) -> String {
    layout(
        ctx,
        "Registration Successful",
        "<p>Please check your mailbox and click the confirmation link to activate your account.</p>",
    )
}

#[must_use]
pub fn confirmation(ctx: &PageContext<'_>) -> String {
    let body = format!(
        r#"<p>Your email address is confirmed. You can now <a href="{}">log in</a>.</p>"#,
        ctx.link("/u/login")
    );
    layout(ctx, "Email Confirmed", &body)
}

#[must_use]
pub fn upload_form(ctx: &PageContext<'_>) -> String {
    let body = format!(
        r#"<form method="post" action="{action}" enctype="multipart/form-data">
<label>Title <input type="text" name="title"></label>
<label>Language <input type="text" name="language" placeholder="en"></label>
<label>Audio file <input type="file" name="content" accept="audio/*" required></label>
<button type="submit">Upload</button>
</form>"#,
        action = ctx.link("/recording/upload"),
    );
    layout(ctx, "Upload Recording", &body)
}

#[must_use]
pub fn submission_successful(ctx: &PageContext<'_>, recording: &RecordingDto) -> String {
    let body = format!(
        r#"<p>The recording <a href="{href}">{title}</a> was uploaded.</p>"#,
        href = ctx.link(&format!("/recording/view/{}", recording.id)),
        title = escape(&recording.title),
    );
    layout(ctx, "Submission Successful", &body)
}

/// Detail view of one recording.
#[must_use]
pub fn recording(ctx: &PageContext<'_>, recording: &RecordingDto) -> String {
    let body = format!(
        "<dl><dt>File</dt><dd>{filename}</dd><dt>Language</dt><dd>{language}</dd>\
         <dt>Stored as</dt><dd>{stored}</dd><dt>Uploaded</dt><dd>{created}</dd></dl>",
        filename = escape(&recording.filename),
        language = escape(&recording.language),
        stored = escape(&recording.stored_filename),
        created = recording.created_at.format("%Y-%m-%d %H:%M"),
    );
    layout(ctx, &recording.title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    use crate::domain::RecordingStatus;

    const ANON: PageContext<'static> = PageContext {
        is_logged_in: false,
        url_base: "https://asr.example.com/",
    };
    const MEMBER: PageContext<'static> = PageContext {
        is_logged_in: true,
        url_base: "https://asr.example.com",
    };

    fn dto(title: &str) -> RecordingDto {
        RecordingDto {
            id: 4,
            user_id: 1,
            title: title.to_owned(),
            filename: "speech.wav".to_owned(),
            stored_filename: "recording-4".to_owned(),
            language: "en".to_owned(),
            status: RecordingStatus::Uploaded,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(ANON, "https://asr.example.com/u/login", "/u/logout")]
    #[case(MEMBER, "https://asr.example.com/u/logout", "/u/login")]
    fn navigation_depends_on_login(
        #[case] ctx: PageContext<'static>,
        #[case] present: &str,
        #[case] absent: &str,
    ) {
        let page = upload_form(&ctx);

        assert!(page.contains(present));
        assert!(!page.contains(absent));
    }

    #[test]
    fn user_text_is_escaped() {
        let page = index(&MEMBER, &[dto("<script>alert(1)</script>")]);

        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn index_links_each_recording() {
        let page = index(&MEMBER, &[dto("Greeting")]);

        assert!(page.contains(r#"href="https://asr.example.com/recording/view/4""#));
    }

    #[test]
    fn login_shows_the_error_banner() {
        let page = login(
            &ANON,
            Some(&FormError {
                title: "Login Failed",
                message: "Invalid credentials provided",
            }),
        );

        assert!(page.contains("Login Failed"));
        assert!(page.contains("Invalid credentials provided"));
    }

    #[test]
    fn forms_post_to_absolute_urls() {
        assert!(register(&ANON, None).contains(r#"action="https://asr.example.com/u/register""#));
    }
}
