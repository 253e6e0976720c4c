//! Server-rendered HTML. Every piece of user data goes through [`escape`].

pub mod admin;
pub mod pages;

use axum::response::Html;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

const DATETIME_FMT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

/// One-shot message shown above page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Success(t) => ("notice success", t),
            Notice::Error(t) => ("notice error", t),
        };
        format!(r#"<div class="{class}">{}</div>"#, escape(text))
    }
}

pub fn render_notice(notice: Option<&Notice>) -> String {
    notice.map(Notice::render).unwrap_or_default()
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

pub fn format_datetime(dt: Option<OffsetDateTime>) -> String {
    dt.and_then(|d| d.format(DATETIME_FMT).ok())
        .unwrap_or_else(|| "never".into())
}

pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("l'eau"), "l&#x27;eau");
        assert_eq!(escape("Straße"), "Straße");
    }

    #[test]
    fn notice_is_escaped() {
        let html = render_notice(Some(&Notice::Error("<b>bad</b>".into())));
        assert!(html.contains("notice error"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert_eq!(render_notice(None), "");
    }

    #[test]
    fn datetime_formatting() {
        assert_eq!(
            format_datetime(Some(datetime!(2024-03-05 14:07 UTC))),
            "2024-03-05 14:07 UTC"
        );
        assert_eq!(format_datetime(None), "never");
    }

    #[test]
    fn layout_escapes_title() {
        let Html(page) = layout("A & B", "<p>hi</p>");
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("<p>hi</p>"));
    }
}
