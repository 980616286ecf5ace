//! Plain-text rendering of views and the reader.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};
use newsletters_core::newsletter::{EMPTY_TODAY_MESSAGE, medium_date, reader_date_parts};
use newsletters_core::{Context, GroupedView, NewsletterRecord, ReaderBody, row_label};

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Terminal styling switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub ansi: bool,
}

impl Style {
    pub const PLAIN: Self = Self { ansi: false };

    fn wrap(self, code: &str, text: &str) -> String {
        if self.ansi {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Renders a grouped view. Read rows are dimmed.
pub fn render_view<Tz: TimeZone>(view: &GroupedView, tz: &Tz, style: Style) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if view.is_empty() {
        return match view.context {
            Context::Today => format!("{EMPTY_TODAY_MESSAGE}\n"),
            Context::Historical => "No newsletters yet.\n".to_string(),
        };
    }

    let mut out = String::new();
    for (idx, group) in view.groups.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let header = match group.unread_count() {
            0 => group.key.clone(),
            n => format!("{} ({n} unread)", group.key),
        };
        let _ = writeln!(out, "{}", style.wrap(BOLD, &header));

        for record in &group.items {
            let row = render_row(record, view.context, tz);
            let row = if record.is_read() {
                style.wrap(DIM, &format!("  {row}"))
            } else {
                format!("* {row}")
            };
            let _ = writeln!(out, "{row}");
        }
    }
    out
}

fn render_row<Tz: TimeZone>(record: &NewsletterRecord, context: Context, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let label = row_label(record, context);
    let id = record.id.as_ref().map_or("-", |id| id.as_str());
    match context {
        Context::Today => format!("{} | {}  [{id}]", label.title, label.subtitle),
        Context::Historical => format!(
            "{} | {} | {}  [{id}]",
            label.title,
            label.subtitle,
            medium_date(&record.newsletter_date.with_timezone(tz))
        ),
    }
}

/// Renders the reader: header, then the body as text.
pub fn render_reader(record: &NewsletterRecord, body: &ReaderBody, raw: bool, style: Style) -> String {
    let date = record.newsletter_date.with_timezone(&Local);
    let (day, year) = reader_date_parts(&date);

    let mut out = String::new();
    let _ = writeln!(out, "{}", style.wrap(BOLD, record.vendor_name()));
    let _ = writeln!(out, "{}", record.subject);
    let _ = writeln!(out, "{}", style.wrap(DIM, &format!("{day} {year}")));
    out.push('\n');

    let text = match body.as_loaded() {
        Some(html) if !raw => html_to_text(html),
        _ => body.display_text(),
    };
    out.push_str(text.trim_end());
    out.push('\n');
    out
}

/// Converts an HTML body to Markdown text; falls back to the input.
pub fn html_to_text(html: &str) -> String {
    match htmd::convert(html) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to convert body to text: {e}");
            html.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use newsletters_core::build_view;

    fn date(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        date(3, 20)
    }

    #[test]
    fn test_empty_today_message() {
        let view = build_view(&[], Context::Today, &now());
        assert_eq!(
            render_view(&view, &Utc, Style::PLAIN),
            "No newsletters received yet today!\n"
        );
    }

    #[test]
    fn test_today_nyt_row_is_split() {
        let records = vec![
            NewsletterRecord::new(
                "The New York Times <nytdirect@nytimes.com>",
                "The Morning: Rain is coming",
                date(3, 9),
            )
            .with_id("n1")
            .with_read(false),
        ];
        let view = build_view(&records, Context::Today, &now());
        let text = render_view(&view, &Utc, Style::PLAIN);

        assert!(text.starts_with("The New York Times (1 unread)\n"));
        assert!(text.contains("* The Morning | Rain is coming  [n1]"));
    }

    #[test]
    fn test_historical_row_has_medium_date() {
        let records = vec![
            NewsletterRecord::new("HEATED <e@heated.world>", "Heat wave", date(1, 9))
                .with_id("h1")
                .with_read(true),
        ];
        let view = build_view(&records, Context::Historical, &now());
        let text = render_view(&view, &Utc, Style::PLAIN);

        assert!(text.contains("  HEATED | Heat wave | Apr 1, 2025  [h1]"));
        assert!(text.starts_with("HEATED\n"));
    }

    #[test]
    fn test_read_rows_are_dimmed() {
        let records = vec![
            NewsletterRecord::new("HEATED <e@heated.world>", "Heat", date(3, 9)).with_read(true),
        ];
        let view = build_view(&records, Context::Today, &now());
        let text = render_view(&view, &Utc, Style { ansi: true });
        assert!(text.contains(DIM));
    }

    #[test]
    fn test_reader_converts_html() {
        let record = NewsletterRecord::new("Morning Brew <crew@morningbrew.com>", "Hi", date(3, 9));
        let body = ReaderBody::Loaded("<p>Hello <strong>there</strong></p>".to_string());

        let text = render_reader(&record, &body, false, Style::PLAIN);
        assert!(text.starts_with("Morning Brew\nHi\n"));
        assert!(text.contains("Hello **there**"));
        assert!(!text.contains("<p>"));

        let raw = render_reader(&record, &body, true, Style::PLAIN);
        assert!(raw.contains("<p>Hello"));
    }

    #[test]
    fn test_reader_placeholder_text() {
        let record = NewsletterRecord::new("A <a@a>", "s", date(3, 9));
        let text = render_reader(&record, &ReaderBody::NotFound, false, Style::PLAIN);
        assert!(text.ends_with("No content available.\n"));
    }
}
