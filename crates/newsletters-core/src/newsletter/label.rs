//! Row labels and date strings for display.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::classify::{Context, NYT, NYT_EDITIONS};
use super::model::NewsletterRecord;
use super::text::{capitalize_words, find_ignore_case};

/// Two-line label of a list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowLabel {
    /// First line (headline).
    pub title: String,
    /// Second line.
    pub subtitle: String,
}

impl RowLabel {
    fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// Splits a New York Times subject into edition headline and remainder.
///
/// Keywords are tried in list order; the first one found anywhere in the
/// subject wins. Without a keyword the headline is the vendor name and the
/// subject is returned untouched.
#[must_use]
pub fn split_nyt_subject(subject: &str) -> RowLabel {
    for keyword in NYT_EDITIONS {
        if let Some(range) = find_ignore_case(subject, keyword) {
            let remainder = subject[range.end..]
                .trim_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
            return RowLabel::new(capitalize_words(keyword), remainder);
        }
    }
    RowLabel::new(NYT, subject)
}

/// Label of a record's row in the given context.
#[must_use]
pub fn row_label(record: &NewsletterRecord, context: Context) -> RowLabel {
    let vendor = record.vendor_name();
    if context == Context::Today && vendor == NYT {
        split_nyt_subject(&record.subject)
    } else {
        RowLabel::new(vendor, record.subject.as_str())
    }
}

/// Reader header date: `("Apr 3,", "2025")`.
#[must_use]
pub fn reader_date_parts<Tz: TimeZone>(date: &DateTime<Tz>) -> (String, String)
where
    Tz::Offset: Display,
{
    (
        date.format("%b %-d,").to_string(),
        date.format("%Y").to_string(),
    )
}

/// Medium-style date used by historical rows: `"Apr 3, 2025"`.
#[must_use]
pub fn medium_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%b %-d, %Y").to_string()
}
