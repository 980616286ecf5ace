//! Vendor/subject classification.
//!
//! Each display context owns an ordered rule table. The first rule whose
//! vendor matcher accepts the vendor name decides the group key; a vendor
//! no rule accepts becomes its own group.

use serde::{Deserialize, Serialize};

use super::model::vendor_name;
use super::text::first_keyword;

/// Vendor name of the New York Times.
pub const NYT: &str = "The New York Times";

/// Subject keywords naming a New York Times edition, in match order.
pub const NYT_EDITIONS: [&str; 4] = ["The Morning", "Breaking News", "The Evening", "Climate"];

/// Historical group for New York Times subjects without an edition keyword.
pub const NYT_OTHER: &str = "The New York Times: Other";

/// Which list is being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    /// Newsletters received on the current calendar day.
    #[default]
    Today,
    /// Everything received before today.
    Historical,
}

impl Context {
    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Historical => "Historical",
        }
    }
}

/// Result of classifying a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Vendor name derived from the sender.
    pub vendor_name: String,
    /// Group the record belongs to.
    pub group_key: String,
}

/// How a rule matches a vendor name.
#[derive(Debug, Clone, Copy)]
enum VendorMatch {
    /// Exact equality.
    Exact(&'static str),
    /// Exact equality with any entry.
    OneOf(&'static [&'static str]),
    /// Case-sensitive substring.
    Contains(&'static str),
}

impl VendorMatch {
    fn matches(self, vendor: &str) -> bool {
        match self {
            Self::Exact(name) => vendor == name,
            Self::OneOf(names) => names.contains(&vendor),
            Self::Contains(fragment) => vendor.contains(fragment),
        }
    }
}

/// Group key a matching rule produces.
#[derive(Debug, Clone, Copy)]
enum GroupKey {
    /// A fixed key.
    Fixed(&'static str),
    /// `The New York Times: <edition>`, picked from the subject.
    NytEdition,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    vendor: VendorMatch,
    key: GroupKey,
}

const fn rule(vendor: VendorMatch, key: GroupKey) -> Rule {
    Rule { vendor, key }
}

const TODAY_RULES: &[Rule] = &[
    rule(VendorMatch::Exact(NYT), GroupKey::Fixed(NYT)),
    rule(
        VendorMatch::OneOf(&["Morning Brew", "IT Brew", "Tech Brew"]),
        GroupKey::Fixed("Morning Brew"),
    ),
    rule(VendorMatch::Contains("Sigma Xi"), GroupKey::Fixed("Sigma Xi")),
    rule(VendorMatch::Contains("HEATED"), GroupKey::Fixed("HEATED")),
];

const HISTORICAL_RULES: &[Rule] = &[
    rule(VendorMatch::Exact(NYT), GroupKey::NytEdition),
    rule(VendorMatch::Contains("Morning Brew"), GroupKey::Fixed("Morning Brew")),
    rule(VendorMatch::Contains("Tech Brew"), GroupKey::Fixed("Tech Brew")),
    rule(VendorMatch::Contains("IT Brew"), GroupKey::Fixed("IT Brew")),
    rule(VendorMatch::Contains("Sigma Xi"), GroupKey::Fixed("Sigma Xi")),
    rule(VendorMatch::Contains("HEATED"), GroupKey::Fixed("HEATED")),
];

const fn rules(context: Context) -> &'static [Rule] {
    match context {
        Context::Today => TODAY_RULES,
        Context::Historical => HISTORICAL_RULES,
    }
}

/// Classifies a raw sender and subject for the given context.
#[must_use]
pub fn classify(sender: &str, subject: &str, context: Context) -> Classification {
    let vendor = vendor_name(sender);
    Classification {
        vendor_name: vendor.to_string(),
        group_key: group_key(vendor, subject, context),
    }
}

/// Group key for an already derived vendor name.
#[must_use]
pub fn group_key(vendor: &str, subject: &str, context: Context) -> String {
    let Some(rule) = rules(context).iter().find(|r| r.vendor.matches(vendor)) else {
        return vendor.to_string();
    };

    match rule.key {
        GroupKey::Fixed(key) => key.to_string(),
        GroupKey::NytEdition => first_keyword(subject, &NYT_EDITIONS).map_or_else(
            || NYT_OTHER.to_string(),
            |idx| format!("{NYT}: {}", NYT_EDITIONS[idx]),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today(sender: &str) -> String {
        classify(sender, "", Context::Today).group_key
    }

    fn historical(sender: &str, subject: &str) -> String {
        classify(sender, subject, Context::Historical).group_key
    }

    #[test]
    fn test_today_nyt() {
        assert_eq!(today("The New York Times <nytdirect@nytimes.com>"), NYT);
    }

    #[test]
    fn test_today_brew_family_requires_exact_match() {
        assert_eq!(today("Morning Brew <crew@morningbrew.com>"), "Morning Brew");
        assert_eq!(today("IT Brew <crew@itbrew.com>"), "Morning Brew");
        assert_eq!(today("Tech Brew <crew@techbrew.com>"), "Morning Brew");
        // Not in the exact list, so it is its own group.
        assert_eq!(
            today("Emerging Tech Brew <crew@morningbrew.com>"),
            "Emerging Tech Brew"
        );
    }

    #[test]
    fn test_today_substring_rules() {
        assert_eq!(today("American Scientist - Sigma Xi <news@sigmaxi.org>"), "Sigma Xi");
        assert_eq!(today("HEATED by Emily Atkin <heated@substack.com>"), "HEATED");
        // Substring checks are case-sensitive.
        assert_eq!(today("Heated <x@y.com>"), "Heated");
    }

    #[test]
    fn test_today_fallback_is_vendor_name() {
        assert_eq!(today("Unknown Co <hello@unknown.co>"), "Unknown Co");
        assert_eq!(today("plain@sender.com"), "plain@sender.com");
        assert_eq!(today(""), "");
    }

    #[test]
    fn test_historical_nyt_editions() {
        let sender = "The New York Times <nytdirect@nytimes.com>";
        assert_eq!(
            historical(sender, "Breaking News: Market Update"),
            "The New York Times: Breaking News"
        );
        assert_eq!(
            historical(sender, "the evening: what happened"),
            "The New York Times: The Evening"
        );
        assert_eq!(historical(sender, "Weekend Reading"), NYT_OTHER);
    }

    #[test]
    fn test_historical_nyt_multiple_keywords_uses_list_order() {
        let sender = "The New York Times <nytdirect@nytimes.com>";
        assert_eq!(
            historical(sender, "Climate news on The Morning"),
            "The New York Times: The Morning"
        );
    }

    #[test]
    fn test_historical_brew_split() {
        assert_eq!(historical("Morning Brew <a@b>", ""), "Morning Brew");
        assert_eq!(historical("Tech Brew <a@b>", ""), "Tech Brew");
        assert_eq!(historical("Emerging Tech Brew <a@b>", ""), "Tech Brew");
        assert_eq!(historical("IT Brew <a@b>", ""), "IT Brew");
    }

    #[test]
    fn test_historical_priority_order() {
        // Morning Brew is checked before Sigma Xi.
        assert_eq!(historical("Morning Brew x Sigma Xi <a@b>", ""), "Morning Brew");
        assert_eq!(historical("Sigma Xi HEATED <a@b>", ""), "Sigma Xi");
    }

    #[test]
    fn test_historical_fallback() {
        assert_eq!(historical("Stratechery <ben@stratechery.com>", "x"), "Stratechery");
    }

    #[test]
    fn test_classification_carries_vendor() {
        let c = classify("IT Brew <crew@itbrew.com>", "s", Context::Today);
        assert_eq!(c.vendor_name, "IT Brew");
        assert_eq!(c.group_key, "Morning Brew");
    }
}
