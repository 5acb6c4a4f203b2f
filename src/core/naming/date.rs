//! Date extraction from free-form transcript filenames
//!
//! Meeting tools name their transcripts in a handful of inconsistent styles.
//! [`DateExtractor`] tries a fixed, ordered chain of strategies and stops at
//! the first one that yields a valid date:
//!
//! 1. **Delimited segment**: `"Weekly Sync - 2024/11/26 12:58 PST - Transcript"`
//! 2. **Parenthesized ISO**: `"Call (2024-07-11 15:23 GMT-7) Transcript"`
//! 3. **Loose slash**: `"Standup –2024/11/07"` (dash, optional spaces, slash date)
//! 4. **Labeled**: a configured marker followed directly by a slash date
//!
//! When nothing matches, the current local date is used and a warning is
//! logged. The order is a fixed priority, not a best-match search.
//!
//! # Example
//!
//! ```
//! use transcript_syncer::core::naming::{DateExtractor, DateStrategy};
//! use chrono::NaiveDate;
//!
//! let extractor = DateExtractor::default();
//! let extracted = extractor.extract_detailed("Weekly Sync - 2024/11/26 12:58 PST - notes");
//!
//! assert_eq!(extracted.date, NaiveDate::from_ymd_opt(2024, 11, 26).unwrap());
//! assert_eq!(extracted.strategy, DateStrategy::DelimitedSegment);
//! ```

use chrono::{Local, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Marker used by the labeled strategy unless configured otherwise
pub const DEFAULT_LABELED_MARKER: &str = "Dragon & Matt - ";

const SLASH_FORMAT: &str = "%Y/%m/%d";
const ISO_FORMAT: &str = "%Y-%m-%d";

fn parenthesized_iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((\d{4}-\d{2}-\d{2})").expect("valid regex"))
}

fn loose_slash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-–]\s*(\d{4}/\d{2}/\d{2})").expect("valid regex"))
}

/// Which strategy produced an extracted date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    DelimitedSegment,
    ParenthesizedIso,
    LooseSlash,
    Labeled,
    /// No strategy matched; the date is the local date at extraction time
    Fallback,
}

impl fmt::Display for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateStrategy::DelimitedSegment => "delimited_segment",
            DateStrategy::ParenthesizedIso => "parenthesized_iso",
            DateStrategy::LooseSlash => "loose_slash",
            DateStrategy::Labeled => "labeled",
            DateStrategy::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// A date together with the strategy that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedDate {
    pub date: NaiveDate,
    pub strategy: DateStrategy,
}

impl ExtractedDate {
    /// True when no strategy matched and the date is "today"
    pub fn is_fallback(&self) -> bool {
        self.strategy == DateStrategy::Fallback
    }
}

/// Ordered-chain date extractor
#[derive(Debug, Clone)]
pub struct DateExtractor {
    labeled_marker: String,
    /// Marker followed directly by a slash date; `None` for an empty marker
    labeled_re: Option<Regex>,
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LABELED_MARKER)
    }
}

impl DateExtractor {
    /// Create an extractor whose labeled strategy looks for `labeled_marker`
    pub fn new(labeled_marker: impl Into<String>) -> Self {
        let labeled_marker = labeled_marker.into();
        let labeled_re = (!labeled_marker.is_empty())
            .then(|| labeled_pattern(&labeled_marker.replace('–', "-")))
            .and_then(|pattern| Regex::new(&pattern).ok());
        Self {
            labeled_marker,
            labeled_re,
        }
    }

    /// The marker used by the labeled strategy
    pub fn labeled_marker(&self) -> &str {
        &self.labeled_marker
    }

    /// Extract a calendar date from `filename`. Never fails.
    pub fn extract(&self, filename: &str) -> NaiveDate {
        self.extract_detailed(filename).date
    }

    /// Extract a date and report which strategy matched
    pub fn extract_detailed(&self, filename: &str) -> ExtractedDate {
        let normalized = filename.replace('–', "-");
        tracing::debug!(normalized = %normalized, "Normalized filename");

        let strategies: [(DateStrategy, fn(&Self, &str) -> Option<NaiveDate>); 4] = [
            (DateStrategy::DelimitedSegment, Self::delimited_segment),
            (DateStrategy::ParenthesizedIso, Self::parenthesized_iso),
            (DateStrategy::LooseSlash, Self::loose_slash),
            (DateStrategy::Labeled, Self::labeled),
        ];

        for (strategy, attempt) in strategies {
            match attempt(self, &normalized) {
                Some(date) => {
                    tracing::debug!(%strategy, %date, "Extracted date from filename");
                    return ExtractedDate { date, strategy };
                }
                None => tracing::debug!(%strategy, "Date strategy did not match"),
            }
        }

        tracing::warn!(
            filename = %filename,
            "Could not parse date from filename, falling back to today"
        );
        ExtractedDate {
            date: Local::now().date_naive(),
            strategy: DateStrategy::Fallback,
        }
    }

    fn delimited_segment(&self, name: &str) -> Option<NaiveDate> {
        let segment = name.split(" - ").nth(1)?;
        let token = segment.split(' ').next()?;
        NaiveDate::parse_from_str(token, SLASH_FORMAT).ok()
    }

    fn parenthesized_iso(&self, name: &str) -> Option<NaiveDate> {
        let caps = parenthesized_iso_re().captures(name)?;
        NaiveDate::parse_from_str(&caps[1], ISO_FORMAT).ok()
    }

    fn loose_slash(&self, name: &str) -> Option<NaiveDate> {
        let caps = loose_slash_re().captures(name)?;
        NaiveDate::parse_from_str(&caps[1], SLASH_FORMAT).ok()
    }

    fn labeled(&self, name: &str) -> Option<NaiveDate> {
        let caps = self.labeled_re.as_ref()?.captures(name)?;
        NaiveDate::parse_from_str(&caps[1], SLASH_FORMAT).ok()
    }
}

fn labeled_pattern(marker: &str) -> String {
    format!(r"{}(\d{{4}}/\d{{2}}/\d{{2}})", regex::escape(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case("Weekly Sync - 2024/11/26 12:58 PST - notes", ymd(2024, 11, 26), DateStrategy::DelimitedSegment ; "delimited segment")]
    #[test_case("Weekly Sync – 2024/11/26 12:58 PST – Transcript", ymd(2024, 11, 26), DateStrategy::DelimitedSegment ; "en dash delimited segment")]
    #[test_case("Call (2024-07-11 15:23 GMT-7) notes", ymd(2024, 7, 11), DateStrategy::ParenthesizedIso ; "parenthesized iso")]
    #[test_case("Standup -2024/11/07 Transcript", ymd(2024, 11, 7), DateStrategy::LooseSlash ; "loose slash without space")]
    #[test_case("Standup–2024/11/07", ymd(2024, 11, 7), DateStrategy::LooseSlash ; "loose slash after en dash")]
    fn test_extract_known_formats(name: &str, expected: NaiveDate, strategy: DateStrategy) {
        let extracted = DateExtractor::default().extract_detailed(name);
        assert_eq!(extracted.date, expected);
        assert_eq!(extracted.strategy, strategy);
    }

    #[test]
    fn test_delimited_segment_wins_over_parenthesized_iso() {
        let name = "Sync - 2024/01/02 (2023-05-06 10:00) Transcript";
        let extracted = DateExtractor::default().extract_detailed(name);
        assert_eq!(extracted.date, ymd(2024, 1, 2));
        assert_eq!(extracted.strategy, DateStrategy::DelimitedSegment);
    }

    #[test]
    fn test_malformed_delimited_segment_falls_through() {
        // Second segment exists but is not a date; the parenthesized form applies.
        let name = "Sync - Notes (2024-03-04 09:00)";
        let extracted = DateExtractor::default().extract_detailed(name);
        assert_eq!(extracted.date, ymd(2024, 3, 4));
        assert_eq!(extracted.strategy, DateStrategy::ParenthesizedIso);
    }

    #[test]
    fn test_impossible_date_is_not_a_match() {
        let name = "Sync - 2024/13/45 - Transcript";
        let extracted = DateExtractor::default().extract_detailed(name);
        assert!(extracted.is_fallback());
    }

    #[test]
    fn test_labeled_strategy_with_custom_marker() {
        let extractor = DateExtractor::new("Review:");
        let extracted = extractor.extract_detailed("Review:2023/10/31 Transcript");
        assert_eq!(extracted.date, ymd(2023, 10, 31));
        assert_eq!(extracted.strategy, DateStrategy::Labeled);
    }

    #[test]
    fn test_labeled_strategy_skips_marker_without_date() {
        let extractor = DateExtractor::new("Review:");
        let extracted = extractor.extract_detailed("Review:draft Review:2023/10/31");
        assert_eq!(extracted.date, ymd(2023, 10, 31));
    }

    #[test_case("aa", "aaa2023/10/31" ; "marker overlaps itself")]
    #[test_case("x.y ", "x.y x.y 2023/10/31" ; "repeated marker")]
    #[test_case("(a+b)", "notes (a+b)2023/10/31" ; "regex metacharacters")]
    fn test_labeled_marker_matches_anywhere(marker: &str, name: &str) {
        let extracted = DateExtractor::new(marker).extract_detailed(name);
        assert_eq!(extracted.date, ymd(2023, 10, 31));
        assert_eq!(extracted.strategy, DateStrategy::Labeled);
    }

    #[test]
    fn test_empty_marker_disables_labeled_strategy() {
        let extracted = DateExtractor::new("").extract_detailed("2023/10/31 Transcript");
        assert!(extracted.is_fallback());
    }

    #[test]
    fn test_default_marker_is_shadowed_by_loose_slash() {
        let extracted = DateExtractor::default().extract_detailed("Dragon & Matt -2023/10/31");
        assert_eq!(extracted.date, ymd(2023, 10, 31));
        assert_eq!(extracted.strategy, DateStrategy::LooseSlash);
    }

    #[test_case("" ; "empty string")]
    #[test_case("Transcript" ; "no digits")]
    #[test_case("Meeting 2024.11.26" ; "unsupported separator")]
    #[test_case(" - " ; "bare delimiter")]
    #[test_case("a - b - c - d" ; "many segments no date")]
    #[test_case("(2024-02-30" ; "invalid iso day")]
    #[test_case("日本語 – テキスト" ; "non ascii")]
    fn test_unrecognized_falls_back_to_today(name: &str) {
        let before = Local::now().date_naive();
        let extracted = DateExtractor::default().extract_detailed(name);
        let after = Local::now().date_naive();

        assert!(extracted.is_fallback());
        assert!(extracted.date == before || extracted.date == after);
    }

    #[test]
    fn test_extract_returns_plain_date() {
        let date = DateExtractor::default().extract("Call (2024-07-11 15:23 GMT-7) notes");
        assert_eq!(date, ymd(2024, 7, 11));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(DateStrategy::DelimitedSegment.to_string(), "delimited_segment");
        assert_eq!(DateStrategy::Fallback.to_string(), "fallback");
    }
}
