//! Related-notes annotations
//!
//! Each source folder can point its notes at a fixed dashboard note or at the
//! daily note for the transcript's date. The choice is configuration, not
//! code:
//!
//! ```toml
//! [[folders]]
//! key = "dragon"
//! drive_folder_id = "1FsPM-xB7EH6Fc2CCu67EHDhYMotx0EYc"
//! local_path = "/vault/Dragon/Transcripts"
//! related = { kind = "static", text = "[[Dashboard. Dragon]]" }
//!
//! [[folders]]
//! key = "meetings"
//! drive_folder_id = "1EiScFFGiE6hdKBOZeSicnO_lxv2U3mcB"
//! local_path = "/vault/Meetings/Transcripts"
//! related = { kind = "daily_note" }
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default strftime format for daily-note links
pub const DEFAULT_DAILY_NOTE_FORMAT: &str = "[[No %Y-%m-%d %a]]";

/// Annotation strategy for the related-notes callout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelatedNotes {
    /// Always the same text
    Static { text: String },

    /// A link rendered from the transcript's date with a strftime format
    DailyNote {
        #[serde(default = "default_daily_note_format")]
        format: String,
    },
}

impl RelatedNotes {
    /// Render the annotation for a note dated `date`
    pub fn render(&self, date: NaiveDate) -> String {
        match self {
            RelatedNotes::Static { text } => text.clone(),
            RelatedNotes::DailyNote { format } => date.format(format).to_string(),
        }
    }

    /// Reject formats that chrono would fail to render
    pub fn validate(&self) -> Result<(), String> {
        match self {
            RelatedNotes::Static { text } if text.trim().is_empty() => {
                Err("related.text cannot be empty".to_string())
            }
            RelatedNotes::Static { .. } => Ok(()),
            RelatedNotes::DailyNote { format } => {
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("Invalid daily note format '{format}'"));
                }
                Ok(())
            }
        }
    }
}

impl Default for RelatedNotes {
    fn default() -> Self {
        RelatedNotes::Static {
            text: "[[S3. Establish and maintain user testing pipeline]]".to_string(),
        }
    }
}

fn default_daily_note_format() -> String {
    DEFAULT_DAILY_NOTE_FORMAT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 26).unwrap()
    }

    #[test]
    fn test_static_renders_text() {
        let related = RelatedNotes::Static {
            text: "[[Dashboard. Dragon]]".to_string(),
        };
        assert_eq!(related.render(date()), "[[Dashboard. Dragon]]");
    }

    #[test]
    fn test_daily_note_renders_date() {
        let related = RelatedNotes::DailyNote {
            format: DEFAULT_DAILY_NOTE_FORMAT.to_string(),
        };
        assert_eq!(related.render(date()), "[[No 2024-11-26 Tue]]");
    }

    #[test]
    fn test_deserialize_tagged_variants() {
        let fixed: RelatedNotes =
            toml::from_str("kind = \"static\"\ntext = \"[[Hub]]\"").unwrap();
        assert_eq!(
            fixed,
            RelatedNotes::Static {
                text: "[[Hub]]".to_string()
            }
        );

        let daily: RelatedNotes = toml::from_str("kind = \"daily_note\"").unwrap();
        assert_eq!(
            daily,
            RelatedNotes::DailyNote {
                format: DEFAULT_DAILY_NOTE_FORMAT.to_string()
            }
        );
    }

    #[test]
    fn test_validate() {
        assert!(RelatedNotes::default().validate().is_ok());
        assert!(RelatedNotes::Static {
            text: " ".to_string()
        }
        .validate()
        .is_err());
        assert!(RelatedNotes::DailyNote {
            format: "[[%Y-%Q]]".to_string()
        }
        .validate()
        .is_err());
    }
}
