use serde::{Deserialize, Serialize};

/// What the reference catalog knows about one artist.
///
/// Every field except `name` may be absent; enrichment is best-effort and a
/// profile with a death year but no birth year is perfectly valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    /// 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity_score: Option<f64>,
}

impl ArtistProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One daily puzzle, keyed by ISO day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PuzzleRecord {
    pub date: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub museum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_summary_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_artist_summary_url: Option<String>,
}

impl PuzzleRecord {
    /// Numeric artwork year, if the free-form `year` field carries one.
    pub fn artwork_year(&self) -> Option<i32> {
        self.year.as_deref().and_then(crate::date::parse_artwork_year)
    }

    /// Image to show players: the local cache when present, else the source.
    pub fn display_image(&self) -> Option<&str> {
        self.cached_image_url
            .as_deref()
            .or(self.image_url.as_deref())
    }
}

/// Fixed vocabulary of feedback labels, in display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeedbackLabel {
    #[serde(rename = "Birth year")]
    BirthYear,
    #[serde(rename = "Death year")]
    DeathYear,
    #[serde(rename = "Era hint")]
    EraHint,
    #[serde(rename = "Movement")]
    Movement,
    #[serde(rename = "Country")]
    Country,
    #[serde(rename = "Fame hint")]
    FameHint,
    #[serde(rename = "Reference data")]
    ReferenceData,
}

impl FeedbackLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BirthYear => "Birth year",
            Self::DeathYear => "Death year",
            Self::EraHint => "Era hint",
            Self::Movement => "Movement",
            Self::Country => "Country",
            Self::FameHint => "Fame hint",
            Self::ReferenceData => "Reference data",
        }
    }
}

impl std::fmt::Display for FeedbackLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Match,
    Earlier,
    Later,
    Different,
    Info,
    Missing,
}

impl FeedbackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Earlier => "earlier",
            Self::Later => "later",
            Self::Different => "different",
            Self::Info => "info",
            Self::Missing => "missing",
        }
    }
}

/// One comparative clue shown after an incorrect guess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackDetail {
    pub label: FeedbackLabel,
    pub value: String,
    pub status: FeedbackStatus,
}

impl FeedbackDetail {
    pub fn new(label: FeedbackLabel, value: impl Into<String>, status: FeedbackStatus) -> Self {
        Self {
            label,
            value: value.into(),
            status,
        }
    }
}

/// One submitted guess and what it earned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuessAttempt {
    pub guess: String,
    pub correct: bool,
    #[serde(default)]
    pub feedback: Vec<FeedbackDetail>,
}

/// The answer, disclosed only once a puzzle is finished.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleReveal {
    pub date: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub museum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_summary_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_artist_summary_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_profile: Option<ArtistProfile>,
}

impl PuzzleReveal {
    pub fn from_record(record: &PuzzleRecord, artist_profile: Option<ArtistProfile>) -> Self {
        Self {
            date: record.date.clone(),
            title: record.title.clone(),
            artist: record.artist.clone(),
            year: record.year.clone(),
            museum: record.museum.clone(),
            image_url: record.display_image().map(str::to_string),
            wiki_summary_url: record.wiki_summary_url.clone(),
            wiki_artist_summary_url: record.wiki_artist_summary_url.clone(),
            artist_profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_detail_serializes_with_display_label() {
        let detail = FeedbackDetail::new(FeedbackLabel::BirthYear, "1840", FeedbackStatus::Info);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["label"], "Birth year");
        assert_eq!(json["status"], "info");
        assert_eq!(json["value"], "1840");
    }

    #[test]
    fn profile_tolerates_missing_fields() {
        let p: ArtistProfile =
            serde_json::from_str(r#"{"name":"Anonymous","deathYear":1500}"#).unwrap();
        assert_eq!(p.birth_year, None);
        assert_eq!(p.death_year, Some(1500));
    }

    #[test]
    fn display_image_prefers_cache() {
        let mut record = PuzzleRecord {
            date: "2024-06-15".into(),
            title: "Water Lilies".into(),
            artist: "Claude Monet".into(),
            year: Some("c. 1906".into()),
            museum: None,
            image_url: Some("https://example.org/a.jpg".into()),
            cached_image_url: Some("/cache/a.webp".into()),
            wiki_summary_url: None,
            wiki_artist_summary_url: None,
        };
        assert_eq!(record.display_image(), Some("/cache/a.webp"));
        assert_eq!(record.artwork_year(), Some(1906));
        record.cached_image_url = None;
        assert_eq!(record.display_image(), Some("https://example.org/a.jpg"));
    }

    #[test]
    fn reveal_uses_camel_case() {
        let record = PuzzleRecord {
            date: "2024-06-15".into(),
            title: "Water Lilies".into(),
            artist: "Claude Monet".into(),
            year: None,
            museum: Some("MoMA".into()),
            image_url: None,
            cached_image_url: None,
            wiki_summary_url: Some("https://en.wikipedia.org/wiki/Water_Lilies".into()),
            wiki_artist_summary_url: None,
        };
        let json = serde_json::to_value(PuzzleReveal::from_record(&record, None)).unwrap();
        assert_eq!(json["artist"], "Claude Monet");
        assert!(json.get("wikiSummaryUrl").is_some());
        assert!(json.get("artistProfile").is_none());

        let profile = ArtistProfile {
            birth_year: Some(1840),
            popularity_score: Some(90.0),
            ..ArtistProfile::named("Claude Monet")
        };
        let json = serde_json::to_value(PuzzleReveal::from_record(&record, Some(profile))).unwrap();
        let nested = &json["artistProfile"];
        assert_eq!(nested["birthYear"], 1840);
        assert_eq!(nested["popularityScore"], 90.0);
        assert!(nested.get("birth_year").is_none());
    }
}
