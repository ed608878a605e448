//! Comparative hints for an incorrect guess.
//!
//! Feedback compares the guessed artist's profile against the puzzle's
//! artwork year and the target artist's profile. Any side may be missing;
//! missing data turns into `missing`/`info` details, never an error.
//!
//! Detail order is fixed: Birth year, Death year, Era hint (when
//! computable), Movement, Country, Fame hint, then the reference-data notice
//! when no profile was found for the guess.

use crate::config::GameConfig;
use crate::normalize::same_text;
use crate::types::{ArtistProfile, FeedbackDetail, FeedbackLabel, FeedbackStatus};

pub const UNKNOWN_VALUE: &str = "Unknown";
pub const ERA_OLDER: &str = "Try an older artist";
pub const ERA_NEWER: &str = "Try a more recent artist";
pub const ERA_WITHIN: &str = "Within their lifetime";
pub const FAME_SIMILAR: &str = "Similar fame";
pub const FAME_TARGET_LESS: &str = "Target is less famous";
pub const FAME_TARGET_MORE: &str = "Try a more famous artist";
pub const NO_REFERENCE: &str = "No reference data for this artist yet";

/// Inputs to [`build_feedback`].
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    /// Numeric year of the puzzle artwork, if known.
    pub artwork_year: Option<i32>,
    pub target: Option<&'a ArtistProfile>,
    pub guessed: Option<&'a ArtistProfile>,
    /// Caps the estimated death year of artists with no recorded death.
    pub current_year: i32,
}

pub fn build_feedback(input: FeedbackInput<'_>, config: &GameConfig) -> Vec<FeedbackDetail> {
    let FeedbackInput {
        artwork_year,
        target,
        guessed,
        current_year,
    } = input;
    let birth = guessed.and_then(|g| g.birth_year);
    let death = guessed.and_then(|g| g.death_year);

    let mut details = Vec::with_capacity(7);
    details.push(birth_detail(artwork_year, birth, death));
    details.push(death_detail(artwork_year, birth, death));
    if let Some(era) = era_detail(
        artwork_year,
        birth,
        death,
        config.assumed_max_artist_age,
        current_year,
    ) {
        details.push(era);
    }
    details.push(text_detail(
        FeedbackLabel::Movement,
        guessed.and_then(|g| g.movement.as_deref()),
        target.and_then(|t| t.movement.as_deref()),
    ));
    details.push(text_detail(
        FeedbackLabel::Country,
        guessed.and_then(|g| g.country.as_deref()),
        target.and_then(|t| t.country.as_deref()),
    ));
    details.push(fame_detail(
        guessed.and_then(|g| g.popularity_score),
        target.and_then(|t| t.popularity_score),
        config.fame_similarity_threshold,
    ));
    if guessed.is_none() {
        details.push(FeedbackDetail::new(
            FeedbackLabel::ReferenceData,
            NO_REFERENCE,
            FeedbackStatus::Info,
        ));
    }
    details
}

fn within_lifetime(year: Option<i32>, birth: Option<i32>, death: Option<i32>) -> bool {
    matches!((year, birth, death), (Some(y), Some(b), Some(d)) if b <= y && y <= d)
}

fn birth_detail(year: Option<i32>, birth: Option<i32>, death: Option<i32>) -> FeedbackDetail {
    let Some(b) = birth else {
        return FeedbackDetail::new(FeedbackLabel::BirthYear, UNKNOWN_VALUE, FeedbackStatus::Missing);
    };
    let status = if within_lifetime(year, birth, death) {
        FeedbackStatus::Match
    } else {
        FeedbackStatus::Info
    };
    FeedbackDetail::new(FeedbackLabel::BirthYear, b.to_string(), status)
}

fn death_detail(year: Option<i32>, birth: Option<i32>, death: Option<i32>) -> FeedbackDetail {
    let Some(d) = death else {
        return FeedbackDetail::new(FeedbackLabel::DeathYear, UNKNOWN_VALUE, FeedbackStatus::Missing);
    };
    let status = match year {
        // Painted after the guessed artist died.
        Some(y) if y > d => FeedbackStatus::Earlier,
        _ if within_lifetime(year, birth, death) => FeedbackStatus::Match,
        _ => FeedbackStatus::Info,
    };
    FeedbackDetail::new(FeedbackLabel::DeathYear, d.to_string(), status)
}

fn era_detail(
    year: Option<i32>,
    birth: Option<i32>,
    death: Option<i32>,
    assumed_max_age: i32,
    current_year: i32,
) -> Option<FeedbackDetail> {
    let y = year?;
    if birth.is_none() && death.is_none() {
        return None;
    }
    if let Some(b) = birth {
        if y < b {
            return Some(FeedbackDetail::new(
                FeedbackLabel::EraHint,
                ERA_OLDER,
                FeedbackStatus::Earlier,
            ));
        }
    }
    let last_active =
        death.or_else(|| birth.map(|b| b.saturating_add(assumed_max_age).min(current_year)));
    if let Some(end) = last_active {
        if y > end {
            return Some(FeedbackDetail::new(
                FeedbackLabel::EraHint,
                ERA_NEWER,
                FeedbackStatus::Later,
            ));
        }
    }
    Some(FeedbackDetail::new(
        FeedbackLabel::EraHint,
        ERA_WITHIN,
        FeedbackStatus::Match,
    ))
}

fn text_detail(label: FeedbackLabel, guessed: Option<&str>, target: Option<&str>) -> FeedbackDetail {
    match (guessed, target) {
        (None, _) => FeedbackDetail::new(label, UNKNOWN_VALUE, FeedbackStatus::Missing),
        (Some(g), None) => FeedbackDetail::new(label, g, FeedbackStatus::Info),
        (Some(g), Some(t)) if same_text(g, t) => FeedbackDetail::new(label, g, FeedbackStatus::Match),
        (Some(g), Some(_)) => FeedbackDetail::new(label, g, FeedbackStatus::Different),
    }
}

fn fame_detail(guessed: Option<f64>, target: Option<f64>, threshold: f64) -> FeedbackDetail {
    let (Some(g), Some(t)) = (guessed, target) else {
        return FeedbackDetail::new(FeedbackLabel::FameHint, UNKNOWN_VALUE, FeedbackStatus::Missing);
    };
    let delta = g - t;
    if delta.abs() <= threshold {
        FeedbackDetail::new(FeedbackLabel::FameHint, FAME_SIMILAR, FeedbackStatus::Match)
    } else if delta > threshold {
        FeedbackDetail::new(FeedbackLabel::FameHint, FAME_TARGET_LESS, FeedbackStatus::Different)
    } else {
        FeedbackDetail::new(FeedbackLabel::FameHint, FAME_TARGET_MORE, FeedbackStatus::Different)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(birth: Option<i32>, death: Option<i32>) -> ArtistProfile {
        ArtistProfile {
            name: "Someone".into(),
            birth_year: birth,
            death_year: death,
            ..Default::default()
        }
    }

    fn run(
        year: Option<i32>,
        target: Option<&ArtistProfile>,
        guessed: Option<&ArtistProfile>,
    ) -> Vec<FeedbackDetail> {
        build_feedback(
            FeedbackInput {
                artwork_year: year,
                target,
                guessed,
                current_year: 2024,
            },
            &GameConfig::default(),
        )
    }

    fn find(details: &[FeedbackDetail], label: FeedbackLabel) -> Option<&FeedbackDetail> {
        details.iter().find(|d| d.label == label)
    }

    fn labels(details: &[FeedbackDetail]) -> Vec<FeedbackLabel> {
        details.iter().map(|d| d.label).collect()
    }

    #[test]
    fn no_profile_degrades_to_missing_plus_notice() {
        let details = run(Some(1889), None, None);
        assert_eq!(
            labels(&details),
            vec![
                FeedbackLabel::BirthYear,
                FeedbackLabel::DeathYear,
                FeedbackLabel::Movement,
                FeedbackLabel::Country,
                FeedbackLabel::FameHint,
                FeedbackLabel::ReferenceData,
            ]
        );
        for d in &details[..5] {
            assert_eq!(d.status, FeedbackStatus::Missing, "{:?}", d.label);
        }
        assert_eq!(details[5].status, FeedbackStatus::Info);
        assert_eq!(details[5].value, NO_REFERENCE);
    }

    #[test]
    fn era_hint_older_when_born_after_artwork() {
        let guessed = profile(Some(1600), None);
        let details = run(Some(1500), None, Some(&guessed));
        let era = find(&details, FeedbackLabel::EraHint).unwrap();
        assert_eq!(era.status, FeedbackStatus::Earlier);
        assert_eq!(era.value, ERA_OLDER);
    }

    #[test]
    fn era_hint_newer_when_dead_before_artwork() {
        let guessed = profile(Some(1400), Some(1450));
        let details = run(Some(1500), None, Some(&guessed));
        let era = find(&details, FeedbackLabel::EraHint).unwrap();
        assert_eq!(era.status, FeedbackStatus::Later);
        assert_eq!(era.value, ERA_NEWER);
        let death = find(&details, FeedbackLabel::DeathYear).unwrap();
        assert_eq!(death.status, FeedbackStatus::Earlier);
        assert_eq!(death.value, "1450");
    }

    #[test]
    fn era_hint_uses_assumed_lifespan() {
        let guessed = profile(Some(1400), None);
        // 1400 + 85 = 1485
        let within = run(Some(1485), None, Some(&guessed));
        assert_eq!(
            find(&within, FeedbackLabel::EraHint).unwrap().status,
            FeedbackStatus::Match
        );
        let after = run(Some(1486), None, Some(&guessed));
        assert_eq!(
            find(&after, FeedbackLabel::EraHint).unwrap().status,
            FeedbackStatus::Later
        );
    }

    #[test]
    fn assumed_lifespan_capped_at_current_year() {
        let guessed = profile(Some(1990), None);
        let details = run(Some(2024), None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::EraHint).unwrap().status,
            FeedbackStatus::Match
        );
    }

    #[test]
    fn extreme_years_do_not_overflow() {
        let guessed = profile(Some(i32::MAX - 10), None);
        // Lifespan estimate saturates, then the current-year cap applies.
        let details = run(Some(2_147_483_640), None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::EraHint).unwrap().status,
            FeedbackStatus::Later
        );

        let details = run(Some(1500), None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::EraHint).unwrap().status,
            FeedbackStatus::Earlier
        );
    }

    #[test]
    fn era_hint_skipped_without_numeric_year_or_dates() {
        let guessed = profile(Some(1600), Some(1660));
        assert!(find(&run(None, None, Some(&guessed)), FeedbackLabel::EraHint).is_none());
        let undated = profile(None, None);
        assert!(find(&run(Some(1500), None, Some(&undated)), FeedbackLabel::EraHint).is_none());
    }

    #[test]
    fn death_only_profile_is_handled() {
        let guessed = profile(None, Some(1500));
        let details = run(Some(1520), None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::BirthYear).unwrap().status,
            FeedbackStatus::Missing
        );
        assert_eq!(
            find(&details, FeedbackLabel::DeathYear).unwrap().status,
            FeedbackStatus::Earlier
        );
        assert_eq!(
            find(&details, FeedbackLabel::EraHint).unwrap().status,
            FeedbackStatus::Later
        );
    }

    #[test]
    fn lifetime_years_match() {
        let guessed = profile(Some(1853), Some(1890));
        let details = run(Some(1889), None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::BirthYear).unwrap().status,
            FeedbackStatus::Match
        );
        assert_eq!(
            find(&details, FeedbackLabel::DeathYear).unwrap().status,
            FeedbackStatus::Match
        );
        assert_eq!(
            find(&details, FeedbackLabel::EraHint).unwrap().value,
            ERA_WITHIN
        );
    }

    #[test]
    fn birth_only_is_info() {
        let guessed = profile(Some(1853), None);
        let details = run(Some(1889), None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::BirthYear).unwrap().status,
            FeedbackStatus::Info
        );
        assert_eq!(
            find(&details, FeedbackLabel::DeathYear).unwrap().status,
            FeedbackStatus::Missing
        );
    }

    #[test]
    fn movement_and_country_comparison() {
        let target = ArtistProfile {
            name: "Claude Monet".into(),
            movement: Some("Impressionism".into()),
            country: None,
            ..Default::default()
        };
        let guessed = ArtistProfile {
            name: "Édouard Manet".into(),
            movement: Some("impressionism".into()),
            country: Some("France".into()),
            ..Default::default()
        };
        let details = run(Some(1872), Some(&target), Some(&guessed));
        let movement = find(&details, FeedbackLabel::Movement).unwrap();
        assert_eq!(movement.status, FeedbackStatus::Match);
        let country = find(&details, FeedbackLabel::Country).unwrap();
        assert_eq!(country.status, FeedbackStatus::Info);
        assert_eq!(country.value, "France");

        let other = ArtistProfile {
            movement: Some("Baroque".into()),
            ..guessed.clone()
        };
        let details = run(Some(1872), Some(&target), Some(&other));
        assert_eq!(
            find(&details, FeedbackLabel::Movement).unwrap().status,
            FeedbackStatus::Different
        );
    }

    #[test]
    fn fame_hint_thresholds() {
        let target = ArtistProfile {
            popularity_score: Some(50.0),
            ..profile(None, None)
        };
        let cases = [
            (57.0, FeedbackStatus::Match, FAME_SIMILAR),
            (43.0, FeedbackStatus::Match, FAME_SIMILAR),
            (57.5, FeedbackStatus::Different, FAME_TARGET_LESS),
            (42.0, FeedbackStatus::Different, FAME_TARGET_MORE),
        ];
        for (score, status, value) in cases {
            let guessed = ArtistProfile {
                popularity_score: Some(score),
                ..profile(None, None)
            };
            let details = run(None, Some(&target), Some(&guessed));
            let fame = find(&details, FeedbackLabel::FameHint).unwrap();
            assert_eq!(fame.status, status, "score {score}");
            assert_eq!(fame.value, value, "score {score}");
        }
    }

    #[test]
    fn fame_missing_when_target_score_unknown() {
        let guessed = ArtistProfile {
            popularity_score: Some(90.0),
            ..profile(None, None)
        };
        let details = run(None, None, Some(&guessed));
        assert_eq!(
            find(&details, FeedbackLabel::FameHint).unwrap().status,
            FeedbackStatus::Missing
        );
        assert!(find(&details, FeedbackLabel::ReferenceData).is_none());
    }

    #[test]
    fn full_order_is_stable() {
        let guessed = ArtistProfile {
            name: "Rembrandt".into(),
            movement: Some("Baroque".into()),
            country: Some("Netherlands".into()),
            birth_year: Some(1606),
            death_year: Some(1669),
            popularity_score: Some(80.0),
        };
        let details = run(Some(1642), None, Some(&guessed));
        assert_eq!(
            labels(&details),
            vec![
                FeedbackLabel::BirthYear,
                FeedbackLabel::DeathYear,
                FeedbackLabel::EraHint,
                FeedbackLabel::Movement,
                FeedbackLabel::Country,
                FeedbackLabel::FameHint,
            ]
        );
    }
}
