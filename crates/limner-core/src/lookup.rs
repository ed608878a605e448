use std::time::Duration;

use crate::normalize::normalize_name;
use crate::types::ArtistProfile;

/// Read access to the artist reference catalog.
///
/// Implementations match the exact name first (case and accent
/// insensitive), then fall back to the most popular profile whose name
/// contains the query.
#[async_trait::async_trait]
pub trait ArtistLookup: Send + Sync {
    async fn get_profile(&self, name: &str) -> anyhow::Result<Option<ArtistProfile>>;
}

/// Resolve a profile, treating every failure as "not found".
///
/// A guess must always produce a recorded attempt, so store errors and
/// timeouts are logged and swallowed here.
pub async fn resolve_profile(
    lookup: &dyn ArtistLookup,
    name: &str,
    timeout: Duration,
) -> Option<ArtistProfile> {
    match tokio::time::timeout(timeout, lookup.get_profile(name)).await {
        Ok(Ok(profile)) => {
            tracing::debug!(name, found = profile.is_some(), "artist profile lookup");
            profile
        }
        Ok(Err(e)) => {
            tracing::warn!(name, error = %e, "artist lookup failed, continuing without profile");
            None
        }
        Err(_) => {
            tracing::warn!(
                name,
                timeout_ms = timeout.as_millis() as u64,
                "artist lookup timed out, continuing without profile"
            );
            None
        }
    }
}

/// Exact-then-fuzzy selection over an in-memory list.
pub fn best_match<'a>(profiles: &'a [ArtistProfile], name: &str) -> Option<&'a ArtistProfile> {
    let query = normalize_name(name);
    if query.is_empty() {
        return None;
    }
    if let Some(exact) = profiles.iter().find(|p| normalize_name(&p.name) == query) {
        return Some(exact);
    }
    profiles
        .iter()
        .filter(|p| normalize_name(&p.name).contains(&query))
        .max_by(|a, b| {
            let sa = a.popularity_score.unwrap_or(f64::MIN);
            let sb = b.popularity_score.unwrap_or(f64::MIN);
            sa.total_cmp(&sb)
        })
}

/// In-memory catalog, used by the terminal client and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLookup {
    profiles: Vec<ArtistProfile>,
}

impl MemoryLookup {
    pub fn new(profiles: Vec<ArtistProfile>) -> Self {
        Self { profiles }
    }
}

#[async_trait::async_trait]
impl ArtistLookup for MemoryLookup {
    async fn get_profile(&self, name: &str) -> anyhow::Result<Option<ArtistProfile>> {
        Ok(best_match(&self.profiles, name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(name: &str, score: Option<f64>) -> ArtistProfile {
        ArtistProfile {
            name: name.into(),
            popularity_score: score,
            ..Default::default()
        }
    }

    struct FailingLookup;

    #[async_trait::async_trait]
    impl ArtistLookup for FailingLookup {
        async fn get_profile(&self, _name: &str) -> anyhow::Result<Option<ArtistProfile>> {
            anyhow::bail!("connection refused")
        }
    }

    struct SlowLookup;

    #[async_trait::async_trait]
    impl ArtistLookup for SlowLookup {
        async fn get_profile(&self, name: &str) -> anyhow::Result<Option<ArtistProfile>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Some(artist(name, None)))
        }
    }

    #[test]
    fn exact_match_beats_more_popular_substring() {
        let profiles = vec![
            artist("Pieter Bruegel the Elder", Some(80.0)),
            artist("Pieter Bruegel", Some(10.0)),
        ];
        let hit = best_match(&profiles, "pieter bruegel").unwrap();
        assert_eq!(hit.name, "Pieter Bruegel");
    }

    #[test]
    fn fuzzy_match_prefers_popularity() {
        let profiles = vec![
            artist("Hans Holbein the Elder", Some(30.0)),
            artist("Hans Holbein the Younger", Some(70.0)),
            artist("Hans Memling", None),
        ];
        let hit = best_match(&profiles, "Holbein").unwrap();
        assert_eq!(hit.name, "Hans Holbein the Younger");
    }

    #[test]
    fn accents_ignored_in_lookup() {
        let profiles = vec![artist("Albrecht Dürer", Some(60.0))];
        assert!(best_match(&profiles, "albrecht durer").is_some());
        assert!(best_match(&profiles, "").is_none());
        assert!(best_match(&profiles, "Titian").is_none());
    }

    #[tokio::test]
    async fn failing_lookup_resolves_to_none() {
        let got = resolve_profile(&FailingLookup, "Claude Monet", Duration::from_secs(1)).await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let got = resolve_profile(&SlowLookup, "Claude Monet", Duration::from_millis(20)).await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn memory_lookup_finds_profile() {
        let lookup = MemoryLookup::new(vec![artist("Claude Monet", Some(95.0))]);
        let got = resolve_profile(&lookup, "monet", Duration::from_secs(1)).await;
        assert_eq!(got.unwrap().name, "Claude Monet");
    }
}
