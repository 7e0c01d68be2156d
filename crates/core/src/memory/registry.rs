//! # User Registry
//!
//! One profile per user id. Profiles are created on first contact and
//! never deleted; later updates shallow-merge over the stored fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Durable per-user state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    /// Set once when the profile is created
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub interaction_count: u64,
    /// Caller-supplied extension fields
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl UserProfile {
    /// Fresh profile with defaults derived from the id
    pub fn new(id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.to_string(),
            first_seen: now,
            last_seen: now,
            interaction_count: 0,
            attributes: Map::new(),
        }
    }

    fn merge(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.display_name {
            let name = name.trim();
            if !name.is_empty() {
                self.display_name = name.to_string();
            }
        }
        for (key, value) in patch.attributes {
            self.attributes.insert(key, value);
        }
    }
}

/// Partial profile update; absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ProfilePatch {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Profiles keyed by user id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry(BTreeMap<String, UserProfile>);

impl UserRegistry {
    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.0.get(user_id)
    }

    /// Create the profile if absent, merge `patch` over it, and mark it seen at `now`.
    ///
    /// `last_seen` never moves backwards, even if `now` is older than the stored value.
    pub fn upsert(
        &mut self,
        user_id: &str,
        patch: ProfilePatch,
        now: DateTime<Utc>,
    ) -> &mut UserProfile {
        let profile = self.0.entry(user_id.to_string()).or_insert_with(|| {
            tracing::debug!("Registering new user {}", user_id);
            UserProfile::new(user_id, now)
        });
        profile.merge(patch);
        if now > profile.last_seen {
            profile.last_seen = now;
        }
        profile
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_upsert_creates_with_defaults() {
        let mut registry = UserRegistry::default();
        let now = Utc::now();

        let profile = registry.upsert("u1", ProfilePatch::default(), now);
        assert_eq!(profile.display_name, "u1");
        assert_eq!(profile.first_seen, now);
        assert_eq!(profile.last_seen, now);
        assert_eq!(profile.interaction_count, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut registry = UserRegistry::default();
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(5);

        registry.upsert(
            "u1",
            ProfilePatch::display_name("Ayşe")
                .with_attribute("language", "tr")
                .with_attribute("theme", "dark"),
            t0,
        );
        registry.upsert(
            "u1",
            ProfilePatch::default().with_attribute("theme", "light"),
            t1,
        );

        let profile = registry.get("u1").unwrap();
        assert_eq!(profile.display_name, "Ayşe");
        assert_eq!(profile.attributes["language"], json!("tr"));
        assert_eq!(profile.attributes["theme"], json!("light"));
        assert_eq!(profile.first_seen, t0);
        assert_eq!(profile.last_seen, t1);
    }

    #[test]
    fn test_last_seen_never_moves_backwards() {
        let mut registry = UserRegistry::default();
        let t0 = Utc::now();

        registry.upsert("u1", ProfilePatch::default(), t0);
        registry.upsert("u1", ProfilePatch::default(), t0 - Duration::seconds(10));

        assert_eq!(registry.get("u1").unwrap().last_seen, t0);
    }

    #[test]
    fn test_blank_display_name_ignored() {
        let mut registry = UserRegistry::default();
        registry.upsert("u1", ProfilePatch::display_name("   "), Utc::now());
        assert_eq!(registry.get("u1").unwrap().display_name, "u1");
    }

    #[test]
    fn test_profile_json_shape() {
        let profile = UserProfile::new("u1", Utc::now());
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("displayName").is_some());
        assert!(value.get("firstSeen").is_some());
        assert!(value.get("interactionCount").is_some());
        assert!(value.get("attributes").is_none());
    }
}
