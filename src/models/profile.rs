use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::plan::TravelStyle;

const DEFAULT_DISPLAY_NAME: &str = "Traveler";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub full_name: String,
    pub favorite_style: Option<TravelStyle>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub favorite_style: Option<TravelStyle>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn into_profile(self, user_id: &str, updated_at: DateTime<Utc>) -> Profile {
        Profile {
            user_id: user_id.to_string(),
            full_name: self.full_name.trim().to_string(),
            favorite_style: self.favorite_style,
            avatar_url: self.avatar_url.filter(|url| !url.trim().is_empty()),
            updated_at,
        }
    }
}

/// Name shown in the dashboard greeting: the profile name, else the
/// capitalized local part of the email, else a generic label.
pub fn display_name(profile: Option<&Profile>, email: &str) -> String {
    if let Some(name) = profile.map(|p| p.full_name.trim()).filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let local = email.split('@').next().unwrap_or_default().trim();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_DISPLAY_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(full_name: &str) -> Profile {
        ProfileUpdate {
            full_name: full_name.to_string(),
            favorite_style: Some(TravelStyle::Budget),
            avatar_url: Some(String::new()),
        }
        .into_profile("user-1", Utc::now())
    }

    #[test]
    fn test_display_name_prefers_profile_name() {
        assert_eq!(display_name(Some(&profile("Sari Dewi")), "sari@example.com"), "Sari Dewi");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(display_name(Some(&profile("  ")), "budi@example.com"), "Budi");
        assert_eq!(display_name(None, "andi.pratama@example.com"), "Andi.pratama");
    }

    #[test]
    fn test_display_name_default() {
        assert_eq!(display_name(None, ""), "Traveler");
        assert_eq!(display_name(None, "@example.com"), "Traveler");
    }

    #[test]
    fn test_blank_avatar_is_dropped() {
        assert!(profile("Sari").avatar_url.is_none());
    }
}
