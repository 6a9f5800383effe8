//! Social Media Links
//!
//! Companies, events and organizers carry at most one link per platform.
//! Links are embedded in their owner's document.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::domain::choices::SocialPlatform;
use crate::domain::validation;
use crate::error::{PlatformError, Result};

pub const MAX_SOCIAL_URL_LENGTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SocialMediaLink {
    #[serde(default)]
    pub platform: SocialPlatform,
    pub url: String,
}

impl SocialMediaLink {
    pub fn new(platform: SocialPlatform, url: impl Into<String>) -> Self {
        Self { platform, url: url.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validation::require_url("social_media.url", &self.url, MAX_SOCIAL_URL_LENGTH)
    }
}

fn ensure_unique_platforms(links: &[SocialMediaLink]) -> Result<()> {
    let mut seen = HashSet::new();
    for link in links {
        if !seen.insert(link.platform) {
            return Err(PlatformError::invalid_field(
                "social_media",
                "Ensure that all provided social media platforms are unique.",
            ));
        }
    }
    Ok(())
}

/// Validate a fresh set of links (creation path)
pub fn validate_links(links: &[SocialMediaLink]) -> Result<()> {
    ensure_unique_platforms(links)?;
    links.iter().try_for_each(SocialMediaLink::validate)
}

/// Replace `existing` with `incoming`, keyed by platform.
///
/// Platforms present in both are updated in place, new platforms are appended
/// and platforms missing from `incoming` are dropped.
pub fn replace_by_platform(existing: &mut Vec<SocialMediaLink>, incoming: Vec<SocialMediaLink>) -> Result<()> {
    validate_links(&incoming)?;

    let incoming_platforms: HashSet<SocialPlatform> = incoming.iter().map(|l| l.platform).collect();
    existing.retain(|l| incoming_platforms.contains(&l.platform));

    for link in incoming {
        match existing.iter_mut().find(|l| l.platform == link.platform) {
            Some(current) => current.url = link.url,
            None => existing.push(link),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(platform: SocialPlatform, url: &str) -> SocialMediaLink {
        SocialMediaLink::new(platform, url)
    }

    #[test]
    fn test_replace_updates_creates_and_removes() {
        let mut existing = vec![
            link(SocialPlatform::Twitter, "https://twitter.com/old"),
            link(SocialPlatform::Facebook, "https://facebook.com/acme"),
        ];

        replace_by_platform(
            &mut existing,
            vec![
                link(SocialPlatform::Twitter, "https://twitter.com/new"),
                link(SocialPlatform::Telegram, "https://t.me/acme"),
            ],
        )
        .unwrap();

        assert_eq!(
            existing,
            vec![
                link(SocialPlatform::Twitter, "https://twitter.com/new"),
                link(SocialPlatform::Telegram, "https://t.me/acme"),
            ]
        );
    }

    #[test]
    fn test_replace_with_empty_payload_clears_links() {
        let mut existing = vec![link(SocialPlatform::Instagram, "https://instagram.com/acme")];
        replace_by_platform(&mut existing, vec![]).unwrap();
        assert!(existing.is_empty());
    }

    #[test]
    fn test_duplicate_platforms_rejected() {
        let mut existing = vec![];
        let err = replace_by_platform(
            &mut existing,
            vec![
                link(SocialPlatform::Other, "https://a.example.com"),
                link(SocialPlatform::Other, "https://b.example.com"),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("unique"));
        assert!(existing.is_empty());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = validate_links(&[link(SocialPlatform::Facebook, "not a url")]).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidField { .. }));
    }
}
