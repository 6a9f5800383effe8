//! Company Service

use tracing::info;

use crate::domain::social::{replace_by_platform, validate_links, SocialMediaLink};
use crate::domain::{slug, Company};
use crate::error::{PlatformError, Result};
use crate::repository::{EventFilter, Repositories};
use crate::service::admission::AdmissionLocks;

#[derive(Debug, Clone, Default)]
pub struct CompanyInput {
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub social_media: Vec<SocialMediaLink>,
}

/// Field changes for an update; `None` leaves the field as it is
#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub social_media: Option<Vec<SocialMediaLink>>,
}

impl From<CompanyInput> for CompanyChanges {
    /// Full replacement: every field is set, absent links become an empty list
    fn from(input: CompanyInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
            website_url: Some(input.website_url),
            social_media: Some(input.social_media),
        }
    }
}

pub struct CompanyService {
    repos: Repositories,
    locks: AdmissionLocks,
}

impl CompanyService {
    pub fn new(repos: Repositories, locks: AdmissionLocks) -> Self {
        Self { repos, locks }
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        self.repos.companies.find_all().await
    }

    pub async fn get(&self, slug: &str) -> Result<Company> {
        self.repos
            .companies
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| PlatformError::not_found("Company", slug))
    }

    pub async fn create(&self, input: CompanyInput) -> Result<Company> {
        let mut company = Company::new(input.name.trim(), input.description)
            .with_website(input.website_url.trim());
        company.validate()?;
        validate_links(&input.social_media)?;
        company.social_media = input.social_media;

        let base = slug::base_slug(&company.name, "company");
        for candidate in slug::candidates(&base) {
            if self.repos.companies.exists_by_slug(&candidate).await? {
                continue;
            }
            company.slug = candidate;
            match self.repos.companies.insert(&company).await {
                Ok(()) => {
                    info!(company_id = %company.id, slug = %company.slug, "Company created");
                    return Ok(company);
                }
                // Lost a race for this slug, try the next one
                Err(PlatformError::Duplicate { ref field, .. }) if field == "slug" => continue,
                Err(e) => return Err(e),
            }
        }
        Err(PlatformError::internal("Slug candidates exhausted"))
    }

    pub async fn update(&self, slug: &str, changes: CompanyChanges) -> Result<Company> {
        let mut company = self.get(slug).await?;

        if let Some(name) = changes.name {
            company.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            company.description = description;
        }
        if let Some(website_url) = changes.website_url {
            company.website_url = website_url.trim().to_string();
        }
        company.validate()?;
        if let Some(links) = changes.social_media {
            replace_by_platform(&mut company.social_media, links)?;
        }

        company.touch();
        self.repos.companies.update(&company).await?;
        info!(company_id = %company.id, "Company updated");
        Ok(company)
    }

    /// Delete a company together with its events and their registrations
    pub async fn delete(&self, slug: &str) -> Result<()> {
        let company = self.get(slug).await?;
        let events = self
            .repos
            .events
            .find(&EventFilter {
                company_id: Some(company.id.clone()),
                ..Default::default()
            })
            .await?;

        for event in &events {
            let _guard = self.locks.acquire(&event.id).await;
            self.repos.registrations.delete_by_event(&event.id).await?;
            self.repos.events.delete(&event.id).await?;
        }
        self.repos.companies.delete(&company.id).await?;
        info!(company_id = %company.id, events = events.len(), "Company deleted");
        Ok(())
    }
}
