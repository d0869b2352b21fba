//! Manage Cagnotte Use Case
//!
//! Owner-side create, partial update and delete.

use chrono::{DateTime, Utc};
use kernel::id::{CagnotteId, UserId};
use std::sync::Arc;

use crate::application::config::CagnotteConfig;
use crate::domain::entities::{Cagnotte, CagnotteChanges, NewCagnotte};
use crate::domain::repository::CagnotteRepository;
use crate::domain::value_objects::{
    Amount, Currency, DESCRIPTION_MAX_CHARS, Title, ValidationError, image_url, optional_text,
};
use crate::error::{CagnotteError, CagnotteResult};

/// Create input, unvalidated
#[derive(Debug, Clone, Default)]
pub struct CreateCagnotteInput {
    pub title: String,
    pub description: Option<String>,
    pub goal_amount: i64,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Partial update input, unvalidated
///
/// `image_url` and `ends_at` distinguish "absent" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateCagnotteInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_amount: Option<i64>,
    pub currency: Option<String>,
    pub image_url: Option<Option<String>>,
    pub ends_at: Option<Option<DateTime<Utc>>>,
}

impl CreateCagnotteInput {
    pub fn validate(self, config: &CagnotteConfig, now: DateTime<Utc>) -> Result<NewCagnotte, ValidationError> {
        if self.ends_at.is_some_and(|ends_at| ends_at <= now) {
            return Err(ValidationError::EndsInPast);
        }

        let currency = self.currency.as_deref().unwrap_or(&config.default_currency);

        Ok(NewCagnotte {
            title: Title::new(&self.title)?,
            description: optional_text(self.description.as_deref(), "Description", DESCRIPTION_MAX_CHARS)?
                .unwrap_or_default(),
            goal_amount: Amount::new(self.goal_amount)?,
            currency: Currency::new(currency)?,
            image_url: image_url(self.image_url.as_deref())?,
            ends_at: self.ends_at,
        })
    }
}

impl UpdateCagnotteInput {
    pub fn validate(self, now: DateTime<Utc>) -> Result<CagnotteChanges, ValidationError> {
        let changes = CagnotteChanges {
            title: self.title.as_deref().map(Title::new).transpose()?,
            description: self
                .description
                .map(|d| {
                    optional_text(Some(&d), "Description", DESCRIPTION_MAX_CHARS)
                        .map(Option::unwrap_or_default)
                })
                .transpose()?,
            goal_amount: self.goal_amount.map(Amount::new).transpose()?,
            currency: self.currency.as_deref().map(Currency::new).transpose()?,
            image_url: self
                .image_url
                .map(|url| image_url(url.as_deref()))
                .transpose()?,
            ends_at: self.ends_at,
        };
        changes.validate_at(now)?;
        Ok(changes)
    }
}

pub struct ManageCagnotteUseCase<C>
where
    C: CagnotteRepository,
{
    cagnotte_repo: Arc<C>,
    config: Arc<CagnotteConfig>,
}

impl<C> ManageCagnotteUseCase<C>
where
    C: CagnotteRepository,
{
    pub fn new(cagnotte_repo: Arc<C>, config: Arc<CagnotteConfig>) -> Self {
        Self {
            cagnotte_repo,
            config,
        }
    }

    pub async fn create(&self, owner_id: UserId, input: CreateCagnotteInput) -> CagnotteResult<Cagnotte> {
        let new_cagnotte = input.validate(&self.config, Utc::now())?;
        let cagnotte = Cagnotte::new(owner_id, new_cagnotte);

        self.cagnotte_repo.create(&cagnotte).await?;

        tracing::info!(
            cagnotte_id = %cagnotte.id,
            owner_id = %owner_id,
            goal_amount = cagnotte.goal_amount.value(),
            "Cagnotte created"
        );

        Ok(cagnotte)
    }

    pub async fn update(
        &self,
        owner_id: &UserId,
        id: &CagnotteId,
        input: UpdateCagnotteInput,
    ) -> CagnotteResult<Cagnotte> {
        let changes = input.validate(Utc::now())?;
        if changes.is_empty() {
            return Err(CagnotteError::EmptyChanges);
        }

        self.owned(owner_id, id).await?;

        let updated = self
            .cagnotte_repo
            .update(id, &changes)
            .await?
            .ok_or(CagnotteError::NotFound)?;

        tracing::info!(cagnotte_id = %id, "Cagnotte updated");

        Ok(updated)
    }

    /// Hard delete; donations and updates go with it
    pub async fn delete(&self, owner_id: &UserId, id: &CagnotteId) -> CagnotteResult<()> {
        let cagnotte = self.owned(owner_id, id).await?;

        if !self.cagnotte_repo.delete(id).await? {
            return Err(CagnotteError::NotFound);
        }

        tracing::warn!(
            cagnotte_id = %id,
            owner_id = %owner_id,
            title = %cagnotte.title.as_str(),
            "Cagnotte permanently deleted with its donations and updates"
        );

        Ok(())
    }

    /// Load `id` and check it belongs to `owner_id`
    async fn owned(&self, owner_id: &UserId, id: &CagnotteId) -> CagnotteResult<Cagnotte> {
        let cagnotte = self
            .cagnotte_repo
            .find(id)
            .await?
            .ok_or(CagnotteError::NotFound)?;

        if !cagnotte.is_owned_by(owner_id) {
            return Err(CagnotteError::NotOwner);
        }

        Ok(cagnotte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_defaults() {
        let now = Utc::now();
        let new = CreateCagnotteInput {
            title: "  Fournitures scolaires  ".to_string(),
            goal_amount: 250_000,
            ..Default::default()
        }
        .validate(&CagnotteConfig::default(), now)
        .unwrap();

        assert_eq!(new.title.as_str(), "Fournitures scolaires");
        assert_eq!(new.currency.as_str(), "XOF");
        assert_eq!(new.description, "");
        assert!(new.image_url.is_none());
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let now = Utc::now();
        let config = CagnotteConfig::default();
        let valid = CreateCagnotteInput {
            title: "Valid title".to_string(),
            goal_amount: 1_000,
            ..Default::default()
        };

        let zero_goal = CreateCagnotteInput { goal_amount: 0, ..valid.clone() };
        assert_eq!(zero_goal.validate(&config, now).unwrap_err(), ValidationError::AmountNotPositive);

        let short_title = CreateCagnotteInput { title: "ab".to_string(), ..valid.clone() };
        assert_eq!(short_title.validate(&config, now).unwrap_err(), ValidationError::TitleLength);

        let past = CreateCagnotteInput { ends_at: Some(now - Duration::days(1)), ..valid };
        assert_eq!(past.validate(&config, now).unwrap_err(), ValidationError::EndsInPast);
    }

    #[test]
    fn test_update_keeps_absent_fields_absent() {
        let changes = UpdateCagnotteInput {
            goal_amount: Some(9_000),
            ..Default::default()
        }
        .validate(Utc::now())
        .unwrap();

        assert_eq!(changes.goal_amount.map(|a| a.value()), Some(9_000));
        assert!(changes.title.is_none());
        assert!(changes.image_url.is_none());
        assert!(changes.ends_at.is_none());
    }

    #[test]
    fn test_update_clear_image() {
        let changes = UpdateCagnotteInput {
            image_url: Some(None),
            ..Default::default()
        }
        .validate(Utc::now())
        .unwrap();
        assert_eq!(changes.image_url, Some(None));
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_update_empty() {
        let changes = UpdateCagnotteInput::default().validate(Utc::now()).unwrap();
        assert!(changes.is_empty());
    }
}
