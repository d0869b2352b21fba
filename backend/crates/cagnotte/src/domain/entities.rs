//! Domain Entities
//!
//! Cagnottes (fundraising campaigns), their donations and progress updates.

use chrono::{DateTime, Utc};
use kernel::id::{CagnotteId, CagnotteUpdateId, DonationId, UserId};

use crate::domain::services::progress_percent;
use crate::domain::value_objects::{Amount, Currency, PaymentReference, Title, ValidationError};

/// Cagnotte entity
#[derive(Debug, Clone)]
pub struct Cagnotte {
    pub id: CagnotteId,
    pub owner_id: UserId,
    pub title: Title,
    pub description: String,
    pub goal_amount: Amount,
    pub currency: Currency,
    pub image_url: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cagnotte {
    /// Create a new cagnotte owned by `owner_id`
    pub fn new(owner_id: UserId, input: NewCagnotte) -> Self {
        let now = Utc::now();
        Self {
            id: CagnotteId::new(),
            owner_id,
            title: input.title,
            description: input.description,
            goal_amount: input.goal_amount,
            currency: input.currency,
            image_url: input.image_url,
            ends_at: input.ends_at,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Past its end date; open-ended cagnottes never end
    pub fn has_ended_at(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at <= now)
    }
}

/// Validated creation input
#[derive(Debug, Clone)]
pub struct NewCagnotte {
    pub title: Title,
    pub description: String,
    pub goal_amount: Amount,
    pub currency: Currency,
    pub image_url: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Sparse set of changes for a partial update
///
/// `None` leaves a column untouched. For nullable columns, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default)]
pub struct CagnotteChanges {
    pub title: Option<Title>,
    pub description: Option<String>,
    pub goal_amount: Option<Amount>,
    pub currency: Option<Currency>,
    pub image_url: Option<Option<String>>,
    pub ends_at: Option<Option<DateTime<Utc>>>,
}

impl CagnotteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.goal_amount.is_none()
            && self.currency.is_none()
            && self.image_url.is_none()
            && self.ends_at.is_none()
    }

    /// A new end date must lie in the future; clearing it is always allowed
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        match self.ends_at {
            Some(Some(ends_at)) if ends_at <= now => Err(ValidationError::EndsInPast),
            _ => Ok(()),
        }
    }
}

/// Cagnotte with donation aggregates
#[derive(Debug, Clone)]
pub struct CagnotteSummary {
    pub cagnotte: Cagnotte,
    pub total_raised: i64,
    pub donation_count: i64,
}

impl CagnotteSummary {
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.total_raised, self.cagnotte.goal_amount.value())
    }
}

/// Donation entity
#[derive(Debug, Clone)]
pub struct Donation {
    pub id: DonationId,
    pub cagnotte_id: CagnotteId,
    /// `None` for anonymous donors
    pub donor_name: Option<String>,
    pub message: Option<String>,
    pub amount: Amount,
    pub payment_reference: PaymentReference,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// A donation whose simulated payment has just succeeded
    pub fn new(cagnotte_id: CagnotteId, input: NewDonation) -> Self {
        Self {
            id: DonationId::new(),
            cagnotte_id,
            donor_name: input.donor_name,
            message: input.message,
            amount: input.amount,
            payment_reference: PaymentReference::generate(),
            created_at: Utc::now(),
        }
    }
}

/// Validated donation input
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_name: Option<String>,
    pub message: Option<String>,
    pub amount: Amount,
}

/// Progress update posted by the owner
#[derive(Debug, Clone)]
pub struct CagnotteUpdate {
    pub id: CagnotteUpdateId,
    pub cagnotte_id: CagnotteId,
    pub author_id: UserId,
    pub title: Title,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl CagnotteUpdate {
    pub fn new(cagnotte_id: CagnotteId, author_id: UserId, title: Title, body: String) -> Self {
        Self {
            id: CagnotteUpdateId::new(),
            cagnotte_id,
            author_id,
            title,
            body,
            created_at: Utc::now(),
        }
    }
}
