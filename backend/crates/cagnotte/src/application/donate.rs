//! Donate Use Case
//!
//! Records a simulated donation and lists a cagnotte's donations.
//! No money moves; the payment reference only identifies the record.

use chrono::Utc;
use kernel::id::CagnotteId;
use std::sync::Arc;

use crate::domain::entities::{Donation, NewDonation};
use crate::domain::repository::{CagnotteRepository, DonationRepository};
use crate::domain::value_objects::{
    Amount, DONOR_NAME_MAX_CHARS, MESSAGE_MAX_CHARS, Page, Pagination, ValidationError,
    optional_text,
};
use crate::error::{CagnotteError, CagnotteResult};

/// Donation input, unvalidated
#[derive(Debug, Clone, Default)]
pub struct DonateInput {
    /// Blank or absent means anonymous
    pub donor_name: Option<String>,
    pub message: Option<String>,
    pub amount: i64,
}

impl DonateInput {
    pub fn validate(self) -> Result<NewDonation, ValidationError> {
        Ok(NewDonation {
            donor_name: optional_text(self.donor_name.as_deref(), "Donor name", DONOR_NAME_MAX_CHARS)?,
            message: optional_text(self.message.as_deref(), "Message", MESSAGE_MAX_CHARS)?,
            amount: Amount::new(self.amount)?,
        })
    }
}

pub struct DonateUseCase<C, D>
where
    C: CagnotteRepository,
    D: DonationRepository,
{
    cagnotte_repo: Arc<C>,
    donation_repo: Arc<D>,
}

impl<C, D> DonateUseCase<C, D>
where
    C: CagnotteRepository,
    D: DonationRepository,
{
    pub fn new(cagnotte_repo: Arc<C>, donation_repo: Arc<D>) -> Self {
        Self {
            cagnotte_repo,
            donation_repo,
        }
    }

    pub async fn donate(&self, cagnotte_id: &CagnotteId, input: DonateInput) -> CagnotteResult<Donation> {
        let new_donation = input.validate()?;

        let cagnotte = self
            .cagnotte_repo
            .find(cagnotte_id)
            .await?
            .ok_or(CagnotteError::NotFound)?;

        if cagnotte.has_ended_at(Utc::now()) {
            return Err(CagnotteError::Ended);
        }

        let donation = Donation::new(cagnotte.id, new_donation);
        self.donation_repo.create(&donation).await?;

        tracing::info!(
            cagnotte_id = %cagnotte.id,
            donation_id = %donation.id,
            amount = donation.amount.value(),
            payment_reference = %donation.payment_reference.as_str(),
            "Donation recorded"
        );

        Ok(donation)
    }

    pub async fn list(&self, cagnotte_id: &CagnotteId, pagination: Pagination) -> CagnotteResult<Page<Donation>> {
        if self.cagnotte_repo.find(cagnotte_id).await?.is_none() {
            return Err(CagnotteError::NotFound);
        }
        self.donation_repo.list(cagnotte_id, pagination).await
    }
}
