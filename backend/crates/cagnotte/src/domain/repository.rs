//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{CagnotteId, UserId};

use crate::domain::entities::{
    Cagnotte, CagnotteChanges, CagnotteSummary, CagnotteUpdate, Donation,
};
use crate::domain::services::WeeklyTotal;
use crate::domain::value_objects::{Page, Pagination};
use crate::error::CagnotteResult;

/// Cagnotte repository trait
#[trait_variant::make(CagnotteRepository: Send)]
pub trait LocalCagnotteRepository {
    /// Create a new cagnotte
    async fn create(&self, cagnotte: &Cagnotte) -> CagnotteResult<()>;

    /// Find cagnotte by ID, without aggregates
    async fn find(&self, id: &CagnotteId) -> CagnotteResult<Option<Cagnotte>>;

    /// Find cagnotte by ID with donation aggregates
    async fn find_summary(&self, id: &CagnotteId) -> CagnotteResult<Option<CagnotteSummary>>;

    /// Newest first
    async fn list_summaries(&self, pagination: Pagination) -> CagnotteResult<Page<CagnotteSummary>>;

    /// All cagnottes of one owner, newest first
    async fn list_owned(&self, owner_id: &UserId) -> CagnotteResult<Vec<CagnotteSummary>>;

    /// Apply a non-empty change set; `None` if the row is gone
    async fn update(
        &self,
        id: &CagnotteId,
        changes: &CagnotteChanges,
    ) -> CagnotteResult<Option<Cagnotte>>;

    /// Hard delete; donations and updates cascade. Returns whether a row went away
    async fn delete(&self, id: &CagnotteId) -> CagnotteResult<bool>;
}

/// Donation repository trait
#[trait_variant::make(DonationRepository: Send)]
pub trait LocalDonationRepository {
    /// Record a donation
    async fn create(&self, donation: &Donation) -> CagnotteResult<()>;

    /// Newest first
    async fn list(
        &self,
        cagnotte_id: &CagnotteId,
        pagination: Pagination,
    ) -> CagnotteResult<Page<Donation>>;

    /// `(bucket label, count)` rows
    async fn bucket_counts(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<(String, i64)>>;

    /// Sums per calendar week, any order
    async fn weekly_totals(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<WeeklyTotal>>;
}

/// Cagnotte update repository trait
#[trait_variant::make(UpdateRepository: Send)]
pub trait LocalUpdateRepository {
    /// Post an update
    async fn create(&self, update: &CagnotteUpdate) -> CagnotteResult<()>;

    /// Newest first
    async fn list(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<CagnotteUpdate>>;
}
