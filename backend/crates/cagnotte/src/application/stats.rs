//! Statistics Use Case
//!
//! Totals, donation size distribution and weekly cumulative series.

use kernel::id::CagnotteId;
use std::sync::Arc;

use crate::domain::entities::CagnotteSummary;
use crate::domain::repository::{CagnotteRepository, DonationRepository};
use crate::domain::services::{BucketCount, WeeklyPoint, cumulative_series, fill_buckets};
use crate::error::{CagnotteError, CagnotteResult};

/// Everything the statistics endpoint reports
#[derive(Debug, Clone)]
pub struct CagnotteStats {
    pub summary: CagnotteSummary,
    /// Always every bucket, smallest first
    pub buckets: Vec<BucketCount>,
    /// Oldest week first
    pub weekly: Vec<WeeklyPoint>,
}

impl CagnotteStats {
    /// Mean donation, 0 without donations
    pub fn average_donation(&self) -> i64 {
        if self.summary.donation_count == 0 {
            return 0;
        }
        self.summary.total_raised / self.summary.donation_count
    }
}

pub struct StatsUseCase<C, D>
where
    C: CagnotteRepository,
    D: DonationRepository,
{
    cagnotte_repo: Arc<C>,
    donation_repo: Arc<D>,
}

impl<C, D> StatsUseCase<C, D>
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

    pub async fn execute(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<CagnotteStats> {
        let summary = self
            .cagnotte_repo
            .find_summary(cagnotte_id)
            .await?
            .ok_or(CagnotteError::NotFound)?;

        let buckets = fill_buckets(self.donation_repo.bucket_counts(cagnotte_id).await?);
        let weekly = cumulative_series(self.donation_repo.weekly_totals(cagnotte_id).await?);

        Ok(CagnotteStats {
            summary,
            buckets,
            weekly,
        })
    }
}
