//! In-Memory Repository Implementation
//!
//! Backs use-case and HTTP tests without a database. Deleting a cagnotte
//! drops its donations and updates, like the foreign-key cascade does.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use kernel::id::{CagnotteId, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{
    Cagnotte, CagnotteChanges, CagnotteSummary, CagnotteUpdate, Donation,
};
use crate::domain::repository::{CagnotteRepository, DonationRepository, UpdateRepository};
use crate::domain::services::{AmountBucket, WeeklyTotal};
use crate::domain::value_objects::{Page, Pagination};
use crate::error::{CagnotteError, CagnotteResult};

#[derive(Default)]
struct Store {
    cagnottes: HashMap<CagnotteId, Cagnotte>,
    donations: Vec<Donation>,
    updates: Vec<CagnotteUpdate>,
}

impl Store {
    fn summary(&self, cagnotte: &Cagnotte) -> CagnotteSummary {
        let donations = self.donations.iter().filter(|d| d.cagnotte_id == cagnotte.id);
        let (total_raised, donation_count) =
            donations.fold((0i64, 0), |(sum, count), d| {
                (sum.saturating_add(d.amount.value()), count + 1)
            });

        CagnotteSummary {
            cagnotte: cagnotte.clone(),
            total_raised,
            donation_count,
        }
    }

    fn newest_first<'a>(&'a self, owner: Option<&UserId>) -> Vec<&'a Cagnotte> {
        let mut cagnottes: Vec<_> = self
            .cagnottes
            .values()
            .filter(|c| owner.is_none_or(|owner| c.is_owned_by(owner)))
            .collect();
        cagnottes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        cagnottes
    }
}

/// Monday 00:00 UTC of the week containing `at`, as `date_trunc('week', ..)`
fn week_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_monday = i64::from(at.weekday().num_days_from_monday());
    (at.date_naive() - Duration::days(days_from_monday))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn paginate<T: Clone>(items: &[T], pagination: Pagination) -> Vec<T> {
    items
        .iter()
        .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
        .take(pagination.per_page() as usize)
        .cloned()
        .collect()
}

/// Cagnotte, donation and update repository kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryCagnotteRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryCagnotteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CagnotteRepository for InMemoryCagnotteRepository {
    async fn create(&self, cagnotte: &Cagnotte) -> CagnotteResult<()> {
        let mut store = self.store.write().await;
        store.cagnottes.insert(cagnotte.id, cagnotte.clone());
        Ok(())
    }

    async fn find(&self, id: &CagnotteId) -> CagnotteResult<Option<Cagnotte>> {
        Ok(self.store.read().await.cagnottes.get(id).cloned())
    }

    async fn find_summary(&self, id: &CagnotteId) -> CagnotteResult<Option<CagnotteSummary>> {
        let store = self.store.read().await;
        Ok(store.cagnottes.get(id).map(|c| store.summary(c)))
    }

    async fn list_summaries(&self, pagination: Pagination) -> CagnotteResult<Page<CagnotteSummary>> {
        let store = self.store.read().await;
        let all = store.newest_first(None);

        Ok(Page {
            items: paginate(&all, pagination)
                .into_iter()
                .map(|c| store.summary(c))
                .collect(),
            pagination,
            total: all.len() as i64,
        })
    }

    async fn list_owned(&self, owner_id: &UserId) -> CagnotteResult<Vec<CagnotteSummary>> {
        let store = self.store.read().await;
        Ok(store
            .newest_first(Some(owner_id))
            .into_iter()
            .map(|c| store.summary(c))
            .collect())
    }

    async fn update(
        &self,
        id: &CagnotteId,
        changes: &CagnotteChanges,
    ) -> CagnotteResult<Option<Cagnotte>> {
        if changes.is_empty() {
            return Err(CagnotteError::EmptyChanges);
        }

        let mut store = self.store.write().await;
        let Some(cagnotte) = store.cagnottes.get_mut(id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            cagnotte.title = title.clone();
        }
        if let Some(description) = &changes.description {
            cagnotte.description = description.clone();
        }
        if let Some(goal_amount) = changes.goal_amount {
            cagnotte.goal_amount = goal_amount;
        }
        if let Some(currency) = &changes.currency {
            cagnotte.currency = currency.clone();
        }
        if let Some(image_url) = &changes.image_url {
            cagnotte.image_url = image_url.clone();
        }
        if let Some(ends_at) = changes.ends_at {
            cagnotte.ends_at = ends_at;
        }
        cagnotte.updated_at = Utc::now();

        Ok(Some(cagnotte.clone()))
    }

    async fn delete(&self, id: &CagnotteId) -> CagnotteResult<bool> {
        let mut store = self.store.write().await;
        if store.cagnottes.remove(id).is_none() {
            return Ok(false);
        }
        store.donations.retain(|d| &d.cagnotte_id != id);
        store.updates.retain(|u| &u.cagnotte_id != id);
        Ok(true)
    }
}

impl DonationRepository for InMemoryCagnotteRepository {
    async fn create(&self, donation: &Donation) -> CagnotteResult<()> {
        let mut store = self.store.write().await;
        if !store.cagnottes.contains_key(&donation.cagnotte_id) {
            return Err(CagnotteError::NotFound);
        }
        store.donations.push(donation.clone());
        Ok(())
    }

    async fn list(
        &self,
        cagnotte_id: &CagnotteId,
        pagination: Pagination,
    ) -> CagnotteResult<Page<Donation>> {
        let store = self.store.read().await;
        let mut donations: Vec<Donation> = store
            .donations
            .iter()
            .filter(|d| &d.cagnotte_id == cagnotte_id)
            .cloned()
            .collect();
        donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Page {
            items: paginate(&donations, pagination),
            pagination,
            total: donations.len() as i64,
        })
    }

    async fn bucket_counts(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<(String, i64)>> {
        let store = self.store.read().await;
        let mut counts: HashMap<&'static str, i64> = HashMap::new();
        for donation in store.donations.iter().filter(|d| &d.cagnotte_id == cagnotte_id) {
            *counts
                .entry(AmountBucket::for_amount(donation.amount.value()).label())
                .or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect())
    }

    async fn weekly_totals(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<WeeklyTotal>> {
        let store = self.store.read().await;
        let mut totals: HashMap<DateTime<Utc>, i64> = HashMap::new();
        for donation in store.donations.iter().filter(|d| &d.cagnotte_id == cagnotte_id) {
            let total = totals.entry(week_start(donation.created_at)).or_default();
            *total = total.saturating_add(donation.amount.value());
        }
        Ok(totals
            .into_iter()
            .map(|(week_start, amount)| WeeklyTotal { week_start, amount })
            .collect())
    }
}

impl UpdateRepository for InMemoryCagnotteRepository {
    async fn create(&self, update: &CagnotteUpdate) -> CagnotteResult<()> {
        let mut store = self.store.write().await;
        if !store.cagnottes.contains_key(&update.cagnotte_id) {
            return Err(CagnotteError::NotFound);
        }
        store.updates.push(update.clone());
        Ok(())
    }

    async fn list(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<CagnotteUpdate>> {
        let store = self.store.read().await;
        let mut updates: Vec<CagnotteUpdate> = store
            .updates
            .iter()
            .filter(|u| &u.cagnotte_id == cagnotte_id)
            .cloned()
            .collect();
        updates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(updates)
    }
}
