//! Browse Cagnottes Use Case
//!
//! Public listing and detail, plus the owner's own list.

use kernel::id::{CagnotteId, UserId};
use std::sync::Arc;

use crate::domain::entities::CagnotteSummary;
use crate::domain::repository::CagnotteRepository;
use crate::domain::value_objects::{Page, Pagination};
use crate::error::{CagnotteError, CagnotteResult};

pub struct BrowseCagnottesUseCase<C>
where
    C: CagnotteRepository,
{
    cagnotte_repo: Arc<C>,
}

impl<C> BrowseCagnottesUseCase<C>
where
    C: CagnotteRepository,
{
    pub fn new(cagnotte_repo: Arc<C>) -> Self {
        Self { cagnotte_repo }
    }

    pub async fn list(&self, pagination: Pagination) -> CagnotteResult<Page<CagnotteSummary>> {
        self.cagnotte_repo.list_summaries(pagination).await
    }

    pub async fn list_owned(&self, owner_id: &UserId) -> CagnotteResult<Vec<CagnotteSummary>> {
        self.cagnotte_repo.list_owned(owner_id).await
    }

    pub async fn get(&self, id: &CagnotteId) -> CagnotteResult<CagnotteSummary> {
        self.cagnotte_repo
            .find_summary(id)
            .await?
            .ok_or(CagnotteError::NotFound)
    }
}
