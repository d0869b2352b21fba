//! Post Update Use Case
//!
//! Owners publish progress updates; anyone can read them.

use kernel::id::{CagnotteId, UserId};
use std::sync::Arc;

use crate::domain::entities::CagnotteUpdate;
use crate::domain::repository::{CagnotteRepository, UpdateRepository};
use crate::domain::value_objects::{Title, UPDATE_BODY_MAX_CHARS, required_text};
use crate::error::{CagnotteError, CagnotteResult};

/// Update input, unvalidated
#[derive(Debug, Clone)]
pub struct PostUpdateInput {
    pub title: String,
    pub body: String,
}

pub struct PostUpdateUseCase<C, U>
where
    C: CagnotteRepository,
    U: UpdateRepository,
{
    cagnotte_repo: Arc<C>,
    update_repo: Arc<U>,
}

impl<C, U> PostUpdateUseCase<C, U>
where
    C: CagnotteRepository,
    U: UpdateRepository,
{
    pub fn new(cagnotte_repo: Arc<C>, update_repo: Arc<U>) -> Self {
        Self {
            cagnotte_repo,
            update_repo,
        }
    }

    pub async fn post(
        &self,
        author_id: &UserId,
        cagnotte_id: &CagnotteId,
        input: PostUpdateInput,
    ) -> CagnotteResult<CagnotteUpdate> {
        let title = Title::new(&input.title)?;
        let body = required_text(&input.body, "Body", UPDATE_BODY_MAX_CHARS)?;

        let cagnotte = self
            .cagnotte_repo
            .find(cagnotte_id)
            .await?
            .ok_or(CagnotteError::NotFound)?;

        if !cagnotte.is_owned_by(author_id) {
            return Err(CagnotteError::NotOwner);
        }

        let update = CagnotteUpdate::new(cagnotte.id, *author_id, title, body);
        self.update_repo.create(&update).await?;

        tracing::info!(cagnotte_id = %cagnotte.id, update_id = %update.id, "Update posted");

        Ok(update)
    }

    pub async fn list(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<CagnotteUpdate>> {
        if self.cagnotte_repo.find(cagnotte_id).await?.is_none() {
            return Err(CagnotteError::NotFound);
        }
        self.update_repo.list(cagnotte_id).await
    }
}
