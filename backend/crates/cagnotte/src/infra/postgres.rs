//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_foreign_key_violation;
use kernel::id::{CagnotteId, CagnotteUpdateId, DonationId, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{
    Cagnotte, CagnotteChanges, CagnotteSummary, CagnotteUpdate, Donation,
};
use crate::domain::repository::{CagnotteRepository, DonationRepository, UpdateRepository};
use crate::domain::services::{AmountBucket, WeeklyTotal};
use crate::domain::value_objects::{Amount, Currency, Page, Pagination, PaymentReference, Title};
use crate::error::{CagnotteError, CagnotteResult};

const CAGNOTTE_COLUMNS: &str = "cagnotte_id, owner_id, title, description, goal_amount, \
     currency, image_url, ends_at, created_at, updated_at";

/// Summary select; callers append WHERE, GROUP BY and ORDER BY
///
/// Totals saturate at `i64::MAX` instead of failing the cast.
const SUMMARY_SELECT: &str = r#"
    SELECT c.cagnotte_id, c.owner_id, c.title, c.description, c.goal_amount,
           c.currency, c.image_url, c.ends_at, c.created_at, c.updated_at,
           LEAST(COALESCE(SUM(d.amount), 0), 9223372036854775807)::BIGINT AS total_raised,
           COUNT(d.donation_id) AS donation_count
    FROM cagnottes c
    LEFT JOIN donations d ON d.cagnotte_id = c.cagnotte_id
"#;

/// PostgreSQL-backed repository for cagnottes, donations and updates
#[derive(Clone)]
pub struct PgCagnotteRepository {
    pool: PgPool,
}

impl PgCagnotteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `UPDATE` touching only the columns present in `changes`
///
/// `updated_at` is always refreshed. Callers reject empty change sets first.
pub(crate) fn update_query(id: &CagnotteId, changes: &CagnotteChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE cagnottes SET ");

    {
        let mut set = qb.separated(", ");
        if let Some(title) = &changes.title {
            set.push("title = ").push_bind_unseparated(title.as_str().to_string());
        }
        if let Some(description) = &changes.description {
            set.push("description = ").push_bind_unseparated(description.clone());
        }
        if let Some(goal_amount) = changes.goal_amount {
            set.push("goal_amount = ").push_bind_unseparated(goal_amount.value());
        }
        if let Some(currency) = &changes.currency {
            set.push("currency = ").push_bind_unseparated(currency.as_str().to_string());
        }
        if let Some(image_url) = &changes.image_url {
            set.push("image_url = ").push_bind_unseparated(image_url.clone());
        }
        if let Some(ends_at) = changes.ends_at {
            set.push("ends_at = ").push_bind_unseparated(ends_at);
        }
        set.push("updated_at = now()");
    }

    qb.push(" WHERE cagnotte_id = ").push_bind(*id.as_uuid());
    qb.push(" RETURNING ").push(CAGNOTTE_COLUMNS);
    qb
}

/// Insert races with a delete of the parent cagnotte
fn missing_parent(e: sqlx::Error) -> CagnotteError {
    if is_foreign_key_violation(&e) {
        CagnotteError::NotFound
    } else {
        CagnotteError::Database(e)
    }
}

impl CagnotteRepository for PgCagnotteRepository {
    async fn create(&self, cagnotte: &Cagnotte) -> CagnotteResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cagnottes (
                cagnotte_id,
                owner_id,
                title,
                description,
                goal_amount,
                currency,
                image_url,
                ends_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(cagnotte.id.as_uuid())
        .bind(cagnotte.owner_id.as_uuid())
        .bind(cagnotte.title.as_str())
        .bind(&cagnotte.description)
        .bind(cagnotte.goal_amount.value())
        .bind(cagnotte.currency.as_str())
        .bind(cagnotte.image_url.as_deref())
        .bind(cagnotte.ends_at)
        .bind(cagnotte.created_at)
        .bind(cagnotte.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: &CagnotteId) -> CagnotteResult<Option<Cagnotte>> {
        let row = sqlx::query_as::<_, CagnotteRow>(&format!(
            "SELECT {CAGNOTTE_COLUMNS} FROM cagnottes WHERE cagnotte_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CagnotteRow::into_cagnotte))
    }

    async fn find_summary(&self, id: &CagnotteId) -> CagnotteResult<Option<CagnotteSummary>> {
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            "{SUMMARY_SELECT} WHERE c.cagnotte_id = $1 GROUP BY c.cagnotte_id"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SummaryRow::into_summary))
    }

    async fn list_summaries(&self, pagination: Pagination) -> CagnotteResult<Page<CagnotteSummary>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cagnottes")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            "{SUMMARY_SELECT} GROUP BY c.cagnotte_id \
             ORDER BY c.created_at DESC, c.cagnotte_id \
             LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(SummaryRow::into_summary).collect(),
            pagination,
            total,
        })
    }

    async fn list_owned(&self, owner_id: &UserId) -> CagnotteResult<Vec<CagnotteSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            "{SUMMARY_SELECT} WHERE c.owner_id = $1 GROUP BY c.cagnotte_id \
             ORDER BY c.created_at DESC, c.cagnotte_id"
        ))
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SummaryRow::into_summary).collect())
    }

    async fn update(
        &self,
        id: &CagnotteId,
        changes: &CagnotteChanges,
    ) -> CagnotteResult<Option<Cagnotte>> {
        if changes.is_empty() {
            return Err(CagnotteError::EmptyChanges);
        }

        let mut query = update_query(id, changes);
        let row = query
            .build_query_as::<CagnotteRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CagnotteRow::into_cagnotte))
    }

    async fn delete(&self, id: &CagnotteId) -> CagnotteResult<bool> {
        let deleted = sqlx::query("DELETE FROM cagnottes WHERE cagnotte_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

impl DonationRepository for PgCagnotteRepository {
    async fn create(&self, donation: &Donation) -> CagnotteResult<()> {
        sqlx::query(
            r#"
            INSERT INTO donations (
                donation_id,
                cagnotte_id,
                donor_name,
                message,
                amount,
                payment_reference,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(donation.id.as_uuid())
        .bind(donation.cagnotte_id.as_uuid())
        .bind(donation.donor_name.as_deref())
        .bind(donation.message.as_deref())
        .bind(donation.amount.value())
        .bind(donation.payment_reference.as_str())
        .bind(donation.created_at)
        .execute(&self.pool)
        .await
        .map_err(missing_parent)?;

        Ok(())
    }

    async fn list(
        &self,
        cagnotte_id: &CagnotteId,
        pagination: Pagination,
    ) -> CagnotteResult<Page<Donation>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE cagnotte_id = $1")
            .bind(cagnotte_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, DonationRow>(
            r#"
            SELECT donation_id, cagnotte_id, donor_name, message, amount,
                   payment_reference, created_at
            FROM donations
            WHERE cagnotte_id = $1
            ORDER BY created_at DESC, donation_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(cagnotte_id.as_uuid())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(DonationRow::into_donation).collect(),
            pagination,
            total,
        })
    }

    async fn bucket_counts(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(&format!(
            "SELECT {} AS bucket, COUNT(*) AS count \
             FROM donations WHERE cagnotte_id = $1 GROUP BY 1",
            AmountBucket::sql_case("amount")
        ))
        .bind(cagnotte_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn weekly_totals(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<WeeklyTotal>> {
        let rows = sqlx::query_as::<_, (DateTime<Utc>, i64)>(
            r#"
            SELECT date_trunc('week', created_at) AS week_start,
                   LEAST(SUM(amount), 9223372036854775807)::BIGINT AS amount
            FROM donations
            WHERE cagnotte_id = $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(cagnotte_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(week_start, amount)| WeeklyTotal { week_start, amount })
            .collect())
    }
}

impl UpdateRepository for PgCagnotteRepository {
    async fn create(&self, update: &CagnotteUpdate) -> CagnotteResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cagnotte_updates (
                update_id,
                cagnotte_id,
                author_id,
                title,
                body,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(update.id.as_uuid())
        .bind(update.cagnotte_id.as_uuid())
        .bind(update.author_id.as_uuid())
        .bind(update.title.as_str())
        .bind(&update.body)
        .bind(update.created_at)
        .execute(&self.pool)
        .await
        .map_err(missing_parent)?;

        Ok(())
    }

    async fn list(&self, cagnotte_id: &CagnotteId) -> CagnotteResult<Vec<CagnotteUpdate>> {
        let rows = sqlx::query_as::<_, UpdateRow>(
            r#"
            SELECT update_id, cagnotte_id, author_id, title, body, created_at
            FROM cagnotte_updates
            WHERE cagnotte_id = $1
            ORDER BY created_at DESC, update_id
            "#,
        )
        .bind(cagnotte_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UpdateRow::into_update).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CagnotteRow {
    cagnotte_id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    goal_amount: i64,
    currency: String,
    image_url: Option<String>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CagnotteRow {
    fn into_cagnotte(self) -> Cagnotte {
        Cagnotte {
            id: CagnotteId::from_uuid(self.cagnotte_id),
            owner_id: UserId::from_uuid(self.owner_id),
            title: Title::from_db(self.title),
            description: self.description,
            goal_amount: Amount::from_db(self.goal_amount),
            currency: Currency::from_db(self.currency),
            image_url: self.image_url,
            ends_at: self.ends_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    #[sqlx(flatten)]
    cagnotte: CagnotteRow,
    total_raised: i64,
    donation_count: i64,
}

impl SummaryRow {
    fn into_summary(self) -> CagnotteSummary {
        CagnotteSummary {
            cagnotte: self.cagnotte.into_cagnotte(),
            total_raised: self.total_raised,
            donation_count: self.donation_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DonationRow {
    donation_id: Uuid,
    cagnotte_id: Uuid,
    donor_name: Option<String>,
    message: Option<String>,
    amount: i64,
    payment_reference: String,
    created_at: DateTime<Utc>,
}

impl DonationRow {
    fn into_donation(self) -> Donation {
        Donation {
            id: DonationId::from_uuid(self.donation_id),
            cagnotte_id: CagnotteId::from_uuid(self.cagnotte_id),
            donor_name: self.donor_name,
            message: self.message,
            amount: Amount::from_db(self.amount),
            payment_reference: PaymentReference::from_db(self.payment_reference),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UpdateRow {
    update_id: Uuid,
    cagnotte_id: Uuid,
    author_id: Uuid,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl UpdateRow {
    fn into_update(self) -> CagnotteUpdate {
        CagnotteUpdate {
            id: CagnotteUpdateId::from_uuid(self.update_id),
            cagnotte_id: CagnotteId::from_uuid(self.cagnotte_id),
            author_id: UserId::from_uuid(self.author_id),
            title: Title::from_db(self.title),
            body: self.body,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sql(changes: &CagnotteChanges) -> String {
        update_query(&CagnotteId::new(), changes).sql().to_string()
    }

    #[test]
    fn test_update_sets_only_present_fields() {
        let changes = CagnotteChanges {
            title: Some(Title::new("Nouveau titre").unwrap()),
            ..Default::default()
        };

        assert_eq!(
            sql(&changes),
            format!(
                "UPDATE cagnottes SET title = $1, updated_at = now() \
                 WHERE cagnotte_id = $2 RETURNING {CAGNOTTE_COLUMNS}"
            )
        );
    }

    #[test]
    fn test_update_numbers_placeholders_in_order() {
        let changes = CagnotteChanges {
            description: Some("Plus de details".to_string()),
            goal_amount: Some(Amount::new(75_000).unwrap()),
            ends_at: Some(Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())),
            ..Default::default()
        };

        let sql = sql(&changes);
        assert!(sql.starts_with(
            "UPDATE cagnottes SET description = $1, goal_amount = $2, ends_at = $3, \
             updated_at = now() WHERE cagnotte_id = $4"
        ));
        assert!(!sql.contains("title ="));
        assert!(!sql.contains("image_url ="));
    }

    #[test]
    fn test_update_clearing_is_an_assignment() {
        let changes = CagnotteChanges {
            image_url: Some(None),
            ..Default::default()
        };

        assert!(sql(&changes).starts_with(
            "UPDATE cagnottes SET image_url = $1, updated_at = now() WHERE cagnotte_id = $2"
        ));
    }
}
