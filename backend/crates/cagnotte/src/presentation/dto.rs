//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

use crate::application::{
    CagnotteStats, CreateCagnotteInput, DonateInput, PostUpdateInput, UpdateCagnotteInput,
};
use crate::domain::entities::{Cagnotte, CagnotteSummary, CagnotteUpdate, Donation};
use crate::domain::services::{BucketCount, WeeklyPoint};
use crate::domain::value_objects::Page;

// ============================================================================
// Paging
// ============================================================================

/// `?page=&perPage=` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    #[serde(alias = "per_page")]
    pub per_page: Option<u32>,
}

/// One page of items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(f);
        Self {
            items: page.items,
            page: page.pagination.page(),
            per_page: page.pagination.per_page(),
            total: page.total,
            total_pages,
        }
    }
}

// ============================================================================
// Cagnottes
// ============================================================================

/// POST /api/me/cagnottes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCagnotteRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub goal_amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl From<CreateCagnotteRequest> for CreateCagnotteInput {
    fn from(req: CreateCagnotteRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            goal_amount: req.goal_amount,
            currency: req.currency,
            image_url: req.image_url,
            ends_at: req.ends_at,
        }
    }
}

/// PATCH /api/me/cagnottes/{id}
///
/// Omitted fields are left alone. `imageUrl: null` and `endsAt: null` clear
/// the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCagnotteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub goal_amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub ends_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateCagnotteRequest> for UpdateCagnotteInput {
    fn from(req: UpdateCagnotteRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            goal_amount: req.goal_amount,
            currency: req.currency,
            image_url: req.image_url,
            ends_at: req.ends_at,
        }
    }
}

/// Cagnotte as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CagnotteResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub goal_amount: i64,
    pub currency: String,
    pub image_url: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cagnotte> for CagnotteResponse {
    fn from(c: Cagnotte) -> Self {
        Self {
            id: c.id.to_string(),
            owner_id: c.owner_id.to_string(),
            title: c.title.as_str().to_string(),
            description: c.description,
            goal_amount: c.goal_amount.value(),
            currency: c.currency.as_str().to_string(),
            image_url: c.image_url,
            ends_at: c.ends_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Cagnotte with its donation aggregates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CagnotteSummaryResponse {
    #[serde(flatten)]
    pub cagnotte: CagnotteResponse,
    pub total_raised: i64,
    pub donation_count: i64,
    pub progress_percent: f64,
    pub ended: bool,
}

impl From<CagnotteSummary> for CagnotteSummaryResponse {
    fn from(summary: CagnotteSummary) -> Self {
        let progress_percent = summary.progress_percent();
        let ended = summary.cagnotte.has_ended_at(Utc::now());
        Self {
            cagnotte: summary.cagnotte.into(),
            total_raised: summary.total_raised,
            donation_count: summary.donation_count,
            progress_percent,
            ended,
        }
    }
}

// ============================================================================
// Donations
// ============================================================================

/// POST /api/cagnottes/{id}/donations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateRequest {
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub amount: i64,
}

impl From<DonateRequest> for DonateInput {
    fn from(req: DonateRequest) -> Self {
        Self {
            donor_name: req.donor_name,
            message: req.message,
            amount: req.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: String,
    pub cagnotte_id: String,
    /// `null` for anonymous donors
    pub donor_name: Option<String>,
    pub message: Option<String>,
    pub amount: i64,
    pub payment_reference: String,
    pub created_at: DateTime<Utc>,
}

impl From<Donation> for DonationResponse {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id.to_string(),
            cagnotte_id: d.cagnotte_id.to_string(),
            donor_name: d.donor_name,
            message: d.message,
            amount: d.amount.value(),
            payment_reference: d.payment_reference.as_str().to_string(),
            created_at: d.created_at,
        }
    }
}

// ============================================================================
// Updates
// ============================================================================

/// POST /api/me/cagnottes/{id}/updates
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateRequest {
    pub title: String,
    pub body: String,
}

impl From<PostUpdateRequest> for PostUpdateInput {
    fn from(req: PostUpdateRequest) -> Self {
        Self {
            title: req.title,
            body: req.body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub id: String,
    pub cagnotte_id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CagnotteUpdate> for UpdateResponse {
    fn from(u: CagnotteUpdate) -> Self {
        Self {
            id: u.id.to_string(),
            cagnotte_id: u.cagnotte_id.to_string(),
            author_id: u.author_id.to_string(),
            title: u.title.as_str().to_string(),
            body: u.body,
            created_at: u.created_at,
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketResponse {
    pub label: &'static str,
    pub count: i64,
}

impl From<BucketCount> for BucketResponse {
    fn from(b: BucketCount) -> Self {
        Self {
            label: b.bucket.label(),
            count: b.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPointResponse {
    pub week_start: DateTime<Utc>,
    pub amount: i64,
    pub cumulative: i64,
}

impl From<WeeklyPoint> for WeeklyPointResponse {
    fn from(p: WeeklyPoint) -> Self {
        Self {
            week_start: p.week_start,
            amount: p.amount,
            cumulative: p.cumulative,
        }
    }
}

/// GET /api/cagnottes/{id}/stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub cagnotte_id: String,
    pub goal_amount: i64,
    pub currency: String,
    pub total_raised: i64,
    pub donation_count: i64,
    pub average_donation: i64,
    pub progress_percent: f64,
    pub buckets: Vec<BucketResponse>,
    pub weekly: Vec<WeeklyPointResponse>,
}

impl From<CagnotteStats> for StatsResponse {
    fn from(stats: CagnotteStats) -> Self {
        let average_donation = stats.average_donation();
        let progress_percent = stats.summary.progress_percent();
        let cagnotte = &stats.summary.cagnotte;
        Self {
            cagnotte_id: cagnotte.id.to_string(),
            goal_amount: cagnotte.goal_amount.value(),
            currency: cagnotte.currency.as_str().to_string(),
            total_raised: stats.summary.total_raised,
            donation_count: stats.summary.donation_count,
            average_donation,
            progress_percent,
            buckets: stats.buckets.into_iter().map(Into::into).collect(),
            weekly: stats.weekly.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let absent: UpdateCagnotteRequest = serde_json::from_str(r#"{"title":"Nouveau"}"#).unwrap();
        assert!(absent.image_url.is_none());
        assert!(absent.ends_at.is_none());

        let cleared: UpdateCagnotteRequest =
            serde_json::from_str(r#"{"imageUrl":null,"endsAt":null}"#).unwrap();
        assert_eq!(cleared.image_url, Some(None));
        assert_eq!(cleared.ends_at, Some(None));

        let set: UpdateCagnotteRequest =
            serde_json::from_str(r#"{"imageUrl":"https://img.example/a.png"}"#).unwrap();
        assert_eq!(set.image_url, Some(Some("https://img.example/a.png".to_string())));
    }

    #[test]
    fn test_page_query_accepts_both_spellings() {
        let camel: PageQuery = serde_json::from_str(r#"{"page":2,"perPage":5}"#).unwrap();
        let snake: PageQuery = serde_json::from_str(r#"{"page":2,"per_page":5}"#).unwrap();
        assert_eq!(camel.per_page, Some(5));
        assert_eq!(snake.per_page, Some(5));
    }
}
