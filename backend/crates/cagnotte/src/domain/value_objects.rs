//! Domain Value Objects
//!
//! Validated, immutable values for the cagnotte domain.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Serialize;
use thiserror::Error;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 5_000;
pub const DONOR_NAME_MAX_CHARS: usize = 80;
pub const MESSAGE_MAX_CHARS: usize = 500;
pub const UPDATE_BODY_MAX_CHARS: usize = 10_000;
pub const IMAGE_URL_MAX_CHARS: usize = 2_048;
/// Upper bound for a single goal or donation, in whole currency units
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Rejected input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must be between 3 and 120 characters")]
    TitleLength,

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Amount must be a positive whole number")]
    AmountNotPositive,

    #[error("Amount must not exceed {MAX_AMOUNT}")]
    AmountTooLarge,

    #[error("Currency must be a 3-letter code")]
    InvalidCurrency,

    #[error("Image URL must be an http(s) URL")]
    InvalidImageUrl,

    #[error("End date must be in the future")]
    EndsInPast,
}

/// Cagnotte or update title, trimmed, 3 to 120 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let title = raw.trim();
        let len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
            return Err(ValidationError::TitleLength);
        }
        Ok(Self(title.to_string()))
    }

    pub fn from_db(title: String) -> Self {
        Self(title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Positive amount in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::AmountNotPositive);
        }
        if value > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge);
        }
        Ok(Self(value))
    }

    pub fn from_db(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ISO-4217 style currency code, stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(Self(code))
    }

    pub fn from_db(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trimmed optional free text; blank means absent
pub fn optional_text(
    raw: Option<&str>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(Some(text.to_string()))
}

/// Trimmed required free text
pub fn required_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    optional_text(Some(raw), field, max)?.ok_or(ValidationError::Empty(field))
}

/// Optional image URL; only http(s) links are stored
pub fn image_url(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let url = optional_text(raw, "Image URL", IMAGE_URL_MAX_CHARS)?;
    match url {
        Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
            Err(ValidationError::InvalidImageUrl)
        }
        url => Ok(url),
    }
}

/// Page request, normalized
///
/// `page` is at least 1; `per_page` is clamped to `1..=max_per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32, max_per_page: u32) -> Self {
        let max_per_page = max_per_page.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, max_per_page),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Number of pages for `total` rows; zero rows is zero pages
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let per_page = i64::from(self.per_page);
        (total + per_page - 1) / per_page
    }
}

/// One page of results plus the total row count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        self.pagination.total_pages(self.total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
            total: self.total,
        }
    }
}

/// Reference of a simulated payment, `SIM-` followed by 12 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    pub const PREFIX: &'static str = "SIM-";
    const RANDOM_LEN: usize = 12;

    pub fn generate() -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(Self::RANDOM_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Self(format!("{}{}", Self::PREFIX, suffix))
    }

    pub fn from_db(reference: String) -> Self {
        Self(reference)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
