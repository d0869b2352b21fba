//! Application Configuration
//!
//! Configuration for the cagnotte application layer.

use crate::domain::value_objects::Pagination;

/// Cagnotte application configuration
#[derive(Debug, Clone)]
pub struct CagnotteConfig {
    /// Page size when the client does not ask for one
    pub default_per_page: u32,
    /// Largest page size a client may ask for
    pub max_per_page: u32,
    /// Currency for cagnottes created without one
    pub default_currency: String,
}

impl Default for CagnotteConfig {
    fn default() -> Self {
        Self {
            default_per_page: 12,
            max_per_page: 50,
            default_currency: "XOF".to_string(),
        }
    }
}

impl CagnotteConfig {
    /// Normalize client paging parameters
    pub fn pagination(&self, page: Option<u32>, per_page: Option<u32>) -> Pagination {
        Pagination::new(page, per_page, self.default_per_page, self.max_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let config = CagnotteConfig::default();
        let p = config.pagination(None, None);
        assert_eq!((p.page(), p.per_page()), (1, 12));
        assert_eq!(config.pagination(Some(2), Some(51)).per_page(), 50);
    }
}
