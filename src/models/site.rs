//! Target site definition.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// One job board (usually one city) to paginate through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    /// Short identifier (e.g. "boston")
    pub name: String,

    /// Origin that relative job links are appended to
    pub base_url: String,

    /// Listing URL prefix; the page number is appended to it
    pub listing_url: String,
}

impl Site {
    /// URL of listing page `page`.
    pub fn listing_page_url(&self, page: u32) -> String {
        format!("{}{}", self.listing_url, page)
    }

    /// Check that the name is set and both URLs parse.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("site name is empty"));
        }
        Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("site '{}': bad base_url: {e}", self.name)))?;
        Url::parse(&self.listing_page_url(0)).map_err(|e| {
            AppError::config(format!("site '{}': bad listing_url: {e}", self.name))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site {
            name: "austin".to_string(),
            base_url: "https://www.builtinaustin.com".to_string(),
            listing_url: "https://www.builtinaustin.com/jobs?page=".to_string(),
        }
    }

    #[test]
    fn test_listing_page_url() {
        assert_eq!(
            site().listing_page_url(0),
            "https://www.builtinaustin.com/jobs?page=0"
        );
        assert_eq!(
            site().listing_page_url(12),
            "https://www.builtinaustin.com/jobs?page=12"
        );
    }

    #[test]
    fn test_validate_rejects_relative_base() {
        let mut site = site();
        site.base_url = "builtinaustin".to_string();
        assert!(site.validate().is_err());
        assert!(self::site().validate().is_ok());
    }

    #[test]
    fn test_bad_listing_url_names_the_site() {
        let mut site = site();
        site.listing_url = "jobs?page=".to_string();
        let err = site.validate().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("site 'austin': bad listing_url"));
    }
}
