use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Draft,
    Active,
    Sold,
    Archived,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListingCreate {
    #[validate(length(min = 3, max = 120))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    /// ISO 4217 code, e.g. `EUR`.
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListingUpdate {
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub category: Option<String>,
    pub status: ListingStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// `GET /api/listings` filters and paging.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_price_range"))]
pub struct ListingQuery {
    #[validate(length(max = 200))]
    pub q: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0))]
    pub max_price: Option<i64>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100))]
    pub per_page: u32,
}

fn validate_price_range(query: &ListingQuery) -> Result<(), ValidationError> {
    match (query.min_price, query.max_price) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("price_range")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListingImageCreate {
    #[validate(url)]
    pub url: String,
    #[validate(length(max = 200))]
    pub alt_text: Option<String>,
    #[serde(default)]
    #[validate(range(max = 19))]
    pub position: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingImageResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub position: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(json: serde_json::Value) -> ListingQuery {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_listing_create_rules() {
        let listing: ListingCreate = serde_json::from_value(serde_json::json!({
            "title": "Road bike",
            "price_cents": 45000,
            "currency": "EUR"
        }))
        .unwrap();
        assert!(listing.validate().is_ok());
        assert!(listing.description.is_empty());

        let bad: ListingCreate = serde_json::from_value(serde_json::json!({
            "title": "ok",
            "price_cents": -1,
            "currency": "EURO"
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price_cents"));
        assert!(fields.contains_key("currency"));
    }

    #[test]
    fn test_query_defaults() {
        let q = query(serde_json::json!({}));
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 20);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_query_rejects_inverted_price_range() {
        let q = query(serde_json::json!({"min_price": 500, "max_price": 100}));
        let errors = q.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));

        let q = query(serde_json::json!({"min_price": 100, "max_price": 100}));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_query_page_bounds() {
        assert!(query(serde_json::json!({"page": 0})).validate().is_err());
        assert!(query(serde_json::json!({"per_page": 101})).validate().is_err());
    }

    #[test]
    fn test_listing_update_status_parses() {
        let update: ListingUpdate =
            serde_json::from_value(serde_json::json!({"status": "sold"})).unwrap();
        assert_eq!(update.status, Some(ListingStatus::Sold));
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_image_position_bound() {
        let image: ListingImageCreate = serde_json::from_value(serde_json::json!({
            "url": "https://cdn.example.com/1.jpg",
            "position": 20
        }))
        .unwrap();
        assert!(image.validate().unwrap_err().field_errors().contains_key("position"));
    }
}
