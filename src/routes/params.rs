use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SweetSortBy {
    CreatedAt,
    Name,
    Price,
    Quantity,
}

/// Storefront price buckets, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum PriceRange {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under_5")]
    Under5,
    #[serde(rename = "5_10")]
    From5To10,
    #[serde(rename = "10_20")]
    From10To20,
    #[serde(rename = "20_plus")]
    Over20,
}

impl PriceRange {
    /// Inclusive lower bound and exclusive upper bound.
    pub fn bounds(self) -> (Option<i64>, Option<i64>) {
        match self {
            PriceRange::All => (None, None),
            PriceRange::Under5 => (None, Some(500)),
            PriceRange::From5To10 => (Some(500), Some(1000)),
            PriceRange::From10To20 => (Some(1000), Some(2000)),
            PriceRange::Over20 => (Some(2000), None),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SweetQuery {
    /// Case-insensitive match on name, category or description.
    pub q: Option<String>,
    /// Exact category; `all` disables the filter.
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    /// Inclusive, minor units.
    pub min_price: Option<i64>,
    /// Inclusive, minor units.
    pub max_price: Option<i64>,
    /// Only sweets with at least one unit on hand.
    pub in_stock: Option<bool>,
    pub sort_by: Option<SweetSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl SweetQuery {
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchaseQuery {
    /// Ordering by purchase time, newest first by default.
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminPurchaseQuery {
    pub user_id: Option<Uuid>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockQuery {
    /// Sweets with fewer units than this are low on stock. Defaults to 10.
    pub threshold: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_buckets_match_storefront_filters() {
        assert_eq!(PriceRange::All.bounds(), (None, None));
        assert_eq!(PriceRange::Under5.bounds(), (None, Some(500)));
        assert_eq!(PriceRange::From5To10.bounds(), (Some(500), Some(1000)));
        assert_eq!(PriceRange::From10To20.bounds(), (Some(1000), Some(2000)));
        assert_eq!(PriceRange::Over20.bounds(), (Some(2000), None));
    }

    #[test]
    fn price_range_parses_from_query_values() {
        let parsed: PriceRange = serde_json::from_str("\"5_10\"").unwrap();
        assert_eq!(parsed, PriceRange::From5To10);
        let parsed: PriceRange = serde_json::from_str("\"20_plus\"").unwrap();
        assert_eq!(parsed, PriceRange::Over20);
    }

    #[test]
    fn category_all_means_no_filter() {
        let query = SweetQuery {
            category: Some("All".into()),
            ..SweetQuery::default()
        };
        assert_eq!(query.category_filter(), None);

        let query = SweetQuery {
            category: Some(" Cake ".into()),
            ..SweetQuery::default()
        };
        assert_eq!(query.category_filter(), Some("Cake"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = SweetQuery {
            q: Some("   ".into()),
            ..SweetQuery::default()
        };
        assert_eq!(query.search_term(), None);
    }
}
