//! # Review Query Builder
//!
//! Translates optional review filter parameters into a store predicate and
//! ordering.
//!
//! - `reviewerEmail`, `location`: exact match
//! - `foodName`: case-insensitive literal substring
//! - `search`: case-insensitive literal substring on `foodName` OR `restaurantName`
//! - `minRating`: inclusive numeric lower bound; non-numeric values are ignored
//! - `sort`: `newest` (default), `oldest`, `rating_high`, `rating_low`
//!
//! Absent or blank parameters impose no constraint. Present parameters are
//! combined with AND.

use serde::Deserialize;

use crate::store::filter::{Filter, FilterExpr, SortSpec};
use crate::store::reviews::fields;

use super::errors::{QueryError, QueryResult};

/// Number of reviews in the featured view
pub const FEATURED_LIMIT: usize = 6;

/// Raw filter parameters as received from the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilters {
    pub reviewer_email: Option<String>,
    pub food_name: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub min_rating: Option<String>,
    pub sort: Option<String>,
}

/// Review ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Date descending
    #[default]
    Newest,
    /// Date ascending
    Oldest,
    /// Rating descending
    RatingHigh,
    /// Rating ascending
    RatingLow,
}

impl SortOrder {
    /// Parse a sort parameter. Unknown values fall back to `Newest`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("oldest") => SortOrder::Oldest,
            Some("rating_high") => SortOrder::RatingHigh,
            Some("rating_low") => SortOrder::RatingLow,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::RatingHigh => "rating_high",
            SortOrder::RatingLow => "rating_low",
        }
    }

    pub fn sort_spec(&self) -> SortSpec {
        match self {
            SortOrder::Newest => SortSpec::desc(fields::DATE),
            SortOrder::Oldest => SortSpec::asc(fields::DATE),
            SortOrder::RatingHigh => SortSpec::desc(fields::RATING),
            SortOrder::RatingLow => SortSpec::asc(fields::RATING),
        }
    }
}

/// A predicate and ordering ready for `ReviewStore::list`
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub filter: Filter,
    pub sort: SortSpec,
    pub limit: Option<usize>,
}

impl ReviewQuery {
    /// Build a query from caller-supplied filters
    pub fn build(params: &ReviewFilters) -> QueryResult<Self> {
        let mut filter = Filter::All;

        if let Some(email) = present(&params.reviewer_email) {
            filter = filter.and(FilterExpr::eq(fields::REVIEWER_EMAIL, email));
        }

        if let Some(food_name) = present(&params.food_name) {
            filter = filter.and(contains(fields::FOOD_NAME, "foodName", food_name)?);
        }

        if let Some(search) = present(&params.search) {
            filter = filter.and(Filter::any_of([
                contains(fields::FOOD_NAME, "search", search)?,
                contains(fields::RESTAURANT_NAME, "search", search)?,
            ]));
        }

        if let Some(location) = present(&params.location) {
            filter = filter.and(FilterExpr::eq(fields::LOCATION, location));
        }

        if let Some(min_rating) = params.min_rating.as_deref().and_then(parse_rating) {
            filter = filter.and(FilterExpr::gte(fields::RATING, min_rating));
        }

        Ok(Self {
            filter,
            sort: SortOrder::from_param(params.sort.as_deref()).sort_spec(),
            limit: None,
        })
    }

    /// The featured view: every review, highest rated first, top six
    pub fn featured() -> Self {
        Self {
            filter: Filter::All,
            sort: SortOrder::RatingHigh.sort_spec(),
            limit: Some(FEATURED_LIMIT),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn contains(field: &str, param: &'static str, text: &str) -> QueryResult<FilterExpr> {
    FilterExpr::contains(field, text).map_err(|_| QueryError::FilterTooLong { field: param })
}

fn parse_rating(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
