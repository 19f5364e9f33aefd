//! # Document Predicates and Ordering
//!
//! Filter expressions evaluated against JSON documents, plus the sort
//! ordering used by `Collection::find`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Comparison applied to a single field
#[derive(Debug, Clone)]
pub enum FilterOperator {
    /// Field equals the value exactly
    Eq(Value),

    /// Numeric field is greater than or equal to the bound
    Gte(f64),

    /// String field matches the pattern
    Matches(Regex),
}

/// A single-field filter expression
#[derive(Debug, Clone)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            field: field.into(),
            operator,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq(value.into()))
    }

    /// Create an inclusive lower-bound filter
    pub fn gte(field: impl Into<String>, bound: f64) -> Self {
        Self::new(field, FilterOperator::Gte(bound))
    }

    /// Create a case-insensitive substring filter.
    ///
    /// Every regex metacharacter in `text` is escaped, so `"Pho*"` matches the
    /// literal text `Pho*` and nothing else.
    pub fn contains(field: impl Into<String>, text: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()?;
        Ok(Self::new(field, FilterOperator::Matches(pattern)))
    }

    /// Check if a document matches this filter
    pub fn matches(&self, doc: &Value) -> bool {
        let field_value = match doc.get(&self.field) {
            Some(v) => v,
            None => return false,
        };

        match &self.operator {
            FilterOperator::Eq(value) => field_value == value,
            FilterOperator::Gte(bound) => field_value.as_f64().is_some_and(|v| v >= *bound),
            FilterOperator::Matches(pattern) => field_value
                .as_str()
                .is_some_and(|text| pattern.is_match(text)),
        }
    }
}

/// A predicate tree over documents
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Matches every document
    #[default]
    All,

    /// Single field condition
    Expr(FilterExpr),

    /// Every child must match
    And(Vec<Filter>),

    /// At least one child must match
    Or(Vec<Filter>),
}

impl Filter {
    /// Conjoin another filter, flattening nested conjunctions
    pub fn and(self, other: impl Into<Filter>) -> Self {
        match (self, other.into()) {
            (Filter::All, other) => other,
            (this, Filter::All) => this,
            (Filter::And(mut children), other) => {
                children.push(other);
                Filter::And(children)
            }
            (this, other) => Filter::And(vec![this, other]),
        }
    }

    /// Disjunction of the given filters
    pub fn any_of(filters: impl IntoIterator<Item = impl Into<Filter>>) -> Self {
        Filter::Or(filters.into_iter().map(Into::into).collect())
    }

    /// Check if a document matches this predicate
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Expr(expr) => expr.matches(doc),
            Filter::And(children) => children.iter().all(|f| f.matches(doc)),
            Filter::Or(children) => children.iter().any(|f| f.matches(doc)),
        }
    }
}

impl From<FilterExpr> for Filter {
    fn from(expr: FilterExpr) -> Self {
        Filter::Expr(expr)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Single-field sort order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Sorts documents in place.
    ///
    /// The sort is stable: documents comparing equal keep their storage order.
    pub fn sort(&self, documents: &mut [Value]) {
        documents.sort_by(|a, b| {
            let ordering = compare_values(a.get(&self.field), b.get(&self.field));
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// Compares two JSON values for sorting.
///
/// Missing values sort first. Strings that both parse as RFC 3339 timestamps
/// compare chronologically, other strings lexicographically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => match (parse_time(a), parse_time(b)) {
            (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
            _ => a.cmp(b),
        },
        (Some(a), Some(b)) => type_rank(a).cmp(&type_rank(b)),
    }
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filter() {
        let filter = FilterExpr::eq("location", "Dhaka");

        assert!(filter.matches(&json!({"location": "Dhaka"})));
        assert!(!filter.matches(&json!({"location": "dhaka"})));
        assert!(!filter.matches(&json!({"name": "Dhaka"})));
    }

    #[test]
    fn test_gte_filter_is_inclusive() {
        let filter = FilterExpr::gte("rating", 4.0);

        assert!(filter.matches(&json!({"rating": 4})));
        assert!(filter.matches(&json!({"rating": 4.5})));
        assert!(!filter.matches(&json!({"rating": 3.9})));
        assert!(!filter.matches(&json!({"rating": "5"})));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let filter = FilterExpr::contains("foodName", "pho").unwrap();

        assert!(filter.matches(&json!({"foodName": "Pho Bo"})));
        assert!(filter.matches(&json!({"foodName": "Best PHO in town"})));
        assert!(!filter.matches(&json!({"foodName": "Ramen"})));
    }

    #[test]
    fn test_contains_escapes_metacharacters() {
        let filter = FilterExpr::contains("foodName", "Pho*").unwrap();
        assert!(filter.matches(&json!({"foodName": "Pho* special"})));
        assert!(!filter.matches(&json!({"foodName": "Phooo"})));
        assert!(!filter.matches(&json!({"foodName": "Ph"})));

        let filter = FilterExpr::contains("foodName", "a.c").unwrap();
        assert!(filter.matches(&json!({"foodName": "a.c"})));
        assert!(!filter.matches(&json!({"foodName": "abc"})));

        let filter = FilterExpr::contains("foodName", "(Pho|Ramen)").unwrap();
        assert!(!filter.matches(&json!({"foodName": "Ramen"})));
        assert!(filter.matches(&json!({"foodName": "Combo (Pho|Ramen)"})));
    }

    #[test]
    fn test_and_or_composition() {
        let filter = Filter::All
            .and(FilterExpr::eq("location", "Dhaka"))
            .and(Filter::any_of([
                FilterExpr::contains("foodName", "burger").unwrap(),
                FilterExpr::contains("restaurantName", "burger").unwrap(),
            ]));

        assert!(filter.matches(&json!({
            "location": "Dhaka", "foodName": "Cheese Burger", "restaurantName": "X"
        })));
        assert!(filter.matches(&json!({
            "location": "Dhaka", "foodName": "Fries", "restaurantName": "Burger Hut"
        })));
        assert!(!filter.matches(&json!({
            "location": "Sylhet", "foodName": "Cheese Burger", "restaurantName": "X"
        })));
        assert!(!filter.matches(&json!({
            "location": "Dhaka", "foodName": "Fries", "restaurantName": "Chip Shop"
        })));
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(Filter::All.matches(&json!({})));
        assert!(matches!(Filter::All.and(Filter::All), Filter::All));
    }

    #[test]
    fn test_sort_numbers_descending_is_stable() {
        let mut docs = vec![
            json!({"id": "a", "rating": 3}),
            json!({"id": "b", "rating": 5}),
            json!({"id": "c", "rating": 3}),
            json!({"id": "d", "rating": 4.5}),
        ];
        SortSpec::desc("rating").sort(&mut docs);

        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_timestamps_chronologically() {
        let mut docs = vec![
            json!({"id": "late", "date": "2024-05-01T10:00:00Z"}),
            json!({"id": "fraction", "date": "2024-05-01T09:00:00.500Z"}),
            json!({"id": "early", "date": "2024-05-01T09:00:00Z"}),
        ];
        SortSpec::asc("date").sort(&mut docs);

        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["early", "fraction", "late"]);
    }

    #[test]
    fn test_missing_field_sorts_first() {
        let mut docs = vec![json!({"id": "rated", "rating": 1}), json!({"id": "unrated"})];
        SortSpec::asc("rating").sort(&mut docs);
        assert_eq!(docs[0]["id"], "unrated");
    }
}
