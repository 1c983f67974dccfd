//! Query-parameter marshaling for the list and search endpoints.
//!
//! [`SearchParams`] and [`RelmonListParams`] turn typed arguments into ordered
//! query pairs. Encoding into a query string is left to
//! [`ApiRequest`](crate::ApiRequest).
//!
//! # Example
//!
//! ```rust
//! use pdmv_base::query::SearchParams;
//!
//! let params = SearchParams::new()
//!     .limit(50)
//!     .filter("status", "submitted")
//!     .filter("campaign", vec!["CMSSW_14_0", "CMSSW_14_1"]);
//!
//! let pairs = params.to_query("relvals");
//! assert_eq!(pairs[2], ("limit".to_string(), "50".to_string()));
//! assert_eq!(pairs[4], ("campaign".to_string(), "CMSSW_14_0,CMSSW_14_1".to_string()));
//! ```

use std::collections::{BTreeSet, HashSet};

/// Smallest page size the search endpoint accepts.
pub const SEARCH_LIMIT_MIN: i64 = 1;

/// Largest page size the search endpoint accepts.
pub const SEARCH_LIMIT_MAX: i64 = 500;

/// Page size used by search when none is given.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Value of a single search filter.
///
/// List elements are joined with `,` without escaping, so an element that
/// itself contains a comma is indistinguishable from two elements on the
/// server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Not sent at all.
    Absent,
    /// Sent as-is.
    Scalar(String),
    /// Sent comma-joined.
    List(Vec<String>),
}

impl FilterValue {
    /// Wire value, or `None` when the filter is absent.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            FilterValue::Absent => None,
            FilterValue::Scalar(s) => Some(s.clone()),
            FilterValue::List(items) => Some(items.join(",")),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FilterValue::Absent)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Scalar(value.to_string())
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(value: $t) -> Self {
                    FilterValue::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize);

impl From<f64> for FilterValue {
    // Whole numbers keep a trailing `.0`.
    fn from(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
            FilterValue::Scalar(format!("{:.1}", value))
        } else {
            FilterValue::Scalar(value.to_string())
        }
    }
}

impl From<bool> for FilterValue {
    // Capitalized, matching what the services have always received.
    fn from(value: bool) -> Self {
        FilterValue::Scalar(if value { "True" } else { "False" }.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Absent, Into::into)
    }
}

impl<T: ToString> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for FilterValue {
    fn from(values: &[T]) -> Self {
        FilterValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for FilterValue {
    fn from(values: [T; N]) -> Self {
        FilterValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<BTreeSet<T>> for FilterValue {
    fn from(values: BTreeSet<T>) -> Self {
        FilterValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, S> From<HashSet<T, S>> for FilterValue {
    fn from(values: HashSet<T, S>) -> Self {
        FilterValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Named search filters in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    entries: Vec<(String, FilterValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter. Setting an existing key replaces its value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Query pairs for every filter that is not absent.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.to_query_value().map(|v| (k.clone(), v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}

/// Arguments of the RelVal search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Page number, sent verbatim.
    pub page: i64,
    /// Page size, clamped into `[1, 500]` when sent.
    pub limit: i64,
    /// Sort field.
    pub sort: Option<String>,
    /// Sort direction.
    pub sort_asc: Option<bool>,
    /// Field filters.
    pub filters: Filters,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            page: 0,
            limit: DEFAULT_SEARCH_LIMIT,
            sort: None,
            sort_asc: None,
            filters: Filters::new(),
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    pub fn sort_asc(mut self, ascending: bool) -> Self {
        self.sort_asc = Some(ascending);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key, value);
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Page size actually sent.
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(SEARCH_LIMIT_MIN, SEARCH_LIMIT_MAX)
    }

    /// Fold filters named after the fixed keys into the typed fields.
    ///
    /// `page` and `limit` must parse as integers, `sort_asc` as a boolean;
    /// values that do not are dropped. A `db_name` filter is always dropped,
    /// the database is chosen by the caller of [`to_query`](Self::to_query).
    pub fn resolved(&self) -> SearchParams {
        let mut resolved = SearchParams {
            filters: Filters::new(),
            ..self.clone()
        };

        for (key, value) in &self.filters.entries {
            let scalar = match value {
                FilterValue::Scalar(s) => Some(s.trim()),
                _ => None,
            };
            match key.as_str() {
                "db_name" => {}
                "page" => {
                    if let Some(page) = scalar.and_then(|s| s.parse().ok()) {
                        resolved.page = page;
                    }
                }
                "limit" => {
                    if let Some(limit) = scalar.and_then(|s| s.parse().ok()) {
                        resolved.limit = limit;
                    }
                }
                "sort" => {
                    if let Some(sort) = scalar {
                        resolved.sort = Some(sort.to_string());
                    }
                }
                "sort_asc" => {
                    if let Some(ascending) = scalar.and_then(parse_bool) {
                        resolved.sort_asc = Some(ascending);
                    }
                }
                _ => resolved.filters.entries.push((key.clone(), value.clone())),
            }
        }

        resolved
    }

    /// Query pairs: `db_name, page, limit, [sort], [sort_asc], <filters>`.
    pub fn to_query(&self, db_name: &str) -> Vec<(String, String)> {
        let params = self.resolved();

        let mut pairs = vec![
            ("db_name".to_string(), db_name.to_string()),
            ("page".to_string(), params.page.to_string()),
            ("limit".to_string(), params.clamped_limit().to_string()),
        ];

        if let Some(sort) = params.sort {
            pairs.push(("sort".to_string(), sort));
        }

        if let Some(ascending) = params.sort_asc {
            let value = if ascending { "true" } else { "false" };
            pairs.push(("sort_asc".to_string(), value.to_string()));
        }

        pairs.extend(params.filters.to_pairs());
        pairs
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Arguments of the RelMonService list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelmonListParams {
    /// Page number, sent verbatim.
    pub page: i64,
    /// Page size, sent unclamped when present.
    pub limit: Option<i64>,
    /// Free-text query; empty means absent.
    pub query: Option<String>,
}

impl RelmonListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Query pairs: `page, [limit], [q]`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("page".to_string(), self.page.to_string())];
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q".to_string(), query.to_string()));
        }
        pairs
    }
}
