//! View-state <-> query-string mapping.
//!
//! One function pair owns the whole mapping, so the page location and the
//! engine state can never disagree about which parameter means what.

use url::form_urlencoded;

use super::{FacetFilters, SortKey, SortOrder, SortSpec};

/// The three independent view criteria as one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub search: String,
    pub filters: FacetFilters,
    pub sort: Option<SortSpec>,
}

impl ViewQuery {
    /// Encode as `query=..&role=..&team=..&sortKey=..&sortOrder=..`,
    /// omitting inactive criteria. Repeated `role`/`team` parameters carry
    /// multi-selections.
    pub fn to_query_string(&self) -> String {
        let mut encoder = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            encoder.append_pair("query", &self.search);
        }
        for role in &self.filters.roles {
            encoder.append_pair("role", role);
        }
        for team in &self.filters.teams {
            encoder.append_pair("team", team);
        }
        if let Some(sort) = self.sort {
            encoder.append_pair("sortKey", sort.key.as_str());
            encoder.append_pair("sortOrder", sort.order.as_str());
        }
        encoder.finish()
    }

    /// Decode a saved or shared query string, with or without the leading
    /// `?`. Unknown parameters and unknown sort values are ignored; a sort
    /// key without an order (or the reverse) leaves the sort unset.
    pub fn from_query_string(input: &str) -> Self {
        let mut query = ViewQuery::default();
        let mut sort_key = None;
        let mut sort_order = None;

        for (name, value) in form_urlencoded::parse(input.trim_start_matches('?').as_bytes()) {
            match name.as_ref() {
                "query" => query.search = value.into_owned(),
                "role" => {
                    query.filters.roles.insert(value.into_owned());
                }
                "team" => {
                    query.filters.teams.insert(value.into_owned());
                }
                "sortKey" => sort_key = SortKey::parse(&value),
                "sortOrder" => sort_order = SortOrder::parse(&value),
                _ => {}
            }
        }

        if let (Some(key), Some(order)) = (sort_key, sort_order) {
            query.sort = Some(SortSpec { key, order });
        }
        query
    }
}
