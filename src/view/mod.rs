//! Member list engine.
//!
//! Turns the flat member collection into the rows a table shows: free-text
//! search, role and team facet filters, and stable column sorting. The
//! derived view is recomputed synchronously on every change, in pipeline
//! order sort first, then filter. Membership of the final set never depends
//! on that order; only the observable row order does.

mod query;

pub use query::ViewQuery;

use std::collections::BTreeSet;

use crate::models::Member;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Status,
    Role,
    Email,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Status => "status",
            SortKey::Role => "role",
            SortKey::Email => "email",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SortKey::Name),
            "status" => Some(SortKey::Status),
            "role" => Some(SortKey::Role),
            "email" => Some(SortKey::Email),
            _ => None,
        }
    }

    fn field<'a>(self, member: &'a Member) -> &'a str {
        match self {
            SortKey::Name => &member.name,
            SortKey::Status => &member.status,
            SortKey::Role => &member.role,
            SortKey::Email => &member.email,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// A sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

/// Facet selections. An empty set leaves that facet inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetFilters {
    pub roles: BTreeSet<String>,
    pub teams: BTreeSet<String>,
}

impl FacetFilters {
    /// True when the member passes both facets: its role is among the
    /// selected roles (or none are selected), and at least one of its teams
    /// is among the selected teams (or none are selected).
    pub fn admits(&self, member: &Member) -> bool {
        (self.roles.is_empty() || self.roles.contains(&member.role))
            && (self.teams.is_empty() || member.teams.iter().any(|t| self.teams.contains(t)))
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.teams.is_empty()
    }
}

/// In-memory list engine backing a member table.
///
/// Holds the full fetched collection plus the current [`ViewQuery`], and
/// keeps a cached index of which members the table shows, in which order.
#[derive(Debug, Default)]
pub struct MemberList {
    members: Vec<Member>,
    query: ViewQuery,
    view: Vec<usize>,
}

impl MemberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held collection wholesale.
    pub fn set_members(&mut self, members: Vec<Member>) {
        self.members = members;
        self.recompute();
    }

    /// Set the free-text search term. Matching is case-insensitive substring
    /// containment against every top-level member field.
    pub fn set_search_term(&mut self, term: &str) {
        self.query.search = term.to_string();
        self.recompute();
    }

    pub fn set_facet_filters(&mut self, filters: FacetFilters) {
        self.query.filters = filters;
        self.recompute();
    }

    pub fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.query.sort = Some(SortSpec { key, order });
        self.recompute();
    }

    /// Header-click behavior: a second click on the column already sorted
    /// ascending flips it to descending; anything else starts ascending.
    pub fn request_sort(&mut self, key: SortKey) {
        let order = match self.query.sort {
            Some(SortSpec {
                key: current,
                order: SortOrder::Asc,
            }) if current == key => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        self.set_sort(key, order);
    }

    /// Replace all view criteria at once, as when restoring a shared link.
    pub fn set_query(&mut self, query: ViewQuery) {
        self.query = query;
        self.recompute();
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// The full held collection, unfiltered.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// The derived view: sorted, then searched and facet-filtered.
    pub fn rows(&self) -> Vec<&Member> {
        self.view.iter().map(|&i| &self.members[i]).collect()
    }

    fn recompute(&mut self) {
        let mut order: Vec<usize> = (0..self.members.len()).collect();

        if let Some(sort) = self.query.sort {
            // Stable sort; members comparing equal keep their stored order
            // in both directions.
            order.sort_by(|&a, &b| {
                let cmp = sort
                    .key
                    .field(&self.members[a])
                    .cmp(sort.key.field(&self.members[b]));
                match sort.order {
                    SortOrder::Asc => cmp,
                    SortOrder::Desc => cmp.reverse(),
                }
            });
        }

        let needle = self.query.search.to_lowercase();
        order.retain(|&i| {
            let member = &self.members[i];
            matches_search(member, &needle) && self.query.filters.admits(member)
        });

        self.view = order;
    }
}

fn matches_search(member: &Member, needle: &str) -> bool {
    needle.is_empty()
        || member
            .search_texts()
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
}
