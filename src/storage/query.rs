//! Typed query expressions
//!
//! A closed set of filters, sort keys and pagination built from validated
//! request input. Nothing from the request is passed through untyped.

use std::cmp::Ordering;

// == Fields ==
/// Text fields that filters may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Address,
    Name,
    Symbol,
    VotePubkey,
    NodePubkey,
    Hash,
}

/// Records that expose text fields to filters.
pub trait Filterable {
    /// Value of `field`, or `None` when the record has no such field.
    fn field(&self, field: Field) -> Option<&str>;
}

// == Filters ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Exact, case-sensitive match
    Equals(Field, String),
    /// Case-insensitive substring match
    ContainsInsensitive(Field, String),
}

impl Filter {
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Filter::Equals(field, expected) => record.field(*field) == Some(expected.as_str()),
            Filter::ContainsInsensitive(field, needle) => record
                .field(*field)
                .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

// == Criteria ==
/// Disjunction of filters. No filters means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    any_of: Vec<Filter>,
}

impl Criteria {
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an alternative.
    pub fn or(mut self, filter: Filter) -> Self {
        self.any_of.push(filter);
        self
    }

    /// Case-insensitive substring search over several fields.
    pub fn text_search(term: &str, fields: &[Field]) -> Self {
        fields.iter().fold(Self::all(), |criteria, field| {
            criteria.or(Filter::ContainsInsensitive(*field, term.to_string()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.any_of.is_empty()
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.any_of.is_empty() || self.any_of.iter().any(|f| f.matches(record))
    }
}

// == Sort ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSort {
    CreatedAt,
    TotalSupply,
    Holders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSort {
    CreatedAt,
    Name,
    Symbol,
    TotalVolume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorSort {
    /// Order reported by the node
    Natural,
    Stake,
    Commission,
}

// == Page ==
pub const MAX_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: MAX_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Slices an already ordered sequence.
    pub fn slice<T, I: IntoIterator<Item = T>>(&self, items: I) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

// == List Query ==
/// Filter, sort and page for a collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<K> {
    pub criteria: Criteria,
    pub sort: K,
    pub order: SortOrder,
    pub page: Page,
}

impl<K> ListQuery<K> {
    pub fn new(sort: K) -> Self {
        Self {
            criteria: Criteria::all(),
            sort,
            order: SortOrder::Desc,
            page: Page::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static str);

    impl Filterable for Named {
        fn field(&self, field: Field) -> Option<&str> {
            match field {
                Field::Name => Some(self.0),
                Field::Symbol => Some(self.1),
                _ => None,
            }
        }
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let token = Named("Wrapped Nexis", "WNZT");
        assert!(Filter::ContainsInsensitive(Field::Name, "nexis".into()).matches(&token));
        assert!(Filter::ContainsInsensitive(Field::Symbol, "wnz".into()).matches(&token));
        assert!(!Filter::ContainsInsensitive(Field::Address, "w".into()).matches(&token));
    }

    #[test]
    fn test_equals_is_case_sensitive() {
        let token = Named("Gold", "GLD");
        assert!(Filter::Equals(Field::Symbol, "GLD".into()).matches(&token));
        assert!(!Filter::Equals(Field::Symbol, "gld".into()).matches(&token));
    }

    #[test]
    fn test_criteria_is_disjunction() {
        let token = Named("Gold", "GLD");
        let criteria = Criteria::text_search("gl", &[Field::Name, Field::Symbol]);
        assert!(criteria.matches(&token));
        assert!(Criteria::all().matches(&token));
        assert!(!Criteria::all()
            .or(Filter::Equals(Field::Name, "Silver".into()))
            .matches(&token));
    }

    #[test]
    fn test_page_slice() {
        let page = Page {
            limit: 2,
            offset: 1,
        };
        assert_eq!(page.slice(vec![1, 2, 3, 4]), vec![2, 3]);
        assert_eq!(Page::default().slice(0..250).len(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("up"), None);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
    }
}
