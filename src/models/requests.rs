//! Request input validation
//!
//! Turns raw path segments and query pairs into typed parameters, collecting
//! every field-level problem before failing.

use crate::error::{AppError, FieldError, Result};
use crate::storage::{Page, SortOrder, MAX_PAGE_LIMIT};

/// Raw query pairs in arrival order.
pub type QueryPairs = [(String, String)];

const ADDRESS_MIN_LEN: usize = 32;
const ADDRESS_MAX_LEN: usize = 44;

// == List Request ==
/// Validated listing parameters: `search`, `sortBy`, `order`, `limit`, `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRequest {
    /// Trimmed search term, `None` when absent or blank
    pub search: Option<String>,
    /// One of the route's allowed sort names
    pub sort_by: Option<String>,
    pub order: SortOrder,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListRequest {
    /// Validates listing parameters against the route's sort names.
    ///
    /// Unknown parameters are ignored. The first occurrence of a repeated
    /// parameter is the one validated.
    pub fn parse(query: &QueryPairs, allowed_sorts: &[&str]) -> Result<Self> {
        let mut errors = Vec::new();
        let mut request = ListRequest::default();

        if let Some(raw) = first(query, "limit") {
            match raw.trim().parse::<usize>() {
                Ok(limit) if (1..=MAX_PAGE_LIMIT).contains(&limit) => request.limit = Some(limit),
                _ => errors.push(FieldError::new("limit", "Limit must be between 1 and 100")),
            }
        }

        if let Some(raw) = first(query, "offset") {
            match raw.trim().parse::<usize>() {
                Ok(offset) => request.offset = Some(offset),
                Err(_) => errors.push(FieldError::new(
                    "offset",
                    "Offset must be a non-negative integer",
                )),
            }
        }

        if let Some(raw) = first(query, "sortBy") {
            if allowed_sorts.contains(&raw) {
                request.sort_by = Some(raw.to_string());
            } else {
                errors.push(FieldError::new("sortBy", "Invalid value"));
            }
        }

        if let Some(raw) = first(query, "order") {
            match SortOrder::parse(raw) {
                Some(order) => request.order = order,
                None => errors.push(FieldError::new("order", "Invalid value")),
            }
        }

        if let Some(raw) = first(query, "search") {
            let term = raw.trim();
            if !term.is_empty() {
                request.search = Some(term.to_string());
            }
        }

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(AppError::validation(errors))
        }
    }

    /// Requested page with defaults filled in.
    pub fn page(&self) -> Page {
        let defaults = Page::default();
        Page {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }

    /// The page, only when the client asked for one.
    pub fn explicit_page(&self) -> Option<Page> {
        (self.limit.is_some() || self.offset.is_some()).then(|| self.page())
    }
}

fn first<'a>(query: &'a QueryPairs, name: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

// == Path Parameters ==
/// Checks a base58-style address: 32 to 44 ASCII letters or digits.
pub fn address_error(field: &str, value: &str, message: &str) -> Option<FieldError> {
    let valid = (ADDRESS_MIN_LEN..=ADDRESS_MAX_LEN).contains(&value.len())
        && value.chars().all(|c| c.is_ascii_alphanumeric());
    (!valid).then(|| FieldError::new(field, message))
}

/// Validates a token or collection address path segment.
pub fn validate_address(value: &str) -> Result<String> {
    match address_error("address", value, "Invalid address format") {
        None => Ok(value.to_string()),
        Some(error) => Err(AppError::validation(vec![error])),
    }
}

/// Validates a validator vote pubkey path segment.
pub fn validate_pubkey(value: &str) -> Result<String> {
    match address_error("pubkey", value, "Invalid public key format") {
        None => Ok(value.to_string()),
        Some(error) => Err(AppError::validation(vec![error])),
    }
}

/// Address plus listing parameters, reporting all problems together.
pub fn validate_address_listing(
    address: &str,
    query: &QueryPairs,
    allowed_sorts: &[&str],
) -> Result<(String, ListRequest)> {
    let path_errors = address_error("address", address, "Invalid address format")
        .into_iter()
        .collect();
    let listing = with_path_errors(path_errors, ListRequest::parse(query, allowed_sorts))?;
    Ok((address.to_string(), listing))
}

/// Collection address and token id of a single NFT.
pub fn validate_nft_path(address: &str, token_id: &str) -> Result<(String, String)> {
    let errors = nft_path_errors(address, token_id);
    if errors.is_empty() {
        Ok((address.to_string(), token_id.trim().to_string()))
    } else {
        Err(AppError::validation(errors))
    }
}

/// NFT path plus paging for its history.
pub fn validate_nft_listing(
    address: &str,
    token_id: &str,
    query: &QueryPairs,
) -> Result<(String, String, ListRequest)> {
    let listing = with_path_errors(nft_path_errors(address, token_id), ListRequest::parse(query, &[]))?;
    Ok((address.to_string(), token_id.trim().to_string(), listing))
}

fn nft_path_errors(address: &str, token_id: &str) -> Vec<FieldError> {
    address_error("address", address, "Invalid address format")
        .into_iter()
        .chain(token_id_error(token_id))
        .collect()
}

/// Trimmed, non-empty NFT token id.
pub fn token_id_error(value: &str) -> Option<FieldError> {
    value
        .trim()
        .is_empty()
        .then(|| FieldError::new("tokenId", "Invalid value"))
}

/// Path errors come first, followed by any query errors.
fn with_path_errors(
    mut path_errors: Vec<FieldError>,
    listing: Result<ListRequest>,
) -> Result<ListRequest> {
    match listing {
        Ok(listing) if path_errors.is_empty() => Ok(listing),
        Ok(_) => Err(AppError::validation(path_errors)),
        Err(AppError::ValidationFailed { details, .. }) => {
            path_errors.extend(details);
            Err(AppError::validation(path_errors))
        }
        Err(other) => Err(other),
    }
}

// == Search ==
pub const MIN_SEARCH_LEN: usize = 3;

/// Free-text search term of at least three characters.
pub fn validate_search_query(query: &str) -> Result<String> {
    if query.chars().count() < MIN_SEARCH_LEN {
        return Err(AppError::invalid("Invalid search parameters"));
    }
    Ok(query.to_string())
}
