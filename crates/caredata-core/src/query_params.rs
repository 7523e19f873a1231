use serde::{Deserialize, Serialize};

/// Sort direction for ordered lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Per-call pagination and ordering parameters.
///
/// A value object passed with each query invocation, never stored. Page
/// numbers are 1-based; `None` for any part means "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl QueryParams {
    /// Creates unconstrained parameters (natural store order, unbounded).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates parameters for a specific page.
    #[must_use]
    pub fn paged(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Sets the sort field and direction.
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }

    /// Record offset implied by the page/page_size pair.
    ///
    /// Page numbers below 1 are clamped to the first page.
    #[must_use]
    pub fn offset(&self) -> usize {
        match (self.page, self.page_size) {
            (Some(page), Some(size)) => (page.max(1) as usize - 1) * size as usize,
            _ => 0,
        }
    }

    /// Maximum number of records this call should return, if bounded.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.page_size.map(|s| s as usize)
    }

    /// Whether these parameters constrain the result at all.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.page.is_none() && self.page_size.is_none() && self.sort_field.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based_from_one_based_pages() {
        assert_eq!(QueryParams::paged(1, 10).offset(), 0);
        assert_eq!(QueryParams::paged(3, 25).offset(), 50);
        assert_eq!(QueryParams::paged(0, 10).offset(), 0);
        assert_eq!(QueryParams::new().offset(), 0);
    }

    #[test]
    fn limit_tracks_page_size() {
        assert_eq!(QueryParams::paged(2, 10).limit(), Some(10));
        assert_eq!(QueryParams::new().limit(), None);
    }
}
