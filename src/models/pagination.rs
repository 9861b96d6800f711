use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Pagination metadata returned next to every paged list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32, // (1-based)
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub limit: u32,
}

impl PaginationInfo {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(limit.max(1))) as u32;

        Self {
            current_page: page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
            limit,
        }
    }
}

/// A validated page request. `page` and `limit` are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Parses raw query values; anything missing, unparsable or below 1 falls back to the default.
    /// `limit` is capped at [`MAX_LIMIT`].
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit)
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
        }
    }

    /// Offset of the first item, saturated to what SurrealQL accepts as `START`.
    pub fn skip(&self) -> i64 {
        let skip = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit);
        i64::try_from(skip).unwrap_or(i64::MAX)
    }

    pub fn info(&self, total_items: u64) -> PaginationInfo {
        PaginationInfo::new(self.page, self.limit, total_items)
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
}

#[derive(Debug, Deserialize, Default)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        let request = PageRequest { page: 3, limit: 10 };
        let info = request.info(25);

        assert_eq!(request.skip(), 20);
        assert_eq!(info.total_pages, 3);
        assert!(!info.has_next);
        assert!(info.has_prev);
        assert_eq!(info.limit, 10);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, limit, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (7, 1, 7)] {
            assert_eq!(PaginationInfo::new(1, limit, total).total_pages, expected);
        }
    }

    #[test]
    fn test_empty_result_has_no_next_page() {
        let info = PaginationInfo::new(1, 10, 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn test_first_page_has_next_but_no_prev() {
        let info = PaginationInfo::new(1, 10, 25);
        assert!(info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn test_parse_falls_back_to_defaults() {
        assert_eq!(PageRequest::parse(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::parse(Some("0"), Some("-4")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::parse(Some("abc"), Some("25")),
            PageRequest { page: 1, limit: 25 }
        );
        assert_eq!(
            PageRequest::parse(Some(" 4 "), Some("5")),
            PageRequest { page: 4, limit: 5 }
        );
    }

    #[test]
    fn test_huge_values_stay_in_query_range() {
        let request = PageRequest::parse(Some("4294967295"), Some("4000000000"));
        assert_eq!(request.limit, MAX_LIMIT);
        assert_eq!(request.skip(), 4_294_967_294 * 100);

        let unchecked = PageRequest {
            page: u32::MAX,
            limit: u32::MAX,
        };
        assert_eq!(unchecked.skip(), i64::MAX);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PaginationInfo::new(2, 10, 25)).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["totalItems"], 25);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }
}
