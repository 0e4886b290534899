//! Pagination utilities for the service layer
//!
//! Raw `page`/`limit` values are normalized into a [`Pagination`] window:
//! - `page`: absent or < 1 becomes 1
//! - `limit`: absent or 0 becomes [`DEFAULT_LIMIT`], negative becomes 1

pub const DEFAULT_LIMIT: u64 = 10;

/// Raw request values, already reduced to integers by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized pagination window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page, never 0
    pub limit: u64,
}

impl PageRequest {
    /// Parse query-string values with integer-prefix semantics, see [`parse_int_prefix`].
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.and_then(parse_int_prefix),
            limit: limit.and_then(parse_int_prefix),
        }
    }

    pub fn normalize(self) -> Pagination {
        let page = match self.page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        };
        let limit = match self.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(l) if l < 0 => 1,
            Some(l) => l as u64,
        };
        Pagination { page, limit }
    }
}

impl Pagination {
    /// Rows to skip; clamped so it always fits a signed 64-bit SQL OFFSET.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(i64::MAX as u64)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, limit: DEFAULT_LIMIT } }
}

/// Leading integer of `raw`: optional whitespace, optional sign, then digits.
/// `"3abc"` is 3, `"2.5"` is 2, `"abc"` and `""` are `None`. Values past the
/// `i64` range saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let digits = &rest[..end];
    let value = match digits.parse::<i64>() {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(page: Option<&str>, limit: Option<&str>) -> Pagination {
        PageRequest::from_query(page, limit).normalize()
    }

    #[test]
    fn absent_values_use_defaults() {
        assert_eq!(norm(None, None), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::default(), Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn invalid_or_small_page_becomes_one() {
        assert_eq!(norm(Some("abc"), None).page, 1);
        assert_eq!(norm(Some("0"), None).page, 1);
        assert_eq!(norm(Some("-4"), None).page, 1);
        assert_eq!(norm(Some("3"), None).page, 3);
    }

    #[test]
    fn limit_zero_defaults_negative_clamps_to_one() {
        assert_eq!(norm(None, Some("0")).limit, 10);
        assert_eq!(norm(None, Some("")).limit, 10);
        assert_eq!(norm(None, Some("-5")).limit, 1);
        assert_eq!(norm(None, Some("25")).limit, 25);
    }

    #[test]
    fn integer_prefix_parsing() {
        assert_eq!(parse_int_prefix("3abc"), Some(3));
        assert_eq!(parse_int_prefix("2.5"), Some(2));
        assert_eq!(parse_int_prefix("  7"), Some(7));
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("x1"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn offset_and_total_pages() {
        let p = Pagination { page: 3, limit: 4 };
        assert_eq!(p.offset(), 8);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(8), 2);
        assert_eq!(p.total_pages(9), 3);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let p = norm(Some("99999999999999999999"), Some("1000"));
        assert_eq!(p.offset(), i64::MAX as u64);
    }
}
