//! List pagination

/// Rows returned when the caller gives no positive limit
pub const DEFAULT_LIMIT: i64 = 5;

/// Normalized limit/offset pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Absent or non-positive limit becomes [`DEFAULT_LIMIT`], absent or
    /// negative offset becomes 0.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
            offset: offset.filter(|o| *o >= 0).unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Page::default(), Page { limit: 5, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(-3)), Page { limit: 5, offset: 0 });
        assert_eq!(Page::new(Some(-1), None), Page { limit: 5, offset: 0 });
    }

    #[test]
    fn test_explicit_values_kept() {
        assert_eq!(Page::new(Some(20), Some(40)), Page { limit: 20, offset: 40 });
    }
}
