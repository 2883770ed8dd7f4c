use crate::error::LookupError;
use cidian_core::utils::{normalize, to_halfwidth};
use cidian_core::{Config, Window};

/// A validated lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    /// Half-width, NFC-normalized, trimmed query text (never empty)
    pub text: String,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl SearchQuery {
    /// Normalize `text` and check paging bounds against `config`.
    ///
    /// A page whose offset does not fit in `usize` is rejected.
    pub fn new(
        text: &str,
        page: usize,
        page_size: usize,
        config: &Config,
    ) -> Result<Self, LookupError> {
        let text = normalize(&to_halfwidth(text));
        if text.is_empty() {
            return Err(LookupError::InvalidArgument(
                "query text must not be empty".to_string(),
            ));
        }
        if page < 1 {
            return Err(LookupError::InvalidArgument(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !config.accepts_page_size(page_size) {
            return Err(LookupError::InvalidArgument(format!(
                "page_size must be between 1 and {}, got {page_size}",
                config.page_size_limit()
            )));
        }
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(LookupError::InvalidArgument(format!(
                "page {page} is out of range for page_size {page_size}"
            )));
        }
        Ok(Self {
            text,
            page,
            page_size,
        })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn window(&self) -> Window {
        Window::new(self.page_size, self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_windows() {
        let q = SearchQuery::new("  nihao \n", 3, 20, &Config::default()).unwrap();
        assert_eq!(q.text, "nihao");
        assert_eq!(q.offset(), 40);
        assert_eq!(q.window(), Window::new(20, 40));
    }

    #[test]
    fn rejects_bad_requests() {
        let cfg = Config::default();
        assert!(matches!(
            SearchQuery::new("   ", 1, 20, &cfg),
            Err(LookupError::InvalidArgument(_))
        ));
        assert!(SearchQuery::new("car", 0, 20, &cfg).is_err());
        assert!(SearchQuery::new("car", 1, 0, &cfg).is_err());
        assert!(SearchQuery::new("car", 1, 101, &cfg).is_err());
        assert!(SearchQuery::new("car", 1, 100, &cfg).is_ok());
    }

    #[test]
    fn rejects_page_whose_offset_overflows() {
        let cfg = Config::default();
        assert!(matches!(
            SearchQuery::new("car", usize::MAX / 10, 100, &cfg),
            Err(LookupError::InvalidArgument(_))
        ));
        let q = SearchQuery::new("car", usize::MAX / 100, 100, &cfg).unwrap();
        assert_eq!(q.offset(), (usize::MAX / 100 - 1) * 100);
    }

    #[test]
    fn full_width_input_is_folded() {
        let q = SearchQuery::new("ｎｉ３ｈａｏ３", 1, 20, &Config::default()).unwrap();
        assert_eq!(q.text, "ni3hao3");
        let q = SearchQuery::new("\u{3000}你好\u{3000}", 1, 20, &Config::default()).unwrap();
        assert_eq!(q.text, "你好");
    }
}
