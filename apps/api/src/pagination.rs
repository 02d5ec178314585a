use serde::Serialize;

use crate::errors::AppError;

const MAX_LIMIT: i64 = 100;
const MAX_PAGE: i64 = 10_000;

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Applies defaults and bounds to 1-based `page` / `limit` query parameters.
pub fn resolve_page(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Result<Page, AppError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(default_limit);

    if !(1..=MAX_PAGE).contains(&page) {
        return Err(AppError::Validation(format!(
            "page must be between 1 and {MAX_PAGE}"
        )));
    }

    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    Ok(Page { page, limit })
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: Page, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page.limit - 1) / page.limit
        };
        Self {
            items,
            page: page.page,
            limit: page.limit,
            total,
            total_pages,
        }
    }
}
