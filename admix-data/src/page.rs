use serde::Serialize;

/// Default page size applied when a caller requests paging without a size.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Converts a 1-based page number to a row offset. Pages below 1 are
/// normalized to 1.
pub fn resolve_offset(page: i64, per_page: i64) -> i64 {
    let page = if page < 1 { 1 } else { page };
    (page - 1) * per_page
}

/// Total page count for a row count and page size; 0 when either input is
/// non-positive.
pub fn resolve_total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    let mut pages = total / per_page;
    if total % per_page > 0 {
        pages += 1;
    }
    pages
}

/// Pagination metadata attached to a paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Paginator {
    pub fn populate(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: resolve_total_pages(total, per_page),
        }
    }
}

/// A listing result: the mapped entities plus pagination metadata when the
/// caller requested paging.
#[derive(Debug, Clone, Serialize)]
pub struct PageList<T> {
    pub list: Vec<T>,
    pub paginate: Option<Paginator>,
}

impl<T> PageList<T> {
    pub fn unpaged(list: Vec<T>) -> Self {
        Self {
            list,
            paginate: None,
        }
    }

    pub fn paged(list: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            list,
            paginate: Some(Paginator::populate(page, per_page, total)),
        }
    }
}
