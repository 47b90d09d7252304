//! Pagination utilities shared by store backends.
//!
//! A listing is paginated only when both the page and the page size are
//! positive; anything else means "return every match".

/// Pagination parameters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index, 0 disables pagination
    pub page: u32,
    /// items per page, 0 disables pagination
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self { Self { page, per_page } }

    /// Unbounded listing.
    pub fn all() -> Self { Self::default() }

    /// `(offset, limit)` of the requested window, or `None` when unpaginated.
    pub fn window(self) -> Option<(u64, u64)> {
        if self.page == 0 || self.per_page == 0 {
            return None;
        }
        let per_page = self.per_page as u64;
        Some(((self.page as u64 - 1) * per_page, per_page))
    }
}
