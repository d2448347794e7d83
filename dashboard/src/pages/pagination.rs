/// Page arithmetic for a paged list. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
    total: u64,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            per_page,
            total,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    /// 1-based position of the first item on the page.
    pub fn range_start(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page) + 1
    }

    pub fn range_end(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.per_page)).min(self.total)
    }

    /// E.g. `Showing 6 to 10 of 12 bookings`.
    pub fn label(&self, noun: &str) -> String {
        format!(
            "Showing {} to {} of {} {noun}",
            self.range_start(),
            self.range_end(),
            self.total
        )
    }

    /// Controls are only drawn when there is more than one page.
    pub fn is_visible(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn previous_page(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        let last = u32::try_from(self.total_pages()).unwrap_or(u32::MAX);
        self.page.saturating_add(1).min(last.max(1))
    }

    /// Page buttons, first to last.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        let last = u32::try_from(self.total_pages()).unwrap_or(u32::MAX);
        1..=last
    }
}
