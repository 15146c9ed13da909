use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page window over a sequence whose length is supplied on each call, so the
/// paginator never holds on to rows itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    page_index: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_go_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn goto_page(&mut self, page_index: usize, total: usize) {
        self.page_index = page_index.min(self.page_count(total) - 1);
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn last_page(&mut self, total: usize) {
        self.page_index = self.page_count(total) - 1;
    }

    pub fn next_page(&mut self, total: usize) {
        self.goto_page(self.page_index + 1, total);
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Jumps to a 1-based page number typed by the user. Text that is not a
    /// number leaves the page alone; numbers out of range clamp.
    pub fn goto_page_input(&mut self, input: &str, total: usize) -> bool {
        match input.trim().parse::<i64>() {
            Ok(page_number) => {
                let index = usize::try_from(page_number.saturating_sub(1)).unwrap_or(0);
                self.goto_page(index, total);
                true
            }
            Err(_) => false,
        }
    }

    /// Pulls the index back inside the current bounds after the row count shrank.
    pub fn clamp(&mut self, total: usize) {
        self.goto_page(self.page_index, total);
    }
}
