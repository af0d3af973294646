// src/pagination.rs

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

/// Every listing shows this many posts per page.
pub const POSTS_PER_PAGE: i64 = 10;

/// Query parameters accepted by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page index. Kept raw so that junk falls back to page 1.
    pub page: Option<String>,
}

/// Splits `count` ordered rows into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub count: i64,
    pub per_page: i64,
}

/// The slice of rows one page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub offset: i64,
    pub limit: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// An empty listing still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    /// Resolves a page number. Anything outside `1..=num_pages`, zero and
    /// negatives included, means the last page.
    pub fn resolve(&self, number: i64) -> PageWindow {
        let last = self.num_pages();
        let number = if (1..=last).contains(&number) { number } else { last };
        PageWindow {
            number,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    /// Like `resolve`, from the raw `page` query value.
    /// Missing or non-integer values mean the first page; integers too large
    /// to represent are out of range and mean the last page.
    pub fn get_page(&self, raw: Option<&str>) -> PageWindow {
        let Some(raw) = raw else {
            return self.resolve(1);
        };
        match raw.trim().parse::<i64>() {
            Ok(number) => self.resolve(number),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                self.resolve(self.num_pages())
            }
            Err(_) => self.resolve(1),
        }
    }
}

/// One page of a listing, as rendered to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub num_pages: i64,
    pub number: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(paginator: &Paginator, window: PageWindow, results: Vec<T>) -> Self {
        let num_pages = paginator.num_pages();
        Self {
            count: paginator.count,
            num_pages,
            number: window.number,
            has_next: window.number < num_pages,
            has_previous: window.number > 1,
            results,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Pages an already ordered sequence in memory.
pub fn paginate<T>(items: Vec<T>, per_page: i64, number: i64) -> Page<T> {
    let paginator = Paginator::new(items.len() as i64, per_page);
    let window = paginator.resolve(number);
    let results = items
        .into_iter()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .collect();
    Page::new(&paginator, window, results)
}
