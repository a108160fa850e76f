//! Search, filter, sort and paginate controller shared by every list screen.
//!
//! A screen describes itself through [`TableSpec`]; [`TableState`] holds the
//! transient UI state and [`TableState::apply`] produces the visible page.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page strips longer than this collapse into first/last/neighbours.
const FULL_STRIP_LIMIT: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Comparable projection of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Text(Cow<'a, str>),
    /// Numbers and epoch timestamps. Missing values order first.
    Number(Option<f64>),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => a
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&b.unwrap_or(f64::NEG_INFINITY)),
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        }
    }
}

pub fn text<'a>(value: &'a str) -> SortValue<'a> {
    SortValue::Text(Cow::Borrowed(value))
}

pub fn number(value: impl Into<Option<f64>>) -> SortValue<'static> {
    SortValue::Number(value.into())
}

/// Case-folded comparison with the raw text as tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Case-insensitive substring match; `needle` must already be lowercase.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Per-screen table definition.
pub trait TableSpec {
    type Row;
    type SortKey: Copy + Eq + Debug;
    type Filter: Clone + PartialEq + Debug;

    fn default_sort() -> (Self::SortKey, SortDirection);

    fn default_filter() -> Option<Self::Filter> {
        None
    }

    /// Direction applied when switching to a different key.
    fn initial_direction(_key: Self::SortKey) -> SortDirection {
        SortDirection::Asc
    }

    /// `needle` is trimmed, lowercased and non-empty.
    fn matches_search(row: &Self::Row, needle: &str) -> bool;

    fn matches_filter(row: &Self::Row, filter: &Self::Filter) -> bool;

    fn sort_value(row: &Self::Row, key: Self::SortKey) -> SortValue<'_>;
}

/// Transient UI state of one table. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState<S: TableSpec> {
    search: String,
    filter: Option<S::Filter>,
    sort_key: S::SortKey,
    direction: SortDirection,
    page: usize,
    page_size: usize,
    _spec: PhantomData<fn() -> S>,
}

impl<S: TableSpec> Default for TableState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TableSpec> TableState<S> {
    pub fn new() -> Self {
        let (sort_key, direction) = S::default_sort();
        Self {
            search: String::new(),
            filter: S::default_filter(),
            sort_key,
            direction,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            _spec: PhantomData,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> Option<&S::Filter> {
        self.filter.as_ref()
    }

    pub fn sort(&self) -> (S::SortKey, SortDirection) {
        (self.sort_key, self.direction)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, filter: Option<S::Filter>) {
        self.filter = filter;
        self.page = 1;
    }

    /// Same key flips the direction; a new key starts at its initial direction.
    pub fn sort_by(&mut self, key: S::SortKey) {
        if key == self.sort_key {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = key;
            self.direction = S::initial_direction(key);
        }
        self.page = 1;
    }

    pub fn set_sort(&mut self, key: S::SortKey, direction: SortDirection) {
        self.sort_key = key;
        self.direction = direction;
        self.page = 1;
    }

    /// Not clamped; an out-of-range page renders empty.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Filter, search and sort `rows`, then cut out the current page.
    pub fn apply<'a>(&self, rows: &'a [S::Row]) -> Page<&'a S::Row> {
        let needle = self.search.trim().to_lowercase();

        let mut visible: Vec<&S::Row> = rows
            .iter()
            .filter(|row| match &self.filter {
                Some(filter) => S::matches_filter(row, filter),
                None => true,
            })
            .filter(|row| needle.is_empty() || S::matches_search(row, &needle))
            .collect();

        visible.sort_by(|a, b| {
            S::sort_value(a, self.sort_key).compare(&S::sort_value(b, self.sort_key))
        });
        if self.direction == SortDirection::Desc {
            visible.reverse();
        }

        let meta = PageMeta::new(visible.len(), self.page, self.page_size);
        let offset = (self.page - 1).saturating_mul(self.page_size);
        let rows = visible
            .into_iter()
            .skip(offset)
            .take(self.page_size)
            .collect();

        Page { rows, meta }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata, including the "showing X to Y of N" range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based index of the first row on this page, 0 when nothing matched.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

impl PageMeta {
    pub fn new(total_count: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page = page.max(1);
        Self {
            page,
            page_size,
            total_count,
            total_pages: total_count.div_ceil(page_size).max(1),
            start: if total_count == 0 {
                0
            } else {
                (page - 1).saturating_mul(page_size).saturating_add(1)
            },
            end: page.saturating_mul(page_size).min(total_count),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page buttons: every page up to seven, otherwise first, last and the
    /// current page's neighbours with ellipses over the gaps.
    pub fn page_strip(&self) -> Vec<PageLink> {
        let kept = (1..=self.total_pages).filter(|&p| {
            self.total_pages <= FULL_STRIP_LIMIT
                || p == 1
                || p == self.total_pages
                || p.abs_diff(self.page) <= 1
        });

        let mut strip = Vec::new();
        let mut previous: Option<usize> = None;
        for p in kept {
            if previous.is_some_and(|prev| p - prev > 1) {
                strip.push(PageLink::Ellipsis);
            }
            strip.push(PageLink::Page(p));
            previous = Some(p);
        }
        strip
    }

    pub fn summary(&self, item_label: &str) -> String {
        format!(
            "Showing {} to {} of {} {item_label}",
            self.start, self.end, self.total_count
        )
    }
}
