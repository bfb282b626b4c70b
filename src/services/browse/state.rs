use serde::Serialize;

use crate::{
    models::{BrowseMode, SortKey, MAX_TOTAL_PAGES},
    services::catalog::CatalogRequest,
};

/// Parameters that decide which listing is requested
///
/// Every setter returns whether anything changed; an unchanged setter must not
/// trigger a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowseState {
    page: u32,
    sort_key: SortKey,
    browse_mode: BrowseMode,
    query: String,
    total_pages: u32,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            page: 1,
            sort_key: SortKey::default(),
            browse_mode: BrowseMode::default(),
            query: String::new(),
            total_pages: 1,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn browse_mode(&self) -> BrowseMode {
        self.browse_mode
    }

    /// The effective (debounced, trimmed) search query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Highest page that may be requested; an empty listing still has page 1
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) -> bool {
        if self.sort_key == sort_key {
            return false;
        }
        self.sort_key = sort_key;
        self.reset_listing();
        true
    }

    pub fn set_browse_mode(&mut self, browse_mode: BrowseMode) -> bool {
        if self.browse_mode == browse_mode {
            return false;
        }
        self.browse_mode = browse_mode;
        self.reset_listing();
        true
    }

    pub fn set_query(&mut self, query: &str) -> bool {
        let query = query.trim();
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        self.reset_listing();
        true
    }

    /// A new listing starts on page 1 and stays there until it reports its size
    fn reset_listing(&mut self) {
        self.page = 1;
        self.total_pages = 1;
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Records the page count reported with a listing, capped at the catalog limit
    ///
    /// Returns true when the current page no longer exists and was pulled back
    /// to the last one.
    pub fn set_total_pages(&mut self, reported: u32) -> bool {
        self.total_pages = reported.min(MAX_TOTAL_PAGES);
        let clamped = self.page.clamp(1, self.last_page());
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }

    /// The one request these parameters call for
    pub fn request(&self) -> CatalogRequest {
        if !self.query.is_empty() {
            CatalogRequest::Search {
                query: self.query.clone(),
                page: self.page,
            }
        } else if self.browse_mode == BrowseMode::NowPlaying {
            CatalogRequest::NowPlaying { page: self.page }
        } else {
            CatalogRequest::Discover {
                page: self.page,
                sort_key: self.sort_key,
            }
        }
    }

    /// Sort order only applies to discover listings
    pub fn sort_control_visible(&self) -> bool {
        self.query.is_empty() && self.browse_mode == BrowseMode::Discover
    }

    pub fn browse_control_visible(&self) -> bool {
        self.query.is_empty()
    }
}
