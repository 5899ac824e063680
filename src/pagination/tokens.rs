//! Page-number display tokens
//!
//! Produces the compact page strip the portal renders under its lists:
//! every page number when there are few pages, otherwise the first page,
//! a window around the current page and the last page, with gap markers
//! in between (`1 ... 5 6 7 ... 12`).

use std::fmt;

/// Largest page count rendered without gap markers
const FULL_STRIP_MAX: usize = 5;

/// One element of the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    /// A selectable page number, 1-based
    Page(usize),
    /// An elided run of pages, rendered as "..."
    Gap,
}

impl PageToken {
    /// Check if this token is a gap marker
    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap)
    }

    /// The page number, if this token is one
    pub fn as_page(&self) -> Option<usize> {
        match self {
            Self::Page(page) => Some(*page),
            Self::Gap => None,
        }
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{page}"),
            Self::Gap => f.write_str("..."),
        }
    }
}

/// Compute the page-number strip for a pager state
///
/// With at most five pages every page number appears. Beyond that the
/// strip is page 1, a window `max(2, current-1) ..= min(total-1, current+1)`
/// around the current page and the last page, with a [`PageToken::Gap`]
/// wherever pages are elided. The current page is clamped into range first,
/// so any input yields a well-formed strip; zero pages yield an empty one.
pub fn page_tokens(total_pages: usize, current_page: usize) -> Vec<PageToken> {
    if total_pages <= FULL_STRIP_MAX {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let window_start = current.saturating_sub(1).max(2);
    let window_end = (current + 1).min(total_pages - 1);

    let mut tokens = Vec::with_capacity(window_end - window_start + 5);
    tokens.push(PageToken::Page(1));
    if window_start > 2 {
        tokens.push(PageToken::Gap);
    }
    for page in window_start..=window_end {
        tokens.push(PageToken::Page(page));
    }
    if window_end < total_pages - 1 {
        tokens.push(PageToken::Gap);
    }
    tokens.push(PageToken::Page(total_pages));
    tokens
}

/// Render a token strip as a single line, e.g. `1 ... 5 6 7 ... 12`
pub fn token_strip(tokens: &[PageToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
