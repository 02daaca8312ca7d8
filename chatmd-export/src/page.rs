//! The page seam.
//!
//! Everything the conversion core needs from its host document sits behind
//! [`ThreadPage`]: scroll driving for the lazy-load settler and an HTML
//! snapshot for traversal. A live-browser host implements this against real
//! scrolling; [`StaticPage`] adapts a saved capture.

use markup5ever_rcdom::RcDom;

use crate::dom;
use crate::error::ExportError;

/// Host document of a chat thread.
pub trait ThreadPage {
    /// Address of the thread, for the metadata preamble.
    fn url(&self) -> Option<&str> {
        None
    }

    /// Scroll driving; hosts without a viewport ignore these.
    fn scroll_to_top(&mut self) {}
    fn scroll_to_bottom(&mut self) {}

    /// Total scrollable extent. The settler stops once this stabilizes.
    fn scroll_extent(&mut self) -> u64;

    /// Parse the current document state.
    fn snapshot(&mut self) -> Result<RcDom, ExportError>;
}

/// A saved HTML capture. Its extent never changes, so settling converges
/// after the second pass.
pub struct StaticPage {
    html: String,
    url: Option<String>,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        StaticPage {
            html: html.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl ThreadPage for StaticPage {
    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn scroll_extent(&mut self) -> u64 {
        self.html.len() as u64
    }

    fn snapshot(&mut self) -> Result<RcDom, ExportError> {
        dom::parse_html(&self.html)
    }
}
