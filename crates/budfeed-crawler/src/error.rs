use thiserror::Error;

use crate::page::PageError;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// A required element never appeared within its timeout. Aborts the
    /// current page or product only; against the listing page it ends the
    /// adapter's crawl with whatever links were already collected.
    #[error("navigation timeout at {url}: \"{selector}\" never appeared")]
    NavigationTimeout { url: String, selector: String },

    /// A mandatory field (currently only the product name) could not be
    /// read. The product is skipped; the run continues.
    #[error("mandatory field \"{field}\" could not be extracted from {url}")]
    Extraction { field: &'static str, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected a submission with a non-2xx status. Isolated to
    /// that submission; later submissions proceed.
    #[error("submission rejected with status {status}: {body}")]
    Submission { status: u16, body: String },

    #[error("page error: {0}")]
    Page(#[from] PageError),
}
