//! Per-run orchestration: listing crawl → extraction → submission.
//!
//! Failures are isolated to the smallest unit that can fail. A product that
//! cannot be extracted or submitted is counted and logged; the run always
//! continues to its natural end and reports a [`RunSummary`] to the caller.

use budfeed_crawler::adapter::SiteAdapter;
use budfeed_crawler::{
    collect_product_links, extract_product, CrawlError, Pacer, Page, SubmitClient, Waits,
};

/// Outcome counters for one crawl run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Product links discovered on the listing (after any limit).
    pub links_found: usize,
    /// Products the run attempted to extract.
    pub attempted: usize,
    /// Products successfully extracted into records.
    pub extracted: usize,
    /// Records accepted by the backend.
    pub submitted: usize,
    /// Products that failed extraction or submission.
    pub failed: usize,
}

/// Runs a full crawl for one site: enumerate links, extract each product,
/// submit each record as a one-record batch, pacing between items.
///
/// A listing page that never renders ends the run with zero links rather
/// than failing the process; per-product errors are logged and counted.
pub async fn run_crawl(
    page: &mut dyn Page,
    site: &SiteAdapter,
    client: &SubmitClient,
    waits: &Waits,
    pacer: &mut Pacer,
    limit: usize,
) -> RunSummary {
    let mut summary = RunSummary::default();

    let links = match collect_product_links(page, site, limit, waits).await {
        Ok(links) => links,
        Err(err @ CrawlError::NavigationTimeout { .. }) => {
            tracing::warn!(site = site.key, error = %err, "listing never rendered; nothing to crawl");
            Vec::new()
        }
        Err(err) => {
            tracing::error!(site = site.key, error = %err, "listing crawl failed; nothing to crawl");
            Vec::new()
        }
    };
    summary.links_found = links.len();
    tracing::info!(site = site.key, links = links.len(), "starting product extraction");

    for listing in links {
        pacer.pace().await;
        summary.attempted += 1;

        let record = match extract_product(page, site, &listing.url, waits).await {
            Ok(record) => record,
            Err(err) => {
                summary.failed += 1;
                tracing::warn!(
                    url = %listing.url,
                    listing_page = listing.page_number,
                    error = %err,
                    "product skipped"
                );
                continue;
            }
        };
        summary.extracted += 1;

        match client
            .submit(site.store_name, std::slice::from_ref(&record))
            .await
        {
            Ok(()) => summary.submitted += 1,
            Err(err) => {
                summary.failed += 1;
                tracing::warn!(url = %record.url, error = %err, "submission failed; continuing");
            }
        }
    }

    summary
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
