//! Listing-page traversal.
//!
//! Menu frontends render a numbered pagination control under the product
//! grid; the total page count is simply how many numbered buttons exist.
//! Navigation between pages is click-driven (the URL does not change), so
//! the crawl is stateful per listing: read the current page's anchors,
//! click "next", wait for the grid to re-render, repeat.

use crate::adapter::SiteAdapter;
use crate::error::CrawlError;
use crate::page::{Page, PageError, Waits};

/// One product-detail URL discovered during a listing crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub url: String,
    /// Listing page the link was found on, for diagnostics only.
    pub page_number: usize,
}

/// Enumerates product-detail links across all listing pages, in page/DOM
/// order. No de-duplication: a product repeated across pages is passed
/// through unchanged (the backend is idempotent on url + attributes).
///
/// `limit` truncates the result to the first `limit` links when positive;
/// `0` means unbounded.
///
/// A failed or timed-out "next page" click is not fatal: the links gathered
/// so far are returned. Only the listing page itself failing to render
/// yields an error.
///
/// # Errors
///
/// - [`CrawlError::NavigationTimeout`] — the product-list container never
///   appeared on the listing page.
/// - [`CrawlError::Page`] — the initial navigation itself failed.
pub async fn collect_product_links(
    page: &mut dyn Page,
    site: &SiteAdapter,
    limit: usize,
    waits: &Waits,
) -> Result<Vec<ProductListing>, CrawlError> {
    let selectors = &site.selectors;

    page.goto(site.listing_url).await?;
    page.wait_for_selector(selectors.product_list_anchor, waits.selector)
        .await
        .map_err(|err| listing_timeout(site.listing_url, err))?;

    // A missing pagination control just means a single page of results.
    let total_pages = match page.text_contents(selectors.pagination_buttons).await {
        Ok(buttons) if !buttons.is_empty() => buttons.len(),
        Ok(_) => 1,
        Err(err) => {
            tracing::debug!(site = site.key, error = %err, "no pagination control; assuming one page");
            1
        }
    };
    tracing::info!(site = site.key, total_pages, "listing loaded");

    let mut links: Vec<ProductListing> = Vec::new();
    for page_number in 1..=total_pages {
        let hrefs = page
            .attribute_values(selectors.product_list_anchor, "href")
            .await?;
        for href in hrefs.into_iter().flatten() {
            if site.url_rule.matches(&href) {
                links.push(ProductListing {
                    url: site.resolve_href(&href),
                    page_number,
                });
            }
        }
        tracing::info!(
            site = site.key,
            page_number,
            collected = links.len(),
            "listing page read"
        );

        if page_number == total_pages {
            break;
        }

        if let Err(err) = advance_page(page, selectors.next_button, selectors.product_list_anchor, waits).await {
            tracing::warn!(
                site = site.key,
                page_number,
                error = %err,
                "failed to reach next listing page; returning partial results"
            );
            break;
        }
    }

    tracing::info!(site = site.key, total = links.len(), "listing crawl finished");

    if limit > 0 {
        links.truncate(limit);
    }
    Ok(links)
}

/// Clicks the next-page control and waits for the grid to re-render.
async fn advance_page(
    page: &mut dyn Page,
    next_button: &str,
    list_anchor: &str,
    waits: &Waits,
) -> Result<(), PageError> {
    page.click(next_button).await?;
    page.wait_for_selector(list_anchor, waits.selector).await
}

fn listing_timeout(listing_url: &str, err: PageError) -> CrawlError {
    match err {
        PageError::Timeout { selector, .. } => CrawlError::NavigationTimeout {
            url: listing_url.to_owned(),
            selector,
        },
        other => CrawlError::Page(other),
    }
}
