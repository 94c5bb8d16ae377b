//! Detail-page field extraction.
//!
//! Only the product name is mandatory. Every other field read is
//! individually fault-tolerant: a missing element or a page hiccup logs a
//! warning and leaves the field absent, and extraction of the record
//! continues. Field-level parsing lives in [`crate::normalize`].

use budfeed_core::ProductRecord;

use crate::adapter::{PriceRule, SiteAdapter, StrainRule};
use crate::error::CrawlError;
use crate::normalize::{
    is_strain_label, normalize_terpene_value, split_name_weight, split_price_tile,
    strip_chip_label,
};
use crate::page::{Page, PageError, Waits};

/// Extracts one normalized [`ProductRecord`] from a product detail page.
///
/// # Errors
///
/// - [`CrawlError::NavigationTimeout`] — the product header never appeared.
/// - [`CrawlError::Extraction`] — the header rendered but carried no name.
/// - [`CrawlError::Page`] — navigation to `url` itself failed.
pub async fn extract_product(
    page: &mut dyn Page,
    site: &SiteAdapter,
    url: &str,
    waits: &Waits,
) -> Result<ProductRecord, CrawlError> {
    let selectors = &site.selectors;

    page.goto(url).await?;
    page.settle(waits.settle).await;

    page.wait_for_selector(selectors.product_name, waits.selector)
        .await
        .map_err(|err| match err {
            PageError::Timeout { selector, .. } => CrawlError::NavigationTimeout {
                url: url.to_owned(),
                selector,
            },
            other => CrawlError::Page(other),
        })?;

    let header = page
        .text_contents(selectors.product_name)
        .await?
        .into_iter()
        .map(|t| t.trim().to_owned())
        .find(|t| !t.is_empty())
        .ok_or_else(|| CrawlError::Extraction {
            field: "name",
            url: url.to_owned(),
        })?;

    let (name, weight) = split_name_weight(&header, site.name_rule);
    let mut record = ProductRecord::new(url, name);
    record.weight = weight;

    let chips = read_optional(url, "info chips", page.text_contents(selectors.info_chip).await)
        .unwrap_or_default();
    record.strain_type = strain_type(&chips, site.strain_rule);
    record.thc = chips.iter().find_map(|c| strip_chip_label(c.trim(), "THC:"));
    record.cbd = chips.iter().find_map(|c| strip_chip_label(c.trim(), "CBD:"));

    extract_terpenes(page, site, url, &mut record).await;
    extract_prices(page, site, url, &mut record).await;

    record.brand = read_optional(url, "brand", page.text_contents(selectors.brand_link).await)
        .and_then(first_non_empty);

    if let Some(offer_selector) = selectors.offer {
        record.offer = read_optional(url, "offer", page.text_contents(offer_selector).await)
            .and_then(first_non_empty);
    }
    if let Some(image_selector) = selectors.image {
        record.image_url = read_optional(
            url,
            "image",
            page.attribute_values(image_selector, "src").await,
        )
        .and_then(|srcs| srcs.into_iter().flatten().find(|s| !s.is_empty()));
    }

    Ok(record)
}

fn strain_type(chips: &[String], rule: StrainRule) -> Option<String> {
    match rule {
        StrainRule::FirstChip => first_non_empty(chips.to_vec()),
        StrainRule::Classified => chips
            .iter()
            .map(|c| c.trim())
            .find(|c| is_strain_label(c))
            .map(str::to_owned),
    }
}

/// Reads the terpene name/value element sequences and zips them into the
/// record, normalizing each value to a percentage string. Duplicate names
/// overwrite earlier entries.
async fn extract_terpenes(
    page: &mut dyn Page,
    site: &SiteAdapter,
    url: &str,
    record: &mut ProductRecord,
) {
    let names = read_optional(
        url,
        "terpene names",
        page.text_contents(site.selectors.terpene_name).await,
    )
    .unwrap_or_default();
    let values = read_optional(
        url,
        "terpene values",
        page.text_contents(site.selectors.terpene_value).await,
    )
    .unwrap_or_default();

    if names.len() != values.len() {
        tracing::warn!(
            url,
            names = names.len(),
            values = values.len(),
            "terpene name/value counts differ; zipping the shorter prefix"
        );
    }
    for (name, value) in names.iter().zip(values.iter()) {
        record
            .terpenes
            .insert(name.trim(), normalize_terpene_value(value.trim()));
    }
}

/// Reads the price tiles according to the site's [`PriceRule`].
async fn extract_prices(
    page: &mut dyn Page,
    site: &SiteAdapter,
    url: &str,
    record: &mut ProductRecord,
) {
    let tiles = read_optional(
        url,
        "price tiles",
        page.text_contents(site.selectors.price_tile).await,
    )
    .unwrap_or_default();

    match site.price_rule {
        PriceRule::Single => {
            record.price = tiles
                .iter()
                .find_map(|t| split_price_tile(t))
                .map(|(_, price)| price);
        }
        PriceRule::Tiered => {
            let mut weights = Vec::new();
            let mut prices = Vec::new();
            for tile in &tiles {
                if let Some((weight, price)) = split_price_tile(tile) {
                    weights.push(weight);
                    prices.push(price);
                }
            }
            if !prices.is_empty() {
                record.weights = Some(weights);
                record.prices = Some(prices);
            }
        }
    }
}

/// Logs and absorbs an optional-field read failure.
fn read_optional<T>(url: &str, field: &str, result: Result<T, PageError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(url, field, error = %err, "optional field read failed; leaving absent");
            None
        }
    }
}

fn first_non_empty(texts: Vec<String>) -> Option<String> {
    texts
        .into_iter()
        .map(|t| t.trim().to_owned())
        .find(|t| !t.is_empty())
}
