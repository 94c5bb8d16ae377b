//! Per-site capability bundles.
//!
//! Everything site-specific — URLs, selectors, which delimiter splits the
//! product header, how strain chips are read, whether prices come in tiers —
//! lives in a [`SiteAdapter`] value. The pipeline itself is site-agnostic;
//! adding a storefront means adding an entry to [`SITES`], not touching the
//! crawl or extraction logic.

use budfeed_core::ConfigError;

/// Matching rule for product-detail hrefs found on listing pages.
#[derive(Debug, Clone, Copy)]
pub enum UrlRule {
    /// The href must start with this path prefix.
    Prefix(&'static str),
    /// The href must contain this path fragment.
    Contains(&'static str),
}

impl UrlRule {
    #[must_use]
    pub fn matches(&self, href: &str) -> bool {
        match self {
            Self::Prefix(prefix) => href.starts_with(prefix),
            Self::Contains(fragment) => href.contains(fragment),
        }
    }
}

/// How the product header text splits into name and weight.
#[derive(Debug, Clone, Copy)]
pub enum NameRule {
    /// `"Blue Dream | 3.5g"` — name before the delimiter, weight after.
    DelimiterWithWeight(char),
    /// `"Gelato (Premium)"` — name before the delimiter, remainder dropped.
    /// Weight for these sites comes from the price tiers instead.
    TruncateAt(char),
}

/// How the strain type is read from the info chips.
#[derive(Debug, Clone, Copy)]
pub enum StrainRule {
    /// The first chip carries the strain label verbatim.
    FirstChip,
    /// Scan every chip for a case-insensitive indica/sativa/hybrid match;
    /// absent when no chip qualifies.
    Classified,
}

/// Whether the site exposes one price or parallel weight/price tiers.
#[derive(Debug, Clone, Copy)]
pub enum PriceRule {
    Single,
    Tiered,
}

/// CSS selectors for one storefront's listing and detail pages.
#[derive(Debug, Clone, Copy)]
pub struct Selectors {
    /// Anchors inside the product-list container on listing pages.
    pub product_list_anchor: &'static str,
    /// Numbered page buttons inside the pagination control; their count is
    /// the total page count.
    pub pagination_buttons: &'static str,
    pub next_button: &'static str,
    pub product_name: &'static str,
    pub info_chip: &'static str,
    pub terpene_name: &'static str,
    pub terpene_value: &'static str,
    pub price_tile: &'static str,
    pub brand_link: &'static str,
    pub offer: Option<&'static str>,
    pub image: Option<&'static str>,
}

/// Immutable per-retailer configuration; one instance per storefront,
/// created at startup.
#[derive(Debug, Clone, Copy)]
pub struct SiteAdapter {
    /// Stable identifier used on the CLI.
    pub key: &'static str,
    /// Store name reported to the backend.
    pub store_name: &'static str,
    pub base_url: &'static str,
    pub listing_url: &'static str,
    pub url_rule: UrlRule,
    pub name_rule: NameRule,
    pub strain_rule: StrainRule,
    pub price_rule: PriceRule,
    pub selectors: Selectors,
}

impl SiteAdapter {
    /// Resolves a listing-page href to an absolute product URL.
    #[must_use]
    pub fn resolve_href(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_owned()
        } else {
            format!("{}{href}", self.base_url.trim_end_matches('/'))
        }
    }
}

/// The supported storefronts.
pub const SITES: &[SiteAdapter] = &[
    SiteAdapter {
        key: "the-landing-monroe",
        store_name: "Monroe Ohio",
        base_url: "https://monroe-menu.thelandingdispensaries.com",
        listing_url:
            "https://monroe-menu.thelandingdispensaries.com/stores/monroe-ohio/products/flower",
        url_rule: UrlRule::Prefix("/stores/monroe-ohio/product/"),
        name_rule: NameRule::DelimiterWithWeight('|'),
        strain_rule: StrainRule::FirstChip,
        price_rule: PriceRule::Single,
        selectors: Selectors {
            product_list_anchor: "div[data-testid='product-list-item'] a",
            pagination_buttons:
                "nav[aria-label='pagination navigation'] button[aria-label^='go to page']",
            next_button: "button[aria-label='go to next page']",
            product_name: "h1[data-testid='product-name']",
            info_chip: "span[data-testid='info-chip']",
            terpene_name: "div.terpene__Container-sc-s9pry-0 span.terpene__Name-sc-s9pry-3",
            terpene_value: "div.terpene__Container-sc-s9pry-0 span.terpene__Value-sc-s9pry-4",
            price_tile: "div[data-testid='options-list'] button[data-testid='option-tile']",
            brand_link: "div[class*='Brand'] a",
            offer: Some("div.product-specials-carousel-card__Container-sc-19b4u4b-0 p span"),
            image: Some("div[data-testid='main-product-image-scroll-container'] img"),
        },
    },
    SiteAdapter {
        key: "shangrila-monroe-west",
        store_name: "Shangri-La Monroe",
        base_url: "https://shangriladispensaries.com",
        listing_url:
            "https://shangriladispensaries.com/stores/shangri-la-monroe-butler-county/products/flower",
        url_rule: UrlRule::Contains("/stores/shangri-la-monroe-butler-county/product/"),
        name_rule: NameRule::TruncateAt('('),
        strain_rule: StrainRule::Classified,
        price_rule: PriceRule::Tiered,
        selectors: Selectors {
            product_list_anchor: "div[data-testid='product-list-item'] a",
            pagination_buttons:
                "nav[aria-label='pagination navigation'] button[aria-label^='go to page']",
            next_button: "button[aria-label='go to next page']",
            product_name: "h1[data-testid='product-name']",
            info_chip: "span[data-testid='info-chip']",
            terpene_name: "div[class*='terpene__Container'] span[class*='terpene__Name']",
            terpene_value: "div[class*='terpene__Container'] span[class*='terpene__Value']",
            price_tile: "div[class*='Options'] button[data-testid='option-tile']",
            brand_link: "div[class*='Brand'] a",
            offer: None,
            image: None,
        },
    },
];

/// Looks up an adapter by its CLI key.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownSite`] listing the known keys — a fatal
/// configuration error, raised before any navigation happens.
pub fn by_key(key: &str) -> Result<&'static SiteAdapter, ConfigError> {
    SITES
        .iter()
        .find(|site| site.key == key)
        .ok_or_else(|| ConfigError::UnknownSite {
            key: key.to_owned(),
            known: known_keys().join(", "),
        })
}

/// Keys of all supported storefronts, in registry order.
#[must_use]
pub fn known_keys() -> Vec<&'static str> {
    SITES.iter().map(|site| site.key).collect()
}
