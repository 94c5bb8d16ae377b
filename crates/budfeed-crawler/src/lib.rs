pub mod adapter;
pub mod chrome;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod page;
pub mod pagination;
pub mod retry;
pub mod submit;

#[cfg(test)]
mod fake_page;

pub use adapter::SiteAdapter;
pub use chrome::{ChromePage, ChromeSession};
pub use error::CrawlError;
pub use extract::extract_product;
pub use page::{Page, PageError, Waits};
pub use pagination::{collect_product_links, ProductListing};
pub use retry::Pacer;
pub use submit::SubmitClient;
