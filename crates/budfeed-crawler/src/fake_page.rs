//! Scripted [`Page`] implementation for pipeline tests.
//!
//! A `FakePage` serves canned element text and attributes per selector.
//! Listing crawls script a sequence of page states advanced by clicking the
//! next-page control; detail extractions script one state per URL.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::page::{Page, PageError};

#[derive(Debug, Default, Clone)]
pub(crate) struct PageState {
    texts: HashMap<String, Vec<String>>,
    attrs: HashMap<(String, String), Vec<Option<String>>>,
}

impl PageState {
    pub(crate) fn with_texts(mut self, selector: &str, texts: &[&str]) -> Self {
        self.texts.insert(
            selector.to_owned(),
            texts.iter().map(|t| (*t).to_owned()).collect(),
        );
        self
    }

    pub(crate) fn with_attrs(mut self, selector: &str, attribute: &str, values: &[&str]) -> Self {
        self.attrs.insert(
            (selector.to_owned(), attribute.to_owned()),
            values.iter().map(|v| Some((*v).to_owned())).collect(),
        );
        self
    }

    fn has(&self, selector: &str) -> bool {
        self.texts.contains_key(selector) || self.attrs.keys().any(|(s, _)| s == selector)
    }
}

pub(crate) struct FakePage {
    /// Detail-page states selected by `goto` URL.
    url_states: HashMap<String, PageState>,
    /// Listing states advanced by clicking `next_selector`.
    listing_states: Vec<PageState>,
    listing_index: usize,
    next_selector: String,
    active: PageState,
    pub(crate) visited: Vec<String>,
    pub(crate) clicks: Vec<String>,
    pub(crate) fail_next_click: bool,
}

impl FakePage {
    /// A page scripted with a sequence of listing states; clicking
    /// `next_selector` advances to the next state.
    pub(crate) fn listing(states: Vec<PageState>, next_selector: &str) -> Self {
        Self {
            url_states: HashMap::new(),
            listing_states: states,
            listing_index: 0,
            next_selector: next_selector.to_owned(),
            active: PageState::default(),
            visited: Vec::new(),
            clicks: Vec::new(),
            fail_next_click: false,
        }
    }

    /// A page scripted with one state per detail URL; navigating to an
    /// unscripted URL lands on an empty page.
    pub(crate) fn details(states: HashMap<String, PageState>) -> Self {
        Self {
            url_states: states,
            listing_states: Vec::new(),
            listing_index: 0,
            next_selector: String::new(),
            active: PageState::default(),
            visited: Vec::new(),
            clicks: Vec::new(),
            fail_next_click: false,
        }
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), PageError> {
        self.visited.push(url.to_owned());
        self.active = if let Some(state) = self.url_states.get(url) {
            state.clone()
        } else if self.listing_states.is_empty() {
            PageState::default()
        } else {
            self.listing_states[self.listing_index].clone()
        };
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        if self.active.has(selector) {
            Ok(())
        } else {
            Err(PageError::Timeout {
                selector: selector.to_owned(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })
        }
    }

    async fn text_contents(&mut self, selector: &str) -> Result<Vec<String>, PageError> {
        Ok(self
            .active
            .texts
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn attribute_values(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, PageError> {
        Ok(self
            .active
            .attrs
            .get(&(selector.to_owned(), attribute.to_owned()))
            .cloned()
            .unwrap_or_default())
    }

    async fn click(&mut self, selector: &str) -> Result<(), PageError> {
        self.clicks.push(selector.to_owned());
        if selector == self.next_selector {
            if self.fail_next_click {
                return Err(PageError::Browser("scripted click failure".to_owned()));
            }
            if self.listing_index + 1 < self.listing_states.len() {
                self.listing_index += 1;
                self.active = self.listing_states[self.listing_index].clone();
            }
        }
        Ok(())
    }

    async fn settle(&mut self, _duration: Duration) {}
}
