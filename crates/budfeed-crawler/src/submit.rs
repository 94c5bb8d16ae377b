//! HTTP submission of normalized records to the ingestion backend.

use std::time::Duration;

use budfeed_core::{AppConfig, ProductRecord, SubmissionPayload};
use reqwest::Client;

use crate::error::CrawlError;
use crate::retry::retry_with_backoff;

/// Path under the backend base URL accepting record batches.
const CREATE_STRAINS_PATH: &str = "/strains/create-strains";

/// Client for the backend's `create-strains` endpoint.
///
/// One network call per [`submit`](Self::submit) invocation. Transient
/// failures (network errors, 429, 5xx) are retried with exponential backoff
/// up to the configured attempt count; definitive rejections surface as
/// [`CrawlError::Submission`] for the caller to log and isolate.
pub struct SubmitClient {
    client: Client,
    endpoint: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SubmitClient {
    /// Creates a client with explicit timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure; `0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        backend_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{CREATE_STRAINS_PATH}", backend_url.trim_end_matches('/')),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Convenience constructor from the loaded [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, CrawlError> {
        Self::new(
            &config.backend_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Posts `{storeName, strains}` for the given records.
    ///
    /// The orchestrator calls this once per record; batching several records
    /// into one call is equally valid — the wire shape is the same.
    ///
    /// # Errors
    ///
    /// - [`CrawlError::Submission`] — non-2xx response after any retries.
    /// - [`CrawlError::Http`] — network failure after any retries.
    pub async fn submit(
        &self,
        store_name: &str,
        records: &[ProductRecord],
    ) -> Result<(), CrawlError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let payload = SubmissionPayload {
                store_name,
                strains: records,
            };
            async move {
                let response = self
                    .client
                    .post(&self.endpoint)
                    .json(&payload)
                    .send()
                    .await?;
                let status = response.status();

                if status.is_success() {
                    tracing::info!(
                        store_name,
                        records = records.len(),
                        status = status.as_u16(),
                        "records submitted"
                    );
                    return Ok(());
                }

                let body = response.text().await.unwrap_or_default();
                tracing::warn!(
                    store_name,
                    status = status.as_u16(),
                    body = %body,
                    "backend rejected submission"
                );
                Err(CrawlError::Submission {
                    status: status.as_u16(),
                    body,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use budfeed_core::ProductRecord;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sample_record() -> ProductRecord {
        let mut record = ProductRecord::new("https://x.test/product/blue-dream", "Blue Dream");
        record.thc = Some("24.1%".to_owned());
        record.terpenes.insert("Myrcene", "1.23%");
        record
    }

    fn client_for(server: &MockServer, max_retries: u32) -> SubmitClient {
        SubmitClient::new(&server.uri(), 5, "budfeed-test", max_retries, 0)
            .expect("client should build")
    }

    #[tokio::test]
    async fn posts_payload_to_create_strains() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/strains/create-strains"))
            .and(body_partial_json(serde_json::json!({
                "storeName": "Monroe Ohio",
                "strains": [{
                    "name": "Blue Dream",
                    "thc": "24.1%",
                    "terpenes": {"Myrcene": "1.23%"}
                }]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 0);
        client
            .submit("Monroe Ohio", &[sample_record()])
            .await
            .expect("submission should succeed");
    }

    #[tokio::test]
    async fn server_error_surfaces_as_submission_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 0);
        let err = client
            .submit("Monroe Ohio", &[sample_record()])
            .await
            .unwrap_err();
        assert!(
            matches!(err, CrawlError::Submission { status: 500, ref body } if body == "boom"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn transient_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 2);
        client
            .submit("Monroe Ohio", &[sample_record()])
            .await
            .expect("submission should succeed after retries");
    }

    #[tokio::test]
    async fn client_rejection_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad strains"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 3);
        let err = client
            .submit("Monroe Ohio", &[sample_record()])
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Submission { status: 422, .. }));
    }
}
