//! HTTP submission of staged objects to the Provision backend.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::{ProvisionError, Result, SubmitFailure};
use crate::store::KindMap;

/// TCP connect timeout. reqwest applies it to the TLS handshake as well.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole request timeout, connect to last response byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const MAX_IDLE_PER_HOST: usize = 10;

/// Header the backend reads to learn the body encoding. It is not
/// `Content-Type`; the backend expects this exact name.
pub const CONTENT_DECLARATION_HEADER: &str = "Content-Kind";

const JSON_CONTENT: &str = "application/json";

/// Posts objects one at a time, failing on anything but `200 OK`.
#[derive(Debug, Clone)]
pub struct Submitter {
    client: Client,
}

impl Submitter {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(DIAL_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .build()
            .map_err(ProvisionError::ClientBuild)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Post one object's payload to `{backend}/{kind}`.
    pub async fn send(
        &self,
        backend: &str,
        kind: &str,
        identifier: &str,
        payload: &[u8],
    ) -> Result<()> {
        let url = target_url(backend, kind);
        let failed = |reason| ProvisionError::SubmissionFailed {
            kind: kind.to_string(),
            identifier: identifier.to_string(),
            url: url.clone(),
            reason,
        };

        let response = self
            .client
            .post(&url)
            .header(CONTENT_DECLARATION_HEADER, JSON_CONTENT)
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| failed(SubmitFailure::Transport(e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(failed(SubmitFailure::Status(status)));
        }

        Ok(())
    }

    /// Send every object in `objects` in map order, stopping at the first error.
    pub(crate) async fn send_all<F>(
        &self,
        backend: &str,
        objects: &KindMap,
        mut on_sent: F,
    ) -> Result<usize>
    where
        F: FnMut(&str, &str),
    {
        let mut sent = 0;
        for (kind, by_id) in objects {
            for (identifier, payload) in by_id {
                self.send(backend, kind, identifier, payload).await?;

                tracing::info!("Sent {} object {}.", kind, identifier);
                on_sent(kind, identifier);
                sent += 1;
            }
        }
        Ok(sent)
    }
}

/// `{backend}/{kind}`, joined verbatim.
pub fn target_url(backend: &str, kind: &str) -> String {
    format!("{}/{}", backend, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_url_appends_kind_segment() {
        assert_eq!(
            target_url("http://api-provision:8070", "asset"),
            "http://api-provision:8070/asset"
        );
    }

    #[test]
    fn client_builds_with_default_timeouts() {
        assert!(Submitter::new().is_ok());
    }
}
