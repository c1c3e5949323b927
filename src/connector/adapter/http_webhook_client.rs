use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::WebhookClient;
use crate::connector::adapter::{ensure_http_url, http_client_builder};
use crate::domain::{DomainError, WebhookEnvelope};

pub const DEFAULT_WEBHOOK_URL: &str = "https://chatbot-lpd7.onrender.com/webhook";

/// Posts envelopes to the fulfillment webhook over HTTP(S).
///
/// When a CA certificate file is given, the certificates in it become the
/// only trust anchors and the platform roots are disabled. This is what a
/// corporate TLS-inspecting proxy requires. Without one, standard
/// verification applies.
pub struct HttpWebhookClient {
    client: reqwest::Client,
    url: String,
    ca_cert: Option<PathBuf>,
}

impl HttpWebhookClient {
    pub fn new(
        url: impl Into<String>,
        ca_cert: Option<&Path>,
        timeout: Option<Duration>,
    ) -> Result<Self, DomainError> {
        let url: String = url.into();
        ensure_http_url("webhook URL", &url)?;

        let mut builder = http_client_builder(timeout);
        if let Some(path) = ca_cert {
            let certificates = load_certificates(path)?;
            info!(
                "Pinning webhook TLS to {} certificate(s) from {}",
                certificates.len(),
                path.display()
            );
            builder = builder.tls_built_in_root_certs(false);
            for certificate in certificates {
                builder = builder.add_root_certificate(certificate);
            }
        }

        let client = builder
            .build()
            .map_err(|e| DomainError::config(format!("HttpWebhookClient: {e}")))?;

        Ok(Self {
            client,
            url,
            ca_cert: ca_cert.map(Path::to_path_buf),
        })
    }

    pub fn ca_cert(&self) -> Option<&Path> {
        self.ca_cert.as_deref()
    }
}

fn load_certificates(path: &Path) -> Result<Vec<reqwest::Certificate>, DomainError> {
    let pem = std::fs::read(path).map_err(|e| {
        DomainError::config(format!(
            "cannot read CA certificate {}: {e}",
            path.display()
        ))
    })?;
    let certificates = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
        DomainError::config(format!("invalid CA certificate {}: {e}", path.display()))
    })?;
    if certificates.is_empty() {
        return Err(DomainError::config(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certificates)
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn deliver(&self, envelope: &WebhookEnvelope) -> Result<Value, DomainError> {
        debug!("Webhook request to {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| DomainError::webhook(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Webhook returned {status}: {body}");
            return Err(DomainError::webhook(format!("webhook returned {status}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DomainError::webhook(format!("response body is not JSON: {e}")))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
