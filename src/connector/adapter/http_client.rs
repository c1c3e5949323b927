use std::time::Duration;

use crate::domain::DomainError;

/// Base builder shared by the outbound clients.
///
/// Without a timeout the request waits as long as the server keeps the
/// connection open.
pub fn http_client_builder(timeout: Option<Duration>) -> reqwest::ClientBuilder {
    let builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    }
}

pub fn ensure_http_url(name: &str, url: &str) -> Result<(), DomainError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(DomainError::config(format!(
            "{name} must start with http:// or https:// (got '{url}')"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(ensure_http_url("url", "https://example.com/webhook").is_ok());
        assert!(ensure_http_url("url", "http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        let err = ensure_http_url("PLANCHAT_WEBHOOK_URL", "ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("PLANCHAT_WEBHOOK_URL"));
    }
}
