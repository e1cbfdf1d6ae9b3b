//! HTTP transport for shutdown requests
//!
//! The shutdown agent on the target accepts:
//! ```text
//! POST http://{host}:8080/
//! Content-Type: application/json
//!
//! {"key":"<shared key>"}
//! ```

use crate::config::ShutdownSettings;
use crate::transport::traits::ShutdownTransport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Serialize)]
struct ShutdownBody<'a> {
    key: &'a str,
}

/// Shutdown client backed by reqwest.
///
/// Idle connections are never pooled, so every request opens its own
/// connection and closes it when the response is dropped.
pub struct HttpShutdownClient {
    client: reqwest::Client,
    port: u16,
}

impl HttpShutdownClient {
    pub fn new(settings: &ShutdownSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .read_timeout(settings.read_timeout())
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            port: settings.port,
        })
    }

    fn url(&self, host: &str) -> String {
        format!("http://{}:{}/", host, self.port)
    }
}

#[async_trait]
impl ShutdownTransport for HttpShutdownClient {
    async fn post_shutdown(&self, host: &str, key: &str) -> Result<u16> {
        let response = self
            .client
            .post(self.url(host))
            .json(&ShutdownBody { key })
            .send()
            .await?;

        Ok(response.status().as_u16())
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}
