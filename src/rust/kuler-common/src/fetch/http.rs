//! reqwestによるHTTP取得

use std::time::Duration;
use tracing::{info, trace};

use crate::config::ApiConfig;
use crate::error::{KulerError, Result};
use super::Fetcher;

/// ブロッキングHTTPクライアントによるFetcher実装
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// タイムアウトとUser-Agentを指定して作成
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| KulerError::Transport(format!("HTTP client error: {}", e)))?;

        info!("HTTP fetcher initialized (timeout: {:?})", timeout);
        Ok(HttpFetcher { client })
    }

    /// API設定から作成
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_secs), &config.user_agent)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(KulerError::HttpStatus(status.as_u16()));
        }

        let body = response.text().map_err(map_reqwest_error)?;
        trace!("Received {} bytes", body.len());
        Ok(body)
    }
}

/// URL（APIキーを含む）をメッセージに残さない
fn map_reqwest_error(e: reqwest::Error) -> KulerError {
    let e = e.without_url();
    if e.is_timeout() {
        KulerError::Timeout(e.to_string())
    } else {
        KulerError::Transport(e.to_string())
    }
}
