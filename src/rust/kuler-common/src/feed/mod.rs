//! Kulerフィードクライアント
//!
//! 検索（`rss/search.cfm`）と一覧（`rss/get.cfm`）の2種類のフィードを
//! ページ単位で取得し、テーマを1件ずつ返す。

pub mod markup;
pub mod pager;
pub mod query;

use std::fmt;

use crate::config::DEFAULT_BASE_URL;
use crate::error::Result;
use crate::fetch::Fetcher;

#[cfg(feature = "http")]
use crate::config::Settings;
#[cfg(feature = "http")]
use crate::error::KulerError;
#[cfg(feature = "http")]
use crate::fetch::HttpFetcher;

pub use markup::decode_page;
pub use pager::Themes;
pub use query::{Feed, ListOptions, ListType, SearchCriteria, SearchFields, SearchOptions};

use query::FeedQuery;

/// フィードクライアント
///
/// APIキーと取得処理（Fetcher）だけを保持する。呼び出しごとに
/// 独立したページカーソルを持つため、前回の呼び出しの影響は受けない。
pub struct FeedClient<F> {
    api_key: String,
    base_url: String,
    fetcher: F,
}

impl<F: Fetcher> FeedClient<F> {
    /// 任意のFetcherでクライアントを作成
    pub fn with_fetcher(api_key: impl Into<String>, fetcher: F) -> Self {
        FeedClient {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            fetcher,
        }
    }

    /// ベースURLを変更（末尾は `/`）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// 条件でテーマを検索
    ///
    /// 検索値が空の場合は通信せずに `InvalidArgument` を返す。
    pub fn search(&self, criteria: SearchCriteria, options: SearchOptions) -> Result<Themes<'_, F>> {
        let query = FeedQuery::search(&criteria, &options)?;
        Ok(Themes::new(self, query))
    }

    /// 種別ごとのテーマ一覧
    pub fn list(&self, options: ListOptions) -> Result<Themes<'_, F>> {
        let query = FeedQuery::list(&options)?;
        Ok(Themes::new(self, query))
    }
}

#[cfg(feature = "http")]
impl FeedClient<HttpFetcher> {
    /// 既定設定のHTTPクライアントで作成
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let settings = Settings::default();
        Ok(Self::with_fetcher(api_key, HttpFetcher::from_config(&settings.api)?))
    }

    /// 設定から作成（APIキー必須）
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let api_key = settings
            .api
            .key
            .clone()
            .ok_or_else(|| KulerError::Config("API key is not configured".to_string()))?;

        let fetcher = HttpFetcher::from_config(&settings.api)?;
        Ok(Self::with_fetcher(api_key, fetcher).with_base_url(settings.api.base_url.clone()))
    }
}

impl<F> fmt::Debug for FeedClient<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // APIキーは出力しない
        f.debug_struct("FeedClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
