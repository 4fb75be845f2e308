//! Kuler カラーテーマフィード クライアントライブラリ
//!
//! フィードをページ単位で取得し、テーマ（色の並び）を1件ずつ返す。
//!
//! ```no_run
//! use kuler_common::{FeedClient, ListOptions};
//!
//! let client = FeedClient::new("api-key")?;
//! for theme in client.list(ListOptions::default())? {
//!     println!("{}", theme?);
//! }
//! # Ok::<(), kuler_common::KulerError>(())
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod theme;

// バージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

// 主要な型の再エクスポート
pub use color::Color;
pub use config::Settings;
pub use error::{KulerError, Result};
pub use feed::{
    FeedClient,
    ListOptions,
    ListType,
    SearchCriteria,
    SearchFields,
    SearchOptions,
    Themes,
};
pub use fetch::Fetcher;
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use theme::Theme;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "kuler-common");
    }
}
