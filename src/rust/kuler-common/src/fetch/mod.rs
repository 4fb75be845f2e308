//! フィード取得の抽象化
//!
//! クライアントはURLを渡して本文を受け取るだけで、通信方法は知らない。
//! テストでは固定のページを返すクロージャやモックに差し替える。

#[cfg(feature = "http")]
pub mod http;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

#[cfg(feature = "http")]
pub use http::HttpFetcher;

/// URLから本文を取得するトレイト
#[cfg_attr(test, automock)]
pub trait Fetcher {
    /// URLを取得して本文を返す。失敗は通信エラーとしてそのまま返す
    fn fetch(&self, url: &str) -> Result<String>;
}

/// クロージャをそのままFetcherとして使う
impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<String>,
{
    fn fetch(&self, url: &str) -> Result<String> {
        self(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KulerError;

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |url: &str| -> Result<String> { Ok(format!("body of {}", url)) };
        assert_eq!(fetcher.fetch("http://a/b").unwrap(), "body of http://a/b");
    }

    #[test]
    fn test_closure_fetcher_error_passes_through() {
        let fetcher = |_: &str| -> Result<String> { Err(KulerError::Transport("refused".into())) };
        match fetcher.fetch("http://a/b") {
            Err(KulerError::Transport(msg)) => assert_eq!(msg, "refused"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
