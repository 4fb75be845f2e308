//! 共通エラー型定義

use thiserror::Error;

/// Kulerクライアント共通エラー型
#[derive(Debug, Error)]
pub enum KulerError {
    /// 無効な引数（検索条件なし等）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 無効な色指定
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// テーマの色インデックスが範囲外
    #[error("Color index {index} out of range (theme has {len} colors)")]
    IndexOutOfRange { index: usize, len: usize },

    /// 通信エラー（接続失敗など）
    #[error("Transport error: {0}")]
    Transport(String),

    /// 2xx以外のHTTPステータス
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// タイムアウト
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// フィードのマークアップが解析できない
    #[error("Malformed feed markup: {0}")]
    Markup(String),

    /// テーマ要素に必須の子要素がない
    #[error("Missing element in theme item: {0}")]
    MissingElement(&'static str),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO エラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型のエイリアス
pub type Result<T> = std::result::Result<T, KulerError>;

impl KulerError {
    /// エラーコードを返す（CLI出力用）
    pub fn error_code(&self) -> &str {
        match self {
            KulerError::InvalidArgument(_) => "INVALID_ARGUMENT",
            KulerError::InvalidColor(_) => "INVALID_COLOR",
            KulerError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            KulerError::Transport(_) => "TRANSPORT_ERROR",
            KulerError::HttpStatus(_) => "HTTP_STATUS",
            KulerError::Timeout(_) => "TIMEOUT",
            KulerError::Markup(_) => "MARKUP_ERROR",
            KulerError::MissingElement(_) => "MISSING_ELEMENT",
            KulerError::Config(_) => "CONFIG_ERROR",
            KulerError::Io(_) => "IO_ERROR",
            KulerError::Json(_) => "JSON_ERROR",
        }
    }

    /// 通信層から来たエラーかどうか
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            KulerError::Transport(_) | KulerError::HttpStatus(_) | KulerError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(KulerError::InvalidArgument("x".into()).error_code(), "INVALID_ARGUMENT");
        assert_eq!(KulerError::HttpStatus(503).error_code(), "HTTP_STATUS");
        assert_eq!(KulerError::MissingElement("themeID").error_code(), "MISSING_ELEMENT");
    }

    #[test]
    fn test_transport_classification() {
        assert!(KulerError::Transport("refused".into()).is_transport());
        assert!(KulerError::Timeout("30s".into()).is_transport());
        assert!(KulerError::HttpStatus(404).is_transport());
        assert!(!KulerError::Markup("eof".into()).is_transport());
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = KulerError::IndexOutOfRange { index: 5, len: 5 };
        assert_eq!(err.to_string(), "Color index 5 out of range (theme has 5 colors)");
    }
}
