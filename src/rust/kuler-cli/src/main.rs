//! kuler コマンドラインツール
//!
//! テーマを検索または一覧取得し、1行に1テーマずつ表示する。

use std::io::{self, Write};

use anyhow::anyhow;
use clap::{ArgGroup, Parser};
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kuler_common::{
    FeedClient, KulerError, ListOptions, ListType, SearchFields, SearchOptions, Settings, Theme, VERSION,
};

/// Kuler カラーテーマの検索・一覧
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("criteria").args(["theme_id", "user_id", "email", "tag", "hex", "title"])
))]
struct Args {
    /// APIキー
    api_key: String,

    /// テーマIDで検索
    theme_id: Option<String>,

    /// ユーザーIDで検索
    #[arg(long)]
    user_id: Option<String>,

    /// メールアドレスで検索
    #[arg(long)]
    email: Option<String>,

    /// タグで検索
    #[arg(long)]
    tag: Option<String>,

    /// 色で検索（ABCDEF または 0xABCDEF）
    #[arg(long)]
    hex: Option<String>,

    /// タイトルで検索
    #[arg(long)]
    title: Option<String>,

    /// 一覧の種別 (recent, popular, rating, random)
    #[arg(long, default_value = "rating")]
    list_type: String,

    /// 最初のページ番号
    #[arg(long, default_value_t = 0)]
    start_index: u32,

    /// 1ページあたりの件数（省略時は設定値）
    #[arg(long)]
    items_per_page: Option<u32>,

    /// 最大件数（省略時は設定値、0 は無制限）
    #[arg(long, conflicts_with = "unlimited")]
    max_items: Option<usize>,

    /// 件数を制限しない
    #[arg(long)]
    unlimited: bool,

    /// 取得対象の日数（0 は無制限、一覧のみ）
    #[arg(long, default_value_t = 0)]
    time_span: u32,

    /// 1行1オブジェクトのJSONで出力
    #[arg(long)]
    json: bool,

    /// 各テーマの色も表示
    #[arg(long)]
    swatches: bool,

    /// ログレベル設定 (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// 詳細ログ出力（kuler_commonのログも表示）
    #[arg(short, long)]
    verbose: bool,

    /// 静かなモード（エラーのみ表示）
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn search_fields(&self) -> Option<SearchFields> {
        let fields = SearchFields {
            theme_id: self.theme_id.clone(),
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            tag: self.tag.clone(),
            hex: self.hex.clone(),
            title: self.title.clone(),
        };
        // 空文字でも指定されていれば検索として扱い、ライブラリ側で弾く
        let given = [
            &fields.theme_id,
            &fields.user_id,
            &fields.email,
            &fields.tag,
            &fields.hex,
            &fields.title,
        ]
        .iter()
        .any(|field| field.is_some());

        given.then_some(fields)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 設定読み込み（コマンドライン引数で上書き）
    let mut settings = Settings::new().map_err(feed_error)?;
    apply_args(&mut settings, &args);

    init_logging(&args, &settings.logging.level)?;
    info!("kuler {} starting", VERSION);
    debug!("Base URL: {}", settings.api.base_url);

    let client = FeedClient::from_settings(&settings).map_err(feed_error)?;

    let themes = match args.search_fields() {
        Some(fields) => {
            let criteria = fields.into_criteria().map_err(feed_error)?;
            let options = SearchOptions {
                start_index: args.start_index,
                ..SearchOptions::from_paging(&settings.paging)
            };
            info!("Searching themes by {}", criteria);
            client.search(criteria, options)
        }
        None => {
            let options = ListOptions {
                list_type: ListType::from(args.list_type.as_str()),
                start_index: args.start_index,
                time_span: args.time_span,
                ..ListOptions::from_paging(&settings.paging)
            };
            info!("Listing {} themes", options.list_type);
            client.list(options)
        }
    }
    .map_err(feed_error)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0;
    for (i, theme) in themes.enumerate() {
        let theme = theme.map_err(feed_error)?;
        print_theme(&mut out, i, &theme, &args)?;
        count += 1;
    }
    out.flush()?;

    info!("{} theme(s) listed", count);
    Ok(())
}

/// コマンドライン引数で設定を上書き
fn apply_args(settings: &mut Settings, args: &Args) {
    settings.api.key = Some(args.api_key.clone());
    if let Some(per_page) = args.items_per_page {
        settings.paging.items_per_page = per_page;
    }
    if args.unlimited {
        settings.paging.max_items = None;
    } else if let Some(max) = args.max_items {
        settings.paging.max_items = Some(max);
    }
    if let Some(level) = &args.log_level {
        settings.logging.level = level.clone();
    }
}

/// ログ初期化（標準エラー出力）
fn init_logging(args: &Args, configured_level: &str) -> anyhow::Result<()> {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match configured_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        }
    };

    let env_filter = if args.verbose {
        // 詳細モード：すべてのログを表示
        EnvFilter::from_default_env().add_directive(level.into())
    } else {
        // 通常モード：kuler_commonのログは警告以上のみ表示
        EnvFilter::from_default_env()
            .add_directive(level.into())
            .add_directive("kuler_common=warn".parse()?)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .try_init()?;

    Ok(())
}

fn print_theme(out: &mut impl Write, index: usize, theme: &Theme, args: &Args) -> io::Result<()> {
    if args.json {
        let colors: Vec<String> = theme.iter().map(|c| c.to_hex()).collect();
        let line = json!({
            "index": index,
            "id": theme.id(),
            "title": theme.title(),
            "colors": colors,
        });
        return writeln!(out, "{}", line);
    }

    writeln!(out, "{}. {}", index, theme)?;
    if args.swatches {
        for color in theme {
            writeln!(out, "    {} {}", color.to_hex(), color)?;
        }
    }
    Ok(())
}

/// エラーコード付きのメッセージに変換
fn feed_error(e: KulerError) -> anyhow::Error {
    let code = e.error_code().to_string();
    anyhow!(e).context(format!("[{}]", code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use kuler_common::Color;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_missing_api_key_is_usage_error() {
        assert!(Args::try_parse_from(["kuler"]).is_err());
    }

    #[test]
    fn test_theme_id_positional_searches() {
        let args = Args::try_parse_from(["kuler", "key1", "24198"]).unwrap();
        let fields = args.search_fields().unwrap();
        assert_eq!(fields.theme_id.as_deref(), Some("24198"));
    }

    #[test]
    fn test_no_criteria_lists() {
        let args = Args::try_parse_from(["kuler", "key1", "--list-type", "recent"]).unwrap();
        assert!(args.search_fields().is_none());
        assert_eq!(ListType::from(args.list_type.as_str()), ListType::Recent);
    }

    #[test]
    fn test_criteria_are_exclusive() {
        assert!(Args::try_parse_from(["kuler", "key1", "--tag", "sea", "--email", "a@b.c"]).is_err());
        assert!(Args::try_parse_from(["kuler", "key1", "42", "--title", "x"]).is_err());
    }

    #[test]
    fn test_empty_criterion_still_searches() {
        let args = Args::try_parse_from(["kuler", "key1", "--tag", ""]).unwrap();
        let fields = args.search_fields().unwrap();
        assert!(matches!(fields.into_criteria(), Err(KulerError::InvalidArgument(_))));
    }

    #[test]
    fn test_max_items_flag_zero_is_unlimited() {
        let args = Args::try_parse_from(["kuler", "key1", "--max-items", "0"]).unwrap();
        let mut settings = Settings::default();
        apply_args(&mut settings, &args);

        assert_eq!(settings.api.key.as_deref(), Some("key1"));
        assert_eq!(ListOptions::from_paging(&settings.paging).max_items, None);

        let args = Args::try_parse_from(["kuler", "key1", "--max-items", "5"]).unwrap();
        apply_args(&mut settings, &args);
        assert_eq!(SearchOptions::from_paging(&settings.paging).max_items, Some(5));
    }

    #[test]
    fn test_print_text_line() {
        let args = Args::try_parse_from(["kuler", "key1", "--swatches"]).unwrap();
        let theme = Theme::new("24198", "Tech Office", vec![Color::from_rgb(255, 128, 0)]);
        let mut out = Vec::new();
        print_theme(&mut out, 0, &theme, &args).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0. Theme: 24198 (Tech Office)\n    #FF8000 (255, 128, 0)\n"
        );
    }

    #[test]
    fn test_print_json_line() {
        let args = Args::try_parse_from(["kuler", "key1", "--json"]).unwrap();
        let theme = Theme::new("7", "Mono", vec![Color::from_rgb(0, 0, 0)]);
        let mut out = Vec::new();
        print_theme(&mut out, 3, &theme, &args).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["index"], 3);
        assert_eq!(value["id"], "7");
        assert_eq!(value["colors"][0], "#000000");
    }

    #[test]
    fn test_feed_error_keeps_code() {
        let err = feed_error(KulerError::HttpStatus(503));
        assert_eq!(err.to_string(), "[HTTP_STATUS]");
        assert!(format!("{:#}", err).contains("Unexpected HTTP status: 503"));
    }
}
