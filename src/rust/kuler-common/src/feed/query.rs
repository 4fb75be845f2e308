//! 検索条件・一覧種別・ページングオプション

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::config::PagingConfig;
use crate::error::{KulerError, Result};

/// フィードのエンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// 条件検索
    Search,
    /// 種別ごとの一覧
    Listing,
}

impl Feed {
    pub fn path(&self) -> &'static str {
        match self {
            Feed::Search => "rss/search.cfm",
            Feed::Listing => "rss/get.cfm",
        }
    }
}

/// 検索条件（いずれか1つ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SearchCriteria {
    ThemeId(String),
    UserId(String),
    Email(String),
    Tag(String),
    /// `ABCDEF` または `0xABCDEF`（サーバー側で解釈）
    Hex(String),
    Title(String),
}

impl SearchCriteria {
    /// フィード上のフィールド名
    pub fn field(&self) -> &'static str {
        match self {
            SearchCriteria::ThemeId(_) => "themeID",
            SearchCriteria::UserId(_) => "userID",
            SearchCriteria::Email(_) => "email",
            SearchCriteria::Tag(_) => "tag",
            SearchCriteria::Hex(_) => "hex",
            SearchCriteria::Title(_) => "title",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SearchCriteria::ThemeId(v)
            | SearchCriteria::UserId(v)
            | SearchCriteria::Email(v)
            | SearchCriteria::Tag(v)
            | SearchCriteria::Hex(v)
            | SearchCriteria::Title(v) => v,
        }
    }

    /// `field:value` 形式の検索トークン
    pub fn to_query(&self) -> String {
        format!("{}:{}", self.field(), self.value())
    }

    /// 値が空でないことを確認
    pub fn validate(&self) -> Result<()> {
        if self.value().trim().is_empty() {
            return Err(KulerError::InvalidArgument(format!(
                "search value for {} must not be empty",
                self.field()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// キーワード形式の検索条件
///
/// 複数指定された場合は themeID → userID → email → tag → hex → title の
/// 順で最初の空でない値だけが使われる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFields {
    pub theme_id: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub tag: Option<String>,
    pub hex: Option<String>,
    pub title: Option<String>,
}

impl SearchFields {
    /// 空でない値が1つもないか
    pub fn is_empty(&self) -> bool {
        self.candidates().all(|value| value.is_none())
    }

    /// 優先順位に従って検索条件を1つ選ぶ
    pub fn into_criteria(self) -> Result<SearchCriteria> {
        let SearchFields { theme_id, user_id, email, tag, hex, title } = self;
        let ordered: [(fn(String) -> SearchCriteria, Option<String>); 6] = [
            (SearchCriteria::ThemeId, theme_id),
            (SearchCriteria::UserId, user_id),
            (SearchCriteria::Email, email),
            (SearchCriteria::Tag, tag),
            (SearchCriteria::Hex, hex),
            (SearchCriteria::Title, title),
        ];

        ordered
            .into_iter()
            .find_map(|(make, value)| value.filter(|v| !v.trim().is_empty()).map(make))
            .ok_or_else(|| {
                KulerError::InvalidArgument("At least one search criterion must be specified".to_string())
            })
    }

    fn candidates(&self) -> impl Iterator<Item = Option<&str>> {
        [
            self.theme_id.as_deref(),
            self.user_id.as_deref(),
            self.email.as_deref(),
            self.tag.as_deref(),
            self.hex.as_deref(),
            self.title.as_deref(),
        ]
        .into_iter()
        .map(|value| value.filter(|v| !v.trim().is_empty()))
    }
}

impl TryFrom<SearchFields> for SearchCriteria {
    type Error = KulerError;

    fn try_from(fields: SearchFields) -> Result<Self> {
        fields.into_criteria()
    }
}

/// 一覧の並び順（サーバー側で解釈、ローカルでは検証しない）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListType {
    Recent,
    Popular,
    #[default]
    Rating,
    Random,
    /// 未知の値はそのままサーバーへ渡す
    Other(String),
}

impl ListType {
    pub fn as_str(&self) -> &str {
        match self {
            ListType::Recent => "recent",
            ListType::Popular => "popular",
            ListType::Rating => "rating",
            ListType::Random => "random",
            ListType::Other(value) => value,
        }
    }
}

impl From<&str> for ListType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "recent" => ListType::Recent,
            "popular" => ListType::Popular,
            "rating" => ListType::Rating,
            "random" => ListType::Random,
            _ => ListType::Other(s.to_string()),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 検索のページングオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// 最初のページ番号
    pub start_index: u32,
    pub items_per_page: u32,
    /// 取得する最大件数（None は無制限）
    pub max_items: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            start_index: 0,
            items_per_page: 20,
            max_items: Some(100),
        }
    }
}

impl SearchOptions {
    pub fn from_paging(paging: &PagingConfig) -> Self {
        SearchOptions {
            items_per_page: paging.items_per_page,
            max_items: paging.limit(),
            ..Self::default()
        }
    }
}

/// 一覧のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub list_type: ListType,
    /// 最初のページ番号
    pub start_index: u32,
    pub items_per_page: u32,
    /// 取得対象の日数（0 は無制限）
    pub time_span: u32,
    /// 取得する最大件数（None は無制限）
    pub max_items: Option<usize>,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            list_type: ListType::default(),
            start_index: 0,
            items_per_page: 20,
            time_span: 0,
            max_items: Some(100),
        }
    }
}

impl ListOptions {
    pub fn from_paging(paging: &PagingConfig) -> Self {
        ListOptions {
            items_per_page: paging.items_per_page,
            max_items: paging.limit(),
            ..Self::default()
        }
    }
}

/// 1回の取得で共通のパラメータ（ページ番号以外）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedQuery {
    pub feed: Feed,
    /// URLに並べる順序どおりのオプション
    pub options: Vec<(&'static str, String)>,
    pub start_index: u32,
    pub items_per_page: u32,
    pub max_items: Option<usize>,
}

impl FeedQuery {
    pub fn search(criteria: &SearchCriteria, options: &SearchOptions) -> Result<Self> {
        criteria.validate()?;
        check_page_size(options.items_per_page)?;

        Ok(FeedQuery {
            feed: Feed::Search,
            options: vec![
                ("searchQuery", criteria.to_query()),
                ("itemsPerPage", options.items_per_page.to_string()),
            ],
            start_index: options.start_index,
            items_per_page: options.items_per_page,
            max_items: options.max_items,
        })
    }

    pub fn list(options: &ListOptions) -> Result<Self> {
        check_page_size(options.items_per_page)?;

        Ok(FeedQuery {
            feed: Feed::Listing,
            options: vec![
                ("listType", options.list_type.to_string()),
                ("itemsPerPage", options.items_per_page.to_string()),
                ("timeSpan", options.time_span.to_string()),
            ],
            start_index: options.start_index,
            items_per_page: options.items_per_page,
            max_items: options.max_items,
        })
    }

    /// `<base><endpoint>?<k>=<v>&...&startIndex=<n>&key=<key>`
    ///
    /// 値はエンコードせずそのまま埋め込む。
    pub fn page_url(&self, base_url: &str, page: u32, api_key: &str) -> String {
        let options = self
            .options
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}{}?{}&startIndex={}&key={}",
            base_url,
            self.feed.path(),
            options,
            page,
            api_key
        )
    }
}

fn check_page_size(items_per_page: u32) -> Result<()> {
    if items_per_page == 0 {
        return Err(KulerError::InvalidArgument("itemsPerPage must be at least 1".to_string()));
    }
    Ok(())
}
