//! ページ単位の取得とテーマの逐次出力

use std::fmt;
use std::iter::FusedIterator;
use std::vec;
use tracing::debug;

use crate::error::{KulerError, Result};
use crate::fetch::Fetcher;
use crate::theme::Theme;
use super::markup::decode_page;
use super::query::FeedQuery;
use super::FeedClient;

/// 取得ループの状態
#[derive(Debug)]
enum State {
    /// 次のページを取得する
    Fetching,
    /// 取得済みページのテーマを順に返す
    Emitting {
        themes: vec::IntoIter<Theme>,
        /// ページが要求件数に満たなかった（最終ページ）
        last: bool,
    },
    Done,
}

/// `search`/`list` が返す遅延イテレータ
///
/// `next()` が呼ばれるまで通信しない。取得・解析エラーは `Err` として
/// 1度だけ返し、その後は `None` を返し続ける。ページ番号が `u32` の
/// 上限を超える場合も `InvalidArgument` を1度返して終了する。
pub struct Themes<'a, F> {
    client: &'a FeedClient<F>,
    query: FeedQuery,
    /// 現在のページ番号（1ページごとに1ずつ進む）
    page: u32,
    produced: usize,
    state: State,
}

impl<'a, F: Fetcher> Themes<'a, F> {
    pub(crate) fn new(client: &'a FeedClient<F>, query: FeedQuery) -> Self {
        Themes {
            client,
            page: query.start_index,
            query,
            produced: 0,
            state: State::Fetching,
        }
    }

    /// これまでに返したテーマの数
    pub fn produced(&self) -> usize {
        self.produced
    }

    fn limit_reached(&self) -> bool {
        self.query.max_items.is_some_and(|max| self.produced >= max)
    }

    fn fetch_page(&self) -> Result<Vec<Theme>> {
        let url = self
            .query
            .page_url(self.client.base_url(), self.page, self.client.api_key());
        debug!("Fetching {} (startIndex={})", self.query.feed.path(), self.page);

        let body = self.client.fetcher().fetch(&url)?;
        let themes = decode_page(&body)?;

        debug!("Found {} themes", themes.len());
        Ok(themes)
    }
}

impl<F: Fetcher> Iterator for Themes<'_, F> {
    type Item = Result<Theme>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.limit_reached() {
                self.state = State::Done;
            }

            match &mut self.state {
                State::Done => return None,
                State::Emitting { themes, last } => {
                    if let Some(theme) = themes.next() {
                        self.produced += 1;
                        return Some(Ok(theme));
                    }
                    if *last {
                        self.state = State::Done;
                        continue;
                    }
                    match self.page.checked_add(1) {
                        Some(next) => {
                            self.page = next;
                            self.state = State::Fetching;
                        }
                        None => {
                            self.state = State::Done;
                            return Some(Err(KulerError::InvalidArgument(format!(
                                "startIndex cannot advance past {}",
                                self.page
                            ))));
                        }
                    }
                }
                State::Fetching => match self.fetch_page() {
                    Ok(themes) if themes.is_empty() => self.state = State::Done,
                    Ok(themes) => {
                        let last = themes.len() < self.query.items_per_page as usize;
                        self.state = State::Emitting {
                            themes: themes.into_iter(),
                            last,
                        };
                    }
                    Err(e) => {
                        self.state = State::Done;
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}

impl<F: Fetcher> FusedIterator for Themes<'_, F> {}

impl<F> fmt::Debug for Themes<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Themes")
            .field("feed", &self.query.feed)
            .field("page", &self.page)
            .field("produced", &self.produced)
            .field("state", &self.state)
            .finish()
    }
}
