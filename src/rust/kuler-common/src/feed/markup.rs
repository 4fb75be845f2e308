//! フィードのマークアップ解析
//!
//! `kuler:themeItem` ごとに1つのテーマを作る。要素名は名前空間を除いた
//! ローカル名を小文字化して照合する。

use quick_xml::events::{BytesText, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use crate::color::Color;
use crate::error::{KulerError, Result};
use crate::theme::Theme;

mod element {
    pub const THEME_ITEM: &[u8] = b"themeitem";
    pub const THEME_ID: &[u8] = b"themeid";
    pub const THEME_TITLE: &[u8] = b"themetitle";
    pub const THEME_SWATCHES: &[u8] = b"themeswatches";
    pub const SWATCH_HEX_COLOR: &[u8] = b"swatchhexcolor";
}

/// テキストを集めている要素
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Swatch,
}

/// 解析中のテーマ要素
#[derive(Debug, Default)]
struct ItemBuilder {
    id: Option<String>,
    title: Option<String>,
    seen_swatches: bool,
    in_swatches: bool,
    colors: Vec<Color>,
    field: Option<Field>,
    text: String,
}

impl ItemBuilder {
    fn open(&mut self, name: &[u8]) {
        match name {
            // 最初に出現したものだけを使う
            element::THEME_ID if self.id.is_none() => self.begin(Field::Id),
            element::THEME_TITLE if self.title.is_none() => self.begin(Field::Title),
            element::THEME_SWATCHES => {
                self.seen_swatches = true;
                self.in_swatches = true;
            }
            element::SWATCH_HEX_COLOR if self.in_swatches => self.begin(Field::Swatch),
            _ => {}
        }
    }

    fn begin(&mut self, field: Field) {
        self.field = Some(field);
        self.text.clear();
    }

    fn push_text(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    fn close(&mut self, name: &[u8]) -> Result<()> {
        let closing = match name {
            element::THEME_ID => Field::Id,
            element::THEME_TITLE => Field::Title,
            element::SWATCH_HEX_COLOR => Field::Swatch,
            element::THEME_SWATCHES => {
                self.in_swatches = false;
                return Ok(());
            }
            _ => return Ok(()),
        };
        if self.field != Some(closing) {
            return Ok(());
        }

        self.field = None;
        let value = self.text.trim().to_string();
        match closing {
            Field::Id => self.id = Some(value),
            Field::Title => self.title = Some(value),
            Field::Swatch => self.colors.push(Color::from_hex(&value)?),
        }
        Ok(())
    }

    fn finish(self) -> Result<Theme> {
        let id = self.id.ok_or(KulerError::MissingElement("themeID"))?;
        let title = self.title.ok_or(KulerError::MissingElement("themeTitle"))?;
        if !self.seen_swatches {
            return Err(KulerError::MissingElement("themeSwatches"));
        }
        Ok(Theme::new(id, title, self.colors))
    }
}

/// 1ページ分のマークアップをテーマの列に変換
pub fn decode_page(markup: &str) -> Result<Vec<Theme>> {
    // テキストは要素の終了時にまとめて trim する（インライン要素の前後の空白を残す）
    let mut reader = Reader::from_str(markup);
    // RSS内のHTML断片で終了タグが揃っていないことがある
    reader.check_end_names(false);

    let mut themes = Vec::new();
    let mut current: Option<ItemBuilder> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            KulerError::Markup(format!("at position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                match current.as_mut() {
                    Some(item) => item.open(&name),
                    None if name == element::THEME_ITEM => current = Some(ItemBuilder::default()),
                    None => {}
                }
            }
            Event::Empty(e) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if let Some(item) = current.as_mut() {
                    item.open(&name);
                    item.close(&name)?;
                } else if name == element::THEME_ITEM {
                    // 子要素のない themeItem は必須要素の欠落として扱う
                    themes.push(ItemBuilder::default().finish()?);
                }
            }
            Event::Text(text) => {
                if let Some(item) = current.as_mut() {
                    item.push_text(&unescape_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Some(item) = current.as_mut() {
                    item.push_text(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(e) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if name == element::THEME_ITEM {
                    if let Some(item) = current.take() {
                        let theme = item.finish()?;
                        debug!("Decoded theme: {}", theme);
                        themes.push(theme);
                    }
                } else if let Some(item) = current.as_mut() {
                    item.close(&name)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(themes)
}

/// HTML実体参照など未知のエスケープは元の文字列のまま残す
fn unescape_lossy(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}
