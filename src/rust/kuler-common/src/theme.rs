//! テーマ（色の並び）の定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use crate::color::Color;
use crate::error::{KulerError, Result};

/// フィードから取得したカラーテーマ
///
/// 色の数と順序は作成後に変わらない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    id: String,
    title: String,
    colors: Vec<Color>,
}

impl Theme {
    pub fn new(id: impl Into<String>, title: impl Into<String>, colors: Vec<Color>) -> Self {
        Theme {
            id: id.into(),
            title: title.into(),
            colors,
        }
    }

    /// テーマID（フィード上の値をそのまま保持）
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    /// インデックスで色を取得（範囲外はエラー）
    pub fn color(&self, index: usize) -> Result<&Color> {
        self.colors.get(index).ok_or(KulerError::IndexOutOfRange {
            index,
            len: self.colors.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }
}

impl Index<usize> for Theme {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.colors[index]
    }
}

impl<'a> IntoIterator for &'a Theme {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Theme: {} ({})", self.id, self.title)
    }
}
