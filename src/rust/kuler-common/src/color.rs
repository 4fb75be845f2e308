//! 色の定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{KulerError, Result};

/// RGB色
///
/// 各チャンネルは概念上 0〜255 だが範囲チェックは行わない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    r: u16,
    g: u16,
    b: u16,
}

impl Color {
    /// RGB値から直接作成（検証なし）
    pub fn from_rgb(r: u16, g: u16, b: u16) -> Self {
        Color { r, g, b }
    }

    /// HEX文字列から作成
    ///
    /// 先頭の `#` は省略可。残りを3等分し、それぞれを16進数として解釈する。
    /// `#F80` は (15, 8, 0) になる（各桁の展開はしない）。
    /// 長さが0または3で割り切れない場合はエラー。
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.is_empty() || digits.len() % 3 != 0 {
            return Err(KulerError::InvalidColor(format!(
                "hex color must have a multiple of 3 digits: {:?}",
                hex
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(KulerError::InvalidColor(format!("not a hex color: {:?}", hex)));
        }

        let width = digits.len() / 3;
        let channel = |i: usize| {
            u16::from_str_radix(&digits[i * width..(i + 1) * width], 16)
                .map_err(|e| KulerError::InvalidColor(format!("{:?}: {}", hex, e)))
        };

        Ok(Color::from_rgb(channel(0)?, channel(1)?, channel(2)?))
    }

    pub fn red(&self) -> u16 {
        self.r
    }

    pub fn green(&self) -> u16 {
        self.g
    }

    pub fn blue(&self) -> u16 {
        self.b
    }

    pub fn to_rgb(&self) -> (u16, u16, u16) {
        (self.r, self.g, self.b)
    }

    /// 16ビット値に変換
    ///
    /// 256未満のチャンネルは256倍、それ以外はそのまま。
    pub fn to_rgb16(&self) -> (u16, u16, u16) {
        let scale = |c: u16| if c < 256 { c * 256 } else { c };
        (scale(self.r), scale(self.g), scale(self.b))
    }

    /// `#RRGGBB` 形式に変換
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = KulerError;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}
