//! 字体提供服务 - 业务能力层
//!
//! 只负责"给我一个可用的字体"，永远不会失败

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::services::builtin_font::BitmapFont;

/// 常见的系统字体目录，按顺序查找
const SYSTEM_FONT_DIRS: &[&str] = &[
    r"C:\Windows\Fonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
];

/// 首选字体不可用时依次尝试的备用字体
const FALLBACK_FONT_FILES: &[&str] = &["Arial.ttf", "DejaVuSans.ttf"];

/// 文本度量能力
///
/// 换行和居中算法只依赖这两个度量
pub trait TextMetrics {
    /// 文本的排版宽度（包括末尾空格的步进）
    fn text_width(&self, text: &str) -> f32;

    /// 文本包围盒底边距行顶的高度，空文本为 0
    fn text_height(&self, text: &str) -> u32;
}

/// 渲染卡片用的字体
#[derive(Clone)]
pub enum CardFont {
    /// TrueType / OpenType 字体
    Outline { font: FontArc, scale: PxScale },
    /// 内置点阵字体
    Builtin(BitmapFont),
}

impl CardFont {
    pub fn outline(font: FontArc, size: f32) -> Self {
        CardFont::Outline {
            font,
            scale: PxScale::from(size),
        }
    }

    pub fn builtin(size: f32) -> Self {
        CardFont::Builtin(BitmapFont::with_size(size))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, CardFont::Builtin(_))
    }

    /// 以 `(x, y)` 为行顶左侧绘制一行文本
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        match self {
            CardFont::Outline { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text)
            }
            CardFont::Builtin(bitmap) => bitmap.draw(canvas, color, x, y, text),
        }
    }
}

impl TextMetrics for CardFont {
    fn text_width(&self, text: &str) -> f32 {
        match self {
            CardFont::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                let mut width = 0.0;
                let mut previous = None;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                width
            }
            CardFont::Builtin(bitmap) => bitmap.text_width(text),
        }
    }

    fn text_height(&self, text: &str) -> u32 {
        match self {
            CardFont::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                let ascent = scaled.ascent();
                let mut caret = 0.0;
                let mut bottom: f32 = 0.0;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    let glyph = id.with_scale_and_position(*scale, point(caret, ascent));
                    caret += scaled.h_advance(id);
                    // 空格等字符没有轮廓
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        bottom = bottom.max(outlined.px_bounds().max.y);
                    }
                }
                bottom.ceil().max(0.0) as u32
            }
            CardFont::Builtin(bitmap) => bitmap.text_height(text),
        }
    }
}

/// 字体提供服务
pub struct FontProvider;

impl FontProvider {
    /// 按路径加载字体，失败时依次尝试系统字体目录和备用字体，最后使用内置点阵字体
    pub fn resolve(preferred: &Path, size: f32) -> CardFont {
        let font = Self::resolve_from(&Self::candidates(preferred), size);
        if font.is_builtin() {
            warn!(
                "⚠️ 找不到字体 {}，使用内置点阵字体",
                preferred.display()
            );
        }
        font
    }

    /// 按顺序尝试给定的字体文件，全部失败时返回内置点阵字体
    pub fn resolve_from(candidates: &[PathBuf], size: f32) -> CardFont {
        for candidate in candidates {
            match Self::load(candidate) {
                Some(font) => {
                    info!("🔤 使用字体: {}", candidate.display());
                    return CardFont::outline(font, size);
                }
                None => debug!("字体不可用: {}", candidate.display()),
            }
        }

        CardFont::builtin(size)
    }

    fn candidates(preferred: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![preferred.to_path_buf()];

        let mut file_names: Vec<&std::ffi::OsStr> = Vec::new();
        if let Some(name) = preferred.file_name() {
            file_names.push(name);
        }
        file_names.extend(FALLBACK_FONT_FILES.iter().map(std::ffi::OsStr::new));

        for name in file_names {
            for dir in SYSTEM_FONT_DIRS {
                let path = Path::new(dir).join(name);
                if !candidates.contains(&path) {
                    candidates.push(path);
                }
            }
        }

        candidates
    }

    fn load(path: &Path) -> Option<FontArc> {
        let bytes = std::fs::read(path).ok()?;
        FontArc::try_from_vec(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_falls_back_to_builtin() {
        let font = FontProvider::resolve_from(
            &[PathBuf::from("no-such-font-4b1d.ttf"), PathBuf::from("/nonexistent/x.otf")],
            40.0,
        );
        assert!(font.is_builtin());
        assert_eq!(font.text_width("ab"), 60.0);
        assert_eq!(font.text_height("ab"), 35);
    }

    #[test]
    fn test_candidates_start_with_preferred_path() {
        let candidates = FontProvider::candidates(Path::new("fonts/Custom.ttf"));
        assert_eq!(candidates[0], PathBuf::from("fonts/Custom.ttf"));
        assert!(candidates
            .iter()
            .any(|p| p.ends_with("Custom.ttf") && p != &PathBuf::from("fonts/Custom.ttf")));
        assert!(candidates.iter().any(|p| p.ends_with("DejaVuSans.ttf")));
    }
}
