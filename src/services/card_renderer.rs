//! 卡片渲染服务 - 业务能力层
//!
//! 把一段文本按固定画布自动换行、居中，保存为 PNG

use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, RenderError};
use crate::services::font_provider::{CardFont, FontProvider, TextMetrics};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// 画布尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    /// 左右各留的边距
    pub margin: u32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            margin: 20,
        }
    }
}

impl CanvasSpec {
    /// 一行文字允许的最大宽度，边距超过画布时为 0
    pub fn usable_width(&self) -> f32 {
        self.width.saturating_sub(self.margin.saturating_mul(2)) as f32
    }

    fn validate(self) -> AppResult<Self> {
        if self.width == 0 || self.height == 0 || self.margin.saturating_mul(2) >= self.width {
            return Err(AppError::Render(RenderError::InvalidCanvas {
                width: self.width,
                height: self.height,
                margin: self.margin,
            }));
        }
        Ok(self)
    }
}

/// 排版后的一行
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    pub text: String,
    pub width: f32,
    pub height: u32,
}

/// 一段文本的排版结果
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub lines: Vec<LaidOutLine>,
    /// 所有行高度之和
    pub total_height: u32,
    /// 第一行的 y 坐标
    pub top: i32,
}

impl LineLayout {
    /// 每一行的绘制坐标 `(x, y)`
    pub fn positions(&self, canvas: &CanvasSpec) -> Vec<(i32, i32)> {
        let mut y = self.top;
        self.lines
            .iter()
            .map(|line| {
                let x = ((canvas.width as f32 - line.width) / 2.0).floor() as i32;
                let position = (x, y);
                y += line.height as i32;
                position
            })
            .collect()
    }
}

/// 贪心换行
///
/// 单词按空白切分；加上下一个单词后宽度达到 `max_width` 就换行。
/// 单个超宽的单词独占一行，不会被拆开。结果至少有一行。
pub fn wrap_text(text: &str, metrics: &dyn TextMetrics, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = format!("{}{} ", line, word);
        if metrics.text_width(&candidate) < max_width {
            line = candidate;
        } else {
            lines.push(line.trim().to_string());
            line = format!("{} ", word);
        }
    }
    lines.push(line.trim().to_string());

    lines
}

/// 换行并计算垂直居中的起点
pub fn layout_text(text: &str, metrics: &dyn TextMetrics, canvas: &CanvasSpec) -> LineLayout {
    let lines: Vec<LaidOutLine> = wrap_text(text, metrics, canvas.usable_width())
        .into_iter()
        .map(|text| LaidOutLine {
            width: metrics.text_width(&text),
            height: metrics.text_height(&text),
            text,
        })
        .collect();

    let total_height: u32 = lines.iter().map(|line| line.height).sum();
    // 溢出时 top 为负数，向下取整
    let top = (canvas.height as i64 - total_height as i64).div_euclid(2) as i32;

    LineLayout {
        lines,
        total_height,
        top,
    }
}

/// 卡片渲染服务
///
/// 职责：
/// - 持有字体和画布尺寸
/// - 对单段文本排版、绘制、保存
/// - 不认识 Flashcard 的编号和目录
pub struct CardRenderer {
    font: CardFont,
    canvas: CanvasSpec,
}

impl CardRenderer {
    pub fn new(font: CardFont, canvas: CanvasSpec) -> AppResult<Self> {
        Ok(Self {
            font,
            canvas: canvas.validate()?,
        })
    }

    /// 按配置加载字体并创建渲染器
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let font = FontProvider::resolve(&config.font_path, config.font_size);
        Self::new(
            font,
            CanvasSpec {
                width: config.canvas_width,
                height: config.canvas_height,
                margin: config.margin,
            },
        )
    }

    pub fn canvas(&self) -> &CanvasSpec {
        &self.canvas
    }

    pub fn layout(&self, text: &str) -> LineLayout {
        layout_text(text, &self.font, &self.canvas)
    }

    /// 在新画布上绘制文本
    pub fn draw(&self, text: &str) -> RgbImage {
        let layout = self.layout(text);
        let mut image = RgbImage::from_pixel(self.canvas.width, self.canvas.height, BACKGROUND);

        for (line, (x, y)) in layout.lines.iter().zip(layout.positions(&self.canvas)) {
            if !line.text.is_empty() {
                self.font.draw(&mut image, INK, x, y, &line.text);
            }
        }

        image
    }

    /// 绘制并保存为 PNG
    pub fn render(&self, text: &str, output_path: &Path) -> AppResult<()> {
        let image = self.draw(text);
        image
            .save_with_format(output_path, ImageFormat::Png)
            .map_err(|e| AppError::image_save_failed(output_path.display().to_string(), e))?;
        debug!("已保存图片: {}", output_path.display());
        Ok(())
    }
}
