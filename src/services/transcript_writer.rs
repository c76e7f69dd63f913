//! 文本导出服务 - 业务能力层
//!
//! 只负责"写 flashcards.txt"能力，不关心流程

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{CardSide, Flashcard};

/// 文本导出文件名
pub const TRANSCRIPT_FILE_NAME: &str = "flashcards.txt";

/// 文本导出服务
///
/// 每张卡输出三行：`<n>F: 问题`、`<n>A: 答案`、空行
pub struct TranscriptWriter {
    file_name: String,
}

impl TranscriptWriter {
    pub fn new() -> Self {
        Self {
            file_name: TRANSCRIPT_FILE_NAME.to_string(),
        }
    }

    /// 使用自定义文件名创建
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// 在 `folder` 下写入全部卡片，返回文件路径
    pub async fn write(&self, folder: &Path, cards: &[Flashcard]) -> Result<PathBuf> {
        let path = folder.join(&self.file_name);
        debug!("写入文本导出: {} ({} 张卡片)", path.display(), cards.len());

        tokio::fs::write(&path, format_transcript(cards))
            .await
            .with_context(|| format!("无法写入文本导出: {}", path.display()))?;

        Ok(path)
    }
}

impl Default for TranscriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// 按抓取顺序格式化全部卡片，编号从 1 开始
pub fn format_transcript(cards: &[Flashcard]) -> String {
    let mut out = String::new();
    for (i, card) in cards.iter().enumerate() {
        for side in CardSide::ALL {
            // 写入 String 不会失败
            let _ = writeln!(out, "{}{}: {}", i + 1, side.transcript_tag(), card.side(side));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<Flashcard> {
        vec![
            Flashcard::new("Was ist 2+2?", "4").unwrap(),
            Flashcard::new("Grüezi heisst?", "Guten Tag").unwrap(),
        ]
    }

    #[test]
    fn test_format_transcript() {
        assert_eq!(
            format_transcript(&cards()),
            "1F: Was ist 2+2?\n1A: 4\n\n2F: Grüezi heisst?\n2A: Guten Tag\n\n"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn test_write_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TranscriptWriter::with_file_name("export.txt");

        let path = tokio_test::block_on(writer.write(dir.path(), &cards())).unwrap();

        assert_eq!(path, dir.path().join("export.txt"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("2F: Grüezi heisst?"));
    }
}
