//! 导出流程 - 流程层
//!
//! 核心职责：为每张闪卡的两面各渲染一张图片，再写出文本导出
//!
//! 目录结构：
//! ```text
//! flashcards_<unit_code>/
//!     1f.png  1a.png
//!     2f.png  2a.png
//!     ...
//!     flashcards.txt
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{CardSide, HarvestResult};
use crate::services::{CardRenderer, TranscriptWriter};
use crate::utils::logging::truncate_text;

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub folder: PathBuf,
    pub card_count: usize,
    pub transcript_path: PathBuf,
}

/// 卡片盒的输出目录名
pub fn output_folder_name(unit_code: &str) -> String {
    format!("flashcards_{}", unit_code)
}

/// 导出流程
pub struct ExportFlow {
    renderer: CardRenderer,
    transcript_writer: TranscriptWriter,
}

impl ExportFlow {
    pub fn new(renderer: CardRenderer) -> Self {
        Self {
            renderer,
            transcript_writer: TranscriptWriter::new(),
        }
    }

    /// 在 `output_root` 下导出全部卡片
    pub async fn export(&self, harvest: &HarvestResult, output_root: &Path) -> Result<ExportSummary> {
        let folder = output_root.join(output_folder_name(&harvest.unit_code));
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|e| AppError::create_dir_failed(folder.display().to_string(), e))?;

        info!("🖼️ 正在渲染 {} 张卡片到: {}", harvest.len(), folder.display());

        for (index, card) in harvest.numbered() {
            for side in CardSide::ALL {
                let path = folder.join(side.image_file_name(index));
                self.renderer
                    .render(card.side(side), &path)
                    .with_context(|| format!("渲染第 {} 张卡片失败", index))?;
            }
            debug!(
                "[卡片 {}] {} -> {}",
                index,
                truncate_text(card.question(), 40),
                truncate_text(card.answer(), 40)
            );
        }

        let transcript_path = self
            .transcript_writer
            .write(&folder, &harvest.cards)
            .await?;

        Ok(ExportSummary {
            folder,
            card_count: harvest.len(),
            transcript_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Flashcard, HarvestStop};
    use crate::services::{CanvasSpec, CardFont};

    #[test]
    fn test_output_folder_name() {
        assert_eq!(output_folder_name("ABC123"), "flashcards_ABC123");
    }

    #[tokio::test]
    async fn test_export_writes_two_images_per_card_and_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CardRenderer::new(CardFont::builtin(40.0), CanvasSpec::default()).unwrap();
        let harvest = HarvestResult {
            unit_code: "ABC123".to_string(),
            cards: vec![
                Flashcard::new("Frage eins", "Antwort eins").unwrap(),
                Flashcard::new("Frage zwei", "Antwort zwei").unwrap(),
            ],
            pages_fetched: 2,
            stop: HarvestStop::EmptyPage,
        };

        let summary = ExportFlow::new(renderer)
            .export(&harvest, dir.path())
            .await
            .unwrap();

        let folder = dir.path().join("flashcards_ABC123");
        assert_eq!(summary.folder, folder);
        assert_eq!(summary.card_count, 2);
        for name in ["1f.png", "1a.png", "2f.png", "2a.png", "flashcards.txt"] {
            assert!(folder.join(name).is_file(), "missing {}", name);
        }
        let transcript = std::fs::read_to_string(summary.transcript_path).unwrap();
        assert!(transcript.starts_with("1F: Frage eins\n1A: Antwort eins\n\n2F: Frage zwei"));
    }
}
