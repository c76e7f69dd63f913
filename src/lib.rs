//! # Flashcard Harvest
//!
//! 从 card2brain 卡片盒抓取全部闪卡，导出为图片和文本
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageSession` - 唯一的 page owner，实现 `PageFetcher`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单页或单段文本
//! - `CardParser` - HTML → 闪卡
//! - `CardRenderer` / `FontProvider` - 文本 → PNG
//! - `TranscriptWriter` - 写 flashcards.txt
//!
//! ### ③ 流程层（Workflow）
//! - `HarvestFlow` - 翻页直到数据结束
//! - `ExportFlow` - 每张卡两张图片 + 文本导出
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 浏览器生命周期、人工登录交接、前置检查

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PageFetcher, PageSession};
pub use models::{extract_unit_code, CardSide, Flashcard, HarvestResult, HarvestStop};
pub use orchestrator::{App, RunOutcome};
pub use services::{CardRenderer, TranscriptWriter};
pub use workflow::{ExportFlow, ExportSummary, HarvestFlow, HarvestSettings};
