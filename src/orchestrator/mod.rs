//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源管理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (持有 Browser 和 PageSession)
//!     ↓
//! workflow::{HarvestFlow, ExportFlow}
//!     ↓
//! services (能力层：parse / render / transcript)
//!     ↓
//! infrastructure (基础设施：PageSession)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Browser 和 PageSession
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计

pub mod app;

pub use app::{export_harvest, harvest_current_box, App, RunOutcome};
