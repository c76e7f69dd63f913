/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::path::Path;
use tracing::info;

use crate::models::HarvestResult;

/// 记录程序启动信息
pub fn log_startup(host: &str, page_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 闪卡抓取模式");
    info!("🌐 站点: {}", host);
    info!("📄 每页卡片数: {}", page_size);
    info!("{}", "=".repeat(60));
}

/// 记录分页请求
pub fn log_page_start(page_number: usize, url: &str) {
    info!("\n📥 正在获取第 {} 页: {}", page_number, url);
}

/// 记录抓取结果
pub fn log_harvest_complete(result: &HarvestResult) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 抓取完成: 卡片盒 {}, 共 {} 张卡片, 请求 {} 页 ({})",
        result.unit_code,
        result.len(),
        result.pages_fetched,
        result.stop
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(card_count: usize, folder: &Path, transcript_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已保存 {} 张闪卡到: {}", card_count, folder.display());
    info!("📝 文本导出: {}", transcript_path.display());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("äöüäöü", 3), "äöü...");
        assert_eq!(truncate_text("kurz", 10), "kurz");
    }
}
