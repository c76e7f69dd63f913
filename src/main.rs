use anyhow::Result;
use flashcard_harvest::orchestrator::{App, RunOutcome};
use flashcard_harvest::utils::logger;
use flashcard_harvest::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let outcome = App::initialize(config).await?.run().await?;
    if let RunOutcome::Exported { card_count } = outcome {
        info!("完成！共导出 {} 张闪卡", card_count);
    }

    Ok(())
}
