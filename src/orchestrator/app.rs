//! 应用编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理和流程调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动浏览器，打开登录页
//! 2. **人工交接**：等待用户登录并打开卡片盒页面后按回车
//! 3. **前置检查**：从当前地址提取卡片盒编号
//! 4. **抓取**：委托 HarvestFlow 翻页抓取
//! 5. **资源释放**：抓取结束后立即关闭浏览器
//! 6. **导出**：委托 ExportFlow 渲染图片并写出文本

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::browser::{self, BrowserHandle};
use crate::config::Config;
use crate::infrastructure::{PageFetcher, PageSession};
use crate::models::{extract_unit_code, HarvestResult};
use crate::services::CardRenderer;
use crate::utils::logging::{log_harvest_complete, log_startup, print_final_stats};
use crate::workflow::{ExportFlow, HarvestFlow};

/// 应用主结构
pub struct App {
    config: Config,
    browser: BrowserHandle,
    session: PageSession,
}

/// 一次运行的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 已导出
    Exported { card_count: usize },
    /// 当前页面不是卡片盒页面
    UnitCodeNotFound,
    /// 没有抓取到任何卡片
    NoFlashcards,
}

impl App {
    /// 初始化应用：启动浏览器并打开登录页
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.host, config.page_size);

        let (browser, page) = browser::open_browser(&config, &config.login_url()).await?;

        Ok(Self {
            config,
            browser,
            session: PageSession::new(page),
        })
    }

    /// 运行应用主逻辑
    ///
    /// 无论抓取是否成功，浏览器都在导出之前释放
    pub async fn run(self) -> Result<RunOutcome> {
        let Self {
            config,
            browser,
            session,
        } = self;

        let harvested = match wait_for_login(&config.host).await {
            Ok(()) => harvest_current_box(&config, &session).await,
            Err(e) => Err(e),
        };

        // 抓取结束后不再需要浏览器
        let released = browser.release().await;
        let harvest = harvested?;
        released?;

        match harvest {
            Some(harvest) => export_harvest(&config, &harvest).await,
            None => Ok(RunOutcome::UnitCodeNotFound),
        }
    }
}

/// 从当前页面地址识别卡片盒编号并抓取全部闪卡
///
/// 地址中没有卡片盒编号时返回 `None`，不发起任何翻页请求
pub async fn harvest_current_box(
    config: &Config,
    fetcher: &dyn PageFetcher,
) -> Result<Option<HarvestResult>> {
    let current_url = fetcher
        .current_url()
        .await
        .context("读取当前页面地址失败")?;

    let Some(unit_code) = extract_unit_code(&current_url) else {
        error!(
            "❌ 无法从地址中识别卡片盒编号: {}（请确认当前在 /box/<编号> 页面）",
            current_url
        );
        return Ok(None);
    };
    info!("✓ 找到卡片盒编号: {}", unit_code);

    let harvest = HarvestFlow::new(config)?.harvest(fetcher, &unit_code).await;
    log_harvest_complete(&harvest);

    Ok(Some(harvest))
}

/// 导出抓取结果；没有卡片时不创建任何文件
pub async fn export_harvest(config: &Config, harvest: &HarvestResult) -> Result<RunOutcome> {
    if harvest.is_empty() {
        warn!("⚠️ 没有找到任何闪卡，程序结束");
        return Ok(RunOutcome::NoFlashcards);
    }

    let renderer = CardRenderer::from_config(config)?;
    let summary = ExportFlow::new(renderer)
        .export(harvest, &config.output_root)
        .await
        .context("导出闪卡失败")?;

    print_final_stats(summary.card_count, &summary.folder, &summary.transcript_path);

    Ok(RunOutcome::Exported {
        card_count: summary.card_count,
    })
}

/// 人工交接：提示用户登录并打开卡片盒页面，等待回车
async fn wait_for_login(host: &str) -> Result<()> {
    println!(
        "请在浏览器中登录并打开你的卡片盒页面（例如 {}/box/UNIT_CODE）",
        host.trim_end_matches('/')
    );
    println!("打开卡片盒页面后按回车继续...");

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("读取标准输入失败")?;
    Ok(())
}
