use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::BrowserHandle;
use crate::error::{AppError, BrowserError};

/// 启动带界面的浏览器并导航到指定 URL
///
/// 登录需要人工操作，所以不使用无头模式
pub async fn launch_browser(url: &str, executable: Option<&Path>) -> Result<(BrowserHandle, Page)> {
    info!("🚀 启动浏览器...");
    debug!("目标 URL: {}", url);

    let mut builder = BrowserConfig::builder().with_head().args(vec![
        "--start-maximized",
        "--log-level=3",
        "--disable-dev-shm-usage",
    ]);
    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|message| {
        error!("配置浏览器失败: {}", message);
        AppError::Browser(BrowserError::ConfigurationFailed { message })
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::browser_launch_failed(e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::navigation_failed(url, e)
    })?;

    info!("✅ 浏览器已导航到: {}", url);

    Ok((BrowserHandle::launched(browser, handler_task), page))
}
