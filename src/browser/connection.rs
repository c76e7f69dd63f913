use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::BrowserHandle;
use crate::error::AppError;

/// 连接到已开启远程调试的浏览器，并打开目标地址
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: &str,
) -> Result<(BrowserHandle, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

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

    debug!("创建新页面并导航到: {}", target_url);
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    page.goto(target_url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", target_url, e);
        AppError::navigation_failed(target_url, e)
    })?;
    info!("已导航到: {}", target_url);

    Ok((BrowserHandle::connected(browser, handler_task), page))
}
