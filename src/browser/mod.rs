pub mod connection;
pub mod launcher;

pub use connection::connect_to_browser_and_page;
pub use launcher::launch_browser;

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::Config;

/// 浏览器及其事件处理任务
///
/// 由编排层独占，抓取结束后调用 [`BrowserHandle::release`] 释放一次
pub struct BrowserHandle {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 是否由本程序启动（连接的浏览器不关闭）
    launched: bool,
}

impl BrowserHandle {
    fn launched(browser: Browser, handler_task: JoinHandle<()>) -> Self {
        Self {
            browser,
            handler_task,
            launched: true,
        }
    }

    fn connected(browser: Browser, handler_task: JoinHandle<()>) -> Self {
        Self {
            browser,
            handler_task,
            launched: false,
        }
    }

    /// 释放浏览器：自己启动的浏览器会被关闭，连接的浏览器只断开
    pub async fn release(mut self) -> Result<()> {
        if self.launched {
            info!("🔒 正在关闭浏览器...");
            self.browser.close().await?;
            self.browser.wait().await?;
        }
        self.handler_task.abort();
        debug!("浏览器会话已释放");
        Ok(())
    }
}

/// 按配置启动或连接浏览器，并打开起始页
pub async fn open_browser(config: &Config, start_url: &str) -> Result<(BrowserHandle, Page)> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port, start_url).await,
        None => launch_browser(start_url, config.browser_executable.as_deref()).await,
    }
}
