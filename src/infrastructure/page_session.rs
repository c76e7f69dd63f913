//! 页面会话 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航 / 读取 / 等待"的能力

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::{AppError, BrowserError};

/// 轮询选择器的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 页面抓取能力
///
/// 抓取流程只依赖这个 trait，测试中可以用内存实现替换浏览器
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 导航到指定地址
    async fn goto(&self, url: &str) -> Result<()>;

    /// 当前页面渲染后的 HTML
    async fn page_source(&self) -> Result<String>;

    /// 当前页面地址
    async fn current_url(&self) -> Result<String>;

    /// 等待选择器匹配到元素，超时返回 `false`，不会返回错误
    async fn wait_for(&self, selector: &str, timeout: Duration) -> bool;
}

/// 页面会话
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 和 PageFetcher 能力
/// - 不认识 Flashcard
pub struct PageSession {
    page: Page,
}

impl PageSession {
    /// 创建新的页面会话
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 当前文档中是否存在匹配选择器的元素
    async fn has_element(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.eval_as::<bool>(js_code).await
    }
}

#[async_trait]
impl PageFetcher for PageSession {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        self.page.content().await.context("读取页面 HTML 失败")
    }

    async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await?
            .ok_or(AppError::Browser(BrowserError::MissingUrl))
            .map_err(Into::into)
    }

    async fn wait_for(&self, selector: &str, limit: Duration) -> bool {
        let poll = async {
            loop {
                match self.has_element(selector).await {
                    Ok(true) => return,
                    Ok(false) => {}
                    // 页面仍在加载时脚本可能执行失败，继续轮询
                    Err(e) => debug!("检查选择器 {} 失败: {}", selector, e),
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        timeout(limit, poll).await.is_ok()
    }
}
