//! 分页抓取流程 - 流程层
//!
//! 核心职责：翻页直到数据结束，按顺序收集全部闪卡
//!
//! 网站不提供卡片总数，结束信号只有两种：
//! 1. 卡片容器在超时时间内没有出现
//! 2. 容器出现了但解析不出有效卡片
//!
//! 导航或读取失败同样视为结束，不重试。

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::PageFetcher;
use crate::models::{Flashcard, HarvestResult, HarvestStop, PageRequest};
use crate::services::{CardParser, CARD_CONTAINER_SELECTOR};
use crate::utils::logging::log_page_start;

/// 抓取参数
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub host: String,
    pub page_size: usize,
    pub marker_timeout: Duration,
    pub page_delay: Duration,
}

impl From<&Config> for HarvestSettings {
    fn from(config: &Config) -> Self {
        Self {
            host: config.host.clone(),
            page_size: config.page_size,
            marker_timeout: Duration::from_secs(config.marker_timeout_secs),
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }
}

/// 单页的处理结果
enum PageOutcome {
    Cards(Vec<Flashcard>),
    Stop(HarvestStop),
}

/// 分页抓取流程
///
/// - 不持有任何资源（page），由调用方借出 PageFetcher
/// - 结果只在本流程内累积，结束后按值返回
pub struct HarvestFlow {
    parser: CardParser,
    settings: HarvestSettings,
}

impl HarvestFlow {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_settings(HarvestSettings::from(config))
    }

    pub fn with_settings(settings: HarvestSettings) -> AppResult<Self> {
        if settings.page_size == 0 {
            return Err(AppError::invalid_config("page_size", "必须大于 0"));
        }
        Ok(Self {
            parser: CardParser::new()?,
            settings,
        })
    }

    /// 抓取一个卡片盒的全部闪卡
    pub async fn harvest(&self, fetcher: &dyn PageFetcher, unit_code: &str) -> HarvestResult {
        let mut cards = Vec::new();
        let mut request = PageRequest::new(unit_code, 0, self.settings.page_size);
        let mut pages_fetched = 0;

        let stop = loop {
            pages_fetched += 1;

            match self.fetch_page(fetcher, &request, pages_fetched).await {
                PageOutcome::Cards(batch) => {
                    info!(
                        "✓ 第 {} 页解析出 {} 张卡片 (offset={})",
                        pages_fetched,
                        batch.len(),
                        request.offset
                    );
                    cards.extend(batch);
                    request = request.next();
                    if !self.settings.page_delay.is_zero() {
                        sleep(self.settings.page_delay).await;
                    }
                }
                PageOutcome::Stop(reason) => break reason,
            }
        };

        HarvestResult {
            unit_code: unit_code.to_string(),
            cards,
            pages_fetched,
            stop,
        }
    }

    async fn fetch_page(
        &self,
        fetcher: &dyn PageFetcher,
        request: &PageRequest<'_>,
        page_number: usize,
    ) -> PageOutcome {
        let url = request.url(&self.settings.host);
        log_page_start(page_number, &url);

        if let Err(e) = fetcher.goto(&url).await {
            warn!("⚠️ 页面加载失败，停止抓取: {}", e);
            return PageOutcome::Stop(HarvestStop::FetchFailed);
        }

        if !fetcher
            .wait_for(CARD_CONTAINER_SELECTOR, self.settings.marker_timeout)
            .await
        {
            info!("没有更多卡片或加载失败，停止抓取");
            return PageOutcome::Stop(HarvestStop::MarkerTimeout);
        }

        let html = match fetcher.page_source().await {
            Ok(html) => html,
            Err(e) => {
                warn!("⚠️ 读取页面失败，停止抓取: {}", e);
                return PageOutcome::Stop(HarvestStop::FetchFailed);
            }
        };

        let batch = self.parser.parse(&html);
        if batch.is_empty() {
            info!("全部卡片已加载");
            return PageOutcome::Stop(HarvestStop::EmptyPage);
        }

        PageOutcome::Cards(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 按 offset 返回预设页面的内存抓取器
    #[derive(Default)]
    struct ScriptedFetcher {
        pages: HashMap<usize, Option<String>>,
        unreachable: Vec<usize>,
        visited: Mutex<Vec<String>>,
        current: Mutex<Option<usize>>,
    }

    impl ScriptedFetcher {
        fn page(mut self, offset: usize, html: Option<String>) -> Self {
            self.pages.insert(offset, html);
            self
        }

        fn visited(&self) -> Vec<String> {
            self.visited.lock().unwrap().clone()
        }

        fn current_html(&self) -> Option<String> {
            let offset = (*self.current.lock().unwrap())?;
            self.pages.get(&offset).cloned().flatten()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn goto(&self, url: &str) -> Result<()> {
            self.visited.lock().unwrap().push(url.to_string());
            let offset: usize = url::Url::parse(url)?
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .map(|(_, v)| v.parse())
                .transpose()?
                .unwrap_or(0);
            if self.unreachable.contains(&offset) {
                return Err(anyhow!("net::ERR_CONNECTION_RESET"));
            }
            *self.current.lock().unwrap() = Some(offset);
            Ok(())
        }

        async fn page_source(&self) -> Result<String> {
            self.current_html().ok_or_else(|| anyhow!("no document"))
        }

        async fn current_url(&self) -> Result<String> {
            self.visited
                .lock()
                .unwrap()
                .last()
                .cloned()
                .ok_or_else(|| anyhow!("no navigation yet"))
        }

        async fn wait_for(&self, selector: &str, _timeout: Duration) -> bool {
            self.current_html()
                .map(|html| {
                    let document = scraper::Html::parse_document(&html);
                    let selector = scraper::Selector::parse(selector).unwrap();
                    let found = document.select(&selector).next().is_some();
                    found
                })
                .unwrap_or(false)
        }
    }

    fn cards_page(start: usize, count: usize) -> Option<String> {
        let cards: String = (start..start + count)
            .map(|i| {
                format!(
                    r#"<div class="bg-white p-1 mb-4">
                         <div class="bg-white"><section class="fs-card">Q{i}</section></div>
                         <div class="bg-info"><section class="fs-card">A{i}</section></div>
                       </div>"#
                )
            })
            .collect();
        Some(format!("<html><body>{}</body></html>", cards))
    }

    fn marker_only_page() -> Option<String> {
        Some(r#"<html><body><div class="bg-white p-1 mb-4"><p>leer</p></div></body></html>"#.to_string())
    }

    fn flow() -> HarvestFlow {
        HarvestFlow::with_settings(HarvestSettings {
            host: "https://card2brain.ch".to_string(),
            page_size: 40,
            marker_timeout: Duration::from_secs(10),
            page_delay: Duration::ZERO,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_page_then_empty_page() {
        let fetcher = ScriptedFetcher::default()
            .page(0, cards_page(0, 40))
            .page(40, marker_only_page());

        let result = flow().harvest(&fetcher, "ABC123").await;

        assert_eq!(result.len(), 40);
        assert_eq!(result.pages_fetched, 2);
        assert_eq!(result.stop, HarvestStop::EmptyPage);
        assert_eq!(
            fetcher.visited(),
            vec![
                "https://card2brain.ch/cards/ABC123?max=40&offset=0".to_string(),
                "https://card2brain.ch/cards/ABC123?max=40&offset=40".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_marker_timeout_on_first_page() {
        let fetcher = ScriptedFetcher::default().page(0, None);

        let result = flow().harvest(&fetcher, "ABC123").await;

        assert!(result.is_empty());
        assert_eq!(result.pages_fetched, 1);
        assert_eq!(result.stop, HarvestStop::MarkerTimeout);
    }

    #[tokio::test]
    async fn test_order_follows_offsets() {
        let fetcher = ScriptedFetcher::default()
            .page(0, cards_page(0, 40))
            .page(40, cards_page(40, 40))
            .page(80, cards_page(80, 7));

        let result = flow().harvest(&fetcher, "XYZ").await;

        assert_eq!(result.len(), 87);
        assert_eq!(result.pages_fetched, 4);
        assert_eq!(result.stop, HarvestStop::MarkerTimeout);
        for (i, card) in result.cards.iter().enumerate() {
            assert_eq!(card.question(), format!("Q{}", i));
            assert_eq!(card.answer(), format!("A{}", i));
        }
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = HarvestFlow::with_settings(HarvestSettings {
            host: "https://card2brain.ch".to_string(),
            page_size: 0,
            marker_timeout: Duration::from_secs(10),
            page_delay: Duration::ZERO,
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_navigation_failure_stops_without_error() {
        let fetcher = ScriptedFetcher {
            unreachable: vec![40],
            ..Default::default()
        }
        .page(0, cards_page(0, 40));

        let result = flow().harvest(&fetcher, "ABC123").await;

        assert_eq!(result.len(), 40);
        assert_eq!(result.stop, HarvestStop::FetchFailed);
    }
}
