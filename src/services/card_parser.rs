//! 卡片解析服务 - 业务能力层
//!
//! 只负责把一页 HTML 解析成闪卡，不关心翻页

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::Flashcard;
use crate::utils::logging::truncate_text;

/// 卡片容器（同时也是页面加载完成的标志）
pub const CARD_CONTAINER_SELECTOR: &str = "div.bg-white.p-1.mb-4";
/// 容器内的问题区域
pub const QUESTION_SELECTOR: &str = "div.bg-white section.fs-card";
/// 容器内的答案区域
pub const ANSWER_SELECTOR: &str = "div.bg-info section.fs-card";

/// 卡片解析服务
///
/// 职责：
/// - 找出所有卡片容器
/// - 在容器内定位问题和答案
/// - 丢弃缺少任意一面或文本为空的卡片
pub struct CardParser {
    container: Selector,
    question: Selector,
    answer: Selector,
}

impl CardParser {
    /// 使用默认选择器创建
    pub fn new() -> AppResult<Self> {
        Self::with_selectors(CARD_CONTAINER_SELECTOR, QUESTION_SELECTOR, ANSWER_SELECTOR)
    }

    /// 使用自定义选择器创建
    pub fn with_selectors(container: &str, question: &str, answer: &str) -> AppResult<Self> {
        Ok(Self {
            container: compile(container)?,
            question: compile(question)?,
            answer: compile(answer)?,
        })
    }

    /// 解析一页 HTML，按文档顺序返回闪卡
    pub fn parse(&self, html: &str) -> Vec<Flashcard> {
        let document = Html::parse_document(html);

        document
            .select(&self.container)
            .filter_map(|card| self.parse_card(card))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Option<Flashcard> {
        let question = card.select(&self.question).next()?;
        let answer = card.select(&self.answer).next()?;

        let flashcard = Flashcard::new(element_text(question), element_text(answer))?;
        debug!(
            "Q: {} -> A: {}",
            truncate_text(flashcard.question(), 60),
            truncate_text(flashcard.answer(), 60)
        );
        Some(flashcard)
    }
}

/// 元素内的文本节点原样拼接，再把连续空白压缩成单个空格
///
/// 行内标签（`<b>`、`<sub>` 等）不会引入额外的空格
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn compile(selector: &str) -> AppResult<Selector> {
    Selector::parse(selector).map_err(|e| AppError::invalid_selector(selector, format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_html(question: &str, answer: &str) -> String {
        format!(
            r#"<div class="bg-white p-1 mb-4">
                 <div class="bg-white"><section class="fs-card">{}</section></div>
                 <div class="bg-info"><section class="fs-card">{}</section></div>
               </div>"#,
            question, answer
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><main>{}</main></body></html>", cards.concat())
    }

    #[test]
    fn test_parse_cards_in_document_order() {
        let parser = CardParser::new().unwrap();
        let html = page(&[
            card_html("Hauptstadt der Schweiz?", "Bern"),
            card_html("2 + 2?", "4"),
        ]);

        let cards = parser.parse(&html);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question(), "Hauptstadt der Schweiz?");
        assert_eq!(cards[0].answer(), "Bern");
        assert_eq!(cards[1].question(), "2 + 2?");
    }

    #[test]
    fn test_nested_markup_is_flattened() {
        let parser = CardParser::new().unwrap();
        let html = page(&[card_html(
            "<p>What is <b>Rust</b>?</p>\n  <p>  </p>",
            "<ul>\n  <li>A language</li>\n  <li>An oxide</li>\n</ul>",
        )]);

        let cards = parser.parse(&html);

        assert_eq!(cards[0].question(), "What is Rust?");
        assert_eq!(cards[0].answer(), "A language An oxide");
    }

    #[test]
    fn test_inline_tags_do_not_split_words() {
        let parser = CardParser::new().unwrap();
        let html = page(&[card_html(
            "Formel von <i>Wasser</i>?",
            "H<sub>2</sub>O, <i>e.g.</i>, water",
        )]);

        let cards = parser.parse(&html);

        assert_eq!(cards[0].question(), "Formel von Wasser?");
        assert_eq!(cards[0].answer(), "H2O, e.g., water");
    }

    #[test]
    fn test_whitespace_across_lines_is_collapsed() {
        let parser = CardParser::new().unwrap();
        let html = page(&[card_html("\n   Erste\n\t Zeile  <br>  zweite  ", "  ok ")]);

        let cards = parser.parse(&html);

        assert_eq!(cards[0].question(), "Erste Zeile zweite");
        assert_eq!(cards[0].answer(), "ok");
    }

    #[test]
    fn test_incomplete_cards_are_dropped() {
        let parser = CardParser::new().unwrap();
        let missing_answer = r#"<div class="bg-white p-1 mb-4">
                 <div class="bg-white"><section class="fs-card">Only question</section></div>
               </div>"#
            .to_string();
        let blank_question = card_html("   ", "Orphan answer");

        let html = page(&[missing_answer, blank_question, card_html("Q", "A")]);
        let cards = parser.parse(&html);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question(), "Q");
    }

    #[test]
    fn test_page_without_containers() {
        let parser = CardParser::new().unwrap();
        assert!(parser.parse("<html><body><p>Keine Karten</p></body></html>").is_empty());
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let result = CardParser::with_selectors("div[", QUESTION_SELECTOR, ANSWER_SELECTOR);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
