use std::fmt;

/// 一张闪卡（问题 + 答案）
///
/// 只能通过 [`Flashcard::new`] 构造，保证两面都是非空的去空白文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    question: String,
    answer: String,
}

impl Flashcard {
    /// 创建闪卡，任意一面为空（去空白后）时返回 `None`
    pub fn new(question: impl AsRef<str>, answer: impl AsRef<str>) -> Option<Self> {
        let question = question.as_ref().trim();
        let answer = answer.as_ref().trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// 取某一面的文本
    pub fn side(&self, side: CardSide) -> &str {
        match side {
            CardSide::Question => &self.question,
            CardSide::Answer => &self.answer,
        }
    }
}

/// 闪卡的一面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Question,
    Answer,
}

impl CardSide {
    pub const ALL: [CardSide; 2] = [CardSide::Question, CardSide::Answer];

    /// 图片文件名后缀：`1f.png` / `1a.png`
    pub fn file_suffix(self) -> char {
        match self {
            CardSide::Question => 'f',
            CardSide::Answer => 'a',
        }
    }

    /// 文本导出中的标记：`1F:` / `1A:`
    pub fn transcript_tag(self) -> char {
        match self {
            CardSide::Question => 'F',
            CardSide::Answer => 'A',
        }
    }

    /// 第 `index` 张卡（从 1 开始）这一面的图片文件名
    pub fn image_file_name(self, index: usize) -> String {
        format!("{}{}.png", index, self.file_suffix())
    }
}

/// 一次分页请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub unit_code: &'a str,
    pub offset: usize,
    pub page_size: usize,
}

impl<'a> PageRequest<'a> {
    pub fn new(unit_code: &'a str, offset: usize, page_size: usize) -> Self {
        Self {
            unit_code,
            offset,
            page_size,
        }
    }

    /// 卡片列表页地址：`<host>/cards/<unit_code>?max=<page_size>&offset=<offset>`
    pub fn url(&self, host: &str) -> String {
        format!(
            "{}/cards/{}?max={}&offset={}",
            host.trim_end_matches('/'),
            self.unit_code,
            self.page_size,
            self.offset
        )
    }

    /// 下一页
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.page_size,
            ..self.clone()
        }
    }
}

/// 抓取结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestStop {
    /// 等待卡片容器超时（正常的数据结束信号）
    MarkerTimeout,
    /// 容器存在但没有解析出有效卡片
    EmptyPage,
    /// 导航或读取页面失败
    FetchFailed,
}

impl fmt::Display for HarvestStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestStop::MarkerTimeout => write!(f, "卡片容器未出现"),
            HarvestStop::EmptyPage => write!(f, "本页没有有效卡片"),
            HarvestStop::FetchFailed => write!(f, "页面加载失败"),
        }
    }
}

/// 一次完整抓取的结果
#[derive(Debug, Clone)]
pub struct HarvestResult {
    pub unit_code: String,
    /// 按抓取顺序排列的闪卡
    pub cards: Vec<Flashcard>,
    /// 请求过的页数（包括最后一个终止页）
    pub pages_fetched: usize,
    pub stop: HarvestStop,
}

impl HarvestResult {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// 带 1 起始编号的遍历
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Flashcard)> {
        self.cards.iter().enumerate().map(|(i, card)| (i + 1, card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashcard_rejects_blank_sides() {
        assert!(Flashcard::new("  ", "answer").is_none());
        assert!(Flashcard::new("question", "\n\t").is_none());
        let card = Flashcard::new("  What?  ", " That. ").unwrap();
        assert_eq!(card.question(), "What?");
        assert_eq!(card.side(CardSide::Answer), "That.");
    }

    #[test]
    fn test_page_request_url() {
        let page = PageRequest::new("ABC123", 0, 40).next().next();
        assert_eq!(
            page.url("https://card2brain.ch/"),
            "https://card2brain.ch/cards/ABC123?max=40&offset=80"
        );
    }

    #[test]
    fn test_image_file_names() {
        assert_eq!(CardSide::Question.image_file_name(3), "3f.png");
        assert_eq!(CardSide::Answer.image_file_name(12), "12a.png");
    }
}
