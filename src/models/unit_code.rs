use url::Url;

/// 允许出现在第一段路径中的页面类型
const UNIT_PATH_KINDS: [&str; 2] = ["box", "cards"];

/// 从浏览器地址中提取卡片盒编号
///
/// 期望的路径形如 `/box/<unit_code>/...` 或 `/cards/<unit_code>/...`
pub fn extract_unit_code(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path().trim_matches('/').split('/');

    let kind = segments.next()?;
    if !UNIT_PATH_KINDS.contains(&kind) {
        return None;
    }

    segments
        .next()
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_url() {
        assert_eq!(
            extract_unit_code("https://card2brain.ch/box/ABC123"),
            Some("ABC123".to_string())
        );
    }

    #[test]
    fn test_cards_url_with_query_and_trailing_segments() {
        assert_eq!(
            extract_unit_code("https://card2brain.ch/cards/xyz_9/learn?max=40&offset=0"),
            Some("xyz_9".to_string())
        );
        assert_eq!(
            extract_unit_code("https://card2brain.ch/box/ABC123/"),
            Some("ABC123".to_string())
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(extract_unit_code("https://card2brain.ch/other/xyz"), None);
        assert_eq!(extract_unit_code("https://card2brain.ch/box"), None);
        assert_eq!(extract_unit_code("https://card2brain.ch/"), None);
        assert_eq!(extract_unit_code("not a url"), None);
    }
}
