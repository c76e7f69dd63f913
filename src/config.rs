use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认配置文件名（位于当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "flashcards.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 闪卡网站地址（含协议）
    pub host: String,
    /// 每页卡片数量
    pub page_size: usize,
    /// 等待卡片容器出现的超时时间（秒）
    pub marker_timeout_secs: u64,
    /// 翻页之间的间隔（毫秒）
    pub page_delay_ms: u64,
    /// 浏览器调试端口，设置后连接已有浏览器而不是启动新浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub browser_executable: Option<PathBuf>,
    /// 输出根目录
    pub output_root: PathBuf,
    /// 首选字体文件
    pub font_path: PathBuf,
    /// 字号（像素）
    pub font_size: f32,
    /// 画布宽度
    pub canvas_width: u32,
    /// 画布高度
    pub canvas_height: u32,
    /// 左右边距
    pub margin: u32,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "https://card2brain.ch".to_string(),
            page_size: 40,
            marker_timeout_secs: 10,
            page_delay_ms: 100,
            browser_debug_port: None,
            browser_executable: None,
            output_root: PathBuf::from("."),
            font_path: PathBuf::from("arial.ttf"),
            font_size: 40.0,
            canvas_width: 800,
            canvas_height: 400,
            margin: 20,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 登录页地址
    pub fn login_url(&self) -> String {
        format!("{}/login/auth", self.host.trim_end_matches('/'))
    }

    /// 加载配置：配置文件（若存在）+ 环境变量覆盖
    ///
    /// 配置文件路径取自 `FLASHCARDS_CONFIG`，未设置时尝试当前目录下的 `flashcards.toml`
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("FLASHCARDS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        if path.exists() {
            Self::from_file(&path)?.with_env_overrides()
        } else {
            Self::from_env()
        }
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::File(crate::error::FileError::TomlParseFailed { source, .. }) => {
                AppError::File(crate::error::FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()
    }

    /// 仅使用默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Self {
            host: std::env::var("FLASHCARDS_HOST").unwrap_or(self.host),
            page_size: env_parse("FLASHCARDS_PAGE_SIZE", "usize")?.unwrap_or(self.page_size),
            marker_timeout_secs: env_parse("MARKER_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.marker_timeout_secs),
            page_delay_ms: env_parse("PAGE_DELAY_MS", "u64")?.unwrap_or(self.page_delay_ms),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", "u16")?
                .or(self.browser_debug_port),
            browser_executable: std::env::var("BROWSER_EXECUTABLE")
                .ok()
                .map(PathBuf::from)
                .or(self.browser_executable),
            output_root: std::env::var("OUTPUT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(self.output_root),
            font_path: std::env::var("FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or(self.font_path),
            font_size: env_parse("FONT_SIZE", "f32")?.unwrap_or(self.font_size),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            margin: self.margin,
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
        }
        .validate()
    }

    /// 检查取值范围
    ///
    /// `page_size` 为 0 时偏移量永远不前进，翻页不会结束
    pub fn validate(self) -> AppResult<Self> {
        if self.page_size == 0 {
            return Err(AppError::invalid_config("page_size", "必须大于 0"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(AppError::invalid_config(
                "font_size",
                format!("必须是正数，当前为 {}", self.font_size),
            ));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(AppError::invalid_config(
                "canvas_width/canvas_height",
                "画布尺寸必须大于 0",
            ));
        }
        if self.margin.saturating_mul(2) >= self.canvas_width {
            return Err(AppError::invalid_config(
                "margin",
                format!("左右边距之和必须小于画布宽度 {}", self.canvas_width),
            ));
        }
        Ok(self)
    }
}

/// 读取并解析环境变量；未设置时返回 `None`
fn env_parse<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::Config(crate::error::ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
        }),
        Err(_) => Ok(None),
    }
}
