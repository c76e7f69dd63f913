use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 渲染错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed { port: u16, source: BoxedSource },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed { source: BoxedSource },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed { url: String, source: BoxedSource },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed { source: BoxedSource },
    /// 页面没有可用的 URL
    #[error("无法读取当前页面地址")]
    MissingUrl,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed { path: String, source: BoxedSource },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxedSource },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed { path: String, source: BoxedSource },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed { path: String, source: BoxedSource },
}

/// 渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 画布尺寸无效
    #[error("画布尺寸无效: {width}x{height}, 边距 {margin}")]
    InvalidCanvas { width: u32, height: u32, margin: u32 },
    /// 图片编码或保存失败
    #[error("保存图片失败 ({path}): {source}")]
    SaveFailed { path: String, source: BoxedSource },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 选择器无效
    #[error("CSS 选择器无效 '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
    /// 配置项取值无效
    #[error("配置项 {key} 无效: {message}")]
    InvalidValue { key: String, message: String },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建浏览器启动错误
    pub fn browser_launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(source),
        })
    }

    /// 创建导航错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建目录创建错误
    pub fn create_dir_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建图片保存错误
    pub fn image_save_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Render(RenderError::SaveFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 CSS 选择器错误
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        })
    }

    /// 创建配置项取值错误
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_display() {
        let err = AppError::invalid_selector("div..x", "unexpected token");
        assert_eq!(
            err.to_string(),
            "配置错误: CSS 选择器无效 'div..x': unexpected token"
        );
    }

    #[test]
    fn test_io_error_converts_to_file_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::File(FileError::WriteFailed { .. })));
    }
}
