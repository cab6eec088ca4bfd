use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum GraderError {
    /// 文字识别错误
    #[error("文字识别错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 报告写入错误
    #[error("报告错误: {0}")]
    Report(#[from] ReportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文字识别错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 图片文件不存在
    #[error("图片文件不存在: {path}")]
    NotFound { path: String },
    /// 识别引擎启动或运行失败
    #[error("识别引擎执行失败 ({path}): {message}")]
    Engine { path: String, message: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("LLM 请求构建失败: {0}")]
    InvalidRequest(#[source] async_openai::error::OpenAIError),
    /// API 调用失败（已重试）
    #[error("LLM API调用失败 (模型: {model}, 尝试 {attempts} 次): {source}")]
    ApiCallFailed {
        model: String,
        attempts: u32,
        #[source]
        source: async_openai::error::OpenAIError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容无法解析为预期结构
    #[error("无法解析LLM返回的内容 (响应: {response}): {source}")]
    ResponseParseFailed {
        response: String,
        #[source]
        source: serde_json::Error,
    },
    /// 评分状态无法识别
    #[error("LLM返回了无法识别的评分状态: {status}")]
    UnknownStatus { status: String },
}

/// 报告写入错误
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("写入报告失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl GraderError {
    /// 创建图片不存在错误
    pub fn image_not_found(path: impl Into<String>) -> Self {
        GraderError::Extraction(ExtractionError::NotFound { path: path.into() })
    }

    /// 创建识别引擎错误
    pub fn ocr_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        GraderError::Extraction(ExtractionError::Engine {
            path: path.into(),
            message: message.into(),
        })
    }

    /// 创建响应解析错误
    pub fn response_parse_failed(response: impl Into<String>, source: serde_json::Error) -> Self {
        GraderError::Llm(LlmError::ResponseParseFailed {
            response: response.into(),
            source,
        })
    }

    /// 是否为图片不存在错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraderError::Extraction(ExtractionError::NotFound { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, GraderError>;
