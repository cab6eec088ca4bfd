use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, GraderError, Result};

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 评分请求温度（越低越稳定）
    pub grading_temperature: f32,
    pub grading_max_tokens: u32,
    /// 题目解析请求温度
    pub parsing_temperature: f32,
    pub parsing_max_tokens: u32,
    /// 单次请求最大尝试次数
    pub max_retries: u32,
    /// 两次尝试之间的等待时间（毫秒）
    pub retry_delay_ms: u64,
    // --- OCR 配置 ---
    pub tesseract_cmd: String,
    pub ocr_language: String,
    // --- 评分配置 ---
    /// 数值答案容差
    pub math_tolerance: f64,
    /// 是否启用算术复核
    pub enable_math_verification: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
            grading_temperature: 0.05,
            grading_max_tokens: 800,
            parsing_temperature: 0.1,
            parsing_max_tokens: 1500,
            max_retries: 3,
            retry_delay_ms: 500,
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            math_tolerance: 0.01,
            enable_math_verification: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，文件不存在时使用默认值，最后叠加环境变量
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("配置文件不存在，使用默认配置: {}", path.display());
            return Ok(Self::from_env());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(Self::from_toml_str(&content, &path.display().to_string())?.with_env_overrides())
    }

    fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            GraderError::Config(ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source: e,
            })
        })
    }

    fn with_env_overrides(self) -> Self {
        let current = self;
        Self {
            llm_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(current.llm_api_key),
            llm_api_base_url: std::env::var("OPENAI_API_BASE").unwrap_or(current.llm_api_base_url),
            llm_model_name: std::env::var("GRADER_MODEL").unwrap_or(current.llm_model_name),
            max_retries: std::env::var("GRADER_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(current.max_retries),
            tesseract_cmd: std::env::var("TESSERACT_CMD").unwrap_or(current.tesseract_cmd),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(current.verbose_logging),
            ..current
        }
    }
}
