//! LLM 服务 - 业务能力层
//!
//! 只负责"发送一次对话请求并拿回文本"能力，不关心 prompt 内容和解析
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{LlmError, Result};

/// 单次对话请求
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system_message: &'a str,
    pub user_message: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 对话补全能力
///
/// 流程层只依赖这个 trait，测试时可以替换为预设响应
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
    /// 发送请求并返回去掉首尾空白的响应文本
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 OpenAI 兼容接口
/// - 请求层重试（固定间隔）
/// - 不解析响应内容
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `request`: 系统消息、用户消息和采样参数
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(&self, request: CompletionRequest<'_>) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_message)
            .build()
            .map_err(LlmError::InvalidRequest)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_message)
            .build()
            .map_err(LlmError::InvalidRequest)?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(LlmError::InvalidRequest)?;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match self.client.chat().create(chat_request.clone()).await {
                Ok(response) => break response,
                Err(e) if attempt < self.max_retries => {
                    warn!(
                        "LLM API 调用失败 (第 {}/{} 次): {}，{:?} 后重试",
                        attempt, self.max_retries, e, self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    warn!("LLM API 调用失败: {}", e);
                    return Err(LlmError::ApiCallFailed {
                        model: self.model_name.clone(),
                        attempts: attempt,
                        source: e,
                    }
                    .into());
                }
            }
        };

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

impl CompletionClient for LlmService {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        self.send_to_llm(request).await
    }
}
