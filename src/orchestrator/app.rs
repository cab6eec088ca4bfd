//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **文字识别**：调用 TextExtractor 读取作业图片（失败即终止）
//! 2. **选择后端**：每次运行只选一次，模型后端或演示后端
//! 3. **委托评分**：交给 assignment_processor 切分并逐题评分
//! 4. **写入报告**：ReportWriter 写文件（失败即终止），返回报告路径

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::infrastructure::TextExtractor;
use crate::orchestrator::assignment_processor::{self, GradingSummary};
use crate::services::{LlmService, ReportWriter};
use crate::utils::logging;
use crate::workflow::{DemoBackend, GradingBackend, ModelBackend};

/// 评分模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingMode {
    /// 调用大模型评分
    Model,
    /// 本地答案表评分
    Demo,
}

impl GradingMode {
    pub fn from_demo_flag(demo: bool) -> Self {
        if demo {
            Self::Demo
        } else {
            Self::Model
        }
    }

    pub fn is_demo(self) -> bool {
        self == Self::Demo
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    extractor: TextExtractor,
}

impl App {
    pub fn new(config: Config) -> Self {
        let extractor = TextExtractor::new(&config);
        Self { config, extractor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 只做文字识别，返回清洗后的文本
    pub async fn extract_only(&self, image_path: &Path) -> Result<String> {
        self.extractor
            .extract(image_path)
            .await
            .with_context(|| format!("无法识别图片: {}", image_path.display()))
    }

    /// 完整流程：识别 → 切分 → 评分 → 写报告
    pub async fn run(
        &self,
        image_path: &Path,
        output: Option<&Path>,
        mode: GradingMode,
    ) -> Result<PathBuf> {
        let text = self.extract_only(image_path).await?;
        info!("✓ 识别完成，共 {} 字符", text.chars().count());

        let summary = match mode {
            GradingMode::Demo => {
                let backend = DemoBackend::new();
                logging::log_startup(image_path, backend.name());
                self.grade(&text, &backend).await
            }
            GradingMode::Model => {
                let backend = ModelBackend::new(LlmService::new(&self.config), &self.config);
                logging::log_startup(image_path, backend.name());
                self.grade(&text, &backend).await
            }
        };

        let writer = ReportWriter::new(mode.is_demo());
        let path = writer
            .write(&summary.results, output)
            .context("评分报告写入失败")?;

        Ok(path)
    }

    /// 对识别文本评分
    pub async fn grade<B: GradingBackend>(&self, text: &str, backend: &B) -> GradingSummary {
        let verifier = assignment_processor::verifier_from_config(&self.config);
        assignment_processor::grade_text(text, backend, verifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grading_mode_from_flag() {
        assert_eq!(GradingMode::from_demo_flag(true), GradingMode::Demo);
        assert_eq!(GradingMode::from_demo_flag(false), GradingMode::Model);
        assert!(GradingMode::Demo.is_demo());
    }

    #[tokio::test]
    async fn test_missing_image_is_fatal() {
        let app = App::new(Config::default());
        let missing = std::env::temp_dir().join("homework_grader_no_such_image.png");

        let err = app
            .run(&missing, None, GradingMode::Demo)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("无法识别图片"));
    }

    #[tokio::test]
    async fn test_grade_demo_text() {
        let app = App::new(Config::default());
        let summary = app
            .grade(
                "1. What is 15 + 23? Answer: 38\n2. What is 7 x 8? Answer: 54",
                &DemoBackend::new(),
            )
            .await;

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.totals.total, 1.0);
        assert_eq!(summary.totals.percentage, 50.0);
    }
}
