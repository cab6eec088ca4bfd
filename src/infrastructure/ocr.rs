//! 文字识别 - 基础设施层
//!
//! 持有 tesseract 调用配置，只暴露"从图片取文字"的能力

use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{GraderError, Result};
use crate::services::normalizer;

/// 文字识别器
///
/// 职责：
/// - 调用外部 tesseract 进程
/// - 输出经过清洗的文本
/// - 不认识题目 / 答案
pub struct TextExtractor {
    tesseract_cmd: String,
    language: String,
}

impl TextExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            tesseract_cmd: config.tesseract_cmd.clone(),
            language: config.ocr_language.clone(),
        }
    }

    /// 识别图片中的文字并清洗
    ///
    /// # 错误
    /// - 图片不存在时返回 `ExtractionError::NotFound`
    /// - tesseract 无法启动或退出码非 0 时返回 `ExtractionError::Engine`
    pub async fn extract(&self, image_path: &Path) -> Result<String> {
        let display_path = image_path.display().to_string();

        if !image_path.exists() {
            return Err(GraderError::image_not_found(display_path));
        }

        info!("📸 正在识别图片: {}", display_path);

        let output = Command::new(&self.tesseract_cmd)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", self.language.as_str(), "--oem", "3", "--psm", "6"])
            .output()
            .await
            .map_err(|e| {
                GraderError::ocr_failed(
                    &display_path,
                    format!("无法启动 {}: {}", self.tesseract_cmd, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GraderError::ocr_failed(
                &display_path,
                format!("{} ({})", stderr.trim(), output.status),
            ));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        debug!("原始识别结果长度: {} 字符", raw.len());

        let cleaned = normalizer::normalize(&raw);
        info!("✓ 文字识别完成，共 {} 个字符", cleaned.chars().count());

        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_image_is_not_found() {
        let extractor = TextExtractor::new(&Config::default());
        let err = extractor
            .extract(Path::new("no/such/homework.png"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_missing_engine_is_engine_error() {
        let config = Config {
            tesseract_cmd: "definitely-not-a-real-ocr-binary".to_string(),
            ..Config::default()
        };
        let extractor = TextExtractor::new(&config);

        // Cargo.toml 一定存在，用它代替图片
        let err = extractor
            .extract(Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml").as_path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GraderError::Extraction(crate::error::ExtractionError::Engine { .. })
        ));
    }
}
