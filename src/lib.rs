//! # Homework Grader
//!
//! 一个把作业图片识别、切分并逐题评分的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `TextExtractor` - 调用 tesseract，提供"图片 → 文本"能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单段文本或单道题
//! - `normalizer` / `segmenter` / `answer_separator` - 文本清洗与切分
//! - `ArithmeticVerifier` - 简单算术题复核
//! - `LlmService` - 大模型调用能力
//! - `ReportWriter` - 写评分报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整评分流程
//! - `GradingBackend` - 评分后端（模型 / 演示）
//! - `QuestionCtx` - 上下文封装（题号 + 处理顺序）
//! - `QuestionFlow` - 流程编排（评分 → 复核 → 记录）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 一次运行：识别 → 切分 → 评分 → 写报告
//! - `orchestrator/assignment_processor` - 逐题评分并汇总
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{GraderError, Result};
pub use infrastructure::TextExtractor;
pub use models::{GradeStatus, GradedRecord, QuestionRecord, Verdict};
pub use orchestrator::{App, GradingMode, GradingSummary};
pub use workflow::{DemoBackend, GradingBackend, ModelBackend, ProcessResult, QuestionCtx, QuestionFlow};
