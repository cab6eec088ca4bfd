//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次完整的评分运行，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 持有配置和 TextExtractor
//! - 选择评分后端（每次运行一次）
//! - 识别失败、报告写入失败时终止运行
//!
//! ### `assignment_processor` - 单份作业处理器
//! - 清洗、切分识别文本
//! - 按顺序逐题评分，单题失败不影响其他题
//! - 汇总分数和统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一张作业图片)
//!     ↓
//! assignment_processor (处理 Vec<QuestionRecord>)
//!     ↓
//! workflow::QuestionFlow (处理单道题)
//!     ↓
//! services (能力层：segmenter / llm / verifier / report)
//!     ↓
//! infrastructure (基础设施：TextExtractor)
//! ```

pub mod app;
pub mod assignment_processor;

// 重新导出主要类型
pub use app::{App, GradingMode};
pub use assignment_processor::{grade_questions, grade_text, GradingSummary};
