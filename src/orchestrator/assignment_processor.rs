//! 单份作业处理器 - 编排层
//!
//! ## 职责
//!
//! 按原文顺序逐题评分（串行，一题完成后再开始下一题），汇总分数。
//! 每道题都一定产生一条评分记录。

use tracing::info;

use crate::config::Config;
use crate::models::{GradedRecord, QuestionRecord};
use crate::services::{normalizer, ArithmeticVerifier, ScoreTotals};
use crate::utils::logging;
use crate::workflow::{segment_questions, GradingBackend, ProcessResult, QuestionCtx, QuestionFlow};

/// 评分汇总
#[derive(Debug, Clone)]
pub struct GradingSummary {
    pub results: Vec<GradedRecord>,
    pub totals: ScoreTotals,
    /// 被算术复核覆盖的题目数
    pub overrides: usize,
    /// 评分失败的题目数
    pub errors: usize,
}

/// 根据配置构建复核器
pub fn verifier_from_config(config: &Config) -> Option<ArithmeticVerifier> {
    config
        .enable_math_verification
        .then(|| ArithmeticVerifier::new(config.math_tolerance))
}

/// 逐题评分
pub async fn grade_questions<B: GradingBackend>(
    questions: Vec<QuestionRecord>,
    backend: &B,
    verifier: Option<ArithmeticVerifier>,
) -> GradingSummary {
    info!("🔍 开始评分，共 {} 道题目 (后端: {})", questions.len(), backend.name());

    let flow = QuestionFlow::new(backend, verifier);
    let total = questions.len();
    let mut results = Vec::with_capacity(total);
    let mut overrides = 0;
    let mut errors = 0;

    for (index, question) in questions.into_iter().enumerate() {
        let ctx = QuestionCtx::new(question.number.clone(), index + 1, total);
        logging::log_question_start(&ctx, &question.question_text);

        let (record, result) = flow.run(question, &ctx).await;
        match result {
            ProcessResult::Graded => {}
            ProcessResult::Overridden => overrides += 1,
            ProcessResult::Failed => errors += 1,
        }
        results.push(record);
    }

    let totals = ScoreTotals::from_records(&results);
    let summary = GradingSummary {
        results,
        totals,
        overrides,
        errors,
    };
    logging::log_summary(&summary);
    summary
}

/// 从识别文本开始：清洗 → 切分 → 评分
pub async fn grade_text<B: GradingBackend>(
    text: &str,
    backend: &B,
    verifier: Option<ArithmeticVerifier>,
) -> GradingSummary {
    let normalized = normalizer::normalize(text);
    let questions = segment_questions(&normalized, backend).await;
    info!("📊 共切分出 {} 道题目", questions.len());
    grade_questions(questions, backend, verifier).await
}
