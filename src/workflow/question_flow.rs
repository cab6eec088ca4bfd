//! 题目评分流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整评分流程
//!
//! 状态流转：
//! 1. 待评分 → 请求后端评分
//! 2. 评分成功 → 算术复核（可能覆盖结论）→ 生成评分记录
//! 3. 评分失败 → 生成 GradingError 记录，提示人工复核

use tracing::{error, info, warn};

use crate::models::{GradedRecord, QuestionRecord, Verdict};
use crate::services::ArithmeticVerifier;
use crate::workflow::backend::GradingBackend;
use crate::workflow::question_ctx::QuestionCtx;

/// 题目处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 采用后端结论
    Graded,
    /// 算术复核覆盖了后端结论
    Overridden,
    /// 后端评分失败
    Failed,
}

/// 题目评分流程
///
/// - 每道题只请求一次后端
/// - 不持有任何资源，只依赖后端能力和复核器
pub struct QuestionFlow<'a, B> {
    backend: &'a B,
    verifier: Option<ArithmeticVerifier>,
}

impl<'a, B: GradingBackend> QuestionFlow<'a, B> {
    /// `verifier` 为 None 时关闭算术复核
    pub fn new(backend: &'a B, verifier: Option<ArithmeticVerifier>) -> Self {
        Self { backend, verifier }
    }

    pub async fn run(&self, question: QuestionRecord, ctx: &QuestionCtx) -> (GradedRecord, ProcessResult) {
        info!("{} 📚 正在评分...", ctx);

        let verdict = match self.backend.grade(&question).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!("{} ❌ 评分失败: {}", ctx, e);
                return (GradedRecord::grading_error(question), ProcessResult::Failed);
            }
        };

        let (verdict, result) = self.apply_verification(&question, verdict, ctx);
        info!("{} ✅ 状态: {} (得分: {})", ctx, verdict.status, verdict.score);

        let record = GradedRecord::new(
            question,
            verdict.status,
            verdict.correct_answer,
            verdict.explanation,
            verdict.feedback,
            verdict.score,
        );
        (record, result)
    }

    /// 算术复核，结论冲突时状态和反馈被替换，分数改为 1.0 或 0.0
    fn apply_verification(
        &self,
        question: &QuestionRecord,
        verdict: Verdict,
        ctx: &QuestionCtx,
    ) -> (Verdict, ProcessResult) {
        let Some(verifier) = self.verifier else {
            return (verdict, ProcessResult::Graded);
        };

        match verifier.verify(
            &question.question_text,
            &question.student_answer,
            verdict.status.label(),
        ) {
            Some(over) => {
                warn!("{} 🔍 复核覆盖: {} → {}", ctx, verdict.status, over.status);
                let score = if over.check.student_correct { 1.0 } else { 0.0 };
                (
                    Verdict {
                        status: over.status,
                        feedback: over.feedback,
                        score,
                        ..verdict
                    },
                    ProcessResult::Overridden,
                )
            }
            None => (verdict, ProcessResult::Graded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GraderError, Result};
    use crate::models::GradeStatus;

    /// 固定返回同一结论的后端
    struct FixedBackend(Option<Verdict>);

    impl GradingBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn segment(&self, _text: &str) -> Result<Vec<QuestionRecord>> {
            Ok(Vec::new())
        }

        async fn grade(&self, _question: &QuestionRecord) -> Result<Verdict> {
            match &self.0 {
                Some(verdict) => Ok(verdict.clone()),
                None => Err(GraderError::response_parse_failed(
                    "garbage",
                    serde_json::from_str::<serde_json::Value>("garbage").unwrap_err(),
                )),
            }
        }
    }

    fn ctx() -> QuestionCtx {
        QuestionCtx::new("4", 1, 1)
    }

    fn product_question() -> QuestionRecord {
        QuestionRecord::new("4", "What is 7 x 8?", "54", "What is 7 x 8? Answer: 54")
    }

    #[tokio::test]
    async fn test_override_rewrites_status_feedback_and_score() {
        let backend = FixedBackend(Some(Verdict::new(
            GradeStatus::Correct,
            "56",
            "Looks right",
            "Great job",
            1.0,
        )));
        let flow = QuestionFlow::new(&backend, Some(ArithmeticVerifier::default()));

        let (record, result) = flow.run(product_question(), &ctx()).await;

        assert_eq!(result, ProcessResult::Overridden);
        assert_eq!(record.status, GradeStatus::Incorrect);
        assert_eq!(record.score, 0.0);
        assert!(record.feedback.contains("= 56"));
        // 其他字段保持后端结论
        assert_eq!(record.explanation, "Looks right");
        assert_eq!(record.correct_answer, "56");
    }

    #[tokio::test]
    async fn test_partial_credit_overridden_to_full_credit() {
        let backend = FixedBackend(Some(Verdict::new(
            GradeStatus::Incorrect,
            "38",
            "",
            "Check again",
            0.5,
        )));
        let flow = QuestionFlow::new(&backend, Some(ArithmeticVerifier::default()));
        let question = QuestionRecord::new("1", "What is 15 + 23?", "38", "What is 15 + 23? 38");

        let (record, result) = flow.run(question, &ctx()).await;

        assert_eq!(result, ProcessResult::Overridden);
        assert_eq!(record.status, GradeStatus::Correct);
        assert_eq!(record.score, 1.0);
    }

    #[tokio::test]
    async fn test_agreement_keeps_upstream_score() {
        let backend = FixedBackend(Some(Verdict::new(
            GradeStatus::PartiallyCorrect,
            "56",
            "",
            "Method fine",
            0.5,
        )));
        let flow = QuestionFlow::new(&backend, Some(ArithmeticVerifier::default()));
        let question = QuestionRecord::new("4", "What is 7 x 8?", "56", "What is 7 x 8? 56");

        let (record, result) = flow.run(question, &ctx()).await;

        assert_eq!(result, ProcessResult::Graded);
        assert_eq!(record.status, GradeStatus::PartiallyCorrect);
        assert_eq!(record.score, 0.5);
    }

    #[tokio::test]
    async fn test_verification_disabled() {
        let backend = FixedBackend(Some(Verdict::new(GradeStatus::Correct, "56", "", "", 1.0)));
        let flow = QuestionFlow::new(&backend, None);

        let (record, result) = flow.run(product_question(), &ctx()).await;

        assert_eq!(result, ProcessResult::Graded);
        assert_eq!(record.status, GradeStatus::Correct);
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_grading_error() {
        let backend = FixedBackend(None);
        let flow = QuestionFlow::new(&backend, Some(ArithmeticVerifier::default()));

        let (record, result) = flow.run(product_question(), &ctx()).await;

        assert_eq!(result, ProcessResult::Failed);
        assert_eq!(record.status, GradeStatus::GradingError);
        assert_eq!(record.score, 0.0);
        assert!(record.feedback.contains("manually"));
        assert_eq!(record.question.number, "4");
    }
}
