//! 题目切分流程
//!
//! 题号规则 → 后端切分 → 整段兜底，保证至少得到一道题

use tracing::{error, info, warn};

use crate::models::QuestionRecord;
use crate::services::segmenter;
use crate::workflow::backend::GradingBackend;

/// 把清洗后的文本切分成题目列表
///
/// 任何一步失败都不会中断流程：最坏情况下整段文本作为一道题，
/// 学生答案记为 "Could not parse answer"
pub async fn segment_questions<B: GradingBackend>(text: &str, backend: &B) -> Vec<QuestionRecord> {
    info!("📝 正在从文本中切分题目...");

    let records = segmenter::segment_by_rules(text);
    if !records.is_empty() {
        return records;
    }

    warn!("⚠️ 未找到结构化题号，交给 {} 后端解析...", backend.name());

    match backend.segment(text).await {
        Ok(records) if !records.is_empty() => {
            info!("🤖 {} 后端解析出 {} 道题目", backend.name(), records.len());
            records
        }
        Ok(_) => {
            warn!("⚠️ {} 后端没有解析出题目，整段文本按一道题处理", backend.name());
            vec![QuestionRecord::unparsed(text)]
        }
        Err(e) => {
            error!("❌ 题目解析失败: {}，整段文本按一道题处理", e);
            vec![QuestionRecord::unparsed(text)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Result;
    use crate::models::UNPARSED_ANSWER;
    use crate::services::{CompletionClient, CompletionRequest};
    use crate::workflow::backend::{DemoBackend, ModelBackend};

    struct FixedClient(&'static str);

    impl CompletionClient for FixedClient {
        async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_rules_take_priority_over_backend() {
        let backend = ModelBackend::new(FixedClient("not json"), &Config::default());
        let records = segment_questions("Q1: What is 2+2? Answer: 4", &backend).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_answer, "4");
    }

    #[tokio::test]
    async fn test_backend_fallback() {
        let backend = ModelBackend::new(
            FixedClient(r#"[{"number": 1, "question_text": "Capital of France", "student_answer": "Paris", "raw_content": "Capital of France Paris"}]"#),
            &Config::default(),
        );
        let records = segment_questions("Capital of France Paris", &backend).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_answer, "Paris");
    }

    #[tokio::test]
    async fn test_unparsable_backend_output_synthesizes_single_record() {
        let backend = ModelBackend::new(FixedClient("I could not find questions"), &Config::default());
        let text = "Some unstructured homework text";
        let records = segment_questions(text, &backend).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, "1");
        assert_eq!(records[0].question_text, text);
        assert_eq!(records[0].raw_content, text);
        assert_eq!(records[0].student_answer, UNPARSED_ANSWER);
    }

    #[tokio::test]
    async fn test_demo_backend_synthesizes_single_record() {
        let records = segment_questions("Unnumbered text", &DemoBackend::new()).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_answer, UNPARSED_ANSWER);
    }
}
