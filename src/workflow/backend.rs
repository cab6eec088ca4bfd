//! 评分后端 - 流程层
//!
//! 每次运行只选择一种后端：
//! - `ModelBackend`：通过对话模型评分，并在题号规则失效时协助切分题目
//! - `DemoBackend`：固定答案表，无需任何外部服务

use tracing::debug;

use crate::config::Config;
use crate::error::{GraderError, LlmError, Result};
use crate::models::{GradeStatus, ModelVerdict, QuestionRecord, Verdict};
use crate::services::{CompletionClient, CompletionRequest};

/// 评分后端能力
#[allow(async_fn_in_trait)]
pub trait GradingBackend {
    /// 后端名称（仅用于日志）
    fn name(&self) -> &'static str;

    /// 题号规则全部失效时，对整段文本做结构化切分
    async fn segment(&self, text: &str) -> Result<Vec<QuestionRecord>>;

    /// 给单道题评分
    async fn grade(&self, question: &QuestionRecord) -> Result<Verdict>;
}

// ========== 模型后端 ==========

const GRADING_SYSTEM_PROMPT: &str = "You are an expert mathematics teacher with 20+ years of experience. \
You grade assignments carefully, focusing on mathematical correctness and student understanding. \
Always double-check calculations before marking answers wrong. \
Give partial credit for correct methods even if the final answer is wrong.";

const PARSING_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that parses homework assignments. Always return valid JSON.";

/// 模型评分后端
pub struct ModelBackend<C> {
    client: C,
    grading_temperature: f32,
    grading_max_tokens: u32,
    parsing_temperature: f32,
    parsing_max_tokens: u32,
}

impl<C: CompletionClient> ModelBackend<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            grading_temperature: config.grading_temperature,
            grading_max_tokens: config.grading_max_tokens,
            parsing_temperature: config.parsing_temperature,
            parsing_max_tokens: config.parsing_max_tokens,
        }
    }

    fn build_grading_message(question: &QuestionRecord) -> String {
        format!(
            r#"You are grading a student's homework assignment. Please grade this question carefully and fairly.

QUESTION: {}
STUDENT ANSWER: {}

IMPORTANT GRADING GUIDELINES:
1. Focus on the FINAL ANSWER and mathematical correctness, not just the process
2. If the student's final numerical answer is correct, give full credit even if there are minor formatting issues
3. Be forgiving of OCR errors in the text (garbled symbols, spacing issues)
4. For math problems, check if the numerical result is mathematically correct
5. Consider partial credit for correct method but wrong calculation
6. Double-check your own calculations before marking something wrong

Please provide your response in this exact JSON format:
{{
    "status": "Correct" or "Incorrect" or "Partially Correct",
    "correct_answer": "The complete correct answer",
    "explanation": "Brief explanation of why it's right/wrong - be specific about calculations",
    "score": 1.0 for correct, 0.0 for incorrect, 0.5 for partial credit,
    "feedback": "Constructive feedback for the student"
}}

Return only valid JSON, no other text."#,
            question.question_text, question.student_answer
        )
    }

    fn build_parsing_message(text: &str) -> String {
        format!(
            r#"Please parse the following homework assignment text and extract questions and student answers.
Return the result as a JSON array where each object has:
- question_number: The question number or identifier
- question_text: The actual question being asked
- student_answer: The student's answer to that question
- raw_content: The original text content for this question

Text to parse:
{}

Return only valid JSON, no other text."#,
            text
        )
    }
}

/// 解析评分响应
pub fn parse_grading_response(response: &str) -> Result<Verdict> {
    let model_verdict: ModelVerdict = serde_json::from_str(response.trim())
        .map_err(|e| GraderError::response_parse_failed(response, e))?;
    let raw_status = model_verdict.status.clone();

    model_verdict
        .into_verdict()
        .ok_or_else(|| LlmError::UnknownStatus { status: raw_status }.into())
}

/// 解析切分响应
pub fn parse_segmentation_response(response: &str) -> Result<Vec<QuestionRecord>> {
    let mut records: Vec<QuestionRecord> = serde_json::from_str(response.trim())
        .map_err(|e| GraderError::response_parse_failed(response, e))?;

    for record in records.iter_mut() {
        if record.raw_content.is_empty() {
            record.raw_content = format!("{} {}", record.question_text, record.student_answer)
                .trim()
                .to_string();
        }
    }

    Ok(records)
}

impl<C: CompletionClient> GradingBackend for ModelBackend<C> {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn segment(&self, text: &str) -> Result<Vec<QuestionRecord>> {
        let user_message = Self::build_parsing_message(text);
        let response = self
            .client
            .complete(CompletionRequest {
                system_message: PARSING_SYSTEM_PROMPT,
                user_message: &user_message,
                temperature: self.parsing_temperature,
                max_tokens: self.parsing_max_tokens,
            })
            .await?;

        debug!("切分响应: {}", response);
        parse_segmentation_response(&response)
    }

    async fn grade(&self, question: &QuestionRecord) -> Result<Verdict> {
        let user_message = Self::build_grading_message(question);
        let response = self
            .client
            .complete(CompletionRequest {
                system_message: GRADING_SYSTEM_PROMPT,
                user_message: &user_message,
                temperature: self.grading_temperature,
                max_tokens: self.grading_max_tokens,
            })
            .await?;

        debug!("评分响应: {}", response);
        parse_grading_response(&response)
    }
}

// ========== 演示后端 ==========

/// 演示答案表：题干片段 → 参考答案
///
/// 按顺序匹配，第一个命中的条目生效
pub const DEMO_ANSWER_KEY: &[(&str, &str)] = &[
    ("15+23", "38"),
    ("15 + 23", "38"),
    ("what is 15 + 23", "38"),
    ("2x+5=13", "x=4"),
    ("2x + 5 = 13", "x = 4"),
    ("solve for x: 2x + 5 = 13", "x = 4"),
    ("7x8", "56"),
    ("7 x 8", "56"),
    ("7*8", "56"),
    ("7 * 8", "56"),
    ("what is 7 x 8", "56"),
    ("what is 7 × 8", "56"),
];

/// 演示评分后端
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoBackend;

impl DemoBackend {
    pub fn new() -> Self {
        Self
    }

    /// 查找题干对应的参考答案
    pub fn lookup(question_text: &str) -> Option<&'static str> {
        let normalized = question_text.trim().to_lowercase();
        DEMO_ANSWER_KEY
            .iter()
            .find(|(pattern, _)| normalized.contains(&pattern.to_lowercase()))
            .map(|(_, answer)| *answer)
    }

    /// 同步评分逻辑
    pub fn grade_locally(question: &QuestionRecord) -> Verdict {
        let Some(correct_answer) = Self::lookup(&question.question_text) else {
            return Verdict::new(
                GradeStatus::DemoReviewNeeded,
                "Unable to determine in demo mode",
                "This question type requires AI grading for accurate assessment.",
                "Demo version: Please use full AI grading for complex questions.",
                0.5,
            );
        };

        let student = question.student_answer.trim().to_lowercase();
        let expected = correct_answer.to_lowercase();

        if student.contains(&expected) || student == expected {
            Verdict::new(
                GradeStatus::Correct,
                correct_answer,
                "Correct calculation and answer.",
                "Well done! Your answer is correct.",
                1.0,
            )
        } else {
            Verdict::new(
                GradeStatus::Incorrect,
                correct_answer,
                format!(
                    "The correct answer is {}. Your answer was {}.",
                    correct_answer, question.student_answer
                ),
                "Review your calculation. Check each step carefully.",
                0.0,
            )
        }
    }
}

impl GradingBackend for DemoBackend {
    fn name(&self) -> &'static str {
        "demo"
    }

    /// 演示模式没有切分能力，返回空列表交给上层兜底
    async fn segment(&self, _text: &str) -> Result<Vec<QuestionRecord>> {
        Ok(Vec::new())
    }

    async fn grade(&self, question: &QuestionRecord) -> Result<Verdict> {
        Ok(Self::grade_locally(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// 按顺序返回预设响应的客户端
    struct ScriptedClient {
        responses: RefCell<VecDeque<Result<String>>>,
        requests: RefCell<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
            self.requests
                .borrow_mut()
                .push(request.user_message.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn question(text: &str, answer: &str) -> QuestionRecord {
        QuestionRecord::new("1", text, answer, format!("{} {}", text, answer))
    }

    #[test]
    fn test_demo_lookup_correct_and_incorrect() {
        let verdict = DemoBackend::grade_locally(&question("What is 15 + 23?", "38"));
        assert_eq!(verdict.status, GradeStatus::Correct);
        assert_eq!(verdict.score, 1.0);

        let verdict = DemoBackend::grade_locally(&question("What is 15 + 23?", "39"));
        assert_eq!(verdict.status, GradeStatus::Incorrect);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.correct_answer, "38");
    }

    #[test]
    fn test_demo_unknown_question_needs_review() {
        let verdict = DemoBackend::grade_locally(&question("Name the capital of France", "Paris"));
        assert_eq!(verdict.status, GradeStatus::DemoReviewNeeded);
        assert_eq!(verdict.score, 0.5);
    }

    #[test]
    fn test_demo_lookup_is_case_insensitive_first_match() {
        assert_eq!(DemoBackend::lookup("SOLVE FOR X: 2X + 5 = 13"), Some("x = 4"));
        assert_eq!(DemoBackend::lookup("Compute 2x+5=13"), Some("x=4"));
        assert_eq!(DemoBackend::lookup("What is 7 × 8"), Some("56"));
    }

    #[test]
    fn test_demo_answer_containment() {
        let verdict = DemoBackend::grade_locally(&question("Solve for x: 2x + 5 = 13", "So X = 4"));
        assert_eq!(verdict.status, GradeStatus::Correct);
    }

    #[tokio::test]
    async fn test_model_grade_parses_json() {
        let client = ScriptedClient::new(vec![Ok(r#"{
            "status": "Partially Correct",
            "correct_answer": "78.54",
            "explanation": "Right formula, rounding off",
            "score": 0.5,
            "feedback": "Keep two decimals"
        }"#
        .to_string())]);
        let backend = ModelBackend::new(client, &Config::default());

        let verdict = backend
            .grade(&question("What is the area of a circle with radius 5?", "78.5"))
            .await
            .unwrap();

        assert_eq!(verdict.status, GradeStatus::PartiallyCorrect);
        assert_eq!(verdict.score, 0.5);
        let requests = backend.client.requests.borrow();
        assert!(requests[0].contains("STUDENT ANSWER: 78.5"));
    }

    #[tokio::test]
    async fn test_model_grade_rejects_malformed_json() {
        let client = ScriptedClient::new(vec![Ok("Sure! The answer is correct.".to_string())]);
        let backend = ModelBackend::new(client, &Config::default());

        let err = backend.grade(&question("What is 1 + 1?", "2")).await.unwrap_err();
        assert!(matches!(
            err,
            GraderError::Llm(LlmError::ResponseParseFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_model_grade_rejects_unknown_status() {
        let client = ScriptedClient::new(vec![Ok(
            r#"{"status": "Excellent", "score": 1.0}"#.to_string()
        )]);
        let backend = ModelBackend::new(client, &Config::default());

        let err = backend.grade(&question("What is 1 + 1?", "2")).await.unwrap_err();
        assert!(matches!(err, GraderError::Llm(LlmError::UnknownStatus { .. })));
    }

    #[tokio::test]
    async fn test_model_segment() {
        let client = ScriptedClient::new(vec![Ok(r#"[
            {"question_number": 1, "question_text": "Capital of France", "student_answer": "Paris"},
            {"question_number": "2", "question_text": "Capital of Spain", "student_answer": "Madrid", "raw_content": "Capital of Spain Madrid"}
        ]"#
        .to_string())]);
        let backend = ModelBackend::new(client, &Config::default());

        let records = backend.segment("Capital of France Paris Capital of Spain Madrid").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].number, "1");
        assert_eq!(records[0].raw_content, "Capital of France Paris");
        assert_eq!(records[1].student_answer, "Madrid");
    }

    #[test]
    fn test_demo_segment_is_empty() {
        let records = tokio_test::block_on(DemoBackend::new().segment("anything")).unwrap();
        assert!(records.is_empty());
    }
}
