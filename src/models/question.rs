use serde::Deserialize;
use std::fmt;

/// 解析失败时使用的学生答案占位
pub const UNPARSED_ANSWER: &str = "Could not parse answer";

/// 一道题的切分结果
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionRecord {
    /// 题号，不保证唯一
    #[serde(alias = "question_number", deserialize_with = "deserialize_number")]
    pub number: String,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub student_answer: String,
    #[serde(default)]
    pub raw_content: String,
}

impl QuestionRecord {
    pub fn new(
        number: impl Into<String>,
        question_text: impl Into<String>,
        student_answer: impl Into<String>,
        raw_content: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            question_text: question_text.into(),
            student_answer: student_answer.into(),
            raw_content: raw_content.into(),
        }
    }

    /// 整段文本作为一道题（切分彻底失败时的兜底）
    pub fn unparsed(text: &str) -> Self {
        Self::new("1", text, UNPARSED_ANSWER, text)
    }
}

/// 评分状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStatus {
    Correct,
    Incorrect,
    PartiallyCorrect,
    /// 演示模式下无法判断，需人工复核
    DemoReviewNeeded,
    /// 评分失败，需人工复核
    GradingError,
}

impl GradeStatus {
    /// 报告中显示的状态文字
    pub fn label(self) -> &'static str {
        match self {
            GradeStatus::Correct => "Correct",
            GradeStatus::Incorrect => "Incorrect",
            GradeStatus::PartiallyCorrect => "Partially Correct",
            GradeStatus::DemoReviewNeeded => "Demo Mode - Manual Review Needed",
            GradeStatus::GradingError => "Error - Could not grade",
        }
    }

    /// 解析模型返回的状态文字
    ///
    /// 忽略大小写、首尾空白以及 ✓ / ✗ 标记，只接受三种评分结论
    pub fn from_model_label(label: &str) -> Option<Self> {
        let normalized = label
            .trim_matches(|c: char| c.is_whitespace() || c == '✓' || c == '✗')
            .to_lowercase()
            .replace(['_', '-'], " ");

        match normalized.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "correct" => Some(GradeStatus::Correct),
            "incorrect" | "wrong" => Some(GradeStatus::Incorrect),
            "partially correct" | "partial" | "partial credit" => {
                Some(GradeStatus::PartiallyCorrect)
            }
            _ => None,
        }
    }
}

impl fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 评分后的题目
///
/// 由题目记录和评分结论显式组合而成，字段之间没有隐式覆盖
#[derive(Debug, Clone, PartialEq)]
pub struct GradedRecord {
    pub question: QuestionRecord,
    pub status: GradeStatus,
    pub correct_answer: String,
    pub explanation: String,
    pub feedback: String,
    /// 得分，范围 [0.0, 1.0]
    pub score: f64,
}

impl GradedRecord {
    pub fn new(
        question: QuestionRecord,
        status: GradeStatus,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
        feedback: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            question,
            status,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            feedback: feedback.into(),
            score: clamp_score(score),
        }
    }

    /// 评分失败时的兜底记录
    pub fn grading_error(question: QuestionRecord) -> Self {
        Self::new(
            question,
            GradeStatus::GradingError,
            "Unable to determine",
            "AI grading failed - manual review needed",
            "Please review this question manually.",
            0.0,
        )
    }
}

/// 把分数限制在 [0, 1]，非有限值记为 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// 题号既可能是字符串也可能是整数
fn deserialize_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer question number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trim().to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_label_parsing() {
        assert_eq!(GradeStatus::from_model_label("Correct"), Some(GradeStatus::Correct));
        assert_eq!(GradeStatus::from_model_label(" correct ✓"), Some(GradeStatus::Correct));
        assert_eq!(GradeStatus::from_model_label("INCORRECT"), Some(GradeStatus::Incorrect));
        assert_eq!(
            GradeStatus::from_model_label("Partially Correct"),
            Some(GradeStatus::PartiallyCorrect)
        );
        assert_eq!(
            GradeStatus::from_model_label("partially_correct"),
            Some(GradeStatus::PartiallyCorrect)
        );
        assert_eq!(GradeStatus::from_model_label("maybe"), None);
    }

    #[test]
    fn test_record_accepts_string_or_integer_number() {
        let records: Vec<QuestionRecord> = serde_json::from_str(
            r#"[
                {"question_number": 3, "question_text": "What is 1+1?", "student_answer": "2", "raw_content": "What is 1+1? 2"},
                {"number": "4a", "question_text": "Name a prime", "student_answer": "7"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].number, "3");
        assert_eq!(records[1].number, "4a");
        assert_eq!(records[1].raw_content, "");
    }

    #[test]
    fn test_score_is_clamped() {
        let q = QuestionRecord::new("1", "q", "a", "q a");
        let graded = GradedRecord::new(q, GradeStatus::Correct, "", "", "", 3.0);
        assert_eq!(graded.score, 1.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(-0.5), 0.0);
    }
}
