//! 模型返回的评分结论

use serde::Deserialize;
use std::fmt;

use crate::models::question::{clamp_score, GradeStatus};

/// 上游（模型或演示答案表）给出的评分结论
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: GradeStatus,
    pub correct_answer: String,
    pub explanation: String,
    pub feedback: String,
    pub score: f64,
}

impl Verdict {
    pub fn new(
        status: GradeStatus,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
        feedback: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            status,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            feedback: feedback.into(),
            score: clamp_score(score),
        }
    }
}

/// 评分请求要求模型返回的 JSON 结构
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelVerdict {
    pub status: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}

impl ModelVerdict {
    /// 转换为评分结论，状态文字无法识别时返回 None
    pub fn into_verdict(self) -> Option<Verdict> {
        let status = GradeStatus::from_model_label(&self.status)?;
        Some(Verdict::new(
            status,
            self.correct_answer,
            self.explanation,
            self.feedback,
            self.score,
        ))
    }
}

// 分数既可能是数字也可能是 "0.5" 这样的字符串
fn deserialize_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct ScoreVisitor;

    impl<'de> Visitor<'de> for ScoreVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string between 0 and 1")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid score: {}", value)))
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}
