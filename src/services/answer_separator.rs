//! 题干 / 答案拆分 - 业务能力层
//!
//! 按固定优先级依次尝试答案标记，第一个命中的标记决定拆分位置

use regex::Regex;
use std::sync::LazyLock;

/// 答案标记规则
struct AnswerIndicator {
    name: &'static str,
    pattern: Regex,
}

impl AnswerIndicator {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

/// 按优先级排列，捕获组 1 为答案（到行尾为止）
static INDICATORS: LazyLock<Vec<AnswerIndicator>> = LazyLock::new(|| {
    vec![
        AnswerIndicator::new("answer", r"(?i)Answer:?\s*(.+)"),
        AnswerIndicator::new("ans", r"(?i)Ans:?\s*(.+)"),
        AnswerIndicator::new("solution", r"(?i)Solution:?\s*(.+)"),
        AnswerIndicator::new("equals", r"=\s*(.+)"),
        AnswerIndicator::new("after_question_mark", r"\?\s*(.+)"),
    ]
});

/// 拆分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatedAnswer {
    pub question_text: String,
    pub student_answer: String,
}

/// 把一道题的原始内容拆成题干和学生答案
///
/// 没有任何标记时：多行内容取第一行为题干，其余行用空格拼接为答案；
/// 单行内容则题干和答案都是整段内容
pub fn separate(content: &str) -> SeparatedAnswer {
    let mut question_text = content.to_string();
    let mut student_answer = String::new();

    for indicator in INDICATORS.iter() {
        if let Some(caps) = indicator.pattern.captures(content) {
            let (Some(whole), Some(answer)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            tracing::trace!("答案标记命中: {}", indicator.name);
            student_answer = answer.as_str().trim().to_string();
            question_text = content[..whole.start()].trim().to_string();
            break;
        }
    }

    if student_answer.is_empty() {
        let lines: Vec<&str> = content.split('\n').collect();
        if lines.len() > 1 {
            question_text = lines[0].trim().to_string();
            student_answer = lines[1..].join(" ").trim().to_string();
        }
    }

    if student_answer.is_empty() {
        student_answer = content.to_string();
    }

    SeparatedAnswer {
        question_text,
        student_answer,
    }
}
