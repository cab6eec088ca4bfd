//! 题目切分 - 业务能力层
//!
//! 按优先级尝试题号规则，只采用第一个有命中的规则，规则之间不合并。
//! 所有规则都失败时由流程层交给模型兜底（见 `workflow::segmentation`）。

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::models::QuestionRecord;
use crate::services::answer_separator;

/// 题号规则
///
/// `header` 匹配题号及其后的分隔符，捕获组 1 为题号；
/// `boundary` 匹配下一道题的起点，题目内容截止到这里（或文本末尾）
pub struct SegmentRule {
    pub name: &'static str,
    header: Regex,
    boundary: Regex,
}

impl SegmentRule {
    fn new(name: &'static str, header: &str, boundary: &str) -> Self {
        Self {
            name,
            header: Regex::new(header).unwrap(),
            boundary: Regex::new(boundary).unwrap(),
        }
    }

    /// 用本规则切分文本，返回按出现顺序排列的片段
    pub fn split(&self, text: &str) -> Vec<QuestionSpan> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let Some(caps) = self.header.captures_at(text, pos) else {
                break;
            };
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                break;
            };

            let content_start = whole.end();
            // 题号后至少要有一个字符作为内容，否则从下一个字符继续找
            let Some(first_char) = text[content_start..].chars().next() else {
                pos = next_char_boundary(text, whole.start());
                continue;
            };

            let search_from = content_start + first_char.len_utf8();
            let content_end = self
                .boundary
                .find_at(text, search_from)
                .map(|m| m.start())
                .unwrap_or(text.len());

            spans.push(QuestionSpan {
                number: number.as_str().trim().to_string(),
                content: text[content_start..content_end].trim().to_string(),
            });
            pos = content_end;
        }

        spans
    }
}

fn next_char_boundary(text: &str, idx: usize) -> usize {
    text[idx..]
        .chars()
        .next()
        .map(|c| idx + c.len_utf8())
        .unwrap_or(text.len())
}

/// 题号规则，按优先级排列
static RULES: LazyLock<Vec<SegmentRule>> = LazyLock::new(|| {
    vec![
        SegmentRule::new(
            "question_marker",
            r"(?i)(?:Q|Question|Prob|Problem)\s*(\d+)[.:)]?\s*",
            r"(?i)(?:Q|Question|Prob|Problem)\s*\d+",
        ),
        SegmentRule::new("numbered_delimiter", r"(\d+)[.:)]\s*", r"\d+[.:)]"),
        SegmentRule::new("numbered_dot", r"(\d+)\.\s*", r"\d+\."),
    ]
});

/// 一道题对应的原始文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpan {
    pub number: String,
    pub content: String,
}

impl QuestionSpan {
    /// 拆分题干和答案，生成题目记录
    pub fn into_record(self) -> QuestionRecord {
        let parts = answer_separator::separate(&self.content);
        QuestionRecord::new(
            self.number,
            parts.question_text,
            parts.student_answer,
            self.content,
        )
    }
}

/// 依次尝试各规则，返回第一个有命中的规则名及其片段
pub fn split_spans(text: &str) -> Option<(&'static str, Vec<QuestionSpan>)> {
    RULES.iter().find_map(|rule| {
        let spans = rule.split(text);
        if spans.is_empty() {
            debug!("规则 {} 未命中", rule.name);
            None
        } else {
            Some((rule.name, spans))
        }
    })
}

/// 只用题号规则切分题目，没有规则命中时返回空列表
pub fn segment_by_rules(text: &str) -> Vec<QuestionRecord> {
    match split_spans(text) {
        Some((rule, spans)) => {
            info!("✓ 使用规则 {} 找到 {} 道题目", rule, spans.len());
            spans.into_iter().map(QuestionSpan::into_record).collect()
        }
        None => Vec::new(),
    }
}
