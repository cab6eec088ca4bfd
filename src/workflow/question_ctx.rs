//! 题目处理上下文
//!
//! 封装"我正在处理第几道题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 题号（来自原文，可能重复）
    pub number: String,

    /// 处理顺序（从1开始）
    pub position: usize,

    /// 题目总数
    pub total: usize,
}

impl QuestionCtx {
    pub fn new(number: impl Into<String>, position: usize, total: usize) -> Self {
        Self {
            number: number.into(),
            position,
            total,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目 Q{} ({}/{})]", self.number, self.position, self.total)
    }
}
