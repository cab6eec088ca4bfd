//! 算术复核 - 业务能力层
//!
//! 对 `a op b` 形式的简单算术题独立重算，与上游评分结论不一致时给出覆盖结论。
//! 本模块不会单独产生结论，只在与上游判断冲突时仲裁。

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::models::GradeStatus;

/// 默认数值容差
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// 题干中的第一个 `整数 运算符 整数`
static RE_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*([+\-−×*xX÷/])\s*(\d+)").unwrap());
/// 学生答案中的第一个数
static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());
/// 上游结论中表示"正确"的词（不匹配 incorrect）
static RE_CORRECT_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bcorrect\b").unwrap());

const OPERATOR_CHARS: &[char] = &['+', '-', '−', '×', '*', 'x', 'X', '÷', '/'];

/// 四则运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" | "−" => Some(Operator::Subtract),
            "×" | "*" | "x" | "X" => Some(Operator::Multiply),
            "÷" | "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    /// 计算结果，除数为 0 或溢出时返回 None
    fn apply(self, left: i64, right: i64) -> Option<f64> {
        match self {
            Operator::Add => left.checked_add(right).map(|v| v as f64),
            Operator::Subtract => left.checked_sub(right).map(|v| v as f64),
            Operator::Multiply => left.checked_mul(right).map(|v| v as f64),
            Operator::Divide if right == 0 => None,
            Operator::Divide => Some(left as f64 / right as f64),
        }
    }
}

/// 一次重算的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticCheck {
    pub left: i64,
    /// 题干中原样出现的运算符
    pub symbol: String,
    pub right: i64,
    pub expected: f64,
    pub student_value: f64,
    pub student_correct: bool,
}

impl fmt::Display for ArithmeticCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mathematical verification: {} {} {} = {}. Student answered: {}. {}",
            self.left,
            self.symbol,
            self.right,
            self.expected,
            self.student_value,
            if self.student_correct {
                "This is correct!"
            } else {
                "This is incorrect."
            }
        )
    }
}

/// 复核覆盖的结论
#[derive(Debug, Clone, PartialEq)]
pub struct VerifierOverride {
    pub status: GradeStatus,
    pub feedback: String,
    pub check: ArithmeticCheck,
}

/// 算术复核器
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticVerifier {
    tolerance: f64,
}

impl Default for ArithmeticVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl ArithmeticVerifier {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// 重算题干中的算式并与学生答案比较
    ///
    /// 题干没有算式、除数为 0、答案里没有数字时返回 None
    pub fn check(&self, question_text: &str, student_answer: &str) -> Option<ArithmeticCheck> {
        if !question_text.contains(OPERATOR_CHARS) {
            return None;
        }

        let caps = RE_EXPRESSION.captures(question_text)?;
        let left: i64 = caps.get(1)?.as_str().parse().ok()?;
        let symbol = caps.get(2)?.as_str();
        let right: i64 = caps.get(3)?.as_str().parse().ok()?;
        let operator = Operator::from_symbol(symbol)?;
        let expected = operator.apply(left, right)?;

        let student_value: f64 = RE_NUMBER.find(student_answer)?.as_str().parse().ok()?;

        Some(ArithmeticCheck {
            left,
            symbol: symbol.to_string(),
            right,
            expected,
            student_value,
            student_correct: (student_value - expected).abs() < self.tolerance,
        })
    }

    /// 仲裁上游结论
    ///
    /// 重算结果与上游结论一致或无法重算时返回 None，表示沿用上游结论
    pub fn verify(
        &self,
        question_text: &str,
        student_answer: &str,
        upstream_status: &str,
    ) -> Option<VerifierOverride> {
        let check = self.check(question_text, student_answer)?;
        if check.student_correct == upstream_says_correct(upstream_status) {
            return None;
        }

        let status = if check.student_correct {
            GradeStatus::Correct
        } else {
            GradeStatus::Incorrect
        };

        Some(VerifierOverride {
            status,
            feedback: check.to_string(),
            check,
        })
    }
}

/// 上游结论是否表示"正确"
pub fn upstream_says_correct(status: &str) -> bool {
    RE_CORRECT_WORD.is_match(status) || status.contains('✓')
}
