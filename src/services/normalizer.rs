//! 文本清洗 - 业务能力层
//!
//! 只做空白整理，不修改任何识别出来的字符

use regex::Regex;
use std::sync::LazyLock;

/// 连续空行（中间可夹杂空白）
static RE_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
/// 连续空格 / 制表符
static RE_HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// 常见的 OCR 误识别字符对照表
///
/// 目前不启用：数字与字母互换会破坏数值答案，需确认使用场景后再接入
pub const OCR_CORRECTIONS: &[(char, char)] = &[('|', 'I'), ('0', 'O'), ('S', '5'), ('§', 'S')];

/// 清洗识别出来的原始文本
///
/// - 多个空行合并为一个空行
/// - 连续空格 / 制表符合并为一个空格
/// - 去掉首尾空白
pub fn normalize(raw: &str) -> String {
    let collapsed = RE_BLANK_LINES.replace_all(raw, "\n\n");
    let collapsed = RE_HORIZONTAL_SPACE.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_blank_lines_and_spaces() {
        let raw = "  Q1:\tWhat is   15 + 23?\n\n\n  \nAnswer:  38  \n";
        assert_eq!(normalize(raw), "Q1: What is 15 + 23?\n\nAnswer: 38");
    }

    #[test]
    fn test_single_newlines_are_kept() {
        assert_eq!(normalize("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "Q1: a\n \n\n b \t c",
            "\t\tx\n\n\n\ny  z\n",
            "1. What is 7 x 8?\r\n\r\n54",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_characters_are_not_substituted() {
        assert_eq!(normalize("| said 0 S §"), "| said 0 S §");
    }
}
