//! 报告写入服务 - 业务能力层
//!
//! 只负责把评分结果格式化并写入文本文件

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::models::{GradeStatus, GradedRecord};

/// 总分统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTotals {
    pub total: f64,
    pub count: usize,
    /// 百分比，没有题目时为 0
    pub percentage: f64,
}

impl ScoreTotals {
    pub fn from_records(records: &[GradedRecord]) -> Self {
        // 空列表时为 +0.0
        let total = records.iter().fold(0.0, |acc, r| acc + r.score);
        let count = records.len();
        let percentage = if count > 0 {
            total / count as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            count,
            percentage,
        }
    }
}

/// 报告写入服务
pub struct ReportWriter {
    demo_mode: bool,
}

impl ReportWriter {
    pub fn new(demo_mode: bool) -> Self {
        Self { demo_mode }
    }

    /// 自动生成带时间戳的报告文件名
    pub fn default_path(&self) -> PathBuf {
        let prefix = if self.demo_mode {
            "demo_results"
        } else {
            "grading_results"
        };
        PathBuf::from(format!(
            "{}_{}.txt",
            prefix,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    }

    /// 写入报告，返回实际写入的路径
    pub fn write(&self, records: &[GradedRecord], output_path: Option<&Path>) -> Result<PathBuf> {
        let path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_path());

        info!("📝 正在写入评分报告: {}", path.display());

        let report = self.render(records);
        debug!("报告长度: {} 字符", report.len());

        std::fs::write(&path, report).map_err(|e| ReportError::WriteFailed {
            path: path.display().to_string(),
            source: e,
        })?;

        info!("✅ 报告已写入: {}", path.display());
        Ok(path)
    }

    /// 生成报告文本
    pub fn render(&self, records: &[GradedRecord]) -> String {
        let rule = "=".repeat(60);
        let totals = ScoreTotals::from_records(records);
        let mut out = String::new();

        let title = if self.demo_mode {
            "HOMEWORK GRADER - DEMO RESULTS"
        } else {
            "HOMEWORK GRADING RESULTS"
        };

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "Generated: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "Total Questions: {}", totals.count);
        let _ = writeln!(
            out,
            "Overall Score: {:.1}/{} ({:.1}%)",
            totals.total, totals.count, totals.percentage
        );
        let _ = writeln!(out, "{}", rule);
        if self.demo_mode {
            let _ = writeln!(
                out,
                "NOTE: This is a DEMO run with limited grading capabilities."
            );
            let _ = writeln!(out, "Run without --demo for model-backed grading.");
            let _ = writeln!(out, "{}", rule);
        }
        out.push('\n');

        for record in records {
            render_record(&mut out, record);
        }

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Report generated by homework-grader");
        let _ = writeln!(out, "{}", rule);

        out
    }
}

fn render_record(out: &mut String, record: &GradedRecord) {
    let question = &record.question;

    let _ = writeln!(out, "Q{}: {}", question.number, question.question_text);
    let _ = writeln!(out, "Student Answer: {}", question.student_answer);
    let _ = writeln!(out, "Status: {}", record.status);

    if record.status != GradeStatus::Correct {
        let correct_answer = if record.correct_answer.is_empty() {
            "Not available"
        } else {
            record.correct_answer.as_str()
        };
        let _ = writeln!(out, "Correct Answer: {}", correct_answer);
    }
    if !record.explanation.is_empty() {
        let _ = writeln!(out, "Explanation: {}", record.explanation);
    }
    if !record.feedback.is_empty() {
        let _ = writeln!(out, "Feedback: {}", record.feedback);
    }

    let _ = writeln!(out, "Points: {:.1}/1.0", record.score);
    let _ = writeln!(out, "{}", "-".repeat(40));
    out.push('\n');
}
