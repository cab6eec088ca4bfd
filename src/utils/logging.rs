/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::orchestrator::GradingSummary;
use crate::workflow::QuestionCtx;

/// 初始化全局日志
///
/// 设置了 `RUST_LOG` 时以环境变量为准，否则默认 info，`verbose` 时为 debug。
/// 重复调用不会报错（测试里会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `image_path`: 作业图片路径
/// - `backend`: 评分后端名称
pub fn log_startup(image_path: &Path, backend: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 作业自动评分");
    info!("🖼️ 作业图片: {}", image_path.display());
    info!("🤖 评分后端: {}", backend);
    info!("{}", "=".repeat(60));
}

/// 记录单题开始信息
pub fn log_question_start(ctx: &QuestionCtx, question_text: &str) {
    info!("\n{}", "─".repeat(60));
    info!("{} 题干: {}", ctx, truncate_text(question_text, 60));
}

/// 打印评分汇总
pub fn log_summary(summary: &GradingSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 评分完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "✅ 得分: {:.1}/{} ({:.1}%)",
        summary.totals.total, summary.totals.count, summary.totals.percentage
    );
    info!("🔍 复核覆盖: {}", summary.overrides);
    info!("❌ 评分失败: {}", summary.errors);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
