use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use homework_grader::orchestrator::{App, GradingMode};
use homework_grader::utils::logging;
use homework_grader::Config;

/// 作业自动评分：识别作业图片，逐题评分并生成报告
#[derive(Parser, Debug)]
#[command(name = "homework-grader", version, about)]
struct Cli {
    /// 作业图片路径
    image_path: PathBuf,

    /// 报告输出路径（默认自动生成带时间戳的文件名）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 使用演示后端，不调用大模型
    #[arg(long)]
    demo: bool,

    /// 配置文件路径
    #[arg(long, default_value = "grader.toml")]
    config: PathBuf,

    /// 只做文字识别并打印结果
    #[arg(long)]
    test: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(&cli.config)?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    let app = App::new(config);

    if cli.test {
        let text = app.extract_only(&cli.image_path).await?;
        println!("{}", text);
        return Ok(());
    }

    let mode = GradingMode::from_demo_flag(cli.demo);
    let report = app
        .run(&cli.image_path, cli.output.as_deref(), mode)
        .await?;

    info!("🎉 评分完成");
    println!("Results saved to: {}", report.display());

    Ok(())
}
