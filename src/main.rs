// src/main.rs

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use numsim::config::load_jobs;
use numsim::report::run_job;

#[derive(Parser)]
#[command(name = "numsim")]
#[command(about = "固定刻みの数値積分・常微分方程式ソルバの収束解析", long_about = None)]
struct Cli {
    /// ジョブファイル (YAML)
    #[arg(short, long, default_value = "config/jobs.yaml")]
    config: PathBuf,

    /// 出力ディレクトリ (ジョブファイルの指定を上書きする)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// ログレベル
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // ログの設定
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // ジョブファイルの読み込み
    let job_file = load_jobs(&cli.config)?;
    let output_dir = cli.output_dir.unwrap_or(job_file.output_dir);
    info!(
        config = %cli.config.display(),
        jobs = job_file.jobs.len(),
        "ジョブファイルを読み込みました"
    );

    // 1つのジョブが失敗しても残りは実行する
    let mut failures = 0;
    for job in &job_file.jobs {
        if let Err(err) = run_job(job, &output_dir) {
            error!(job = job.name(), %err, "ジョブが失敗しました");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(format!("{} 件のジョブが失敗しました", failures).into());
    }
    Ok(())
}
