//! 지지/저항 랜드스케이프 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 요약 출력
//! landscape analyze -i data/us/SPY_daily.csv --format summary
//!
//! # 설정 파일과 half period 지정, 전체 결과 JSON
//! landscape analyze -i bars.csv -c config/landscape.toml --half-period 5
//!
//! # 차트 그리기 명령만 출력
//! landscape analyze -i bars.csv --format draw
//!
//! # 피크 목록
//! landscape peaks -i bars.csv --half-period 10
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use landscape_cli::commands::analyze::{run_analyze, run_peaks, AnalyzeConfig, OutputFormat};
use landscape_core::{init_logging, init_logging_from_env, LandscapeConfig, LogConfig};

#[derive(Parser)]
#[command(name = "landscape")]
#[command(about = "Support/resistance landscape CLI - 피크, 추세, 지지선 계산", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/landscape.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 캔들 CSV로 랜드스케이프 계산
    Analyze {
        /// 입력 CSV 경로 (date,open,high,low,close,volume)
        #[arg(short, long)]
        input: PathBuf,

        /// 피크 앞뒤로 확인할 바 개수 (설정 파일 값을 덮어씀)
        #[arg(long)]
        half_period: Option<usize>,

        /// 출력 형식 (json, summary, draw)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// 피크 목록 출력
    Peaks {
        /// 입력 CSV 경로
        #[arg(short, long)]
        input: PathBuf,

        /// 피크 앞뒤로 확인할 바 개수 (설정 파일 값을 덮어씀)
        #[arg(long)]
        half_period: Option<usize>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> Result<LandscapeConfig> {
    match path {
        Some(path) => LandscapeConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => LandscapeConfig::load_default().context("Failed to load default config"),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = match load_settings(cli.config.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            // 설정을 못 읽으면 환경 변수 기준 로깅으로 에러만 남김
            init_logging_from_env()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
            error!("Command failed: {:#}", e);
            return Err(e);
        }
    };

    init_logging(LogConfig::from_settings(&settings.logging))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let output = match cli.command {
        Commands::Analyze {
            input,
            half_period,
            format,
        } => {
            let format = OutputFormat::from_str(&format).ok_or_else(|| {
                anyhow!("Invalid format: {}. Supported: json, summary, draw", format)
            })?;

            if let Some(half_period) = half_period {
                settings.peaks.half_period = half_period;
            }

            info!("Analyzing {}", input.display());
            run_analyze(AnalyzeConfig {
                input,
                settings,
                format,
            })
        }

        Commands::Peaks { input, half_period } => {
            let half_period = half_period.unwrap_or(settings.peaks.half_period);
            run_peaks(input, half_period)
        }
    };

    match output {
        Ok(text) => {
            print!("{}", text);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
