//! 랜드스케이프 계산 명령어.

use anyhow::{Context, Result};
use std::fmt::{self, Write as _};
use std::path::PathBuf;
use tracing::info;

use landscape_analytics::{find_peaks, Landscape, LandscapeAnalyzer, PeakSet};
use landscape_core::{LandscapeConfig, RecordingSink};

use super::input::read_candles;

/// 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 전체 결과 JSON
    Json,
    /// 사람이 읽는 요약
    Summary,
    /// 그리기 명령 JSON
    Draw,
}

impl OutputFormat {
    /// 문자열에서 출력 형식 파싱
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "summary" | "text" => Some(Self::Summary),
            "draw" | "commands" => Some(Self::Draw),
            _ => None,
        }
    }
}

/// analyze 명령어 설정
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub input: PathBuf,
    pub settings: LandscapeConfig,
    pub format: OutputFormat,
}

/// 파일을 읽어 랜드스케이프를 계산하고 출력 문자열을 만듭니다.
pub fn run_analyze(config: AnalyzeConfig) -> Result<String> {
    let candles = read_candles(&config.input)?;
    let analyzer = LandscapeAnalyzer::new(config.settings).context("Invalid configuration")?;
    let landscape = analyzer
        .analyze(&candles)
        .with_context(|| format!("Failed to analyze {}", config.input.display()))?;

    info!(
        "Found {} peaks, {} trends, {} support lines",
        landscape.peaks.len(),
        landscape.trends.len(),
        landscape.support_lines.len()
    );

    render(&landscape, config.format)
}

/// 결과를 형식에 맞게 문자열로 만듭니다.
pub fn render(landscape: &Landscape, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(landscape)?),
        OutputFormat::Draw => {
            let mut sink = RecordingSink::new();
            landscape.visualize(&mut sink);
            Ok(serde_json::to_string_pretty(sink.commands())?)
        }
        OutputFormat::Summary => {
            let mut out = String::new();
            write_summary(&mut out, landscape)?;
            Ok(out)
        }
    }
}

fn write_summary(out: &mut String, landscape: &Landscape) -> fmt::Result {
    let last = landscape.bar_count.saturating_sub(1);

    writeln!(out, "바: {}", landscape.bar_count)?;
    writeln!(out, "피크: {}", landscape.peaks.len())?;
    writeln!(out, "추세: {}", landscape.trends.len())?;
    for trend in &landscape.trends {
        writeln!(out, "  {}", trend)?;
    }

    writeln!(out, "지지선: {}", landscape.support_lines.len())?;
    for line in &landscape.support_lines {
        writeln!(
            out,
            "  price {:.4}, start {}, intensity {:.2} (now {:.2}), merged {}",
            line.price,
            line.start_index,
            line.intensity,
            line.intensity_at(last),
            line.merge_count()
        )?;
    }

    Ok(())
}

/// 피크만 찾아 한 줄씩 출력합니다.
pub fn run_peaks(input: PathBuf, half_period: usize) -> Result<String> {
    let candles = read_candles(&input)?;
    let peaks: PeakSet = find_peaks(&candles, half_period)
        .with_context(|| format!("Failed to find peaks in {}", input.display()))?;

    let mut out = String::new();
    for peak in peaks.iter() {
        writeln!(out, "{}", peak)?;
    }
    Ok(out)
}
