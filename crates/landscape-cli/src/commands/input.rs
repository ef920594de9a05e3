//! 캔들 CSV 읽기.
//!
//! 형식: `date,open,high,low,close,volume` 헤더와 한 줄당 캔들 하나.
//! `date`는 RFC 3339 시각 또는 `YYYY-MM-DD` (UTC 자정)입니다.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use landscape_core::Candle;

const HEADER: &str = "date,open,high,low,close,volume";

/// 파일에서 캔들을 읽습니다.
pub fn read_candles(path: &Path) -> Result<Vec<Candle>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let candles = parse_candles(BufReader::new(file))
        .with_context(|| format!("Invalid candle file: {}", path.display()))?;

    info!("Loaded {} candles from {}", candles.len(), path.display());

    Ok(candles)
}

/// CSV 본문을 캔들 목록으로 파싱합니다.
///
/// 시간은 엄격히 증가해야 하며, 저가가 고가보다 클 수 없습니다.
pub fn parse_candles<R: BufRead>(reader: R) -> Result<Vec<Candle>> {
    let mut lines = reader.lines().enumerate();

    match lines.next() {
        Some((_, header)) => {
            let header = header?;
            if header.trim() != HEADER {
                bail!("Unexpected header: {}. Expected {}", header.trim(), HEADER);
            }
        }
        None => bail!("Empty input"),
    }

    let mut candles: Vec<Candle> = Vec::new();
    for (index, line) in lines {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let candle =
            parse_line(&line).with_context(|| format!("Line {}: {}", line_no, line.trim()))?;

        if !candle.is_consistent() {
            bail!("Line {}: low {} is above high {}", line_no, candle.low, candle.high);
        }
        if let Some(previous) = candles.last() {
            if candle.open_time <= previous.open_time {
                bail!(
                    "Line {}: time {} is not after previous {}",
                    line_no,
                    candle.open_time,
                    previous.open_time
                );
            }
        }

        candles.push(candle);
    }

    Ok(candles)
}

fn parse_line(line: &str) -> Result<Candle> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 6 {
        bail!("Expected 6 fields, found {}", fields.len());
    }

    let price = |name: &str, value: &str| -> Result<Decimal> {
        Decimal::from_str(value).with_context(|| format!("Invalid {}: {}", name, value))
    };

    Ok(Candle::new(
        parse_timestamp(fields[0])?,
        price("open", fields[1])?,
        price("high", fields[2])?,
        price("low", fields[3])?,
        price("close", fields[4])?,
        price("volume", fields[5])?,
    ))
}

/// 시각 문자열 파싱 (RFC 3339 또는 YYYY-MM-DD).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return Ok(time.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!("Invalid date format: {}. Expected RFC 3339 or YYYY-MM-DD", s)
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date: {}", s))?;

    Ok(Utc.from_utc_datetime(&midnight))
}
