//! 전체 파이프라인 통합 테스트.
//!
//! 캔들 시계열 → 피크 → 추세 → 선 → 지지선 병합까지 한 번에 검증합니다.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use landscape_analytics::{
    LandscapeAnalyzer, LineSide, PeakKind, ResistanceLine, TrendType,
};
use landscape_core::{Candle, DrawCommand, LandscapeConfig, RecordingSink};

fn candle(day: i64, high: Decimal, low: Decimal) -> Candle {
    let open_time = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap() + Duration::days(day);
    Candle::new(open_time, low, high, low, high, dec!(1000))
}

/// 고가 = 100 + i, 저가 = 99 + i 인 단조 증가 시계열
fn rising_candles(count: i64) -> Vec<Candle> {
    (0..count)
        .map(|i| candle(i, dec!(100) + Decimal::from(i), dec!(99) + Decimal::from(i)))
        .collect()
}

fn analyzer(half_period: usize) -> LandscapeAnalyzer {
    let mut config = LandscapeConfig::default();
    config.peaks.half_period = half_period;
    LandscapeAnalyzer::new(config).unwrap()
}

#[test]
fn test_monotonic_series_end_to_end() {
    let count = 30;
    let candles = rising_candles(count);
    let landscape = analyzer(2).analyze(&candles).unwrap();

    // 피크: 고가/저가 각각 첫 바(최솟값)와 마지막 바(최댓값)
    assert_eq!(landscape.peaks.len(), 4);
    for peak in landscape.peaks.iter() {
        if peak.bar_index == 0 {
            assert_eq!(peak.kind, PeakKind::Minimum);
        } else {
            assert_eq!(peak.bar_index, count as usize - 1);
            assert_eq!(peak.kind, PeakKind::Maximum);
        }
    }

    // 추세 하나, 상승/상승
    assert_eq!(landscape.trends.len(), 1);
    let trend = &landscape.trends[0];
    assert_eq!(trend.high_type, TrendType::Uptrend);
    assert_eq!(trend.low_type, TrendType::Uptrend);
    assert_eq!(trend.core.start_index, 0);
    assert_eq!(trend.core.end_index, 29);
    assert_eq!(trend.core.length_in_bars, 29);

    // 회귀선 두 개, 기울기 1
    assert_eq!(landscape.trend_lines.len(), 2);
    for line in &landscape.trend_lines {
        assert!((line.slope - 1.0).abs() < 1e-9);
        let expected_intercept = match line.side {
            LineSide::High => 100.0,
            LineSide::Low => 99.0,
        };
        assert!((line.intercept - expected_intercept).abs() < 1e-9);
    }

    // 지지선 하나, 마지막 고가 피크에 고정
    assert_eq!(landscape.support_lines.len(), 1);
    let support = &landscape.support_lines[0];
    assert_eq!(support.start_index, 29);
    assert_eq!(support.price, 129.0);
    assert_eq!(support.direction, TrendType::Uptrend);
    assert!(support.joint_indices.is_empty());

    let expected = 100.0 / (1.0 + (-0.05f64 * (29.0 - 50.0)).exp());
    assert!((support.intensity - expected).abs() < 1e-12);
}

#[test]
fn test_zigzag_series_produces_chained_trends() {
    // 상승 파동 두 번과 하락 파동 한 번
    let highs = [
        10, 11, 12, 13, 14, 15, 14, 13, 12, 11, 12, 13, 14, 15, 16, 17, 18, 17, 16, 15,
    ];
    let candles: Vec<Candle> = highs
        .iter()
        .enumerate()
        .map(|(i, &h)| candle(i as i64, Decimal::from(h), Decimal::from(h) - dec!(2)))
        .collect();

    let landscape = analyzer(3).analyze(&candles).unwrap();

    assert!(landscape.trends.len() >= 2);
    for pair in landscape.trends.windows(2) {
        assert!(pair[0].is_continued_by(&pair[1]));
        assert_eq!(pair[0].core.end_index, pair[1].core.start_index);
    }
    assert_eq!(landscape.trends.first().unwrap().core.start_index, 0);
    assert_eq!(landscape.trends.last().unwrap().core.end_index, 19);
    assert_eq!(landscape.trend_lines.len(), landscape.trends.len() * 2);
}

#[test]
fn test_flat_series_has_no_support_lines() {
    let candles: Vec<Candle> = (0..15).map(|i| candle(i, dec!(50), dec!(49))).collect();
    let landscape = analyzer(2).analyze(&candles).unwrap();

    assert!(landscape
        .trends
        .iter()
        .all(|t| t.high_type == TrendType::Consolidation && t.low_type == TrendType::Consolidation));
    assert!(landscape.support_lines.is_empty());
}

#[test]
fn test_visualize_records_support_line() {
    let candles = rising_candles(20);
    let landscape = analyzer(2).analyze(&candles).unwrap();

    let lines = landscape.resistance_lines();
    assert_eq!(lines.len(), 1);
    assert!(matches!(lines[0], ResistanceLine::Support(_)));

    let mut sink = RecordingSink::new();
    landscape.visualize(&mut sink);

    assert_eq!(sink.horizontal_line_count(), 1);
    match &sink.commands()[0] {
        DrawCommand::HorizontalLine { price, thickness, .. } => {
            assert_eq!(*price, 119.0);
            assert_eq!(*thickness, 1);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}
