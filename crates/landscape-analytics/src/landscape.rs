//! 랜드스케이프 계산 파이프라인.
//!
//! 피크 탐색 → 추세 분할 → 회귀선/지지선 후보 → 지지선 병합을
//! 한 번에 실행하고 결과를 하나의 스냅샷으로 돌려줍니다.
//! 실패하면 부분 결과 없이 에러만 반환합니다.

use serde::Serialize;
use tracing::{debug, error, info};

use landscape_core::{
    landscape_span, BarSource, DisplayConfig, LandscapeConfig, LandscapeResult, VisualizationSink,
};

use crate::aggregator::SupportAggregator;
use crate::fitter::LineFitter;
use crate::lines::{LineSide, LineStyle, ResistanceLine, SupportLine, TrendLine};
use crate::peaks::{PeakDetector, PeakSet};
use crate::segmenter::TrendSegmenter;
use crate::trend::Trend;

/// 한 번의 재계산 결과.
#[derive(Debug, Clone, Serialize)]
pub struct Landscape {
    pub bar_count: usize,
    pub peaks: PeakSet,
    pub trends: Vec<Trend>,
    pub trend_lines: Vec<TrendLine>,
    pub support_lines: Vec<SupportLine>,
    pub display: DisplayConfig,
    #[serde(skip)]
    style: LineStyle,
}

impl Landscape {
    /// 표시 설정으로 거른 저항선 목록.
    pub fn resistance_lines(&self) -> Vec<ResistanceLine> {
        let trend_lines = self
            .trend_lines
            .iter()
            .filter(|line| match line.side {
                LineSide::High => self.display.high_trend_lines,
                LineSide::Low => self.display.low_trend_lines,
            })
            .cloned()
            .map(ResistanceLine::from);

        let support_lines = self
            .support_lines
            .iter()
            .filter(|_| self.display.support_lines)
            .cloned()
            .map(ResistanceLine::from);

        trend_lines.chain(support_lines).collect()
    }

    /// 마지막 바 시점에서 가장 강한 지지선.
    pub fn strongest_support(&self) -> Option<&SupportLine> {
        let last = self.bar_count.saturating_sub(1);
        self.support_lines.iter().fold(None, |best: Option<&SupportLine>, line| {
            match best {
                Some(current) if current.intensity_at(last) >= line.intensity_at(last) => Some(current),
                _ => Some(line),
            }
        })
    }

    /// 표시 설정에 따라 피크와 선을 그립니다.
    pub fn visualize(&self, sink: &mut dyn VisualizationSink) {
        if self.display.peaks {
            for peak in self.peaks.iter() {
                peak.visualize(sink);
            }
        }

        for line in self.resistance_lines() {
            line.visualize(sink, &self.style);
        }
    }
}

/// 설정을 담은 랜드스케이프 분석기.
#[derive(Debug, Clone)]
pub struct LandscapeAnalyzer {
    config: LandscapeConfig,
    detector: PeakDetector,
    segmenter: TrendSegmenter,
    aggregator: SupportAggregator,
    style: LineStyle,
}

impl LandscapeAnalyzer {
    /// 설정을 검증하고 분석기를 생성합니다.
    pub fn new(config: LandscapeConfig) -> LandscapeResult<Self> {
        config.validate()?;

        Ok(Self {
            detector: PeakDetector::new(config.peaks.half_period)?,
            segmenter: TrendSegmenter::new(config.trends.slope_threshold)?,
            aggregator: SupportAggregator::new(config.support.merge_distance)?,
            style: LineStyle::from_config(&config.support),
            config,
        })
    }

    pub fn config(&self) -> &LandscapeConfig {
        &self.config
    }

    /// 바 시계열 전체를 다시 계산합니다.
    pub fn analyze<B: BarSource + ?Sized>(&self, bars: &B) -> LandscapeResult<Landscape> {
        let span = landscape_span!("landscape", bars.count(), self.detector.half_period());
        let _guard = span.enter();

        self.run(bars).inspect_err(|e| {
            if e.is_programming_error() {
                error!(error = %e, "Landscape invariant violated");
            } else {
                debug!(error = %e, "Landscape not computed");
            }
        })
    }

    fn run<B: BarSource + ?Sized>(&self, bars: &B) -> LandscapeResult<Landscape> {
        let peaks = self.detector.find_peaks(bars)?;
        let trends = self.segmenter.find_trends(peaks.as_slice())?;
        let fitted = LineFitter::new(bars, &self.config).find_lines(&trends)?;
        let support_lines = self.aggregator.aggregate(fitted.support_candidates)?;

        info!(
            peaks = peaks.len(),
            trends = trends.len(),
            trend_lines = fitted.trend_lines.len(),
            support_lines = support_lines.len(),
            "Landscape computed"
        );

        Ok(Landscape {
            bar_count: bars.count(),
            peaks,
            trends,
            trend_lines: fitted.trend_lines,
            support_lines,
            display: self.config.display.clone(),
            style: self.style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars_from;
    use landscape_core::{LandscapeError, RecordingSink};

    fn rising(count: usize) -> Vec<(f64, f64)> {
        (0..count)
            .map(|i| (100.0 + i as f64, 99.0 + i as f64))
            .collect()
    }

    fn config(half_period: usize) -> LandscapeConfig {
        let mut config = LandscapeConfig::default();
        config.peaks.half_period = half_period;
        config
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = LandscapeAnalyzer::new(config(0));
        assert!(matches!(result, Err(LandscapeError::Config(_))));
    }

    #[test]
    fn test_intensity_maximum_above_ceiling_rejected() {
        let mut cfg = config(2);
        cfg.trends.length_to_intensity_maximum = 140.0;
        assert!(matches!(
            LandscapeAnalyzer::new(cfg),
            Err(LandscapeError::Config(_))
        ));
    }

    #[test]
    fn test_too_few_bars() {
        let analyzer = LandscapeAnalyzer::new(config(2)).unwrap();
        let bars = bars_from(&[(10.0, 9.0)]);
        assert!(matches!(
            analyzer.analyze(&bars),
            Err(LandscapeError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_display_toggles_filter_lines() {
        let bars = bars_from(&rising(20));

        let mut cfg = config(2);
        cfg.display.high_trend_lines = true;
        cfg.display.low_trend_lines = false;
        cfg.display.support_lines = true;

        let landscape = LandscapeAnalyzer::new(cfg).unwrap().analyze(&bars).unwrap();
        let lines = landscape.resistance_lines();

        assert_eq!(landscape.trend_lines.len(), 2);
        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0], ResistanceLine::Trend(ref l) if l.side == LineSide::High));
        assert!(matches!(lines[1], ResistanceLine::Support(_)));
    }

    #[test]
    fn test_visualize_draws_enabled_objects() {
        let bars = bars_from(&rising(20));

        let mut cfg = config(2);
        cfg.display.peaks = true;
        let landscape = LandscapeAnalyzer::new(cfg).unwrap().analyze(&bars).unwrap();

        let mut sink = RecordingSink::new();
        landscape.visualize(&mut sink);

        // 피크 4개 + 지지선 1개 (수평선 + 시작 아이콘)
        assert_eq!(sink.icon_count(), 4 + 1);
        assert_eq!(sink.horizontal_line_count(), 1);
        assert_eq!(sink.trend_line_count(), 0);
    }

    #[test]
    fn test_strongest_support() {
        let bars = bars_from(&rising(20));
        let landscape = LandscapeAnalyzer::new(config(2))
            .unwrap()
            .analyze(&bars)
            .unwrap();

        let strongest = landscape.strongest_support().unwrap();
        assert_eq!(strongest.start_index, 19);
    }

    #[test]
    fn test_serializes_to_json() {
        let bars = bars_from(&rising(10));
        let landscape = LandscapeAnalyzer::new(config(2))
            .unwrap()
            .analyze(&bars)
            .unwrap();

        let json = serde_json::to_value(&landscape).unwrap();
        assert_eq!(json["bar_count"], 10);
        assert_eq!(json["support_lines"].as_array().unwrap().len(), 1);
        assert!(json.get("style").is_none());
    }
}
