//! 추세 구간 분할 (reading frame sweep).
//!
//! 고가 피크와 저가 피크를 두 개의 정렬된 스트림으로 보고, 병합 정렬처럼
//! 끝 인덱스가 더 작은 쪽을 한 칸씩 전진시키며 추세를 만듭니다.
//! 고가 구간과 저가 구간이 겹치는 모든 범위는 정확히 하나의 추세에 속합니다.

use tracing::debug;

use landscape_core::{LandscapeError, LandscapeResult};

use crate::peaks::Peak;
use crate::trend::Trend;

/// 고가/저가 각각 필요한 최소 피크 수.
const MIN_PEAKS_PER_SIDE: usize = 2;

/// 두 피크 스트림 위를 움직이는 4칸 프레임.
#[derive(Debug, Clone)]
struct ReadingFrame {
    high_start: Peak,
    low_start: Peak,
    high_end: Peak,
    low_end: Peak,
}

impl ReadingFrame {
    /// 각 쪽의 첫 피크를 시작과 끝 칸에 모두 넣습니다.
    fn new(first_high: Peak, first_low: Peak) -> Self {
        Self {
            high_start: first_high,
            low_start: first_low,
            high_end: first_high,
            low_end: first_low,
        }
    }

    fn should_advance_high(&self) -> bool {
        self.high_end.bar_index < self.low_end.bar_index
    }

    fn should_advance_low(&self) -> bool {
        self.high_end.bar_index > self.low_end.bar_index
    }

    fn frontier_tied(&self) -> bool {
        self.high_end.bar_index == self.low_end.bar_index
    }

    fn advance_high(&mut self, peak: Peak) {
        self.high_start = self.high_end;
        self.high_end = peak;
    }

    fn advance_low(&mut self, peak: Peak) {
        self.low_start = self.low_end;
        self.low_end = peak;
    }

    /// 양쪽 모두 서로 다른 두 피크로 이루어진 구간을 가졌는지 확인합니다.
    fn is_complete(&self) -> bool {
        !self.high_start.is_same(&self.high_end) && !self.low_start.is_same(&self.low_end)
    }

    fn trend(&self, slope_threshold: f64) -> LandscapeResult<Trend> {
        Trend::new(
            self.high_start,
            self.low_start,
            self.high_end,
            self.low_end,
            slope_threshold,
        )
    }
}

/// 추세 분할기.
#[derive(Debug, Clone, Copy)]
pub struct TrendSegmenter {
    slope_threshold: f64,
}

impl TrendSegmenter {
    /// 새 분할기를 생성합니다.
    ///
    /// # 에러
    ///
    /// 임계값이 음수이거나 유한하지 않으면 `InvalidParameter`.
    pub fn new(slope_threshold: f64) -> LandscapeResult<Self> {
        if !slope_threshold.is_finite() || slope_threshold < 0.0 {
            return Err(LandscapeError::InvalidParameter(format!(
                "slope_threshold는 0 이상의 유한한 값이어야 합니다: {}",
                slope_threshold
            )));
        }
        Ok(Self { slope_threshold })
    }

    pub fn slope_threshold(&self) -> f64 {
        self.slope_threshold
    }

    /// 피크 목록에서 최소 단위의 추세 구간을 모두 찾습니다.
    ///
    /// 한 쪽 스트림이 먼저 끝나면 그 쪽 끝 피크를 고정한 채 남은 쪽을 소진합니다.
    /// 두 끝 인덱스가 같을 때는 겹치는 범위가 없으므로 추세를 만들지 않고 전진만 합니다.
    ///
    /// # 에러
    ///
    /// - 고가 또는 저가 피크가 2개 미만이면 `Precondition`
    /// - 프레임이 유효하지 않은 윈도우를 만들면 `InvalidWindow`
    pub fn find_trends(&self, peaks: &[Peak]) -> LandscapeResult<Vec<Trend>> {
        let mut high_peaks: Vec<Peak> = peaks.iter().filter(|p| p.from_high_price).copied().collect();
        let mut low_peaks: Vec<Peak> = peaks.iter().filter(|p| !p.from_high_price).copied().collect();

        if high_peaks.len() < MIN_PEAKS_PER_SIDE || low_peaks.len() < MIN_PEAKS_PER_SIDE {
            return Err(LandscapeError::Precondition(format!(
                "고가 피크 {}개, 저가 피크 {}개로는 추세를 찾을 수 없습니다 (각각 {}개 이상 필요)",
                high_peaks.len(),
                low_peaks.len(),
                MIN_PEAKS_PER_SIDE
            )));
        }

        // 안정 정렬: 탐색기 출력은 이미 정렬되어 있음
        high_peaks.sort_by_key(|p| p.bar_index);
        low_peaks.sort_by_key(|p| p.bar_index);

        let mut highs = high_peaks.into_iter();
        let mut lows = low_peaks.into_iter();
        let (Some(first_high), Some(first_low)) = (highs.next(), lows.next()) else {
            return Ok(Vec::new());
        };

        let mut frame = ReadingFrame::new(first_high, first_low);
        let mut highs = highs.peekable();
        let mut lows = lows.peekable();
        let mut trends: Vec<Trend> = Vec::new();

        loop {
            let advance_high = match (highs.peek().is_some(), lows.peek().is_some()) {
                (false, false) => break,
                (true, false) => true,
                (false, true) => false,
                (true, true) => frame.should_advance_high() || !frame.should_advance_low(),
            };

            let tied = frame.frontier_tied();
            let next = if advance_high { highs.next() } else { lows.next() };
            let Some(peak) = next else {
                break;
            };
            if advance_high {
                frame.advance_high(peak);
            } else {
                frame.advance_low(peak);
            }

            if tied || !frame.is_complete() {
                continue;
            }

            let trend = frame.trend(self.slope_threshold)?;
            debug_assert!(trends
                .last()
                .map_or(true, |previous| previous.is_continued_by(&trend)));
            trends.push(trend);
        }

        debug!(trends = trends.len(), "Trend segments found");

        Ok(trends)
    }
}

/// 기본 분할기로 추세를 찾습니다.
pub fn find_trends(peaks: &[Peak], slope_threshold: f64) -> LandscapeResult<Vec<Trend>> {
    TrendSegmenter::new(slope_threshold)?.find_trends(peaks)
}
