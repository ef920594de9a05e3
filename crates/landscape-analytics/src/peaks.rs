//! 피크 탐색 (Peak Detector).
//!
//! 고가와 저가 각각에 대해 `[i - half_period, i + half_period)` 윈도우의
//! 국소 최댓값/최솟값을 찾습니다.
//!
//! # 규칙
//!
//! - 윈도우는 `[0, count)` 범위로 잘라냅니다 (시계열 밖은 읽지 않음).
//! - 같은 값이 연속되는 구간(plateau)에서는 첫 번째 바만 피크가 됩니다.
//! - 한 바가 같은 가격 계열에서 최댓값이면서 최솟값일 수는 없으며, 최댓값이 우선합니다.
//!   고가와 저가는 서로 독립적으로 판정합니다.
//! - 첫 바와 마지막 바에는 항상 고가/저가 피크가 하나씩 존재합니다.
//!   자연스럽게 판정되지 않으면 인접 바와 비교해 합성합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use landscape_core::{BarSource, Color, IconShape, LandscapeError, LandscapeResult, VisualizationSink};

/// 경계 피크 합성에 필요한 최소 바 개수.
const MIN_BARS: usize = 2;

/// 피크 식별자.
///
/// 한 번의 탐색 결과(`PeakSet`) 안에서의 위치이며, 값이 같은 피크라도 구분됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeakId(pub usize);

/// 최댓값/최솟값 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeakKind {
    Maximum,
    Minimum,
}

impl fmt::Display for PeakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakKind::Maximum => write!(f, "Maximum"),
            PeakKind::Minimum => write!(f, "Minimum"),
        }
    }
}

/// 가격 극값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// 결과 집합 내 식별자
    pub id: PeakId,
    /// 고가에서 찾았는지 여부 (false면 저가)
    pub from_high_price: bool,
    /// 최댓값/최솟값
    pub kind: PeakKind,
    /// 바 시작 시간
    pub timestamp: DateTime<Utc>,
    /// 바 인덱스
    pub bar_index: usize,
    /// 가격
    pub price: f64,
    /// 피크를 찾은 half period
    pub source_period: usize,
    /// 중요도 (현재 항상 1)
    pub intensity: f64,
}

impl Peak {
    /// 같은 탐색 결과의 같은 피크인지 확인합니다.
    ///
    /// 값이 아니라 식별자를 비교합니다.
    pub fn is_same(&self, other: &Peak) -> bool {
        self.id == other.id
    }

    /// 아이콘 색상.
    ///
    /// 고가 최댓값 녹색, 고가 최솟값 노랑, 저가 최댓값 주황, 저가 최솟값 빨강.
    pub fn color(&self) -> Color {
        match (self.from_high_price, self.kind) {
            (true, PeakKind::Maximum) => Color::GREEN,
            (true, PeakKind::Minimum) => Color::YELLOW,
            (false, PeakKind::Maximum) => Color::ORANGE,
            (false, PeakKind::Minimum) => Color::RED,
        }
    }

    /// 피크를 원형 아이콘으로 그립니다.
    pub fn visualize(&self, sink: &mut dyn VisualizationSink) {
        let side = if self.from_high_price { "high" } else { "low" };
        let id = format!("peak_{}_{}", side, Uuid::new_v4());
        sink.draw_icon(&id, IconShape::Circle, self.timestamp, self.price, self.color());
    }
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at index {}, time {}, price {}",
            if self.from_high_price { "High" } else { "Low" },
            self.kind,
            self.bar_index,
            self.timestamp,
            self.price
        )
    }
}

/// 한 번의 탐색으로 찾은 피크 집합.
///
/// 바 인덱스 오름차순이며, 같은 바에서는 고가 피크가 저가 피크보다 앞섭니다.
/// `PeakId`는 이 벡터의 인덱스와 같습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeakSet {
    peaks: Vec<Peak>,
}

impl PeakSet {
    /// 이미 정렬된 피크로 집합을 만들고 식별자를 다시 부여합니다.
    fn from_sorted(mut peaks: Vec<Peak>) -> Self {
        for (index, peak) in peaks.iter_mut().enumerate() {
            peak.id = PeakId(index);
        }
        Self { peaks }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn get(&self, id: PeakId) -> Option<&Peak> {
        self.peaks.get(id.0)
    }

    pub fn as_slice(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peak> {
        self.peaks.iter()
    }

    /// 고가 피크 (바 인덱스 오름차순)
    pub fn high_peaks(&self) -> impl Iterator<Item = &Peak> {
        self.peaks.iter().filter(|p| p.from_high_price)
    }

    /// 저가 피크 (바 인덱스 오름차순)
    pub fn low_peaks(&self) -> impl Iterator<Item = &Peak> {
        self.peaks.iter().filter(|p| !p.from_high_price)
    }
}

/// 피크 탐색기.
#[derive(Debug, Clone, Copy)]
pub struct PeakDetector {
    half_period: usize,
}

impl PeakDetector {
    /// 새 탐색기를 생성합니다.
    ///
    /// # 에러
    ///
    /// `half_period`가 0이면 `InvalidParameter`.
    pub fn new(half_period: usize) -> LandscapeResult<Self> {
        if half_period == 0 {
            return Err(LandscapeError::InvalidParameter(
                "half_period는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(Self { half_period })
    }

    pub fn half_period(&self) -> usize {
        self.half_period
    }

    /// 바 시계열에서 모든 피크를 찾습니다.
    ///
    /// # 에러
    ///
    /// 바가 2개 미만이면 `InsufficientData`.
    pub fn find_peaks<B: BarSource + ?Sized>(&self, bars: &B) -> LandscapeResult<PeakSet> {
        let count = bars.count();
        if count < MIN_BARS {
            return Err(LandscapeError::InsufficientData {
                required: MIN_BARS,
                provided: count,
            });
        }

        let highs: Vec<f64> = (0..count).map(|i| bars.high_price(i)).collect();
        let lows: Vec<f64> = (0..count).map(|i| bars.low_price(i)).collect();

        let high_peaks = self.scan_series(bars, &highs, true);
        let low_peaks = self.scan_series(bars, &lows, false);

        debug!(
            bars = count,
            half_period = self.half_period,
            high_peaks = high_peaks.len(),
            low_peaks = low_peaks.len(),
            "Peaks found"
        );

        Ok(PeakSet::from_sorted(merge_by_bar_index(high_peaks, low_peaks)))
    }

    /// 한 가격 계열의 피크를 찾고 경계 피크를 보장합니다.
    fn scan_series<B: BarSource + ?Sized>(
        &self,
        bars: &B,
        series: &[f64],
        from_high_price: bool,
    ) -> Vec<Peak> {
        let last = series.len() - 1;
        let make_peak = |index: usize, kind: PeakKind| Peak {
            id: PeakId(0),
            from_high_price,
            kind,
            timestamp: bars.open_time(index),
            bar_index: index,
            price: series[index],
            source_period: self.half_period,
            intensity: 1.0,
        };

        let mut peaks: Vec<Peak> = (0..series.len())
            .filter_map(|index| {
                extremum_kind(series, index, self.half_period).map(|kind| make_peak(index, kind))
            })
            .collect();

        if peaks.first().map_or(true, |p| p.bar_index != 0) {
            let kind = boundary_kind(series[0], series[1]);
            debug!(from_high_price, ?kind, "Synthesized peak at first bar");
            peaks.insert(0, make_peak(0, kind));
        }

        if peaks.last().map_or(true, |p| p.bar_index != last) {
            let kind = boundary_kind(series[last], series[last - 1]);
            debug!(from_high_price, ?kind, "Synthesized peak at last bar");
            peaks.push(make_peak(last, kind));
        }

        peaks
    }
}

/// `index`가 윈도우 안에서 처음 나타난 극값이면 그 종류를 반환합니다.
fn extremum_kind(series: &[f64], index: usize, half_period: usize) -> Option<PeakKind> {
    let start = index.saturating_sub(half_period);
    let end = (index + half_period).min(series.len());
    let value = series[index];

    // plateau에서는 첫 번째 바만 인정
    if series[start..index].iter().any(|&v| v == value) {
        return None;
    }

    let window = &series[start..end];
    if window.iter().all(|&v| v <= value) {
        Some(PeakKind::Maximum)
    } else if window.iter().all(|&v| v >= value) {
        Some(PeakKind::Minimum)
    } else {
        None
    }
}

/// 경계 바를 유일한 인접 바와 비교해 종류를 정합니다.
fn boundary_kind(boundary: f64, neighbor: f64) -> PeakKind {
    if boundary > neighbor {
        PeakKind::Maximum
    } else {
        PeakKind::Minimum
    }
}

/// 두 정렬된 피크 목록을 바 인덱스 순으로 합칩니다 (같은 바에서는 고가 우선).
fn merge_by_bar_index(high_peaks: Vec<Peak>, low_peaks: Vec<Peak>) -> Vec<Peak> {
    let mut merged = Vec::with_capacity(high_peaks.len() + low_peaks.len());
    let mut highs = high_peaks.into_iter().peekable();
    let mut lows = low_peaks.into_iter().peekable();

    loop {
        let take_high = match (highs.peek(), lows.peek()) {
            (Some(h), Some(l)) => h.bar_index <= l.bar_index,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_high { highs.next() } else { lows.next() };
        merged.extend(next);
    }

    merged
}

/// 기본 탐색기로 피크를 찾습니다.
pub fn find_peaks<B: BarSource + ?Sized>(bars: &B, half_period: usize) -> LandscapeResult<PeakSet> {
    PeakDetector::new(half_period)?.find_peaks(bars)
}
