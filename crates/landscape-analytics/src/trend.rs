//! 추세 (Trend), 추세 코어, 추세 분류.
//!
//! 추세는 고가 피크 두 개와 저가 피크 두 개로 둘러싸인 윈도우이며,
//! 고가 구간과 저가 구간이 겹치는 바 범위를 코어라고 부릅니다.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use landscape_core::{LandscapeError, LandscapeResult};

use crate::peaks::Peak;

/// 추세 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendType {
    Uptrend,
    Consolidation,
    Downtrend,
}

impl TrendType {
    /// 기울기를 임계값과 비교해 분류합니다.
    ///
    /// 경계값(`slope == ±threshold`)은 횡보로 분류합니다.
    pub fn classify(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendType::Uptrend
        } else if slope < -threshold {
            TrendType::Downtrend
        } else {
            TrendType::Consolidation
        }
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendType::Uptrend => "Uptrend",
            TrendType::Consolidation => "Consolidation",
            TrendType::Downtrend => "Downtrend",
        };
        write!(f, "{}", name)
    }
}

/// 두 피크 사이의 바당 가격 변화.
pub fn slope(start: &Peak, end: &Peak) -> f64 {
    (end.price - start.price) / (end.bar_index as f64 - start.bar_index as f64)
}

/// 고가 구간과 저가 구간이 겹치는 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCore {
    pub start_index: usize,
    pub end_index: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub length_in_bars: usize,
}

impl TrendCore {
    /// 네 피크로 코어를 계산합니다.
    ///
    /// # 에러
    ///
    /// 각 구간의 시작이 자기 끝과 반대쪽 끝보다 앞서지 않으면 `InvalidWindow`.
    pub fn from_peaks(
        high_start: &Peak,
        low_start: &Peak,
        high_end: &Peak,
        low_end: &Peak,
    ) -> LandscapeResult<Self> {
        if high_start.bar_index >= high_end.bar_index
            || low_start.bar_index >= low_end.bar_index
            || high_start.bar_index >= low_end.bar_index
            || low_start.bar_index >= high_end.bar_index
        {
            return Err(LandscapeError::InvalidWindow(format!(
                "피크 [{}], [{}], [{}], [{}]는 유효한 추세 코어를 만들지 않습니다",
                high_start, low_start, high_end, low_end
            )));
        }

        let core_start = if high_start.bar_index > low_start.bar_index {
            high_start
        } else {
            low_start
        };
        let core_end = if high_end.bar_index < low_end.bar_index {
            high_end
        } else {
            low_end
        };

        Ok(Self {
            start_index: core_start.bar_index,
            end_index: core_end.bar_index,
            start_time: core_start.timestamp,
            end_time: core_end.timestamp,
            length_in_bars: core_end.bar_index - core_start.bar_index,
        })
    }

    /// 코어의 시간 길이.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// 주말을 걸치는지 확인합니다.
    ///
    /// 6일 이상이거나, 일요일 기준 요일 번호가 끝에서 더 작으면 주말을 지난 것입니다.
    pub fn spans_weekend(&self) -> bool {
        self.duration() >= Duration::days(6)
            || self.end_time.weekday().num_days_from_sunday()
                < self.start_time.weekday().num_days_from_sunday()
    }

    /// `bar_index`가 코어 범위(양 끝 포함)에 있는지 확인합니다.
    pub fn contains(&self, bar_index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&bar_index)
    }
}

/// 가격 추세.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    pub high_start: Peak,
    pub low_start: Peak,
    pub high_end: Peak,
    pub low_end: Peak,
    pub high_slope: f64,
    pub low_slope: f64,
    pub high_type: TrendType,
    pub low_type: TrendType,
    pub core: TrendCore,
    pub intensity: f64,
}

impl Trend {
    /// 네 피크로 추세를 만들고 각 구간을 분류합니다.
    ///
    /// # 에러
    ///
    /// 피크 순서가 맞지 않거나 `source_period`가 서로 다르면 `InvalidWindow`.
    pub fn new(
        high_start: Peak,
        low_start: Peak,
        high_end: Peak,
        low_end: Peak,
        slope_threshold: f64,
    ) -> LandscapeResult<Self> {
        let period = high_start.source_period;
        if [low_start, high_end, low_end]
            .iter()
            .any(|p| p.source_period != period)
        {
            return Err(LandscapeError::InvalidWindow(format!(
                "서로 다른 탐색 기간의 피크가 섞여 있습니다: {}, {}, {}, {}",
                high_start.source_period,
                low_start.source_period,
                high_end.source_period,
                low_end.source_period
            )));
        }

        let core = TrendCore::from_peaks(&high_start, &low_start, &high_end, &low_end)?;

        let high_slope = slope(&high_start, &high_end);
        let low_slope = slope(&low_start, &low_end);

        Ok(Self {
            high_start,
            low_start,
            high_end,
            low_end,
            high_slope,
            low_slope,
            high_type: TrendType::classify(high_slope, slope_threshold),
            low_type: TrendType::classify(low_slope, slope_threshold),
            core,
            intensity: 1.0,
        })
    }

    /// 고가와 저가가 같은 방향(상승 또는 하락)으로 움직이는지 확인합니다.
    pub fn forms_support_line(&self) -> bool {
        matches!(
            (self.high_type, self.low_type),
            (TrendType::Uptrend, TrendType::Uptrend) | (TrendType::Downtrend, TrendType::Downtrend)
        )
    }

    /// 공통 방향 쪽 구간의 끝 피크.
    ///
    /// 둘 다 상승이면 고가 끝, 둘 다 하락이면 저가 끝. 방향이 다르면 `None`.
    pub fn directional_end_peak(&self) -> Option<&Peak> {
        match (self.high_type, self.low_type) {
            (TrendType::Uptrend, TrendType::Uptrend) => Some(&self.high_end),
            (TrendType::Downtrend, TrendType::Downtrend) => Some(&self.low_end),
            _ => None,
        }
    }

    /// `next`가 이 추세 바로 다음 구간인지 피크 식별자로 확인합니다.
    ///
    /// 고가 쪽, 저가 쪽, 또는 양쪽이 한 칸씩 전진한 경우입니다.
    pub fn is_continued_by(&self, next: &Trend) -> bool {
        let high_advanced = self.high_end.is_same(&next.high_start);
        let low_advanced = self.low_end.is_same(&next.low_start);
        let high_kept = self.high_end.is_same(&next.high_end);
        let low_kept = self.low_end.is_same(&next.low_end);

        (high_advanced && low_advanced) || (high_advanced && low_kept) || (low_advanced && high_kept)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HP {}, LP {}, start at index HP {}, LP {}, end at HP {}, LP {}",
            self.high_type,
            self.low_type,
            self.high_start.bar_index,
            self.low_start.bar_index,
            self.high_end.bar_index,
            self.low_end.bar_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::{PeakId, PeakKind};
    use chrono::TimeZone;

    fn peak(id: usize, from_high: bool, bar_index: usize, price: f64) -> Peak {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Peak {
            id: PeakId(id),
            from_high_price: from_high,
            kind: PeakKind::Maximum,
            timestamp: base + Duration::days(bar_index as i64),
            bar_index,
            price,
            source_period: 2,
            intensity: 1.0,
        }
    }

    #[test]
    fn test_classify_threshold_boundary() {
        assert_eq!(TrendType::classify(0.5, 0.5), TrendType::Consolidation);
        assert_eq!(TrendType::classify(-0.5, 0.5), TrendType::Consolidation);
        assert_eq!(TrendType::classify(0.5001, 0.5), TrendType::Uptrend);
        assert_eq!(TrendType::classify(-0.5001, 0.5), TrendType::Downtrend);
    }

    #[test]
    fn test_slope() {
        let start = peak(0, true, 2, 10.0);
        let end = peak(1, true, 6, 18.0);
        assert_eq!(slope(&start, &end), 2.0);
    }

    #[test]
    fn test_core_is_overlap() {
        let trend = Trend::new(
            peak(0, true, 0, 10.0),
            peak(1, false, 2, 8.0),
            peak(2, true, 7, 14.0),
            peak(3, false, 9, 12.0),
            0.1,
        )
        .unwrap();

        assert_eq!(trend.core.start_index, 2);
        assert_eq!(trend.core.end_index, 7);
        assert_eq!(trend.core.length_in_bars, 5);
        assert!(trend.core.contains(7));
        assert!(!trend.core.contains(8));
    }

    #[test]
    fn test_invalid_window_rejected() {
        // 저가 시작이 고가 끝 이후
        let result = Trend::new(
            peak(0, true, 0, 10.0),
            peak(1, false, 5, 8.0),
            peak(2, true, 4, 14.0),
            peak(3, false, 9, 12.0),
            0.1,
        );
        assert!(matches!(result, Err(LandscapeError::InvalidWindow(_))));
    }

    #[test]
    fn test_mixed_source_period_rejected() {
        let mut other = peak(3, false, 9, 12.0);
        other.source_period = 5;
        let result = Trend::new(
            peak(0, true, 0, 10.0),
            peak(1, false, 1, 8.0),
            peak(2, true, 7, 14.0),
            other,
            0.1,
        );
        assert!(matches!(result, Err(LandscapeError::InvalidWindow(_))));
    }

    #[test]
    fn test_forms_support_line() {
        let up = Trend::new(
            peak(0, true, 0, 10.0),
            peak(1, false, 0, 8.0),
            peak(2, true, 5, 15.0),
            peak(3, false, 6, 13.0),
            0.1,
        )
        .unwrap();
        assert!(up.forms_support_line());
        assert_eq!(up.directional_end_peak().unwrap().bar_index, 5);

        let mixed = Trend::new(
            peak(0, true, 0, 10.0),
            peak(1, false, 0, 8.0),
            peak(2, true, 5, 15.0),
            peak(3, false, 6, 5.0),
            0.1,
        )
        .unwrap();
        assert!(!mixed.forms_support_line());
        assert!(mixed.directional_end_peak().is_none());
    }

    #[test]
    fn test_continuity_uses_identity() {
        let hs = peak(0, true, 0, 10.0);
        let ls = peak(1, false, 0, 8.0);
        let he = peak(2, true, 4, 12.0);
        let le = peak(3, false, 6, 9.0);
        let he2 = peak(4, true, 8, 13.0);

        let first = Trend::new(hs, ls, he, le, 0.1).unwrap();
        let second = Trend::new(he, ls, he2, le, 0.1).unwrap();
        assert!(first.is_continued_by(&second));

        // 값은 같지만 다른 피크
        let mut he_copy = he;
        he_copy.id = PeakId(99);
        let detached = Trend::new(he_copy, ls, he2, le, 0.1).unwrap();
        assert!(!first.is_continued_by(&detached));
    }

    #[test]
    fn test_spans_weekend() {
        let hs = peak(0, true, 0, 10.0);
        let ls = peak(1, false, 1, 8.0);
        let he = peak(2, true, 3, 12.0);
        let le = peak(3, false, 4, 9.0);
        // 2024-01-02(화) ~ 2024-01-04(목)
        let short = Trend::new(hs, ls, he, le, 0.1).unwrap();
        assert!(!short.core.spans_weekend());

        let he_long = peak(4, true, 9, 12.0);
        let le_long = peak(5, false, 10, 9.0);
        let long = Trend::new(hs, ls, he_long, le_long, 0.1).unwrap();
        assert!(long.core.spans_weekend());
    }
}
