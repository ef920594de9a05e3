//! 캔들 데이터와 바 시계열 접근.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 인덱스로 임의 접근 가능한 바 시계열.
///
/// 인덱스는 0부터 시작하며 시간 순으로 정렬되어 있어야 합니다.
/// 재계산 한 번 동안에는 변하지 않는 스냅샷으로 취급합니다.
pub trait BarSource {
    /// 바 개수
    fn count(&self) -> usize;

    /// `index` 바의 고가
    fn high_price(&self, index: usize) -> f64;

    /// `index` 바의 저가
    fn low_price(&self, index: usize) -> f64;

    /// `index` 바의 시작 시간
    fn open_time(&self, index: usize) -> DateTime<Utc>;

    /// 바가 하나도 없는지 확인합니다.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 고가와 저가가 뒤바뀌지 않았는지 확인합니다.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
    }
}

// Decimal → f64 변환은 범위를 벗어나지 않는 한 실패하지 않음
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

impl BarSource for [Candle] {
    fn count(&self) -> usize {
        self.len()
    }

    fn high_price(&self, index: usize) -> f64 {
        to_f64(self[index].high)
    }

    fn low_price(&self, index: usize) -> f64 {
        to_f64(self[index].low)
    }

    fn open_time(&self, index: usize) -> DateTime<Utc> {
        self[index].open_time
    }
}

impl BarSource for Vec<Candle> {
    fn count(&self) -> usize {
        self.as_slice().count()
    }

    fn high_price(&self, index: usize) -> f64 {
        self.as_slice().high_price(index)
    }

    fn low_price(&self, index: usize) -> f64 {
        self.as_slice().low_price(index)
    }

    fn open_time(&self, index: usize) -> DateTime<Utc> {
        self.as_slice().open_time(index)
    }
}
