//! 추세선 회귀와 지지선 후보 생성 (Line Fitter).

use tracing::debug;

use landscape_core::{BarSource, LandscapeConfig, LandscapeError, LandscapeResult};

use crate::intensity::LengthIntensity;
use crate::lines::{LineSide, SupportLine, TrendLine};
use crate::trend::Trend;

/// 최소제곱 직선 `y = slope * x + intercept`.
///
/// 평균을 뺀 값으로 계산해 큰 인덱스에서도 정밀도를 유지합니다.
///
/// # 에러
///
/// 점이 2개 미만이거나 x 분산이 0이면 `Calculation`.
pub fn least_squares(xs: &[f64], ys: &[f64]) -> LandscapeResult<(f64, f64)> {
    if xs.len() != ys.len() {
        return Err(LandscapeError::Calculation(format!(
            "x와 y의 길이가 다릅니다: {} != {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(LandscapeError::Calculation(format!(
            "회귀에는 2개 이상의 점이 필요합니다: {}",
            xs.len()
        )));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        sum_xy += dx * (y - mean_y);
        sum_xx += dx * dx;
    }

    if sum_xx == 0.0 {
        return Err(LandscapeError::Calculation(
            "x 값의 분산이 0입니다".to_string(),
        ));
    }

    let slope = sum_xy / sum_xx;
    Ok((slope, mean_y - slope * mean_x))
}

/// 발견된 선 목록.
#[derive(Debug, Clone, Default)]
pub struct FittedLines {
    pub trend_lines: Vec<TrendLine>,
    /// 병합 전 지지선 후보 (추세 순서)
    pub support_candidates: Vec<SupportLine>,
}

/// 추세마다 회귀선과 지지선 후보를 계산합니다.
pub struct LineFitter<'a, B: BarSource + ?Sized> {
    bars: &'a B,
    length_intensity: LengthIntensity,
    trend_decay: f64,
    support_decay: f64,
}

impl<'a, B: BarSource + ?Sized> LineFitter<'a, B> {
    pub fn new(bars: &'a B, config: &LandscapeConfig) -> Self {
        Self {
            bars,
            length_intensity: LengthIntensity::from_config(&config.trends),
            trend_decay: config.trends.intensity_decay,
            support_decay: config.support.intensity_decay,
        }
    }

    /// 코어 구간 고가의 회귀선.
    pub fn high_trend_line(&self, trend: &Trend) -> LandscapeResult<TrendLine> {
        self.trend_line(trend, LineSide::High)
    }

    /// 코어 구간 저가의 회귀선.
    pub fn low_trend_line(&self, trend: &Trend) -> LandscapeResult<TrendLine> {
        self.trend_line(trend, LineSide::Low)
    }

    fn trend_line(&self, trend: &Trend, side: LineSide) -> LandscapeResult<TrendLine> {
        let core = trend.core;
        if core.end_index >= self.bars.count() {
            return Err(LandscapeError::InvalidParameter(format!(
                "추세 코어 끝 {}가 바 개수 {}를 벗어납니다",
                core.end_index,
                self.bars.count()
            )));
        }

        let indices = core.start_index..=core.end_index;
        let xs: Vec<f64> = indices.clone().map(|i| i as f64).collect();
        let ys: Vec<f64> = match side {
            LineSide::High => indices.map(|i| self.bars.high_price(i)).collect(),
            LineSide::Low => indices.map(|i| self.bars.low_price(i)).collect(),
        };

        let (slope, intercept) = least_squares(&xs, &ys)?;

        Ok(TrendLine {
            side,
            slope,
            intercept,
            core,
            intensity: self.length_intensity.intensity_for(core.length_in_bars),
            decay: self.trend_decay,
        })
    }

    /// 방향이 일치하는 추세의 끝 피크에서 지지선 후보를 만듭니다.
    ///
    /// # 에러
    ///
    /// 고가와 저가 방향이 일치하지 않으면 `InvalidOperation`.
    pub fn support_line(&self, trend: &Trend) -> LandscapeResult<SupportLine> {
        let peak = trend.directional_end_peak().ok_or_else(|| {
            LandscapeError::InvalidOperation(format!(
                "추세 {}는 지지선을 만들 수 없습니다",
                trend
            ))
        })?;

        Ok(SupportLine::new(
            peak.price,
            peak.bar_index,
            peak.timestamp,
            self.length_intensity.intensity_for(trend.core.length_in_bars),
            trend.high_type,
            self.support_decay,
        ))
    }

    /// 모든 추세에 대해 선을 계산합니다.
    pub fn find_lines(&self, trends: &[Trend]) -> LandscapeResult<FittedLines> {
        let mut lines = FittedLines::default();

        for trend in trends {
            lines.trend_lines.push(self.high_trend_line(trend)?);
            lines.trend_lines.push(self.low_trend_line(trend)?);
            if trend.forms_support_line() {
                lines.support_candidates.push(self.support_line(trend)?);
            }
        }

        debug!(
            trend_lines = lines.trend_lines.len(),
            support_candidates = lines.support_candidates.len(),
            "Lines fitted"
        );

        Ok(lines)
    }
}
