//! 저항선 (추세선, 지지선).
//!
//! 두 종류의 선은 `ResistanceLine` 열거형으로 묶여 같은 기능
//! (`intensity_at`, `visualize`)을 제공합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use landscape_core::{
    Color, IconShape, LandscapeError, LandscapeResult, SupportConfig, VisualizationSink,
    INTENSITY_CEILING,
};

use crate::intensity::{intensity_since, ColorModel};
use crate::trend::{TrendCore, TrendType};

/// 회귀선을 계산한 가격 계열.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSide {
    High,
    Low,
}

/// 추세 코어 위의 회귀선. 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendLine {
    pub side: LineSide,
    pub slope: f64,
    pub intercept: f64,
    pub core: TrendCore,
    pub intensity: f64,
    pub decay: f64,
}

impl TrendLine {
    /// `bar_index` 위치의 선 가격.
    pub fn price_at(&self, bar_index: usize) -> f64 {
        self.slope * bar_index as f64 + self.intercept
    }

    /// 코어가 끝난 뒤부터 감쇠하는 강도.
    pub fn intensity_at(&self, bar_index: usize) -> f64 {
        intensity_since(self.intensity, self.decay, self.core.end_index, bar_index)
    }

    pub fn color(&self) -> Color {
        match self.side {
            LineSide::High => Color::GREEN,
            LineSide::Low => Color::BLUE,
        }
    }

    /// 코어 시작부터 끝까지 선분을 그립니다.
    pub fn visualize(&self, sink: &mut dyn VisualizationSink) {
        let side = match self.side {
            LineSide::High => "high",
            LineSide::Low => "low",
        };
        let id = format!("trend_{}_{}", side, Uuid::new_v4());
        sink.draw_trend_line(
            &id,
            self.core.start_time,
            self.price_at(self.core.start_index),
            self.core.end_time,
            self.price_at(self.core.end_index),
            self.color(),
        );
    }
}

/// 수평 지지선.
///
/// 병합으로만 변경되며, 병합될 때마다 이전 시작 인덱스가 `joint_indices`에 남습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportLine {
    pub price: f64,
    pub start_index: usize,
    pub start_time: DateTime<Utc>,
    pub intensity: f64,
    pub joint_indices: Vec<usize>,
    /// 상승 추세(고가 끝)에서 왔는지 하락 추세(저가 끝)에서 왔는지
    pub direction: TrendType,
    pub decay: f64,
}

impl SupportLine {
    pub fn new(
        price: f64,
        start_index: usize,
        start_time: DateTime<Utc>,
        intensity: f64,
        direction: TrendType,
        decay: f64,
    ) -> Self {
        Self {
            price,
            start_index,
            start_time,
            intensity,
            joint_indices: Vec::new(),
            direction,
            decay,
        }
    }

    /// 시작 바부터 감쇠하는 강도.
    pub fn intensity_at(&self, bar_index: usize) -> f64 {
        intensity_since(self.intensity, self.decay, self.start_index, bar_index)
    }

    /// 병합된 횟수.
    pub fn merge_count(&self) -> usize {
        self.joint_indices.len()
    }

    /// 나중에 시작한 `candidate`를 이 선에 병합합니다.
    ///
    /// 가격은 강도 가중 평균, 강도는 후보 시점까지 감쇠한 기존 강도와
    /// 후보 강도를 100 상한으로 포화 결합합니다.
    ///
    /// # 에러
    ///
    /// 후보가 이 선보다 먼저 시작하면 `OrderViolation`.
    pub fn merge(&mut self, candidate: &SupportLine) -> LandscapeResult<()> {
        if candidate.start_index < self.start_index {
            return Err(LandscapeError::OrderViolation {
                candidate_start: candidate.start_index,
                target_start: self.start_index,
            });
        }

        let weight = self.intensity + candidate.intensity;
        if weight > 0.0 {
            self.price =
                (self.price * self.intensity + candidate.price * candidate.intensity) / weight;
        }

        let carried = self.intensity_at(candidate.start_index);
        self.intensity = carried
            + candidate.intensity / INTENSITY_CEILING * (INTENSITY_CEILING - carried);

        self.joint_indices.push(self.start_index);
        self.start_index = candidate.start_index;
        self.start_time = candidate.start_time;

        Ok(())
    }

    /// 강도 색상의 수평선과 시작 지점의 마름모 아이콘을 그립니다.
    pub fn visualize(&self, sink: &mut dyn VisualizationSink, style: &LineStyle) {
        let id = format!("support_{}", Uuid::new_v4());
        let color = style.colors.color_for(self.intensity);
        sink.draw_horizontal_line(&id, self.price, color, style.thickness);
        sink.draw_icon(
            &format!("{}_start", id),
            IconShape::Diamond,
            self.start_time,
            self.price,
            color,
        );
    }
}

/// 지지선 그리기 스타일.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub colors: ColorModel,
    pub thickness: u32,
}

impl LineStyle {
    pub fn from_config(config: &SupportConfig) -> Self {
        Self {
            colors: ColorModel::from_config(config),
            thickness: config.line_thickness,
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::from_config(&SupportConfig::default())
    }
}

/// 저항선.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResistanceLine {
    Trend(TrendLine),
    Support(SupportLine),
}

impl ResistanceLine {
    pub fn intensity_at(&self, bar_index: usize) -> f64 {
        match self {
            ResistanceLine::Trend(line) => line.intensity_at(bar_index),
            ResistanceLine::Support(line) => line.intensity_at(bar_index),
        }
    }

    pub fn visualize(&self, sink: &mut dyn VisualizationSink, style: &LineStyle) {
        match self {
            ResistanceLine::Trend(line) => line.visualize(sink),
            ResistanceLine::Support(line) => line.visualize(sink, style),
        }
    }
}

impl From<TrendLine> for ResistanceLine {
    fn from(line: TrendLine) -> Self {
        ResistanceLine::Trend(line)
    }
}

impl From<SupportLine> for ResistanceLine {
    fn from(line: SupportLine) -> Self {
        ResistanceLine::Support(line)
    }
}
