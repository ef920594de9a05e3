//! 시각화 출력 인터페이스.
//!
//! 실제 차트 렌더링은 호스트 책임입니다. 분석 결과는 이 trait을 통해
//! 그리기 명령만 전달합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RGBA 색상.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// 불투명 색상을 생성합니다.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 알파 값을 포함한 색상을 생성합니다.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#RRGGBBAA` 형식 문자열.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// 아이콘 모양.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconShape {
    Circle,
    Diamond,
}

/// 차트에 선과 아이콘을 그리는 출력 대상.
///
/// 같은 `id`로 다시 그리면 기존 객체를 대체하는 것으로 취급합니다.
pub trait VisualizationSink {
    /// 가격 `price`에 수평선을 그립니다.
    fn draw_horizontal_line(&mut self, id: &str, price: f64, color: Color, thickness: u32);

    /// (x1, y1) → (x2, y2) 선분을 그립니다.
    fn draw_trend_line(
        &mut self,
        id: &str,
        x1: DateTime<Utc>,
        y1: f64,
        x2: DateTime<Utc>,
        y2: f64,
        color: Color,
    );

    /// (x, y)에 아이콘을 그립니다.
    fn draw_icon(&mut self, id: &str, shape: IconShape, x: DateTime<Utc>, y: f64, color: Color);
}

/// 기록된 그리기 명령.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    HorizontalLine {
        id: String,
        price: f64,
        color: Color,
        thickness: u32,
    },
    TrendLine {
        id: String,
        x1: DateTime<Utc>,
        y1: f64,
        x2: DateTime<Utc>,
        y2: f64,
        color: Color,
    },
    Icon {
        id: String,
        shape: IconShape,
        x: DateTime<Utc>,
        y: f64,
        color: Color,
    },
}

impl DrawCommand {
    /// 객체 ID
    pub fn id(&self) -> &str {
        match self {
            DrawCommand::HorizontalLine { id, .. }
            | DrawCommand::TrendLine { id, .. }
            | DrawCommand::Icon { id, .. } => id,
        }
    }
}

/// 그리기 명령을 메모리에 기록하는 출력 대상.
///
/// 테스트와 CLI의 JSON 출력에서 사용합니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSink {
    commands: Vec<DrawCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 명령 목록
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// 기록된 명령을 꺼냅니다.
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// 수평선 개수
    pub fn horizontal_line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::HorizontalLine { .. }))
            .count()
    }

    /// 추세선 개수
    pub fn trend_line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::TrendLine { .. }))
            .count()
    }

    /// 아이콘 개수
    pub fn icon_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Icon { .. }))
            .count()
    }
}

impl VisualizationSink for RecordingSink {
    fn draw_horizontal_line(&mut self, id: &str, price: f64, color: Color, thickness: u32) {
        self.commands.push(DrawCommand::HorizontalLine {
            id: id.to_string(),
            price,
            color,
            thickness,
        });
    }

    fn draw_trend_line(
        &mut self,
        id: &str,
        x1: DateTime<Utc>,
        y1: f64,
        x2: DateTime<Utc>,
        y2: f64,
        color: Color,
    ) {
        self.commands.push(DrawCommand::TrendLine {
            id: id.to_string(),
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    fn draw_icon(&mut self, id: &str, shape: IconShape, x: DateTime<Utc>, y: f64, color: Color) {
        self.commands.push(DrawCommand::Icon {
            id: id.to_string(),
            shape,
            x,
            y,
            color,
        });
    }
}
