//! 도메인 모델.
//!
//! - `bar` - 캔들과 바 시계열 접근 인터페이스
//! - `sink` - 선/아이콘을 그리는 시각화 출력 인터페이스

pub mod bar;
pub mod sink;

pub use bar::{BarSource, Candle};
pub use sink::{Color, DrawCommand, IconShape, RecordingSink, VisualizationSink};
