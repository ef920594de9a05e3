//! 지지/저항 랜드스케이프 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 피크 탐색 (고가/저가 국소 극값)
//! - 추세 분할 및 분류 (reading frame sweep)
//! - 추세 코어 회귀선과 지지선 후보
//! - 강도 감쇠를 고려한 지지선 병합
//! - 강도/색상 모델
//!
//! # Re-exports
//!
//! - [`landscape`]: 전체 파이프라인 (LandscapeAnalyzer, Landscape)
//! - [`lines`]: 저항선 타입 (TrendLine, SupportLine, ResistanceLine)

pub mod aggregator;
pub mod fitter;
pub mod intensity;
pub mod landscape;
pub mod lines;
pub mod peaks;
pub mod segmenter;
pub mod trend;

pub use aggregator::{aggregate, SupportAggregator};
pub use fitter::{least_squares, FittedLines, LineFitter};
pub use intensity::{decayed, logistic, ColorModel, LengthIntensity};
pub use landscape::{Landscape, LandscapeAnalyzer};
pub use lines::{LineSide, LineStyle, ResistanceLine, SupportLine, TrendLine};
pub use peaks::{find_peaks, Peak, PeakDetector, PeakId, PeakKind, PeakSet};
pub use segmenter::{find_trends, TrendSegmenter};
pub use trend::{slope, Trend, TrendCore, TrendType};
