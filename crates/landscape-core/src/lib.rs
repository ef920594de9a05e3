//! # Landscape Core
//!
//! 지지/저항 랜드스케이프 계산에 공통으로 쓰이는 도메인 타입을 제공합니다.
//!
//! - 캔들 및 바 시계열 접근 (`BarSource`)
//! - 시각화 출력 인터페이스 (`VisualizationSink`)
//! - 에러 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
