//! 랜드스케이프 CLI 도구.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 캔들 CSV 읽기
//! - 랜드스케이프 계산 및 출력 (JSON, 요약, 그리기 명령)
//! - 피크 목록 출력

pub mod commands;

pub use commands::*;
