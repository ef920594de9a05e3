//! 환경 변수 기반 로깅 초기화 테스트.
//!
//! 전역 subscriber와 환경 변수를 건드리므로 별도 바이너리에서 한 테스트로 실행합니다.

use landscape_core::{init_logging_from_env, LogConfig, LogFormat};

#[test]
fn test_logging_from_env() {
    std::env::set_var("RUST_LOG", "landscape_analytics=debug");
    std::env::set_var("LOG_FORMAT", "json");

    let config = LogConfig::from_env();
    assert_eq!(config.level, "landscape_analytics=debug");
    assert_eq!(config.format, LogFormat::Json);

    std::env::set_var("LOG_FORMAT", "yaml");
    assert_eq!(LogConfig::from_env().format, LogFormat::Pretty);

    assert!(init_logging_from_env().is_ok());
    // 전역 subscriber는 한 번만 설치됨
    assert!(init_logging_from_env().is_err());

    std::env::remove_var("RUST_LOG");
    std::env::remove_var("LOG_FORMAT");
    assert_eq!(LogConfig::from_env().level, "info");
}
