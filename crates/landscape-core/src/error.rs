//! 랜드스케이프 계산의 에러 타입.
//!
//! 모든 실패는 순수 계산에서의 결정적인 전제 조건 위반입니다.
//! 재시도로 해결되는 에러는 없으며, 에러가 나면 부분 결과 없이 전체 재계산이 실패합니다.

use thiserror::Error;

/// 랜드스케이프 계산 에러.
#[derive(Debug, Error)]
pub enum LandscapeError {
    /// 추세 탐색에 필요한 피크가 부족함 (고가/저가 각각 2개 이상 필요)
    #[error("전제 조건 위반: {0}")]
    Precondition(String),

    /// 네 피크가 유효한 추세 윈도우를 만들지 못함
    #[error("잘못된 추세 윈도우: {0}")]
    InvalidWindow(String),

    /// 지지선을 만들 수 없는 추세에서 지지선을 요청함
    #[error("잘못된 작업: {0}")]
    InvalidOperation(String),

    /// 늦게 시작한 선에 먼저 시작한 선을 병합하려 함
    #[error("병합 순서 위반: 후보 시작 인덱스 {candidate_start} < 대상 시작 인덱스 {target_start}")]
    OrderViolation {
        candidate_start: usize,
        target_start: usize,
    },

    /// 데이터 부족
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    Calculation(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 랜드스케이프 작업을 위한 Result 타입.
pub type LandscapeResult<T> = Result<T, LandscapeError>;

impl LandscapeError {
    /// 호출 순서나 분할 로직의 버그를 의미하는 에러인지 확인합니다.
    ///
    /// 입력 데이터가 아니라 코드가 잘못된 경우이므로 복구하지 않습니다.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            LandscapeError::InvalidWindow(_)
                | LandscapeError::InvalidOperation(_)
                | LandscapeError::OrderViolation { .. }
        )
    }
}

impl From<serde_json::Error> for LandscapeError {
    fn from(err: serde_json::Error) -> Self {
        LandscapeError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for LandscapeError {
    fn from(err: config::ConfigError) -> Self {
        LandscapeError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_programming_errors() {
        let window = LandscapeError::InvalidWindow("high start after end".to_string());
        assert!(window.is_programming_error());

        let order = LandscapeError::OrderViolation {
            candidate_start: 3,
            target_start: 10,
        };
        assert!(order.is_programming_error());

        let precondition = LandscapeError::Precondition("one high peak".to_string());
        assert!(!precondition.is_programming_error());
    }

    #[test]
    fn test_order_violation_message() {
        let err = LandscapeError::OrderViolation {
            candidate_start: 3,
            target_start: 10,
        };
        let message = err.to_string();
        assert!(message.contains('3'));
        assert!(message.contains("10"));
    }
}
