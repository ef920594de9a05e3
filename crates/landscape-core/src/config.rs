//! 설정 관리.
//!
//! 랜드스케이프 계산 파라미터와 표시 옵션을 정의합니다.
//! 코어 계산은 설정을 직접 읽지 않으며, 호스트가 로드한 값을 전달합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LandscapeError, LandscapeResult};

/// 선 강도의 포화 상한. 지지선 병합은 이 값을 넘지 않는 강도를 가정합니다.
pub const INTENSITY_CEILING: f64 = 100.0;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LandscapeConfig {
    /// 피크 탐색 설정
    #[serde(default)]
    pub peaks: PeakConfig,
    /// 추세 분류 및 강도 설정
    #[serde(default)]
    pub trends: TrendConfig,
    /// 지지선 병합 및 색상 설정
    #[serde(default)]
    pub support: SupportConfig,
    /// 출력할 선 종류
    #[serde(default)]
    pub display: DisplayConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 피크 탐색 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PeakConfig {
    /// 피크 앞뒤로 확인할 바 개수 (1 이상)
    pub half_period: usize,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self { half_period: 10 }
    }
}

/// 추세 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendConfig {
    /// 상승/하락 판정 기울기 임계값 (바당 가격 변화)
    pub slope_threshold: f64,
    /// 바당 강도 감쇠율
    pub intensity_decay: f64,
    /// 코어 길이 → 강도 로지스틱 곡선의 최댓값
    pub length_to_intensity_maximum: f64,
    /// 로지스틱 곡선의 중심 (바 개수)
    pub length_to_intensity_center: f64,
    /// 로지스틱 곡선의 기울기
    pub length_to_intensity_steepness: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            slope_threshold: 10.0 / 50_000.0,
            intensity_decay: 0.002,
            length_to_intensity_maximum: 100.0,
            length_to_intensity_center: 50.0,
            length_to_intensity_steepness: 0.05,
        }
    }
}

/// 지지선 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupportConfig {
    /// 병합 거리 (가격 단위)
    pub merge_distance: f64,
    /// 바당 강도 감쇠율
    pub intensity_decay: f64,
    /// 강도 → 색상 로지스틱 곡선의 최대 이동량
    pub intensity_to_color_maximum: f64,
    /// 로지스틱 곡선의 중심 (강도)
    pub intensity_to_color_center: f64,
    /// 로지스틱 곡선의 기울기
    pub intensity_to_color_steepness: f64,
    /// 고정 알파 값
    pub color_alpha: u8,
    /// 수평선 두께
    pub line_thickness: u32,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            merge_distance: 0.001,
            intensity_decay: 0.002,
            intensity_to_color_maximum: 255.0,
            intensity_to_color_center: 40.0,
            intensity_to_color_steepness: 0.05,
            color_alpha: 200,
            line_thickness: 1,
        }
    }
}

/// 출력/그리기 대상 선택.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 고가 회귀선
    pub high_trend_lines: bool,
    /// 저가 회귀선
    pub low_trend_lines: bool,
    /// 병합된 지지선
    pub support_lines: bool,
    /// 피크 아이콘
    pub peaks: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            high_trend_lines: false,
            low_trend_lines: false,
            support_lines: true,
            peaks: false,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LandscapeConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `LANDSCAPE__PEAKS__HALF_PERIOD=5` 형식으로 오버라이드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> LandscapeResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("LANDSCAPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> LandscapeResult<Self> {
        Self::load("config/landscape.toml")
    }

    /// 값 범위를 검증합니다.
    pub fn validate(&self) -> LandscapeResult<()> {
        if self.peaks.half_period == 0 {
            return Err(LandscapeError::Config(
                "peaks.half_period는 1 이상이어야 합니다".to_string(),
            ));
        }

        if !self.trends.slope_threshold.is_finite() || self.trends.slope_threshold < 0.0 {
            return Err(LandscapeError::Config(format!(
                "trends.slope_threshold는 0 이상의 유한한 값이어야 합니다: {}",
                self.trends.slope_threshold
            )));
        }

        if !self.support.merge_distance.is_finite() || self.support.merge_distance < 0.0 {
            return Err(LandscapeError::Config(format!(
                "support.merge_distance는 0 이상의 유한한 값이어야 합니다: {}",
                self.support.merge_distance
            )));
        }

        for (name, decay) in [
            ("trends.intensity_decay", self.trends.intensity_decay),
            ("support.intensity_decay", self.support.intensity_decay),
        ] {
            if !decay.is_finite() || decay < 0.0 {
                return Err(LandscapeError::Config(format!(
                    "{}는 0 이상의 유한한 값이어야 합니다: {}",
                    name, decay
                )));
            }
        }

        for (name, value) in [
            ("trends.length_to_intensity_center", self.trends.length_to_intensity_center),
            ("trends.length_to_intensity_steepness", self.trends.length_to_intensity_steepness),
            ("support.intensity_to_color_maximum", self.support.intensity_to_color_maximum),
            ("support.intensity_to_color_center", self.support.intensity_to_color_center),
            ("support.intensity_to_color_steepness", self.support.intensity_to_color_steepness),
        ] {
            if !value.is_finite() {
                return Err(LandscapeError::Config(format!(
                    "{}는 유한한 값이어야 합니다: {}",
                    name, value
                )));
            }
        }

        let maximum = self.trends.length_to_intensity_maximum;
        if !maximum.is_finite() || maximum <= 0.0 || maximum > INTENSITY_CEILING {
            return Err(LandscapeError::Config(format!(
                "trends.length_to_intensity_maximum은 0 초과 {} 이하여야 합니다: {}",
                INTENSITY_CEILING, maximum
            )));
        }

        Ok(())
    }
}
