//! 강도 및 색상 모델.
//!
//! 강도는 0 이상의 값으로, 선이 시작된 뒤 바마다 지수적으로 감쇠합니다.
//! 로지스틱 곡선은 코어 길이를 강도로, 강도를 색상 이동량으로 바꿉니다.

use serde::{Deserialize, Serialize};

use landscape_core::{Color, SupportConfig, TrendConfig};

/// 로지스틱 곡선 `maximum / (1 + exp(-steepness * (x - center)))`.
pub fn logistic(x: f64, maximum: f64, center: f64, steepness: f64) -> f64 {
    maximum / (1.0 + (-steepness * (x - center)).exp())
}

/// 기준 바에서 `elapsed_bars`만큼 지난 시점의 강도.
pub fn decayed(intensity: f64, decay: f64, elapsed_bars: usize) -> f64 {
    intensity * (-decay * elapsed_bars as f64).exp()
}

/// `origin`에서 시작한 선의 `bar_index` 시점 강도. 시작 전이면 0.
pub fn intensity_since(intensity: f64, decay: f64, origin: usize, bar_index: usize) -> f64 {
    if bar_index < origin {
        0.0
    } else {
        decayed(intensity, decay, bar_index - origin)
    }
}

/// 추세 코어 길이 → 강도 곡선.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthIntensity {
    pub maximum: f64,
    pub center: f64,
    pub steepness: f64,
}

impl LengthIntensity {
    pub fn from_config(config: &TrendConfig) -> Self {
        Self {
            maximum: config.length_to_intensity_maximum,
            center: config.length_to_intensity_center,
            steepness: config.length_to_intensity_steepness,
        }
    }

    /// 코어 길이(바 개수)에 대한 강도.
    pub fn intensity_for(&self, length_in_bars: usize) -> f64 {
        logistic(length_in_bars as f64, self.maximum, self.center, self.steepness)
    }
}

impl Default for LengthIntensity {
    fn default() -> Self {
        Self::from_config(&TrendConfig::default())
    }
}

/// 강도 → 색상 모델.
///
/// 약한 선은 파랑, 강한 선은 빨강 쪽으로 이동하며 알파는 고정입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorModel {
    pub max_shift: f64,
    pub center: f64,
    pub steepness: f64,
    pub alpha: u8,
}

impl ColorModel {
    pub fn from_config(config: &SupportConfig) -> Self {
        Self {
            max_shift: config.intensity_to_color_maximum,
            center: config.intensity_to_color_center,
            steepness: config.intensity_to_color_steepness,
            alpha: config.color_alpha,
        }
    }

    /// 강도에 해당하는 색상.
    pub fn color_for(&self, intensity: f64) -> Color {
        let shift = logistic(intensity, self.max_shift, self.center, self.steepness)
            .round()
            .clamp(0.0, 255.0) as u8;
        Color::rgba(shift, 0, 255 - shift, self.alpha)
    }
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::from_config(&SupportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_center_is_half() {
        assert!((logistic(50.0, 100.0, 50.0, 0.05) - 50.0).abs() < 1e-12);
        assert!(logistic(1_000.0, 100.0, 50.0, 0.05) > 99.99);
        assert!(logistic(-1_000.0, 100.0, 50.0, 0.05) < 0.01);
    }

    #[test]
    fn test_decay_before_origin_is_zero() {
        assert_eq!(intensity_since(80.0, 0.002, 10, 9), 0.0);
        assert_eq!(intensity_since(80.0, 0.002, 10, 10), 80.0);

        let later = intensity_since(80.0, 0.002, 10, 110);
        assert!((later - 80.0 * (-0.2f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_length_intensity_grows_with_length() {
        let curve = LengthIntensity::default();
        assert!(curve.intensity_for(10) < curve.intensity_for(50));
        assert!(curve.intensity_for(50) < curve.intensity_for(200));
        assert!((curve.intensity_for(50) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_shifts_from_blue_to_red() {
        let model = ColorModel::default();

        let weak = model.color_for(-200.0);
        assert_eq!((weak.r, weak.g, weak.b), (0, 0, 255));

        let strong = model.color_for(500.0);
        assert_eq!((strong.r, strong.g, strong.b), (255, 0, 0));
        assert_eq!(strong.a, 200);

        let middle = model.color_for(40.0);
        assert_eq!(middle.r as u16 + middle.b as u16, 255);
    }
}
