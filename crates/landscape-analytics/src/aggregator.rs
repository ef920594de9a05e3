//! 지지선 병합 (Support Aggregator).
//!
//! 후보를 시작 바 순서대로 처리하며, 병합 거리 안의 기존 선 중 후보 시점에서
//! 가장 강한 선에 후보를 흡수시킵니다. 처리 순서에 따라 결과가 달라지는
//! 탐욕적 방식이며 전역 최적 군집화가 아닙니다.

use tracing::debug;

use landscape_core::{LandscapeError, LandscapeResult};

use crate::lines::SupportLine;

/// 지지선 병합기.
#[derive(Debug, Clone, Copy)]
pub struct SupportAggregator {
    merge_distance: f64,
}

impl SupportAggregator {
    /// # 에러
    ///
    /// 병합 거리가 음수이거나 유한하지 않으면 `InvalidParameter`.
    pub fn new(merge_distance: f64) -> LandscapeResult<Self> {
        if !merge_distance.is_finite() || merge_distance < 0.0 {
            return Err(LandscapeError::InvalidParameter(format!(
                "merge_distance는 0 이상의 유한한 값이어야 합니다: {}",
                merge_distance
            )));
        }
        Ok(Self { merge_distance })
    }

    pub fn merge_distance(&self) -> f64 {
        self.merge_distance
    }

    /// 후보 지지선을 병합합니다.
    ///
    /// 후보는 `start_index` 기준으로 안정 정렬한 뒤 처리합니다.
    pub fn aggregate(&self, mut candidates: Vec<SupportLine>) -> LandscapeResult<Vec<SupportLine>> {
        candidates.sort_by_key(|line| line.start_index);
        let candidate_count = candidates.len();

        let mut accepted: Vec<SupportLine> = Vec::new();
        for candidate in candidates {
            match self.merge_target(&accepted, &candidate) {
                Some(index) => accepted[index].merge(&candidate)?,
                None => accepted.push(candidate),
            }
        }

        debug!(
            candidates = candidate_count,
            support_lines = accepted.len(),
            "Support lines aggregated"
        );

        Ok(accepted)
    }

    /// 거리 안에 있는 선 중 후보 시작 시점 강도가 가장 큰 선 (동률이면 먼저 받아들인 선).
    fn merge_target(&self, accepted: &[SupportLine], candidate: &SupportLine) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, line) in accepted.iter().enumerate() {
            if (line.price - candidate.price).abs() >= self.merge_distance {
                continue;
            }
            let strength = line.intensity_at(candidate.start_index);
            if best.map_or(true, |(_, best_strength)| strength > best_strength) {
                best = Some((index, strength));
            }
        }

        best.map(|(index, _)| index)
    }
}

/// 지정한 병합 거리로 지지선을 병합합니다.
pub fn aggregate(candidates: Vec<SupportLine>, merge_distance: f64) -> LandscapeResult<Vec<SupportLine>> {
    SupportAggregator::new(merge_distance)?.aggregate(candidates)
}
