//! 한 번의 설계 계산 전체를 담는 기록 컨테이너.
//!
//! 입력, 산출, 견적을 생성 시각/식별자와 함께 묶어 보고서·저장 등
//! 외부 표현 계층으로 넘기는 유일한 단위다.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::costing::CostResult;
use crate::sizing::{SizingInput, SizingResult};

/// 설계 계산 기록.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// 생성된 프로젝트 식별자 (예: FSS-TIMESTAMP-SUFFIX)
    pub project_id: String,
    /// 생성 시각 (Unix epoch 초)
    pub created_unix: u64,
    /// 산출 입력
    pub input: SizingInput,
    /// 산출 결과
    pub sizing: SizingResult,
    /// 견적 결과
    pub cost: CostResult,
}

impl CalculationRecord {
    /// 현재 시각 기준으로 식별자를 발급해 기록을 만든다.
    pub fn new(input: SizingInput, sizing: SizingResult, cost: CostResult) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let project_id = format!(
            "FSS-{}-{}",
            to_base36(now.as_secs()),
            to_base36(u64::from(now.subsec_nanos()))
        );
        Self {
            project_id,
            created_unix: now.as_secs(),
            input,
            sizing,
            cost,
        }
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }

    #[test]
    fn record_id_has_expected_shape() {
        use crate::costing::{estimate_cost, CostRateTable};
        use crate::sizing::{size, SizingParams};

        let input = SizingInput {
            room_length_m: 10.0,
            room_width_m: 8.0,
            room_height_m: 3.0,
            equipment_volume_m3: None,
            design_temp_c: 20.0,
            altitude_m: 0.0,
            design_concentration_pct: 7.5,
            safety_factor: None,
            cylinder_capacity_kg: 54.4,
        };
        let sizing = size(&input, &SizingParams::default()).unwrap();
        let cost = estimate_cost(&sizing, &CostRateTable::default(), "INR").unwrap();
        let record = CalculationRecord::new(input, sizing, cost);
        assert!(record.project_id.starts_with("FSS-"));
        assert_eq!(record.project_id.split('-').count(), 3);
        assert!(record.created_unix > 0);
    }
}
