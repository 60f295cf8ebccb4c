use serde::{Deserialize, Serialize};

use super::params::SizingParams;
use crate::rounding::round_to;

/// 소화약제 산출 오류를 표현한다.
#[derive(Debug)]
pub enum SizingError {
    /// 방호구역 형상/설치 조건 입력이 잘못된 경우
    InvalidGeometry(&'static str),
    /// 설계 농도가 허용 범위를 벗어난 경우
    InvalidConcentration(&'static str),
    /// 설계 온도가 물성 근사의 유효 범위를 벗어난 경우
    InvalidTemperature(&'static str),
}

impl std::fmt::Display for SizingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizingError::InvalidGeometry(msg) => write!(f, "형상 입력 오류: {msg}"),
            SizingError::InvalidConcentration(msg) => write!(f, "설계 농도 오류: {msg}"),
            SizingError::InvalidTemperature(msg) => write!(f, "설계 온도 오류: {msg}"),
        }
    }
}

impl std::error::Error for SizingError {}

/// 방호구역 소화약제 산출 입력.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingInput {
    /// 방호구역 길이 [m]
    pub room_length_m: f64,
    /// 방호구역 폭 [m]
    pub room_width_m: f64,
    /// 방호구역 높이 [m]
    pub room_height_m: f64,
    /// 구역 내 상주 장비가 차지하는 체적 [m³] (없으면 0으로 처리)
    pub equipment_volume_m3: Option<f64>,
    /// 설계 최저 온도 [°C]
    pub design_temp_c: f64,
    /// 설치 고도 [m]
    pub altitude_m: f64,
    /// 설계 농도 [%]
    pub design_concentration_pct: f64,
    /// 설계 여유율 (없으면 1.0)
    pub safety_factor: Option<f64>,
    /// 실린더 1본당 충전량 [kg]
    pub cylinder_capacity_kg: f64,
}

/// 소화약제 산출 결과.
///
/// 표시용 스칼라는 소수 2자리(비증기체적은 4자리)로 반올림해 담고,
/// 수량 산정은 반올림 전의 원값으로 수행한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// 총 체적 [m³]
    pub gross_volume_m3: f64,
    /// 장비 체적을 뺀 순 체적 [m³]
    pub net_volume_m3: f64,
    /// 비증기체적 S [m³/kg]
    pub specific_vapor_volume_m3_per_kg: f64,
    /// 필요 약제량 (고도/여유율 보정 후) [kg]
    pub agent_mass_kg: f64,
    /// 실린더 수량 [본]
    pub cylinder_count: u32,
    /// 실린더 1본당 충전량 [kg]
    pub cylinder_capacity_kg: f64,
    /// 노즐 수량 [개]
    pub nozzle_count: u32,
    /// 바닥 면적 [m²]
    pub floor_area_m2: f64,
    /// 배관 길이 추정값 [m] (둘레 기반 근사이며 실제 배관 경로가 아니다)
    pub piping_length_m: f64,
    /// 설계 농도 [%] (입력 반향)
    pub design_concentration_pct: f64,
    /// 설계 온도 [°C] (입력 반향)
    pub design_temp_c: f64,
    /// 설치 고도 [m] (입력 반향)
    pub altitude_m: f64,
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn validate(input: &SizingInput, params: &SizingParams) -> Result<(), SizingError> {
    if !positive(input.room_length_m) || !positive(input.room_width_m) || !positive(input.room_height_m)
    {
        return Err(SizingError::InvalidGeometry(
            "방호구역 치수는 0보다 커야 합니다.",
        ));
    }
    if let Some(ev) = input.equipment_volume_m3 {
        if !non_negative(ev) {
            return Err(SizingError::InvalidGeometry(
                "장비 체적은 0 이상이어야 합니다.",
            ));
        }
    }
    if !non_negative(input.altitude_m) {
        return Err(SizingError::InvalidGeometry(
            "설치 고도는 0 이상이어야 합니다.",
        ));
    }
    if !positive(input.cylinder_capacity_kg) {
        return Err(SizingError::InvalidGeometry(
            "실린더 충전량은 0보다 커야 합니다.",
        ));
    }
    if let Some(sf) = input.safety_factor {
        if !positive(sf) {
            return Err(SizingError::InvalidGeometry(
                "설계 여유율은 0보다 커야 합니다.",
            ));
        }
    }
    let c = input.design_concentration_pct;
    if !c.is_finite() || c <= 0.0 || c >= 100.0 {
        return Err(SizingError::InvalidConcentration(
            "설계 농도는 0%와 100% 사이여야 합니다.",
        ));
    }
    if c < params.min_concentration_pct || c > params.max_concentration_pct {
        return Err(SizingError::InvalidConcentration(
            "설계 농도가 설정된 허용 범위를 벗어났습니다.",
        ));
    }
    if !positive(params.specific_vapor_volume(input.design_temp_c)) {
        return Err(SizingError::InvalidTemperature(
            "비증기체적이 0 이하가 되는 온도입니다.",
        ));
    }
    Ok(())
}

/// 전역방출 소화약제량과 구성품 수량을 산출한다.
///
/// W = (V / S) × (C / (100 − C)) 기반이며 고도 보정 후 설계 여유율을
/// 곱한다. 배관 길이는 둘레 기반 추정값이다.
pub fn size(input: &SizingInput, params: &SizingParams) -> Result<SizingResult, SizingError> {
    validate(input, params)?;

    let equipment_volume = input.equipment_volume_m3.unwrap_or(0.0);
    let safety_factor = input.safety_factor.unwrap_or(1.0);

    let gross_volume = input.room_length_m * input.room_width_m * input.room_height_m;
    if equipment_volume > gross_volume {
        return Err(SizingError::InvalidGeometry(
            "장비 체적이 방호구역 총 체적보다 큽니다.",
        ));
    }
    let net_volume = (gross_volume - equipment_volume).max(0.0);

    let specific_vapor_volume = params.specific_vapor_volume(input.design_temp_c);
    let c = input.design_concentration_pct;
    let mut agent_mass = (net_volume / specific_vapor_volume) * (c / (100.0 - c));
    agent_mass *= params.altitude_factor(input.altitude_m);
    agent_mass *= safety_factor;

    // 수량 산정은 반올림 전의 원값으로 수행한다
    let cylinder_count = ((agent_mass / input.cylinder_capacity_kg).ceil() as u32).max(1);

    let floor_area = input.room_length_m * input.room_width_m;
    let nozzle_count = ((floor_area / params.nozzle_coverage_m2).ceil() as u32)
        .max(params.min_nozzle_count);

    let piping_length =
        2.0 * (input.room_length_m + input.room_width_m) + 2.0 * input.room_height_m;

    Ok(SizingResult {
        gross_volume_m3: round_to(gross_volume, 2),
        net_volume_m3: round_to(net_volume, 2),
        specific_vapor_volume_m3_per_kg: round_to(specific_vapor_volume, 4),
        agent_mass_kg: round_to(agent_mass, 2),
        cylinder_count,
        cylinder_capacity_kg: input.cylinder_capacity_kg,
        nozzle_count,
        floor_area_m2: round_to(floor_area, 2),
        piping_length_m: round_to(piping_length, 2),
        design_concentration_pct: input.design_concentration_pct,
        design_temp_c: input.design_temp_c,
        altitude_m: input.altitude_m,
    })
}
