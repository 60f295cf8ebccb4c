use serde::{Deserialize, Serialize};

use super::rates::{CostRateTable, RateTableError};
use crate::rounding::round_to;
use crate::sizing::SizingResult;

/// 연기감지기 1개당 방호 바닥면적 [m²] (노즐 배치와는 무관한 별도 기준)
const SMOKE_DETECTOR_COVERAGE_M2: f64 = 100.0;
/// 연기감지기 최소 수량 [개]
const MIN_SMOKE_DETECTOR_COUNT: u32 = 2;
/// 열감지기 고정 수량 [개]
const HEAT_DETECTOR_COUNT: u32 = 2;
/// 수동조작함 고정 수량 [개]
const MANUAL_CALL_POINT_COUNT: u32 = 2;
/// 경보 사이렌/표시등 고정 수량 [개]
const ALARM_SOUNDER_COUNT: u32 = 4;

/// 시공 공수 기본값 [h]
const LABOR_BASE_HOURS: f64 = 40.0;
/// 실린더 1본당 추가 공수 [h]
const LABOR_HOURS_PER_CYLINDER: f64 = 4.0;
/// 노즐 1개당 추가 공수 [h]
const LABOR_HOURS_PER_NOZZLE: f64 = 2.0;
/// 배관 1m당 추가 공수 [h]
const LABOR_HOURS_PER_PIPING_M: f64 = 0.5;

/// 견적 계산 오류를 표현한다.
#[derive(Debug)]
pub enum CostError {
    /// 단가표가 유효성 검증에 실패한 경우
    InvalidRates(RateTableError),
}

impl std::fmt::Display for CostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostError::InvalidRates(e) => write!(f, "견적 불가: {e}"),
        }
    }
}

impl std::error::Error for CostError {}

impl From<RateTableError> for CostError {
    fn from(value: RateTableError) -> Self {
        CostError::InvalidRates(value)
    }
}

/// 견적 결과. 모든 금액은 적용 통화 기준 소수 2자리로 반올림된 값이다.
///
/// 총계는 공개된 다섯 구성요소(장비 소계, 노무/용역 소계, 간접비 3종)의
/// 합과 정확히 일치한다. 숨은 보정은 없다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    /// 약제 비용
    pub agent_cost: f64,
    /// 저장용기 비용
    pub cylinder_cost: f64,
    /// 용기밸브 조립체 비용
    pub valve_cost: f64,
    /// 용기 고정 철물 비용
    pub mounting_cost: f64,
    /// 방출 노즐 비용
    pub nozzle_cost: f64,
    /// 배관 비용
    pub piping_cost: f64,
    /// 관부속 비용
    pub fittings_cost: f64,
    /// 소화 제어반 비용
    pub detection_panel_cost: f64,
    /// 연기감지기 수량 [개]
    pub smoke_detector_count: u32,
    /// 연기감지기 비용
    pub smoke_detector_cost: f64,
    /// 열감지기 비용
    pub heat_detector_cost: f64,
    /// 수동조작함 비용
    pub call_point_cost: f64,
    /// 경보 사이렌/표시등 비용
    pub alarm_cost: f64,
    /// 방출 표지판 비용
    pub warning_sign_cost: f64,
    /// 시공 공수 [h]
    pub installation_hours: f64,
    /// 시공 인건비
    pub installation_labor_cost: f64,
    /// 설계 용역비
    pub engineering_design_cost: f64,
    /// 시운전/시험비
    pub commissioning_cost: f64,
    /// 준공 도서비
    pub documentation_cost: f64,
    /// 장비 소계
    pub equipment_subtotal: f64,
    /// 노무/용역 소계
    pub labor_subtotal: f64,
    /// 시공 간접비 (장비 소계 × (계수 − 1))
    pub installation_overhead: f64,
    /// 설계 간접비
    pub engineering_overhead: f64,
    /// 예비비
    pub contingency_overhead: f64,
    /// 총계
    pub grand_total: f64,
    /// 적용된 통화 코드
    pub currency: String,
    /// 적용된 환율 (기준 통화 1단위당)
    pub exchange_rate: f64,
    /// 요청한 통화를 몰라 기준 통화로 되돌아갔는지 여부
    pub currency_fallback: bool,
}

/// 요청 통화에 적용할 환율을 결정한다.
///
/// 기준 통화와 같으면 1.0, 환율표에 있으면 해당 환율, 모르는 코드면
/// 1.0으로 되돌리되 fallback 사실을 결과에 남긴다.
fn resolve_exchange_rate(rates: &CostRateTable, currency: &str) -> (String, f64, bool) {
    let requested = currency.trim().to_ascii_uppercase();
    let native = rates.currency.trim().to_ascii_uppercase();
    if requested.is_empty() || requested == native {
        return (native, 1.0, false);
    }
    match rates.exchange_rates.get(&requested) {
        Some(rate) => (requested, *rate, false),
        None => (native, 1.0, true),
    }
}

/// 산출 결과를 단가표로 전개해 BOQ 금액과 총계를 계산한다.
///
/// 내부 합산은 원값으로 수행하고, 환율 적용 후 결과 구조체에 담는
/// 시점에만 반올림한다. 총계는 반올림된 다섯 구성요소의 합으로
/// 재구성하므로 공개 구성요소와 항상 일치한다.
pub fn estimate_cost(
    sizing: &SizingResult,
    rates: &CostRateTable,
    currency: &str,
) -> Result<CostResult, CostError> {
    rates.validate()?;

    let cylinders = f64::from(sizing.cylinder_count);
    let nozzles = f64::from(sizing.nozzle_count);

    let agent_cost = sizing.agent_mass_kg * rates.agent_per_kg;
    let cylinder_cost = cylinders * rates.cylinder;
    let valve_cost = cylinders * rates.valve_assembly;
    let mounting_cost = cylinders * rates.mounting_hardware;
    let nozzle_cost = nozzles * rates.nozzle;
    let piping_cost = sizing.piping_length_m * rates.piping_per_m;

    let smoke_detector_count = ((sizing.floor_area_m2 / SMOKE_DETECTOR_COVERAGE_M2).ceil()
        as u32)
        .max(MIN_SMOKE_DETECTOR_COUNT);
    let smoke_detector_cost = f64::from(smoke_detector_count) * rates.smoke_detector;
    let heat_detector_cost = f64::from(HEAT_DETECTOR_COUNT) * rates.heat_detector;
    let call_point_cost = f64::from(MANUAL_CALL_POINT_COUNT) * rates.manual_call_point;
    let alarm_cost = f64::from(ALARM_SOUNDER_COUNT) * rates.alarm_sounder;

    let equipment_subtotal = agent_cost
        + cylinder_cost
        + valve_cost
        + mounting_cost
        + nozzle_cost
        + piping_cost
        + rates.fittings
        + rates.detection_panel
        + smoke_detector_cost
        + heat_detector_cost
        + call_point_cost
        + alarm_cost
        + rates.warning_signs;

    let installation_hours = LABOR_BASE_HOURS
        + LABOR_HOURS_PER_CYLINDER * cylinders
        + LABOR_HOURS_PER_NOZZLE * nozzles
        + LABOR_HOURS_PER_PIPING_M * sizing.piping_length_m;
    let installation_labor_cost = installation_hours * rates.installation_labor_per_hour;
    let labor_subtotal = installation_labor_cost
        + rates.engineering_design
        + rates.commissioning
        + rates.documentation;

    // 간접비는 관례대로 장비 소계에 대한 할증으로만 계산한다 (중복 할증 방지)
    let installation_overhead = equipment_subtotal * (rates.installation_factor - 1.0);
    let engineering_overhead = equipment_subtotal * (rates.engineering_factor - 1.0);
    let contingency_overhead = equipment_subtotal * (rates.contingency_factor - 1.0);

    let (applied_currency, exchange_rate, currency_fallback) =
        resolve_exchange_rate(rates, currency);
    let money = |amount: f64| round_to(amount * exchange_rate, 2);

    let equipment_subtotal = money(equipment_subtotal);
    let labor_subtotal = money(labor_subtotal);
    let installation_overhead = money(installation_overhead);
    let engineering_overhead = money(engineering_overhead);
    let contingency_overhead = money(contingency_overhead);
    let grand_total = round_to(
        equipment_subtotal
            + labor_subtotal
            + installation_overhead
            + engineering_overhead
            + contingency_overhead,
        2,
    );

    Ok(CostResult {
        agent_cost: money(agent_cost),
        cylinder_cost: money(cylinder_cost),
        valve_cost: money(valve_cost),
        mounting_cost: money(mounting_cost),
        nozzle_cost: money(nozzle_cost),
        piping_cost: money(piping_cost),
        fittings_cost: money(rates.fittings),
        detection_panel_cost: money(rates.detection_panel),
        smoke_detector_count,
        smoke_detector_cost: money(smoke_detector_cost),
        heat_detector_cost: money(heat_detector_cost),
        call_point_cost: money(call_point_cost),
        alarm_cost: money(alarm_cost),
        warning_sign_cost: money(rates.warning_signs),
        installation_hours: round_to(installation_hours, 2),
        installation_labor_cost: money(installation_labor_cost),
        engineering_design_cost: money(rates.engineering_design),
        commissioning_cost: money(rates.commissioning),
        documentation_cost: money(rates.documentation),
        equipment_subtotal,
        labor_subtotal,
        installation_overhead,
        engineering_overhead,
        contingency_overhead,
        grand_total,
        currency: applied_currency,
        exchange_rate,
        currency_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::{size, SizingInput, SizingParams};

    fn reference_sizing() -> SizingResult {
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
        size(&input, &SizingParams::default()).unwrap()
    }

    #[test]
    fn reference_room_estimate() {
        let r = estimate_cost(&reference_sizing(), &CostRateTable::default(), "INR").unwrap();
        assert!((r.agent_cost - 568_560.0).abs() < 0.01);
        assert!((r.equipment_subtotal - 1_167_560.0).abs() < 0.01);
        assert!((r.installation_hours - 77.0).abs() < 1e-9);
        assert!((r.installation_labor_cost - 65_450.0).abs() < 0.01);
        assert!((r.labor_subtotal - 205_450.0).abs() < 0.01);
        assert_eq!(r.currency, "INR");
        assert_eq!(r.exchange_rate, 1.0);
        assert!(!r.currency_fallback);
    }

    #[test]
    fn grand_total_is_sum_of_disclosed_components() {
        let r = estimate_cost(&reference_sizing(), &CostRateTable::default(), "INR").unwrap();
        let sum = r.equipment_subtotal
            + r.labor_subtotal
            + r.installation_overhead
            + r.engineering_overhead
            + r.contingency_overhead;
        assert!((r.grand_total - sum).abs() < 1e-9);
    }

    #[test]
    fn overheads_are_markup_on_equipment_only() {
        let r = estimate_cost(&reference_sizing(), &CostRateTable::default(), "INR").unwrap();
        assert!((r.installation_overhead - r.equipment_subtotal * 0.28).abs() < 0.01);
        assert!((r.engineering_overhead - r.equipment_subtotal * 0.15).abs() < 0.01);
        assert!((r.contingency_overhead - r.equipment_subtotal * 0.18).abs() < 0.01);
    }

    #[test]
    fn unknown_currency_falls_back_to_native() {
        let native = estimate_cost(&reference_sizing(), &CostRateTable::default(), "INR").unwrap();
        let r = estimate_cost(&reference_sizing(), &CostRateTable::default(), "XYZ").unwrap();
        assert!(r.currency_fallback);
        assert_eq!(r.exchange_rate, 1.0);
        assert_eq!(r.currency, "INR");
        assert_eq!(r.grand_total, native.grand_total);
    }

    #[test]
    fn currency_conversion_is_linear() {
        let rates = CostRateTable::default();
        let native = estimate_cost(&reference_sizing(), &rates, "INR").unwrap();
        let usd = estimate_cost(&reference_sizing(), &rates, "usd").unwrap();
        assert_eq!(usd.currency, "USD");
        assert!(!usd.currency_fallback);
        assert!((usd.grand_total - native.grand_total * 0.012).abs() < 0.05);
    }

    #[test]
    fn smoke_detector_count_follows_floor_area() {
        let mut sizing = reference_sizing();
        // 80 m² → 최소 수량
        let r = estimate_cost(&sizing, &CostRateTable::default(), "INR").unwrap();
        assert_eq!(r.smoke_detector_count, 2);

        sizing.floor_area_m2 = 450.0;
        let r = estimate_cost(&sizing, &CostRateTable::default(), "INR").unwrap();
        assert_eq!(r.smoke_detector_count, 5);
    }

    #[test]
    fn invalid_rate_table_is_rejected_before_any_sum() {
        let mut rates = CostRateTable::default();
        rates.agent_per_kg = 0.0;
        assert!(matches!(
            estimate_cost(&reference_sizing(), &rates, "INR"),
            Err(CostError::InvalidRates(_))
        ));
    }

    #[test]
    fn repeated_estimates_are_identical() {
        let sizing = reference_sizing();
        let rates = CostRateTable::default();
        let a = estimate_cost(&sizing, &rates, "USD").unwrap();
        let b = estimate_cost(&sizing, &rates, "USD").unwrap();
        assert_eq!(a, b);
    }
}
