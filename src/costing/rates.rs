use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 단가표 로드/검증 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum RateTableError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류 (필수 단가 항목 누락 포함)
    Parse(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
    /// 단가 항목 값이 유효하지 않은 경우 (0 이하 단가, 1.0 미만 계수 등)
    Invalid(&'static str),
}

impl std::fmt::Display for RateTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateTableError::Io(e) => write!(f, "단가표 파일 입출력 오류: {e}"),
            RateTableError::Parse(e) => write!(f, "단가표 파싱 오류: {e}"),
            RateTableError::Serialize(e) => write!(f, "단가표 직렬화 오류: {e}"),
            RateTableError::Invalid(field) => {
                write!(f, "단가표 항목 '{field}' 값이 유효하지 않습니다.")
            }
        }
    }
}

impl std::error::Error for RateTableError {}

impl From<std::io::Error> for RateTableError {
    fn from(value: std::io::Error) -> Self {
        RateTableError::Io(value)
    }
}

impl From<toml::de::Error> for RateTableError {
    fn from(value: toml::de::Error) -> Self {
        RateTableError::Parse(value)
    }
}

impl From<toml::ser::Error> for RateTableError {
    fn from(value: toml::ser::Error) -> Self {
        RateTableError::Serialize(value)
    }
}

/// 견적에 사용하는 단가표.
///
/// 모든 단가 필드는 필수다. 역직렬화에 필드별 기본값을 두지 않으므로
/// 단가표 파일에서 항목이 빠지면 로드 단계에서 실패한다. 누락 단가가
/// 조용히 0으로 들어가 총액을 깎아먹는 일은 표현 자체가 불가능하다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRateTable {
    /// 약제 단가 [통화/kg]
    pub agent_per_kg: f64,
    /// 저장용기 단가 [통화/본]
    pub cylinder: f64,
    /// 용기밸브 조립체 단가 [통화/본]
    pub valve_assembly: f64,
    /// 용기 고정 철물 단가 [통화/본]
    pub mounting_hardware: f64,
    /// 방출 노즐 단가 [통화/개]
    pub nozzle: f64,
    /// 배관 단가 [통화/m]
    pub piping_per_m: f64,
    /// 관부속 일식 [통화]
    pub fittings: f64,
    /// 소화 제어반 [통화]
    pub detection_panel: f64,
    /// 연기감지기 단가 [통화/개]
    pub smoke_detector: f64,
    /// 열감지기 단가 [통화/개]
    pub heat_detector: f64,
    /// 수동조작함 단가 [통화/개]
    pub manual_call_point: f64,
    /// 경보 사이렌/표시등 단가 [통화/개]
    pub alarm_sounder: f64,
    /// 방출 표지판 일식 [통화]
    pub warning_signs: f64,
    /// 시공 인건비 [통화/h]
    pub installation_labor_per_hour: f64,
    /// 설계 용역비 [통화]
    pub engineering_design: f64,
    /// 시운전/시험비 [통화]
    pub commissioning: f64,
    /// 준공 도서비 [통화]
    pub documentation: f64,
    /// 시공 간접비 계수 (1.28이면 장비비의 +28%)
    pub installation_factor: f64,
    /// 설계 간접비 계수
    pub engineering_factor: f64,
    /// 예비비 계수
    pub contingency_factor: f64,
    /// 단가표 기준 통화 코드
    pub currency: String,
    /// 기준 통화 1단위당 환산율 (통화 코드 → 환율)
    pub exchange_rates: BTreeMap<String, f64>,
}

impl Default for CostRateTable {
    fn default() -> Self {
        let mut exchange_rates = BTreeMap::new();
        exchange_rates.insert("USD".to_string(), 0.012);
        exchange_rates.insert("EUR".to_string(), 0.011);
        exchange_rates.insert("GBP".to_string(), 0.0095);
        exchange_rates.insert("AED".to_string(), 0.044);
        Self {
            agent_per_kg: 4000.0,
            cylinder: 90_000.0,
            valve_assembly: 25_000.0,
            mounting_hardware: 5_000.0,
            nozzle: 8_000.0,
            piping_per_m: 1_200.0,
            fittings: 15_000.0,
            detection_panel: 120_000.0,
            smoke_detector: 4_500.0,
            heat_detector: 3_800.0,
            manual_call_point: 2_500.0,
            alarm_sounder: 3_500.0,
            warning_signs: 2_000.0,
            installation_labor_per_hour: 850.0,
            engineering_design: 75_000.0,
            commissioning: 50_000.0,
            documentation: 15_000.0,
            installation_factor: 1.28,
            engineering_factor: 1.15,
            contingency_factor: 1.18,
            currency: "INR".to_string(),
            exchange_rates,
        }
    }
}

impl CostRateTable {
    /// 단가표 값의 유효성을 검증한다. 견적 계산 전에 반드시 통과해야 한다.
    pub fn validate(&self) -> Result<(), RateTableError> {
        let rates = [
            ("agent_per_kg", self.agent_per_kg),
            ("cylinder", self.cylinder),
            ("valve_assembly", self.valve_assembly),
            ("mounting_hardware", self.mounting_hardware),
            ("nozzle", self.nozzle),
            ("piping_per_m", self.piping_per_m),
            ("fittings", self.fittings),
            ("detection_panel", self.detection_panel),
            ("smoke_detector", self.smoke_detector),
            ("heat_detector", self.heat_detector),
            ("manual_call_point", self.manual_call_point),
            ("alarm_sounder", self.alarm_sounder),
            ("warning_signs", self.warning_signs),
            ("installation_labor_per_hour", self.installation_labor_per_hour),
            ("engineering_design", self.engineering_design),
            ("commissioning", self.commissioning),
            ("documentation", self.documentation),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                return Err(RateTableError::Invalid(name));
            }
        }
        let factors = [
            ("installation_factor", self.installation_factor),
            ("engineering_factor", self.engineering_factor),
            ("contingency_factor", self.contingency_factor),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 1.0 {
                return Err(RateTableError::Invalid(name));
            }
        }
        if self.currency.trim().is_empty() {
            return Err(RateTableError::Invalid("currency"));
        }
        for rate in self.exchange_rates.values() {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(RateTableError::Invalid("exchange_rates"));
            }
        }
        Ok(())
    }
}

/// 단가표 파일을 로드하거나, 없으면 내장 기본 단가표를 기록 후 반환한다.
pub fn load_or_default(path: &Path) -> Result<CostRateTable, RateTableError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let rates: CostRateTable = toml::from_str(&content)?;
        rates.validate()?;
        Ok(rates)
    } else {
        let rates = CostRateTable::default();
        save_rates(&rates, path)?;
        Ok(rates)
    }
}

fn save_rates(rates: &CostRateTable, path: &Path) -> Result<(), RateTableError> {
    let content = toml::to_string_pretty(rates)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert!(CostRateTable::default().validate().is_ok());
    }

    #[test]
    fn toml_roundtrip_preserves_table() {
        let rates = CostRateTable::default();
        let text = toml::to_string_pretty(&rates).unwrap();
        let back: CostRateTable = toml::from_str(&text).unwrap();
        assert_eq!(rates, back);
    }

    #[test]
    fn missing_rate_key_fails_at_parse() {
        let rates = CostRateTable::default();
        let text = toml::to_string_pretty(&rates).unwrap();
        // 약제 단가 항목을 통째로 지운 단가표는 로드 자체가 거부된다
        let broken: String = text
            .lines()
            .filter(|line| !line.starts_with("agent_per_kg"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(toml::from_str::<CostRateTable>(&broken).is_err());
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut rates = CostRateTable::default();
        rates.nozzle = 0.0;
        assert!(matches!(
            rates.validate(),
            Err(RateTableError::Invalid("nozzle"))
        ));
    }

    #[test]
    fn factor_below_one_is_rejected() {
        let mut rates = CostRateTable::default();
        rates.contingency_factor = 0.95;
        assert!(matches!(
            rates.validate(),
            Err(RateTableError::Invalid("contingency_factor"))
        ));
    }
}
