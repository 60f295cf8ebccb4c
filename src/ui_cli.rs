use std::io::{self, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::costing::{estimate_cost, CostRateTable, CostResult};
use crate::record::CalculationRecord;
use crate::rounding::{format_currency, format_number};
use crate::sizing::{size, SizingInput, SizingResult};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SystemDesign,
    RateTable,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu() -> Result<MenuChoice, AppError> {
    println!("\n=== Fire Suppression Toolbox ===");
    println!("1) 시스템 설계 계산 (산출 + BOQ)");
    println!("2) 단가표 보기");
    println!("3) 설정");
    println!("0) 종료");
    loop {
        let sel = read_line("메뉴 선택: ")?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::SystemDesign),
            "2" => return Ok(MenuChoice::RateTable),
            "3" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

/// 방호구역 입력을 받아 산출과 견적을 한 번에 수행한다.
pub fn handle_system_design(cfg: &Config, rates: &CostRateTable) -> Result<(), AppError> {
    println!("\n-- 시스템 설계 계산 --");
    let room_length_m = read_f64_default("방호구역 길이 [m] (기본 10): ", 10.0)?;
    let room_width_m = read_f64_default("방호구역 폭 [m] (기본 8): ", 8.0)?;
    let room_height_m = read_f64_default("방호구역 높이 [m] (기본 3): ", 3.0)?;
    let equipment_volume_m3 = read_optional_f64("구역 내 장비 체적 [m³] (없으면 엔터): ")?;
    let design_temp_c = read_f64_default("설계 최저 온도 [°C] (기본 20): ", 20.0)?;
    let altitude_m = read_f64_default("설치 고도 [m] (기본 0): ", 0.0)?;
    let design_concentration_pct = read_f64_default("설계 농도 [%] (기본 7.5): ", 7.5)?;
    let safety_factor = read_optional_f64("설계 여유율 (기본 1.0, 엔터로 생략): ")?;
    let cylinder_capacity_kg = read_f64_default("실린더 충전량 [kg] (기본 54.4): ", 54.4)?;

    let input = SizingInput {
        room_length_m,
        room_width_m,
        room_height_m,
        equipment_volume_m3,
        design_temp_c,
        altitude_m,
        design_concentration_pct,
        safety_factor,
        cylinder_capacity_kg,
    };

    let sizing = match size(&input, &cfg.sizing) {
        Ok(s) => s,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    print_sizing(&sizing);

    let currency = read_line_default(
        &format!("표시 통화 코드 (기본 {}): ", cfg.default_currency),
        &cfg.default_currency,
    )?;
    let cost = match estimate_cost(&sizing, rates, &currency) {
        Ok(c) => c,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    if cost.currency_fallback {
        println!(
            "알 수 없는 통화 코드입니다. 기준 통화 {}(으)로 표시합니다.",
            cost.currency
        );
    }
    print_boq(&sizing, &cost);

    let record = CalculationRecord::new(input, sizing, cost);
    println!("\n프로젝트 ID: {}", record.project_id);
    Ok(())
}

fn print_sizing(s: &SizingResult) {
    println!("\n-- 산출 결과 --");
    println!("총 체적: {} m³", format_number(s.gross_volume_m3, 2));
    println!("순 체적: {} m³", format_number(s.net_volume_m3, 2));
    println!(
        "비증기체적 S: {:.4} m³/kg (설계 온도 {} °C)",
        s.specific_vapor_volume_m3_per_kg, s.design_temp_c
    );
    println!(
        "필요 약제량: {} kg (설계 농도 {}%, 고도 {} m)",
        format_number(s.agent_mass_kg, 2),
        s.design_concentration_pct,
        s.altitude_m
    );
    println!(
        "저장용기: {}본 × {} kg",
        s.cylinder_count, s.cylinder_capacity_kg
    );
    println!(
        "방출 노즐: {}개 (바닥 면적 {} m²)",
        s.nozzle_count,
        format_number(s.floor_area_m2, 2)
    );
    println!(
        "배관 길이(추정): {} m",
        format_number(s.piping_length_m, 2)
    );
}

fn print_boq(s: &SizingResult, c: &CostResult) {
    let cur = c.currency.as_str();
    println!("\n-- BOQ ({cur}) --");
    println!(
        "청정소화약제 ({} kg): {}",
        format_number(s.agent_mass_kg, 2),
        format_currency(c.agent_cost, cur)
    );
    println!(
        "저장용기 ({}본): {}",
        s.cylinder_count,
        format_currency(c.cylinder_cost, cur)
    );
    println!("용기밸브 조립체: {}", format_currency(c.valve_cost, cur));
    println!("용기 고정 철물: {}", format_currency(c.mounting_cost, cur));
    println!(
        "방출 노즐 ({}개): {}",
        s.nozzle_count,
        format_currency(c.nozzle_cost, cur)
    );
    println!(
        "배관 ({} m): {}",
        format_number(s.piping_length_m, 2),
        format_currency(c.piping_cost, cur)
    );
    println!("관부속 일식: {}", format_currency(c.fittings_cost, cur));
    println!("소화 제어반: {}", format_currency(c.detection_panel_cost, cur));
    println!(
        "연기감지기 ({}개): {}",
        c.smoke_detector_count,
        format_currency(c.smoke_detector_cost, cur)
    );
    println!("열감지기: {}", format_currency(c.heat_detector_cost, cur));
    println!("수동조작함: {}", format_currency(c.call_point_cost, cur));
    println!(
        "경보 사이렌/표시등: {}",
        format_currency(c.alarm_cost, cur)
    );
    println!("방출 표지판: {}", format_currency(c.warning_sign_cost, cur));
    println!("장비 소계: {}", format_currency(c.equipment_subtotal, cur));
    println!(
        "시공 인건비 ({} h): {}",
        format_number(c.installation_hours, 1),
        format_currency(c.installation_labor_cost, cur)
    );
    println!(
        "설계 용역비: {}",
        format_currency(c.engineering_design_cost, cur)
    );
    println!("시운전/시험비: {}", format_currency(c.commissioning_cost, cur));
    println!("준공 도서비: {}", format_currency(c.documentation_cost, cur));
    println!("노무/용역 소계: {}", format_currency(c.labor_subtotal, cur));
    println!(
        "시공 간접비: {}",
        format_currency(c.installation_overhead, cur)
    );
    println!(
        "설계 간접비: {}",
        format_currency(c.engineering_overhead, cur)
    );
    println!(
        "예비비: {}",
        format_currency(c.contingency_overhead, cur)
    );
    println!("총계: {}", format_currency(c.grand_total, cur));
}

/// 현재 단가표 내용을 출력한다.
pub fn handle_rate_table(rates: &CostRateTable) {
    let cur = rates.currency.as_str();
    println!("\n-- 단가표 ({cur}) --");
    println!("약제 [kg당]: {}", format_currency(rates.agent_per_kg, cur));
    println!("저장용기 [본당]: {}", format_currency(rates.cylinder, cur));
    println!(
        "용기밸브 조립체 [본당]: {}",
        format_currency(rates.valve_assembly, cur)
    );
    println!(
        "용기 고정 철물 [본당]: {}",
        format_currency(rates.mounting_hardware, cur)
    );
    println!("방출 노즐 [개당]: {}", format_currency(rates.nozzle, cur));
    println!("배관 [m당]: {}", format_currency(rates.piping_per_m, cur));
    println!("관부속 일식: {}", format_currency(rates.fittings, cur));
    println!(
        "소화 제어반: {}",
        format_currency(rates.detection_panel, cur)
    );
    println!(
        "연기감지기 [개당]: {}",
        format_currency(rates.smoke_detector, cur)
    );
    println!(
        "열감지기 [개당]: {}",
        format_currency(rates.heat_detector, cur)
    );
    println!(
        "수동조작함 [개당]: {}",
        format_currency(rates.manual_call_point, cur)
    );
    println!(
        "경보 사이렌/표시등 [개당]: {}",
        format_currency(rates.alarm_sounder, cur)
    );
    println!(
        "방출 표지판 일식: {}",
        format_currency(rates.warning_signs, cur)
    );
    println!(
        "시공 인건비 [h당]: {}",
        format_currency(rates.installation_labor_per_hour, cur)
    );
    println!(
        "설계 용역비: {}",
        format_currency(rates.engineering_design, cur)
    );
    println!("시운전/시험비: {}", format_currency(rates.commissioning, cur));
    println!("준공 도서비: {}", format_currency(rates.documentation, cur));
    println!(
        "간접비 계수: 시공 {:.2} / 설계 {:.2} / 예비 {:.2}",
        rates.installation_factor, rates.engineering_factor, rates.contingency_factor
    );
    if rates.exchange_rates.is_empty() {
        println!("등록된 환율 없음");
    } else {
        for (code, rate) in &rates.exchange_rates {
            println!("환율 1 {cur} = {rate} {code}");
        }
    }
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(cfg: &mut Config) -> Result<(), AppError> {
    println!("\n-- 설정 --");
    println!("현재 기본 표시 통화: {}", cfg.default_currency);
    let sel = read_line("새 통화 코드(취소하려면 엔터): ")?;
    let trimmed = sel.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    cfg.default_currency = trimmed.to_ascii_uppercase();
    println!("기본 표시 통화가 {}(으)로 설정되었습니다.", cfg.default_currency);
    Ok(())
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}

fn read_line_default(prompt: &str, default: &str) -> Result<String, AppError> {
    let s = read_line(prompt)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn read_f64_default(prompt: &str, default: f64) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(default);
        }
        match trimmed.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

fn read_optional_f64(prompt: &str) -> Result<Option<f64>, AppError> {
    loop {
        let s = read_line(prompt)?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<f64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}
