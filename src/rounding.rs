//! 표시용 수치 반올림/통화 포매팅 헬퍼.
//!
//! 계산 자체는 항상 원값(full precision)으로 수행하고, 결과 구조체에
//! 담거나 화면에 찍을 때만 이 모듈을 거친다.

/// 값을 소수 `decimals` 자리로 반올림한다 (양수 기준 half-up).
///
/// NaN/무한대는 0.0으로 처리한다.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// 통화 코드에 대응하는 기호를 돌려준다. 모르는 코드는 코드 자체를 쓴다.
pub fn currency_symbol(code: &str) -> &str {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => "₹",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        _ => code,
    }
}

/// 천 단위 구분 기호를 넣어 소수 `decimals` 자리로 포맷한다.
pub fn format_number(value: f64, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    let raw = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// 통화 기호를 붙여 금액을 포맷한다. 예: `₹ 1,234.56`
pub fn format_currency(amount: f64, code: &str) -> String {
    format!("{} {}", currency_symbol(code), format_number(amount, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert!((round_to(142.1436, 2) - 142.14).abs() < 1e-12);
        // 0.125는 2진수로 정확히 표현되는 경계값이다
        assert!((round_to(0.125, 2) - 0.13).abs() < 1e-12);
        assert!((round_to(0.1369, 4) - 0.1369).abs() < 1e-12);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn non_finite_rounds_to_zero() {
        assert_eq!(round_to(f64::NAN, 2), 0.0);
        assert_eq!(round_to(f64::INFINITY, 2), 0.0);
    }

    #[test]
    fn formats_with_thousand_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(999.0, 2), "999.00");
        assert_eq!(format_number(-1234.5, 2), "-1,234.50");
        assert_eq!(format_number(77.0, 0), "77");
    }

    #[test]
    fn formats_currency_with_symbol() {
        assert_eq!(format_currency(1234.56, "INR"), "₹ 1,234.56");
        assert_eq!(format_currency(10.0, "USD"), "$ 10.00");
        assert_eq!(format_currency(10.0, "XYZ"), "XYZ 10.00");
    }
}
