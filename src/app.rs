use crate::config::Config;
use crate::costing::{CostRateTable, RateTableError};
use crate::costing::estimate::CostError;
use crate::sizing::SizingError;
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(crate::config::ConfigError),
    /// 단가표 로드/검증 오류
    Rates(RateTableError),
    /// 소화약제 산출 오류
    Sizing(SizingError),
    /// 견적 계산 오류
    Cost(CostError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Rates(e) => write!(f, "단가표 오류: {e}"),
            AppError::Sizing(e) => write!(f, "산출 오류: {e}"),
            AppError::Cost(e) => write!(f, "견적 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<RateTableError> for AppError {
    fn from(value: RateTableError) -> Self {
        AppError::Rates(value)
    }
}

impl From<SizingError> for AppError {
    fn from(value: SizingError) -> Self {
        AppError::Sizing(value)
    }
}

impl From<CostError> for AppError {
    fn from(value: CostError) -> Self {
        AppError::Cost(value)
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, rates: &CostRateTable) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu()? {
            MenuChoice::SystemDesign => ui_cli::handle_system_design(config, rates)?,
            MenuChoice::RateTable => ui_cli::handle_rate_table(rates),
            MenuChoice::Settings => {
                ui_cli::handle_settings(config)?;
                config.save()?;
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("프로그램을 종료합니다.");
                break;
            }
        }
    }
    Ok(())
}
