use std::path::PathBuf;

use clap::Parser;

use fire_suppression_toolbox::{app, config, costing::rates};

/// 청정소화약제 전역방출 설비 산출/견적 CLI.
#[derive(Debug, Parser)]
#[command(name = "fire_suppression_toolbox", version, about)]
struct Cli {
    /// 단가표 파일 경로 (없으면 내장 기본 단가표를 기록 후 사용)
    #[arg(long, default_value = "rates.toml")]
    rates: PathBuf,
    /// 기본 표시 통화 코드를 이 실행에 한해 덮어쓴다 (예: USD)
    #[arg(long)]
    currency: Option<String>,
}

/// 프로그램의 엔트리 포인트. 설정과 단가표를 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = config::load_or_default()?;
    if let Some(currency) = cli.currency {
        cfg.default_currency = currency.trim().to_ascii_uppercase();
    }
    let rates = rates::load_or_default(&cli.rates)?;
    app::run(&mut cfg, &rates)?;
    Ok(())
}
