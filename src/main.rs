use anyhow::Context;
use clap::Parser;
use uno_ballot::config::Command;
use uno_ballot::core::ConfigProvider;
use uno_ballot::utils::error::ErrorSeverity;
use uno_ballot::utils::{logger, validation::Validate};
use uno_ballot::{BallotConfig, BallotError, BallotSession, CliConfig, LocalStorage, VoteStore};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定檔（若有），再套用命令列覆蓋
    let file_config = match &cli.config {
        Some(path) => BallotConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => BallotConfig::default(),
    };
    let config = file_config.with_overrides(
        cli.data_dir.clone(),
        cli.tally_file.clone(),
        cli.voters_file.clone(),
    );

    // 初始化日誌
    if cli.log_json || config.logging.json {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting uno-ballot");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::new(config.data_dir());
    let store = match VoteStore::open(storage, &config) {
        Ok(store) => store,
        Err(e) => fail(&e),
    };

    match run(&cli.command, &store) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => fail(&e),
    }
}

/// 執行子命令；回傳 false 代表投票被拒或稽核不一致
fn run(command: &Command, store: &VoteStore<LocalStorage>) -> uno_ballot::Result<bool> {
    match command {
        Command::Vote { candidate, id } => {
            let outcome = store.cast_vote(candidate, id)?;
            if outcome.success {
                println!("✅ {}", outcome.message);
            } else {
                println!("❌ {}", outcome.message);
            }
            println!("{}", store.summary()?);
            Ok(outcome.success)
        }
        Command::Tally { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(&store.snapshot()?)?);
            } else {
                println!("{}", store.summary()?);
            }
            Ok(true)
        }
        Command::Audit => {
            let report = store.audit()?;
            println!("{}", report.render());
            if !report.is_consistent() {
                tracing::warn!("Audit found inconsistencies between tally and voter record");
            }
            Ok(report.is_consistent())
        }
        Command::Interactive => {
            let stdin = std::io::stdin();
            let stats = BallotSession::new(store).run(stdin.lock(), std::io::stdout())?;
            println!(
                "Session finished: {} accepted, {} rejected",
                stats.accepted, stats.rejected
            );
            Ok(true)
        }
    }
}

fn fail(e: &BallotError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
