use clap::Parser;
use journal_scout::core::report::ConsoleProgress;
use journal_scout::core::ConfigProvider;
use journal_scout::utils::error::{ErrorSeverity, ScoutError};
use journal_scout::utils::{logger, validation::Validate};
use journal_scout::{
    source_from_config, CliConfig, ImpactPipeline, LocalStorage, ScoutEngine, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    let toml = match &args.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = args.verbose || toml.as_ref().is_some_and(|t| t.logging.verbose);
    let json_logs = args.log_json || toml.as_ref().is_some_and(|t| t.logging.json);
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting journal-scout");
    if let Some(path) = &args.config {
        tracing::info!("📁 Loaded configuration from: {}", path);
    }

    let exit_code = match toml {
        Some(config) => execute(config, args.dry_run).await,
        None => {
            let dry_run = args.dry_run;
            execute(args, dry_run).await
        }
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn execute<C: ConfigProvider + Validate>(config: C, dry_run: bool) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    display_config_summary(&config);
    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be made");
        return 0;
    }

    match run(&config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ Run aborted: {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
    }
}

async fn run<C: ConfigProvider>(config: &C) -> Result<(), ScoutError> {
    let source = source_from_config(config)?;
    let pipeline = ImpactPipeline::with_threshold(source, config.threshold());
    let engine = match config.output_path() {
        Some(path) => ScoutEngine::with_storage(pipeline, LocalStorage::new(path)),
        None => ScoutEngine::new(pipeline),
    };

    let (report, saved) = engine.run(&mut ConsoleProgress).await?;
    if let Some(path) = saved {
        println!("📁 Report saved to: {}", path);
    }
    tracing::info!(
        "✅ {} accepted, {} rejected out of {}",
        report.accepted().count(),
        report.rejected().count(),
        report.total
    );
    Ok(())
}

fn display_config_summary<C: ConfigProvider>(config: &C) {
    println!("📋 Configuration Summary:");
    println!("  Source: {} ({})", config.source_kind(), config.base_url());
    println!("  Threshold: {:.2}", config.threshold());
    println!("  Max pages: {}", config.max_pages());
    println!(
        "  Delays: listing {:?}, per journal {:?}",
        config.listing_delay(),
        config.item_delay()
    );
    println!("  Match policy: {:?}", config.match_policy());
    if let Some(path) = config.output_path() {
        println!("  Output: {}", path);
    }
    println!();
}
