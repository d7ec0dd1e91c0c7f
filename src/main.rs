use bulk::utils::error::ErrorSeverity;
use bulk::utils::{logger, validation::Validate};
use bulk::{BatchAccumulator, BulkEngine, CliConfig, ConfigProvider, ConsoleSink, FileSink, Publisher};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("CLI config: {:?}", config);

    if !config.console_enabled() && !config.file_enabled() {
        tracing::warn!("Console and file output are both disabled; blocks will only be counted");
    }

    // sinks outlive the publisher that borrows them
    let mut console = ConsoleSink::stdout(config.console_label());
    let mut file = FileSink::new(config.output_dir());

    let mut publisher = Publisher::new();
    if config.console_enabled() {
        publisher.register(&mut console);
    }
    if config.file_enabled() {
        tracing::debug!("Writing block files to {}", file.output_dir().display());
        publisher.register(&mut file);
    }

    let engine = BulkEngine::new(BatchAccumulator::new(config.block_size()), publisher);
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    match engine.run(input).await {
        Ok(summary) => {
            tracing::info!(
                "✅ {} lines grouped into {} blocks ({} commands)",
                summary.lines_read,
                summary.blocks_delivered,
                summary.commands_delivered
            );

            if summary.sink_failures > 0 {
                tracing::warn!("⚠️ {} block deliveries failed", summary.sink_failures);
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Reading input failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
