use clap::Parser;
use telkom_bytes::config::LogFormat;
use telkom_bytes::utils::error::ErrorSeverity;
use telkom_bytes::utils::{logger, validation::Validate};
use telkom_bytes::{
    CliConfig, ConsoleSink, OnNetClient, PortalClient, Retrieval, UsageEngine, UsageError,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("Starting telkom-bytes");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let resolved = match config.resolve().and_then(|r| r.validate().map(|_| r)) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let sink = ConsoleSink::new();
    let outcome = match resolved.retrieval {
        Retrieval::OnNet { mobile_number } => {
            let source = OnNetClient::new(resolved.provider, mobile_number);
            UsageEngine::new(source, sink).run().await
        }
        Retrieval::Portal { credentials } => {
            let source = PortalClient::new(resolved.provider, credentials);
            UsageEngine::new(source, sink).run().await
        }
    };

    if let Err(e) = outcome {
        std::process::exit(report_failure(&e));
    }
}

fn report_failure(e: &UsageError) -> i32 {
    tracing::error!(
        "❌ Retrieval failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
