use clap::Parser;
use release_dashboard::app::{render, runner};
use release_dashboard::utils::error::{DashboardError, ErrorSeverity};
use release_dashboard::utils::{logger, validation::Validate};
use release_dashboard::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.to_dashboard_config() {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };
    let catalog = config.catalog();

    if let Some(filter) = &cli.list_clusters {
        println!("{}", catalog.search_clusters(filter).join("\n"));
        return Ok(());
    }
    if let Some(filter) = &cli.list_environments {
        println!("{}", catalog.search_environments(filter).join("\n"));
        return Ok(());
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(e);
    }

    let source = match runner::build_source(&config).await {
        Ok(source) => source,
        Err(e) => exit_with(e),
    };

    if cli.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        if let Err(e) = runner::run_interactive(&config, source, stdin, tokio::io::stdout()).await {
            exit_with(e);
        }
        return Ok(());
    }

    let snapshot = match runner::run_once(&config, source, &cli.view_request()).await {
        Ok(snapshot) => snapshot,
        Err(e) => exit_with(e),
    };
    print!("{}", render::render(&snapshot, cli.format)?);

    // A failed fetch still renders the (empty) table; the exit code tells scripts.
    if snapshot.error.is_some() {
        std::process::exit(2);
    }
    Ok(())
}

fn exit_with(e: DashboardError) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
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
    std::process::exit(exit_code)
}
