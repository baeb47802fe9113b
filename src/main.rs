// Main CLI entry point for crawdad
// Uses clap for argument parsing and tracing for console output

use std::process;

use anyhow::Context;
use crawdad::cli::{build_cli, CliArgs};
use crawdad::engine::AuditEngine;
use crawdad::loader;
use crawdad::reporting::{export_csv, export_json, export_markdown, render_summary};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn print_title_card() {
    println!(r#"
    __  ____    ____  __    __  ___     ____  ___
   /  ]|    \  /    ||  |__|  ||   \   /    ||   \
  /  / |  D  )|  o  ||  |  |  ||    \ |  o  ||    \
 /  /  |    / |     ||  |  |  ||  D  ||     ||  D  |
/   \_ |    \ |  _  ||  `  `  ||     ||  _  ||     |
\     ||  .  \|  |  | \      / |     ||  |  ||     |
 \____||__|\_||__|__|  \_/\_/  |_____||__|__||_____|
                                            v{}
A tool for auditing password security of services
that authenticate over HTTP(S) GET or basic auth.
Use responsibly.
"#, env!("CARGO_PKG_VERSION"));
}

fn init_logging(args: &CliArgs) {
    // Keep reqwest/hyper quiet unless RUST_LOG says otherwise
    let crate_level = if args.verbose { "debug" } else if args.quiet { "warn" } else { "info" };
    let filter_str = format!("crawdad={},reqwest=warn,hyper=warn", crate_level);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter_str))
        .unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = args.to_config().context("invalid audit configuration")?;
    let table = loader::load(&args.params)
        .with_context(|| format!("could not read parameter file {}", args.params.display()))?;
    let malformed = table.skipped.iter().filter(|e| e.is_recoverable()).count();
    if malformed > 0 {
        warn!("{} malformed line(s) skipped in parameter file.", malformed);
    }

    let engine = AuditEngine::new(config).context("failed to build HTTP client")?;
    debug!(
        "Success rule: status {} with body matching {}",
        engine.config().success_status(),
        engine.config().success_body()
    );
    if args.wants_reports() {
        std::fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("could not create output directory {}", args.output_dir.display()))?;
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing with partial results.");
            on_interrupt.cancel();
        }
    });

    let summary = engine.run(table.rows, &cancel).await;
    println!("{}", render_summary(&summary));

    if args.csv_report {
        let path = export_csv(&summary.outcomes, &args.output_dir).context("CSV export failed")?;
        info!("CSV report written to {}", path.display());
    }
    if args.markdown_report {
        let path = export_markdown(&summary.outcomes, &args.output_dir).context("Markdown export failed")?;
        info!("Markdown report written to {}", path.display());
    }
    if args.json_report {
        let path = export_json(&summary.outcomes, &args.output_dir).context("JSON export failed")?;
        info!("JSON report written to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();
    let args = match CliArgs::from_matches(&matches) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        print_title_card();
    }
    init_logging(&args);

    if let Err(e) = run(args).await {
        eprintln!("Fatal: {:#}", e);
        process::exit(1);
    }
}
