//! Bandcamp Collection Sync - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use bandcamp_sync::{
    api::BandcampApi,
    cli::Args,
    config::{validate_settings, Settings},
    error::{exit_codes, Error, Result},
    output::{print_banner, print_config_summary, print_error, print_info, print_sync_summary, print_warning},
    sync::{sync_collection, SyncOptions, SyncReport},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(report) if report.has_failures() => {
            ExitCode::from(exit_codes::SOME_ITEMS_FAILED as u8)
        }
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Authentication(_) | Error::Api(_) | Error::Json(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_)
                | Error::Extract(_)
                | Error::PageDataNotFound(_)
                | Error::Http(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<SyncReport> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load settings
    let settings_path = args.settings.clone();
    if !settings_path.exists() {
        print_warning(&format!(
            "Settings file not found: {}",
            settings_path.display()
        ));
        print_info("Creating a placeholder settings file; fill it in before running again");
    }
    let mut settings = Settings::load_or_init(&settings_path)?;

    // Merge CLI arguments into settings
    args.merge_into_settings(&mut settings);

    // Validate settings
    validate_settings(&settings)?;

    // Print configuration summary
    print_config_summary(
        settings.format.as_str(),
        &settings.music_path.display().to_string(),
    );

    // Initialize API client
    print_info("Connecting to Bandcamp...");
    let api = BandcampApi::new(settings.identity.clone())?;

    let options = SyncOptions {
        fail_fast: args.fail_fast,
        show_progress: !args.quiet,
    };

    // Run the synchronization
    let report = sync_collection(&api, &mut settings, &settings_path, &options).await?;

    print_sync_summary(&report);

    Ok(report)
}
