use assistant_migrate::utils::{logger, validation::Validate};
use assistant_migrate::{
    AzureDestination, CliConfig, MigrateError, MigrationEngine, Migrator, OpenAiSource,
    ScratchStorage,
};
use clap::Parser;

fn exit_with(e: &MigrateError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

fn build_components(
    config: &CliConfig,
) -> Result<(OpenAiSource, AzureDestination, ScratchStorage), MigrateError> {
    let source = OpenAiSource::new(&config.openai_settings()?)?;
    let destination = AzureDestination::new(&config.azure_settings()?)?;
    let storage = ScratchStorage::new()?;
    Ok((source, destination, storage))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting assistant-migrate");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let (source, destination, storage) = match build_components(&config) {
        Ok(parts) => parts,
        Err(e) => exit_with(&e),
    };

    let migrator = Migrator::new(source, destination, storage, config.migration_options());
    let engine = MigrationEngine::new_with_monitoring(migrator, config.monitor);

    if config.dry_run {
        let plan = match engine.plan().await {
            Ok(plan) => plan,
            Err(e) => exit_with(&e),
        };

        println!("Would migrate {} assistants:", plan.len());
        for item in &plan {
            println!(
                "- {} ({}) model {} → {} with {} files",
                item.source_id,
                item.name.as_deref().unwrap_or("unnamed"),
                item.source_model,
                item.destination_model.as_deref().unwrap_or("<no deployment>"),
                item.file_count
            );
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            tracing::info!("Migration completed!");
            tracing::info!(
                "Finished in {}s",
                (report.finished_at - report.started_at).num_seconds()
            );
            println!("{}", report);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
