use auto_merge_config::{AppConfig, AutoMergeError, ScheduleStore, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AutoMergeError> {
    let settings = Settings::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(repo_path) = &settings.repo_path {
        info!("Repository path: {}", repo_path.display());
    }

    let config = AppConfig::from_process_env();
    info!("Resolved apiBase: {}", config.api_base());

    let store = ScheduleStore::open(&settings.schedule_file);
    info!(
        "{} merge schedules in {}",
        store.list().len(),
        store.path().display()
    );

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
