mod config;

use anyhow::Result;
use serde_json::Value;
use trufactor::{DataSource, DataSourceError, DemoDataSource, HookPoint, Hooks, Operation};

use crate::config::{Config, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = Config::from_env_and_args()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("trufactor={}", config.log_level).parse()?),
        )
        .init();

    let source = config.source.builder().build()?;

    if config.output.hooks {
        attach_logging_hooks(source.hooks());
    }

    run_demo(&source, config.output).await
}

fn attach_logging_hooks(hooks: &Hooks) {
    hooks.set_before_get_data(|| {
        tracing::info!(hook = %HookPoint::BeforeGetData, "hook fired");
        Ok(())
    });
    hooks.set_before_strategy(|| {
        tracing::info!(hook = %HookPoint::BeforeStrategy, "hook fired");
        Ok(())
    });
    hooks.set_after_strategy(|dataset| {
        tracing::info!(
            hook = %HookPoint::AfterStrategy,
            features = dataset.features.len(),
            "hook fired"
        );
        Ok(())
    });
    hooks.set_before_supplementary(|features| {
        tracing::info!(
            hook = %HookPoint::BeforeSupplementary,
            features = features.len(),
            "hook fired"
        );
        Ok(())
    });
    hooks.set_before_caching(|set| {
        tracing::info!(
            hook = %HookPoint::BeforeCaching,
            features = set.features.len(),
            "hook fired"
        );
        Ok(())
    });
    hooks.set_after_caching(|set| {
        tracing::info!(
            hook = %HookPoint::AfterCaching,
            features = set.features.len(),
            "hook fired"
        );
        Ok(())
    });
    hooks.set_after_supplementary(|dataset| {
        tracing::info!(
            hook = %HookPoint::AfterSupplementary,
            features = dataset.features.len(),
            "hook fired"
        );
        Ok(())
    });
    hooks.set_after_get_data(|dataset| {
        tracing::info!(
            hook = %HookPoint::AfterGetData,
            features = dataset.features.len(),
            "hook fired"
        );
        Ok(())
    });
}

async fn run_demo(source: &DemoDataSource, output: OutputConfig) -> Result<()> {
    tracing::info!("Waiting for the demo data source to become ready");
    source.loaded().await;

    tracing::info!("Fetching data for {}", source.selected_date());
    let dataset = source.get_data().await?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&*dataset)?);
        return Ok(());
    }

    let dates: Vec<String> = source
        .dates_available()
        .iter()
        .map(ToString::to_string)
        .collect();

    println!("Trufactor demo");
    println!();
    println!("Domain:        {}", source.domain());
    println!("Dates:         {}", dates.join(", "));
    println!("Selected date: {}", source.selected_date());
    println!("Progress:      {}%", source.progress());
    println!(
        "Filters:       {}",
        serde_json::to_string(source.default_filters())?
    );
    println!("Features:      {}", dataset.features.len());
    for feature in &dataset.features {
        let name = feature
            .property("name")
            .and_then(Value::as_str)
            .unwrap_or("(unnamed)");
        println!("  {:<10} {}", feature.id().unwrap_or("-"), name);
    }
    println!();

    let next = source.next_date();
    let previous = source.previous_date();
    println!("Date navigation: next -> {next}, previous -> {previous}");
    println!();

    println!("Backend operations:");
    for operation in Operation::ALL {
        match source.invoke(operation) {
            Ok(_) => println!("  {:<20} available", operation.name()),
            Err(DataSourceError::UnsupportedInDemoMode { .. }) => {
                println!("  {:<20} not available in demo mode", operation.name())
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
