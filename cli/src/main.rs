use std::sync::Arc;

use clap::Parser;
use framecast_cli::commands::{cli, provider, task};
use framecast_core::api::{
    AppConfig, CliError, JsonFileStore, PollError, ProviderError, ProviderRegistry, RegistryError,
};
use framecast_plugins::PluginProviderFactory;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = framecast_core::api::load_default().map_err(|e| CliError::Config(e.to_string()))?;
    framecast_cli::logging::init(&cfg.logging)
        .map_err(|e| CliError::Config(format!("{e:#}")))?;

    let mut registry = ProviderRegistry::load(
        Arc::new(PluginProviderFactory),
        Box::new(JsonFileStore::new(&cfg.registry.store_path)),
    );

    dispatch(args, &cfg, &mut registry).await
}

async fn dispatch(
    args: cli::Args,
    cfg: &AppConfig,
    registry: &mut ProviderRegistry,
) -> Result<i32, CliError> {
    let json_output = args.json;
    match args.command {
        cli::Commands::Provider(cmd) => provider::handle_provider(cmd, registry, json_output),
        cli::Commands::Generate(gen_args) => {
            task::handle_generate(gen_args, registry, cfg, json_output).await
        }
        cli::Commands::Status(task_args) => {
            task::handle_status(task_args, registry, json_output).await
        }
        cli::Commands::Wait(task_args) => {
            task::handle_wait(task_args, registry, cfg, json_output).await
        }
    }
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: IO / network error
    // 30: task reached the failed state
    // 40: polling exhausted or timed out
    // 50: internal/uncategorized
    // 130: aborted by the user
    match e {
        CliError::Config(_) => 11,
        CliError::Registry(re) => match re {
            RegistryError::UnsupportedProviderType(_)
            | RegistryError::ProviderNotFound(_)
            | RegistryError::NoDefaultConfigured
            | RegistryError::DefaultProviderMissing(_)
            | RegistryError::InvalidConfig(_) => 11,
        },
        CliError::Provider(pe) => provider_exit_code(pe),
        CliError::Poll(pe) => match pe {
            PollError::Config(_) => 11,
            PollError::PollingExhausted { .. } | PollError::TimedOut { .. } => 40,
            PollError::Aborted(_) => 130,
        },
        CliError::TaskFailed { .. } => 30,
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn provider_exit_code(e: &ProviderError) -> i32 {
    match e {
        ProviderError::Config(_) => 11,
        ProviderError::Network { .. } | ProviderError::Remote { .. } => 20,
        ProviderError::Decode(_) => 50,
    }
}
