use framecast_core::api::{
    AdvancedConfig, CliError, ProviderConfig, ProviderConfigPatch, ProviderRegistry,
    ProviderType, StoredProviderConfig, VideoConfig,
};
use serde_json::json;

use super::cli::{AdvancedArgs, ProviderAddArgs, ProviderCommand, ProviderUpdateArgs, VideoArgs};

pub fn handle_provider(
    cmd: ProviderCommand,
    registry: &mut ProviderRegistry,
    json_output: bool,
) -> Result<i32, CliError> {
    match cmd {
        ProviderCommand::Add(args) => {
            let id = add(registry, args)?;
            let stored = registry.info(&id)?;
            print_entry(stored, json_output)?;
        }
        ProviderCommand::List => {
            if json_output {
                let entries: Vec<_> = registry.list().iter().map(redacted).collect();
                println!("{}", to_pretty(&entries)?);
            } else if registry.list().is_empty() {
                println!("no providers configured");
            } else {
                for stored in registry.list() {
                    println!("{}", summary_line(stored));
                }
            }
            if !json_output {
                println!("{}", types_line(registry));
            }
        }
        ProviderCommand::Remove(args) => {
            let removed = registry.remove(&args.id)?;
            if json_output {
                println!("{}", json!({ "removed": removed.id }));
            } else {
                println!("removed {}", removed.id);
            }
        }
        ProviderCommand::SetDefault(args) => {
            registry.set_default(&args.id)?;
            if json_output {
                println!("{}", json!({ "default": args.id }));
            } else {
                println!("default provider is now {}", args.id);
            }
        }
        ProviderCommand::Update(args) => {
            let id = args.id.clone();
            let patch = patch_from(args);
            if patch.is_empty() {
                return Err(CliError::Command("nothing to update".into()));
            }
            registry.update(&id, &patch)?;
            print_entry(registry.info(&id)?, json_output)?;
        }
        ProviderCommand::Show(args) => {
            print_entry(registry.info(&args.id)?, json_output)?;
        }
        ProviderCommand::Clear => {
            let count = registry.list().len();
            registry.clear();
            if json_output {
                println!("{}", json!({ "cleared": count }));
            } else {
                println!("removed {count} provider(s)");
            }
        }
    }
    Ok(0)
}

fn add(registry: &mut ProviderRegistry, args: ProviderAddArgs) -> Result<String, CliError> {
    let provider_type = ProviderType::from(args.provider_type.as_str());
    let mut video_config = VideoConfig::recommended();
    video_config.merge(&video_from(&args.video));

    let config = ProviderConfig {
        api_key: args.api_key,
        endpoint: args.endpoint,
        model: args.model,
        relay_url: args.relay_url,
        video_config,
        advanced: advanced_from(&args.advanced),
    };
    let name = args.name.unwrap_or_else(|| provider_type.to_string());
    // The first provider becomes the default even without --default.
    let is_default = args.default || registry.default_id().is_none();

    Ok(registry.add(provider_type, config, name, is_default)?)
}

fn patch_from(args: ProviderUpdateArgs) -> ProviderConfigPatch {
    ProviderConfigPatch {
        name: args.name,
        api_key: args.api_key,
        endpoint: args.endpoint,
        model: args.model,
        relay_url: args.relay_url,
        video_config: video_from(&args.video),
        advanced: advanced_from(&args.advanced),
    }
}

fn video_from(args: &VideoArgs) -> VideoConfig {
    VideoConfig {
        resolution: args.resolution,
        duration: args.duration,
        ratio: args.ratio,
        camera_fixed: args.camera_fixed,
        watermark: args.watermark,
    }
}

fn advanced_from(args: &AdvancedArgs) -> AdvancedConfig {
    AdvancedConfig {
        poll_interval: args.poll_interval_ms,
        max_error_retries: args.max_error_retries,
        max_wait_time: args.max_wait_ms,
        request_timeout: args.request_timeout_ms,
    }
}

/// Keep a recognizable prefix only.
pub(crate) fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

fn redacted(stored: &StoredProviderConfig) -> StoredProviderConfig {
    let mut out = stored.clone();
    out.config.api_key = mask_key(&stored.config.api_key);
    out
}

fn summary_line(stored: &StoredProviderConfig) -> String {
    let marker = if stored.is_default { "*" } else { " " };
    format!(
        "{marker} {:<28} {:<11} {:<16} {}",
        stored.id,
        stored.provider_type,
        stored.name,
        stored.config.model()
    )
}

fn types_line(registry: &ProviderRegistry) -> String {
    let factory = registry.factory();
    let types: Vec<String> = factory
        .supported_types()
        .iter()
        .map(|ty| {
            if factory.is_implemented(ty) {
                ty.to_string()
            } else {
                format!("{ty} (not implemented)")
            }
        })
        .collect();
    format!("provider types: {}", types.join(", "))
}

fn print_entry(stored: &StoredProviderConfig, json_output: bool) -> Result<(), CliError> {
    if json_output {
        println!("{}", to_pretty(&redacted(stored))?);
        return Ok(());
    }

    let cfg = &stored.config;
    println!("id:        {}", stored.id);
    println!("type:      {}", stored.provider_type);
    println!("name:      {}", stored.name);
    println!("default:   {}", stored.is_default);
    println!("api key:   {}", mask_key(&cfg.api_key));
    println!("endpoint:  {}", cfg.endpoint());
    println!("model:     {}", cfg.model());
    if let Some(relay) = &cfg.relay_url {
        println!("relay:     {relay}");
    }
    println!("video:     {}", to_compact(&cfg.video_config)?);
    println!("advanced:  {}", to_compact(&cfg.advanced)?);
    Ok(())
}

fn to_compact<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string(value).map_err(anyhow::Error::from)?)
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?)
}
