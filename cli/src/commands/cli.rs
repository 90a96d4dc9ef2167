use clap::{Args as ClapArgs, Parser, Subcommand};
use framecast_core::api::{AspectRatio, Resolution};

#[derive(Parser, Debug)]
#[command(
    name = "framecast",
    version,
    about = "Create and track remote video generation tasks"
)]
pub struct Args {
    /// Print results as JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configured providers.
    #[command(subcommand)]
    Provider(ProviderCommand),
    /// Submit a generation task and, unless --no-wait, poll it to completion.
    Generate(GenerateArgs),
    /// Query a task once.
    Status(TaskArgs),
    /// Poll an existing task to completion.
    Wait(TaskArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProviderCommand {
    Add(ProviderAddArgs),
    List,
    Remove(ProviderIdArgs),
    SetDefault(ProviderIdArgs),
    Update(ProviderUpdateArgs),
    Show(ProviderIdArgs),
    /// Remove every provider.
    Clear,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProviderIdArgs {
    pub id: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProviderAddArgs {
    /// volcengine, openai or runway. Only volcengine is implemented.
    #[arg(long = "type", default_value = "volcengine")]
    pub provider_type: String,

    #[arg(long)]
    pub api_key: String,

    /// Display name. Defaults to the provider type.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub relay_url: Option<String>,

    /// Make this the default provider.
    #[arg(long)]
    pub default: bool,

    #[command(flatten)]
    pub video: VideoArgs,

    #[command(flatten)]
    pub advanced: AdvancedArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProviderUpdateArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub relay_url: Option<String>,

    #[command(flatten)]
    pub video: VideoArgs,

    #[command(flatten)]
    pub advanced: AdvancedArgs,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct VideoArgs {
    #[arg(long)]
    pub resolution: Option<Resolution>,

    /// Seconds.
    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub ratio: Option<AspectRatio>,

    #[arg(long)]
    pub camera_fixed: Option<bool>,

    #[arg(long)]
    pub watermark: Option<bool>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct AdvancedArgs {
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    #[arg(long)]
    pub max_error_retries: Option<u32>,

    /// Overall wait cutoff. Unset means wait indefinitely.
    #[arg(long)]
    pub max_wait_ms: Option<u64>,

    #[arg(long)]
    pub request_timeout_ms: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long)]
    pub prompt: String,

    #[arg(long)]
    pub first_frame: Option<String>,

    #[arg(long)]
    pub last_frame: Option<String>,

    /// Provider id. Defaults to the registry default.
    #[arg(long)]
    pub provider: Option<String>,

    #[arg(long)]
    pub resolution: Option<Resolution>,

    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub ratio: Option<AspectRatio>,

    /// Print the task id and return without polling.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TaskArgs {
    pub task_id: String,

    #[arg(long)]
    pub provider: Option<String>,
}
