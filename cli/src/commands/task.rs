use framecast_core::api::{
    AppConfig, CliError, GenerationOptions, PollOptions, Poller, ProviderRegistry, TaskSnapshot,
    TaskStatus, VideoProvider,
};
use serde_json::json;
use tokio::sync::mpsc;

use super::cli::{GenerateArgs, TaskArgs};
use crate::progress::TaskSpinner;

pub async fn handle_generate(
    args: GenerateArgs,
    registry: &ProviderRegistry,
    cfg: &AppConfig,
    json_output: bool,
) -> Result<i32, CliError> {
    let provider = registry.resolve(args.provider.as_deref())?;

    let mut options =
        GenerationOptions::text(args.prompt).with_frames(args.first_frame, args.last_frame);
    options.resolution = args.resolution;
    options.duration = args.duration;
    options.ratio = args.ratio;

    let handle = provider.create_task(&options).await?;
    tracing::info!(
        target: "framecast.cli",
        stage = "cli.generate.created",
        provider = provider.name(),
        task_id = %handle.id,
        no_wait = args.no_wait
    );
    if args.no_wait {
        if json_output {
            println!("{}", json!({ "id": handle.id }));
        } else {
            println!("{}", handle.id);
        }
        return Ok(0);
    }

    wait_and_report(provider.as_ref(), &handle.id, cfg, json_output).await
}

pub async fn handle_status(
    args: TaskArgs,
    registry: &ProviderRegistry,
    json_output: bool,
) -> Result<i32, CliError> {
    let provider = registry.resolve(args.provider.as_deref())?;
    let snapshot = provider.get_task_status(&args.task_id).await?;
    print_snapshot(&snapshot, json_output)?;
    Ok(0)
}

pub async fn handle_wait(
    args: TaskArgs,
    registry: &ProviderRegistry,
    cfg: &AppConfig,
    json_output: bool,
) -> Result<i32, CliError> {
    let provider = registry.resolve(args.provider.as_deref())?;
    wait_and_report(provider.as_ref(), &args.task_id, cfg, json_output).await
}

async fn wait_and_report(
    provider: &dyn VideoProvider,
    task_id: &str,
    cfg: &AppConfig,
    json_output: bool,
) -> Result<i32, CliError> {
    let options = PollOptions::resolve(&cfg.poll, &provider.config().advanced);
    let spinner = TaskSpinner::new(task_id, !json_output && atty::is(atty::Stream::Stderr));

    let (abort_tx, abort_rx) = mpsc::channel::<String>(1);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!(
                target: "framecast.cli",
                stage = "cli.abort",
                "ctrl-c received, stopping poll"
            );
            let _ = abort_tx.send("interrupted by user".to_string()).await;
        }
    });

    let result = Poller::new(provider, options)
        .on_progress(|snapshot| spinner.update(snapshot))
        .with_abort(abort_rx)
        .run(task_id)
        .await;
    ctrl_c.abort();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            spinner.abandon(&err.to_string());
            return Err(err.into());
        }
    };

    spinner.finish(&outcome.snapshot);
    print_snapshot(&outcome.snapshot, json_output)?;

    if outcome.succeeded() {
        return Ok(0);
    }

    let message = outcome
        .snapshot
        .error
        .clone()
        .unwrap_or_else(|| "no error message reported".to_string());
    tracing::error!(
        target: "framecast.cli",
        stage = "cli.task_failed",
        provider = provider.name(),
        task_id = %outcome.snapshot.id,
        queries = outcome.queries,
        error = %message
    );
    Err(CliError::TaskFailed {
        task_id: outcome.snapshot.id.clone(),
        message,
    })
}

pub(crate) fn render_snapshot(snapshot: &TaskSnapshot) -> String {
    match (&snapshot.status, &snapshot.video_url) {
        (TaskStatus::Succeeded, Some(url)) => url.clone(),
        (TaskStatus::Failed, _) => format!(
            "{} failed: {}",
            snapshot.id,
            snapshot.error.as_deref().unwrap_or("unknown error")
        ),
        (status, _) => format!("{} {}", snapshot.id, status),
    }
}

fn print_snapshot(snapshot: &TaskSnapshot, json_output: bool) -> Result<(), CliError> {
    if json_output {
        let text = serde_json::to_string_pretty(snapshot).map_err(anyhow::Error::from)?;
        println!("{text}");
    } else {
        println!("{}", render_snapshot(snapshot));
    }
    Ok(())
}
