use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, bail};
use futures::future::join_all;
use image_manager::{
    AppState,
    background_task::refresh_on_upload,
    files::load_candidate,
    graceful_shutdown::shutdown_signal,
    http::gateway::HttpApiGateway,
    logging::init_tracing,
    notifications::Notifier,
    presenters::present_image_row,
    settings::AppConfig,
    use_cases::listing::ImageListingStore,
};

const USAGE: &str = "\
Usage:
  image-manager list
  image-manager upload <path>
  image-manager delete <image-id>...";

enum Command {
    List,
    Upload(PathBuf),
    Delete(Vec<String>),
}

impl Command {
    fn parse(mut args: pico_args::Arguments) -> anyhow::Result<Self> {
        let subcommand = args.subcommand()?.unwrap_or_default();
        let rest: Vec<String> = args
            .finish()
            .into_iter()
            .filter_map(|s| s.into_string().ok())
            .collect();

        match (subcommand.as_str(), rest.as_slice()) {
            ("list", []) => Ok(Command::List),
            ("upload", [path]) => Ok(Command::Upload(PathBuf::from(path))),
            ("delete", ids) if !ids.is_empty() => Ok(Command::Delete(ids.to_vec())),
            _ => bail!("Invalid arguments"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let command = match Command::parse(pico_args::Arguments::from_env()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    let config = AppConfig::new().context("Configuration error")?;
    init_tracing(config.log_format);
    tracing::info!("Loaded configuration: {:?}", config);

    let gateway = HttpApiGateway::from_config(&config)?;
    let (notifier, mut notifications) = Notifier::channel();
    let state = AppState::new(gateway, notifier);

    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            if notification.is_failure() {
                eprintln!("{}", notification);
            } else {
                println!("{}", notification);
            }
        }
    });

    let succeeded = tokio::select! {
        res = run(state, command) => res?,
        _ = shutdown_signal() => false,
    };

    // Every notifier clone is gone by now, so the printer drains and stops.
    printer.await.ok();

    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run(state: AppState, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::List => {
            let loaded = state.listing.refresh().await.is_ok();
            print_listing(&state.listing);
            Ok(loaded)
        }
        Command::Upload(path) => {
            let file = load_candidate(&path).await?;
            let AppState { uploader, listing } = state;

            let refresher = tokio::spawn(refresh_on_upload(listing.clone(), uploader.subscribe()));

            uploader.select(file);
            if let Some(reason) = uploader.acceptance().reason() {
                eprintln!("{}", reason);
            }
            let uploaded = uploader.submit().await.is_ok();

            // Closing the uploaded channel lets the refresher finish.
            drop(uploader);
            refresher.await?;

            if uploaded {
                print_listing(&listing);
            }
            Ok(uploaded)
        }
        Command::Delete(ids) => {
            if state.listing.refresh().await.is_err() {
                return Ok(false);
            }

            let results = join_all(ids.iter().map(|id| state.listing.delete(id))).await;
            Ok(results.iter().all(|r| r.is_ok()))
        }
    }
}

fn print_listing(listing: &ImageListingStore<HttpApiGateway>) {
    if listing.is_empty() {
        println!("No images uploaded yet");
        return;
    }

    for record in listing.records() {
        println!("{}", present_image_row(&record));
    }
}
