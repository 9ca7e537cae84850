//! Comic client binary.
//!
//! Requests a comic from the API, then waits for its images, printing each
//! panel as soon as its image is ready. Ctrl-C stops polling.

use std::process;
use std::sync::Arc;

use clap::Parser;
use comicgen_client::cli::Cli;
use comicgen_client::render::{render_captions, render_event, render_summary};
use comicgen_client::{ComicApiClient, HttpStatusSource};
use comicgen_pipeline::{PollEvent, PollOutcome, PollingController};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comicgen_client=info,comicgen_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api = ComicApiClient::new(&cli.api_url);
    tracing::info!(api_url = %api.base_url(), "Requesting comic");

    let comic = match api.create_comic(&cli.prompt).await {
        Ok(comic) => comic,
        Err(e) => {
            tracing::error!(error = %e, "Comic request failed");
            eprintln!("Failed to generate comic: {e}");
            process::exit(1);
        }
    };

    print!("{}", render_captions(&comic));
    println!("Waiting for images...");

    let controller = PollingController::new(
        Arc::new(HttpStatusSource::new(api.clone())),
        cli.poll_config(),
    );
    let mut events = controller.subscribe();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, stopping");
            ctrl_c.cancel();
        }
    });

    let printer_comic = comic.clone();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(PollEvent::Finished { .. }) | Err(RecvError::Closed) => break,
                Ok(event) => {
                    if let Some(line) = render_event(&event, &printer_comic) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dropped progress events");
                }
            }
        }
    });

    let report = controller.run(&comic, cancel).await;
    let _ = printer.await;

    if cli.json {
        match serde_json::to_string_pretty(&report.panels) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize panels"),
        }
    } else {
        print!("{}", render_summary(&report.panels));
    }

    if let Some(message) = report.outcome.user_message() {
        eprintln!("{message}");
    }

    let code = match report.outcome {
        PollOutcome::Completed => 0,
        PollOutcome::Cancelled => 130,
        PollOutcome::Failed(_) | PollOutcome::TimedOut => 1,
    };
    process::exit(code);
}
