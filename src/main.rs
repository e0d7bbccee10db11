use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use booking_page::console::{ConsoleClockView, ConsoleView};
use booking_page::handlers::events::dispatch;
use booking_page::models::draft::BookingDraft;
use booking_page::models::form::standard_booking_form;
use booking_page::services::dropdown::session_type_dropdown;
use booking_page::{
    BookingConfig, BookingController, ClockWidget, HttpBookingEndpoint, LocalClock, PageSession,
    SubmissionLifecycle,
};

#[derive(Debug, Parser)]
#[command(name = "booking_page", about = "Booking form and analog clock widgets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the analog clock, logging hand rotations every second
    Clock {
        /// Stop after this many ticks instead of running until interrupted
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Fill the booking form from a JSON draft and submit it
    Submit { draft: PathBuf },
    /// Load the whole page (form and clock), submit the draft and keep running
    Page { draft: PathBuf },
}

fn booking_controller(
    config: &BookingConfig,
) -> Result<BookingController<HttpBookingEndpoint, ConsoleView>> {
    let endpoint = HttpBookingEndpoint::new(config.request_timeout)
        .context("failed to build HTTP client")?;
    let form = standard_booking_form(&config.endpoint, Local::now().date_naive());

    Ok(BookingController::new(
        form,
        Some(session_type_dropdown()),
        endpoint,
        ConsoleView::default(),
        config.labels.clone(),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received interrupt signal, closing page");
        },
        _ = terminate => {
            info!("Received terminate signal, closing page");
        },
    }
}

async fn run_clock(ticks: Option<u64>) {
    let clock = ClockWidget::new(LocalClock, ConsoleClockView);

    match ticks {
        Some(_) => {
            clock.run(ticks).await;
        }
        None => {
            tokio::select! {
                _ = clock.run(None) => {},
                _ = shutdown_signal() => {},
            }
        }
    }
}

async fn run_submit(draft: PathBuf) -> Result<()> {
    let config = BookingConfig::from_env()?;
    let draft = BookingDraft::from_path(&draft)?;
    let mut controller = booking_controller(&config)?;

    let events = draft.events(&controller.state().form, controller.state().dropdown.as_ref());
    for event in events {
        dispatch(&mut controller, event).await;
    }

    match controller.lifecycle() {
        SubmissionLifecycle::Success => {
            // Let the success panel appear before exiting
            while let Some(deadline) = controller.next_deadline() {
                tokio::time::sleep_until(deadline).await;
                controller.run_due(tokio::time::Instant::now());
            }
            info!("Booking sent to {}", config.endpoint);
            Ok(())
        }
        _ => {
            let frame = controller.frame();
            if !frame.invalid_fields().is_empty() {
                bail!("booking incomplete: {}", frame.invalid_fields().join(", "));
            }
            bail!("booking was not accepted by {}", config.endpoint)
        }
    }
}

async fn run_page(draft: PathBuf) -> Result<()> {
    let config = BookingConfig::from_env()?;
    let draft = BookingDraft::from_path(&draft)?;
    let controller = booking_controller(&config)?;
    let events = draft.events(&controller.state().form, controller.state().dropdown.as_ref());

    let clock = ClockWidget::new(LocalClock, ConsoleClockView);
    let session = PageSession::start(Some(controller), Some(clock));

    let sender = session.events();
    for event in events {
        sender
            .send(event)
            .await
            .context("booking form stopped before the draft was delivered")?;
    }

    info!("Page is live, press Ctrl+C to close it");
    shutdown_signal().await;
    session.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    #[cfg(feature = "sentry-monitoring")]
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let cli = Cli::parse();

    match cli.command {
        Command::Clock { ticks } => {
            run_clock(ticks).await;
            Ok(())
        }
        Command::Submit { draft } => run_submit(draft).await,
        Command::Page { draft } => run_page(draft).await,
    }
}
