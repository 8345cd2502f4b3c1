//! attendeez: the events site in the terminal
//!
//! Usage:
//!   attendeez events            - List events
//!   attendeez event <id>        - Show one event
//!   attendeez rsvp <id> ...     - Register for an event
//!   attendeez --help            - Show help

mod cli;

use anyhow::{Context, bail};
use attendeez_core::environment::SystemClock;
use attendeez_runtime::Store;
use attendeez_site::api::{EventsApi, HttpEventsApi, InMemoryEventsApi};
use attendeez_site::dates;
use attendeez_site::detail::{DetailAction, DetailReducer, DetailState};
use attendeez_site::directory::{Bucket, DirectoryAction, DirectoryReducer, DirectoryState};
use attendeez_site::render;
use attendeez_site::rsvp::{Field, Mode, RsvpAction, RsvpReducer, RsvpState};
use attendeez_site::types::{EventId, RsvpDraft};
use attendeez_site::{Config, Route, SiteEnvironment};
use cli::{RsvpArgs, RunMode};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Upper bound on waiting for the clipboard acknowledgment
const SHARE_WAIT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let invocation = match cli::parse_args(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(usage) => {
            eprintln!("{usage}");
            eprintln!("Run `attendeez help` for usage.");
            std::process::exit(2);
        },
    };

    match invocation.mode {
        RunMode::Help => {
            cli::print_help();
            return Ok(());
        },
        RunMode::Version => {
            println!("attendeez {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        },
        _ => {},
    }

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Config error")?;
    config.validate().context("Config error")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_level.parse()?))
        .init();

    let api: Arc<dyn EventsApi> = if invocation.demo || config.demo {
        let today = dates::local_now(&SystemClock, config.site.utc_offset).date();
        tracing::info!(%today, "Using the built-in sample events");
        Arc::new(InMemoryEventsApi::sample(today))
    } else {
        tracing::debug!(base_url = %config.api.base_url, "Using the events API");
        Arc::new(HttpEventsApi::from_config(&config).context("Failed to create API client")?)
    };
    let env = SiteEnvironment::from_config(&config, api);

    match invocation.mode {
        RunMode::Events { search, bucket } => run_directory(env, search, bucket).await,
        RunMode::Event { id, share } => run_detail(env, id, share).await,
        RunMode::Rsvp(args) => run_rsvp(env, args).await,
        RunMode::Open(route) => match route {
            Route::Directory => run_directory(env, None, Bucket::All).await,
            Route::Event(id) => run_detail(env, id, false).await,
            Route::Rsvp(id) => run_rsvp(env, RsvpArgs::new(id)).await,
        },
        RunMode::Help | RunMode::Version => Ok(()),
    }
}

async fn run_directory(
    env: SiteEnvironment,
    search: Option<String>,
    bucket: Bucket,
) -> anyhow::Result<()> {
    let store = Store::new(DirectoryState::default(), DirectoryReducer::new(), env.clone());

    store.send(DirectoryAction::Mount).await?.wait().await;
    if let Some(query) = search {
        store.send(DirectoryAction::QueryChanged { query }).await?;
    }
    store.send(DirectoryAction::BucketSelected { bucket }).await?;

    let now = env.now();
    println!("{}", store.state(|s| render::directory(s, now)).await);
    store.shutdown();
    Ok(())
}

async fn run_detail(env: SiteEnvironment, id: EventId, share: bool) -> anyhow::Result<()> {
    let store = Store::new(DetailState::default(), DetailReducer::new(), env.clone());

    store.send(DetailAction::Mount { id }).await?.wait().await;

    if share && store.state(|s| s.event().is_some()).await {
        let mut actions = store.subscribe_actions();
        store.send(DetailAction::Share).await?;

        let acknowledged = tokio::time::timeout(SHARE_WAIT, async {
            while let Ok(action) = actions.recv().await {
                if matches!(action, DetailAction::LinkCopied { .. }) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        if !acknowledged {
            tracing::warn!("Share link was not acknowledged");
        }
    }

    let now = env.now();
    let (text, missing) = store
        .state(|s| (render::detail(s, now), s.is_not_found()))
        .await;
    println!("{text}");
    store.shutdown();

    if missing {
        bail!("Event not found");
    }
    Ok(())
}

async fn run_rsvp(env: SiteEnvironment, args: RsvpArgs) -> anyhow::Result<()> {
    let store = Store::new(RsvpState::default(), RsvpReducer::new(), env.clone());
    let now = env.now();

    store.send(RsvpAction::Mount { id: args.id.clone() }).await?.wait().await;
    if store.state(RsvpState::is_not_found).await {
        println!("{}", store.state(|s| render::rsvp(s, now)).await);
        bail!("Event not found");
    }

    if let Some(query) = args.returning {
        store.send(RsvpAction::SwitchMode { mode: Mode::Returning }).await?;
        store.send(RsvpAction::SearchChanged { query }).await?.wait().await;

        let Some(pick) = args.pick else {
            // No choice yet: show the matches and stop
            println!("{}", store.state(|s| render::rsvp(s, now)).await);
            return Ok(());
        };

        let attendee = store
            .state(|s| {
                s.form()
                    .and_then(|form| form.search.results.get(pick - 1).cloned())
            })
            .await
            .with_context(|| format!("No search result #{pick}"))?;
        store.send(RsvpAction::PickAttendee { attendee }).await?;
    }

    for (field, value) in [
        (Field::Name, args.name),
        (Field::Email, args.email),
        (Field::Contact, args.contact),
    ] {
        if let Some(value) = value {
            store.send(RsvpAction::EditField { field, value }).await?;
        }
    }
    if let Some(status) = args.status {
        store.send(RsvpAction::SelectStatus { status }).await?;
    }

    let interactive = args.pick.is_none()
        && store
            .state(|s| s.form().is_some_and(|form| form.draft == RsvpDraft::default()))
            .await;
    if interactive {
        // Nothing filled in: just show the form
        println!("{}", store.state(|s| render::rsvp(s, now)).await);
        return Ok(());
    }

    store.send(RsvpAction::Submit).await?.wait().await;

    let (text, confirmed) = store
        .state(|s| (render::rsvp(s, now), s.confirmation().is_some()))
        .await;
    println!("{text}");
    store.shutdown();

    if !confirmed {
        bail!("RSVP was not submitted");
    }
    Ok(())
}
