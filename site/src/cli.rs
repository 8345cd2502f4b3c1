//! Command-line parsing for the `attendeez` binary.

use attendeez_site::Route;
use attendeez_site::directory::Bucket;
use attendeez_site::types::{AttendeeStatus, EventId};

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// List events
    Events {
        /// Free-text filter
        search: Option<String>,
        /// Upcoming/past selector
        bucket: Bucket,
    },
    /// Show one event
    Event {
        /// Event id
        id: EventId,
        /// Copy the share link
        share: bool,
    },
    /// Register for an event
    Rsvp(RsvpArgs),
    /// Dispatch by path
    Open(Route),
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Arguments of `attendeez rsvp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpArgs {
    /// Event id
    pub id: EventId,
    /// Full name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub contact: Option<String>,
    /// Attendee status
    pub status: Option<AttendeeStatus>,
    /// Search returning attendees by name
    pub returning: Option<String>,
    /// 1-based index of the search result to pick
    pub pick: Option<usize>,
}

impl RsvpArgs {
    /// Just the event; shows the empty form
    pub const fn new(id: EventId) -> Self {
        Self {
            id,
            name: None,
            email: None,
            contact: None,
            status: None,
            returning: None,
            pick: None,
        }
    }
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Subcommand
    pub mode: RunMode,
    /// Use the built-in sample backend
    pub demo: bool,
}

fn value(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn positional_id(command: &str, args: &mut impl Iterator<Item = String>) -> Result<EventId, String> {
    match args.next() {
        Some(id) if !id.starts_with("--") => Ok(EventId::new(id)),
        _ => Err(format!("{command} needs an event id")),
    }
}

/// Parse the arguments after the program name.
///
/// `--demo` may appear anywhere. No arguments means `events`.
///
/// # Errors
///
/// Returns a usage message for unknown commands or flags, missing values
/// and malformed values.
pub fn parse_args<I>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
{
    let mut demo = false;
    let mut rest = Vec::new();
    for arg in args {
        if arg == "--demo" {
            demo = true;
        } else {
            rest.push(arg);
        }
    }

    let mut args = rest.into_iter();
    let mode = match args.next().as_deref() {
        None | Some("events") => {
            let mut search = None;
            let mut bucket = Bucket::All;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--search" | "-s" => search = Some(value(&flag, &mut args)?),
                    "--filter" | "-f" => {
                        bucket = value(&flag, &mut args)?
                            .parse()
                            .map_err(|e| format!("{e}"))?;
                    },
                    other => return Err(format!("Unknown option for events: {other}")),
                }
            }
            RunMode::Events { search, bucket }
        },
        Some("event") => {
            let id = positional_id("event", &mut args)?;
            let mut share = false;
            for flag in args.by_ref() {
                match flag.as_str() {
                    "--share" => share = true,
                    other => return Err(format!("Unknown option for event: {other}")),
                }
            }
            RunMode::Event { id, share }
        },
        Some("rsvp") => {
            let mut rsvp = RsvpArgs::new(positional_id("rsvp", &mut args)?);
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--name" => rsvp.name = Some(value(&flag, &mut args)?),
                    "--email" => rsvp.email = Some(value(&flag, &mut args)?),
                    "--contact" => rsvp.contact = Some(value(&flag, &mut args)?),
                    "--status" => {
                        rsvp.status = Some(
                            value(&flag, &mut args)?
                                .parse()
                                .map_err(|e| format!("{e}"))?,
                        );
                    },
                    "--returning" => rsvp.returning = Some(value(&flag, &mut args)?),
                    "--pick" => {
                        let raw = value(&flag, &mut args)?;
                        match raw.parse::<usize>() {
                            Ok(n) if n >= 1 => rsvp.pick = Some(n),
                            _ => return Err(format!("--pick expects a result number, got {raw}")),
                        }
                    },
                    other => return Err(format!("Unknown option for rsvp: {other}")),
                }
            }
            RunMode::Rsvp(rsvp)
        },
        Some("open") => {
            let path = value("open", &mut args)?;
            RunMode::Open(path.parse().map_err(|e| format!("{e}"))?)
        },
        Some("help" | "--help" | "-h") => RunMode::Help,
        Some("version" | "--version" | "-v") => RunMode::Version,
        Some(other) => return Err(format!("Unknown command: {other}")),
    };

    Ok(Invocation { mode, demo })
}

/// Print help message
pub fn print_help() {
    println!("attendeez - events site in the terminal");
    println!();
    println!("Usage:");
    println!("  attendeez events [--search TEXT] [--filter all|upcoming|past]");
    println!("  attendeez event <id> [--share]");
    println!("  attendeez rsvp <id> --name NAME --email EMAIL [--contact PHONE]");
    println!("                 [--status student|working|other] [--returning NAME [--pick N]]");
    println!("  attendeez open <path>        Open /, /event/<id> or /rsvp/<id>");
    println!("  attendeez help | version");
    println!();
    println!("Options:");
    println!("  --demo                       Use the built-in sample events instead of the API");
    println!();
    println!("Environment Variables:");
    println!("  ATTENDEEZ_API_URL              Backend base URL (default: http://localhost:5000)");
    println!("  ATTENDEEZ_PUBLIC_URL           Base of shared links (default: API URL)");
    println!("  ATTENDEEZ_REQUEST_TIMEOUT_SECS Request timeout (default: 10)");
    println!("  ATTENDEEZ_SEARCH_DEBOUNCE_MS   Attendee search debounce (default: 0)");
    println!("  ATTENDEEZ_UTC_OFFSET           Offset of event times, e.g. +02:00 (default: local)");
    println!("  ATTENDEEZ_LOG_LEVEL            Log filter (default: info)");
    println!("  ATTENDEEZ_DEMO                 Same as --demo");
}
