//! CLI argument parsing with clap derive

use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use waker_common::{Action, ControlResponse};

use crate::client::{ControlApi, HttpControlClient, REQUEST_TIMEOUT};
use crate::output::Printer;
use crate::wait::{self, WaitOptions, WakeEvent};

/// Wake, stop and check the managed instance behind a waker endpoint
#[derive(Parser)]
#[command(
    name = "waker",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Control endpoint URL
    #[arg(long, global = true, env = "WAKER_URL")]
    pub url: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT.as_secs())]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the instance state and address
    Status,

    /// Request a start (returns immediately)
    Start,

    /// Request a stop
    Stop,

    /// Start the instance and wait until it is running
    Wake {
        /// Seconds between status polls
        #[arg(
            long,
            default_value_t = wait::DEFAULT_POLL_INTERVAL.as_secs(),
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        poll_interval: u64,

        /// Give up after this many seconds
        #[arg(long, default_value_t = wait::DEFAULT_MAX_WAIT.as_secs())]
        max_wait: u64,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if no endpoint is configured, the endpoint cannot be
    /// reached, or the controller answers with a non-2xx status.
    pub fn run(self) -> Result<()> {
        let Cli {
            url,
            json,
            timeout,
            command,
        } = self;
        let Some(url) = url else {
            bail!("no endpoint configured: pass --url or set WAKER_URL");
        };
        let client = HttpControlClient::new(url, Duration::from_secs(timeout));
        let printer = Printer::new(json);

        match command {
            Command::Status => single(&client, &printer, Action::Status),
            Command::Start => single(&client, &printer, Action::Start),
            Command::Stop => single(&client, &printer, Action::Stop),
            Command::Wake {
                poll_interval,
                max_wait,
            } => {
                let options = WaitOptions {
                    poll_interval: Duration::from_secs(poll_interval),
                    max_wait: Duration::from_secs(max_wait),
                };
                let ready = wait::wake(&client, options, std::thread::sleep, |event| {
                    report(&printer, &event);
                })?;
                printer.response(&ready);
                Ok(())
            }
        }
    }
}

fn single(client: &impl ControlApi, printer: &Printer, action: Action) -> Result<()> {
    let response = client.send(action)?;
    printer.response(&response);
    ensure_success(&response)
}

fn ensure_success(response: &ControlResponse) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        bail!("controller answered HTTP {}", response.status_code)
    }
}

fn report(printer: &Printer, event: &WakeEvent<'_>) {
    match event {
        WakeEvent::Started(res) => {
            let note = res.message.as_deref().unwrap_or("start requested");
            match res.estimated_seconds {
                Some(secs) => printer.progress(&format!("{note}, typically ready in ~{secs}s")),
                None => printer.progress(note),
            }
        }
        WakeEvent::Polled(res) => {
            let state = res
                .status
                .as_ref()
                .map_or_else(|| "unknown".to_string(), ToString::to_string);
            printer.progress(&format!("instance is {state}"));
        }
        WakeEvent::PollFailed(err) => printer.warn(&format!("status check failed: {err}")),
    }
}
