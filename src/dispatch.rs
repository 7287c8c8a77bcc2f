// Command dispatcher: picks the action from the parsed options, checks its
// preconditions, sends the single request through `ApiClient` and reports
// the response. Result text goes to `out` (stdout in the binary), logs go
// through the `Logger` handle.

use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiOutcome, ApiResponse, Payload, PublicKeyRecord};
use crate::cli::{Action, Options};
use crate::error::KeysError;
use crate::keyfile;
use crate::logging::Logger;

pub const NO_ACTION: &str = "No response to print, did you specify an action to take?";

/// How the process should exit after a run that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Usage,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::Usage => 1,
        }
    }
}

pub struct Dispatcher<'a, W: Write> {
    client: &'a ApiClient,
    logger: &'a Logger,
    out: W,
}

impl<'a, W: Write> Dispatcher<'a, W> {
    pub fn new(client: &'a ApiClient, logger: &'a Logger, out: W) -> Self {
        Dispatcher {
            client,
            logger,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn run(&mut self, opts: &Options) -> Result<Exit, KeysError> {
        self.logger.scope(|| debug!("Script args: {:?}", redacted(opts)));

        let response = match self.request(opts) {
            Ok(response) => response,
            Err(err) if err.is_usage() => {
                writeln!(self.out, "{}", err)?;
                return Ok(Exit::Usage);
            }
            Err(err) => return Err(err),
        };

        match response {
            Some(response) => self.report(&response)?,
            None => writeln!(self.out, "{}", NO_ACTION)?,
        }
        Ok(Exit::Success)
    }

    fn request(&mut self, opts: &Options) -> Result<Option<ApiResponse>, KeysError> {
        let Some(action) = opts.action() else {
            return Ok(None);
        };
        let creds = opts.credentials();

        let response = match action {
            Action::Test => {
                self.logger
                    .scope(|| debug!("Testing Github API access for {}", creds.user));
                self.with_spinner(opts, "Checking API access...", || {
                    self.client.test_access(&creds)
                })?
            }
            Action::Create => {
                let record = self.read_record(opts)?;
                self.with_spinner(opts, "Uploading key...", || {
                    self.client.create_key(&record, &creds)
                })?
            }
            Action::List => self.with_spinner(opts, "Listing keys...", || {
                self.client.list_keys(&creds)
            })?,
            Action::Delete(id) => {
                let response = self.with_spinner(opts, "Deleting key...", || {
                    self.client.delete_key(&id, &creds)
                })?;
                writeln!(self.out, "{}", response.body)?;
                response
            }
        };
        Ok(Some(response))
    }

    fn read_record(&self, opts: &Options) -> Result<PublicKeyRecord, KeysError> {
        let path = opts.key_file().ok_or(KeysError::MissingKeyFile)?;
        self.logger
            .scope(|| debug!("Opening public key file {}", path.display()));
        let line = keyfile::read_first_line(path)?;
        if line.is_empty() {
            return Err(KeysError::EmptyKey {
                path: path.to_path_buf(),
            });
        }
        Ok(PublicKeyRecord {
            title: opts.title.clone(),
            key: keyfile::strip_line_ending(&line).to_string(),
        })
    }

    fn report(&self, response: &ApiResponse) -> Result<(), KeysError> {
        let outcome = response.outcome()?;
        let (status, payload) = match &outcome {
            ApiOutcome::Success { status, payload } => (*status, payload),
            ApiOutcome::Failure { status, payload } => {
                self.logger
                    .scope(|| warn!("API request was not accepted: {}", status));
                (*status, payload)
            }
        };
        let rendered = match payload {
            Payload::Json(value) => pretty(value)?,
            Payload::Empty => format!("{} (no content)", status),
        };
        self.logger.scope(|| info!("API Response: {}", rendered));
        Ok(())
    }

    // The spinner draws on stderr and hides itself when stderr is not a
    // terminal. Debug logs would interleave with it, so it stays off there.
    fn with_spinner<T>(&self, opts: &Options, msg: &'static str, f: impl FnOnce() -> T) -> T {
        let spinner = if opts.debug {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = f();
        spinner.finish_and_clear();
        result
    }
}

/// JSON with a four space indent, keys in the order the server sent them.
pub fn pretty(value: &serde_json::Value) -> Result<String, KeysError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| KeysError::Output(e.into()))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn redacted(opts: &Options) -> Options {
    let mut opts = opts.clone();
    if !opts.token.is_empty() {
        opts.token = "<redacted>".into();
    }
    opts
}
