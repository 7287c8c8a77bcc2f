//! Command-line surface for `gh-keys`.
//!
//! A single flat command: every flag may be given, the dispatcher picks one
//! action by priority (test, create, list, delete).

use std::path::Path;
use std::time::Duration;

use clap::Parser;

use crate::api::{ClientConfig, Credentials, API_URL};

pub const DEFAULT_TITLE: &str = "key for OMS deployment";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gh-keys",
    version,
    about = "Manage the SSH public keys of a GitHub account using a personal access token"
)]
pub struct Options {
    /// Upload the public key read from --file
    #[arg(short, long)]
    pub create: bool,

    /// Full path to the SSH public key
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,

    /// List all public keys of the user
    #[arg(short, long)]
    pub list: bool,

    /// ID of the SSH key to delete
    #[arg(short, long, value_name = "ID")]
    pub delete: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Check API access with the given user and token
    #[arg(long)]
    pub test: bool,

    /// Title attached to a created key
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Token (from the web UI) used for authorization
    #[arg(short, long, default_value = "")]
    pub token: String,

    /// GitHub username used for authorization
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// API base URL
    #[arg(long, env = "GH_KEYS_API_URL", default_value = API_URL, hide = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, hide = true)]
    pub timeout: u64,
}

/// The one thing a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Test,
    Create,
    List,
    Delete(String),
}

impl Options {
    pub fn action(&self) -> Option<Action> {
        if self.test {
            Some(Action::Test)
        } else if self.create {
            Some(Action::Create)
        } else if self.list {
            Some(Action::List)
        } else {
            self.delete_id().map(|id| Action::Delete(id.to_string()))
        }
    }

    /// `--file`, ignoring an empty value.
    pub fn key_file(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }

    /// `--delete`, ignoring an empty value.
    pub fn delete_id(&self) -> Option<&str> {
        self.delete.as_deref().filter(|id| !id.is_empty())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            user: self.user.clone(),
            token: self.token.clone(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
