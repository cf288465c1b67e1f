// Command line surface. `main` parses a `Cli` and hands it to `run`.

use crate::api::ApiClient;
use crate::config::Credentials;
use crate::ui;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::PathBuf;

/// Twitter client: post a status or list recent statuses from your friends.
///
/// Your username and password are read from ~/.twitter, a YAML file with
/// `username` and `password` keys. Run with --setup to create it.
#[derive(Parser, Debug)]
#[command(name = "twit", version)]
pub struct Cli {
    /// List recent statuses from your friends timeline
    #[arg(short, long)]
    pub recent: bool,

    /// Prompt for credentials and write the credentials file
    #[arg(long, conflicts_with = "recent")]
    pub setup: bool,

    /// Credentials file to use instead of ~/.twitter
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Message to post; words are joined with single spaces
    #[arg(value_name = "MESSAGE", conflicts_with_all = ["recent", "setup"])]
    pub message: Vec<String>,
}

/// What a parsed command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Usage,
    Setup,
    Recent,
    Post(String),
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.setup {
            Action::Setup
        } else if self.recent {
            Action::Recent
        } else if self.message.is_empty() {
            Action::Usage
        } else {
            Action::Post(self.message.join(" "))
        }
    }

    fn credentials_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Credentials::default_path(),
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let action = cli.action();
    log::debug!("action: {:?}", action);

    match action {
        Action::Usage => Cli::command().print_help()?,
        Action::Setup => {
            ui::setup(&cli.credentials_path()?)?;
        }
        Action::Recent => {
            let api = client(&cli)?;
            ui::print_recent(&api, &mut io::stdout().lock())?;
        }
        Action::Post(message) => {
            let api = client(&cli)?;
            let mut out = io::stdout().lock();
            ui::post_status(&api, &message, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn client(cli: &Cli) -> Result<ApiClient> {
    let credentials = Credentials::load(&cli.credentials_path()?)?;
    Ok(ApiClient::from_env(credentials)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_shows_usage() {
        let cli = Cli::try_parse_from(["twit"]).unwrap();
        assert_eq!(cli.action(), Action::Usage);
    }

    #[test]
    fn test_words_are_joined() {
        let cli = Cli::try_parse_from(["twit", "hello", "there", "world"]).unwrap();
        assert_eq!(cli.action(), Action::Post("hello there world".into()));
    }

    #[test]
    fn test_recent_flags() {
        for flag in ["-r", "--recent"] {
            let cli = Cli::try_parse_from(["twit", flag]).unwrap();
            assert_eq!(cli.action(), Action::Recent);
        }
    }

    #[test]
    fn test_config_path_override() {
        let cli = Cli::try_parse_from(["twit", "-c", "/tmp/creds", "hi"]).unwrap();
        assert_eq!(cli.credentials_path().unwrap(), PathBuf::from("/tmp/creds"));
        assert_eq!(cli.action(), Action::Post("hi".into()));
    }

    #[test]
    fn test_help_flag_is_usage() {
        let err = Cli::try_parse_from(["twit", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_message_with_recent_conflicts() {
        assert!(Cli::try_parse_from(["twit", "-r", "hello"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
