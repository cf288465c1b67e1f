// UI layer: the three things the command line can ask for. Output goes to
// a caller-supplied writer so the flows can be exercised without a terminal.

use crate::api::{ApiClient, StatusMessage};
use crate::config::Credentials;
use crate::timeline::{format_timeline, parse_timeline};
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Validate and post a status. A rejected message is reported on `out` and
/// is not an error; nothing is sent in that case.
pub fn post_status(api: &ApiClient, message: &str, out: &mut impl Write) -> Result<()> {
    let message = match StatusMessage::parse(message) {
        Ok(message) => message,
        Err(reason) => {
            writeln!(out, "{}", reason)?;
            return Ok(());
        }
    };

    writeln!(out, "\"{}\" ({})", message, message.char_count())?;
    api.update_status(&message)
        .context("Failed to post status")?;
    Ok(())
}

/// Fetch the friends timeline and write it oldest first.
pub fn print_recent(api: &ApiClient, out: &mut impl Write) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Fetching timeline...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let fetched = api.recent_xml();
    spinner.finish_and_clear();

    let xml = fetched.context("Failed to fetch timeline")?;
    let entries = parse_timeline(&xml).context("Failed to read timeline")?;
    log::debug!("timeline has {} statuses", entries.len());

    out.write_all(format_timeline(&entries).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Prompt for a username and password and store them at `path`.
pub fn setup(path: &Path) -> Result<Credentials> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    // `Password` hides input in terminal for passwords.
    let password: String = Password::new().with_prompt("Password").interact()?;

    let creds = Credentials::new(username, password);
    creds.save(path)?;
    println!("Credentials saved to {}", path.display());
    Ok(creds)
}
