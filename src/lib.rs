// Library root
// -----------
// A command-line Twitter client: post a status or print the friends
// timeline. The binary (`main.rs`) only parses arguments and sets up
// logging; everything else lives here.
//
// Module responsibilities:
// - `api`: blocking HTTP calls (status update, timeline fetch) with basic
//   authentication, plus status length validation.
// - `config`: the `~/.twitter` credentials file.
// - `timeline`: timeline XML parsing, entity decoding and text reflow.
// - `ui`: the user-facing flows, writing to any `io::Write`.
// - `cli`: argument definitions and dispatch.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod timeline;
pub mod ui;

pub use error::{Error, Result};
