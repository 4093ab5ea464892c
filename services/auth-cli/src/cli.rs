//! Argument parsing
//!
//! `auth-session [--config PATH] <command>`:
//! - `status`: print whether the stored session is signed in
//! - `login`: print the hosted login URL
//! - `callback URL`: complete a login from the redirect URL
//! - `profile`: print the stored profile as JSON
//! - `logout`: clear the stored session

use anyhow::{Result, bail};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Status,
    Login,
    Callback(String),
    Profile,
    Logout,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub config_path: Option<String>,
    pub command: Command,
}

pub const USAGE: &str =
    "usage: auth-session [--config PATH] <status|login|callback URL|profile|logout>";

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Args> {
    let mut config_path = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config_path = Some(path.clone()),
                None => bail!("--config requires a path\n{USAGE}"),
            }
        } else {
            positional.push(arg.as_str());
        }
    }

    let command = match positional.as_slice() {
        [] | ["status"] => Command::Status,
        ["login"] => Command::Login,
        ["callback", url] => Command::Callback((*url).to_owned()),
        ["callback"] => bail!("callback requires the redirect URL\n{USAGE}"),
        ["profile"] => Command::Profile,
        ["logout"] => Command::Logout,
        other => bail!("unrecognized arguments: {}\n{USAGE}", other.join(" ")),
    };

    Ok(Args {
        config_path,
        command,
    })
}
