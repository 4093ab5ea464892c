//! Auth session CLI
//!
//! Drives a file-backed authentication session from the command line:
//! 1. Loads the `[auth0]` client properties and configures the session
//! 2. Subscribes a logging observer to sign-in/sign-out transitions
//! 3. Runs one command against the persisted session

mod cli;
mod config;

use anyhow::{Context, Result};
use auth_state::{AuthSession, FileStore};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Command;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // JSON logs on stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = cli::parse(&args)?;

    let config_path = Config::resolve_path(args.config_path.as_deref());
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let store = FileStore::open(&config.storage.path).with_context(|| {
        format!(
            "failed to open session store {}",
            config.storage.path.display()
        )
    })?;

    let session = AuthSession::new(store);
    session
        .configure(&config.auth0)
        .context("failed to configure auth client")?;

    let subscription = session.subscribe(|signed_in| info!(signed_in, "auth state changed"));

    run(&session, args.command).await?;

    subscription.unsubscribe();
    Ok(())
}

async fn run(session: &AuthSession<FileStore>, command: Command) -> Result<()> {
    match command {
        Command::Status => {
            let signed_in = session.is_authenticated();
            println!("{}", if signed_in { "signed in" } else { "signed out" });
        }
        Command::Login => {
            let url = session.sign_in().context("failed to build login URL")?;
            println!("{url}");
        }
        Command::Callback(url) => {
            session
                .handle_auth_callback(&url)
                .await
                .context("failed to complete login")?;
            println!("signed in");
        }
        Command::Profile => match session.get_profile().context("failed to read profile")? {
            Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
            None => println!("no profile stored"),
        },
        Command::Logout => {
            session.sign_out().context("failed to sign out")?;
            println!("signed out");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_state::{AuthProperties, EXPIRES_AT, KeyValueStore};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn session(dir: &tempfile::TempDir) -> AuthSession<FileStore> {
        let store = FileStore::open(dir.path().join("session.json")).unwrap();
        let session = AuthSession::new(store);
        session
            .configure(&AuthProperties::new("bk-samples.auth0.com", "someClientID"))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn logout_clears_persisted_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        session
            .credentials()
            .store()
            .set_item(EXPIRES_AT, "4102444800000")
            .unwrap();
        assert!(session.is_authenticated());

        run(&session, Command::Logout).await.unwrap();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn callback_signs_in_and_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        let payload = serde_json::json!({
            "iss": "https://bk-samples.auth0.com/",
            "aud": "someClientID",
            "sub": "auth0|cli",
        });
        let id_token = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        let url = format!(
            "http://localhost:3000/callback#access_token=at_cli&id_token={id_token}&expires_in=3600"
        );

        run(&session, Command::Callback(url)).await.unwrap();
        assert!(session.is_authenticated());

        let reopened = FileStore::open(dir.path().join("session.json")).unwrap();
        assert!(reopened.get_item(EXPIRES_AT).unwrap().is_some());
    }

    #[tokio::test]
    async fn bad_callback_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        let err = run(&session, Command::Callback("http://localhost:3000/callback".into()))
            .await
            .unwrap_err();
        assert!(
            format!("{err:#}").contains("failed to complete login"),
            "got: {err:#}"
        );
    }

    #[tokio::test]
    async fn login_and_status_do_not_touch_store() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        run(&session, Command::Login).await.unwrap();
        run(&session, Command::Status).await.unwrap();
        run(&session, Command::Profile).await.unwrap();
        assert_eq!(session.credentials().read_expiry().unwrap(), None);
    }
}
