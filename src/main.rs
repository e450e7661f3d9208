use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use supra_session::config::ClientConfig;
use supra_session::i18n::LocalizationConfig;
use supra_session::token::{TokenExpiry, decode_expiry};
use supra_session::{
    AuthError, Credentials, ErrorCode, FileTokenStore, ProfileStore, ReqwestTransport, SessionManager, SignUpForm,
    TokenStore, TransportError,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] supra_session::config::ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("invalid localization file: {0}")]
    Localization(String),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Transport(e) => e.error_code(),
            Self::Auth(e) => e.error_code(),
            Self::NotSignedIn => "E_NOT_SIGNED_IN",
            Self::Localization(_) => "E_LOCALIZATION",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "supra-session", about = "Sign in, inspect, and manage a Supra session")]
struct Cli {
    /// File holding the persisted access token.
    #[arg(long, env = "SUPRA_TOKEN_FILE", default_value = ".supra/session.json")]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report whether a session is active, renewing the stored token if needed.
    Check,
    SignIn(CredentialArgs),
    SignOut,
    SignUp(SignUpArgs),
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        #[arg(long, env = "SUPRA_NEW_PASSWORD")]
        password: String,
    },
    Unlock(CredentialArgs),
    /// Renew the session and print the current user's details.
    Whoami,
    /// Print the stored token's expiry without contacting the server.
    Token,
    /// Resolve a language tag against the localization settings.
    Lang {
        tag: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "SUPRA_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct SignUpArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "SUPRA_PASSWORD")]
    password: String,
    #[arg(long, default_value = "")]
    company: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    phone: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Self { email: args.email, password: args.password }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "command failed");
            print_json(&json!({ "error": e.code(), "message": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` directives, or `info` when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

async fn run(cli: Cli) -> Result<Value, CliError> {
    let config = ClientConfig::from_env()?;
    let transport = Arc::new(ReqwestTransport::from_config(&config)?);
    let store = Arc::new(FileTokenStore::new(&cli.token_file));
    let profile = Arc::new(ProfileStore::new(transport.clone(), &config.endpoints));
    let session = SessionManager::new(transport, store.clone(), profile.clone(), &config);
    tracing::debug!(api_url = %config.api_url, token_file = %cli.token_file.display(), "session client ready");

    match cli.command {
        Command::Check => Ok(json!({ "authenticated": session.check().await })),
        Command::SignIn(args) => Ok(session.sign_in(&args.into()).await?),
        Command::SignOut => Ok(json!({ "signed_out": session.sign_out() })),
        Command::SignUp(args) => {
            let form = SignUpForm {
                name: args.name,
                email: args.email,
                password: args.password,
                company: args.company,
                country: args.country,
                phone: args.phone,
            };
            Ok(json!({ "registered": session.sign_up(&form).await }))
        }
        Command::ForgotPassword { email } => Ok(session.forgot_password(&email).await?),
        Command::ResetPassword { password } => Ok(session.reset_password(&password).await?),
        Command::Unlock(args) => Ok(session.unlock_session(&args.into()).await?),
        Command::Whoami => {
            if !session.check().await {
                return Err(CliError::NotSignedIn);
            }
            Ok(profile.fetch_current_user_detail().await?)
        }
        Command::Token => {
            let token = store
                .get(&config.token_key)
                .map_err(AuthError::from)?
                .unwrap_or_default();
            let expires_at = match decode_expiry(&token) {
                TokenExpiry::At(exp) => json!(exp),
                TokenExpiry::Unknown => Value::Null,
            };
            Ok(json!({
                "present": !token.is_empty(),
                "expires_at": expires_at,
                "expired": config.expiry.is_expired(&token),
            }))
        }
        Command::Lang { tag, config: settings_file } => run_lang(&tag, settings_file.as_deref()),
    }
}

fn run_lang(tag: &str, path: Option<&std::path::Path>) -> Result<Value, CliError> {
    let settings = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| CliError::Localization(e.to_string()))?;
            LocalizationConfig::from_json(&raw).map_err(|e| CliError::Localization(e.to_string()))?
        }
        None => LocalizationConfig::default(),
    };
    let lang = settings.resolve(tag);
    Ok(json!({ "lang": lang, "path": settings.translation_path(lang) }))
}
