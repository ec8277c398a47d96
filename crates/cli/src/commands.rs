//! CLI commands

use anyhow::Result;
use catalog_core::{LoginForm, RegisterForm};
use catalog_frontend_common::{
    FileSessionStorage, FrontendConfig, GuardDecision, HistoryNavigator, RouteMeta,
    SessionContext,
};
use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::SESSION_FILE;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and keep the session token for later commands
    Login {
        #[arg(long, short)]
        email: String,

        #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log into it
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, short)]
        email: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        phone: String,

        #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
        password: String,

        /// Defaults to the password
        #[arg(long)]
        password_confirmation: Option<String>,
    },

    /// Show the profile of the logged in user
    Me,

    /// End the session
    Logout,

    /// Show whether a session token is stored
    Status,

    /// Check whether a route may be entered with the current session
    Guard {
        /// Route path, e.g. /products
        route: String,

        /// Treat the route as requiring authentication
        #[arg(long)]
        requires_auth: bool,
    },

    /// Configuration operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as JSON
    Show,
}

impl Commands {
    pub async fn execute(self, config: FrontendConfig, data_dir: PathBuf) -> Result<()> {
        let command = match self {
            Commands::Config { command } => return command.execute(&config),
            command => command,
        };

        let storage = FileSessionStorage::new(data_dir.join(SESSION_FILE));
        let navigator = HistoryNavigator::new();
        let ctx = SessionContext::new(config, Arc::new(storage), Arc::new(navigator.clone()))?;

        let result = command.run(&ctx, &data_dir).await;

        // Navigation has no screen to change here; report it instead
        if let Some(route) = navigator.last() {
            println!("Redirected to {route}");
        }

        result
    }

    async fn run(self, ctx: &SessionContext, data_dir: &std::path::Path) -> Result<()> {
        match self {
            Commands::Login { email, password } => {
                let user = ctx.auth().login(&LoginForm::new(email, password)).await?;
                println!("Logged in as {} <{}>", user.full_name(), user.email);
            }
            Commands::Register {
                first_name,
                last_name,
                email,
                address,
                phone,
                password,
                password_confirmation,
            } => {
                let form = RegisterForm {
                    first_name,
                    last_name,
                    email,
                    address,
                    phone,
                    password_confirmation: password_confirmation
                        .unwrap_or_else(|| password.clone()),
                    password,
                };
                let user = ctx.auth().register(&form).await?;
                println!("Registered and logged in as {} <{}>", user.full_name(), user.email);
            }
            Commands::Me => {
                let user = ctx.auth().fetch_user().await?;
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
            Commands::Logout => {
                let outcome = ctx.auth().logout().await;
                if !outcome.backend_notified() {
                    println!("Server could not be notified; local session cleared anyway");
                }
                println!("Logged out");
            }
            Commands::Status => match ctx.store().token() {
                Some(token) => {
                    println!("Logged in (token {})", mask_token(&token));
                    println!("Session file: {}", data_dir.join(SESSION_FILE).display());
                }
                None => println!("Not logged in"),
            },
            Commands::Guard {
                route,
                requires_auth,
            } => match ctx.guard().check(RouteMeta { requires_auth }) {
                GuardDecision::Proceed => println!("{route}: allowed"),
                GuardDecision::Redirect(to) => println!("{route}: redirect to {to}"),
            },
            Commands::Config { .. } => unreachable!("config commands run without a session"),
        }
        Ok(())
    }
}

impl ConfigCommands {
    pub fn execute(self, config: &FrontendConfig) -> Result<()> {
        match self {
            ConfigCommands::Show => {
                info!("Printing effective configuration");
                println!("{}", serde_json::to_string_pretty(config)?);
                Ok(())
            }
        }
    }
}

/// First few characters of a token, enough to tell sessions apart
fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        "*".repeat(token.chars().count())
    }
}
