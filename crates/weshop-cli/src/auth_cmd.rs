//! Auth subcommands: login, register, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use weshop_client::{LoginOutcome, RegisterOutcome, SessionManager, SessionState};
use weshop_core::models::{RegisterPayload, Role};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in to the marketplace.
    Login {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Password; prompted when omitted.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create a new account (and log in with it).
    Register {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Email address.
        #[arg(short, long)]
        email: String,
        /// Password; prompted with confirmation when omitted.
        #[arg(short, long)]
        password: Option<String>,
        /// Account role: buyer or seller.
        #[arg(short, long, default_value = "buyer")]
        role: Role,
    },
    /// Log out and clear the stored session.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(action: AuthAction, session: &SessionManager) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { username, password } => login(session, &username, password).await,
        AuthAction::Register {
            username,
            email,
            password,
            role,
        } => register(session, username, email, password, role).await,
        AuthAction::Logout => {
            session.logout();
            let mut out = io::stdout();
            writeln!(out, "Logged out")?;
            Ok(())
        }
        AuthAction::Status => {
            status(session);
            Ok(())
        }
    }
}

async fn login(
    session: &SessionManager,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };

    match session.login(username, &password).await {
        LoginOutcome::Success(user) => {
            let mut out = io::stdout();
            writeln!(out, "Logged in as {} ({})", user.username, user.role)?;
            Ok(())
        }
        LoginOutcome::Rejected(message) => anyhow::bail!("Login failed: {message}"),
    }
}

async fn register(
    session: &SessionManager,
    username: String,
    email: String,
    password: Option<String>,
    role: Role,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let payload = RegisterPayload {
        username,
        email,
        password_confirm: password.clone(),
        password,
        role,
    };

    match session.register(&payload).await {
        RegisterOutcome::Success(user) => {
            let mut out = io::stdout();
            writeln!(out, "Registered and logged in as {} ({})", user.username, user.role)?;
            Ok(())
        }
        RegisterOutcome::Rejected(fields) => {
            let mut out = io::stdout();
            writeln!(out, "Registration failed:")?;
            for (field, messages) in &fields {
                writeln!(out, "  {field}: {}", messages.join("; "))?;
            }
            anyhow::bail!("Registration failed")
        }
    }
}

fn status(session: &SessionManager) {
    let mut out = io::stdout();
    match session.state() {
        SessionState::Authenticated(user) => {
            let _ = writeln!(out, "Logged in as: {}", user.username);
            let _ = writeln!(out, "User ID: {}", user.id);
            let _ = writeln!(out, "Role: {}", user.role);
        }
        SessionState::Anonymous => {
            let _ = writeln!(out, "Not logged in");
        }
        SessionState::Initializing => {
            let _ = writeln!(out, "Session not initialized");
        }
    }
}
