use crate::{CliResult, Report};

use tp_core::{Credentials, OAuthProvider};
use tp_session::SessionStore;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current session
    Status,

    /// Create an account and sign in
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the cached identity
    SignOut,

    /// Print the URL that starts an OAuth sign-in
    Oauth {
        /// google or facebook
        provider: OAuthProvider,
    },

    /// Finish an OAuth sign-in from the URL the browser landed on
    OauthCallback {
        /// Full redirect URL, including its query or fragment
        url: String,
    },
}

/// Run one command against a started store
pub async fn execute(store: &SessionStore, command: Commands) -> CliResult<Report> {
    let oauth = match command {
        Commands::Status => None,
        Commands::SignUp { email, password } => {
            store.sign_up(&Credentials::new(email, password)).await?;
            None
        }
        Commands::SignIn { email, password } => {
            store.sign_in(&Credentials::new(email, password)).await?;
            None
        }
        Commands::SignOut => {
            store.sign_out().await?;
            None
        }
        Commands::Oauth { provider } => Some(store.sign_in_with_oauth(provider).await?),
        Commands::OauthCallback { url } => {
            store.complete_oauth(&url).await?;
            None
        }
    };

    Ok(Report::new(store.state(), oauth))
}
