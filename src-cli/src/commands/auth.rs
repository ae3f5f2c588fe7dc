use clap::Args;
use dialoguer::Password;
use secrecy::SecretString;

use coffeefarm::resolve_secret_optional;
use coffeefarm::screens::{LoginScreen, ProfileScreen};

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Account email
    #[arg(env = "COFFEEFARM_EMAIL")]
    pub email: String,

    /// Password (prefer --password-file or --password-env)
    #[arg(long)]
    pub password: Option<String>,

    /// Read the password from this file
    #[arg(long)]
    pub password_file: Option<String>,

    /// Read the password from this environment variable
    #[arg(long)]
    pub password_env: Option<String>,
}

fn password(args: &AuthArgs) -> Result<SecretString, CliError> {
    let resolved = resolve_secret_optional(
        args.password.as_deref(),
        args.password_file.as_deref(),
        args.password_env.as_deref(),
    )?;
    match resolved {
        Some(secret) => Ok(secret),
        None => {
            let typed = Password::new().with_prompt("Password").interact()?;
            Ok(SecretString::from(typed))
        }
    }
}

pub async fn login(state: &AppState, args: AuthArgs) -> Result<(), CliError> {
    let password = password(&args)?;
    let mut screen = LoginScreen::new(state.client.clone(), state.session.clone());

    let spinner = output::spinner("Signing in...");
    let result = screen.submit(&args.email, &password).await;
    spinner.finish_and_clear();
    let user = result?;

    state.store.save(&state.session)?;
    output::success(&format!("Signed in as {} ({})", user.name, user.email));
    Ok(())
}

pub fn logout(state: &AppState) -> Result<(), CliError> {
    ProfileScreen::new(state.client.clone(), state.session.clone()).logout();
    state.store.clear()?;
    output::success("Signed out");
    Ok(())
}

pub fn profile(state: &AppState) -> Result<(), CliError> {
    let screen = ProfileScreen::new(state.client.clone(), state.session.clone());
    let user = screen.user()?;

    output::heading(&format!("{} ({})", user.name, screen.initials()));
    output::field("Email", &user.email);
    output::field("Role", &user.role);
    output::field("Server", state.client.base_url());
    Ok(())
}
