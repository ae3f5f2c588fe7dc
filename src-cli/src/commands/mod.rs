//! Terminal commands.
//!
//! Commands are organized by domain:
//! - `auth`: login, logout and profile
//! - `dashboard`: statistics overview
//! - `farmers` / `farms`: record management
//! - `checkin`: face check-in and check-out
//! - `enroll`: three-angle face enrollment
//! - `analyze`: coffee beans and leaves analysis
//! - `map`: farms with today's attendance
//! - `dev`: seed and reset endpoints

pub mod analyze;
pub mod auth;
pub mod checkin;
pub mod dashboard;
pub mod dev;
pub mod enroll;
pub mod farmers;
pub mod farms;
pub mod map;

pub use analyze::AnalyzeCommands;
pub use auth::AuthArgs;
pub use dev::DevCommands;
pub use enroll::EnrollCommands;
pub use farmers::FarmerCommands;
pub use farms::FarmCommands;
pub use map::MapArgs;

use thiserror::Error;

use coffeefarm::CoffeeFarmError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoffeeFarmError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Usage(String),
}

macro_rules! core_error_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for CliError {
                fn from(e: $source) -> Self {
                    CliError::Core(CoffeeFarmError::from(e))
                }
            }
        )*
    };
}

core_error_from!(
    coffeefarm::ConfigError,
    coffeefarm::ApiError,
    coffeefarm::ImageError,
    coffeefarm::SessionError,
    coffeefarm::SecretError,
    coffeefarm::FlowError,
);
