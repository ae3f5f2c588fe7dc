//! Seed and reset endpoints of a development server.

use clap::Subcommand;
use dialoguer::Confirm;

use coffeefarm::FlowError;

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum DevCommands {
    /// Create sample farms, farmers and attendance
    Seed,

    /// Entity counts and service modes
    Stats,

    /// Pretend a face was recognized
    SimulateVerify {
        #[arg(long)]
        farmer_id: Option<String>,
    },

    /// Delete every farm, farmer and attendance record
    ClearAll {
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle(state: &AppState, cmd: DevCommands) -> Result<(), CliError> {
    state.require_login()?;
    let client = &state.client;

    match cmd {
        DevCommands::Seed => {
            let created = client
                .create_sample_data()
                .await
                .map_err(|e| FlowError::api(e, "Failed to create sample data"))?;
            output::success(&created.message);
            output::field("Farms", created.data.farms_created);
            output::field("Farmers", created.data.farmers_created);
            output::field("Attendances", created.data.attendances_created);
        }

        DevCommands::Stats => {
            let stats = client
                .system_statistics()
                .await
                .map_err(|e| FlowError::api(e, "Failed to load statistics"))?;
            output::heading("System");
            output::field("Mode", stats.system.mode.as_str());
            output::field("Face service", stats.system.face_service.as_str());
            output::field("Database", stats.system.database.as_str());
            output::field(
                "Farms",
                format!("{} ({} active)", stats.farms.total, stats.farms.active),
            );
            output::field(
                "Farmers",
                format!("{} ({} active)", stats.farmers.total, stats.farmers.active),
            );
            output::field(
                "Attendance today",
                format!(
                    "{} ({} working)",
                    stats.attendances.today, stats.attendances.active
                ),
            );
        }

        DevCommands::SimulateVerify { farmer_id } => {
            let result = client
                .simulate_face_verify(farmer_id.as_deref())
                .await
                .map_err(|e| FlowError::api(e, "Failed to simulate verification"))?;
            if result.verified {
                output::success(&result.message);
            } else {
                output::warn(&result.message);
            }
            if let Some(name) = &result.farmer_name {
                output::field("Farmer", name);
            }
            if let Some(confidence) = result.confidence {
                output::field("Confidence", format!("{:.1}%", confidence * 100.0));
            }
        }

        DevCommands::ClearAll { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete ALL data on the server?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output::info("Cancelled");
                    return Ok(());
                }
            }
            let cleared = client
                .clear_all_data()
                .await
                .map_err(|e| FlowError::api(e, "Failed to clear data"))?;
            output::success(&cleared.message);
        }
    }

    Ok(())
}
