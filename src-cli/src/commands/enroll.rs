use std::path::PathBuf;

use clap::Subcommand;
use comfy_table::Cell;
use dialoguer::Confirm;

use coffeefarm::models::FaceAngle;
use coffeefarm::screens::{CaptureOutcome, EnrollmentScreen, EnrollmentWelcome, Navigation};
use coffeefarm::{FlowError, ImagePayload};

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum EnrollCommands {
    /// Farmers grouped by enrollment status
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Enroll a farmer from three photos taken front, left and right
    Capture {
        farmer_id: String,
        front: PathBuf,
        left: PathBuf,
        right: PathBuf,
    },

    /// Remove a farmer's face data
    Delete {
        farmer_id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle(state: &AppState, cmd: EnrollCommands) -> Result<(), CliError> {
    state.require_login()?;

    match cmd {
        EnrollCommands::List { search } => {
            let welcome = EnrollmentWelcome::new(state.client.clone());
            let selection = welcome.load(&search).await?;
            if selection.is_empty() {
                output::info("No farmers found");
                return Ok(());
            }
            let mut table = output::table(&["ID", "Code", "Name", "Status"]);
            for farmer in &selection.not_enrolled {
                table.add_row(vec![
                    Cell::new(&farmer.id),
                    Cell::new(&farmer.farmer_code),
                    Cell::new(&farmer.full_name),
                    output::hex_cell("not enrolled", "#F59E0B"),
                ]);
            }
            for farmer in &selection.enrolled {
                table.add_row(vec![
                    Cell::new(&farmer.id),
                    Cell::new(&farmer.farmer_code),
                    Cell::new(&farmer.full_name),
                    output::hex_cell("enrolled", "#10B981"),
                ]);
            }
            println!("{table}");
            output::info(&format!(
                "{} not enrolled, {} enrolled",
                selection.not_enrolled.len(),
                selection.enrolled.len()
            ));
        }

        EnrollCommands::Capture {
            farmer_id,
            front,
            left,
            right,
        } => capture(state, &farmer_id, [front, left, right]).await?,

        EnrollCommands::Delete { farmer_id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete face data of '{}'?", farmer_id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output::info("Cancelled");
                    return Ok(());
                }
            }
            EnrollmentWelcome::new(state.client.clone())
                .delete_enrollment(&farmer_id)
                .await?;
            output::success("Face data deleted");
        }
    }

    Ok(())
}

async fn capture(state: &AppState, farmer_id: &str, paths: [PathBuf; 3]) -> Result<(), CliError> {
    let farmer = state
        .client
        .get_farmer(farmer_id)
        .await
        .map_err(|e| FlowError::api(e, "Failed to load farmer"))?;

    let mut screen = EnrollmentScreen::new(
        state.client.clone(),
        &farmer.id,
        &farmer.full_name,
        farmer.face_enrolled,
        state.config.enrollment.min_quality_score,
    );
    if let Some(warning) = screen.replace_warning() {
        output::warn(&warning);
    }

    for (angle, path) in FaceAngle::ORDER.into_iter().zip(paths) {
        output::info(&format!("{}: {}", angle.display_label(), angle.instruction()));
        let photo = ImagePayload::from_path(&path)?;

        let spinner = output::spinner("Checking image quality...");
        let result = screen.capture(photo).await;
        spinner.finish_and_clear();

        match result? {
            accepted @ CaptureOutcome::Accepted { .. } => output::success(&accepted.message()),
            rejected => {
                return Err(CliError::Usage(format!(
                    "{} ({}): {}",
                    rejected.title(),
                    path.display(),
                    rejected.message()
                )));
            }
        }
    }

    let spinner = output::spinner(&format!("Enrolling {}...", screen.farmer_name()));
    let result = screen.complete().await;
    spinner.finish_and_clear();
    let (response, next) = result?;

    if let Navigation::Back { message: Some(message) } = next {
        output::success(&message);
    }
    if let Some(count) = response.samples_collected {
        output::field("Samples", count);
    }
    Ok(())
}
