use std::path::Path;

use coffeefarm::models::attendance::format_clock_time;
use coffeefarm::screens::{CheckInScreen, CheckMode};
use coffeefarm::ImagePayload;

use super::CliError;
use crate::output;
use crate::state::AppState;

/// Verifies the face in `image` and records a check-in, or a check-out
/// when `out` is set.
pub async fn run(state: &AppState, image: &Path, out: bool) -> Result<(), CliError> {
    state.require_login()?;
    let photo = ImagePayload::from_path(image)?;

    let mut screen = CheckInScreen::new(
        state.client.clone(),
        &state.config.defaults.farm_id,
        state.config.check_in.location,
    );
    if out {
        screen.mode = CheckMode::CheckOut;
    }

    let spinner = output::spinner(&format!("{}...", screen.mode.label()));
    let result = screen.capture(&photo).await;
    spinner.finish_and_clear();
    let outcome = result?;

    output::success(&outcome.message);
    output::field("Farmer", format!("{} ({})", outcome.farmer_name, outcome.farmer_id));
    if let Some(confidence) = outcome.confidence {
        output::field("Confidence", format!("{:.1}%", confidence * 100.0));
    }
    let receipt = &outcome.receipt;
    if let Some(id) = &receipt.attendance_id {
        output::field("Attendance", id);
    }
    if let Some(time) = &receipt.check_in_time {
        output::field("Checked in", format_clock_time(time));
    }
    if let Some(time) = &receipt.check_out_time {
        output::field("Checked out", format_clock_time(time));
    }
    if let Some(duration) = &receipt.work_duration {
        output::field("Worked", duration);
    }
    Ok(())
}
