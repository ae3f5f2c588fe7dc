use comfy_table::Cell;

use coffeefarm::models::attendance::format_clock_time;
use coffeefarm::models::AttendanceStatus;
use coffeefarm::screens::DashboardScreen;

use super::CliError;
use crate::output;
use crate::state::AppState;

pub async fn show(state: &AppState, refresh: bool) -> Result<(), CliError> {
    state.require_login()?;
    let screen = DashboardScreen::new(state.client.clone());

    let spinner = output::spinner("Loading dashboard...");
    let result = if refresh {
        screen.refresh().await
    } else {
        screen.load().await
    };
    spinner.finish_and_clear();
    let view = result?;

    if let Some(banner) = view.banner() {
        output::warn(banner);
    }

    let stats = &view.stats;
    output::heading("Farmers");
    output::field("Total", stats.farmers.total);
    output::field("Active", stats.farmers.active);
    output::field(
        "Face enrolled",
        format!(
            "{} ({}%)",
            stats.farmers.with_face_enrolled,
            view.enrollment_percent()
        ),
    );

    output::heading("Today");
    output::field("Check-ins", stats.attendances.today);
    output::field("Working now", view.today.active_count());
    output::field("Checked out", stats.attendances.checked_out_today);

    output::heading("Farms");
    output::field("Total", stats.farms.total);
    output::field("Active", stats.farms.active);

    if view.today.attendances.is_empty() {
        output::info("No attendance recorded today");
        return Ok(());
    }

    let mut table = output::table(&["Farmer", "Farm", "In", "Out", "Status"]);
    for row in &view.today.attendances {
        let status = match row.status {
            AttendanceStatus::Working => output::hex_cell("working", "#10B981"),
            other => Cell::new(other.as_str()),
        };
        table.add_row(vec![
            Cell::new(row.farmer_name.as_deref().unwrap_or("-")),
            Cell::new(row.farm_name.as_deref().unwrap_or("-")),
            Cell::new(row.check_in_time.as_deref().map(format_clock_time).unwrap_or_default()),
            Cell::new(row.check_out_time.as_deref().map(format_clock_time).unwrap_or_default()),
            status,
        ]);
    }
    println!("{table}");
    Ok(())
}
