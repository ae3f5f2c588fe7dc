use clap::Args;
use comfy_table::Cell;

use coffeefarm::models::GeoPoint;
use coffeefarm::screens::map::summarize;
use coffeefarm::screens::{MapScreen, MarkerColor};

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Filter by farm name, code or manager
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Show distances from this point, as LAT,LNG
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<GeoPoint>,
}

pub async fn show(state: &AppState, args: MapArgs) -> Result<(), CliError> {
    state.require_login()?;
    let screen = MapScreen::new(state.client.clone());

    let spinner = output::spinner("Loading farms...");
    let result = screen.load(&args.search, args.from).await;
    spinner.finish_and_clear();
    let markers = result?;

    let summary = summarize(&markers);
    output::heading("Attendance Map");
    output::field("Farms", summary.farms);
    output::field("Active farms", summary.active_farms);
    output::field("Check-ins today", summary.today);

    if markers.is_empty() {
        output::info("No farms found");
        return Ok(());
    }
    if markers.iter().all(|m| m.color == MarkerColor::Blue) {
        output::warn("Today's attendance is unavailable");
    }

    let mut table = output::table(&["Farm", "Status", "Today", "Distance", "Map"]);
    for marker in &markers {
        table.add_row(vec![
            Cell::new(marker.farm.display_name()),
            output::hex_cell(marker.description(), marker.color.hex()),
            Cell::new(
                marker
                    .today_total
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(marker.distance_text().unwrap_or_else(|| "-".to_string())),
            Cell::new(marker.maps_url().unwrap_or_else(|| "no location".to_string())),
        ]);
    }
    println!("{table}");
    Ok(())
}
