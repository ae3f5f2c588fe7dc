use clap::Subcommand;
use comfy_table::Cell;

use coffeefarm::api::FarmQuery;
use coffeefarm::FlowError;

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum FarmCommands {
    /// List farms
    List {
        /// Filter by name, code or manager
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show one farm
    Show { id: String },

    /// Attendance statistics of one farm
    Stats { id: String },
}

pub async fn handle(state: &AppState, cmd: FarmCommands) -> Result<(), CliError> {
    state.require_login()?;
    let client = &state.client;

    match cmd {
        FarmCommands::List { search } => {
            let farms = client
                .list_farms(&FarmQuery::default())
                .await
                .map_err(|e| FlowError::api(e, "Failed to load farms"))?;
            let farms: Vec<_> = farms.iter().filter(|f| f.matches_search(&search)).collect();
            if farms.is_empty() {
                output::info("No farms found");
                return Ok(());
            }
            let mut table = output::table(&["ID", "Code", "Name", "Manager", "Area (ha)", "Active"]);
            for farm in farms {
                table.add_row(vec![
                    Cell::new(&farm.id),
                    Cell::new(farm.farm_code.as_deref().unwrap_or("-")),
                    Cell::new(farm.display_name()),
                    Cell::new(farm.manager_name.as_deref().unwrap_or("-")),
                    Cell::new(
                        farm.area_hectares
                            .map(|a| format!("{:.1}", a))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(output::yes_no(farm.is_active.unwrap_or(true))),
                ]);
            }
            println!("{table}");
        }

        FarmCommands::Show { id } => {
            let farm = client
                .get_farm(&id)
                .await
                .map_err(|e| FlowError::api(e, "Failed to load farm"))?;
            output::heading(farm.display_name());
            output::field("ID", &farm.id);
            output::field("Code", farm.farm_code.as_deref().unwrap_or("-"));
            output::field("Address", farm.address.as_deref().unwrap_or("-"));
            output::field("Manager", farm.manager_name.as_deref().unwrap_or("-"));
            output::field("Phone", farm.contact_phone.as_deref().unwrap_or("-"));
            match farm.position() {
                Some(p) => output::field("Location", format!("{:.5}, {:.5}", p.latitude, p.longitude)),
                None => output::field("Location", "-"),
            }
        }

        FarmCommands::Stats { id } => {
            let stats = client
                .farm_statistics(&id)
                .await
                .map_err(|e| FlowError::api(e, "Failed to load farm statistics"))?;
            output::heading(&format!("Farm {}", id));
            output::field("Farmers", stats.total_farmers);
            output::field("Active farmers", stats.active_farmers);
            output::field("Check-ins today", stats.total_attendances_today);
            output::field("Check-ins this month", stats.total_attendances_month);
            output::field("Average hours", format!("{:.1}", stats.average_work_hours));
        }
    }

    Ok(())
}
