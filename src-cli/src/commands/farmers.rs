use clap::Subcommand;
use comfy_table::Cell;
use dialoguer::Confirm;

use coffeefarm::models::{Gender, UpdateFarmer};
use coffeefarm::screens::{AddFarmerScreen, FarmerDetail, FarmersScreen, Navigation, Route};

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum FarmerCommands {
    /// List farmers
    List {
        /// Filter by name or farmer code
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show one farmer with attendance history
    Show { id: String },

    /// Register a new farmer
    Add {
        /// Farmer code
        #[arg(long)]
        code: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// Phone number, 10-15 digits
        #[arg(long, default_value = "")]
        phone: String,
        /// Date of birth as YYYYDDMM, YYYYMMDD or YYYY-MM-DD
        #[arg(long, default_value = "")]
        dob: String,
        /// male, female or other
        #[arg(long, default_value = "male")]
        gender: Gender,
        #[arg(long, default_value = "")]
        address: String,
        /// Farm id (defaults to the configured farm)
        #[arg(long)]
        farm: Option<String>,
    },

    /// Change fields of an existing farmer
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        farm: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a farmer
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle(state: &AppState, cmd: FarmerCommands) -> Result<(), CliError> {
    state.require_login()?;
    let screen = FarmersScreen::new(state.client.clone());

    match cmd {
        FarmerCommands::List { search } => {
            let farmers = screen.list(&search).await?;
            if farmers.is_empty() {
                output::info("No farmers found");
                return Ok(());
            }
            let mut table = output::table(&["ID", "Code", "Name", "Phone", "Farm", "Face"]);
            for f in &farmers {
                let face = if f.face_enrolled {
                    output::hex_cell("enrolled", "#10B981")
                } else {
                    output::hex_cell("not enrolled", "#6B7280")
                };
                table.add_row(vec![
                    Cell::new(&f.id),
                    Cell::new(&f.farmer_code),
                    Cell::new(&f.full_name),
                    Cell::new(f.phone.as_deref().unwrap_or("-")),
                    Cell::new(f.farm_id.as_deref().unwrap_or("-")),
                    face,
                ]);
            }
            println!("{table}");
        }

        FarmerCommands::Show { id } => match screen.detail(&id).await? {
            FarmerDetail::NotFound => output::warn(coffeefarm::screens::farmers::FARMER_NOT_FOUND),
            FarmerDetail::Found { farmer, history } => {
                output::heading(&farmer.full_name);
                output::field("ID", &farmer.id);
                output::field("Code", &farmer.farmer_code);
                output::field("Phone", farmer.phone.as_deref().unwrap_or("-"));
                output::field("Date of birth", farmer.date_of_birth.as_deref().unwrap_or("-"));
                output::field(
                    "Gender",
                    farmer.gender.map(|g| g.as_str()).unwrap_or("-"),
                );
                output::field("Farm", farmer.farm_id.as_deref().unwrap_or("-"));
                output::field("Active", output::yes_no(farmer.is_active));
                output::field("Face enrolled", output::yes_no(farmer.face_enrolled));
                output::field("Attendance records", history.total_records);
            }
        },

        FarmerCommands::Add {
            code,
            name,
            phone,
            dob,
            gender,
            address,
            farm,
        } => {
            let default_farm = farm.unwrap_or_else(|| state.config.defaults.farm_id.clone());
            let mut add = AddFarmerScreen::new(state.client.clone(), &default_farm);
            add.form.farmer_code = code;
            add.form.full_name = name;
            add.form.phone = phone;
            add.form.date_of_birth = dob;
            add.form.gender = gender;
            add.form.address = address;

            let (farmer, next) = add.submit().await?;
            output::success(&format!(
                "Created {} ({})",
                farmer.full_name, farmer.id
            ));
            if let Navigation::To(Route::FaceEnrollment { farmer_id, .. }) = next {
                output::info(&format!(
                    "Next: coffeefarm enroll capture {} FRONT LEFT RIGHT",
                    farmer_id
                ));
            }
        }

        FarmerCommands::Update {
            id,
            name,
            phone,
            address,
            farm,
            active,
        } => {
            let update = UpdateFarmer {
                full_name: name,
                phone,
                address,
                farm_id: farm,
                is_active: active,
                ..Default::default()
            };
            let farmer = screen.update(&id, &update).await?;
            output::success(&format!("Updated {}", farmer.full_name));
        }

        FarmerCommands::Delete { id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete farmer '{}'?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output::info("Cancelled");
                    return Ok(());
                }
            }
            if let Navigation::Back { message } = screen.delete(&id).await? {
                output::success(message.as_deref().unwrap_or("Deleted"));
            }
        }
    }

    Ok(())
}
