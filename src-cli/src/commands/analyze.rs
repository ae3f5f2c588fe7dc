use std::path::PathBuf;

use clap::{Args, Subcommand};
use comfy_table::Cell;

use coffeefarm::models::AnalysisUpload;
use coffeefarm::screens::analysis::ANALYSIS_NOT_FOUND;
use coffeefarm::screens::{AnalysisKind, AnalysisScreen, AnalysisView, ConfidenceLevel};
use coffeefarm::ImagePayload;

use super::CliError;
use crate::output;
use crate::state::AppState;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Photo to analyze
    pub image: PathBuf,

    /// Farm id (defaults to the configured farm)
    #[arg(long)]
    pub farm: Option<String>,

    /// Field id (defaults to the configured field)
    #[arg(long)]
    pub field: Option<String>,

    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Count good and defective coffee beans
    Beans(UploadArgs),

    /// Detect diseases on coffee leaves
    Leaves(UploadArgs),

    /// Past analyses of one kind
    History {
        /// beans or leaves
        kind: AnalysisKind,
    },

    /// One past analysis
    Show {
        /// beans or leaves
        kind: AnalysisKind,
        id: String,
    },
}

fn screen(
    state: &AppState,
    kind: AnalysisKind,
    upload: Option<&UploadArgs>,
) -> AnalysisScreen<coffeefarm::ApiClient> {
    let defaults = &state.config.defaults;
    let upload = AnalysisUpload {
        farm_id: upload
            .and_then(|u| u.farm.clone())
            .unwrap_or_else(|| defaults.farm_id.clone()),
        field_id: upload
            .and_then(|u| u.field.clone())
            .unwrap_or_else(|| defaults.field_id.clone()),
        notes: upload.map(|u| u.notes.clone()).unwrap_or_default(),
    };
    AnalysisScreen::new(
        state.client.clone(),
        kind,
        upload,
        state.config.analysis.high_confidence_threshold,
    )
}

pub async fn handle(state: &AppState, cmd: AnalyzeCommands) -> Result<(), CliError> {
    state.require_login()?;

    match cmd {
        AnalyzeCommands::Beans(args) => analyze(state, AnalysisKind::Beans, &args).await?,
        AnalyzeCommands::Leaves(args) => analyze(state, AnalysisKind::Leaves, &args).await?,

        AnalyzeCommands::History { kind } => {
            let views = screen(state, kind, None).history().await?;
            if views.is_empty() {
                output::info("No analyses yet");
                return Ok(());
            }
            let mut table = output::table(&["ID", "Time", "Total", "Score", "Band"]);
            for view in &views {
                let band = view.band();
                table.add_row(vec![
                    Cell::new(view.id()),
                    Cell::new(view.timestamp().unwrap_or("-")),
                    Cell::new(view.total()),
                    output::hex_cell(view.score_text(), band.color()),
                    output::hex_cell(band.label(), band.color()),
                ]);
            }
            println!("{table}");
        }

        AnalyzeCommands::Show { kind, id } => {
            let screen = screen(state, kind, None);
            match screen.get(&id).await? {
                Some(view) => render(&view, screen.high_confidence()),
                None => output::warn(ANALYSIS_NOT_FOUND),
            }
        }
    }

    Ok(())
}

async fn analyze(state: &AppState, kind: AnalysisKind, args: &UploadArgs) -> Result<(), CliError> {
    let photo = ImagePayload::from_path(&args.image)?;
    let screen = screen(state, kind, Some(args));

    let spinner = output::spinner("Analyzing...");
    let result = screen.analyze(&photo).await;
    spinner.finish_and_clear();

    render(&result?, screen.high_confidence());
    Ok(())
}

fn render(view: &AnalysisView, high_confidence: f64) {
    let band = view.band();
    output::heading(view.kind().title());
    output::field("ID", view.id());
    if let Some(timestamp) = view.timestamp() {
        output::field("Time", timestamp);
    }
    output::field("Score", format!("{} ({})", view.score_text(), band.label()));

    let mut counts = output::table(&["", "Count", "Share"]);
    for row in view.counts() {
        counts.add_row(vec![
            Cell::new(row.label),
            Cell::new(row.count),
            Cell::new(format!("{:.1}%", row.percent)),
        ]);
    }
    println!("{counts}");

    let defects = view.defects();
    if !defects.is_empty() {
        output::heading("Defects");
        for (name, count) in defects {
            output::field(name, count);
        }
    }

    let diseases = view.diseases(high_confidence);
    if !diseases.is_empty() {
        output::heading("Diseases");
        let mut table = output::table(&["Disease", "Confidence", "Severity"]);
        for (disease, level) in diseases {
            let hex = match level {
                ConfidenceLevel::High => "#EF4444",
                ConfidenceLevel::Moderate => "#F59E0B",
            };
            table.add_row(vec![
                Cell::new(&disease.disease),
                output::hex_cell(format!("{:.0}%", disease.confidence * 100.0), hex),
                Cell::new(disease.severity.as_deref().unwrap_or("-")),
            ]);
        }
        println!("{table}");
    }

    let recommendations = view.recommendations();
    if !recommendations.is_empty() {
        output::heading("Recommendations");
        for line in recommendations {
            println!("  • {}", line);
        }
    }
}
