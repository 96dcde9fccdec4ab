//! One-shot command-line interface for the Discharge Demo Viewer.
//!
//! ## Purpose
//! Runs each flow once and exits: read a single patient's discharge summary,
//! list the browsable demo cases, or load one case by position.
//!
//! ## Intended use
//! Useful for scripted checks against a sandbox server. The workspace's main
//! `ddv-run` binary runs the interactive browse loop instead.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use answer_key::AnswerKeyStore;
use ddv_core::{
    discover, latest_observation, reveal, session::fetch_patient, AppConfig, SelectionState,
    SessionContext, Surface, TerminalSurface,
};
use smart_client::SmartClient;

#[derive(Parser)]
#[command(name = "ddv")]
#[command(about = "Discharge demo viewer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read one patient and their latest discharge summary
    Single {
        /// Patient id (overrides DDV_PATIENT_ID)
        #[arg(long)]
        patient: Option<String>,
        /// Also print the reference answer for the patient
        #[arg(long)]
        answer: bool,
    },
    /// List the browsable demo cases
    Discover,
    /// Load one discovered case by its position in the list
    Show {
        /// Position in the discovered list (1-based)
        index: usize,
        /// Also print the reference answer for the selected case
        #[arg(long)]
        answer: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ddv_core=info".parse()?)
                .add_directive("smart_client=info".parse()?)
                .add_directive("answer_key=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::debug!("parsed command line");

    let mut surface = TerminalSurface::new();

    match cli.command {
        Some(Commands::Single { patient, answer }) => {
            let config = AppConfig::from_env()?;
            let patient_id = patient
                .or_else(|| config.patient_id.clone())
                .context("no patient id: pass --patient or set DDV_PATIENT_ID")?;

            let (answers, client) = startup(&config, &mut surface).await?;
            surface.set_status("Authorization complete; loading patient and discharge summary...");

            let patient = match fetch_patient(&client, &patient_id).await {
                Ok(patient) => patient,
                Err(err) => {
                    surface.set_status("Patient read failed; check the log for details.");
                    return Err(err.into());
                }
            };
            surface.render_patient(&patient);

            match latest_observation(&client, &patient.id).await? {
                None => {
                    surface.set_observation_text("");
                    surface.set_status(
                        "No discharge-summary observation (code 11506-3) found for this patient.",
                    );
                }
                Some(observation) => {
                    surface.set_observation_text(observation.text());
                    surface.set_status("Data loaded.");
                }
            }

            if answer {
                let selection = SelectionState::for_patient(&patient.id);
                surface.show_answer(&reveal(&selection, &answers));
            }
        }
        Some(Commands::Discover) => {
            let config = AppConfig::from_env()?;
            let (answers, client) = startup(&config, &mut surface).await?;

            let cases = discover_or_fail(&client, &answers, &mut surface).await?;
            if cases.is_empty() {
                surface.set_status(
                    "No demo cases found (empty answer key or no matching observations).",
                );
                return Ok(());
            }

            surface.render_case_list(&cases);
            surface.set_status(&format!("{} demo case(s) found.", cases.len()));
        }
        Some(Commands::Show { index, answer }) => {
            let config = AppConfig::from_env()?;
            let (answers, client) = startup(&config, &mut surface).await?;

            let cases = discover_or_fail(&client, &answers, &mut surface).await?;
            if cases.is_empty() {
                surface.set_status(
                    "No demo cases found (empty answer key or no matching observations).",
                );
                return Ok(());
            }

            let mut session = SessionContext::new(answers, cases);
            if let Some(zero_based) = index.checked_sub(1) {
                session.select_case(zero_based, &client, &mut surface).await;
            }
            if session.selection().current_patient_id().is_none() {
                surface.set_status(&format!(
                    "No case at position {index} (1..{} available).",
                    session.cases().len()
                ));
                return Ok(());
            }

            if answer {
                surface.show_answer(&reveal(session.selection(), session.answers()));
            }
        }
        None => {
            println!("Use 'ddv --help' for commands");
        }
    }

    Ok(())
}

/// Run the concurrent startup stage: answer-key load joined with the
/// authorization handshake. Handshake failure is fatal; a failed answer-key
/// load already degraded to an empty store inside `load`.
async fn startup(
    config: &AppConfig,
    surface: &mut TerminalSurface,
) -> anyhow::Result<(AnswerKeyStore, SmartClient)> {
    surface.set_status("Loading answer key and authorizing against the clinical server...");

    let (answers, client) = tokio::join!(
        AnswerKeyStore::load(&config.answers_path),
        SmartClient::ready(&config.smart)
    );

    match client {
        Ok(client) => Ok((answers, client)),
        Err(err) => {
            surface.set_status("Authorization failed; check the log for details.");
            Err(err.into())
        }
    }
}

/// Run discovery, turning a failed search into a status message plus error.
async fn discover_or_fail(
    client: &SmartClient,
    answers: &AnswerKeyStore,
    surface: &mut TerminalSurface,
) -> anyhow::Result<Vec<ddv_core::DemoCase>> {
    match discover(client, answers).await {
        Ok(cases) => Ok(cases),
        Err(err) => {
            surface.set_status("Demo case discovery failed; check the log for details.");
            Err(err.into())
        }
    }
}
