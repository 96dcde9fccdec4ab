//! Interactive browse binary for the Discharge Demo Viewer.
//!
//! Startup runs the answer-key load and the authorization handshake
//! concurrently, joins them, then discovers the browsable demo cases once.
//! After that a small command loop drives the session: pick a case by its
//! list position, reveal the reference answer for the current case, or quit.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use answer_key::AnswerKeyStore;
use ddv_core::{discover, reveal, AppConfig, SessionContext, Surface, TerminalSurface};
use smart_client::SmartClient;

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

    let config = AppConfig::from_env()?;
    tracing::info!("++ Starting DDV browse session");

    let mut surface = TerminalSurface::new();

    surface.set_status("Loading answer key and authorizing against the clinical server...");

    // Static resource load and authorization handshake run concurrently and
    // are joined before any clinical query. The answer-key side never fails;
    // it degrades to an empty store on its own.
    let (answers, client) = tokio::join!(
        AnswerKeyStore::load(&config.answers_path),
        SmartClient::ready(&config.smart)
    );
    let client = match client {
        Ok(client) => client,
        Err(err) => {
            surface.set_status("Authorization failed; check the log for details.");
            return Err(err.into());
        }
    };

    surface.set_status("Authorization complete; discovering demo cases...");

    let cases = match discover(&client, &answers).await {
        Ok(cases) => cases,
        Err(err) => {
            surface.set_status("Demo case discovery failed; check the log for details.");
            return Err(err.into());
        }
    };
    if cases.is_empty() {
        surface.set_status("No demo cases found (empty answer key or no matching observations).");
        return Ok(());
    }

    surface.render_case_list(&cases);
    surface.set_status(&format!(
        "{} demo case(s) found. Commands: <n> select, a answer, l list, q quit.",
        cases.len()
    ));

    let mut session = SessionContext::new(answers, cases);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => {}
            "q" | "quit" => break,
            "l" | "list" => surface.render_case_list(session.cases()),
            "a" | "answer" => {
                let text = reveal(session.selection(), session.answers());
                surface.show_answer(&text);
            }
            input => match input.parse::<usize>() {
                // List positions are 1-based; 0 and past-the-end are no-ops.
                Ok(position) => {
                    if let Some(index) = position.checked_sub(1) {
                        session.select_case(index, &client, &mut surface).await;
                    }
                }
                Err(_) => {
                    surface.set_status("Commands: <n> select, a answer, l list, q quit.");
                }
            },
        }
    }

    Ok(())
}
