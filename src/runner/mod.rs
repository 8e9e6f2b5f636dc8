//! Scenario orchestrator.
//!
//! Runs the fixed dependency-ordered sequence of steps, threading the
//! identifiers one step extracts into the inputs of later ones. A failed
//! critical step aborts the run (downstream preconditions can no longer be
//! met); advisory failures are recorded and the run continues. The session
//! and report are owned here and nowhere else, so independent runs can be
//! parallelized externally without shared state.

pub mod state;
pub mod steps;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::session::{Credentials, Session};

pub use state::{Criticality, RunReport, RunStatus, RunSummary, StepResult};

/// Record one result and decide whether the run may continue.
fn record(report: &mut RunReport, result: StepResult) -> bool {
    print_step(&result);
    let keep_going = result.success || result.criticality == Criticality::Advisory;
    report.record(result);
    keep_going
}

fn critical(result: StepResult) -> StepResult {
    result.with_criticality(Criticality::Critical)
}

/// Execute the full scenario against the configured backend. Every step
/// failure is captured in the returned report; the only hard error left is
/// failing to construct the HTTP client.
pub async fn run_scenario(config: &HarnessConfig) -> Result<RunReport> {
    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    let creds = Credentials::generate();
    let mut session = Session::new();
    let mut report = RunReport::new();
    report.start();

    println!(
        "\n{} Starting API tests against {}",
        "🚀".green(),
        config.base_url.cyan()
    );
    log::info!("run account: {} <{}>", creds.username, creds.email);

    // Auth chain. Everything downstream needs the token, and profile-by-id
    // needs the user id, so all three are critical.
    if !record(
        &mut report,
        critical(steps::register(&client, &mut session, &creds).await),
    ) {
        return Ok(abort(report, "registration failed"));
    }
    if !record(
        &mut report,
        critical(steps::login(&client, &mut session, &creds).await),
    ) {
        return Ok(abort(report, "login failed"));
    }
    if !record(
        &mut report,
        critical(steps::get_current_user(&client, &mut session).await),
    ) {
        return Ok(abort(report, "get current user failed"));
    }

    // Profile management. Reads and the update feed nothing downstream, so
    // only creation is critical.
    if !record(
        &mut report,
        critical(steps::create_profile(&client, &mut session, steps::sample_profile()).await),
    ) {
        return Ok(abort(report, "profile creation failed"));
    }
    record(&mut report, steps::get_my_profile(&client, &session).await);
    match session.user_id.clone() {
        Some(id) => {
            record(
                &mut report,
                steps::get_profile_by_id(&client, &session, &id).await,
            );
        }
        None => skip("Get Profile by ID", "no user id was extracted"),
    }
    record(
        &mut report,
        steps::update_profile(&client, &session, steps::updated_profile()).await,
    );

    // Chat flow. The started chat's id is the precondition for everything
    // after it, and an unsent message makes the chat reads meaningless.
    if config.chat_enabled {
        let participant = config
            .participant_id
            .clone()
            .or_else(|| session.user_id.clone());
        match participant {
            Some(participant) => {
                if !record(
                    &mut report,
                    critical(steps::start_chat(&client, &mut session, &participant).await),
                ) {
                    return Ok(abort(report, "chat start failed"));
                }
                let chat_id = session
                    .chat_id
                    .clone()
                    .expect("start_chat succeeded without a chat id");
                if !record(
                    &mut report,
                    critical(
                        steps::send_message(
                            &client,
                            &session,
                            &chat_id,
                            "Hello, this is a test message!",
                        )
                        .await,
                    ),
                ) {
                    return Ok(abort(report, "send message failed"));
                }
                record(&mut report, steps::get_chat(&client, &session, &chat_id).await);
                record(&mut report, steps::get_all_chats(&client, &session).await);
            }
            None => skip("chat flow", "no participant id available"),
        }
    }

    // Advisory by contract: the backing text-generation service may be
    // absent in a test environment.
    if config.suggestions_enabled {
        record(
            &mut report,
            steps::get_text_suggestions(&client, &session, "I am a software", Some("professional"))
                .await,
        );
    }

    report.complete();
    print_summary(&report);
    Ok(report)
}

fn abort(mut report: RunReport, reason: &str) -> RunReport {
    println!("{} {}, stopping tests", "⛔".red(), reason);
    report.abort();
    print_summary(&report);
    report
}

fn skip(what: &str, reason: &str) {
    println!("{} Skipping {}: {}", "⏭".yellow(), what, reason);
}

fn print_step(result: &StepResult) {
    if result.success {
        println!(
            "{} {} - Status: {} ({}ms)",
            "✅".green(),
            result.name,
            result.status.unwrap_or_default(),
            result.duration_ms
        );
    } else {
        println!(
            "{} {} - {}",
            "❌".red(),
            result.name,
            result.error.as_deref().unwrap_or("failed")
        );
        if let Some(body) = &result.body {
            println!("   Response: {}", body);
        }
    }
}

fn print_summary(report: &RunReport) {
    let summary = report.summary();
    println!("\n{} Tests Summary:", "📊".blue());
    println!("   Steps run:    {}", summary.total_run);
    println!("   Steps passed: {}", summary.total_passed);
    println!("   Pass rate:    {:.2}%", summary.pass_rate);
    match summary.status {
        RunStatus::Completed if report.all_passed() => {
            println!("   Result:       {}", "PASSED".green().bold())
        }
        RunStatus::Completed => println!("   Result:       {}", "FAILED".red().bold()),
        RunStatus::Aborted => println!("   Result:       {}", "ABORTED".red().bold()),
        _ => {}
    }
}
