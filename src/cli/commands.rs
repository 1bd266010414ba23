//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::build_provider;
use crate::normalizer::{Normalizer, NormalizerResult};

/// Normalize a transcript given on the command line or stdin
pub async fn normalize_transcript(
    settings: &Settings,
    text: Vec<String>,
    json: bool,
) -> Result<()> {
    let transcript = if text.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read transcript from stdin")?;
        input
    } else {
        text.join(" ")
    };

    let normalizer = Normalizer::from_settings(settings);
    if !normalizer.is_available() {
        tracing::info!("No classification service configured, passing transcript through");
    }

    let result = normalizer.normalize(&transcript).await;
    print!("{}", render_result(&result, json)?);

    Ok(())
}

fn render_result(result: &NormalizerResult, json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(result)?));
    }

    let mut out = format!("{}\n", result.transcript);
    if let Some(answer) = &result.answer {
        out.push_str(&format!("answer: {}\n", answer));
    }
    Ok(out)
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&settings.redacted())?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    provider: String,
    model: String,
    endpoint: String,
    checks: Vec<DoctorCheck>,
    notes: Vec<String>,
}

/// Report how the classification service is configured.
pub async fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("voxnorm doctor");
    println!("provider: {}", report.provider);
    println!("model: {}", report.model);
    println!("endpoint: {}", report.endpoint);
    println!();

    for check in &report.checks {
        println!("{:<12} {:<8} {}", check.name, check.status, check.detail);
    }

    if !report.notes.is_empty() {
        println!();
        for note in &report.notes {
            println!("{}", note);
        }
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let llm = &settings.llm;
    let mut notes = Vec::new();

    let provider_check = match build_provider(settings) {
        Ok(Some(_)) => DoctorCheck {
            name: "provider",
            status: "ok",
            detail: "classification client ready".to_string(),
        },
        Ok(None) => DoctorCheck {
            name: "provider",
            status: "skipped",
            detail: "no API key configured".to_string(),
        },
        Err(e) => DoctorCheck {
            name: "provider",
            status: "error",
            detail: format!("{:#}", e),
        },
    };

    if !llm.has_api_key() {
        notes.push(
            "info: transcripts pass through unchanged until OPENROUTER_API_KEY or llm.api_key is set."
                .to_string(),
        );
    }

    let set_or_unset = |value: &str| if value.trim().is_empty() { "unset" } else { "set" };

    DoctorReport {
        provider: llm.provider.clone(),
        model: llm.model.clone(),
        endpoint: llm.endpoint.clone(),
        checks: vec![
            DoctorCheck {
                name: "api_key",
                status: if llm.has_api_key() { "ok" } else { "missing" },
                detail: "credential for the classification service".to_string(),
            },
            provider_check,
            DoctorCheck {
                name: "site_url",
                status: set_or_unset(&llm.site_url),
                detail: "sent as HTTP-Referer when set".to_string(),
            },
            DoctorCheck {
                name: "site_title",
                status: set_or_unset(&llm.site_title),
                detail: "sent as X-Title when set".to_string(),
            },
        ],
        notes,
    }
}
