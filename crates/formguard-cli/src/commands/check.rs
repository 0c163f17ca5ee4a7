//! Implementation of the `formguard check` command.
//!
//! Loads a form, mounts it on a fresh [`ValidationManager`], applies each
//! `--set` as a user edit, then reports the final aggregated status.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, instrument};

use formguard_adapters::FormLoader;
use formguard_core::{
    application::ValidationManager,
    domain::{AggregatedStatus, UnitStatus},
};

use crate::{
    cli::{CheckArgs, FieldValue, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One published status, as seen by the command's observer.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEvent {
    pub seq: usize,
    pub at: DateTime<Local>,
    pub status: AggregatedStatus,
}

/// Everything `check` reports; serialised as-is for `--output-format json`.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub form: &'a str,
    pub status: &'a AggregatedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<&'a [StatusEvent]>,
}

#[instrument(skip_all, fields(form = %args.form.display()))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let definition =
        FormLoader::from_path(&args.form).map_err(|e| CliError::from_load(args.form.clone(), e))?;

    let manager = ValidationManager::new();
    let show_events = args.events || config.check.show_events;
    let recorded: Arc<Mutex<Vec<StatusEvent>>> = Arc::default();
    if show_events {
        let sink = Arc::clone(&recorded);
        manager.subscribe(move |status: &AggregatedStatus| {
            let mut events = sink.lock().unwrap_or_else(PoisonError::into_inner);
            let seq = events.len() + 1;
            events.push(StatusEvent {
                seq,
                at: Local::now(),
                status: status.clone(),
            });
        });
    }

    let form = definition.mount(&manager)?;
    for FieldValue { id, value } in &args.set {
        if !form.set(id, value) {
            return Err(CliError::UnknownField {
                id: id.clone(),
                available: form.ids().map(ToString::to_string).collect(),
            });
        }
        debug!(field = %id, "applied field value");
    }

    let status = manager.status()?;
    let events = std::mem::take(&mut *recorded.lock().unwrap_or_else(PoisonError::into_inner));
    let report = CheckReport {
        form: form.name(),
        status: &status,
        events: show_events.then_some(events.as_slice()),
    };

    match output.format() {
        OutputFormat::Json => output.json(&report)?,
        _ => render(&output, &report)?,
    }

    if status.overall_valid {
        info!(fields = status.len(), "form is valid");
        Ok(())
    } else {
        Err(CliError::FormInvalid {
            form: form.name().to_owned(),
            invalid: status.invalid_units().map(ToString::to_string).collect(),
            total: status.len(),
        })
    }
}

fn render(output: &OutputManager, report: &CheckReport<'_>) -> CliResult<()> {
    if let Some(events) = report.events {
        output.header("Status changes:")?;
        for event in events {
            output.detail(&format!(
                "  [{}] #{} {}",
                event.at.format("%H:%M:%S%.3f"),
                event.seq,
                summary(&event.status)
            ))?;
        }
        output.print("")?;
    }

    output.header(&format!("Form '{}'", report.form))?;
    for (id, unit) in &report.status.per_unit {
        if unit.is_valid {
            output.success(id.as_str())?;
        } else {
            output.failure(id.as_str())?;
            for line in failure_lines(unit) {
                output.detail(&format!("    {line}"))?;
            }
        }
    }

    output.print("")?;
    let verdict = summary(report.status);
    if report.status.overall_valid {
        output.success(&verdict)?;
    } else {
        output.failure(&verdict)?;
    }
    Ok(())
}

/// e.g. `valid (3 fields)` or `invalid (1 of 3 fields failing)`.
fn summary(status: &AggregatedStatus) -> String {
    let total = status.len();
    let noun = if total == 1 { "field" } else { "fields" };
    if status.overall_valid {
        format!("valid ({total} {noun})")
    } else {
        let failing = status.invalid_units().count();
        format!("invalid ({failing} of {total} {noun} failing)")
    }
}

fn failure_lines(unit: &UnitStatus) -> Vec<String> {
    if unit.errors.is_empty() {
        return vec!["not evaluated yet".into()];
    }
    unit.errors
        .iter()
        .map(|(check, error)| format!("{check}: {} ({})", error.message, error.code))
        .collect()
}
