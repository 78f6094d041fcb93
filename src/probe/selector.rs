//! Write the winning candidate into the wrapped program's settings

use super::{ProbeReport, ProbeResult};
use crate::{
    error::{AppError, Result},
    models::TargetSettings,
    store::SettingsStore,
};

fn require_winner(report: &ProbeReport) -> Result<&ProbeResult> {
    report.winner().ok_or_else(|| {
        AppError::no_reachable_candidate(format!(
            "None of the {} candidate URL(s) responded",
            report.results().len()
        ))
    })
}

/// Record the fastest reachable candidate as the active base URL.
///
/// Fails without touching `settings` when nothing was reachable.
pub fn apply_winner<'r>(
    report: &'r ProbeReport,
    settings: &mut TargetSettings,
) -> Result<&'r ProbeResult> {
    let winner = require_winner(report)?;
    settings.set_base_url(&winner.url)?;
    Ok(winner)
}

/// Applies probe winners to a settings file on disk
pub struct Selector {
    store: SettingsStore,
}

impl Selector {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// Load, update and save the settings. Nothing is written on failure.
    pub fn select(&self, report: &ProbeReport) -> Result<ProbeResult> {
        // Checked before the settings file is even read
        require_winner(report)?;

        let mut settings = self.store.load()?;
        let winner = apply_winner(report, &mut settings)?.clone();
        self.store.save(&settings)?;
        Ok(winner)
    }
}
