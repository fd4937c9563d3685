//! Per-output mode catalogs.
//!
//! [`build_catalog`] turns a fresh server snapshot into presentation-ready
//! [`OutputModes`] records: one per connected output with a live controller,
//! each holding the decoded monitor identity and one [`ModeRow`] per
//! resolvable supported mode.  The catalog is rebuilt from scratch on every
//! call; nothing is cached across queries.

use crate::edid;
use crate::snapshot::{ModeId, ModeRecord, OutputId};
use crate::timing;
use crate::traits::DisplayServer;
use log::{debug, warn};
use serde::Serialize;

/// One selectable mode, formatted for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeRow {
    /// The mode's XID, used to request a switch.
    pub mode: ModeId,
    /// The XID as display text, e.g. `"0x47"`.
    pub mode_text: String,
    /// Symbolic mode name, e.g. `"1920x1080"`.
    pub name: String,
    /// Vertical refresh, e.g. `" 59.94Hz"`.
    pub refresh: String,
    /// Pixel clock, e.g. `"148.500MHz"`.
    pub pixel_clock: String,
    /// Whether this row falls in the output's preferred-mode prefix.
    pub preferred: bool,
}

/// The catalog entry for one output.
#[derive(Debug, Clone, Serialize)]
pub struct OutputModes {
    pub output: OutputId,
    /// Port name, e.g. `"HDMI-1"`.
    pub port: String,
    /// Decoded monitor model name; empty when identity is unavailable.
    pub model: String,
    /// Supported modes in the output's listed order.
    pub rows: Vec<ModeRow>,
}

impl OutputModes {
    /// Display title in `port(model)` form.
    pub fn title(&self) -> String {
        format!("{}({})", self.port, self.model)
    }
}

/// Build one [`ModeRow`] from a resolved mode record.
fn mode_row(id: ModeId, record: &ModeRecord, preferred: bool) -> ModeRow {
    ModeRow {
        mode: id,
        mode_text: format!("{id:#x}"),
        name: record.name.clone(),
        refresh: format!("{:6.2}Hz", timing::refresh_hz(record)),
        pixel_clock: format!("{:6.3}MHz", record.dot_clock as f64 / 1_000_000.0),
        preferred,
    }
}

/// Query a fresh snapshot from `server` and build the full catalog.
///
/// Only transport failures propagate as errors.  Everything else degrades:
/// disconnected or controller-less outputs are skipped, a failed
/// controller-info query skips that output, a missing or malformed identity
/// blob leaves the model name empty, and mode references that no longer
/// resolve in the global table are omitted row by row.
pub fn build_catalog<S: DisplayServer>(server: &S) -> Result<Vec<OutputModes>, S::Error> {
    let snapshot = server.snapshot()?;
    let mode_index = snapshot.mode_index();
    let mut catalog = Vec::new();

    for output in &snapshot.outputs {
        if !output.connected {
            continue;
        }
        let Some(crtc) = output.controller else {
            debug!("skipping {}: no controller assigned", output.name);
            continue;
        };
        // Confirm the controller is still alive; a stale handle means the
        // server reconfigured between enumeration and now.
        match server.controller_info(crtc) {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("skipping {}: controller {crtc:#x} vanished", output.name);
                continue;
            }
            Err(e) => {
                warn!("skipping {}: controller query failed: {e}", output.name);
                continue;
            }
        }

        let model = match server.fetch_identity(output.id) {
            Ok(Some(blob)) if !blob.is_empty() => edid::parse(&blob).model_name,
            Ok(_) => String::new(),
            Err(e) => {
                // Identity is optional metadata; a failed query only costs
                // the model name.
                warn!("identity query failed for {}: {e}", output.name);
                String::new()
            }
        };

        let mut rows = Vec::with_capacity(output.modes.len());
        for (position, &mode_id) in output.modes.iter().enumerate() {
            let Some(&record) = mode_index.get(&mode_id) else {
                // The reference outlived the global table entry; drop the row.
                warn!("mode {mode_id:#x} on {} not in mode table", output.name);
                continue;
            };
            rows.push(mode_row(mode_id, record, position < output.preferred_count));
        }

        catalog.push(OutputModes {
            output: output.id,
            port: output.name.clone(),
            model,
            rows,
        });
    }

    Ok(catalog)
}
