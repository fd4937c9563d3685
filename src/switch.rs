//! Mode switching.
//!
//! [`activate`] is the only mutating operation in the crate.  It re-queries
//! the output's controller at call time (catalog data may be stale by the
//! time the operator picks a row) and forwards the reconfiguration request;
//! the server decides whether the pairing is valid.

use crate::snapshot::{ModeId, OutputId};
use crate::traits::{ApplyOutcome, DisplayServer};
use log::info;

/// Errors from a mode-switch attempt.
///
/// A [`Rejected`](SwitchError::Rejected) result is an operator-visible
/// outcome, not a process failure: the caller reports it and carries on.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// The output has no live controller to reconfigure.
    #[error("output {0:#x} has no active controller")]
    NoController(OutputId),

    /// The server refused the reconfiguration request.
    #[error("display server rejected the mode change: {0}")]
    Rejected(String),

    /// Transport failure while talking to the server.
    #[error("display server error: {0}")]
    Server(String),
}

/// Switch `output` to `mode`, reusing its current controller.
///
/// Position and rotation are pinned to (0,0) / normal; this tool does not
/// manage multi-monitor geometry.  No pre-validation is done on the
/// output/mode pairing — the server is authoritative and its refusal is
/// surfaced as [`SwitchError::Rejected`].
pub fn activate<S: DisplayServer>(
    server: &S,
    output: OutputId,
    mode: ModeId,
) -> Result<(), SwitchError> {
    let crtc = server
        .output_controller(output)
        .map_err(|e| SwitchError::Server(e.to_string()))?
        .ok_or(SwitchError::NoController(output))?;

    match server
        .apply_mode(crtc, output, mode)
        .map_err(|e| SwitchError::Server(e.to_string()))?
    {
        ApplyOutcome::Accepted => {
            info!("output {output:#x} switched to mode {mode:#x}");
            Ok(())
        }
        ApplyOutcome::Rejected(status) => Err(SwitchError::Rejected(status)),
    }
}
