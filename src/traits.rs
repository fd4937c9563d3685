//! The display-server boundary.
//!
//! [`DisplayServer`] abstracts the handful of RandR calls the core needs so
//! that catalog building and mode switching are not coupled to a live X
//! connection.  The production implementation lives in
//! [`xrandr`](crate::xrandr); tests use in-memory fakes.

use crate::snapshot::{CrtcId, ModeId, OutputId, Snapshot};

/// Current configuration of a controller, as reported by the server.
///
/// The core only uses this to confirm the controller is still alive before
/// acting on it; the geometry fields are informational.
#[derive(Debug, Clone, Default)]
pub struct ControllerInfo {
    pub x: i16,
    pub y: i16,
    /// The mode currently driven, 0 when the controller is disabled.
    pub mode: ModeId,
}

/// Result of a reconfiguration request.
///
/// The server is authoritative on acceptance: an invalid mode-for-output
/// pairing comes back as [`Rejected`](ApplyOutcome::Rejected), distinct from
/// a transport failure (which is the implementation's error type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Accepted,
    /// The server refused the request; the payload is its status text.
    Rejected(String),
}

/// Abstraction over a display server that can enumerate outputs and modes
/// and reconfigure a controller.
///
/// All methods are synchronous, blocking calls; the connection is a single
/// shared handle serialized by the caller's single-threaded dispatch.
pub trait DisplayServer {
    /// The error type produced by this server, for transport-level failures
    /// only.  Recoverable conditions (absent property, stale handle) are
    /// expressed as `None` in the individual method results.
    type Error: std::error::Error + Send + 'static;

    /// Enumerate outputs, the global mode table, and each output's
    /// supported-mode list.  Handles in the result are valid until the next
    /// server-side reconfiguration.
    fn snapshot(&self) -> Result<Snapshot, Self::Error>;

    /// Query the current configuration of `crtc`.
    ///
    /// Returns `Ok(None)` when the server no longer knows the handle (a
    /// race with a concurrent reconfiguration, not an error).
    fn controller_info(&self, crtc: CrtcId) -> Result<Option<ControllerInfo>, Self::Error>;

    /// The controller currently assigned to `output`, queried fresh.
    ///
    /// `Ok(None)` when the output is unknown or has no controller.
    fn output_controller(&self, output: OutputId) -> Result<Option<CrtcId>, Self::Error>;

    /// Fetch the raw identity (EDID) property of `output`, up to 128 bytes.
    ///
    /// `Ok(None)` when the property is absent or not in the expected byte
    /// format — identity is optional metadata, never required.
    fn fetch_identity(&self, output: OutputId) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Ask the server to drive `output` through `crtc` with `mode`,
    /// rotation normal, position (0,0).
    fn apply_mode(
        &self,
        crtc: CrtcId,
        output: OutputId,
        mode: ModeId,
    ) -> Result<ApplyOutcome, Self::Error>;
}
