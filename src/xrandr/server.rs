//! [`DisplayServer`] implementation backed by the RandR extension.
//!
//! Holds the single shared X connection for the whole process: opened once
//! by [`XrandrServer::connect`], dropped once, never implicitly reopened.
//! Every trait method is one or two synchronous round trips; a slow X
//! server stalls the caller, which is acceptable for an interactive tool.

use crate::snapshot::{CrtcId, ModeId, ModeRecord, OutputId, OutputSnapshot, Snapshot};
use crate::traits::{ApplyOutcome, ControllerInfo, DisplayServer};
use log::{debug, info};
use std::cell::Cell;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::randr::{self, ConnectionExt as _, ModeFlag, Rotation, SetConfig};
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt as _, Timestamp, Window};
use x11rb::rust_connection::RustConnection;

/// Name of the RandR output property carrying the EDID blob.
const EDID_PROPERTY: &[u8] = b"EDID";

/// An EDID base block is 128 bytes; we never need the extensions.
const EDID_BLOCK_LEN: u32 = 128;

/// Errors from talking to the X server.
#[derive(Debug, thiserror::Error)]
pub enum XrandrError {
    #[error("failed to connect to X server: {0}")]
    Connect(#[from] ConnectError),

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),
}

/// RandR-backed display server handle.
pub struct XrandrServer {
    conn: RustConnection,
    root: Window,
    /// Config timestamp of the most recent resources query.  RandR requires
    /// it on every info/config request to detect stale snapshots.
    config_timestamp: Cell<Timestamp>,
}

impl XrandrServer {
    /// Connect to the X server named by `$DISPLAY`.
    ///
    /// Fails when no server is reachable or it lacks RandR 1.2 — both are
    /// bootstrap preconditions, so the caller should treat this as fatal.
    pub fn connect() -> Result<Self, XrandrError> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let root = conn.setup().roots[screen_num].root;
        let version = conn.randr_query_version(1, 2)?.reply()?;
        info!(
            "connected to X screen {screen_num}, RandR {}.{}",
            version.major_version, version.minor_version
        );

        let server = Self {
            conn,
            root,
            config_timestamp: Cell::new(x11rb::CURRENT_TIME),
        };
        // Seed the config timestamp so per-handle queries work before the
        // first full snapshot.
        let res = server.conn.randr_get_screen_resources(server.root)?.reply()?;
        server.config_timestamp.set(res.config_timestamp);
        Ok(server)
    }
}

/// Split the packed mode-name buffer of a resources reply into one name per
/// mode.  Names are concatenated in mode order, with per-mode lengths in
/// each `ModeInfo`.
fn unpack_mode_names<'a>(
    modes: &[randr::ModeInfo],
    mut names: &'a [u8],
) -> impl Iterator<Item = String> + 'a {
    let lengths: Vec<usize> = modes.iter().map(|m| usize::from(m.name_len)).collect();
    lengths.into_iter().map(move |len| {
        let len = len.min(names.len());
        let (raw, rest) = names.split_at(len);
        names = rest;
        String::from_utf8_lossy(raw).into_owned()
    })
}

impl DisplayServer for XrandrServer {
    type Error = XrandrError;

    fn snapshot(&self) -> Result<Snapshot, XrandrError> {
        let res = self.conn.randr_get_screen_resources(self.root)?.reply()?;
        self.config_timestamp.set(res.config_timestamp);

        let modes: Vec<ModeRecord> = res
            .modes
            .iter()
            .zip(unpack_mode_names(&res.modes, &res.names))
            .map(|(info, name)| ModeRecord {
                id: info.id,
                name,
                dot_clock: u64::from(info.dot_clock),
                h_total: u32::from(info.htotal),
                v_total: u32::from(info.vtotal),
                interlace: info.mode_flags.contains(ModeFlag::INTERLACE),
                double_scan: info.mode_flags.contains(ModeFlag::DOUBLE_SCAN),
            })
            .collect();

        let mut outputs = Vec::with_capacity(res.outputs.len());
        for &output in &res.outputs {
            let info = match self
                .conn
                .randr_get_output_info(output, res.config_timestamp)?
                .reply()
            {
                Ok(info) => info,
                // The output vanished between enumeration and this query.
                Err(ReplyError::X11Error(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            outputs.push(OutputSnapshot {
                id: output,
                name: String::from_utf8_lossy(&info.name).into_owned(),
                connected: info.connection == randr::Connection::CONNECTED,
                controller: (info.crtc != x11rb::NONE).then_some(info.crtc),
                modes: info.modes,
                preferred_count: usize::from(info.num_preferred),
            });
        }

        debug!(
            "snapshot: {} output(s), {} mode(s)",
            outputs.len(),
            modes.len()
        );
        Ok(Snapshot { outputs, modes })
    }

    fn controller_info(&self, crtc: CrtcId) -> Result<Option<ControllerInfo>, XrandrError> {
        match self
            .conn
            .randr_get_crtc_info(crtc, self.config_timestamp.get())?
            .reply()
        {
            Ok(info) => Ok(Some(ControllerInfo {
                x: info.x,
                y: info.y,
                mode: info.mode,
            })),
            Err(ReplyError::X11Error(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn output_controller(&self, output: OutputId) -> Result<Option<CrtcId>, XrandrError> {
        match self
            .conn
            .randr_get_output_info(output, self.config_timestamp.get())?
            .reply()
        {
            Ok(info) => Ok((info.crtc != x11rb::NONE).then_some(info.crtc)),
            Err(ReplyError::X11Error(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch_identity(&self, output: OutputId) -> Result<Option<Vec<u8>>, XrandrError> {
        // only_if_exists: a server that has never seen an EDID property
        // simply does not have the atom.
        let atom = self.conn.intern_atom(true, EDID_PROPERTY)?.reply()?.atom;
        if atom == x11rb::NONE {
            return Ok(None);
        }

        let reply = match self
            .conn
            .randr_get_output_property(
                output,
                atom,
                x11rb::NONE,
                0,
                EDID_BLOCK_LEN / 4,
                false,
                false,
            )?
            .reply()
        {
            Ok(reply) => reply,
            Err(ReplyError::X11Error(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if reply.format != 8
            || reply.type_ != u32::from(AtomEnum::INTEGER)
            || reply.num_items < 1
        {
            return Ok(None);
        }
        // reply.data is already our own copy.
        Ok(Some(reply.data))
    }

    fn apply_mode(
        &self,
        crtc: CrtcId,
        output: OutputId,
        mode: ModeId,
    ) -> Result<ApplyOutcome, XrandrError> {
        let cookie = self.conn.randr_set_crtc_config(
            crtc,
            x11rb::CURRENT_TIME,
            self.config_timestamp.get(),
            0,
            0,
            mode,
            Rotation::ROTATE0,
            &[output],
        )?;
        match cookie.reply() {
            Ok(reply) if reply.status == SetConfig::SUCCESS => Ok(ApplyOutcome::Accepted),
            Ok(reply) => Ok(ApplyOutcome::Rejected(format!("{:?}", reply.status))),
            // A protocol error for a bad handle/mode pairing is still the
            // server saying no, not a transport failure.
            Err(ReplyError::X11Error(e)) => {
                Ok(ApplyOutcome::Rejected(format!("{:?}", e.error_kind)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_info(id: u32, name_len: u16) -> randr::ModeInfo {
        randr::ModeInfo {
            id,
            name_len,
            ..Default::default()
        }
    }

    #[test]
    fn mode_names_unpack_sequentially() {
        let modes = [mode_info(1, 9), mode_info(2, 8)];
        let names: Vec<String> = unpack_mode_names(&modes, b"1920x10801280x720").collect();
        assert_eq!(names, ["1920x1080", "1280x720"]);
    }

    #[test]
    fn truncated_name_buffer_does_not_panic() {
        let modes = [mode_info(1, 9), mode_info(2, 8)];
        let names: Vec<String> = unpack_mode_names(&modes, b"1920x1080128").collect();
        assert_eq!(names, ["1920x1080", "128"]);
    }
}
