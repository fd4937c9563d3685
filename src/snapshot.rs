//! Domain data model for a display-server snapshot.
//!
//! All handles (`OutputId`, `CrtcId`, `ModeId`) are RandR XIDs: opaque
//! integers owned by the display server.  The records here are read-only
//! copies taken at snapshot time; the server remains authoritative and a
//! snapshot is never refreshed in place — callers re-query instead.

use std::collections::HashMap;

/// Opaque handle for a physical display connector.
pub type OutputId = u32;

/// Opaque handle for a controller (CRTC) binding an output to a mode.
pub type CrtcId = u32;

/// Opaque handle for a globally registered mode.
pub type ModeId = u32;

/// A display timing record from the server's global mode table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeRecord {
    pub id: ModeId,
    /// Symbolic name, e.g. `"1920x1080"`.
    pub name: String,
    /// Pixel clock in Hz.
    pub dot_clock: u64,
    pub h_total: u32,
    pub v_total: u32,
    /// Interlaced mode: the frame is split into two fields.
    pub interlace: bool,
    /// Doublescan mode: each scan line is emitted twice.
    pub double_scan: bool,
}

/// One output as enumerated from a snapshot.
#[derive(Debug, Clone)]
pub struct OutputSnapshot {
    pub id: OutputId,
    /// Port name, e.g. `"DP-1"`.
    pub name: String,
    pub connected: bool,
    /// The controller currently driving this output, if any.
    pub controller: Option<CrtcId>,
    /// Mode references this output supports, in the server's listed order.
    pub modes: Vec<ModeId>,
    /// The first `preferred_count` entries of [`modes`](Self::modes) are the
    /// manufacturer-preferred modes.  This is a prefix length, not a set.
    pub preferred_count: usize,
}

/// A point-in-time view of the server's outputs and global mode table.
///
/// Valid only until the server reconfigures; any mutation (including our own
/// [`activate`](crate::switch::activate)) invalidates it and callers must
/// take a fresh snapshot before further catalog work.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub outputs: Vec<OutputSnapshot>,
    pub modes: Vec<ModeRecord>,
}

impl Snapshot {
    /// Build the mode-id lookup table for this snapshot.
    ///
    /// Built once per snapshot and used for every mode-reference resolution,
    /// replacing a per-reference linear scan of the global table.
    pub fn mode_index(&self) -> HashMap<ModeId, &ModeRecord> {
        self.modes.iter().map(|m| (m.id, m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(id: ModeId, name: &str) -> ModeRecord {
        ModeRecord {
            id,
            name: name.into(),
            dot_clock: 148_500_000,
            h_total: 2200,
            v_total: 1125,
            interlace: false,
            double_scan: false,
        }
    }

    #[test]
    fn mode_index_maps_every_id() {
        let snap = Snapshot {
            outputs: vec![],
            modes: vec![mode(71, "1920x1080"), mode(72, "1280x720")],
        };
        let index = snap.mode_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&71].name, "1920x1080");
        assert_eq!(index[&72].name, "1280x720");
        assert!(!index.contains_key(&73));
    }
}
