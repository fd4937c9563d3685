//! Best-effort EDID decoding.
//!
//! EDID is the 128-byte identity structure a monitor exposes over DDC; the
//! display server forwards it verbatim as an output property.  We only need
//! the model name out of it, so the decoder is deliberately permissive:
//! malformed input degrades the extracted information, it never aborts
//! processing.  Checksum and header anomalies are logged at warning level
//! and reported in the result, and parsing continues regardless.

use log::warn;

/// Fixed 8-byte magic at the start of every EDID block.
const HEADER_MAGIC: [u8; 8] = [0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];

/// Offset of the first 18-byte descriptor block.
const DESCRIPTOR_START: usize = 0x36;

/// One past the last descriptor block (four blocks of 18 bytes).
const DESCRIPTOR_END: usize = 0x7e;

/// Size of one descriptor block.
const DESCRIPTOR_LEN: usize = 18;

/// Descriptor tag marking the model-name ("display product name") descriptor.
const TAG_MODEL_NAME: u8 = 0xfc;

/// Decoded monitor identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdidIdentity {
    /// Whether the byte sum of the blob is 0 modulo 256.
    pub checksum_ok: bool,
    /// Whether the blob starts with the fixed EDID header magic.
    pub header_ok: bool,
    /// Model name from the last tag-0xFC descriptor, at most 13 characters.
    /// Empty when no such descriptor exists.
    pub model_name: String,
}

/// Decode an EDID blob of up to 128 bytes.
///
/// Never fails and never panics: short, empty, or corrupt input simply
/// yields less information.  When several model-name descriptors are
/// present, the last one in scan order wins.
pub fn parse(blob: &[u8]) -> EdidIdentity {
    let checksum_ok = blob.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) == 0;
    if !checksum_ok {
        warn!("edid checksum failed");
    }

    let header_ok = blob.len() >= HEADER_MAGIC.len() && blob[..HEADER_MAGIC.len()] == HEADER_MAGIC;
    if !header_ok {
        warn!("edid header incorrect, probably not an edid");
    }

    let mut model_name = String::new();
    let mut offset = DESCRIPTOR_START;
    while offset < DESCRIPTOR_END && offset + DESCRIPTOR_LEN <= blob.len() {
        let block = &blob[offset..offset + DESCRIPTOR_LEN];
        // First two bytes zero means display descriptor rather than a
        // detailed timing descriptor.
        if block[0] == 0x00 && block[1] == 0x00 && block[3] == TAG_MODEL_NAME {
            model_name = descriptor_text(&block[5..DESCRIPTOR_LEN]);
        }
        offset += DESCRIPTOR_LEN;
    }

    EdidIdentity {
        checksum_ok,
        header_ok,
        model_name,
    }
}

/// Extract the text payload of a display descriptor.
///
/// A line feed terminates the field (the remainder is space padding); NUL
/// bytes are treated the same way.
fn descriptor_text(field: &[u8]) -> String {
    let text: Vec<u8> = field
        .iter()
        .copied()
        .take_while(|&b| b != 0x0a && b != 0x00)
        .collect();
    String::from_utf8_lossy(&text).into_owned()
}
