//! EDID identity resolution
//!
//! Extracts the monitor name and a stable serial from a hex-encoded EDID
//! base block. Decoding never fails: a blob that cannot be decoded still gets a
//! deterministic serial derived from its bytes, so a connected monitor with a
//! garbled EDID keeps a usable identity.

use sha1::{Digest, Sha1};
use tracing::warn;

use crate::constants::edid::*;

/// Identity fields decoded from one EDID blob
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdidIdentity {
    /// Monitor name descriptor, if the EDID carries one
    pub name: Option<String>,
    /// Serial string without the sigil; empty only for an empty EDID
    pub serial: String,
}

impl EdidIdentity {
    /// Resolve the identity of a hex-encoded EDID blob
    pub fn resolve(edid_hex: &str) -> Self {
        let hex: String = edid_hex.chars().filter(|c| !c.is_whitespace()).collect();
        if hex.is_empty() {
            return Self::default();
        }

        match decode_hex(&hex).and_then(|bytes| parse_base_block(&bytes)) {
            Some(identity) => identity,
            None => {
                warn!(edid = %hex, "Could not decode EDID, using fingerprint as serial");
                Self {
                    name: None,
                    serial: fingerprint(&hex),
                }
            }
        }
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

fn parse_base_block(bytes: &[u8]) -> Option<EdidIdentity> {
    if bytes.len() < BLOCK_SIZE || bytes[..HEADER.len()] != HEADER {
        return None;
    }

    let mut name = None;
    let mut serial_text = None;
    for offset in DESCRIPTOR_OFFSETS {
        let descriptor = &bytes[offset..offset + DESCRIPTOR_SIZE];
        // Detailed timing descriptors start with a non-zero pixel clock
        if descriptor[0] != 0 || descriptor[1] != 0 {
            continue;
        }
        match descriptor[3] {
            TAG_NAME => name = descriptor_text(&descriptor[5..]),
            TAG_SERIAL => serial_text = descriptor_text(&descriptor[5..]),
            _ => {}
        }
    }

    let serial = serial_text.unwrap_or_else(|| {
        let raw = &bytes[SERIAL_OFFSET..SERIAL_OFFSET + 4];
        u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]).to_string()
    });

    Some(EdidIdentity { name, serial })
}

/// Descriptor text ends at 0x0A and is padded with spaces
fn descriptor_text(raw: &[u8]) -> Option<String> {
    let end = raw
        .iter()
        .position(|&b| b == 0x0A || b == 0x00)
        .unwrap_or(raw.len());
    let text = String::from_utf8_lossy(&raw[..end]).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn fingerprint(hex: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(hex.to_ascii_lowercase().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a hex EDID base block with optional name/serial descriptors
    pub(crate) fn sample_edid(name: Option<&str>, serial_text: Option<&str>, serial_no: u32) -> String {
        let mut block = [0u8; BLOCK_SIZE];
        block[..8].copy_from_slice(&HEADER);
        // "DEL" manufacturer id, product 0x4099
        block[8] = 0x10;
        block[9] = 0xAC;
        block[10] = 0x99;
        block[11] = 0x40;
        block[SERIAL_OFFSET..SERIAL_OFFSET + 4].copy_from_slice(&serial_no.to_le_bytes());
        // First descriptor: a detailed timing (non-zero pixel clock)
        block[54] = 0x02;
        block[55] = 0x3A;

        let mut write_text = |offset: usize, tag: u8, text: &str| {
            block[offset + 3] = tag;
            let field = &mut block[offset + 5..offset + DESCRIPTOR_SIZE];
            field.fill(b' ');
            let len = text.len().min(13);
            field[..len].copy_from_slice(&text.as_bytes()[..len]);
            if len < 13 {
                field[len] = 0x0A;
            }
        };
        if let Some(text) = serial_text {
            write_text(72, TAG_SERIAL, text);
        }
        if let Some(text) = name {
            write_text(90, TAG_NAME, text);
        }
        // Range limits descriptor, ignored
        block[108 + 3] = 0xFD;

        block.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_resolve_name_and_serial_descriptor() {
        let edid = sample_edid(Some("DELL U2415"), Some("7MT0186"), 42);
        let identity = EdidIdentity::resolve(&edid);
        assert_eq!(identity.name.as_deref(), Some("DELL U2415"));
        assert_eq!(identity.serial, "7MT0186");
    }

    #[test]
    fn test_resolve_numeric_serial_fallback() {
        let edid = sample_edid(Some("LG HDR 4K"), None, 16843009);
        let identity = EdidIdentity::resolve(&edid);
        assert_eq!(identity.name.as_deref(), Some("LG HDR 4K"));
        assert_eq!(identity.serial, "16843009");
    }

    #[test]
    fn test_resolve_without_name_descriptor() {
        let edid = sample_edid(None, None, 7);
        let identity = EdidIdentity::resolve(&edid);
        assert_eq!(identity.name, None);
        assert_eq!(identity.serial, "7");
    }

    #[test]
    fn test_resolve_ignores_whitespace_and_case() {
        let edid = sample_edid(Some("Monitor-A"), None, 1);
        let wrapped: String = edid
            .to_uppercase()
            .as_bytes()
            .chunks(32)
            .map(|chunk| format!("\t\t{}\n", String::from_utf8_lossy(chunk)))
            .collect();
        assert_eq!(EdidIdentity::resolve(&wrapped), EdidIdentity::resolve(&edid));
    }

    #[test]
    fn test_resolve_empty_edid() {
        assert_eq!(EdidIdentity::resolve(""), EdidIdentity::default());
        assert_eq!(EdidIdentity::resolve("  \n\t"), EdidIdentity::default());
    }

    #[test]
    fn test_resolve_malformed_edid_uses_fingerprint() {
        for blob in ["zz", "00ff", "abc", &"11".repeat(BLOCK_SIZE)] {
            let identity = EdidIdentity::resolve(blob);
            assert_eq!(identity.name, None);
            assert_eq!(identity.serial.len(), FINGERPRINT_LEN);
            // Deterministic across calls
            assert_eq!(identity, EdidIdentity::resolve(blob));
        }
        assert_ne!(EdidIdentity::resolve("00ff").serial, EdidIdentity::resolve("00fe").serial);
    }
}
