use core::fmt;

use heapless::Vec;

use crate::constants::{DEV_EUI_GROUP_LEN, DEV_EUI_OCTETS, LINE_LEN};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DevEuiError {
    MissingComma,
    MissingPayload,
}

/// DevEui as one contiguous hex string, e.g. `2CF7F12024005D79`.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct DevEui {
    hex: Vec<u8, LINE_LEN>,
}

impl DevEui {
    pub fn as_bytes(&self) -> &[u8] {
        &self.hex
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.hex).unwrap_or("")
    }

    /// Decodes the canonical 16-digit form. `None` for anything else.
    pub fn octets(&self) -> Option<[u8; DEV_EUI_OCTETS]> {
        if self.hex.len() != DEV_EUI_OCTETS * 2 {
            return None;
        }

        let mut out = [0u8; DEV_EUI_OCTETS];
        for (octet, pair) in out.iter_mut().zip(self.hex.chunks_exact(2)) {
            *octet = (hex_nibble(pair[0])? << 4) | hex_nibble(pair[1])?;
        }

        Some(out)
    }
}

impl fmt::Display for DevEui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.hex.iter() {
            fmt::Write::write_char(f, b as char)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DevEui {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:a}", self.as_bytes())
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Reformats `<label>, <hex>:<hex>:...` into the groups concatenated without
/// delimiters.
///
/// The payload starts two bytes after the first comma (the comma itself plus
/// one separator). Each group keeps at most `DEV_EUI_GROUP_LEN` characters;
/// the rest of an over-long group is discarded up to the next `:`.
pub fn format_dev_eui(line: &[u8]) -> Result<DevEui, DevEuiError> {
    let comma = line.iter().position(|&b| b == b',').ok_or_else(|| {
        error!("deveui: no comma in response");
        DevEuiError::MissingComma
    })?;

    let payload = match line.get(comma + 2..) {
        Some(p) if !p.is_empty() => p,
        _ => {
            error!("deveui: nothing after comma");
            return Err(DevEuiError::MissingPayload);
        }
    };

    let mut out = DevEui::default();
    for group in payload.split(|&b| b == b':') {
        let kept = &group[..group.len().min(DEV_EUI_GROUP_LEN)];
        // payload is shorter than LINE_LEN, so this never fails
        let _ = out.hex.extend_from_slice(kept);
    }

    Ok(out)
}
