use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    /// Parses `#rrggbb` or the short `#rgb` form. The `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FieldError::InvalidColor(hex.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(FieldError::InvalidColor(hex.to_string())),
        };

        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|_| FieldError::InvalidColor(hex.to_string()))?;

        Ok(Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        })
    }
}

impl std::str::FromStr for Rgb {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}
