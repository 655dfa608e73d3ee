//! Field options and their JSON form.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{FieldError, Result};

/// Largest population a field will allocate.
pub const MAX_QUANTITY: usize = 100_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Particles kept alive at steady state. At most [`MAX_QUANTITY`].
    pub quantity: usize,
    /// Inverse strength of the pointer pull.
    pub staticity: f32,
    /// Divisor of the per-frame offset easing; larger converges slower.
    pub ease: f32,
    /// Base radius. Each particle adds 0 or 1 to it.
    pub size: f32,
    pub color: String,
    pub vx: f32,
    pub vy: f32,
    /// Flipping this value regenerates the population.
    pub refresh: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            quantity: 100,
            staticity: 50.0,
            ease: 50.0,
            size: 0.4,
            color: "#ffffff".to_string(),
            vx: 0.0,
            vy: 0.0,
            refresh: false,
        }
    }
}

impl FieldConfig {
    /// Values used behind the landing page hero.
    pub fn hero() -> Self {
        Self {
            quantity: 80,
            color: "#3b82f6".to_string(),
            ease: 20.0,
            refresh: true,
            ..Self::default()
        }
    }

    pub fn rgb(&self) -> Result<Rgb> {
        Rgb::from_hex(&self.color)
    }

    pub fn validate(&self) -> Result<()> {
        let numbers = [
            ("staticity", self.staticity),
            ("ease", self.ease),
            ("size", self.size),
            ("vx", self.vx),
            ("vy", self.vy),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(FieldError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }

        if self.quantity > MAX_QUANTITY {
            return Err(FieldError::InvalidConfig(format!(
                "quantity must be at most {MAX_QUANTITY}, got {}",
                self.quantity
            )));
        }
        if self.staticity <= 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "staticity must be positive, got {}",
                self.staticity
            )));
        }
        if self.ease <= 0.0 {
            return Err(FieldError::InvalidConfig(format!("ease must be positive, got {}", self.ease)));
        }
        if self.size < 0.0 {
            return Err(FieldError::InvalidConfig(format!("size must not be negative, got {}", self.size)));
        }

        self.rgb().map(|_| ())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
