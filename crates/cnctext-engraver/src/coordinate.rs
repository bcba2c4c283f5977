//! Work coordinate systems G54..G59.

use std::fmt;

use cnctext_core::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// One of the six primary work offset registers
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum CoordinateSystem {
    #[default]
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
}

impl CoordinateSystem {
    pub const ALL: [CoordinateSystem; 6] = [
        Self::G54,
        Self::G55,
        Self::G56,
        Self::G57,
        Self::G58,
        Self::G59,
    ];

    /// The G-code number, 54..=59
    pub fn number(self) -> u8 {
        match self {
            Self::G54 => 54,
            Self::G55 => 55,
            Self::G56 => 56,
            Self::G57 => 57,
            Self::G58 => 58,
            Self::G59 => 59,
        }
    }

    /// The system `steps` registers after this one
    pub fn offset(self, steps: usize) -> ConfigResult<Self> {
        let number = usize::from(self.number()).saturating_add(steps);
        match u8::try_from(number) {
            Ok(number) => Self::try_from(number),
            Err(_) => Err(ConfigError::OutOfRange {
                key: "coordinate system".to_string(),
                value: format!("G{}", number),
            }),
        }
    }
}

impl TryFrom<u8> for CoordinateSystem {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            54 => Ok(Self::G54),
            55 => Ok(Self::G55),
            56 => Ok(Self::G56),
            57 => Ok(Self::G57),
            58 => Ok(Self::G58),
            59 => Ok(Self::G59),
            other => Err(ConfigError::InvalidCoordinateSystem(other)),
        }
    }
}

impl From<CoordinateSystem> for u8 {
    fn from(cs: CoordinateSystem) -> Self {
        cs.number()
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.number())
    }
}
