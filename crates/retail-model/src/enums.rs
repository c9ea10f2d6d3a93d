use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Normalized customer gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Masculino,
    Femenino,
    Otro,
}

impl Gender {
    /// Maps a raw gender code. Only `M` and `F` (any case) are recognised.
    pub fn from_code(raw: Option<&str>) -> Self {
        match raw.map(str::to_uppercase).as_deref() {
            Some("M") => Gender::Masculino,
            Some("F") => Gender::Femenino,
            _ => Gender::Otro,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Masculino => "Masculino",
            Gender::Femenino => "Femenino",
            Gender::Otro => "Otro",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipment status accepted by the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Retrasado,
    Entregado,
    #[serde(rename = "En tránsito")]
    EnTransito,
    Cancelado,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Retrasado,
        ShipmentStatus::Entregado,
        ShipmentStatus::EnTransito,
        ShipmentStatus::Cancelado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShipmentStatus::Retrasado => "Retrasado",
            ShipmentStatus::Entregado => "Entregado",
            ShipmentStatus::EnTransito => "En tránsito",
            ShipmentStatus::Cancelado => "Cancelado",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the warehouse labels.
impl FromStr for ShipmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}
