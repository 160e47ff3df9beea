use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::types::TypeConstraintError;

/// A column of the sales pipeline.
///
/// Variants are declared in pipeline order, so the derived `Ord` sorts
/// stages left to right as they appear on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    IncomingInquiry,
    Assigned,
    Contacted,
    Quoted,
    Approved,
    Rejected,
    Concluded,
    MultiReservation,
}

impl PipelineStage {
    /// Every stage, in board order.
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::IncomingInquiry,
        PipelineStage::Assigned,
        PipelineStage::Contacted,
        PipelineStage::Quoted,
        PipelineStage::Approved,
        PipelineStage::Rejected,
        PipelineStage::Concluded,
        PipelineStage::MultiReservation,
    ];

    /// Code used by the CRM API.
    pub const fn code(self) -> &'static str {
        match self {
            PipelineStage::IncomingInquiry => "CONSULTA_ENTRANTE",
            PipelineStage::Assigned => "ASIGNADO",
            PipelineStage::Contacted => "CONTACTADO",
            PipelineStage::Quoted => "COTIZADO",
            PipelineStage::Approved => "APROBADO",
            PipelineStage::Rejected => "RECHAZADO",
            PipelineStage::Concluded => "CONCLUIDO",
            PipelineStage::MultiReservation => "MULTIRESERVA",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            PipelineStage::IncomingInquiry => "Consulta Entrante",
            PipelineStage::Assigned => "Asignado",
            PipelineStage::Contacted => "Contactado",
            PipelineStage::Quoted => "Cotizado",
            PipelineStage::Approved => "Aprobado",
            PipelineStage::Rejected => "Rechazado",
            PipelineStage::Concluded => "Concluido",
            PipelineStage::MultiReservation => "Multireserva",
        }
    }

    /// Accent colour of the column header.
    pub const fn color(self) -> &'static str {
        match self {
            PipelineStage::IncomingInquiry => "#6b7280",
            PipelineStage::Assigned => "#3b82f6",
            PipelineStage::Contacted => "#8b5cf6",
            PipelineStage::Quoted => "#f59e0b",
            PipelineStage::Approved => "#10b981",
            PipelineStage::Rejected => "#ef4444",
            PipelineStage::Concluded => "#14b8a6",
            PipelineStage::MultiReservation => "#ec4899",
        }
    }

    /// Position of the stage on the board, starting at zero.
    pub fn ordinal(self) -> usize {
        PipelineStage::ALL
            .iter()
            .position(|stage| *stage == self)
            .unwrap_or_default()
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

const CONFIRMED_ALIAS: &str = "CONFIRMADO";

impl FromStr for PipelineStage {
    type Err = TypeConstraintError;

    /// Accepts API codes in any letter case (`cotizado`, `COTIZADO`).
    /// `CONFIRMADO`, the backend's name for the approved column, reads as
    /// [`PipelineStage::Approved`].
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase().replace(['-', ' '], "_");
        if normalized == CONFIRMED_ALIAS {
            return Ok(PipelineStage::Approved);
        }
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.code() == normalized)
            .ok_or_else(|| TypeConstraintError::UnknownStage(value.to_string()))
    }
}

impl TryFrom<&str> for PipelineStage {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for PipelineStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for PipelineStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
