use serde::{Deserialize, Serialize};

use crate::domain::event::SlaStatus;
use crate::domain::types::EventId;

/// Event whose time in the current stage breached an SLA threshold.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotificationItem {
    pub id: EventId,
    #[serde(rename = "titulo_display", default)]
    pub display_title: Option<String>,
    /// Raw stage code; notifications may reference stages outside the board.
    #[serde(rename = "estado")]
    pub stage: String,
    #[serde(rename = "sla_status")]
    pub sla_status: SlaStatus,
    #[serde(rename = "segundos")]
    pub elapsed_secs: u64,
    #[serde(rename = "comercial_nombre", default)]
    pub salesperson_name: Option<String>,
    #[serde(rename = "cliente_nombre", default)]
    pub client_name: Option<String>,
}

impl NotificationItem {
    pub fn title(&self) -> String {
        self.display_title
            .clone()
            .unwrap_or_else(|| format!("Evento #{}", self.id))
    }
}

/// Result of one notification poll. Critical items come first.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationSummary {
    #[serde(rename = "eventos", default)]
    pub items: Vec<NotificationItem>,
    #[serde(rename = "total_criticos", default)]
    pub critical_count: usize,
    #[serde(rename = "total_alertas", default)]
    pub alert_count: usize,
}
