use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::stage::PipelineStage;
use crate::domain::types::{ClientId, EventId, LocationId, UserId};

/// Deserializes `null` into `T::default()` instead of failing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Customer the event is booked for.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientRef {
    pub id: ClientId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Venue the event is held at.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LocationRef {
    pub id: LocationId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Salesperson the event is assigned to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SalespersonRef {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "baja")]
    Low,
    #[default]
    #[serde(rename = "normal", other)]
    Normal,
}

/// Service-level status computed by the server from time spent in a stage.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlaStatus {
    #[default]
    #[serde(rename = "ok", alias = "none")]
    None,
    #[serde(rename = "alerta", alias = "alert")]
    Alert,
    #[serde(rename = "critico", alias = "critical")]
    Critical,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaIndicator {
    #[serde(default)]
    pub status: SlaStatus,
    #[serde(rename = "segundos", default)]
    pub elapsed_secs: u64,
}

/// Card shown on the board. The server owns this record; the client keeps a
/// read-mostly copy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventSummary {
    pub id: EventId,
    /// Custom title entered by a salesperson.
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    /// Title computed by the server, preferred over local generation.
    #[serde(rename = "titulo_display", default)]
    pub server_title: Option<String>,
    #[serde(rename = "cliente", default)]
    pub client: Option<ClientRef>,
    #[serde(rename = "local", default)]
    pub location: Option<LocationRef>,
    #[serde(rename = "comercial", default)]
    pub salesperson: Option<SalespersonRef>,
    #[serde(rename = "presupuesto", default)]
    pub budget: Option<f64>,
    #[serde(rename = "cantidad_personas", default)]
    pub headcount: Option<i32>,
    #[serde(rename = "fecha_evento", default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "tipo", default)]
    pub event_type: Option<String>,
    #[serde(rename = "estado")]
    pub stage: PipelineStage,
    #[serde(rename = "prioridad", default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(rename = "tentativo", default, deserialize_with = "null_as_default")]
    pub tentative: bool,
    #[serde(default)]
    pub sla: Option<SlaIndicator>,
}

impl EventSummary {
    /// Builds a bare event in the given stage. Remaining fields are empty.
    pub fn new(id: EventId, stage: PipelineStage) -> Self {
        Self {
            id,
            title: None,
            server_title: None,
            client: None,
            location: None,
            salesperson: None,
            budget: None,
            headcount: None,
            event_date: None,
            created_at: None,
            event_type: None,
            stage,
            priority: Priority::default(),
            tentative: false,
            sla: None,
        }
    }

    /// Title to show on the card: server title, then custom title, then a
    /// generated `PAX 20 — Costa 7070 — Social` style title.
    pub fn display_title(&self) -> String {
        self.server_title
            .as_deref()
            .or(self.title.as_deref())
            .filter(|title| !title.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.generated_title())
    }

    fn generated_title(&self) -> String {
        let mut parts = Vec::new();

        if let Some(headcount) = self.headcount.filter(|n| *n > 0) {
            parts.push(format!("PAX {headcount}"));
        }
        if let Some(location) = &self.location {
            parts.push(location.name.clone());
        }
        if let Some(event_type) = self.event_type.as_deref().filter(|t| !t.is_empty()) {
            let mut chars = event_type.chars();
            if let Some(first) = chars.next() {
                parts.push(first.to_uppercase().chain(chars).collect());
            }
        }

        if parts.is_empty() {
            let client = self
                .client
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("cliente");
            format!("Evento de {client}")
        } else {
            parts.join(" — ")
        }
    }

    pub fn client_name(&self) -> &str {
        self.client.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn client_phone(&self) -> &str {
        self.client
            .as_ref()
            .and_then(|c| c.phone.as_deref())
            .unwrap_or("")
    }

    pub fn client_email(&self) -> &str {
        self.client
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .unwrap_or("")
    }

    pub fn location_name(&self) -> &str {
        self.location.as_ref().map(|l| l.name.as_str()).unwrap_or("")
    }

    pub fn salesperson_name(&self) -> &str {
        self.salesperson
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("")
    }

    /// Budget with a missing value read as zero.
    pub fn budget_or_zero(&self) -> f64 {
        self.budget.unwrap_or(0.0)
    }

    /// Headcount with a missing value read as zero.
    pub fn headcount_or_zero(&self) -> i32 {
        self.headcount.unwrap_or(0)
    }

    pub fn is_priority(&self) -> bool {
        self.priority == Priority::High
    }

    pub fn sla_status(&self) -> SlaStatus {
        self.sla.map(|sla| sla.status).unwrap_or_default()
    }
}

/// Partial update sent to the API. Absent fields are left untouched by the
/// server.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct EventUpdate {
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "comercial_id", skip_serializing_if = "Option::is_none")]
    pub salesperson_id: Option<UserId>,
    #[serde(rename = "local_id", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    #[serde(rename = "presupuesto", skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(rename = "cantidad_personas", skip_serializing_if = "Option::is_none")]
    pub headcount: Option<i32>,
    #[serde(rename = "fecha_evento", skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(rename = "prioridad", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl EventUpdate {
    /// Update that only moves the event to another stage.
    pub fn stage(stage: PipelineStage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }
}
