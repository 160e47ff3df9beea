//! JSON shapes of the CRM API and their conversion into domain types.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::api::SessionUser;
use crate::domain::board::{BoardSnapshot, StageTotals};
use crate::domain::event::EventSummary;
use crate::domain::stage::PipelineStage;

/// Body of `GET /eventos`.
#[derive(Debug, Deserialize)]
pub struct BoardResponse {
    #[serde(default)]
    pub kanban: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    pub totales: BTreeMap<String, TotalsPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TotalsPayload {
    #[serde(default)]
    pub cantidad: usize,
    #[serde(default)]
    pub monto: Option<f64>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: SessionUser,
}

/// Body of `PUT /eventos/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateEventResponse {
    pub evento: EventSummary,
}

/// Error body returned with 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extracts the server message from a raw body, falling back to the body
    /// text itself.
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error.or(parsed.message))
            .unwrap_or_else(|| body.trim().to_string())
    }
}

impl From<BoardResponse> for BoardSnapshot {
    /// Columns with codes outside the board and cards that fail to decode are
    /// skipped so one bad record does not blank the whole board.
    fn from(response: BoardResponse) -> Self {
        let mut snapshot = BoardSnapshot::default();

        for (code, raw_events) in response.kanban {
            let stage = match code.parse::<PipelineStage>() {
                Ok(stage) => stage,
                Err(err) => {
                    log::warn!("Skipping board column {code}: {err}");
                    continue;
                }
            };

            let events = snapshot.stages.entry(stage).or_default();
            for raw in raw_events {
                match serde_json::from_value::<EventSummary>(raw) {
                    Ok(mut event) => {
                        event.stage = stage;
                        events.push(event);
                    }
                    Err(err) => log::warn!("Skipping undecodable event in {code}: {err}"),
                }
            }
        }

        for (code, totals) in response.totales {
            if let Ok(stage) = code.parse::<PipelineStage>() {
                snapshot.totals.insert(
                    stage,
                    StageTotals {
                        count: totals.cantidad,
                        amount: totals.monto.unwrap_or(0.0),
                    },
                );
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_board_and_skips_unknown_columns() {
        let response: BoardResponse = serde_json::from_value(json!({
            "kanban": {
                "ASIGNADO": [
                    {"id": 42, "estado": "ASIGNADO", "presupuesto": 1000.0},
                    {"id": "broken"}
                ],
                "COTIZADO": [],
                "ELIMINADO": [{"id": 7, "estado": "ELIMINADO"}]
            },
            "totales": {
                "ASIGNADO": {"cantidad": 1, "monto": 1000.0},
                "COTIZADO": {"cantidad": 0, "monto": 0},
                "ELIMINADO": {"cantidad": 1, "monto": 0}
            }
        }))
        .unwrap();

        let snapshot = BoardSnapshot::from(response);
        assert_eq!(snapshot.events(PipelineStage::Assigned).len(), 1);
        assert!(snapshot.events(PipelineStage::Quoted).is_empty());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.totals.len(), 2);
        assert_eq!(snapshot.stage_totals(PipelineStage::Assigned).amount, 1000.0);
    }

    #[test]
    fn confirmed_column_fills_the_approved_stage() {
        let response: BoardResponse = serde_json::from_value(json!({
            "kanban": {
                "CONFIRMADO": [{"id": 5, "estado": "CONFIRMADO", "presupuesto": 9000}]
            },
            "totales": {
                "CONFIRMADO": {"cantidad": 1, "monto": 9000}
            }
        }))
        .unwrap();

        let snapshot = BoardSnapshot::from(response);
        assert_eq!(snapshot.len(), 1);
        let approved = snapshot.events(PipelineStage::Approved);
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].stage, PipelineStage::Approved);
        assert_eq!(snapshot.stage_totals(PipelineStage::Approved).count, 1);
        assert_eq!(snapshot.stage_totals(PipelineStage::Approved).amount, 9000.0);
        assert_eq!(snapshot.grand_totals().amount, 9000.0);
    }

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error": "Credenciales inválidas"}"#),
            "Credenciales inválidas"
        );
        assert_eq!(ErrorBody::message_from("Bad Gateway\n"), "Bad Gateway");
    }
}
