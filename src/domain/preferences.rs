use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::filter::FilterSet;
use crate::domain::sort::SortSpec;
use crate::domain::stage::PipelineStage;

/// Which of the three renderings of the pipeline is active.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Board,
    List,
    Forecast,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Board => "board",
            ViewMode::List => "list",
            ViewMode::Forecast => "forecast",
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = crate::domain::types::TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "board" | "kanban" => Ok(ViewMode::Board),
            "list" | "lista" => Ok(ViewMode::List),
            "forecast" => Ok(ViewMode::Forecast),
            other => Err(crate::domain::types::TypeConstraintError::InvalidValue(
                format!("unknown view mode: {other}"),
            )),
        }
    }
}

/// User preferences that survive a restart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewPreferences {
    pub view_mode: ViewMode,
    pub filters: FilterSet,
    pub list_sort: SortSpec,
    /// Per-column overrides; stages without an entry use the default
    /// creation-date ascending order.
    pub stage_sorts: BTreeMap<PipelineStage, SortSpec>,
    pub filter_panel_visible: bool,
}

impl ViewPreferences {
    pub fn stage_sort(&self, stage: PipelineStage) -> SortSpec {
        self.stage_sorts.get(&stage).copied().unwrap_or_default()
    }
}
