use serde::{Deserialize, Serialize};

/// Field a list or column can be ordered by.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    ClientName,
    Location,
    EventDate,
    Stage,
    Budget,
    Assignee,
    /// Unknown values stored by older sessions fall back to creation order.
    #[default]
    #[serde(other)]
    CreatedAt,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Same field, opposite direction.
    pub fn reversed(self) -> Self {
        Self::new(self.field, self.direction.reversed())
    }

    /// Header-click behaviour of the list view: clicking the active column
    /// flips the direction, clicking another column sorts it ascending.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            self.reversed()
        } else {
            Self::asc(field)
        }
    }
}
