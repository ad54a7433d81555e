// src/model/dimension.rs
use serde::{Deserialize, Serialize};

/// A dimension declared on a fact model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: DimensionKind,
}

/// How a dimension maps onto the fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionKind {
    /// Degenerate attribute stored on the fact table. `column` defaults to
    /// the dimension name.
    Column {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
    },
    /// Timestamp attribute on the fact table, drilled by precision unit.
    Datetime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
    },
    /// Join to another fact model's table.
    Association {
        fact_model: String,
        /// Defaults to `<dimension>_id`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        foreign_key: Option<String>,
        /// Key on the associated table. Defaults to that model's
        /// `primary_key`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        primary_key: Option<String>,
    },
}

impl DimensionDef {
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Column { column: None },
        }
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Datetime { column: None },
        }
    }

    pub fn association(name: impl Into<String>, fact_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Association {
                fact_model: fact_model.into(),
                foreign_key: None,
                primary_key: None,
            },
        }
    }

    /// Override the physical column (column and datetime dimensions) or the
    /// foreign key (associations).
    pub fn on(mut self, physical: impl Into<String>) -> Self {
        let physical = physical.into();
        match &mut self.kind {
            DimensionKind::Column { column } | DimensionKind::Datetime { column } => {
                *column = Some(physical)
            }
            DimensionKind::Association { foreign_key, .. } => *foreign_key = Some(physical),
        }
        self
    }

    /// Association joined on `primary_key` instead of the target model's
    /// own key.
    pub fn association_on_key(
        name: impl Into<String>,
        fact_model: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Association {
                fact_model: fact_model.into(),
                foreign_key: None,
                primary_key: Some(primary_key.into()),
            },
        }
    }

    /// Column on the fact table this dimension reads or joins through.
    pub fn fact_column(&self) -> String {
        match &self.kind {
            DimensionKind::Column { column } | DimensionKind::Datetime { column } => {
                column.clone().unwrap_or_else(|| self.name.clone())
            }
            DimensionKind::Association { foreign_key, .. } => foreign_key
                .clone()
                .unwrap_or_else(|| format!("{}_id", self.name)),
        }
    }

    /// Name of the associated fact model, if any.
    pub fn associated_model(&self) -> Option<&str> {
        match &self.kind {
            DimensionKind::Association { fact_model, .. } => Some(fact_model),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            DimensionKind::Column { .. } => "column",
            DimensionKind::Datetime { .. } => "datetime",
            DimensionKind::Association { .. } => "association",
        }
    }
}

/// Ordered drill-down chain, coarsest last: `[date, month, year]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionHierarchy {
    levels: Vec<String>,
}

impl DimensionHierarchy {
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn contains(&self, level: &str) -> bool {
        self.position(level).is_some()
    }

    pub fn position(&self, level: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == level)
    }

    /// The next finer level, e.g. `month` -> `date`.
    pub fn drill_down(&self, level: &str) -> Option<&str> {
        match self.position(level)? {
            0 => None,
            i => Some(&self.levels[i - 1]),
        }
    }

    /// The next coarser level, e.g. `month` -> `year`.
    pub fn roll_up(&self, level: &str) -> Option<&str> {
        let i = self.position(level)?;
        self.levels.get(i + 1).map(String::as_str)
    }

    /// First level that appears more than once.
    pub fn duplicate_level(&self) -> Option<&str> {
        self.levels
            .iter()
            .enumerate()
            .find(|(i, level)| self.levels[..*i].contains(level))
            .map(|(_, level)| level.as_str())
    }
}
