// src/report/dimension.rs
use crate::error::{ReportingError, Result};
use crate::functions::datetime::{render_date_truncation_for, PrecisionUnit};
use crate::metric::DimensionRequest;
use crate::model::{is_valid_identifier, Catalog, DimensionKind, FactModel};
use crate::sql::expr::qualified_table_tokens;
use crate::sql::{raw_sql, table_col, Dialect, Expr, ExprExt, SqlDialect, TableRef};

/// A dimension resolved against its fact model and ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingDimension {
    name: String,
    kind: ReportingDimensionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportingDimensionKind {
    /// Column on the fact table.
    Column { table: String, column: String },
    /// Timestamp on the fact table truncated to `precision`.
    Datetime {
        table: String,
        column: String,
        precision: PrecisionUnit,
    },
    /// Label column of an associated fact model, joined under the
    /// dimension's name.
    Association {
        fact_table: String,
        foreign_key: String,
        target_model: String,
        target_table: String,
        primary_key: String,
        label: String,
        label_column: String,
    },
}

impl ReportingDimension {
    /// Resolve `request` against `fact_model`, checking its label.
    pub fn resolve(
        fact_model: &FactModel,
        request: &DimensionRequest,
        catalog: &Catalog,
    ) -> Result<Self> {
        let name = request.name();
        let def = fact_model
            .dimension_def(name)
            .ok_or_else(|| ReportingError::UnknownDimension {
                fact_model: fact_model.name.clone(),
                dimension: name.to_string(),
            })?;

        let invalid_label = |label: &str, reason: String| ReportingError::InvalidDimensionLabel {
            dimension: name.to_string(),
            label: label.to_string(),
            reason,
        };

        let kind = match &def.kind {
            DimensionKind::Column { .. } => {
                if let Some(label) = request.label() {
                    return Err(invalid_label(
                        label,
                        "column dimensions do not take a label".into(),
                    ));
                }
                ReportingDimensionKind::Column {
                    table: fact_model.table.clone(),
                    column: def.fact_column(),
                }
            }

            DimensionKind::Datetime { .. } => {
                let label = request.label().unwrap_or_default();
                let precision = PrecisionUnit::parse(label).ok_or_else(|| {
                    invalid_label(label, "datetime dimensions need a precision unit label".into())
                })?;
                ReportingDimensionKind::Datetime {
                    table: fact_model.table.clone(),
                    column: def.fact_column(),
                    precision,
                }
            }

            DimensionKind::Association {
                fact_model: target_name,
                primary_key,
                ..
            } => {
                let target = catalog.fact_model(target_name)?;
                let label = match request.label() {
                    Some(label) => label.to_string(),
                    None => target.default_dimension_label.clone().ok_or_else(|| {
                        ReportingError::MissingDimensionLabel {
                            dimension: name.to_string(),
                            fact_model: target.name.clone(),
                        }
                    })?,
                };
                if !target.accepts_label(&label) {
                    return Err(invalid_label(
                        &label,
                        format!("not a level of the '{}' hierarchy", target.name),
                    ));
                }
                if !is_valid_identifier(&label) {
                    return Err(invalid_label(&label, "not a valid column name".into()));
                }
                ReportingDimensionKind::Association {
                    fact_table: fact_model.table.clone(),
                    foreign_key: def.fact_column(),
                    target_model: target.name.clone(),
                    target_table: target.table.clone(),
                    primary_key: primary_key
                        .clone()
                        .unwrap_or_else(|| target.primary_key.clone()),
                    label_column: target.label_column(&label).to_string(),
                    label,
                }
            }
        };

        Ok(Self {
            name: name.to_string(),
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ReportingDimensionKind {
        &self.kind
    }

    /// The label the dimension reports by: the precision unit or the
    /// association's label level.
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            ReportingDimensionKind::Column { .. } => None,
            ReportingDimensionKind::Datetime { precision, .. } => Some(precision.as_str()),
            ReportingDimensionKind::Association { label, .. } => Some(label),
        }
    }

    /// Output column name.
    pub fn alias(&self) -> String {
        match &self.kind {
            ReportingDimensionKind::Datetime { precision, .. } => {
                format!("{}_{}", self.name, precision)
            }
            _ => self.name.clone(),
        }
    }

    /// Output column name of the row identifier, for associations.
    pub fn identifier_alias(&self) -> Option<String> {
        match self.kind {
            ReportingDimensionKind::Association { .. } => {
                Some(format!("{}_identifier", self.name))
            }
            _ => None,
        }
    }

    pub fn select_expr(&self, dialect: Dialect) -> Result<Expr> {
        match &self.kind {
            ReportingDimensionKind::Column { table, column } => Ok(table_col(table, column)),
            ReportingDimensionKind::Datetime {
                table,
                column,
                precision,
            } => {
                let quoted_table = qualified_table_tokens(table).serialize(dialect);
                let sql = render_date_truncation_for(
                    dialect,
                    precision.as_str(),
                    &quoted_table,
                    &dialect.quote_identifier(column),
                )?;
                Ok(raw_sql(&sql))
            }
            ReportingDimensionKind::Association { label_column, .. } => {
                Ok(table_col(&self.name, label_column))
            }
        }
    }

    /// Expressions to group by: the selected one, plus the level column when
    /// a hierarchy label override replaces it.
    pub fn group_exprs(&self, dialect: Dialect) -> Result<Vec<Expr>> {
        let mut exprs = vec![self.select_expr(dialect)?];
        if let ReportingDimensionKind::Association {
            label,
            label_column,
            ..
        } = &self.kind
        {
            if label != label_column {
                exprs.push(table_col(&self.name, label));
            }
        }
        Ok(exprs)
    }

    /// Expression rows are ordered by. Associations order by the level
    /// column, not its display override.
    pub fn order_expr(&self, dialect: Dialect) -> Result<Expr> {
        match &self.kind {
            ReportingDimensionKind::Association { label, .. } => Ok(table_col(&self.name, label)),
            _ => self.select_expr(dialect),
        }
    }

    pub fn identifier_expr(&self) -> Option<Expr> {
        match &self.kind {
            ReportingDimensionKind::Association {
                fact_table,
                foreign_key,
                ..
            } => Some(table_col(fact_table, foreign_key)),
            _ => None,
        }
    }

    /// `INNER JOIN target AS <name> ON <name>.pk = fact.fk`.
    pub fn join(&self) -> Option<(TableRef, Expr)> {
        match &self.kind {
            ReportingDimensionKind::Association {
                fact_table,
                foreign_key,
                target_table,
                primary_key,
                ..
            } => Some((
                TableRef::new(target_table).with_alias(&self.name),
                table_col(&self.name, primary_key).eq(table_col(fact_table, foreign_key)),
            )),
            _ => None,
        }
    }
}
