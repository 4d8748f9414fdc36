//! Rectangular, column-major observational dataset.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Deserialize;

use super::{Variable, VariableKind};
use crate::errors::{DatasetError, InsufficientDataError};

/// Immutable table of observations with named, typed columns.
///
/// Values are `f64`; missing values are `NaN`; categorical columns hold
/// non-negative integral codes. Rows are independent observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    variables: Vec<Variable>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Parse `{"columns": [{"name", "kind"?, "description"?, "values": [..]}]}`.
    /// `null` values become missing.
    pub fn from_json_columns(json: &str) -> Result<Self, DatasetError> {
        #[derive(Deserialize)]
        struct JsonColumn {
            name: String,
            #[serde(default)]
            kind: VariableKind,
            #[serde(default)]
            description: Option<String>,
            values: Vec<Option<f64>>,
        }
        #[derive(Deserialize)]
        struct JsonDataset {
            columns: Vec<JsonColumn>,
        }

        let parsed: JsonDataset =
            serde_json::from_str(json).map_err(|e| DatasetError::Malformed {
                message: e.to_string(),
            })?;

        let mut builder = Self::builder();
        for column in parsed.columns {
            let values = column
                .values
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            builder = builder.column(&column.name, column.kind, values);
            if let Some(description) = column.description {
                builder = builder.describe(&column.name, description);
            }
        }
        builder.build()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Variables in column order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    /// Column lookup that reports a missing column as insufficient data.
    pub fn require_column(&self, name: &str) -> Result<&[f64], InsufficientDataError> {
        self.column(name)
            .ok_or_else(|| InsufficientDataError::MissingColumn {
                name: name.to_string(),
            })
    }

    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|c| c.get(row).copied())
    }

    /// Rows where every named column is observed, in ascending row order.
    pub fn complete_rows(&self, names: &[&str]) -> Result<Vec<usize>, InsufficientDataError> {
        let columns = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((0..self.n_rows)
            .filter(|&r| columns.iter().all(|c| !c[r].is_nan()))
            .collect())
    }

    /// Complete rows sorted lexicographically by the named columns' values.
    ///
    /// Any computation over these columns that walks rows in this order gives
    /// bit-identical results for every permutation of the dataset's rows.
    pub fn canonical_rows(&self, names: &[&str]) -> Result<Vec<usize>, InsufficientDataError> {
        let columns = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>, _>>()?;
        let mut rows = self.complete_rows(names)?;
        rows.sort_by(|&a, &b| {
            columns
                .iter()
                .map(|c| c[a].total_cmp(&c[b]))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(rows)
    }

    /// Distinct observed codes of a column, ascending.
    pub fn levels(&self, name: &str) -> Result<Vec<f64>, InsufficientDataError> {
        let column = self.require_column(name)?;
        let mut levels: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
        levels.sort_by(f64::total_cmp);
        levels.dedup();
        Ok(levels)
    }

    /// A new dataset holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| rows.iter().filter_map(|&r| c.get(r).copied()).collect())
            .collect();
        Dataset {
            variables: self.variables.clone(),
            columns,
            index: self.index.clone(),
            n_rows: rows.iter().filter(|&&r| r < self.n_rows).count(),
        }
    }
}

/// Builder collecting columns before validation.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<(String, VariableKind, Vec<f64>)>,
    descriptions: HashMap<String, String>,
}

impl DatasetBuilder {
    pub fn column(mut self, name: &str, kind: VariableKind, values: Vec<f64>) -> Self {
        self.columns.push((name.to_string(), kind, values));
        self
    }

    pub fn continuous(self, name: &str, values: Vec<f64>) -> Self {
        self.column(name, VariableKind::Continuous, values)
    }

    pub fn categorical(self, name: &str, values: Vec<f64>) -> Self {
        self.column(name, VariableKind::Categorical, values)
    }

    pub fn describe(mut self, name: &str, description: impl Into<String>) -> Self {
        self.descriptions.insert(name.to_string(), description.into());
        self
    }

    pub fn build(mut self) -> Result<Dataset, DatasetError> {
        let n_rows = self.columns.first().map(|c| c.2.len()).unwrap_or(0);
        let mut index = HashMap::with_capacity(self.columns.len());
        let mut variables = Vec::with_capacity(self.columns.len());
        let mut columns = Vec::with_capacity(self.columns.len());

        for (i, (name, kind, values)) in self.columns.into_iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DatasetError::EmptyColumnName);
            }
            if values.len() != n_rows {
                return Err(DatasetError::RaggedColumn {
                    name,
                    expected: n_rows,
                    found: values.len(),
                });
            }
            if kind == VariableKind::Categorical {
                if let Some((row, &value)) = values
                    .iter()
                    .enumerate()
                    .find(|(_, v)| !v.is_nan() && (v.fract() != 0.0 || **v < 0.0 || v.is_infinite()))
                {
                    return Err(DatasetError::InvalidCategory { name, row, value });
                }
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(DatasetError::DuplicateColumn { name });
            }
            let mut variable = Variable::new(name.clone(), kind, i);
            if let Some(description) = self.descriptions.remove(&name) {
                variable = variable.with_description(description);
            }
            variables.push(variable);
            columns.push(values);
        }

        Ok(Dataset {
            variables,
            columns,
            index,
            n_rows,
        })
    }
}
