// ─────────────────────────────────────────────────────────────────────
// Aeronomy — Data Tables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Whitespace-separated column tables with `#` comments.

use crate::interp::MonotoneSpline;
use aeronomy_types::error::{AeronomyError, AeronomyResult};
use std::path::Path;

/// Column-major numeric table read from a text file.
#[derive(Debug, Clone)]
pub struct DataTable {
    source_name: String,
    columns: Vec<Vec<f64>>,
}

impl DataTable {
    pub fn from_file(path: impl AsRef<Path>) -> AeronomyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse table text. Blank lines and everything after `#` are ignored;
    /// every data row must have the same number of columns.
    pub fn parse(text: &str, source_name: &str) -> AeronomyResult<Self> {
        let mut columns: Vec<Vec<f64>> = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let data = line.split('#').next().unwrap_or("").trim();
            if data.is_empty() {
                continue;
            }
            let row: Vec<f64> = data
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>().map_err(|_| {
                        AeronomyError::ConfigError(format!(
                            "{source_name}:{}: invalid number '{tok}'",
                            lineno + 1
                        ))
                    })
                })
                .collect::<AeronomyResult<_>>()?;
            if columns.is_empty() {
                columns = vec![Vec::new(); row.len()];
            } else if row.len() != columns.len() {
                return Err(AeronomyError::ConfigError(format!(
                    "{source_name}:{}: expected {} columns, got {}",
                    lineno + 1,
                    columns.len(),
                    row.len()
                )));
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }
        if columns.is_empty() {
            return Err(AeronomyError::ConfigError(format!(
                "{source_name}: table has no data rows"
            )));
        }
        Ok(DataTable {
            source_name: source_name.to_string(),
            columns,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column(&self, c: usize) -> AeronomyResult<&[f64]> {
        self.columns.get(c).map(Vec::as_slice).ok_or_else(|| {
            AeronomyError::ConfigError(format!(
                "{}: column {c} requested but table has {} columns",
                self.source_name,
                self.columns.len()
            ))
        })
    }

    /// Monotone interpolant of column `y` over column `x`.
    /// The `x` column must be strictly ascending.
    pub fn spline(&self, x: usize, y: usize) -> AeronomyResult<MonotoneSpline> {
        MonotoneSpline::new(
            self.column(x)?.to_vec(),
            self.column(y)?.to_vec(),
            &self.source_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data")
            .join(relative)
    }

    #[test]
    fn test_parse_with_comments() {
        let text = "# T alpha beta\n1000 1.0 2.0\n\n2000 1.5 2.5 # trailing\n";
        let table = DataTable::parse(text, "inline").unwrap();
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.nrows(), 2);
        assert_eq!(table.column(0).unwrap(), &[1000.0, 2000.0]);
        assert_eq!(table.column(2).unwrap(), &[2.0, 2.5]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = DataTable::parse("1 2\n3\n", "ragged").unwrap_err();
        match err {
            AeronomyError::ConfigError(msg) => assert!(msg.contains("ragged:2")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let table = DataTable::parse("1 2\n", "t").unwrap();
        assert!(table.column(5).is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(DataTable::parse("# nothing\n\n", "empty").is_err());
    }

    #[test]
    fn test_descending_column_spline_fails() {
        let table = DataTable::parse("3 1\n2 2\n1 3\n", "desc").unwrap();
        assert!(matches!(
            table.spline(0, 1),
            Err(AeronomyError::TableOrder { index: 1, .. })
        ));
    }

    #[test]
    fn test_load_collision_table() {
        let table = DataTable::from_file(data_path("he_e_collisions.dat")).unwrap();
        assert_eq!(table.ncols(), 3);
        assert!(table.nrows() > 10);
        let spline = table.spline(0, 2).unwrap();
        let beta = spline.eval(1.0e4).unwrap();
        assert!((beta - 2.0e-15).abs() / 2.0e-15 < 1e-6, "beta(1e4) = {beta}");
    }
}
