use crate::constants::{EXTRACT_ATTRIBUTES, FINAL_ATTRIBUTES};
use std::fmt;

/// One scraped table row, values exactly as they appeared on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBank {
    pub name: String,
    pub mc_usd_billion: String,
}

/// Output of the extract stage: `Name`, `MC_USD_Billion`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    pub rows: Vec<RawBank>,
}

impl ExtractedTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &EXTRACT_ATTRIBUTES
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ExtractedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .rows
            .iter()
            .map(|r| vec![r.name.clone(), r.mc_usd_billion.clone()])
            .collect::<Vec<_>>();
        f.write_str(&render_grid(self.columns(), &rows, true))
    }
}

/// A bank with its market capitalisation in every output currency (billions).
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub name: String,
    pub mc_usd_billion: f64,
    pub mc_gbp_billion: f64,
    pub mc_eur_billion: f64,
    pub mc_inr_billion: f64,
}

impl BankRecord {
    /// Numeric cells in `FINAL_ATTRIBUTES` order.
    pub fn amounts(&self) -> [f64; 4] {
        [
            self.mc_usd_billion,
            self.mc_gbp_billion,
            self.mc_eur_billion,
            self.mc_inr_billion,
        ]
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(FINAL_ATTRIBUTES.len());
        cells.push(self.name.clone());
        cells.extend(self.amounts().iter().map(|v| format_amount(*v)));
        cells
    }
}

/// Output of the transform stage and input to both loaders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankTable {
    pub rows: Vec<BankRecord>,
}

impl BankTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &FINAL_ATTRIBUTES
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for BankTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows.iter().map(BankRecord::cells).collect::<Vec<_>>();
        f.write_str(&render_grid(self.columns(), &rows, true))
    }
}

/// Shortest round-trip form, always with a fractional part (`100.0`, `321.7`).
pub fn format_amount(value: f64) -> String {
    format!("{:?}", value)
}

/// Right-aligned text grid with an optional leading row-index column.
pub(crate) fn render_grid<S: AsRef<str>>(columns: &[S], rows: &[Vec<String>], with_index: bool) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.as_ref().chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let index_width = if with_index {
        rows.len().saturating_sub(1).to_string().len()
    } else {
        0
    };

    let mut out = String::new();
    if with_index {
        out.push_str(&" ".repeat(index_width));
    }
    for (i, column) in columns.iter().enumerate() {
        if with_index || i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:>width$}", column.as_ref(), width = widths[i]));
    }

    if rows.is_empty() {
        out.push_str("\n(empty)");
        return out;
    }

    for (n, row) in rows.iter().enumerate() {
        out.push('\n');
        if with_index {
            out.push_str(&format!("{:<width$}", n, width = index_width));
        }
        for (i, cell) in row.iter().enumerate() {
            if with_index || i > 0 {
                out.push(' ');
            }
            let width = widths.get(i).copied().unwrap_or(0);
            out.push_str(&format!("{:>width$}", cell, width = width));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BankTable {
        BankTable {
            rows: vec![BankRecord {
                name: "JPMorgan Chase".to_string(),
                mc_usd_billion: 432.92,
                mc_gbp_billion: 342.01,
                mc_eur_billion: 402.62,
                mc_inr_billion: 35940.99,
            }],
        }
    }

    #[test]
    fn column_sets_only_grow() {
        let extracted = ExtractedTable::default();
        let final_table = BankTable::default();
        assert_eq!(
            &final_table.columns()[..extracted.columns().len()],
            extracted.columns()
        );
        assert_eq!(final_table.columns().len(), 5);
    }

    #[test]
    fn amounts_always_carry_a_fraction() {
        assert_eq!(format_amount(100.0), "100.0");
        assert_eq!(format_amount(321.7), "321.7");
        assert_eq!(format_amount(1700.12), "1700.12");
    }

    #[test]
    fn renders_header_and_indexed_rows() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("MC_EUR_Billion"));
        assert!(lines[1].starts_with('0'));
        assert!(lines[1].contains("JPMorgan Chase"));
        assert!(lines[1].ends_with("35940.99"));
    }

    #[test]
    fn empty_table_renders_header_only() {
        let text = BankTable::default().to_string();
        assert!(text.contains("Name"));
        assert!(text.ends_with("(empty)"));
    }
}
