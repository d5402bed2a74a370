//! Analysis report model and its console renderers.
//!
//! The report is built from already-computed rows; rendering never touches
//! the engine. Text output lists, in order: row counts before cleaning, row
//! counts after cleaning, totals by category, cohort totals, cohort shares,
//! and the top categories by share.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use saleslab_core::{AgeCohort, CategoryShare, CategoryTotal, Relation};

const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Row count of one relation before and after missing-value removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub relation: Relation,
    pub before: usize,
    pub after: usize,
}

/// Cohort shares, or the reason there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CohortShares {
    Computed {
        shares: Vec<CategoryShare>,
        top: Vec<CategoryShare>,
    },
    NoData {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub cohort: AgeCohort,
    pub top_n: usize,
    pub row_counts: Vec<RowCounts>,
    pub totals: Vec<CategoryTotal>,
    pub cohort_totals: Vec<CategoryTotal>,
    pub shares: CohortShares,
}

/// Text rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Wrap headings in magenta and bodies in cyan.
    pub color: bool,
}

impl TextStyle {
    fn heading(&self, title: &str) -> String {
        if self.color {
            format!("{MAGENTA}{title}{CYAN}")
        } else {
            title.to_string()
        }
    }
}

impl AnalysisReport {
    pub fn render_text(&self, out: &mut impl Write, style: TextStyle) -> io::Result<()> {
        writeln!(out, "{}", style.heading("Row counts before cleaning:"))?;
        for counts in &self.row_counts {
            writeln!(out, "{}: {}", counts.relation, counts.before)?;
        }
        writeln!(out)?;

        writeln!(out, "{}", style.heading("Row counts after cleaning:"))?;
        for counts in &self.row_counts {
            writeln!(out, "{}: {}", counts.relation, counts.after)?;
        }
        writeln!(out)?;

        writeln!(out, "{}", style.heading("Total sales by product category:"))?;
        write_totals(out, &self.totals)?;
        writeln!(out)?;

        let cohort = self.cohort;
        writeln!(
            out,
            "{}",
            style.heading(&format!("Sales by product category for ages {cohort}:"))
        )?;
        write_totals(out, &self.cohort_totals)?;
        writeln!(out)?;

        writeln!(
            out,
            "{}",
            style.heading(&format!("Share of sales by category for ages {cohort}:"))
        )?;
        match &self.shares {
            CohortShares::Computed { shares, .. } => write_shares(out, shares)?,
            CohortShares::NoData { reason } => writeln!(out, "no data for this cohort ({reason})")?,
        }
        writeln!(out)?;

        writeln!(
            out,
            "{}",
            style.heading(&format!(
                "Top {} product categories by share for ages {cohort}:",
                self.top_n
            ))
        )?;
        match &self.shares {
            CohortShares::Computed { top, .. } => write_shares(out, top)?,
            CohortShares::NoData { reason } => writeln!(out, "no data for this cohort ({reason})")?,
        }

        if style.color {
            write!(out, "{RESET}")?;
        }
        out.flush()
    }

    pub fn render_json(&self, out: &mut impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out).map_err(serde_json::Error::io)
    }
}

fn write_totals(out: &mut impl Write, rows: &[CategoryTotal]) -> io::Result<()> {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.category.clone(), format!("{:.2}", r.total_sales)])
        .collect();
    write_table(out, &["category", "total_sales"], &body)
}

fn write_shares(out: &mut impl Write, rows: &[CategoryShare]) -> io::Result<()> {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.category.clone(),
                format!("{:.2}", r.total_sales),
                format!("{:.2}", r.percentage),
            ]
        })
        .collect();
    write_table(out, &["category", "total_sales", "percentage"], &body)
}

/// Bordered table, right-aligned cells.
///
/// ```text
/// +--------+-----------+
/// |category|total_sales|
/// +--------+-----------+
/// |       A|      20.00|
/// +--------+-----------+
/// ```
fn write_table(out: &mut impl Write, header: &[&str], body: &[Vec<String>]) -> io::Result<()> {
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|row| row[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(h.chars().count())
        })
        .collect();

    let rule: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(*w)))
        .collect::<String>()
        + "+";

    writeln!(out, "{rule}")?;
    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    write_row(out, &header_cells, &widths)?;
    writeln!(out, "{rule}")?;
    for row in body {
        write_row(out, row, &widths)?;
    }
    writeln!(out, "{rule}")
}

fn write_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    for (cell, width) in cells.iter().zip(widths) {
        write!(out, "|{cell:>width$}")?;
    }
    writeln!(out, "|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, total_sales: f64) -> CategoryTotal {
        CategoryTotal {
            category: category.into(),
            total_sales,
        }
    }

    fn sample(shares: CohortShares) -> AnalysisReport {
        AnalysisReport {
            cohort: AgeCohort::default(),
            top_n: 3,
            row_counts: vec![
                RowCounts { relation: Relation::Users, before: 2, after: 2 },
                RowCounts { relation: Relation::Purchases, before: 3, after: 2 },
                RowCounts { relation: Relation::Products, before: 2, after: 2 },
            ],
            totals: vec![total("A", 20.0), total("B", 5.0)],
            cohort_totals: vec![total("A", 20.0)],
            shares,
        }
    }

    fn computed() -> CohortShares {
        let a = CategoryShare {
            category: "A".into(),
            total_sales: 20.0,
            percentage: 100.0,
        };
        CohortShares::Computed {
            shares: vec![a.clone()],
            top: vec![a],
        }
    }

    fn render(report: &AnalysisReport, style: TextStyle) -> String {
        let mut buf = Vec::new();
        report.render_text(&mut buf, style).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_sections_in_order() {
        let text = render(&sample(computed()), TextStyle::default());

        let positions: Vec<usize> = [
            "Row counts before cleaning:",
            "Row counts after cleaning:",
            "Total sales by product category:",
            "Sales by product category for ages 18-25:",
            "Share of sales by category for ages 18-25:",
            "Top 3 product categories by share for ages 18-25:",
        ]
        .iter()
        .map(|heading| text.find(heading).unwrap_or_else(|| panic!("missing {heading}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("purchases: 3\n"));
        assert!(text.contains("purchases: 2\n"));
    }

    #[test]
    fn test_table_layout() {
        let mut buf = Vec::new();
        write_totals(&mut buf, &[total("A", 20.0)]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "+--------+-----------+\n\
             |category|total_sales|\n\
             +--------+-----------+\n\
             |       A|      20.00|\n\
             +--------+-----------+\n"
        );
    }

    #[test]
    fn test_no_data_cohort_is_reported() {
        let report = sample(CohortShares::NoData {
            reason: "no purchases in this cohort".into(),
        });
        let text = render(&report, TextStyle::default());

        assert_eq!(
            text.matches("no data for this cohort (no purchases in this cohort)").count(),
            2
        );
    }

    #[test]
    fn test_color_only_when_enabled() {
        let plain = render(&sample(computed()), TextStyle { color: false });
        assert!(!plain.contains('\x1b'));

        let colored = render(&sample(computed()), TextStyle { color: true });
        assert!(colored.contains(MAGENTA));
        assert!(colored.contains(CYAN));
        assert!(colored.ends_with(RESET));
    }

    #[test]
    fn test_json_tags_share_status() {
        let mut buf = Vec::new();
        sample(computed()).render_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["shares"]["status"], "computed");
        assert_eq!(value["shares"]["top"][0]["category"], "A");
        assert_eq!(value["row_counts"][1]["relation"], "purchases");
        assert_eq!(value["cohort"]["min_age"], 18);
    }

    #[test]
    fn test_json_round_trips_no_data() {
        let report = sample(CohortShares::NoData {
            reason: "cohort revenue sums to zero".into(),
        });
        let mut buf = Vec::new();
        report.render_json(&mut buf).unwrap();

        let parsed: AnalysisReport = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, report);
    }
}
