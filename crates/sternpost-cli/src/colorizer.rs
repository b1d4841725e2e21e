//! Terminal colorization for the inspect report
//!
//! Applies ANSI escape codes to report values using crossterm.

use crossterm::style::{Color, Stylize};

use sternpost::passes::DiagramReport;

/// Render the report as aligned `label: value` lines
///
/// With `color`, labels are cyan, non-zero counts yellow, zero counts dark
/// grey and flags green or red.
pub fn format_report(report: &DiagramReport, color: bool) -> String {
    let rows: [(&str, Value); 7] = [
        ("sequence diagram", Value::Flag(report.sequence)),
        ("participant boxes", Value::Count(report.participants)),
        ("cutouts", Value::Count(report.cutouts)),
        ("node polygons", Value::Count(report.candidates)),
        ("decision shapes", Value::Count(report.decisions)),
        ("already rescaled", Value::Count(report.rescaled)),
        ("text labels", Value::Count(report.labels)),
    ];
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        let padded = format!("{:<width$}", format!("{}:", label), width = width + 1);
        if color {
            out.push_str(&format!("{} {}\n", padded.with(Color::Cyan), value.colored()));
        } else {
            out.push_str(&format!("{} {}\n", padded, value.plain()));
        }
    }
    out
}

enum Value {
    Flag(bool),
    Count(usize),
}

impl Value {
    fn plain(&self) -> String {
        match self {
            Value::Flag(true) => "yes".to_string(),
            Value::Flag(false) => "no".to_string(),
            Value::Count(n) => n.to_string(),
        }
    }

    fn colored(&self) -> String {
        let color = match self {
            Value::Flag(true) => Color::Green,
            Value::Flag(false) => Color::Red,
            Value::Count(0) => Color::DarkGrey,
            Value::Count(_) => Color::Yellow,
        };
        format!("{}", self.plain().with(color))
    }
}
