//! Text and JSON rendering of a selected tree.

use std::io::{self, Write};

use serde::Serialize;

use diskusage_core::{StatTree, Unit};

use crate::rows::{Row, collect_rows};
use crate::theme::Theme;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders the eligible part of a [`StatTree`].
#[derive(Debug, Clone)]
pub struct Presenter {
    unit: Unit,
    theme: Theme,
    show_time: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: String,
    total_size: u64,
    unit: String,
    rows: &'a [Row],
}

impl Presenter {
    /// A plain presenter showing sizes in at most `unit`.
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            theme: Theme::plain(),
            show_time: false,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Add a last-modified column to text output.
    pub fn with_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    /// Rows for the eligible nodes, in display order.
    pub fn rows(&self, tree: &StatTree) -> Vec<Row> {
        collect_rows(&tree.root)
    }

    /// Write the size-annotated tree.
    ///
    /// The first line carries the total and the scanned path, followed by a
    /// rule and one line per selected node, then a blank line. Size columns
    /// are right-aligned across all rows.
    pub fn render_text<W: Write>(&self, tree: &StatTree, out: &mut W) -> io::Result<()> {
        let (total, total_unit) = self.unit.reduce(tree.total_size());
        let root = tree.root_path.display().to_string();
        let header = format!("Total: {total:.3}{total_unit}\t{root}");
        writeln!(
            out,
            "Total: {total:.3}{total_unit}\t{}",
            self.theme.root_path(&root)
        )?;
        writeln!(out, "{}", "-".repeat(header.len() + 2))?;

        let rows = self.rows(tree);
        let sizes: Vec<(String, Unit)> = rows
            .iter()
            .map(|row| {
                let (value, unit) = self.unit.reduce(row.size);
                (format!("{value:.1}"), unit)
            })
            .collect();
        let width = sizes.iter().map(|(value, _)| value.len()).max().unwrap_or(0);

        for (row, (value, unit)) in rows.iter().zip(&sizes) {
            let columns = format!(" {value:>width$}{unit} {:>4.1}%", row.percent);
            let time = if self.show_time {
                match row.modified {
                    Some(modified) => format!(" {}", modified.format(TIME_FORMAT)),
                    None => format!(" {:16}", ""),
                }
            } else {
                String::new()
            };

            if row.is_dir {
                writeln!(
                    out,
                    "{}{time} {}{}",
                    self.theme.directory_columns(&columns),
                    row.branch,
                    self.theme.directory(&row.name)
                )?;
            } else {
                writeln!(out, "{columns}{time} {}{}", row.branch, row.name)?;
            }
        }
        writeln!(out)
    }

    /// Write the selected rows as a JSON document.
    pub fn render_json<W: Write>(&self, tree: &StatTree, out: &mut W) -> io::Result<()> {
        let rows = self.rows(tree);
        let report = JsonReport {
            root: tree.root_path.display().to_string(),
            total_size: tree.total_size(),
            unit: self.unit.to_string(),
            rows: &rows,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)
    }
}
