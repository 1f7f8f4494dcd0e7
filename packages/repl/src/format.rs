//! Text rendering for the administrative commands.

use std::fmt::Write;
use std::time::Duration;

use dsvq_store::DsvStore;

use crate::history::History;

/// Column listing for `list`.
pub fn columns_table(store: &DsvStore) -> Option<String> {
    if store.column_count() == 0 {
        return None;
    }

    let name_width = store
        .columns()
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    let rule = format!("+----+-{}-+---------+", "-".repeat(name_width));

    let mut out = String::new();
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "| #  | {:<name_width$} | Type    |", "Name");
    let _ = writeln!(out, "{}", rule);
    for (i, column) in store.columns().iter().enumerate() {
        let _ = writeln!(
            out,
            "| {:02} | {:<name_width$} | {:<7} |",
            i,
            column.name,
            column.kind.label()
        );
    }
    out.push_str(&rule);
    Some(out)
}

/// Metadata block for `information`.
pub fn information(store: &DsvStore) -> String {
    let file = if store.is_loaded() {
        store.file_name()
    } else {
        "(none)"
    };
    let data_rows = store.row_count().saturating_sub(1);

    let mut out = String::new();
    let _ = writeln!(out, "Information");
    let _ = writeln!(out, "-----------");
    let _ = writeln!(out, "File:             {}", file);
    let _ = writeln!(out, "Rows:             {}", data_rows);
    let _ = writeln!(out, "Columns:          {}", store.column_count());
    let _ = writeln!(out, "Elements:         {}", data_rows * store.column_count());
    let _ = writeln!(out, "Input Delimiter:  {}", store.input_delimiter());
    let _ = write!(out, "Output Delimiter: {}", store.output_delimiter());
    out
}

/// Numbered listing for `history`.
pub fn history(history: &History) -> String {
    let mut out = String::new();
    for (i, entry) in history.iter() {
        let _ = writeln!(out, "{:02} {}", i, entry);
    }
    let _ = write!(out, "Number of queries: {}", history.len());
    out
}

/// Footer printed after a scan.
pub fn results_footer(count: usize, elapsed: Duration) -> String {
    format!(
        "---------------------\nNumber of results: {}\nTime: {:.5}ms",
        count,
        elapsed.as_secs_f64() * 1000.0
    )
}

pub fn load_summary(path: &str, elapsed: Duration) -> String {
    format!(
        "Successfully loaded: {} - Total time: {:.3}sec",
        path,
        elapsed.as_secs_f64()
    )
}
