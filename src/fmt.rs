//! Human-friendly CLI output formatters.
//!
//! When `color` is true, ANSI escape codes are emitted via `owo_colors`.

use crate::types::{IndexHealth, IndexSummary, ToolOutput};
use owo_colors::OwoColorize;
use std::io::{self, Write};

// ── indices ─────────────────────────────────────────────────────────────────

pub fn fmt_indices(
    w: &mut impl Write,
    indices: &[IndexSummary],
    cached: bool,
    color: bool,
) -> io::Result<()> {
    let width = indices
        .iter()
        .map(|s| s.index.len())
        .max()
        .unwrap_or(5)
        .max(5);

    for s in indices {
        let docs = s
            .docs_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let health = format!("{:<7}", s.health.to_string());

        if color {
            let health = match s.health {
                IndexHealth::Green => health.green().to_string(),
                IndexHealth::Yellow => health.yellow().to_string(),
                IndexHealth::Red => health.red().to_string(),
                IndexHealth::Unknown => health.dimmed().to_string(),
            };
            writeln!(
                w,
                "{}  {} {:<6} {:>12}",
                format_args!("{:<width$}", s.index).bold(),
                health,
                s.status,
                docs
            )?;
        } else {
            writeln!(
                w,
                "{:<width$}  {} {:<6} {:>12}",
                s.index, health, s.status, docs
            )?;
        }
    }

    let summary = format!(
        "{} indices{}",
        indices.len(),
        if cached { " (cached)" } else { "" }
    );
    if color {
        writeln!(w, "{}", summary.dimmed())?;
    } else {
        writeln!(w, "{summary}")?;
    }

    Ok(())
}

// ── generic tool output ─────────────────────────────────────────────────────

/// Prints the first fragment as a header and the rest as body blocks.
pub fn fmt_output(w: &mut impl Write, out: &ToolOutput, color: bool) -> io::Result<()> {
    let mut fragments = out.fragments().iter();

    if let Some(header) = fragments.next() {
        if color {
            writeln!(w, "{}", header.bold())?;
        } else {
            writeln!(w, "{header}")?;
        }
    }

    for (i, body) in fragments.enumerate() {
        if color {
            writeln!(w, "{}", format_args!("── {} ──", i + 1).dimmed())?;
        } else {
            writeln!(w, "-- {} --", i + 1)?;
        }
        writeln!(w, "{body}")?;
    }

    Ok(())
}
