//! Human-readable progress and summary output for packaging runs. These
//! lines are operator-facing side effects and never part of the returned
//! package.

use crate::core::package::CataloguePackage;
use std::io::{self, Write};
use std::path::Path;

pub fn banner<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "=== packaging catalogue '{}' ===", name)
}

pub fn check_line<W: Write>(out: &mut W, what: &str, ok: bool, detail: &str) -> io::Result<()> {
    let status = if ok { "OK" } else { "FAIL" };
    writeln!(out, "  check {:<20} {:<4} ({})", what, status, detail)
}

/// Tabular column overview plus a full metadata echo.
pub fn write_summary<W: Write>(out: &mut W, package: &CataloguePackage) -> io::Result<()> {
    let table = &package.table;
    writeln!(
        out,
        "table: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    )?;

    let name_width = width_of(&package.column_names, "name");
    let unit_width = width_of(&package.column_units, "unit");
    let ucd_width = width_of(&package.column_ucds, "ucd");

    writeln!(
        out,
        "  {:<name_width$}  {:<unit_width$}  {:<ucd_width$}  {}",
        "name", "unit", "ucd", "description"
    )?;
    for i in 0..package.column_names.len() {
        writeln!(
            out,
            "  {:<name_width$}  {:<unit_width$}  {:<ucd_width$}  {}",
            package.column_names[i],
            package.column_units[i],
            package.column_ucds[i],
            package.column_descriptions[i]
        )?;
    }

    let meta = &package.metadata;
    writeln!(out, "metadata:")?;
    writeln!(out, "  name:         {}", meta.name)?;
    writeln!(out, "  summary:      {}", meta.summary)?;
    writeln!(out, "  user:         {}", meta.user)?;
    writeln!(out, "  contact:      {}", meta.contact)?;
    writeln!(out, "  script:       {}", meta.script_name)?;
    writeln!(out, "  version:      {}", meta.version)?;
    writeln!(out, "  generated at: {}", meta.generated_at)?;
    writeln!(out, "  host:         {}", meta.host)?;
    writeln!(out, "  runtime:      {}", meta.runtime)?;
    writeln!(out, "  content hash: {}", meta.content_hash)?;
    if package.added.is_some() {
        writeln!(out, "  added payload attached")?;
    }

    if !package.readme.is_empty() {
        writeln!(out, "readme:")?;
        for line in package.readme.lines() {
            writeln!(out, "  {}", line)?;
        }
    }

    Ok(())
}

pub fn completion<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "wrote package to {}", path.display())
}

fn width_of(entries: &[String], header: &str) -> usize {
    entries
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(header.len())
}
