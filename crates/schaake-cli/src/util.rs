use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use schaake_frame::{Cell, Table, UsageError};
use schaake_stats::descriptive::DescriptiveStats;

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let (writer, target): (Box<dyn Write>, _) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };
    write_pretty(writer, value).with_context(|| format!("Failed to write JSON to {target}"))
}

fn write_pretty<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a whole JSON file of the given kind, e.g. "config" or "forecast".
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Read a table from a JSON array of records
///
/// Columns named in `date_columns` that exist in the table are converted from
/// ISO 8601 strings to date or date-time cells.
///
/// # Errors
///
/// Returns error if the file cannot be read or a date cell cannot be parsed
pub fn read_table_file<P>(file_kind: &str, path: P, date_columns: &[String]) -> anyhow::Result<Table>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let table = read_json_file(file_kind, path)
        .and_then(|table| parse_dates(table, date_columns))
        .with_context(|| format!("Failed to load {file_kind} table: {}", path.display()))?;
    eprintln!(
        "Loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn parse_dates(mut table: Table, date_columns: &[String]) -> anyhow::Result<Table> {
    for column in date_columns {
        if !table.has_column(column) {
            continue;
        }
        table.map_column(column, |row, cell| {
            let found = cell.to_string();
            cell.parse_date().ok_or_else(|| UsageError::InvalidCell {
                column: column.clone(),
                row,
                expected: "ISO 8601 date",
                found,
            })
        })?;
    }
    Ok(table)
}

/// Read a boolean column, for use as a training mask
pub fn bool_column(table: &Table, column: &str) -> anyhow::Result<Vec<bool>> {
    table
        .column(column)?
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Bool(b) => Ok(*b),
            other => anyhow::bail!(
                "Mask column '{column}', row {row}: expected a boolean, found {}",
                other.type_name()
            ),
        })
        .collect()
}

/// Print a one-line summary of a score column to stderr
pub fn print_score_summary(name: &str, values: impl IntoIterator<Item = f64>) {
    match DescriptiveStats::new(values) {
        Some(stats) => eprintln!(
            "{name}: n={} (missing {}), mean={:.4}, median={:.4}, sd={:.4}, range=[{:.4}, {:.4}]",
            stats.count, stats.missing, stats.mean, stats.median, stats.std_dev, stats.min, stats.max
        ),
        None => eprintln!("{name}: no defined values"),
    }
}
