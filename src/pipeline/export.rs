use crate::constants::OUTPUT_HEADERS;
use crate::error::{Result, RosterError};
use crate::types::{OutputRow, Person, TripRoster};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Expand people into one contact row per trip they are signed up for.
///
/// Trips are visited in roster order (lexicographic) and, within a trip,
/// people are ordered by name; people sharing a name keep their input order.
pub fn build_rows(roster: &TripRoster, people: &[Person], prefix: &str) -> Vec<OutputRow> {
    let mut by_name: Vec<&Person> = people.iter().collect();
    by_name.sort_by(|a, b| a.name().cmp(b.name()));

    roster
        .iter()
        .flat_map(|trip| {
            by_name
                .iter()
                .filter(move |person| person.is_enrolled(trip))
                .map(move |person| OutputRow {
                    display_name: display_name(prefix, trip, person.name()),
                    phone: person.phone().map(str::to_string),
                    email: person.email().map(str::to_string),
                })
        })
        .collect()
}

pub fn display_name(prefix: &str, trip: &str, name: &str) -> String {
    format!("{} {} {}", prefix, trip, name)
}

/// Write the header and `rows` as CSV. The header is written even when there
/// are no rows.
pub fn write_csv<W: Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the CSV to a temporary file next to `path` and rename it into place,
/// so a failed run never leaves a partial file behind.
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn write_csv_file(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|source| RosterError::Open {
        path: dir.to_path_buf(),
        source,
    })?;

    write_csv(tmp.as_file(), rows)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
