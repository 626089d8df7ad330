//! Read → normalize → group → write.
//!
//! Every stage runs to completion before the next starts, and nothing is
//! written until the whole input has been read and normalized.

pub mod export;
pub mod extract;
pub mod normalize;

use crate::config::Config;
use crate::error::Result;
use crate::types::{OutputRow, Person, TripRoster};
use export::{build_rows, write_csv, write_csv_file};
use extract::{RowExtractor, Sheet};
use normalize::Normalizer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Counts and trip names from one run, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub data_rows: usize,
    pub people: usize,
    pub skipped_rows: usize,
    pub without_trips: usize,
    pub missing_phone: usize,
    pub missing_email: usize,
    pub trips: Vec<String>,
    pub rows_written: usize,
}

/// Normalized people plus everything derived from them, ready to export.
pub struct PreparedRoster {
    pub people: Vec<Person>,
    pub roster: TripRoster,
    pub rows: Vec<OutputRow>,
    pub result: PipelineResult,
}

pub struct Pipeline {
    config: Config,
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::from_config(&config)?;
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract and normalize every data row, then group by trip.
    ///
    /// Fails on the first structural input error; field-level problems only
    /// blank the affected field.
    pub fn prepare<R>(&self, rows: R) -> Result<PreparedRoster>
    where
        R: IntoIterator<Item = Vec<String>>,
    {
        let mut result = PipelineResult::default();
        let mut people = Vec::new();

        for record in RowExtractor::new(rows, self.config.columns) {
            let record = record?;
            result.data_rows += 1;
            match self.normalizer.normalize(&record) {
                Some(person) => people.push(person),
                None => result.skipped_rows += 1,
            }
        }

        if people.is_empty() {
            warn!("Roster has no people; the contact list will only have a header");
        }

        result.people = people.len();
        result.without_trips = people.iter().filter(|p| p.trips().is_empty()).count();
        result.missing_phone = people.iter().filter(|p| p.phone().is_none()).count();
        result.missing_email = people.iter().filter(|p| p.email().is_none()).count();

        let roster = TripRoster::from_people(&people);
        result.trips = roster.iter().map(str::to_string).collect();

        let rows = build_rows(&roster, &people, &self.config.name_prefix);
        result.rows_written = rows.len();

        info!(
            people = result.people,
            trips = roster.len(),
            rows = rows.len(),
            "Roster prepared"
        );
        Ok(PreparedRoster {
            people,
            roster,
            rows,
            result,
        })
    }

    /// Convert rows from any source into CSV on any writer.
    pub fn convert<R, W>(&self, rows: R, writer: W) -> Result<PipelineResult>
    where
        R: IntoIterator<Item = Vec<String>>,
        W: Write,
    {
        let prepared = self.prepare(rows)?;
        write_csv(writer, &prepared.rows)?;
        Ok(prepared.result)
    }

    /// Convert a spreadsheet file into a CSV file.
    #[instrument(skip(self))]
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<PipelineResult> {
        info!("Converting {}", input.display());
        let sheet = Sheet::open(input)?;
        let prepared = self.prepare(sheet.rows())?;

        write_csv_file(output, &prepared.rows)?;
        info!(
            "Wrote {} contacts to {}",
            prepared.rows.len(),
            output.display()
        );

        Ok(PipelineResult {
            input_file: Some(input.display().to_string()),
            output_file: Some(output.display().to_string()),
            ..prepared.result
        })
    }

    /// Read a spreadsheet and report its trips without writing anything.
    #[instrument(skip(self))]
    pub fn inspect_file(&self, input: &Path) -> Result<PipelineResult> {
        let sheet = Sheet::open(input)?;
        let prepared = self.prepare(sheet.rows())?;
        Ok(PipelineResult {
            input_file: Some(sheet.path().display().to_string()),
            rows_written: 0,
            ..prepared.result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // prepends the timestamp column that leads every sign-up sheet
    fn rows(data: &[[&str; 5]]) -> Vec<Vec<String>> {
        std::iter::once(["Name", "Notes", "Phone", "Email", "Trips"])
            .chain(data.iter().copied())
            .map(|row| {
                std::iter::once("2024/01/01 10:00")
                    .chain(row)
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_prepare_counts() {
        let pipeline = Pipeline::new(Config::default()).unwrap();
        let prepared = pipeline
            .prepare(rows(&[
                ["Dana", "", "0501234567", "dana@example.com", "Golan, Negev"],
                ["Noa", "", "junk", "junk", ""],
                ["", "", "", "", ""],
            ]))
            .unwrap();

        let result = prepared.result;
        assert_eq!(result.data_rows, 3);
        assert_eq!(result.people, 2);
        assert_eq!(result.skipped_rows, 1);
        assert_eq!(result.without_trips, 1);
        assert_eq!(result.missing_phone, 1);
        assert_eq!(result.missing_email, 1);
        assert_eq!(result.trips, vec!["Golan", "Negev"]);
        assert_eq!(result.rows_written, 2);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let config = Config {
            trip_delimiter: ';',
            ..Config::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let prepared = pipeline
            .prepare(rows(&[["Dana", "", "", "", "Golan, North; Negev"]]))
            .unwrap();
        assert_eq!(prepared.result.trips, vec!["Golan, North", "Negev"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            region: "nowhere".to_string(),
            ..Config::default()
        };
        assert!(Pipeline::new(config).is_err());
    }
}
