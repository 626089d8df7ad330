use crate::config::ColumnMap;
use crate::error::{Result, RosterError};
use crate::types::RawRecord;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// First worksheet of a spreadsheet file, held in memory.
pub struct Sheet {
    path: PathBuf,
    range: Range<Data>,
}

impl Sheet {
    /// Open `.xlsx`, `.xlsm`, `.xls` or `.ods` files; the format is picked
    /// from the extension.
    #[instrument]
    pub fn open(path: &Path) -> Result<Self> {
        fs::metadata(path).map_err(|source| RosterError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| RosterError::NoWorksheet(path.to_path_buf()))??;

        debug!(
            "Loaded worksheet {:?} from {}",
            range.get_size(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            range,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows as text cells addressed from column A and row 1.
    ///
    /// The used range of a worksheet may start below or to the right of A1;
    /// leading rows and columns are filled with empty cells so the column map
    /// keeps pointing at the same spreadsheet columns.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let (first_row, first_col) = self.range.start().unwrap_or((0, 0));
        let width = first_col as usize + self.range.width();

        let leading = std::iter::repeat_with(move || vec![String::new(); width])
            .take(first_row as usize);
        let used = self.range.rows().map(move |cells| {
            let mut row = vec![String::new(); first_col as usize];
            row.extend(cells.iter().map(|cell| cell.to_string()));
            row
        });
        leading.chain(used)
    }
}

/// Trim a cell and collapse inner whitespace runs to one space.
pub fn clean_cell(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lazily turns data rows into [`RawRecord`]s, skipping the header row.
pub struct RowExtractor<I> {
    rows: I,
    columns: ColumnMap,
    row: usize,
}

impl<I> RowExtractor<I>
where
    I: Iterator<Item = Vec<String>>,
{
    pub fn new<R>(rows: R, columns: ColumnMap) -> Self
    where
        R: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
            columns,
            row: 0,
        }
    }

    fn extract(&self, cells: &[String]) -> Result<RawRecord> {
        let required = self.columns.required_width();
        if cells.len() < required {
            return Err(RosterError::ShortRow {
                row: self.row,
                width: cells.len(),
                required,
            });
        }

        let cell = |column: usize| clean_cell(&cells[column - 1]);
        Ok(RawRecord {
            row: self.row,
            name: cell(self.columns.name),
            phone: cell(self.columns.phone),
            email: cell(self.columns.email),
            trips: cell(self.columns.trips),
        })
    }
}

impl<I> Iterator for RowExtractor<I>
where
    I: Iterator<Item = Vec<String>>,
{
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row == 0 {
            self.rows.next()?;
            self.row = 1;
        }
        let cells = self.rows.next()?;
        self.row += 1;
        Some(self.extract(&cells))
    }
}
