//! Examples tables
//!
//! Pipe-delimited tabular literals used as structured step input:
//!
//! ```text
//! |name |value|
//! |first|1    |
//! |--ignored comment row--|
//! |second|2   |
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::error::{DomainError, DomainResult};

const SEPARATOR: char = '|';
const ESCAPE: char = '\\';
const COMMENT_PREFIX: &str = "|--";

/// A single table row: column name to cell text, in column order.
pub type Row = IndexMap<String, String>;

/// An ordered sequence of rows sharing one header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExamplesTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl ExamplesTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from headers and rows.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTable` if the headers repeat or a row
    /// holds a column that is not part of the header.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Row>) -> DomainResult<Self> {
        for (i, header) in headers.iter().enumerate() {
            if headers[..i].contains(header) {
                return Err(DomainError::InvalidTable(format!(
                    "duplicate column '{header}'"
                )));
            }
        }
        for row in &rows {
            if let Some(unknown) = row.keys().find(|key| !headers.contains(key)) {
                return Err(DomainError::InvalidTable(format!(
                    "unknown column '{unknown}'"
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Returns true if the text is written as an inline table rather than
    /// being a reference to a table resource.
    #[must_use]
    pub fn is_inline(text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty() || trimmed.starts_with(SEPARATOR) || trimmed.contains('\n')
    }

    /// Parses pipe-delimited table text.
    ///
    /// Blank text yields an empty table. The first non-comment line is the
    /// header; `|--` lines are comments; `\|` escapes a literal pipe.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTable` if a row has more cells than the
    /// header or the header repeats a column name.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX));

        let Some(header_line) = lines.next() else {
            return Ok(Self::empty());
        };
        let headers = split_cells(header_line);

        let mut rows = Vec::new();
        for (index, line) in lines.enumerate() {
            let cells = split_cells(line);
            if cells.len() > headers.len() {
                return Err(DomainError::InvalidTable(format!(
                    "row {} has {} cells but the header has {} columns",
                    index + 1,
                    cells.len(),
                    headers.len()
                )));
            }
            let mut row: Row = headers
                .iter()
                .cloned()
                .zip(cells)
                .collect();
            for header in headers.iter().skip(row.len()) {
                row.insert(header.clone(), String::new());
            }
            rows.push(row);
        }

        Self::from_rows(headers, rows)
    }

    /// Returns the column names.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Returns the number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rebuilds the table with every cell passed through `f`, keeping the
    /// row and column structure. Headers are left untouched.
    ///
    /// # Errors
    /// Propagates the first error returned by `f`.
    pub fn try_map_cells<E, F>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(column, cell)| f(&cell).map(|cell| (column, cell)))
                    .collect::<Result<Row, E>>()
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self {
            headers: self.headers,
            rows,
        })
    }
}

impl fmt::Display for ExamplesTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.headers.is_empty() {
            return Ok(());
        }
        write_line(f, self.headers.iter().map(String::as_str))?;
        for row in &self.rows {
            f.write_str("\n")?;
            write_line(
                f,
                self.headers
                    .iter()
                    .map(|header| row.get(header).map_or("", String::as_str)),
            )?;
        }
        Ok(())
    }
}

fn write_line<'a>(f: &mut fmt::Formatter<'_>, cells: impl Iterator<Item = &'a str>) -> fmt::Result {
    f.write_str("|")?;
    for cell in cells {
        f.write_str(&cell.replace(SEPARATOR, "\\|"))?;
        f.write_str("|")?;
    }
    Ok(())
}

/// Splits one table line into trimmed cells, honouring `\|` escapes.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE if chars.peek() == Some(&SEPARATOR) => {
                current.push(SEPARATOR);
                chars.next();
            }
            SEPARATOR => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);

    // The leading and trailing separators produce empty edge cells.
    if line.starts_with(SEPARATOR) && !cells.is_empty() {
        cells.remove(0);
    }
    if line.ends_with(SEPARATOR) && !line.ends_with("\\|") {
        cells.pop();
    }

    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}
