use serde::Serialize;
use thiserror::Error;

use crate::utils::locale_compare;

/// A rendered row as the table utilities see it: ordered cell text plus visibility.
pub trait TableRow {
    fn cells(&self) -> &[String];
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Full text content of the row, cells separated by a space.
    fn text_content(&self) -> String {
        self.cells().join(" ")
    }

    fn cell(&self, column: usize) -> &str {
        self.cells().get(column).map_or("", |c| c.trim())
    }
}

/// Case-insensitive substring test against the row text; `term` must already be lower-cased.
fn matches_search<R: TableRow>(row: &R, term: &str) -> bool {
    term.is_empty() || row.text_content().to_lowercase().contains(term)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn css_class(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub label: String,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column {0} does not exist")]
    NoSuchColumn(usize),
    #[error("column {0} is not sortable")]
    NotSortable(usize),
}

/// Header row plus body rows. The body is owned here until the next `replace_rows`.
#[derive(Debug, Clone, Serialize)]
pub struct Table<R> {
    headers: Vec<Header>,
    rows: Vec<R>,
}

impl<R: TableRow> Table<R> {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: labels
                .into_iter()
                .map(|label| Header {
                    label: label.into(),
                    sortable: true,
                    sort: None,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_unsortable(mut self, column: usize) -> Self {
        if let Some(h) = self.headers.get_mut(column) {
            h.sortable = false;
        }
        self
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [R] {
        &mut self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().filter(|r| r.is_visible())
    }

    /// Discard the whole body and take ownership of a fresh one.
    /// Sort markers are cleared since the new rows arrive in source order.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        for h in &mut self.headers {
            h.sort = None;
        }
    }

    /// Show only the rows whose text contains `term`, case-insensitively.
    pub fn search(&mut self, term: &str) {
        let term = term.to_lowercase();
        for row in &mut self.rows {
            let visible = matches_search(&*row, &term);
            row.set_visible(visible);
        }
    }

    /// Sort by one column, toggling direction on repeated clicks of the same header.
    ///
    /// A header that is not currently sorted sorts descending first. Descending
    /// is the exact reverse of the stable ascending order, so the two
    /// directions are always mirror images.
    pub fn sort_by(&mut self, column: usize) -> Result<SortDirection, TableError> {
        let header = self.headers.get(column).ok_or(TableError::NoSuchColumn(column))?;
        if !header.sortable {
            return Err(TableError::NotSortable(column));
        }

        let direction = match header.sort {
            Some(SortDirection::Desc) => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        self.rows
            .sort_by(|a, b| locale_compare(a.cell(column), b.cell(column)));
        if direction == SortDirection::Desc {
            self.rows.reverse();
        }

        for h in &mut self.headers {
            h.sort = None;
        }
        self.headers[column].sort = Some(direction);

        Ok(direction)
    }
}
