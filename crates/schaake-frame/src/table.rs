use std::{collections::HashMap, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap as _, SerializeSeq as _},
};

use crate::{cell::Cell, error::UsageError};

/// A column-named, row-major table of [`Cell`]s.
///
/// Column order is significant and preserved through every operation. In
/// JSON a table is an array of records (`[{"col": value, ...}, ...]`); the
/// columns are taken in order of first appearance and absent fields are
/// read as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect::<Vec<_>>();
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(UsageError::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: vec![],
        })
    }

    /// Assembles a table whose columns are known to be unique and whose rows
    /// match them in width.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Creates a table from columns and row-major cells.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Cell>>) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Creates a table from named columns of equal length.
    ///
    /// # Examples
    ///
    /// ```
    /// use schaake_frame::{Cell, Table};
    ///
    /// let table = Table::from_columns([
    ///     ("location", vec![Cell::from("a"), Cell::from("b")]),
    ///     ("value", vec![Cell::from(1.5), Cell::from(2.5)]),
    /// ])
    /// .unwrap();
    /// assert_eq!(table.n_rows(), 2);
    /// assert_eq!(table.columns(), ["location", "value"]);
    /// ```
    pub fn from_columns<I, S>(columns: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = (S, Vec<Cell>)>,
        S: Into<String>,
    {
        let (names, data): (Vec<String>, Vec<Vec<Cell>>) = columns
            .into_iter()
            .map(|(name, cells)| (name.into(), cells))
            .unzip();
        let mut table = Self::new(names)?;
        let n_rows = data.first().map_or(0, Vec::len);
        for (name, cells) in table.columns.iter().zip(&data) {
            if cells.len() != n_rows {
                return Err(UsageError::ColumnLength {
                    column: name.clone(),
                    expected: n_rows,
                    found: cells.len(),
                });
            }
        }
        let mut data = data.into_iter().map(Vec::into_iter).collect::<Vec<_>>();
        table.rows = (0..n_rows)
            .map(|_| data.iter_mut().filter_map(Iterator::next).collect())
            .collect();
        Ok(table)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, UsageError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| UsageError::missing_column(name))
    }

    pub fn column_indices<S>(&self, names: &[S]) -> Result<Vec<usize>, UsageError>
    where
        S: AsRef<str>,
    {
        names.iter().map(|n| self.column_index(n.as_ref())).collect()
    }

    /// Iterates over the cells of one column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Cell> + '_, UsageError> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    /// Reads a column as floats; `Int` and `Float` cells are accepted.
    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>, UsageError> {
        self.typed_column(name, "number", Cell::as_f64)
    }

    /// Reads a column as integers.
    pub fn i64_column(&self, name: &str) -> Result<Vec<i64>, UsageError> {
        self.typed_column(name, "integer", Cell::as_i64)
    }

    fn typed_column<T>(
        &self,
        name: &str,
        expected: &'static str,
        f: impl Fn(&Cell) -> Option<T>,
    ) -> Result<Vec<T>, UsageError> {
        self.column(name)?
            .enumerate()
            .map(|(row, cell)| {
                f(cell).ok_or_else(|| UsageError::InvalidCell {
                    column: name.to_owned(),
                    row,
                    expected,
                    found: cell.type_name().to_owned(),
                })
            })
            .collect()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), UsageError> {
        if row.len() != self.columns.len() {
            return Err(UsageError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns a table with only the named columns, in the given order.
    pub fn select<S>(&self, names: &[S]) -> Result<Self, UsageError>
    where
        S: AsRef<str>,
    {
        let indices = self.column_indices(names)?;
        let mut table = Self::new(names.iter().map(|n| n.as_ref().to_owned()))?;
        table.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(table)
    }

    /// Returns the rows whose mask entry is `true`.
    pub fn filter(&self, mask: &[bool]) -> Result<Self, UsageError> {
        if mask.len() != self.rows.len() {
            return Err(UsageError::MaskLength {
                mask_len: mask.len(),
                n_rows: self.rows.len(),
            });
        }
        Ok(self.take_rows(mask.iter().enumerate().filter(|(_, keep)| **keep).map(|(i, _)| i)))
    }

    /// Returns the rows at the given positions, in iteration order.
    #[must_use]
    pub fn take_rows<I>(&self, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            columns: self.columns.clone(),
            rows: indices.into_iter().map(|i| self.rows[i].clone()).collect(),
        }
    }

    /// Replaces every cell of a column with `f(cell)`.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<(), UsageError>
    where
        F: FnMut(usize, Cell) -> Result<Cell, UsageError>,
    {
        let index = self.column_index(name)?;
        for (i, row) in self.rows.iter_mut().enumerate() {
            let cell = std::mem::take(&mut row[index]);
            row[index] = f(i, cell)?;
        }
        Ok(())
    }

    /// Returns the table with rows sorted lexicographically by all cells.
    ///
    /// Useful to compare tables up to row order.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.rows.sort();
        self
    }
}

struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                cells: row,
            })?;
        }
        seq.end()
    }
}

/// The fields of one record, in document order.
struct RecordFields(Vec<(String, Cell)>);

impl<'de> Deserialize<'de> for RecordFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = RecordFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a record object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Cell>()? {
                    fields.push(entry);
                }
                Ok(RecordFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = Table;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of record objects")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut table = Table::default();
                let mut index = HashMap::<String, usize>::new();
                while let Some(RecordFields(fields)) = seq.next_element()? {
                    let mut row = vec![Cell::Null; table.columns.len()];
                    for (name, cell) in fields {
                        let i = if let Some(&i) = index.get(&name) {
                            i
                        } else {
                            let i = table.columns.len();
                            table.columns.push(name.clone());
                            index.insert(name, i);
                            for prev in &mut table.rows {
                                prev.push(Cell::Null);
                            }
                            row.push(Cell::Null);
                            i
                        };
                        row[i] = cell;
                    }
                    table.rows.push(row);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_seq(TableVisitor)
    }
}
