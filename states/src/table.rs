//! Editable row table.
//!
//! The free functions are pure: they take the current rows by slice and
//! return a fresh `Vec`, leaving the input untouched. [`RowTable`] wraps them
//! and forwards every successful result to its [`TableSink`]. Failed
//! operations leave the rows as they were and do not notify the sink.

use std::fmt;

use crate::{FieldValue, Row, TableError, TableSink};

/// Which end of the table a new row goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Top,
    #[default]
    Bottom,
}

fn check_index(len: usize, index: usize) -> Result<(), TableError> {
    if index < len {
        Ok(())
    } else {
        Err(TableError::index_out_of_range(index, len))
    }
}

pub fn add_row<R: Clone>(rows: &[R], new_row: R, position: Position) -> Vec<R> {
    let mut next = Vec::with_capacity(rows.len() + 1);
    match position {
        Position::Top => {
            next.push(new_row);
            next.extend_from_slice(rows);
        }
        Position::Bottom => {
            next.extend_from_slice(rows);
            next.push(new_row);
        }
    }
    next
}

pub fn delete_row<R: Clone>(rows: &[R], index: usize) -> Result<Vec<R>, TableError> {
    check_index(rows.len(), index)?;
    let mut next = Vec::with_capacity(rows.len() - 1);
    next.extend_from_slice(&rows[..index]);
    next.extend_from_slice(&rows[index + 1..]);
    Ok(next)
}

pub fn swap_row<R: Clone>(rows: &[R], i: usize, j: usize) -> Result<Vec<R>, TableError> {
    check_index(rows.len(), i)?;
    check_index(rows.len(), j)?;
    let mut next = rows.to_vec();
    next.swap(i, j);
    Ok(next)
}

pub fn update_field<R: Row>(
    rows: &[R],
    index: usize,
    key: &str,
    value: FieldValue,
) -> Result<Vec<R>, TableError> {
    check_index(rows.len(), index)?;
    let mut next = rows.to_vec();
    next[index].set_field(key, value)?;
    Ok(next)
}

/// A controlled view over a row list owned elsewhere.
pub struct RowTable<'a, R> {
    rows: Vec<R>,
    sink: Box<dyn TableSink<R> + 'a>,
}

impl<R: fmt::Debug> fmt::Debug for RowTable<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowTable")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl<'a, R: Clone> RowTable<'a, R> {
    pub fn new(rows: Vec<R>, sink: impl TableSink<R> + 'a) -> Self {
        Self {
            rows,
            sink: Box::new(sink),
        }
    }

    /// Builds a table from a list that may be absent on the parent.
    pub fn from_optional(rows: Option<&[R]>, sink: impl TableSink<R> + 'a) -> Self {
        Self::new(rows.map(<[R]>::to_vec).unwrap_or_default(), sink)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replaces the view with the owner's latest list without notifying.
    pub fn reset(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    fn commit(&mut self, next: Vec<R>) -> &[R] {
        self.rows = next;
        self.sink.update_table(&self.rows);
        &self.rows
    }

    pub fn add_row(&mut self, new_row: R, position: Position) -> &[R] {
        let next = add_row(&self.rows, new_row, position);
        log::debug!("add_row at {position:?}, {} row(s)", next.len());
        self.commit(next)
    }

    pub fn delete_row(&mut self, index: usize) -> Result<&[R], TableError> {
        let next = delete_row(&self.rows, index)?;
        log::debug!("delete_row {index}");
        Ok(self.commit(next))
    }

    pub fn swap_row(&mut self, i: usize, j: usize) -> Result<&[R], TableError> {
        let next = swap_row(&self.rows, i, j)?;
        log::debug!("swap_row {i} <-> {j}");
        Ok(self.commit(next))
    }

    pub fn can_move_up(&self, index: usize) -> bool {
        index > 0 && index < self.rows.len()
    }

    pub fn can_move_down(&self, index: usize) -> bool {
        index
            .checked_add(1)
            .is_some_and(|next| next < self.rows.len())
    }

    pub fn move_up(&mut self, index: usize) -> Result<&[R], TableError> {
        if !self.can_move_up(index) {
            return Err(TableError::cannot_move(index, self.rows.len()));
        }
        self.swap_row(index - 1, index)
    }

    pub fn move_down(&mut self, index: usize) -> Result<&[R], TableError> {
        if !self.can_move_down(index) {
            return Err(TableError::cannot_move(index, self.rows.len()));
        }
        self.swap_row(index, index + 1)
    }
}

impl<R: Row> RowTable<'_, R> {
    pub fn update_field(
        &mut self,
        index: usize,
        key: &str,
        value: FieldValue,
    ) -> Result<&[R], TableError> {
        let next = update_field(&self.rows, index, key, value)?;
        log::debug!("update_field {index}.{key}");
        Ok(self.commit(next))
    }
}
