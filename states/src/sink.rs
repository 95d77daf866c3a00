//! Update sinks for editable tables.
//!
//! A table never owns the list it edits; after every change it hands the new
//! list to its sink. Owners either pass a closure that writes the list back
//! into the parent entity, or a [`TableUpdater`] whose paired [`TableReader`]
//! collects updates through a `flume` channel.

use flume::{Receiver, Sender};

/// Receives the new row list after each table operation.
pub trait TableSink<R> {
    fn update_table(&mut self, rows: &[R]);
}

impl<R, F> TableSink<R> for F
where
    F: FnMut(&[R]),
{
    fn update_table(&mut self, rows: &[R]) {
        self(rows);
    }
}

/// Creates a connected updater/reader pair.
pub fn table_channel<R>() -> (TableUpdater<R>, TableReader<R>) {
    let (send, recv) = flume::unbounded();
    (TableUpdater { send }, TableReader { recv })
}

/// Sending half: forwards every update as an owned list.
#[derive(Debug)]
pub struct TableUpdater<R> {
    send: Sender<Vec<R>>,
}

impl<R> Clone for TableUpdater<R> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<R: Clone> TableSink<R> for TableUpdater<R> {
    fn update_table(&mut self, rows: &[R]) {
        if self.send.send(rows.to_vec()).is_err() {
            log::warn!("Table update dropped: reader is gone");
        }
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct TableReader<R> {
    recv: Receiver<Vec<R>>,
}

impl<R> TableReader<R> {
    /// Takes the oldest pending update, if any.
    pub fn read(&self) -> Option<Vec<R>> {
        self.recv.try_recv().ok()
    }

    /// Drains all pending updates and returns the newest one.
    pub fn latest(&self) -> Option<Vec<R>> {
        self.recv.try_iter().last()
    }

    pub fn pending(&self) -> usize {
        self.recv.len()
    }
}
