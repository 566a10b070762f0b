//! Background writer
//!
//! A single worker thread owns both sinks and performs all file I/O,
//! console I/O and rotation. Producers only ever touch the channel.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Waiting --record--> Draining --queue empty--> Waiting
//!    |                   |
//!    +---exit signal-----+--> Stopping --queue drained--> Terminated
//! ```
//!
//! The exit signal is queued behind every record submitted before it, so
//! nothing accepted before shutdown is discarded.

use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::record::LogRecord;
use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use crossbeam_channel::{Receiver, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub(crate) const WORKER_THREAD_NAME: &str = "rotalog-worker";

/// Messages carried from producers to the worker
#[derive(Debug)]
pub(crate) enum Command {
    Record(LogRecord),
    /// Drain what is queued, then stop
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerState {
    /// Blocked until a record or the exit signal arrives
    Waiting,
    /// Writing queued records
    Draining,
    /// Exit requested; writing whatever is still queued
    Stopping,
    Terminated,
}

pub(crate) struct Worker {
    receiver: Receiver<Command>,
    file: RotatingFileAppender,
    console: Option<ConsoleAppender>,
    metrics: Arc<LoggerMetrics>,
    state: WorkerState,
}

impl Worker {
    pub(crate) fn new(
        receiver: Receiver<Command>,
        file: RotatingFileAppender,
        console: Option<ConsoleAppender>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            receiver,
            file,
            console,
            metrics,
            state: WorkerState::Waiting,
        }
    }

    pub(crate) fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(LoggerError::WorkerSpawn)
    }

    fn run(mut self) {
        while self.state() != WorkerState::Terminated {
            self.state = self.step();
        }
        // Stopping already flushed; dropping the sinks closes the file
    }

    pub(crate) fn state(&self) -> WorkerState {
        self.state
    }

    /// Advance the state machine by one transition
    pub(crate) fn step(&mut self) -> WorkerState {
        match self.state {
            WorkerState::Waiting => match self.receiver.recv() {
                Ok(Command::Record(record)) => {
                    self.process(&record);
                    WorkerState::Draining
                }
                // All senders gone is treated like an exit signal
                Ok(Command::Shutdown) | Err(_) => WorkerState::Stopping,
            },
            WorkerState::Draining => match self.receiver.try_recv() {
                Ok(Command::Record(record)) => {
                    self.process(&record);
                    WorkerState::Draining
                }
                Ok(Command::Shutdown) | Err(TryRecvError::Disconnected) => WorkerState::Stopping,
                Err(TryRecvError::Empty) => {
                    self.flush();
                    WorkerState::Waiting
                }
            },
            WorkerState::Stopping => {
                while let Ok(command) = self.receiver.try_recv() {
                    if let Command::Record(record) = command {
                        self.process(&record);
                    }
                }
                self.flush();
                WorkerState::Terminated
            }
            WorkerState::Terminated => WorkerState::Terminated,
        }
    }

    /// Write one record, isolating the loop from panics in the sinks
    fn process(&mut self, record: &LogRecord) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.write_record(record)));

        if let Err(panic_info) = outcome {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            eprintln!(
                "[LOGGER CRITICAL] Log worker panicked while writing a record: {}. \
                 The worker continues.",
                panic_msg
            );
            self.metrics.record_write_failure();
        }
    }

    fn write_record(&mut self, record: &LogRecord) {
        match self.file.rotate_if_needed() {
            Ok(Some(_archive)) => {
                self.metrics.record_rotation();
            }
            Ok(None) => {}
            Err(e) => {
                self.metrics.record_rotation_failure();
                eprintln!("[LOGGER ERROR] {}", e);
            }
        }

        match self.file.append(record) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) => {
                self.metrics.record_write_failure();
                eprintln!("[LOGGER ERROR] {}", e);
            }
        }

        if let Some(console) = self.console.as_mut() {
            if let Err(e) = console.append(record) {
                eprintln!("[LOGGER ERROR] Console write failed: {}", e);
            }
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.file.flush() {
            eprintln!("[LOGGER ERROR] {}", e);
        }
        if let Some(console) = self.console.as_mut() {
            if let Err(e) = console.flush() {
                eprintln!("[LOGGER ERROR] Console flush failed: {}", e);
            }
        }
    }
}
