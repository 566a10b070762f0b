//! Console appender implementation

use crate::core::{LogRecord, Result};
use colored::Colorize;
use std::io::Write;

/// Mirrors each record line to a console stream, coloured by severity
///
/// Output is advisory and meant for humans; the file sink is the durable copy.
pub struct ConsoleAppender {
    writer: Box<dyn Write + Send>,
    use_colors: bool,
}

impl ConsoleAppender {
    /// Write to standard output
    pub fn stdout(use_colors: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), use_colors)
    }

    /// Write to an arbitrary stream, e.g. a capture buffer
    pub fn with_writer(writer: Box<dyn Write + Send>, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    pub fn append(&mut self, record: &LogRecord) -> Result<()> {
        if self.use_colors {
            let colored_line = record.line().color(record.severity().color_code());
            writeln!(self.writer, "{}", colored_line)?;
        } else {
            writeln!(self.writer, "{}", record.line())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
