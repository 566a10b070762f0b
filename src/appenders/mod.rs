//! The two output sinks: a size-rotated file and the console

pub mod console;
pub mod rotating_file;

pub use console::ConsoleAppender;
pub use rotating_file::{archive_file_name, archived_files, parse_archive_name, RotatingFileAppender};
