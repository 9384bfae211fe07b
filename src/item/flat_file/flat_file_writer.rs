use std::{
    cell::RefCell,
    fs::File,
    path::{Path, PathBuf},
};

use csv::{Writer, WriterBuilder};

use crate::{core::item::ItemWriter, error::BatchError};

use super::FieldSet;

/// An [`ItemWriter`] that serializes records to a delimited text file.
///
/// The target file is created, or truncated if it already exists, when the
/// writer is opened; the header line is written at the same moment, so an
/// empty input still produces a file holding exactly the header. Opening an
/// unwritable path fails with [`BatchError::Sink`] before anything is read
/// from the source.
pub struct FlatFileItemWriter {
    path: PathBuf,
    delimiter: u8,
    writer: RefCell<Option<Writer<File>>>,
}

impl<T: FieldSet + 'static> ItemWriter<T> for FlatFileItemWriter {
    fn open(&self) -> Result<(), BatchError> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|error| BatchError::Sink(error.to_string()))?;

        writer
            .write_record(T::fields().iter().map(|(name, _)| *name))
            .map_err(|error| BatchError::Sink(error.to_string()))?;

        *self.writer.borrow_mut() = Some(writer);

        Ok(())
    }

    fn write(&self, items: &[T]) -> Result<(), BatchError> {
        let mut guard = self.writer.borrow_mut();
        let writer = guard
            .as_mut()
            .ok_or_else(|| BatchError::Sink("writer has not been opened".to_string()))?;

        for item in items {
            writer
                .write_record(T::fields().iter().map(|(_, accessor)| accessor(item)))
                .map_err(|error| BatchError::Sink(error.to_string()))?;
        }

        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying file.
    fn flush(&self) -> Result<(), BatchError> {
        if let Some(writer) = self.writer.borrow_mut().as_mut() {
            writer
                .flush()
                .map_err(|error| BatchError::Sink(error.to_string()))?;
        }

        Ok(())
    }

    /// Flushes and releases the file handle. Closing a writer that was never
    /// opened is a no-op, so the step can close unconditionally.
    fn close(&self) -> Result<(), BatchError> {
        if let Some(mut writer) = self.writer.borrow_mut().take() {
            writer
                .flush()
                .map_err(|error| BatchError::Sink(error.to_string()))?;
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct FlatFileItemWriterBuilder {
    delimiter: u8,
}

impl FlatFileItemWriterBuilder {
    pub fn new() -> FlatFileItemWriterBuilder {
        FlatFileItemWriterBuilder { delimiter: b',' }
    }

    pub fn delimiter(mut self, delimiter: u8) -> FlatFileItemWriterBuilder {
        self.delimiter = delimiter;
        self
    }

    /// The file itself is only created when the writer is opened, not here.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> FlatFileItemWriter {
        FlatFileItemWriter {
            path: path.as_ref().to_path_buf(),
            delimiter: self.delimiter,
            writer: RefCell::new(None),
        }
    }
}
