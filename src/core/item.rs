use crate::error::BatchError;

/// Result of a single read attempt.
///
/// `Ok(None)` signals that the input is exhausted; it is the regular end of a
/// step, not an error.
pub type ItemReaderResult<I> = Result<Option<I>, BatchError>;

/// Result of processing a single item.
pub type ItemProcessorResult<O> = Result<O, BatchError>;

/// Retrieval of input for a step, one item at a time.
///
/// Readers are lazy and non-restartable: once `read` has returned `Ok(None)`
/// it keeps returning `Ok(None)`.
pub trait ItemReader<I> {
    fn read(&self) -> ItemReaderResult<I>;
}

/// The transform applied between read and write.
///
/// Implementations take one item and return one item. A failing transform
/// reports [`BatchError::Processing`] carrying the offending record's id; the
/// step aborts on the first such error, nothing is skipped.
pub trait ItemProcessor<I, O> {
    fn process(&self, item: &I) -> ItemProcessorResult<O>;
}

/// Output of a step, one chunk of items at a time.
///
/// `open` is called once before the first chunk and `close` once after the
/// last, on every exit path of the step.
pub trait ItemWriter<O> {
    fn write(&self, items: &[O]) -> Result<(), BatchError>;

    fn flush(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn open(&self) -> Result<(), BatchError> {
        Ok(())
    }

    fn close(&self) -> Result<(), BatchError> {
        Ok(())
    }
}
