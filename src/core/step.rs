use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};
use uuid::Uuid;

use crate::error::BatchError;

use super::item::{ItemProcessor, ItemReader, ItemWriter};

/// Status of a chunk produced by the reader.
#[derive(Debug, PartialEq)]
pub enum ChunkStatus {
    /// The chunk holds `chunk_size` items, more may follow.
    Full,
    /// The reader is exhausted; the chunk holds the remaining items, if any.
    Finished,
}

/// Lifecycle of a step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    NotStarted,
    Running,
    Completed,
    Failed,
}

/// Outcome of a successful step execution.
#[derive(Debug)]
pub struct StepExecution {
    /// Unique identifier of the executed step
    pub id: Uuid,
    /// Human-readable name of the step
    pub name: String,
    /// Final status, [`StepStatus::Completed`] on the success path
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of items read from the source
    pub read_count: usize,
    /// Number of items written to the destination
    pub write_count: usize,
}

/// A single phase of a batch job.
pub trait Step {
    /// Executes the step.
    ///
    /// # Returns
    /// - `Ok(StepExecution)` when the step completed
    /// - `Err(BatchError)` carrying the failing stage's error otherwise
    fn execute(&self) -> Result<StepExecution, BatchError>;

    fn get_name(&self) -> &str;

    fn get_status(&self) -> StepStatus;
}

/// A step that reads, processes and writes items in bounded chunks.
///
/// Items are accumulated up to `chunk_size` before being processed and
/// written, so memory stays bounded however large the source is. Any error
/// from the reader, the processor or the writer fails the step; the writer is
/// closed on every exit path.
pub struct ChunkOrientedStep<'a, I, O> {
    id: Uuid,
    name: String,
    reader: &'a dyn ItemReader<I>,
    processor: &'a dyn ItemProcessor<I, O>,
    writer: &'a dyn ItemWriter<O>,
    chunk_size: u16,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
}

impl<I, O> Step for ChunkOrientedStep<'_, I, O> {
    fn execute(&self) -> Result<StepExecution, BatchError> {
        let start_time = Instant::now();
        self.status.set(StepStatus::Running);
        info!("Start of step: {}, id: {}", self.name, self.id);

        let outcome = self.writer.open().and_then(|()| self.run_chunks());
        // The writer is released on every exit path, success or failure.
        let outcome = outcome.and(self.writer.close());

        match outcome {
            Ok(()) => {
                self.status.set(StepStatus::Completed);
                info!(
                    "End of step: {}, {} items read, {} items written",
                    self.name,
                    self.read_count.get(),
                    self.write_count.get()
                );
                Ok(StepExecution {
                    id: self.id,
                    name: self.name.clone(),
                    status: self.status.get(),
                    start_time,
                    end_time: Instant::now(),
                    duration: start_time.elapsed(),
                    read_count: self.read_count.get(),
                    write_count: self.write_count.get(),
                })
            }
            Err(error) => {
                self.status.set(StepStatus::Failed);
                error!("Step {} failed: {}", self.name, error);
                Err(error)
            }
        }
    }

    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_status(&self) -> StepStatus {
        self.status.get()
    }
}

impl<I, O> ChunkOrientedStep<'_, I, O> {
    pub fn get_read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count.get()
    }

    fn run_chunks(&self) -> Result<(), BatchError> {
        loop {
            let (items, status) = self.read_chunk()?;
            let processed = self.process_chunk(&items)?;
            self.write_chunk(&processed)?;

            if status == ChunkStatus::Finished {
                return Ok(());
            }
        }
    }

    /// Reads up to `chunk_size` items from the reader.
    fn read_chunk(&self) -> Result<(Vec<I>, ChunkStatus), BatchError> {
        debug!("Start reading chunk");

        let mut items = Vec::with_capacity(self.chunk_size as usize);

        loop {
            match self.reader.read() {
                Ok(Some(item)) => {
                    items.push(item);
                    self.read_count.set(self.read_count.get() + 1);

                    if items.len() >= self.chunk_size as usize {
                        return Ok((items, ChunkStatus::Full));
                    }
                }
                Ok(None) => return Ok((items, ChunkStatus::Finished)),
                Err(error) => {
                    error!("Error reading item: {}", error);
                    return Err(error);
                }
            }
        }
    }

    fn process_chunk(&self, items: &[I]) -> Result<Vec<O>, BatchError> {
        debug!("Processing chunk of {} items", items.len());

        let mut processed = Vec::with_capacity(items.len());

        for item in items {
            match self.processor.process(item) {
                Ok(processed_item) => processed.push(processed_item),
                Err(error) => {
                    error!("Error processing item: {}", error);
                    return Err(error);
                }
            }
        }

        Ok(processed)
    }

    fn write_chunk(&self, items: &[O]) -> Result<(), BatchError> {
        if items.is_empty() {
            debug!("No items to write, skipping write call");
            return Ok(());
        }

        debug!("Writing chunk of {} items", items.len());

        self.writer.write(items)?;
        self.writer.flush()?;
        self.write_count.set(self.write_count.get() + items.len());

        Ok(())
    }
}

/// Entry point for building a step.
pub struct StepBuilder {
    name: String,
}

impl StepBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Turns the builder into a chunk-oriented one with the given commit
    /// interval.
    pub fn chunk<'a, I, O>(self, chunk_size: u16) -> ChunkOrientedStepBuilder<'a, I, O> {
        ChunkOrientedStepBuilder::new(&self.name).chunk_size(chunk_size)
    }
}

pub struct ChunkOrientedStepBuilder<'a, I, O> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    chunk_size: u16,
}

impl<'a, I, O> ChunkOrientedStepBuilder<'a, I, O> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 10,
        }
    }

    pub fn reader(mut self, reader: &'a dyn ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a dyn ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a dyn ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn chunk_size(mut self, chunk_size: u16) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn build(self) -> ChunkOrientedStep<'a, I, O> {
        ChunkOrientedStep {
            id: Uuid::new_v4(),
            name: self.name,
            reader: self.reader.expect("Reader is required for building a step"),
            processor: self
                .processor
                .expect("Processor is required for building a step"),
            writer: self.writer.expect("Writer is required for building a step"),
            chunk_size: self.chunk_size,
            status: Cell::new(StepStatus::NotStarted),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use super::*;
    use crate::core::item::{ItemProcessorResult, ItemReaderResult};

    struct StubReader {
        items: RefCell<VecDeque<String>>,
    }

    impl StubReader {
        fn with_items(count: usize) -> Self {
            Self {
                items: RefCell::new((0..count).map(|i| format!("item-{}", i)).collect()),
            }
        }
    }

    impl ItemReader<String> for StubReader {
        fn read(&self) -> ItemReaderResult<String> {
            Ok(self.items.borrow_mut().pop_front())
        }
    }

    struct UpperCaseProcessor;

    impl ItemProcessor<String, String> for UpperCaseProcessor {
        fn process(&self, item: &String) -> ItemProcessorResult<String> {
            Ok(item.to_uppercase())
        }
    }

    struct RejectingProcessor;

    impl ItemProcessor<String, String> for RejectingProcessor {
        fn process(&self, item: &String) -> ItemProcessorResult<String> {
            Err(BatchError::Processing {
                id: item.clone(),
                message: "rejected".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        chunk_sizes: RefCell<Vec<usize>>,
        opened: Cell<bool>,
        closed: Cell<bool>,
    }

    impl ItemWriter<String> for RecordingWriter {
        fn write(&self, items: &[String]) -> Result<(), BatchError> {
            self.chunk_sizes.borrow_mut().push(items.len());
            Ok(())
        }

        fn open(&self) -> Result<(), BatchError> {
            self.opened.set(true);
            Ok(())
        }

        fn close(&self) -> Result<(), BatchError> {
            self.closed.set(true);
            Ok(())
        }
    }

    struct UnopenableWriter;

    impl ItemWriter<String> for UnopenableWriter {
        fn write(&self, _items: &[String]) -> Result<(), BatchError> {
            Ok(())
        }

        fn open(&self) -> Result<(), BatchError> {
            Err(BatchError::Sink("cannot open".to_string()))
        }
    }

    #[test]
    fn items_are_written_in_bounded_chunks() {
        let reader = StubReader::with_items(7);
        let processor = UpperCaseProcessor;
        let writer = RecordingWriter::default();

        let step = StepBuilder::new("test")
            .chunk::<String, String>(3)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let execution = step.execute().expect("step should complete");

        assert_eq!(execution.status, StepStatus::Completed);
        assert_eq!(execution.read_count, 7);
        assert_eq!(execution.write_count, 7);
        assert_eq!(*writer.chunk_sizes.borrow(), vec![3, 3, 1]);
        assert!(writer.opened.get());
        assert!(writer.closed.get());
    }

    #[test]
    fn empty_reader_completes_without_writing() {
        let reader = StubReader::with_items(0);
        let processor = UpperCaseProcessor;
        let writer = RecordingWriter::default();

        let step = StepBuilder::new("test")
            .chunk::<String, String>(3)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let execution = step.execute().expect("step should complete");

        assert_eq!(execution.read_count, 0);
        assert_eq!(execution.write_count, 0);
        assert!(writer.chunk_sizes.borrow().is_empty());
        // The file lifecycle still runs so the destination holds its header.
        assert!(writer.opened.get());
        assert!(writer.closed.get());
    }

    #[test]
    fn processing_error_fails_the_step_and_closes_the_writer() {
        let reader = StubReader::with_items(2);
        let processor = RejectingProcessor;
        let writer = RecordingWriter::default();

        let step = StepBuilder::new("test")
            .chunk::<String, String>(3)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let result = step.execute();

        assert!(matches!(
            result,
            Err(BatchError::Processing { id, .. }) if id == "item-0"
        ));
        assert_eq!(step.get_status(), StepStatus::Failed);
        assert!(writer.chunk_sizes.borrow().is_empty());
        assert!(writer.closed.get());
    }

    #[test]
    fn open_failure_fails_the_step() {
        let reader = StubReader::with_items(2);
        let processor = UpperCaseProcessor;
        let writer = UnopenableWriter;

        let step = StepBuilder::new("test")
            .chunk::<String, String>(3)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let result = step.execute();

        assert!(matches!(result, Err(BatchError::Sink(_))));
        assert_eq!(step.get_status(), StepStatus::Failed);
        assert_eq!(step.get_read_count(), 0);
    }
}
