use std::time::{Duration, Instant};

use log::{error, info};
use uuid::Uuid;

use crate::error::BatchError;

use super::{build_name, step::Step};

/// Type alias for job execution results.
pub type JobResult<T> = Result<T, BatchError>;

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps executed in order. The job
/// orchestrates the steps and reports the overall result: lifecycle events
/// (start, completion, failure) are logged, and the outcome is carried in the
/// return value rather than in listener callbacks.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step completed
    /// - `Err(BatchError)` carrying the first failing step's error
    fn run(&self) -> JobResult<JobExecution>;
}

/// Timing of a completed job run.
#[derive(Debug)]
pub struct JobExecution {
    /// The time when the job started executing
    pub start: Instant,
    /// The time when the job finished executing
    pub end: Instant,
    /// The total duration of the job execution
    pub duration: Duration,
}

/// A configured job, ready to run.
///
/// Every instance carries a fresh identifier, so a job can be launched as
/// many times as desired; runs are independent and nothing persists between
/// them.
pub struct JobInstance<'a> {
    id: Uuid,
    name: String,
    steps: Vec<&'a dyn Step>,
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        for step in &self.steps {
            if let Err(error) = step.execute() {
                error!(
                    "Job {} failed at step {}: {}",
                    self.name,
                    step.get_name(),
                    error
                );
                return Err(error);
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        })
    }
}

/// Builder for creating a job instance.
#[derive(Default)]
pub struct JobBuilder<'a> {
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    /// Sets the name of the job. A random name is generated if none is given.
    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps are executed in the order they are
    /// added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::core::{
        item::{ItemProcessor, ItemProcessorResult, ItemReader, ItemReaderResult, ItemWriter},
        step::{StepBuilder, StepStatus},
    };

    struct CountdownReader {
        remaining: RefCell<u32>,
    }

    impl ItemReader<u32> for CountdownReader {
        fn read(&self) -> ItemReaderResult<u32> {
            let mut remaining = self.remaining.borrow_mut();
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
            Ok(Some(*remaining))
        }
    }

    struct Doubler;

    impl ItemProcessor<u32, u32> for Doubler {
        fn process(&self, item: &u32) -> ItemProcessorResult<u32> {
            Ok(item * 2)
        }
    }

    #[derive(Default)]
    struct CollectingWriter {
        items: RefCell<Vec<u32>>,
    }

    impl ItemWriter<u32> for CollectingWriter {
        fn write(&self, items: &[u32]) -> Result<(), BatchError> {
            self.items.borrow_mut().extend_from_slice(items);
            Ok(())
        }
    }

    struct BrokenReader;

    impl ItemReader<u32> for BrokenReader {
        fn read(&self) -> ItemReaderResult<u32> {
            Err(BatchError::Source("connection lost".to_string()))
        }
    }

    #[test]
    fn job_runs_its_single_step_to_completion() {
        let reader = CountdownReader {
            remaining: RefCell::new(5),
        };
        let processor = Doubler;
        let writer = CollectingWriter::default();

        let step = StepBuilder::new("count-down")
            .chunk::<u32, u32>(2)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        let job = JobBuilder::new()
            .name("test-job".to_string())
            .start(&step)
            .build();

        let execution = job.run().expect("job should complete");

        assert!(execution.start <= execution.end);
        assert_eq!(step.get_status(), StepStatus::Completed);
        assert_eq!(*writer.items.borrow(), vec![8, 6, 4, 2, 0]);
    }

    #[test]
    fn job_reports_the_failing_step_error() {
        let reader = BrokenReader;
        let processor = Doubler;
        let writer = CollectingWriter::default();

        let step = StepBuilder::new("doomed")
            .chunk::<u32, u32>(2)
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build();

        // No explicit name: the generated one is good enough for a failure log.
        let job = JobBuilder::new().start(&step).build();

        let result = job.run();

        assert!(matches!(result, Err(BatchError::Source(_))));
        assert_eq!(step.get_status(), StepStatus::Failed);
        assert!(writer.items.borrow().is_empty());
    }
}
