use std::path::Path;

use sqlx::{Any, Pool};

use crate::{
    core::{
        job::{Job, JobBuilder, JobExecution},
        step::StepBuilder,
    },
    error::BatchError,
    item::{flat_file::flat_file_writer::FlatFileItemWriterBuilder, rdbc::rdbc_reader::RdbcItemReaderBuilder},
    library::{LibraryProcessor, LibraryRecord, LibraryRowMapper},
};

/// Query for the full library table, columns in output order.
pub const EXPORT_QUERY: &str = "SELECT id, type, addressNumber, addressStreet, \
     addressPostalCode, addressCity, directorSurname, directorName FROM Library";

/// Rows are fetched from the source and committed to the file in batches of
/// this size, so memory stays bounded however large the table is.
const CHUNK_SIZE: u16 = 10;

/// Runs the library export once: reads every row of the `Library` table,
/// passes each record through the identity processor and writes them to
/// `output_file` as semicolon-delimited lines under a fixed header.
///
/// The destination is created or truncated on each run; the source is only
/// read. Re-running against an unchanged source therefore produces the same
/// file again.
///
/// # Errors
///
/// The first failing stage aborts the run: [`BatchError::Source`] when the
/// table cannot be queried, [`BatchError::Processing`] when a transform
/// rejects a record, [`BatchError::Sink`] when the file cannot be created or
/// written. A failed run leaves no complete output file behind.
pub fn run_export(pool: &Pool<Any>, output_file: &Path) -> Result<JobExecution, BatchError> {
    let row_mapper = LibraryRowMapper;
    let reader = RdbcItemReaderBuilder::new()
        .pool(pool)
        .query(EXPORT_QUERY)
        .row_mapper(&row_mapper)
        .page_size(CHUNK_SIZE as i32)
        .build();

    let processor = LibraryProcessor;

    let writer = FlatFileItemWriterBuilder::new()
        .delimiter(b';')
        .from_path(output_file);

    let step = StepBuilder::new("export-libraries")
        .chunk::<LibraryRecord, LibraryRecord>(CHUNK_SIZE)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let job = JobBuilder::new()
        .name("jobExport".to_string())
        .start(&step)
        .build();

    job.run()
}
