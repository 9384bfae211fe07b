/*!
 # Library batch

 Batch export of library records to a delimited flat file.

 The crate is built around three small abstractions borrowed from classic
 batch processing:

 - **ItemReader**: retrieval of input for a step, one item at a time.
 - **ItemProcessor**: the business transform applied to each item read.
 - **ItemWriter**: output of a step, one chunk of items at a time.

 A [`core::step::ChunkOrientedStep`] drives the three in a loop, a
 [`core::job::JobInstance`] sequences steps and reports the run. The shipped
 pipeline reads every row of the `Library` table through an
 [`item::rdbc::rdbc_reader::RdbcItemReader`], passes each record through a
 log-only identity processor and writes a semicolon-delimited file with an
 [`item::flat_file::flat_file_writer::FlatFileItemWriter`].

 ```rust,no_run
 use std::path::Path;

 use library_batch::export::run_export;

 #[tokio::main(flavor = "multi_thread")]
 async fn main() -> anyhow::Result<()> {
     sqlx::any::install_default_drivers();
     let pool = sqlx::AnyPool::connect("sqlite://library.db").await?;

     let execution = run_export(&pool, Path::new("libraries.csv"))?;
     println!("export finished in {:?}", execution.duration);

     Ok(())
 }
 ```

 An unrelated exposition surface lives in [`web`]: a single route redirecting
 `/` to the generated API documentation. The two parts share no state; they
 are built as separate binaries (`export` and `serve`).
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Wiring of the library export pipeline
pub mod export;

/// Set of item readers / writers (for example: rdbc reader, flat-file writer)
pub mod item;

/// The library record and its export layout
pub mod library;

/// Exposition routes
pub mod web;
