use std::cell::{Cell, RefCell};

use log::debug;
use serde::de::DeserializeOwned;
use sqlx::{Any, Pool, QueryBuilder, any::AnyRow};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// Maps one result row into an item.
pub trait RowMapper<T> {
    fn map_row(&self, row: &AnyRow) -> T;
}

/// An [`ItemReader`] backed by a relational database.
///
/// The reader executes a fixed query against an `sqlx` connection pool and
/// hands out the mapped rows one at a time, in the result order of the
/// source. With a page size set, rows are fetched in `LIMIT`/`OFFSET` pages
/// so only one page is buffered at a time; without one, the full result set
/// is fetched on the first read.
///
/// The sequence is finite and non-restartable: after the last row, `read`
/// returns `Ok(None)` for good. A connection or query failure surfaces as
/// [`BatchError::Source`].
pub struct RdbcItemReader<'a, T> {
    pool: &'a Pool<Any>,
    query: &'a str,
    page_size: Option<i32>,
    offset: Cell<i32>,
    row_mapper: &'a dyn RowMapper<T>,
    buffer: RefCell<Vec<T>>,
}

impl<'a, T> RdbcItemReader<'a, T> {
    fn new(
        pool: &'a Pool<Any>,
        query: &'a str,
        page_size: Option<i32>,
        row_mapper: &'a dyn RowMapper<T>,
    ) -> Self {
        let buffer = if let Some(page_size) = page_size {
            Vec::with_capacity(page_size.try_into().unwrap_or(1))
        } else {
            Vec::new()
        };

        Self {
            pool,
            query,
            page_size,
            offset: Cell::new(0),
            row_mapper,
            buffer: RefCell::new(buffer),
        }
    }

    fn read_page(&self) -> Result<(), BatchError> {
        let mut query_builder = QueryBuilder::new(self.query);

        if let Some(page_size) = self.page_size {
            query_builder.push(format!(" LIMIT {} OFFSET {}", page_size, self.offset.get()));
        }

        let query = query_builder.build();

        debug!("Fetching rows at offset {}", self.offset.get());

        let rows = tokio::task::block_in_place(|| {
            tokio::runtime::Runtime::new()
                .map_err(|error| BatchError::Source(error.to_string()))?
                .block_on(async { query.fetch_all(self.pool).await })
                .map_err(|error| BatchError::Source(error.to_string()))
        })?;

        let mut buffer = self.buffer.borrow_mut();
        buffer.clear();
        buffer.extend(rows.iter().map(|row| self.row_mapper.map_row(row)));

        Ok(())
    }
}

impl<T: DeserializeOwned + Clone> ItemReader<T> for RdbcItemReader<'_, T> {
    fn read(&self) -> ItemReaderResult<T> {
        let index = if let Some(page_size) = self.page_size {
            self.offset.get() % page_size
        } else {
            self.offset.get()
        };

        if index == 0 {
            self.read_page()?;
        }

        let item = self.buffer.borrow().get(index as usize).cloned();

        self.offset.set(self.offset.get() + 1);

        Ok(item)
    }
}

#[derive(Default)]
pub struct RdbcItemReaderBuilder<'a, T> {
    pool: Option<&'a Pool<Any>>,
    query: Option<&'a str>,
    page_size: Option<i32>,
    row_mapper: Option<&'a dyn RowMapper<T>>,
}

impl<'a, T> RdbcItemReaderBuilder<'a, T> {
    pub fn new() -> Self {
        Self {
            pool: None,
            query: None,
            page_size: None,
            row_mapper: None,
        }
    }

    pub fn page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    pub fn pool(mut self, pool: &'a Pool<Any>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn row_mapper(mut self, row_mapper: &'a dyn RowMapper<T>) -> Self {
        self.row_mapper = Some(row_mapper);
        self
    }

    pub fn build(self) -> RdbcItemReader<'a, T> {
        RdbcItemReader::new(
            self.pool.expect("Pool is required for building a reader"),
            self.query.expect("Query is required for building a reader"),
            self.page_size,
            self.row_mapper
                .expect("Row mapper is required for building a reader"),
        )
    }
}
