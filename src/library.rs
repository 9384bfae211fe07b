use log::info;
use serde::{Deserialize, Serialize};
use sqlx::{Row, any::AnyRow};

use crate::{
    core::item::{ItemProcessor, ItemProcessorResult},
    item::{flat_file::FieldSet, rdbc::rdbc_reader::RowMapper},
};

/// One library entry, as read from the `Library` table and written to the
/// export file.
///
/// All fields are plain strings; nothing beyond the source's column types is
/// validated here. A record lives for the duration of one chunk: mapped from
/// a row at read time, handed to the processor, serialized at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub library_type: String,
    #[serde(rename = "addressNumber")]
    pub address_number: String,
    #[serde(rename = "addressStreet")]
    pub address_street: String,
    #[serde(rename = "addressPostalCode")]
    pub address_postal_code: String,
    #[serde(rename = "addressCity")]
    pub address_city: String,
    #[serde(rename = "directorSurname")]
    pub director_surname: String,
    #[serde(rename = "directorName")]
    pub director_name: String,
}

/// The export column layout: names and accessors in the exact order the
/// output file declares in its header line.
impl FieldSet for LibraryRecord {
    fn fields() -> &'static [(&'static str, fn(&Self) -> &str)] {
        const FIELDS: &[(&str, fn(&LibraryRecord) -> &str)] = &[
            ("id", |record| &record.id),
            ("type", |record| &record.library_type),
            ("addressNumber", |record| &record.address_number),
            ("addressStreet", |record| &record.address_street),
            ("addressPostalCode", |record| &record.address_postal_code),
            ("addressCity", |record| &record.address_city),
            ("directorSurname", |record| &record.director_surname),
            ("directorName", |record| &record.director_name),
        ];
        FIELDS
    }
}

/// Maps a `Library` result row into a [`LibraryRecord`], column by name.
#[derive(Default)]
pub struct LibraryRowMapper;

impl RowMapper<LibraryRecord> for LibraryRowMapper {
    fn map_row(&self, row: &AnyRow) -> LibraryRecord {
        LibraryRecord {
            id: row.get("id"),
            library_type: row.get("type"),
            address_number: row.get("addressNumber"),
            address_street: row.get("addressStreet"),
            address_postal_code: row.get("addressPostalCode"),
            address_city: row.get("addressCity"),
            director_surname: row.get("directorSurname"),
            director_name: row.get("directorName"),
        }
    }
}

/// The transform slot of the export pipeline.
///
/// Currently a log-and-return identity; replacing it with a real transform
/// touches neither the reader nor the writer. A failing replacement must
/// return [`crate::error::BatchError::Processing`] with the record's id; the
/// run aborts on the first such error.
#[derive(Default)]
pub struct LibraryProcessor;

impl ItemProcessor<LibraryRecord, LibraryRecord> for LibraryProcessor {
    fn process(&self, item: &LibraryRecord) -> ItemProcessorResult<LibraryRecord> {
        info!("Processing {:?}", item);
        Ok(item.clone())
    }
}
