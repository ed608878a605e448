pub mod import;
pub mod sqlite_store;

pub use import::{import_catalog, import_file, CatalogFile, ImportReport, RecordError};
pub use sqlite_store::{CatalogLookup, SqliteCatalog};
