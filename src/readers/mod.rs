pub mod csv_reader;

pub use csv_reader::{canonical_column, column_names, decode_bytes, CsvReader};
