pub mod csv_writer;
pub mod export;
pub mod hash;
pub mod meta;
pub mod values;

pub use csv_writer::{frame_to_csv, write_frame_csv};
pub use export::{
    ExportOptions, ExportReport, RUN_SUMMARY_FILE, table_file_name, write_exports,
};
pub use hash::sha256_hex;
pub use meta::{TableMeta, meta_file_name};
pub use values::{any_to_string, format_float};
