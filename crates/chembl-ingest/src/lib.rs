pub mod activities;
pub mod columns;
pub mod csv_table;
pub mod documents;
pub mod error;
pub mod input;
pub mod pairs;
pub mod status;

pub use activities::read_activities;
pub use csv_table::{ColumnLookup, CsvOptions, CsvRow, CsvTable, read_csv_table};
pub use documents::read_documents;
pub use error::IngestError;
pub use input::{
    ACTIVITIES_FILE, DOCUMENTS_FILE, InputTables, PAIRS_FILE, STATUS_FILE, load_input_dir,
};
pub use pairs::read_pairs;
pub use status::read_status_rules;

/// Options shared by the table readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub csv: CsvOptions,
    pub fail_on_missing_columns: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            csv: CsvOptions::default(),
            fail_on_missing_columns: true,
        }
    }
}
