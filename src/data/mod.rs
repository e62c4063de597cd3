//! Tabular data handling
//!
//! Raw tables as the source sends them, typed records at the transformation
//! boundary, the [`DataSource`] collaborator seam, and the seeded train/test
//! split.

mod error;
mod record;
mod source;
mod split;
mod table;

pub use error::{DataError, Result};
pub use record::{Gender, InsuranceRecord, VehicleAge};
pub use source::{CsvSource, DataSource, InMemorySource};
pub use split::train_test_split;
pub use table::Table;
