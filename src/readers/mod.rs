pub mod location_reader;
pub mod payload_reader;

pub use location_reader::{write_reference_csv, GazetteerReader, LocationReference};
pub use payload_reader::{MonthlyArtifact, PayloadReader};
