pub mod hourly;
pub mod location;
pub mod payload;
pub mod station;
pub mod table;
pub mod variable;

pub use hourly::{floor_to_hour, HourBucket, HourBuckets, ReducedRow, StationBuckets};
pub use location::{Coordinates, LocationRecord};
pub use payload::{DayPayload, StationPayload};
pub use station::StationMetadata;
pub use table::{Column, ColumnData, HourlyTable};
pub use variable::{MeanPolicy, Reduction, TrackedVariable, VariableCatalog};
