pub mod group_merger;
pub mod group_processor;
pub mod normalizer;
pub mod reducer;
pub mod run_report;
pub mod station_registry;
pub mod table_assembler;

pub use group_merger::{prefixed_column_name, GroupMerger};
pub use group_processor::{FileOutcome, GroupProcessor};
pub use normalizer::ObservationNormalizer;
pub use reducer::{reduce_values, HourlyReducer};
pub use run_report::{GroupReport, GroupStatus, RunReport};
pub use station_registry::{has_observations, StationRegistry};
pub use table_assembler::TableAssembler;
