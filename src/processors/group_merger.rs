use crate::error::Result;
use crate::models::HourlyTable;
use crate::utils::constants::CALENDAR_COLUMNS;
use tracing::warn;

/// Combines the per-file tables of one group into a single wide table
pub struct GroupMerger;

impl GroupMerger {
    pub fn new() -> Self {
        Self
    }

    /// Stack the tables, turn the row key into a column, prefix every
    /// non-calendar column with `<group>_` and keep the first of any repeated name.
    /// Returns `None` when no table has rows.
    pub fn merge(&self, group: &str, tables: Vec<HourlyTable>) -> Result<Option<HourlyTable>> {
        let combined = HourlyTable::concat(tables)?;
        if combined.is_empty() {
            warn!("Group {}: no non-empty tables to concatenate", group);
            return Ok(None);
        }

        let merged = combined
            .reset_index()
            .rename_columns(|name| prefixed_column_name(group, name))
            .drop_duplicate_columns();

        Ok(Some(merged))
    }
}

impl Default for GroupMerger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn prefixed_column_name(group: &str, column: &str) -> String {
    if CALENDAR_COLUMNS.contains(&column) {
        column.to_string()
    } else {
        format!("{}_{}", group, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnData};
    use pretty_assertions::assert_eq;

    fn file_table(station: u32, temp: f64, year: i32) -> HourlyTable {
        HourlyTable::new(
            Some(Column::new("STATION_NUM", ColumnData::UInt32(vec![Some(station)]))),
            vec![
                Column::new("air_temp", ColumnData::Float64(vec![Some(temp)])),
                Column::new("YEAR", ColumnData::Int32(vec![Some(year)])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_merge_prefixes_and_resets_key() {
        let merged = GroupMerger::new()
            .merge("A", vec![file_table(1, 20.0, 2022), file_table(2, 21.0, 2023)])
            .unwrap()
            .unwrap();

        assert_eq!(merged.column_names(), vec!["A_STATION_NUM", "A_air_temp", "YEAR"]);
        assert_eq!(merged.num_rows(), 2);
        assert_eq!(merged.float_values("A_air_temp").unwrap(), &[Some(20.0), Some(21.0)]);
        assert_eq!(merged.int_values("YEAR").unwrap(), &[Some(2022), Some(2023)]);
        assert_eq!(
            merged.column("A_STATION_NUM").unwrap().data,
            ColumnData::UInt32(vec![Some(1), Some(2)])
        );
    }

    #[test]
    fn test_duplicate_column_keeps_first() {
        let table = HourlyTable::new(
            Some(Column::new("STATION_NUM", ColumnData::UInt32(vec![Some(1)]))),
            vec![
                Column::new("air_temp", ColumnData::Float64(vec![Some(1.5)])),
                Column::new("air_temp", ColumnData::Float64(vec![Some(9.9)])),
            ],
        )
        .unwrap();

        let merged = GroupMerger::new()
            .merge("A", vec![table.clone(), table])
            .unwrap()
            .unwrap();

        let names = merged.column_names();
        assert_eq!(names.iter().filter(|n| **n == "A_air_temp").count(), 1);
        assert_eq!(merged.float_values("A_air_temp").unwrap(), &[Some(1.5), Some(1.5)]);
    }

    #[test]
    fn test_empty_group_yields_nothing() {
        let merged = GroupMerger::new()
            .merge("A", vec![HourlyTable::empty(), HourlyTable::empty()])
            .unwrap();
        assert!(merged.is_none());

        assert!(GroupMerger::new().merge("A", Vec::new()).unwrap().is_none());
    }

    #[test]
    fn test_calendar_columns_are_not_prefixed() {
        assert_eq!(prefixed_column_name("Denver", "HOUR"), "HOUR");
        assert_eq!(prefixed_column_name("Denver", "DATETIME"), "Denver_DATETIME");
    }
}
