use crate::error::Result;
use crate::models::{Column, ColumnData, HourlyTable, ReducedRow, VariableCatalog};
use crate::utils::constants::{
    COL_DATETIME, COL_DAY, COL_HOUR, COL_MONTH, COL_STATION_ID, COL_STATION_NUM, COL_YEAR,
};
use chrono::{Datelike, Timelike};
use std::sync::Arc;

/// Turns one file's reduced rows into a table keyed by station number
pub struct TableAssembler {
    catalog: Arc<VariableCatalog>,
}

impl TableAssembler {
    pub fn new(catalog: Arc<VariableCatalog>) -> Self {
        Self { catalog }
    }

    /// Columns: STATION_ID, DATETIME, one per variable, YEAR, MONTH, DAY, HOUR.
    /// No rows gives the empty table rather than an error.
    pub fn assemble(&self, rows: &[ReducedRow]) -> Result<HourlyTable> {
        if rows.is_empty() {
            return Ok(HourlyTable::empty());
        }

        let index = Column::new(
            COL_STATION_NUM,
            ColumnData::UInt32(rows.iter().map(|r| Some(r.station_num)).collect()),
        );

        let mut columns = Vec::with_capacity(self.catalog.len() + 6);
        columns.push(Column::new(
            COL_STATION_ID,
            ColumnData::Utf8(rows.iter().map(|r| Some(r.station_id.clone())).collect()),
        ));
        columns.push(Column::new(
            COL_DATETIME,
            ColumnData::Timestamp(rows.iter().map(|r| Some(r.hour)).collect()),
        ));

        for (position, variable) in self.catalog.variables().iter().enumerate() {
            columns.push(Column::new(
                variable.series_key.clone(),
                ColumnData::Float64(
                    rows.iter()
                        .map(|r| r.values.get(position).copied().flatten())
                        .collect(),
                ),
            ));
        }

        let calendar: [(&str, fn(&ReducedRow) -> i32); 4] = [
            (COL_YEAR, |r| r.hour.year()),
            (COL_MONTH, |r| r.hour.month() as i32),
            (COL_DAY, |r| r.hour.day() as i32),
            (COL_HOUR, |r| r.hour.hour() as i32),
        ];
        for (name, extract) in calendar {
            columns.push(Column::new(
                name,
                ColumnData::Int32(rows.iter().map(|r| Some(extract(r))).collect()),
            ));
        }

        HourlyTable::new(Some(index), columns)
    }
}
