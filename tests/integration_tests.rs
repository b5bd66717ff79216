use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use synoptic_processor::models::{ColumnData, MeanPolicy};
use synoptic_processor::processors::{GroupProcessor, GroupStatus};
use synoptic_processor::readers::{write_reference_csv, GazetteerReader, LocationReference};
use synoptic_processor::utils::Settings;
use synoptic_processor::writers::{CsvTableWriter, ParquetWriter};
use synoptic_processor::ProcessingError;
use tempfile::TempDir;

fn hour(day: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 6, day)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn station(id: u32, stid: &str, observations: Value) -> Value {
    json!({
        "ID": id.to_string(),
        "STID": stid,
        "MNET_ID": "1",
        "LONGITUDE": "-104.67",
        "LATITUDE": "39.85",
        "OBSERVATIONS": observations
    })
}

fn write_artifact(dir: &Path, name: &str, days: Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(&days).unwrap()).unwrap();
}

fn denver_artifact() -> Value {
    json!({
        "2023_06_1": {"STATION": [station(1, "KDEN", json!({
            "date_time": ["2023-06-01T08:05:00Z", "2023-06-01T08:25:00Z", "2023-06-01T08:45:00Z"],
            "precip_accum_set_1": [1.0, 2.0, 3.0],
            "air_temp_set_1": [10.0, 20.0, 30.0]
        }))]},
        "2023_06_2": {"STATION": [
            station(1, "KDEN", json!({
                "date_time": ["2023-06-02T09:10:00Z", "2023-06-02T09:40:00Z", "2023-06-02T09:50:00Z"],
                "air_temp_set_1": [null, 10.0, 20.0],
                "snow_accum_set_1": [null, 3.0, null]
            })),
            station(2, "KBJC", json!({
                "date_time": ["2023-06-02T09:10:00Z"],
                "air_temp_set_1": [null],
                "pressure_set_1": []
            }))
        ]}
    })
}

fn run(input: &Path, output: &Path) -> synoptic_processor::processors::RunReport {
    GroupProcessor::new(&Settings::default())
        .with_max_workers(2)
        .process_all(input, output, &ParquetWriter::new(), None)
        .unwrap()
}

#[test]
fn test_end_to_end_hourly_table() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_artifact(input.path(), "Denver_2023_06_weather_data.json", denver_artifact());

    let report = run(input.path(), output.path());
    assert_eq!(report.groups.len(), 1);
    assert!(report.groups[0].is_written());
    assert_eq!(report.groups[0].stations, 2);

    let path = output.path().join("Weatherdata_processed_Denver.parquet");
    let table = ParquetWriter::new().read_table(&path).unwrap();

    // KBJC reports a series of nulls, which still yields a row
    assert_eq!(table.num_rows(), 3);
    // key, id, time, 47 variables, 4 calendar fields
    assert_eq!(table.columns().len(), 54);

    let names = table.column_names();
    assert_eq!(&names[..3], &["Denver_STATION_NUM", "Denver_STATION_ID", "Denver_DATETIME"]);
    assert_eq!(&names[50..], &["YEAR", "MONTH", "DAY", "HOUR"]);

    assert_eq!(
        table.column("Denver_STATION_ID").unwrap().data,
        ColumnData::Utf8(vec![Some("KDEN".into()), Some("KDEN".into()), Some("KBJC".into())])
    );
    assert_eq!(
        table.column("Denver_DATETIME").unwrap().data,
        ColumnData::Timestamp(vec![Some(hour(1, 8)), Some(hour(2, 9)), Some(hour(2, 9))])
    );

    // accumulating variables take the max, means peek at the first reading
    assert_eq!(
        table.float_values("Denver_precip_accum_set_1").unwrap(),
        &[Some(3.0), None, None]
    );
    assert_eq!(
        table.float_values("Denver_air_temp_set_1").unwrap(),
        &[Some(20.0), None, None]
    );
    assert_eq!(
        table.float_values("Denver_snow_accum_set_1").unwrap(),
        &[None, Some(3.0), None]
    );

    assert_eq!(table.int_values("YEAR").unwrap(), &[Some(2023); 3]);
    assert_eq!(table.int_values("MONTH").unwrap(), &[Some(6); 3]);
    assert_eq!(table.int_values("DAY").unwrap(), &[Some(1), Some(2), Some(2)]);
    assert_eq!(table.int_values("HOUR").unwrap(), &[Some(8), Some(9), Some(9)]);

    // every variable of the null-only station is null
    let kbjc_values: Vec<Option<f64>> = table
        .column_names()
        .iter()
        .filter(|name| name.ends_with("_set_1"))
        .map(|name| table.float_values(name).unwrap()[2])
        .collect();
    assert_eq!(kbjc_values.len(), 47);
    assert!(kbjc_values.iter().all(Option::is_none));
}

#[test]
fn test_non_null_mean_policy() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_artifact(input.path(), "Denver_2023_06_weather_data.json", denver_artifact());

    let settings = Settings {
        mean_policy: MeanPolicy::NonNull,
        ..Settings::default()
    };
    GroupProcessor::new(&settings)
        .process_all(input.path(), output.path(), &ParquetWriter::new(), None)
        .unwrap();

    let table = ParquetWriter::new()
        .read_table(&output.path().join("Weatherdata_processed_Denver.parquet"))
        .unwrap();
    assert_eq!(
        table.float_values("Denver_air_temp_set_1").unwrap(),
        &[Some(20.0), Some(15.0), None]
    );
}

#[test]
fn test_files_of_a_group_are_stacked_in_name_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let month = |day: u32, stid: &str, value: f64| {
        json!({
            format!("2023_06_{}", day): {"STATION": [station(5, stid, json!({
                "date_time": [format!("2023-06-{:02}T10:30:00Z", day)],
                "air_temp_set_1": [value]
            }))]}
        })
    };
    write_artifact(input.path(), "Aspen_2023_06_weather_data.json", month(3, "KASE", 1.0));
    write_artifact(input.path(), "Aspen_2022_06_weather_data.json", month(4, "KASE", 2.0));

    run(input.path(), output.path());

    let table = ParquetWriter::new()
        .read_table(&output.path().join("Weatherdata_processed_Aspen.parquet"))
        .unwrap();
    assert_eq!(
        table.float_values("Aspen_air_temp_set_1").unwrap(),
        &[Some(2.0), Some(1.0)]
    );
    assert_eq!(
        table.column("Aspen_STATION_NUM").unwrap().data,
        ColumnData::UInt32(vec![Some(5), Some(5)])
    );
}

#[test]
fn test_group_isolation() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_artifact(input.path(), "Denver_2023_06_weather_data.json", denver_artifact());
    std::fs::write(input.path().join("Aspen_2023_06_weather_data.json"), "{\"2023_06_1\": [").unwrap();
    write_artifact(
        input.path(),
        "Vail_2023_06_weather_data.json",
        json!({"2023_06_1": {"STATION": []}}),
    );

    let report = run(input.path(), output.path());

    let statuses: Vec<(&str, &GroupStatus)> = report
        .groups
        .iter()
        .map(|g| (g.group.as_str(), &g.status))
        .collect();
    assert_eq!(statuses[0], ("Aspen", &GroupStatus::Empty));
    assert_eq!(statuses[2], ("Vail", &GroupStatus::Empty));
    assert!(report.groups[1].is_written());
    assert_eq!(report.groups[0].files_skipped.len(), 1);

    let mut written: Vec<String> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["Weatherdata_processed_Denver.parquet"]);
}

#[test]
fn test_repeated_runs_produce_identical_tables() {
    let input = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_artifact(input.path(), "Denver_2023_06_weather_data.json", denver_artifact());
    write_artifact(input.path(), "Denver_2023_07_weather_data.json", denver_artifact());

    run(input.path(), first.path());
    run(input.path(), second.path());

    let name = "Weatherdata_processed_Denver.parquet";
    let writer = ParquetWriter::new();
    let a = writer.read_table(&first.path().join(name)).unwrap();
    let b = writer.read_table(&second.path().join(name)).unwrap();

    assert_eq!(a.num_rows(), 6);
    assert_eq!(a, b);
}

#[test]
fn test_malformed_day_is_skipped_but_file_kept() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut days = denver_artifact();
    days["2023_06_3"] = json!({"STATION": [station(1, "KDEN", json!({
        "date_time": ["yesterday"],
        "air_temp_set_1": [1.0]
    }))]});
    write_artifact(input.path(), "Denver_2023_06_weather_data.json", days);

    let report = run(input.path(), output.path());
    assert_eq!(report.groups[0].days_skipped, 1);
    assert!(report.groups[0].is_written());
}

#[test]
fn test_csv_sink() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_artifact(input.path(), "Denver_2023_06_weather_data.json", denver_artifact());

    GroupProcessor::new(&Settings::default())
        .process_all(input.path(), output.path(), &CsvTableWriter::new(), None)
        .unwrap();

    let content =
        std::fs::read_to_string(output.path().join("Weatherdata_processed_Denver.csv")).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Denver_STATION_NUM,Denver_STATION_ID,Denver_DATETIME,"));
    assert!(header.ends_with(",YEAR,MONTH,DAY,HOUR"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn test_geocode_then_locate() {
    let temp_dir = TempDir::new().unwrap();
    let gazetteer = temp_dir.path().join("US.txt");
    let line = |id: &str, name: &str, lat: &str, lon: &str, admin: &str| {
        format!(
            "{id}\t{name}\t{name}\t\t{lat}\t{lon}\tP\tPPL\tUS\t\t{admin}\t031\t\t\t715522\t1609\t1611\tAmerica/Denver\t2023-01-01\n"
        )
    };
    let content = [
        line("5419384", "Denver", "39.73915", "-104.9847", "CO"),
        line("4463523", "Denver", "35.53125", "-81.02979", "NC"),
        line("9999999", "Denver", "0.0", "0.0", "CO"),
    ]
    .concat();
    std::fs::write(&gazetteer, content).unwrap();

    let records = GazetteerReader::new().read_locations(&gazetteer).unwrap();
    assert_eq!(records.len(), 3);

    let reference_path = temp_dir.path().join("USdata_processed.csv");
    write_reference_csv(&records, &reference_path).unwrap();

    let reference = LocationReference::from_csv(&reference_path).unwrap();
    let denver = reference.lookup("Denver", "CO").unwrap();
    assert_eq!(denver.latitude, 39.73915);
    assert_eq!(denver.longitude, -104.9847);
    assert_eq!(reference.lookup("Denver", "NC").unwrap().latitude, 35.53125);

    assert!(matches!(
        reference.lookup("Denver", "TX"),
        Err(ProcessingError::LocationNotFound { .. })
    ));
}
