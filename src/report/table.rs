// src/report/table.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::{ConvergenceRecord, Estimate, Precision};
use crate::math::State;
use crate::report::error::ReportError;

/// 区間数の列の幅
pub const COUNT_WIDTH: usize = 10;
/// 実数の列の幅
pub const VALUE_WIDTH: usize = 24;
/// 実数の小数点以下の桁数
pub const DECIMALS: usize = 15;

/// 出力ファイルの作成 (親ディレクトリも作る)
pub fn setup_table_output(path: &Path) -> Result<BufWriter<File>, ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let output_file = File::create(path)?;
    Ok(BufWriter::new(output_file))
}

fn count_cell(row: &mut String, count: usize) {
    row.push_str(&format!("{:<width$}", count, width = COUNT_WIDTH));
}

fn value_cell(row: &mut String, value: f64) {
    row.push_str(&format!(
        "{:<width$.prec$}",
        value,
        width = VALUE_WIDTH,
        prec = DECIMALS
    ));
}

fn error_cell(row: &mut String, value: f64) {
    row.push_str(&format!("{:<width$.6e}", value, width = VALUE_WIDTH));
}

fn label_cell(row: &mut String, label: &str, width: usize) {
    row.push_str(&format!("{:<width$}", label, width = width));
}

fn finish_row(mut row: String) -> String {
    row.truncate(row.trim_end().len());
    row.push('\n');
    row
}

/// 結果列の見出し ("Result" または "Result v" など)
pub fn result_labels(component_names: &[&str]) -> Vec<String> {
    if component_names.is_empty() {
        return vec!["Result".to_string()];
    }
    component_names
        .iter()
        .map(|name| format!("Result {}", name))
        .collect()
}

/// スイープ表のヘッダーの書き込み
pub fn write_sweep_header<W: Write>(
    writer: &mut W,
    result_labels: &[String],
) -> Result<(), std::io::Error> {
    let mut header = String::new();
    label_cell(&mut header, "Intervals", COUNT_WIDTH);
    label_cell(&mut header, "Width", VALUE_WIDTH);
    for label in result_labels {
        label_cell(&mut header, label, VALUE_WIDTH);
    }
    label_cell(&mut header, "Rel. Error", VALUE_WIDTH);

    writer.write_all(finish_row(header).as_bytes())?;
    Ok(())
}

/// スイープ表の行の作成
pub fn create_sweep_row<E: Estimate>(record: &ConvergenceRecord<E>) -> String {
    let mut row = String::new();
    count_cell(&mut row, record.interval_count);
    error_cell(&mut row, record.step_width);
    for component in record.estimate.components() {
        value_cell(&mut row, component);
    }
    error_cell(&mut row, record.relative_error);
    finish_row(row)
}

/// 精度探索の結果表 (ヘッダー + 1行) の書き込み
pub fn write_precision_table<W: Write, E: Estimate>(
    writer: &mut W,
    result_labels: &[String],
    precision: &Precision<E>,
) -> Result<(), std::io::Error> {
    let mut header = String::new();
    label_cell(&mut header, "Intervals", COUNT_WIDTH);
    for label in result_labels {
        label_cell(&mut header, label, VALUE_WIDTH);
    }
    label_cell(&mut header, "Abs. Error", VALUE_WIDTH);
    writer.write_all(finish_row(header).as_bytes())?;

    let mut row = String::new();
    count_cell(&mut row, precision.intervals);
    for component in precision.estimate.components() {
        value_cell(&mut row, component);
    }
    error_cell(&mut row, precision.absolute_error);
    writer.write_all(finish_row(row).as_bytes())?;
    Ok(())
}

/// 軌道表のヘッダーの書き込み
pub fn write_trajectory_header<W: Write>(
    writer: &mut W,
    component_names: &[&str],
    with_energy_drift: bool,
) -> Result<(), std::io::Error> {
    let mut header = String::new();
    label_cell(&mut header, "Step", COUNT_WIDTH);
    label_cell(&mut header, "Time", VALUE_WIDTH);
    for name in component_names {
        label_cell(&mut header, name, VALUE_WIDTH);
    }
    if with_energy_drift {
        label_cell(&mut header, "Energy Drift", VALUE_WIDTH);
    }
    writer.write_all(finish_row(header).as_bytes())?;
    Ok(())
}

/// 軌道表の行の作成
pub fn create_trajectory_row<const N: usize>(
    step: usize,
    time: f64,
    state: &State<N>,
    energy_drift: Option<f64>,
) -> String {
    let mut row = String::new();
    count_cell(&mut row, step);
    value_cell(&mut row, time);
    for component in state.components {
        value_cell(&mut row, component);
    }
    if let Some(drift) = energy_drift {
        error_cell(&mut row, drift);
    }
    finish_row(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_header_layout() {
        let mut buffer = Vec::new();
        write_sweep_header(&mut buffer, &result_labels(&["v", "x"])).unwrap();
        let header = String::from_utf8(buffer).unwrap();

        assert!(header.starts_with("Intervals Width"));
        assert!(header.contains("Result v"));
        assert!(header.contains("Result x"));
        assert!(header.ends_with("Rel. Error\n"));
        // "Width" は10桁目から始まる
        assert_eq!(header.find("Width"), Some(COUNT_WIDTH));
        assert_eq!(header.find("Result v"), Some(COUNT_WIDTH + VALUE_WIDTH));
    }

    #[test]
    fn test_sweep_row_layout() {
        let record = ConvergenceRecord {
            interval_count: 4,
            estimate: 0.25,
            relative_error: 0.5,
            step_width: 0.25,
        };
        let row = create_sweep_row(&record);

        assert_eq!(&row[..COUNT_WIDTH], "4         ");
        assert!(row.contains("0.250000000000000"));
        assert!(row.trim_end().ends_with("5.000000e-1"));
        assert!(row.ends_with('\n'));
    }

    #[test]
    fn test_scalar_result_label() {
        assert_eq!(result_labels(&[]), vec!["Result".to_string()]);
    }

    #[test]
    fn test_precision_table() {
        let mut buffer = Vec::new();
        let precision = Precision {
            estimate: 0.5,
            intervals: 14,
            absolute_error: 1e-9,
        };
        write_precision_table(&mut buffer, &result_labels(&[]), &precision).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Intervals Result"));
        assert!(lines[1].starts_with("14"));
        assert!(lines[1].ends_with("1.000000e-9"));
    }

    #[test]
    fn test_trajectory_row() {
        let row = create_trajectory_row(2, 0.5, &State::new([1.0, -1.0]), Some(0.0));
        assert!(row.starts_with("2         0.500000000000000"));
        assert!(row.contains("-1.000000000000000"));
        assert!(row.trim_end().ends_with("0.000000e0"));
    }

    #[test]
    fn test_setup_table_output_creates_directories() {
        let dir = std::env::temp_dir().join(format!("numsim_table_{}", std::process::id()));
        let path = dir.join("nested").join("table.txt");
        {
            let mut writer = setup_table_output(&path).unwrap();
            write_sweep_header(&mut writer, &result_labels(&[])).unwrap();
            writer.flush().unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Intervals"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
