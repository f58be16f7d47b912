use crate::codec::table::{KeypointTable, TableRow};
use crate::prelude::{AnnotationError, AnnotationResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Optional trailing column holding the source image of each row.
pub const IMAGE_NAME_COLUMN: &str = "image_name";

/// Writes the table with a leading, unnamed frame-index column. NaN is
/// written as an empty cell and presence columns as `0`/`1`. With
/// `with_names` the header ends in an `image_name` column even when the
/// table has no rows.
pub fn write_table<W: Write>(
    table: &KeypointTable,
    with_names: bool,
    writer: W,
) -> AnnotationResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.columns.len() + 2);
    header.push(String::new());
    header.extend(table.columns.iter().cloned());
    if with_names {
        header.push(IMAGE_NAME_COLUMN.to_string());
    }
    csv_writer.write_record(&header)?;

    let presence: Vec<bool> = table.columns.iter().map(|c| c.ends_with("_p")).collect();
    for row in &table.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.index.to_string());
        for (value, is_presence) in row.values.iter().zip(&presence) {
            record.push(format_value(*value, *is_presence));
        }
        if with_names {
            record.push(row.image_name.clone().unwrap_or_default());
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Reads a table whose first column is the frame index. Any
/// `image_name` column is kept on the rows, not among the value columns.
pub fn read_table<R: Read>(reader: R) -> AnnotationResult<KeypointTable> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(AnnotationError::MalformedTable("missing header row".into()));
    }

    let image_column = headers
        .iter()
        .skip(1)
        .position(|name| name == IMAGE_NAME_COLUMN)
        .map(|position| position + 1);
    let value_columns: Vec<usize> = (1..headers.len())
        .filter(|position| Some(*position) != image_column)
        .collect();

    let mut table = KeypointTable::new(
        value_columns
            .iter()
            .map(|&position| headers[position].to_string())
            .collect(),
    );

    for record in csv_reader.records() {
        let record = record?;
        let index = record[0].trim().parse::<f64>().ok().filter(|v| {
            v.is_finite() && *v >= 0.0 && v.fract() == 0.0
        });
        let index = match index {
            Some(value) => value as usize,
            None => {
                return Err(AnnotationError::MalformedTable(format!(
                    "invalid frame index `{}`",
                    &record[0]
                )))
            }
        };

        let values = value_columns
            .iter()
            .map(|&position| parse_value(&record[position]))
            .collect::<AnnotationResult<Vec<f64>>>()?;
        let mut row = TableRow::new(index, values);
        row.image_name = image_column
            .map(|position| record[position].to_string())
            .filter(|name| !name.is_empty());
        table.rows.push(row);
    }

    Ok(table)
}

pub fn save_table(path: &Path, table: &KeypointTable, with_names: bool) -> AnnotationResult<()> {
    let file = File::create(path)?;
    write_table(table, with_names, BufWriter::new(file))
}

pub fn load_table(path: &Path) -> AnnotationResult<KeypointTable> {
    let file = File::open(path)?;
    read_table(BufReader::new(file))
}

fn format_value(value: f64, is_presence: bool) -> String {
    if value.is_nan() {
        String::new()
    } else if is_presence && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:?}", value)
    }
}

fn parse_value(cell: &str) -> AnnotationResult<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| AnnotationError::MalformedTable(format!("invalid number `{}`", cell)))
}
