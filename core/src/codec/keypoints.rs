//! Conversion between an [`AnnotationBuffer`] and its sparse table form.
//!
//! Frames without any placed keypoint are left out of the table; their row
//! indices are simply absent. Decoding recovers keypoint names by stripping
//! the trailing `_x`/`_y`/`_p` suffix from each column.

use crate::annotation::{AnnotationBuffer, FrameRecord, KeypointSet};
use crate::codec::table::{column_name, split_column, Component, KeypointTable, TableRow};
use crate::prelude::{AnnotationError, AnnotationResult, Point};
use log::debug;

/// Presence values below this are treated as "not placed".
pub const PRESENCE_THRESHOLD: f64 = 1e-7;

pub fn encode(buffer: &AnnotationBuffer) -> KeypointTable {
    let columns = buffer
        .keypoints()
        .iter()
        .flat_map(|name| Component::ORDER.map(|component| column_name(name, component)))
        .collect();
    let mut table = KeypointTable::new(columns);

    for (index, frame) in buffer.frames().iter().enumerate() {
        if !frame.has_any_placed() {
            continue;
        }

        let mut values = Vec::with_capacity(frame.len() * 3);
        for keypoint in frame.keypoints() {
            match keypoint.position.filter(Point::is_finite) {
                Some(point) => values.extend([point.x, point.y, 1.0]),
                None => values.extend([f64::NAN, f64::NAN, 0.0]),
            }
        }
        table.rows.push(TableRow::new(index, values));
    }

    table
}

pub fn decode<I, S>(
    table: &KeypointTable,
    frame_count: usize,
    keypoint_names: I,
) -> AnnotationResult<AnnotationBuffer>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut buffer = AnnotationBuffer::create(frame_count, keypoint_names)?;
    let layout = column_layout(&table.columns, buffer.keypoints())?;

    for row in &table.rows {
        if row.values.len() != table.columns.len() {
            return Err(AnnotationError::MalformedTable(format!(
                "row {} has {} values for {} columns",
                row.index,
                row.values.len(),
                table.columns.len()
            )));
        }
        if row.index >= frame_count {
            debug!(
                "skipping table row {} beyond frame count {}",
                row.index, frame_count
            );
            continue;
        }

        let mut record = FrameRecord::unplaced(buffer.keypoints());
        for (triple, keypoint_index) in layout.iter().enumerate() {
            let base = triple * 3;
            let (x, y, p) = (row.values[base], row.values[base + 1], row.values[base + 2]);
            if p >= PRESENCE_THRESHOLD {
                record.set_position_at(*keypoint_index, Point::finite(x, y));
            }
        }
        buffer.set(row.index, &record)?;
    }

    buffer.mark_clean();
    Ok(buffer)
}

/// Maps each column triple to the configured keypoint it describes.
fn column_layout(columns: &[String], keypoints: &KeypointSet) -> AnnotationResult<Vec<usize>> {
    if columns.len() % 3 != 0 {
        return Err(AnnotationError::MalformedTable(format!(
            "{} columns is not a multiple of 3",
            columns.len()
        )));
    }

    let mut layout: Vec<usize> = Vec::with_capacity(columns.len() / 3);
    for triple in columns.chunks(3) {
        let mut prefix: Option<&str> = None;
        for (column, expected) in triple.iter().zip(Component::ORDER) {
            let (name, component) = split_column(column)?;
            if component != expected {
                return Err(AnnotationError::MalformedTable(format!(
                    "column `{}` found where a `{}` column was expected",
                    column,
                    expected.suffix()
                )));
            }
            match prefix {
                Some(existing) if existing != name => {
                    return Err(AnnotationError::MalformedTable(format!(
                        "column `{}` does not share the prefix `{}`",
                        column, existing
                    )));
                }
                _ => prefix = Some(name),
            }
        }

        let name = prefix.unwrap_or_default();
        let index = keypoints.index_of(name).ok_or_else(|| {
            AnnotationError::MalformedTable(format!("unknown keypoint `{}`", name))
        })?;
        if layout.contains(&index) {
            return Err(AnnotationError::MalformedTable(format!(
                "keypoint `{}` appears more than once",
                name
            )));
        }
        layout.push(index);
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Keypoint;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn scenario_buffer() -> AnnotationBuffer {
        let mut buffer = AnnotationBuffer::create(3, ["nose", "left_paw"]).unwrap();
        buffer
            .set(0, &FrameRecord::from_keypoints(vec![Keypoint::placed("nose", 10.0, 20.0)]))
            .unwrap();
        buffer
            .set(
                2,
                &FrameRecord::from_keypoints(vec![
                    Keypoint::placed("nose", 5.5, 6.5),
                    Keypoint::placed("left_paw", 1.0, 1.0),
                ]),
            )
            .unwrap();
        buffer
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn encode_omits_empty_frames_and_keeps_frame_indices() {
        let table = encode(&scenario_buffer());

        assert_eq!(
            table.columns,
            columns(&["nose_x", "nose_y", "nose_p", "left_paw_x", "left_paw_y", "left_paw_p"])
        );
        assert_eq!(table.indices(), vec![0, 2]);

        let row0 = &table.row(0).unwrap().values;
        assert_eq!(&row0[..3], &[10.0, 20.0, 1.0]);
        assert!(row0[3].is_nan() && row0[4].is_nan());
        assert_eq!(row0[5], 0.0);

        assert_eq!(table.row(2).unwrap().values, vec![5.5, 6.5, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn decode_into_longer_media_leaves_other_frames_unplaced() {
        let buffer = decode(&encode(&scenario_buffer()), 5, ["nose", "left_paw"]).unwrap();

        assert_eq!(buffer.len(), 5);
        for index in [1, 3, 4] {
            assert!(!buffer.get(index).unwrap().has_any_placed());
        }
        let frame0 = buffer.get(0).unwrap();
        assert_eq!(frame0.position("nose"), Some(Point::new(10.0, 20.0)));
        assert_eq!(frame0.position("left_paw"), None);
        let frame2 = buffer.get(2).unwrap();
        assert_eq!(frame2.position("nose"), Some(Point::new(5.5, 6.5)));
        assert_eq!(frame2.position("left_paw"), Some(Point::new(1.0, 1.0)));
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn underscore_names_survive_round_trip() {
        let mut buffer = AnnotationBuffer::create(2, ["ear_left", "ear"]).unwrap();
        buffer
            .set(
                1,
                &FrameRecord::from_keypoints(vec![
                    Keypoint::placed("ear_left", 3.0, 4.0),
                    Keypoint::placed("ear", 7.0, 8.0),
                ]),
            )
            .unwrap();

        let decoded = decode(&encode(&buffer), 2, ["ear_left", "ear"]).unwrap();
        assert_eq!(decoded, buffer);
        assert_eq!(
            decoded.get(1).unwrap().position("ear_left"),
            Some(Point::new(3.0, 4.0))
        );
    }

    #[test]
    fn rows_beyond_frame_count_are_ignored() {
        let mut table = encode(&scenario_buffer());
        table.rows.push(TableRow::new(9, vec![1.0, 1.0, 1.0, 2.0, 2.0, 1.0]));

        let buffer = decode(&table, 3, ["nose", "left_paw"]).unwrap();
        assert_eq!(buffer, scenario_buffer());
    }

    #[test]
    fn low_presence_or_nan_coordinates_decode_unplaced() {
        let mut table = KeypointTable::new(columns(&["nose_x", "nose_y", "nose_p"]));
        table.rows.push(TableRow::new(0, vec![1.0, 2.0, 1e-9]));
        table.rows.push(TableRow::new(1, vec![f64::NAN, 2.0, 1.0]));
        table.rows.push(TableRow::new(2, vec![1.0, 2.0, 0.5]));

        let buffer = decode(&table, 3, ["nose"]).unwrap();
        assert!(!buffer.get(0).unwrap().has_any_placed());
        assert!(!buffer.get(1).unwrap().has_any_placed());
        assert_eq!(buffer.get(2).unwrap().position("nose"), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn decode_rejects_malformed_columns() {
        let cases = [
            columns(&["nose_x", "nose_y"]),
            columns(&["nose_x", "nose_y", "nose_q"]),
            columns(&["nose_x", "nose_y", "tail_p"]),
            columns(&["nose_y", "nose_x", "nose_p"]),
            columns(&["paw_x", "paw_y", "paw_p"]),
            columns(&["nose_x", "nose_y", "nose_p", "nose_x", "nose_y", "nose_p"]),
        ];
        for columns in cases {
            let table = KeypointTable::new(columns.clone());
            assert!(
                matches!(decode(&table, 1, ["nose"]), Err(AnnotationError::MalformedTable(_))),
                "expected failure for {:?}",
                columns
            );
        }
    }

    #[test]
    fn decode_rejects_short_rows() {
        let mut table = KeypointTable::new(columns(&["nose_x", "nose_y", "nose_p"]));
        table.rows.push(TableRow::new(0, vec![1.0, 2.0]));
        assert!(matches!(
            decode(&table, 1, ["nose"]),
            Err(AnnotationError::MalformedTable(_))
        ));
    }

    #[test]
    fn decode_accepts_tables_with_configured_keypoints_missing() {
        let mut table = KeypointTable::new(columns(&["tail_x", "tail_y", "tail_p"]));
        table.rows.push(TableRow::new(0, vec![1.0, 2.0, 1.0]));
        let buffer = decode(&table, 1, ["nose", "tail"]).unwrap();
        let frame = buffer.get(0).unwrap();
        assert_eq!(frame.position("nose"), None);
        assert_eq!(frame.position("tail"), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn full_or_empty_frames_round_trip() {
        let names = ["nose", "left_paw", "tail_base", "ear_left"];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let frame_count = rng.gen_range(1..20);
            let mut buffer = AnnotationBuffer::create(frame_count, names).unwrap();
            for index in 0..frame_count {
                if rng.gen_bool(0.5) {
                    continue;
                }
                let keypoints = names
                    .iter()
                    .map(|name| {
                        Keypoint::placed(
                            *name,
                            rng.gen_range(-500.0..1500.0),
                            rng.gen_range(-500.0..1500.0),
                        )
                    })
                    .collect();
                buffer.set(index, &FrameRecord::from_keypoints(keypoints)).unwrap();
            }

            let table = encode(&buffer);
            assert!(table
                .rows
                .iter()
                .all(|row| buffer.get(row.index).unwrap().has_any_placed()));
            assert_eq!(decode(&table, frame_count, names).unwrap(), buffer);
        }
    }
}
