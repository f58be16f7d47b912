use crate::prelude::{AnnotationError, AnnotationResult};

/// Which member of a keypoint column triple a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
    Presence,
}

impl Component {
    pub const ORDER: [Component; 3] = [Component::X, Component::Y, Component::Presence];

    pub fn suffix(self) -> &'static str {
        match self {
            Component::X => "_x",
            Component::Y => "_y",
            Component::Presence => "_p",
        }
    }
}

pub fn column_name(keypoint: &str, component: Component) -> String {
    format!("{}{}", keypoint, component.suffix())
}

/// Splits `ear_left_x` into (`ear_left`, X). Only the trailing suffix is
/// stripped, so keypoint names may contain underscores.
pub fn split_column(column: &str) -> AnnotationResult<(&str, Component)> {
    for component in Component::ORDER {
        if let Some(prefix) = column.strip_suffix(component.suffix()) {
            if prefix.is_empty() {
                break;
            }
            return Ok((prefix, component));
        }
    }
    Err(AnnotationError::MalformedTable(format!(
        "column `{}` does not end in _x, _y or _p",
        column
    )))
}

/// One persisted frame. `values` follows the table's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub index: usize,
    pub values: Vec<f64>,
    pub image_name: Option<String>,
}

impl TableRow {
    pub fn new(index: usize, values: Vec<f64>) -> Self {
        Self {
            index,
            values,
            image_name: None,
        }
    }
}

/// Sparse, frame-indexed keypoint table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeypointTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl KeypointTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.index == index)
    }

    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.index).collect()
    }

    /// Column position, or `None` for an unknown name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Value lookup by frame index and column name.
    pub fn value(&self, index: usize, column: &str) -> Option<f64> {
        let position = self.column_index(column)?;
        self.row(index).and_then(|row| row.values.get(position).copied())
    }

    /// Attaches `names[row.index]` to every row that has a matching name.
    pub fn attach_image_names(&mut self, names: &[String]) {
        for row in &mut self.rows {
            row.image_name = names.get(row.index).cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_column_keeps_inner_underscores() {
        assert_eq!(split_column("ear_left_x").unwrap(), ("ear_left", Component::X));
        assert_eq!(split_column("left_paw_p").unwrap(), ("left_paw", Component::Presence));
    }

    #[test]
    fn split_column_rejects_unknown_suffix() {
        assert!(matches!(
            split_column("nose_q"),
            Err(AnnotationError::MalformedTable(_))
        ));
        assert!(split_column("_x").is_err());
        assert!(split_column("nose").is_err());
    }

    #[test]
    fn value_looks_up_sparse_rows() {
        let mut table = KeypointTable::new(vec!["nose_x".into(), "nose_y".into(), "nose_p".into()]);
        table.rows.push(TableRow::new(4, vec![1.0, 2.0, 1.0]));
        assert_eq!(table.value(4, "nose_y"), Some(2.0));
        assert_eq!(table.value(0, "nose_y"), None);
        assert_eq!(table.indices(), vec![4]);
    }
}
