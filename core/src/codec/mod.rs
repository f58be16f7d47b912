pub mod csv_io;
pub mod keypoints;
pub mod table;

pub use csv_io::{load_table, read_table, save_table, write_table, IMAGE_NAME_COLUMN};
pub use keypoints::{decode, encode, PRESENCE_THRESHOLD};
pub use table::{Component, KeypointTable, TableRow};
