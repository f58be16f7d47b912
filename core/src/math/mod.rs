pub mod geometry;

pub use geometry::nearest_within;
