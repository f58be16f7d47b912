use crate::prelude::Point;

/// Index of the placed point closest to `target`, provided it lies strictly
/// inside `radius`. Unplaced entries are skipped; ties go to the first.
pub fn nearest_within<I>(points: I, target: Point, radius: f64) -> Option<usize>
where
    I: IntoIterator<Item = Option<Point>>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, point) in points.into_iter().enumerate() {
        let Some(point) = point.filter(Point::is_finite) else {
            continue;
        };
        let distance = point.distance(&target);
        if best.map_or(true, |(_, current)| distance < current) {
            best = Some((index, distance));
        }
    }

    best.filter(|(_, distance)| *distance < radius)
        .map(|(index, _)| index)
}
