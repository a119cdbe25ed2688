//! Ring is the boundary of a polygon.
//!
//! Output formats following the OGC `LinearRing` convention (KML, GeoJSON) require a ring to be closed: the first and
//! the last coordinates of the sequence must be exactly the same. Input data does not always follow that convention,
//! so [`Ring`] stores points exactly as they were given and closes the ring only when the points are iterated with
//! [`Ring::iter_points_closing`].
//!
//! The closing check is done once per iteration, after the last point of the ring was produced. If the last point is
//! different from the first one in any component (including presence of elevation), the first point is produced again.
//! A ring of a single point is considered closed by itself.

use serde::{Deserialize, Serialize};

use crate::error::GeomarkTypesError;

/// Non-empty sequence of points bounding an area. See module level documentation for details.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Ring<P> {
    points: Vec<P>,
}

impl<P> Ring<P> {
    /// Creates a new ring.
    ///
    /// Returns an error if `points` is empty.
    pub fn new(points: Vec<P>) -> Result<Self, GeomarkTypesError> {
        if points.is_empty() {
            return Err(GeomarkTypesError::Conversion(
                "ring must contain at least one point".into(),
            ));
        }

        Ok(Self { points })
    }

    /// Points of the ring as they were given, without closing point added.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, rings cannot be empty. Provided for symmetry with [`Ring::len`].
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the points of the ring as they were given.
    ///
    /// If you want the first point to be repeated at the end of the iterator for open rings, use
    /// [`Ring::iter_points_closing`] instead.
    pub fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.points.iter()
    }

    /// Converts the ring into the vector of its points.
    pub fn into_points(self) -> Vec<P> {
        self.points
    }
}

impl<P: PartialEq> Ring<P> {
    /// Same as [`Ring::iter_points`] but repeats the first point at the end of the iterator if the ring is not closed.
    pub fn iter_points_closing(&self) -> ClosingPointsIterator<'_, P, std::slice::Iter<'_, P>> {
        ClosingPointsIterator::new(self.points.iter())
    }

    /// Returns true if the first and the last points of the ring are the same.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => !needs_closing(first, last),
            _ => true,
        }
    }
}

impl<P: PartialEq + Clone> Ring<P> {
    /// Returns a closed copy of the ring. Closing an already closed ring returns the same sequence of points.
    pub fn close(&self) -> Self {
        Self {
            points: self.iter_points_closing().cloned().collect(),
        }
    }
}

/// Returns true if a ring starting with `first` and ending with `last` must have `first` repeated at the end.
pub fn needs_closing<P: PartialEq>(first: &P, last: &P) -> bool {
    first != last
}

/// Iterator over ring points that repeats the first point at the end if it is different from the last one.
#[derive(Debug, Clone)]
pub struct ClosingPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    points_iter: Iter,
    first_point: Option<&'a P>,
    last_point: Option<&'a P>,
    is_done: bool,
}

impl<'a, P: 'a, Iter> ClosingPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    /// Wraps an iterator over ring points.
    pub fn new(points_iter: Iter) -> Self {
        Self {
            points_iter,
            first_point: None,
            last_point: None,
            is_done: false,
        }
    }
}

impl<'a, P: PartialEq, Iter> Iterator for ClosingPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done {
            return None;
        }

        match self.points_iter.next() {
            Some(next) => {
                if self.first_point.is_none() {
                    self.first_point = Some(next);
                }
                self.last_point = Some(next);
                Some(next)
            }
            None => {
                self.is_done = true;
                match (self.first_point, self.last_point) {
                    (Some(first), Some(last)) if needs_closing(first, last) => Some(first),
                    _ => None,
                }
            }
        }
    }
}
