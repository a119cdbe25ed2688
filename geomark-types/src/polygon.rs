//! See documentation for [`Polygon`].

use serde::{Deserialize, Serialize};

use crate::point::Position;
use crate::ring::Ring;

/// Polygon given by its outer ring.
///
/// Placemark documents describe an area only by its outer boundary, so inner rings (holes) are not part of this type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Polygon<P = Position> {
    outer_ring: Ring<P>,
}

impl<P> Polygon<P> {
    /// Creates a new polygon.
    pub fn new(outer_ring: Ring<P>) -> Self {
        Self { outer_ring }
    }

    /// Outer ring of the polygon.
    pub fn outer_ring(&self) -> &Ring<P> {
        &self.outer_ring
    }
}

impl<P> From<Ring<P>> for Polygon<P> {
    fn from(value: Ring<P>) -> Self {
        Self::new(value)
    }
}
