use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::analysis::AnalysisError;

/// Minimum number of positions in a closed ring (three corners plus the closing point)
pub const MIN_RING_POSITIONS: usize = 4;

/// Farm boundary drawn by the user
/// One or more polygons in lon/lat order, used as planar coordinates (no projection)
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygons: Vec<Polygon<f64>>,
}

// Never empty: `new` rejects an empty polygon list
#[allow(clippy::len_without_is_empty)]
impl Boundary {
    /// Create a boundary, rejecting malformed rings
    pub fn new(polygons: Vec<Polygon<f64>>) -> Result<Self, AnalysisError> {
        if polygons.is_empty() {
            return Err(AnalysisError::InvalidBoundary(
                "boundary contains no polygons".to_string(),
            ));
        }

        for (idx, polygon) in polygons.iter().enumerate() {
            check_polygon(polygon).map_err(|reason| {
                AnalysisError::InvalidBoundary(format!("polygon {}: {}", idx, reason))
            })?;
        }

        Ok(Boundary { polygons })
    }

    /// Boundary made of a single polygon
    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self, AnalysisError> {
        Self::new(vec![polygon])
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of positions over every ring of every polygon
    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(polygon_vertex_count).sum()
    }

    /// Sum of the unsigned areas of the pieces, before any union
    pub fn raw_area(&self) -> f64 {
        self.polygons.iter().map(|p| p.unsigned_area()).sum()
    }

    /// Merge all pieces into a single shape
    /// Overlapping pieces are counted once; zero-area pieces contribute nothing
    pub fn merged(&self) -> MultiPolygon<f64> {
        let mut pieces = self
            .polygons
            .iter()
            .filter(|p| p.unsigned_area() > 0.0)
            .cloned();

        let first = match pieces.next() {
            Some(poly) => MultiPolygon::new(vec![poly]),
            None => return MultiPolygon::new(vec![]),
        };

        pieces.fold(first, |acc, poly| acc.union(&MultiPolygon::new(vec![poly])))
    }
}

/// Bounding box structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64, // min longitude
    pub min_y: f64, // min latitude
    pub max_x: f64, // max longitude
    pub max_y: f64, // max latitude
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Closed rectangular polygon covering the box, counter-clockwise
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                Coord {
                    x: self.min_x,
                    y: self.min_y,
                },
                Coord {
                    x: self.max_x,
                    y: self.min_y,
                },
                Coord {
                    x: self.max_x,
                    y: self.max_y,
                },
                Coord {
                    x: self.min_x,
                    y: self.max_y,
                },
                Coord {
                    x: self.min_x,
                    y: self.min_y,
                },
            ]),
            vec![],
        )
    }
}

/// Build a polygon from a single ring of `[lon, lat]` positions
pub fn polygon_from_ring(ring: &[[f64; 2]]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Exterior ring of a polygon as `[lon, lat]` positions
pub fn ring_from_polygon(polygon: &Polygon<f64>) -> Vec<[f64; 2]> {
    polygon.exterior().coords().map(|c| [c.x, c.y]).collect()
}

pub fn polygon_vertex_count(polygon: &Polygon<f64>) -> usize {
    polygon.exterior().0.len() + polygon.interiors().iter().map(|r| r.0.len()).sum::<usize>()
}

/// Check ring sizes and coordinate values, returning the reason on failure
pub fn check_polygon(polygon: &Polygon<f64>) -> Result<(), String> {
    check_ring(polygon.exterior()).map_err(|e| format!("exterior ring {}", e))?;
    for (idx, ring) in polygon.interiors().iter().enumerate() {
        check_ring(ring).map_err(|e| format!("interior ring {} {}", idx, e))?;
    }
    Ok(())
}

fn check_ring(ring: &LineString<f64>) -> Result<(), String> {
    if ring.0.len() < MIN_RING_POSITIONS {
        return Err(format!(
            "has {} positions, at least {} required",
            ring.0.len(),
            MIN_RING_POSITIONS
        ));
    }
    if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err("has non-finite coordinates".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        BoundingBox::new(x, y, x + size, y + size).to_polygon()
    }

    #[test]
    fn test_bounding_box_polygon() {
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 1.0);
        let poly = bbox.to_polygon();
        assert_eq!(poly.exterior().0.len(), 5);
        assert_relative_eq!(poly.unsigned_area(), 2.0);
    }

    #[test]
    fn test_boundary_rejects_empty() {
        assert!(matches!(
            Boundary::new(vec![]),
            Err(AnalysisError::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_boundary_rejects_short_ring() {
        let poly = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        assert!(Boundary::from_polygon(poly).is_err());
    }

    #[test]
    fn test_boundary_rejects_non_finite() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: f64::NAN, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];
        let err = Boundary::from_polygon(poly).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_merged_disjoint_pieces_sum() {
        let boundary = Boundary::new(vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]).unwrap();
        assert_relative_eq!(boundary.merged().unsigned_area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_merged_overlap_counted_once() {
        let boundary = Boundary::new(vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]).unwrap();
        assert_relative_eq!(boundary.raw_area(), 8.0);
        assert_relative_eq!(boundary.merged().unsigned_area(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_merged_skips_degenerate_pieces() {
        let flat = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ];
        let boundary = Boundary::new(vec![flat, square(3.0, 3.0, 1.0)]).unwrap();
        assert_eq!(boundary.merged().0.len(), 1);
        assert_eq!(boundary.vertex_count(), 9);
    }

    #[test]
    fn test_ring_round_trip() {
        let ring = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        let poly = polygon_from_ring(&ring);
        assert_eq!(ring_from_polygon(&poly), ring);
    }
}
