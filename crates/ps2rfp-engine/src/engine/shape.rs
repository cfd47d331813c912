//! Floating shapes (pictures, text boxes, logos) drawn over a sheet.
//!
//! Shapes are not part of the grid. They carry a position and size in points
//! and are anchored to whichever cell their top-left corner lands in, using
//! the default column width and row height.

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// Default column width in points (64 px).
pub const DEFAULT_COL_WIDTH_PT: f64 = 48.0;
/// Default row height in points (20 px).
pub const DEFAULT_ROW_HEIGHT_PT: f64 = 15.0;

/// Position and size of a shape, in points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn is_valid(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub geometry: Geometry,
    pub locked: bool,
}

impl Shape {
    pub fn new(name: &str, left: f64, top: f64, width: f64, height: f64) -> Shape {
        Shape {
            name: name.to_string(),
            geometry: Geometry {
                left,
                top,
                width,
                height,
            },
            locked: true,
        }
    }

    /// The cell under the shape's top-left corner.
    pub fn anchor(&self) -> CellRef {
        CellRef::new(
            (self.geometry.top / DEFAULT_ROW_HEIGHT_PT).floor() as u32 + 1,
            (self.geometry.left / DEFAULT_COL_WIDTH_PT).floor() as u32 + 1,
        )
    }

    /// Move the shape, keeping its size.
    pub fn move_to(&mut self, left: f64, top: f64) -> Result<(), String> {
        self.set_geometry(Geometry {
            left,
            top,
            ..self.geometry
        })
    }

    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<(), String> {
        if self.locked {
            return Err(format!("shape '{}' is locked", self.name));
        }
        if !geometry.is_valid() {
            return Err(format!("invalid geometry for shape '{}'", self.name));
        }
        self.geometry = geometry;
        Ok(())
    }
}

/// Left edge of a column, in points.
pub fn column_left(col: u32) -> f64 {
    f64::from(col.saturating_sub(1)) * DEFAULT_COL_WIDTH_PT
}

/// Top edge of a row, in points.
pub fn row_top(row: u32) -> f64 {
    f64::from(row.saturating_sub(1)) * DEFAULT_ROW_HEIGHT_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_uses_default_grid() {
        let shape = Shape::new("Logo", 48.0 * 11.0 + 5.0, 15.0 * 2.0, 100.0, 40.0);
        assert_eq!(shape.anchor(), CellRef::new(3, 12));
    }

    #[test]
    fn test_locked_shape_refuses_to_move() {
        let mut shape = Shape::new("Stamp", 10.0, 10.0, 20.0, 20.0);
        assert!(shape.move_to(0.0, 0.0).is_err());
        shape.locked = false;
        assert!(shape.move_to(0.0, 0.0).is_ok());
        assert_eq!(shape.geometry.left, 0.0);
        assert_eq!(shape.geometry.width, 20.0);
    }

    #[test]
    fn test_rejects_non_finite_geometry() {
        let mut shape = Shape::new("Box", 0.0, 0.0, 1.0, 1.0);
        shape.locked = false;
        assert!(shape.move_to(f64::NAN, 0.0).is_err());
        assert_eq!(shape.geometry.left, 0.0);
    }
}
