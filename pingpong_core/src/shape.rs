//! Static geometry attached to entities.

use crate::error::SimError;

/// Axis-aligned rectangle, positioned by its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    width: f64,
    height: f64,
    color: String,
}

impl Rectangle {
    /// Dimensions must be positive and the rectangle must not be a square
    pub fn new(width: f64, height: f64, color: impl Into<String>) -> Result<Self, SimError> {
        if !is_positive(width) || !is_positive(height) {
            return Err(SimError::InvalidGeometry(format!(
                "rectangle sides must be positive, got {width}x{height}"
            )));
        }
        if width == height {
            return Err(SimError::InvalidGeometry(format!(
                "rectangle height can't be equal to width ({width})"
            )));
        }

        Ok(Rectangle {
            width,
            height,
            color: color.into(),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn extent(&self) -> Extent {
        Extent::Rectangle {
            width: self.width,
            height: self.height,
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

/// Circle, positioned by its center
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    radius: f64,
    color: String,
}

impl Circle {
    pub fn new(radius: f64, color: impl Into<String>) -> Result<Self, SimError> {
        if !is_positive(radius) {
            return Err(SimError::InvalidGeometry(format!(
                "circle radius must be positive, got {radius}"
            )));
        }

        Ok(Circle {
            radius,
            color: color.into(),
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn extent(&self) -> Extent {
        Extent::Circle {
            radius: self.radius,
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

/// Geometry of an entity
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
}

/// Size of a shape as seen by the boundary check
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Extent {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_validation() {
        assert!(Rectangle::new(80.0, 10.0, "#FF0000").is_ok());
        assert!(matches!(
            Rectangle::new(0.0, 10.0, "#FF0000"),
            Err(SimError::InvalidGeometry(_))
        ));
        assert!(Rectangle::new(80.0, -1.0, "#FF0000").is_err());
        assert!(Rectangle::new(f64::NAN, 10.0, "#FF0000").is_err());
        // Squares are rejected
        assert!(Rectangle::new(20.0, 20.0, "#FF0000").is_err());
    }

    #[test]
    fn test_circle_validation() {
        assert!(Circle::new(10.0, "#FFFFFF").is_ok());
        assert!(Circle::new(0.0, "#FFFFFF").is_err());
        assert!(Circle::new(f64::INFINITY, "#FFFFFF").is_err());
    }

    #[test]
    fn test_extent() {
        let rect = Rectangle::new(50.0, 2.0, "#FF0000").unwrap();
        assert_eq!(
            rect.extent(),
            Extent::Rectangle {
                width: 50.0,
                height: 2.0
            }
        );

        let shape: Shape = Circle::new(10.0, "#FFFFFF").unwrap().into();
        let Shape::Circle(circle) = shape else {
            panic!("expected a circle");
        };
        assert_eq!(circle.extent(), Extent::Circle { radius: 10.0 });
    }
}
