//! Polygon geometry
//!
//! The `points` grammar for SVG polygons and the bounding-box helpers used by
//! shape classification.

use chumsky::prelude::*;

use crate::core::DiagramError;

/// A 2D point in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounding box of a point set, `None` when empty
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Midpoints of the top, right, bottom and left edges
    pub fn edge_midpoints(&self) -> [Point; 4] {
        let c = self.center();
        [
            Point::new(c.x, self.min_y),
            Point::new(self.max_x, c.y),
            Point::new(c.x, self.max_y),
            Point::new(self.min_x, c.y),
        ]
    }
}

/// One SVG number: sign, mantissa with at most one point, optional exponent
///
/// A number ends where the next sign or second point starts, so `10-5` and
/// `.5.5` are two numbers each.
fn number<'src>() -> impl Parser<'src, &'src str, Option<f64>> + Clone {
    let digits = text::digits(10);
    let mantissa = digits
        .clone()
        .then(just('.').then(digits.clone().or_not()).or_not())
        .ignored()
        .or(just('.').then(digits.clone()).ignored());
    let exponent = one_of("eE").then(one_of("+-").or_not()).then(digits);

    one_of("+-")
        .or_not()
        .then(mantissa)
        .then(exponent.or_not())
        .to_slice()
        .map(|s: &str| s.parse::<f64>().ok())
}

fn separator<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(", \t\n\r").repeated().at_least(1).ignored()
}

fn coordinates<'src>() -> impl Parser<'src, &'src str, Vec<Option<f64>>> + Clone {
    number()
        .separated_by(separator().or_not())
        .allow_trailing()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Parse a polygon `points` attribute (`"x1,y1 x2,y2 ..."`)
///
/// Coordinates may be separated by commas, whitespace or both, or not at all
/// where the number grammar already splits them.
pub fn parse_points(input: &str) -> Result<Vec<Point>, DiagramError> {
    let values = coordinates()
        .parse(input.trim())
        .into_result()
        .map_err(|errors| DiagramError::points_error(format!("{:?}", errors), input))?;

    let numbers: Vec<f64> = values
        .into_iter()
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| DiagramError::points_error("invalid number", input))?;

    if numbers.len() % 2 != 0 {
        return Err(DiagramError::points_error("odd coordinate count", input));
    }

    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}
