//! Backend-neutral vector paths.

use svg::node::element::path::Data;

use crate::geometry::Point;

/// Control point distance for approximating a quarter ellipse with one cubic
/// Bézier curve.
const KAPPA: f32 = 0.552_284_8;

/// A single drawing command of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier curve: two control points, then the end point.
    CubicTo(Point, Point, Point),
    Close,
}

/// An ordered list of [`Segment`]s in diagram coordinates (Y down).
///
/// # Examples
///
/// ```
/// use proofpass_core::{draw::Path, geometry::Point};
///
/// let mut path = Path::new();
/// path.move_to(Point::new(0.0, 0.0));
/// path.line_to(Point::new(10.0, 0.0));
/// path.close();
/// assert_eq!(path.segments().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Point) -> &mut Self {
        self.segments.push(Segment::MoveTo(point));
        self
    }

    pub fn line_to(&mut self, point: Point) -> &mut Self {
        self.segments.push(Segment::LineTo(point));
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, end: Point) -> &mut Self {
        self.segments.push(Segment::CubicTo(ctrl1, ctrl2, end));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(Segment::Close);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Appends a quarter of an ellipse centered at `center`, going from the
    /// current point `from` to `to`.
    ///
    /// `from` and `to` must be adjacent axis extremes of the ellipse (for
    /// example the leftmost and the bottom point).
    pub fn quarter_arc(&mut self, center: Point, from: Point, to: Point) -> &mut Self {
        // Control points lie on the tangents at `from` and `to`.
        let ctrl1 = from.add_point(to.sub_point(center).scale(KAPPA));
        let ctrl2 = to.add_point(from.sub_point(center).scale(KAPPA));
        self.cubic_to(ctrl1, ctrl2, to)
    }

    /// Builds a closed ellipse out of four quarter arcs.
    pub fn ellipse(center: Point, rx: f32, ry: f32) -> Self {
        let left = Point::new(center.x() - rx, center.y());
        let bottom = Point::new(center.x(), center.y() + ry);
        let right = Point::new(center.x() + rx, center.y());
        let top = Point::new(center.x(), center.y() - ry);

        let mut path = Self::new();
        path.move_to(left)
            .quarter_arc(center, left, bottom)
            .quarter_arc(center, bottom, right)
            .quarter_arc(center, right, top)
            .quarter_arc(center, top, left)
            .close();
        path
    }

    /// Builds a closed polygon through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
            path.close();
        }
        path
    }

    /// Converts the path into SVG path data.
    pub fn to_svg_data(&self) -> Data {
        self.segments
            .iter()
            .fold(Data::new(), |data, segment| match *segment {
                Segment::MoveTo(p) => data.move_to((p.x(), p.y())),
                Segment::LineTo(p) => data.line_to((p.x(), p.y())),
                Segment::CubicTo(c1, c2, end) => data.cubic_curve_to(vec![
                    c1.x(),
                    c1.y(),
                    c2.x(),
                    c2.y(),
                    end.x(),
                    end.y(),
                ]),
                Segment::Close => data.close(),
            })
    }
}
