//! Node shapes and their outlines.
//!
//! Every diagram node is drawn with one of three [`ShapeKind`]s: boxes for
//! services, ellipses for libraries and actors, cylinders for data stores.
//! A shape knows how big it must be to hold a label, how its outline looks,
//! and where a ray from its center leaves the outline (used to clip edges).

use crate::{
    draw::Path,
    geometry::{Insets, Point, Size},
};

/// Minimum inner size of any node, before padding.
const MIN_CONTENT: Size = Size::new(40.0, 14.0);

/// Ellipses are stretched by this factor so the label rectangle fits inside.
const ELLIPSE_STRETCH: f32 = std::f32::consts::SQRT_2;

/// Visual category of a diagram node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Rectangle, used for services.
    Box,
    /// Ellipse, used for libraries and human actors.
    Ellipse,
    /// Cylinder, used for data stores.
    Cylinder,
}

/// The drawable outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeOutline {
    /// Closed path that is filled and stroked.
    pub body: Path,
    /// Additional open paths that are only stroked (the cylinder rim).
    pub details: Vec<Path>,
}

impl ShapeKind {
    /// Calculates the outer size of a shape holding content of `content_size`
    /// surrounded by `padding`.
    ///
    /// # Examples
    ///
    /// ```
    /// use proofpass_core::{draw::ShapeKind, geometry::{Insets, Size}};
    ///
    /// let label = Size::new(80.0, 14.0);
    /// let boxed = ShapeKind::Box.outer_size(label, Insets::uniform(8.0));
    /// assert_eq!(boxed, Size::new(96.0, 30.0));
    ///
    /// // Ellipses need more room to fit the same label.
    /// let oval = ShapeKind::Ellipse.outer_size(label, Insets::uniform(8.0));
    /// assert!(oval.width() > boxed.width());
    /// ```
    pub fn outer_size(self, content_size: Size, padding: Insets) -> Size {
        let inner = content_size.max(MIN_CONTENT).add_padding(padding);
        match self {
            Self::Box => inner,
            Self::Ellipse => inner.scale(ELLIPSE_STRETCH),
            Self::Cylinder => Size::new(
                inner.width(),
                inner.height() + 2.0 * Self::cap_height(inner.width()),
            ),
        }
    }

    /// Builds the outline of the shape centered at `center`.
    pub fn outline(self, center: Point, size: Size) -> ShapeOutline {
        let half_w = size.width() / 2.0;
        let half_h = size.height() / 2.0;
        let left = center.x() - half_w;
        let right = center.x() + half_w;
        let top = center.y() - half_h;
        let bottom = center.y() + half_h;

        match self {
            Self::Box => ShapeOutline {
                body: Path::polygon(&[
                    Point::new(left, top),
                    Point::new(right, top),
                    Point::new(right, bottom),
                    Point::new(left, bottom),
                ]),
                details: Vec::new(),
            },
            Self::Ellipse => ShapeOutline {
                body: Path::ellipse(center, half_w, half_h),
                details: Vec::new(),
            },
            Self::Cylinder => {
                let cap = Self::cap_height(size.width()).min(half_h);
                let top_center = Point::new(center.x(), top + cap);
                let bottom_center = Point::new(center.x(), bottom - cap);

                let top_left = Point::new(left, top_center.y());
                let top_right = Point::new(right, top_center.y());
                let bottom_left = Point::new(left, bottom_center.y());
                let bottom_right = Point::new(right, bottom_center.y());

                let mut body = Path::new();
                body.move_to(top_left)
                    .line_to(bottom_left)
                    .quarter_arc(bottom_center, bottom_left, Point::new(center.x(), bottom))
                    .quarter_arc(bottom_center, Point::new(center.x(), bottom), bottom_right)
                    .line_to(top_right)
                    .quarter_arc(top_center, top_right, Point::new(center.x(), top))
                    .quarter_arc(top_center, Point::new(center.x(), top), top_left)
                    .close();

                // Front half of the top ellipse.
                let front = Point::new(center.x(), top_center.y() + cap);
                let mut rim = Path::new();
                rim.move_to(top_left)
                    .quarter_arc(top_center, top_left, front)
                    .quarter_arc(top_center, front, top_right);

                ShapeOutline {
                    body,
                    details: vec![rim],
                }
            }
        }
    }

    /// Finds where the ray from `center` towards `toward` crosses the
    /// outline of a shape of `size` centered at `center`.
    ///
    /// Returns `toward` unchanged when both points coincide.
    pub fn find_intersection(self, center: Point, size: Size, toward: Point) -> Point {
        let direction = toward.sub_point(center);
        if direction.hypot() < 0.001 {
            return toward;
        }
        let unit = direction.normalize();
        let half_w = size.width() / 2.0;
        let half_h = size.height() / 2.0;

        let distance = match self {
            Self::Box | Self::Cylinder => {
                let tx = if unit.x().abs() > f32::EPSILON {
                    half_w / unit.x().abs()
                } else {
                    f32::MAX
                };
                let ty = if unit.y().abs() > f32::EPSILON {
                    half_h / unit.y().abs()
                } else {
                    f32::MAX
                };
                tx.min(ty)
            }
            Self::Ellipse => {
                // r = ab / sqrt((b cos θ)^2 + (a sin θ)^2)
                let denom = (half_h * unit.x()).hypot(half_w * unit.y());
                if denom > f32::EPSILON {
                    half_w * half_h / denom
                } else {
                    0.0
                }
            }
        };

        center.add_point(unit.scale(distance))
    }

    /// Height of the elliptical cap of a cylinder of the given width.
    fn cap_height(width: f32) -> f32 {
        (width * 0.08).clamp(4.0, 10.0)
    }
}
