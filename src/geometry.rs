//! Points, sizes, rectangles and the 2D affine matrix shared by every surface.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn location(&self) -> PointF {
        PointF::new(self.x, self.y)
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlap of two rectangles; disjoint rectangles yield a zero-sized rect.
    pub fn intersect(&self, other: &RectF) -> RectF {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return RectF::new(left, top, 0.0, 0.0);
        }
        RectF::from_ltrb(left, top, right, bottom)
    }

    pub fn union(&self, other: &RectF) -> RectF {
        RectF::from_ltrb(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

/// Whether a composed transform is applied after (`Append`) or before
/// (`Prepend`) the existing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatrixOrder {
    Prepend,
    #[default]
    Append,
}

/// 2D affine matrix `[m11, m12, m21, m22, dx, dy]`.
///
/// A point maps as `x' = m11*x + m21*y + dx`, `y' = m12*x + m22*y + dy`, which
/// matches the `(xx, yx, xy, yy, x0, y0)` layout used by cairo and the
/// `matrix(a b c d e f)` SVG transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub elements: [f64; 6],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> Self {
        Self {
            elements: [m11, m12, m21, m22, dx, dy],
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin; positive angles turn clockwise in a y-down space.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn offset_x(&self) -> f64 {
        self.elements[4]
    }

    pub fn offset_y(&self) -> f64 {
        self.elements[5]
    }

    /// Returns `self * m`: `m` maps points first, then `self`.
    pub fn then_after(&self, m: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.elements;
        let [na, nb, nc, nd, ne, nf] = m.elements;
        Matrix::new(
            a * na + c * nb,
            b * na + d * nb,
            a * nc + c * nd,
            b * nc + d * nd,
            a * ne + c * nf + e,
            b * ne + d * nf + f,
        )
    }

    /// Composes `op` with this matrix in the given order.
    pub fn compose(&mut self, op: &Matrix, order: MatrixOrder) {
        *self = match order {
            MatrixOrder::Append => op.then_after(self),
            MatrixOrder::Prepend => self.then_after(op),
        };
    }

    pub fn rotate(&mut self, degrees: f64, order: MatrixOrder) {
        self.compose(&Matrix::rotation(degrees), order);
    }

    pub fn translate(&mut self, dx: f64, dy: f64, order: MatrixOrder) {
        self.compose(&Matrix::translation(dx, dy), order);
    }

    pub fn scale(&mut self, sx: f64, sy: f64, order: MatrixOrder) {
        self.compose(&Matrix::scaling(sx, sy), order);
    }

    pub fn transform_point(&self, p: PointF) -> PointF {
        let [a, b, c, d, e, f] = self.elements;
        PointF::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }

    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
