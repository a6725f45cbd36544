use nalgebra as na;

use crate::Error;

/// Read-only, indexable collection of 2D points.
///
/// Implementors only provide `len`, `x` and `y`; indices are in `0..len()`.
pub trait PointSet<F: na::RealField + Copy> {
    /// Number of points
    fn len(&self) -> usize;

    /// X-coordinate of the point at `index`
    fn x(&self, index: usize) -> F;

    /// Y-coordinate of the point at `index`
    fn y(&self, index: usize) -> F;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn point(&self, index: usize) -> na::Point2<F> {
        na::Point2::new(self.x(index), self.y(index))
    }

    /// Points in index order
    fn iter_points(&self) -> impl Iterator<Item = na::Point2<F>> + '_
    where
        Self: Sized,
    {
        (0..self.len()).map(move |i| self.point(i))
    }
}

/// Points stored as two parallel fixed-size arrays.
#[derive(Debug, Clone, Copy)]
pub struct ArrayPoints<'a, F, const N: usize> {
    xs: &'a [F; N],
    ys: &'a [F; N],
}

impl<'a, F, const N: usize> ArrayPoints<'a, F, N> {
    pub fn new(xs: &'a [F; N], ys: &'a [F; N]) -> Self {
        Self { xs, ys }
    }
}

impl<F: na::RealField + Copy, const N: usize> PointSet<F> for ArrayPoints<'_, F, N> {
    fn len(&self) -> usize {
        N
    }

    fn x(&self, index: usize) -> F {
        self.xs[index]
    }

    fn y(&self, index: usize) -> F {
        self.ys[index]
    }
}

/// Points stored as two parallel borrowed slices of equal length.
#[derive(Debug, Clone, Copy)]
pub struct SlicePoints<'a, F> {
    xs: &'a [F],
    ys: &'a [F],
}

impl<'a, F> SlicePoints<'a, F> {
    pub fn try_new(xs: &'a [F], ys: &'a [F]) -> Result<Self, Error> {
        if xs.len() != ys.len() {
            return Err(Error::MismatchedLengths {
                x: xs.len(),
                y: ys.len(),
            });
        }
        Ok(Self { xs, ys })
    }
}

impl<F: na::RealField + Copy> PointSet<F> for SlicePoints<'_, F> {
    fn len(&self) -> usize {
        self.xs.len()
    }

    fn x(&self, index: usize) -> F {
        self.xs[index]
    }

    fn y(&self, index: usize) -> F {
        self.ys[index]
    }
}

/// Points stored as two owned, growable coordinate vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VecPoints<F> {
    xs: Vec<F>,
    ys: Vec<F>,
}

impl<F> VecPoints<F> {
    pub fn try_new(xs: Vec<F>, ys: Vec<F>) -> Result<Self, Error> {
        if xs.len() != ys.len() {
            return Err(Error::MismatchedLengths {
                x: xs.len(),
                y: ys.len(),
            });
        }
        Ok(Self { xs, ys })
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, x: F, y: F) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn xs(&self) -> &[F] {
        &self.xs
    }

    pub fn ys(&self) -> &[F] {
        &self.ys
    }
}

impl<F: na::RealField + Copy> PointSet<F> for VecPoints<F> {
    fn len(&self) -> usize {
        self.xs.len()
    }

    fn x(&self, index: usize) -> F {
        self.xs[index]
    }

    fn y(&self, index: usize) -> F {
        self.ys[index]
    }
}

impl<F: na::RealField + Copy> FromIterator<na::Point2<F>> for VecPoints<F> {
    fn from_iter<I: IntoIterator<Item = na::Point2<F>>>(iter: I) -> Self {
        let (xs, ys) = iter.into_iter().map(|p| (p.x, p.y)).unzip();
        Self { xs, ys }
    }
}

impl<F: na::RealField + Copy> PointSet<F> for [na::Point2<F>] {
    fn len(&self) -> usize {
        <[na::Point2<F>]>::len(self)
    }

    fn x(&self, index: usize) -> F {
        self[index].x
    }

    fn y(&self, index: usize) -> F {
        self[index].y
    }
}
