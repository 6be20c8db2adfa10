use std::ops::Index;

/// A trait for types usable as multi-dimensional keys of a k-d tree.
///
/// Only the axis count lives here. Axis *access* belongs to the comparator
/// ([`AxisCompare`][crate::AxisCompare]) and the distance metric
/// ([`DistanceMetric`][crate::kdtree::DistanceMetric]), which know the
/// per-axis value types. This is what lets a plain tuple with a distinct type
/// per axis act as a key without any uniform element type.
pub trait KdKey {
    /// The number of axes, fixed at the type level. Must be at least 1.
    const DIM: usize;
}

/// A homogeneous key: `D` coordinates of the same type.
///
/// For keys with a distinct type per axis, use a plain tuple instead (arities
/// 1 through 4 implement [`KdKey`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point<T, const D: usize> {
    coords: [T; D],
}

impl<T, const D: usize> Point<T, D> {
    /// Create a point from its coordinate array.
    pub fn new(coords: [T; D]) -> Self {
        Self { coords }
    }

    /// The coordinate on the given axis.
    ///
    /// Panics if `axis >= D`.
    #[inline]
    pub fn get(&self, axis: usize) -> &T {
        &self.coords[axis]
    }

    /// The underlying coordinate array.
    pub fn coords(&self) -> &[T; D] {
        &self.coords
    }

    /// Consume the point, returning the coordinate array.
    pub fn into_inner(self) -> [T; D] {
        self.coords
    }
}

impl<T, const D: usize> From<[T; D]> for Point<T, D> {
    fn from(coords: [T; D]) -> Self {
        Self::new(coords)
    }
}

impl<T, const D: usize> Index<usize> for Point<T, D> {
    type Output = T;

    #[inline]
    fn index(&self, axis: usize) -> &T {
        &self.coords[axis]
    }
}

impl<T, const D: usize> KdKey for Point<T, D> {
    const DIM: usize = D;
}

macro_rules! impl_tuple_key {
    ($dim:literal => $($t:ident),+) => {
        impl<$($t),+> KdKey for ($($t,)+) {
            const DIM: usize = $dim;
        }
    };
}

impl_tuple_key!(1 => A);
impl_tuple_key!(2 => A, B);
impl_tuple_key!(3 => A, B, C);
impl_tuple_key!(4 => A, B, C, D);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point_axis_access() {
        let p = Point::new([3, 1, 4]);
        assert_eq!(p[0], 3);
        assert_eq!(*p.get(2), 4);
        assert_eq!(Point::<i32, 3>::DIM, 3);
    }

    #[test]
    fn array_conversions_round_trip() {
        let p: Point<i32, 2> = [7, 9].into();
        assert_eq!(p.coords(), &[7, 9]);
        assert_eq!(p, Point::new([7, 9]));
        assert_eq!(p.into_inner(), [7, 9]);
    }

    #[test]
    fn tuple_dimensions() {
        assert_eq!(<(i32,)>::DIM, 1);
        assert_eq!(<(i32, char)>::DIM, 2);
        assert_eq!(<(i32, char, f64)>::DIM, 3);
        assert_eq!(<(i32, char, f64, u8)>::DIM, 4);
    }
}
