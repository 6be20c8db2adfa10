//! Comparator composition for multi-dimensional keys.
//!
//! A tree orders each axis by a strict "precedes" predicate. The composed
//! comparator is built from either one predicate applied uniformly to every
//! axis ([`Uniform`]), one distinct predicate per axis ([`PerAxis`]), or the
//! natural `PartialOrd` order on every axis ([`Natural`], the default). Arity
//! mismatches are impossible to express: the impls only exist where the
//! predicate arity is 1 or equals the key dimension.

use crate::point::{KdKey, Point};

/// A strict less-than style predicate over a single axis value type.
pub trait AxisOrder<T: ?Sized> {
    /// Returns `true` if `a` strictly precedes `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Natural ascending order through `PartialOrd`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascending;

impl<T: PartialOrd> AxisOrder<T> for Ascending {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Reversed order through `PartialOrd`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Descending;

impl<T: PartialOrd> AxisOrder<T> for Descending {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        b < a
    }
}

/// Adapts a strict less-than closure or function into an axis predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderBy<F>(pub F);

impl<T: ?Sized, F> AxisOrder<T> for OrderBy<F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// A composed comparator: one strict predicate per axis of the key `K`.
///
/// Two keys are considered equal by the tree when neither precedes the other
/// on any axis, so the comparator also defines the tree's key equality.
pub trait AxisCompare<K: KdKey> {
    /// Returns `true` if `a` strictly precedes `b` on the given axis.
    ///
    /// Callers guarantee `axis < K::DIM`.
    fn axis_less(&self, axis: usize, a: &K, b: &K) -> bool;
}

/// The default comparator: natural `PartialOrd` order on every axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: PartialOrd, const D: usize> AxisCompare<Point<T, D>> for Natural {
    #[inline]
    fn axis_less(&self, axis: usize, a: &Point<T, D>, b: &Point<T, D>) -> bool {
        a[axis] < b[axis]
    }
}

/// A single predicate applied uniformly to every axis of a [`Point`].
///
/// This is the arity-1 composition. Heterogeneous tuple keys have no uniform
/// element type, so they take [`PerAxis`] instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uniform<P>(pub P);

impl<T, P, const D: usize> AxisCompare<Point<T, D>> for Uniform<P>
where
    P: AxisOrder<T>,
{
    #[inline]
    fn axis_less(&self, axis: usize, a: &Point<T, D>, b: &Point<T, D>) -> bool {
        self.0.less(&a[axis], &b[axis])
    }
}

/// One distinct predicate per axis, held as a tuple matching the key's arity.
///
/// This is the arity-D composition. It applies to both heterogeneous tuple
/// keys and homogeneous [`Point`] keys; for the latter every predicate in the
/// tuple orders the same coordinate type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerAxis<P>(pub P);

macro_rules! impl_tuple_compare {
    ($dim:literal => $(($idx:tt, $t:ident, $p:ident)),+) => {
        impl<$($t: PartialOrd),+> AxisCompare<($($t,)+)> for Natural {
            #[inline]
            fn axis_less(&self, axis: usize, a: &($($t,)+), b: &($($t,)+)) -> bool {
                match axis {
                    $($idx => a.$idx < b.$idx,)+
                    _ => panic!("Invalid axis {} for a {}-dimensional key", axis, $dim),
                }
            }
        }

        impl<$($t,)+ $($p),+> AxisCompare<($($t,)+)> for PerAxis<($($p,)+)>
        where
            $($p: AxisOrder<$t>,)+
        {
            #[inline]
            fn axis_less(&self, axis: usize, a: &($($t,)+), b: &($($t,)+)) -> bool {
                let preds = &self.0;
                match axis {
                    $($idx => preds.$idx.less(&a.$idx, &b.$idx),)+
                    _ => panic!("Invalid axis {} for a {}-dimensional key", axis, $dim),
                }
            }
        }

        impl<T, $($p),+> AxisCompare<Point<T, $dim>> for PerAxis<($($p,)+)>
        where
            $($p: AxisOrder<T>,)+
        {
            #[inline]
            fn axis_less(&self, axis: usize, a: &Point<T, $dim>, b: &Point<T, $dim>) -> bool {
                let preds = &self.0;
                match axis {
                    $($idx => preds.$idx.less(&a[$idx], &b[$idx]),)+
                    _ => panic!("Invalid axis {} for a {}-dimensional key", axis, $dim),
                }
            }
        }
    };
}

impl_tuple_compare!(1 => (0, A, PA));
impl_tuple_compare!(2 => (0, A, PA), (1, B, PB));
impl_tuple_compare!(3 => (0, A, PA), (1, B, PB), (2, C, PC));
impl_tuple_compare!(4 => (0, A, PA), (1, B, PB), (2, C, PC), (3, D, PD));

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_orders_points_per_axis() {
        let a = Point::new([1, 9]);
        let b = Point::new([2, 3]);
        assert!(Natural.axis_less(0, &a, &b));
        assert!(!Natural.axis_less(1, &a, &b));
    }

    #[test]
    fn natural_orders_heterogeneous_tuples() {
        let a = (1, 'z');
        let b = (1, 'a');
        assert!(!Natural.axis_less(0, &a, &b));
        assert!(!Natural.axis_less(0, &b, &a));
        assert!(Natural.axis_less(1, &b, &a));
    }

    #[test]
    fn uniform_applies_one_predicate_everywhere() {
        let cmp = Uniform(Descending);
        let a = Point::new([1, 9]);
        let b = Point::new([2, 3]);
        assert!(cmp.axis_less(0, &b, &a));
        assert!(cmp.axis_less(1, &a, &b));
    }

    #[test]
    fn per_axis_mixes_predicates() {
        let cmp = PerAxis((Ascending, Descending));
        let a = (1, 10u8);
        let b = (2, 3u8);
        assert!(cmp.axis_less(0, &a, &b));
        assert!(cmp.axis_less(1, &a, &b));
    }

    #[test]
    fn per_axis_applies_to_points() {
        let cmp = PerAxis((Ascending, Descending));
        let a = Point::new([1, 10]);
        let b = Point::new([2, 3]);
        assert!(cmp.axis_less(0, &a, &b));
        assert!(cmp.axis_less(1, &a, &b));
        assert!(!cmp.axis_less(1, &b, &a));
    }

    #[test]
    fn closures_are_predicates() {
        let ci = OrderBy(|a: &str, b: &str| a.to_lowercase() < b.to_lowercase());
        assert!(ci.less("Apple", "banana"));
        assert!(!ci.less("BANANA", "apple"));
    }
}
