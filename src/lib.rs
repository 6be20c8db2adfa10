#![doc = include_str!("../README.md")]

mod compare;
mod error;
pub mod kdtree;
mod point;

pub use compare::{Ascending, AxisCompare, AxisOrder, Descending, Natural, OrderBy, PerAxis, Uniform};
pub use error::KdIndexError;
pub use point::{KdKey, Point};
