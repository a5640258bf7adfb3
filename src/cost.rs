/// Costs of moving through a search space.
///
/// Costs are non-negative and saturate at `max_value()`, which stands for an
/// unreachable (+∞) cost.
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + std::hash::Hash
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::AddAssign
{
    /// Whether this is a finite cost.
    ///
    /// ```
    /// use gridsearch::cost::Cost;
    /// use num_traits::bounds::UpperBounded;
    ///
    /// assert!(3u32.valid());
    /// assert!(!<u32 as UpperBounded>::max_value().valid());
    /// ```
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }

    /// The +∞ cost.
    #[inline(always)]
    fn infinity() -> Self {
        num_traits::bounds::UpperBounded::max_value()
    }
}

impl Cost for u32 {}
impl Cost for u64 {}

#[cfg(test)]
mod tests {
    use super::*;

    use num_traits::SaturatingAdd;

    #[test]
    fn infinity_saturates() {
        let inf = <u32 as Cost>::infinity();
        assert!(!inf.valid());
        assert_eq!(SaturatingAdd::saturating_add(&inf, &1u32), inf);
        assert_eq!(SaturatingAdd::saturating_add(&7u32, &inf), inf);
    }

    #[test]
    fn finite_costs_are_valid() {
        assert!(0u32.valid());
        assert!(u32::MAX.saturating_sub(1).valid());
    }
}
