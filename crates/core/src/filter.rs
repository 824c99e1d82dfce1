//! Single-or-many filter parameters.

/// A filter over one discriminant value.
///
/// `Any` and an empty `AnyOf` both match everything, so passing "no
/// criteria" never narrows a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    /// Match exactly one value.
    One(T),
    /// Match any of the listed values.
    AnyOf(Vec<T>),
    /// No filtering.
    Any,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T: PartialEq> Filter<T> {
    /// Whether the filter narrows anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Any => true,
            Self::AnyOf(values) => values.is_empty(),
            Self::One(_) => false,
        }
    }

    /// Test a present value.
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::One(expected) => expected == value,
            Self::AnyOf(values) => values.is_empty() || values.contains(value),
        }
    }

    /// Test a value that may be absent. An absent value only passes a no-op
    /// filter.
    #[must_use]
    pub fn matches_opt(&self, value: Option<&T>) -> bool {
        self.is_noop() || value.is_some_and(|v| self.matches(v))
    }
}

impl<T: std::str::FromStr> Filter<T> {
    /// Parse a comma-separated query value (`"pending"`,
    /// `"pending,assigned"`). Unrecognized entries are skipped; an empty or
    /// fully unrecognized input yields `Any`.
    #[must_use]
    pub fn parse_list(raw: Option<&str>) -> Self {
        let mut values: Vec<T> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| part.parse().ok())
            .collect();
        match values.len() {
            0 => Self::Any,
            1 => values.pop().map_or(Self::Any, Self::One),
            _ => Self::AnyOf(values),
        }
    }
}

impl<T> From<T> for Filter<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

impl<T> From<Vec<T>> for Filter<T> {
    fn from(values: Vec<T>) -> Self {
        Self::AnyOf(values)
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Any, Self::One)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderStatus;

    #[test]
    fn test_noop_forms() {
        assert!(Filter::<OrderStatus>::Any.is_noop());
        assert!(Filter::<OrderStatus>::AnyOf(vec![]).is_noop());
        assert!(!Filter::One(OrderStatus::Pending).is_noop());
    }

    #[test]
    fn test_matches_opt() {
        let f = Filter::One(OrderStatus::Pending);
        assert!(f.matches_opt(Some(&OrderStatus::Pending)));
        assert!(!f.matches_opt(None));
        assert!(Filter::<OrderStatus>::Any.matches_opt(None));
        let set = Filter::AnyOf(vec![OrderStatus::Pending, OrderStatus::Assigned]);
        assert!(set.matches_opt(Some(&OrderStatus::Assigned)));
        assert!(!set.matches_opt(Some(&OrderStatus::Completed)));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            Filter::<OrderStatus>::parse_list(Some("pending")),
            Filter::One(OrderStatus::Pending)
        );
        assert_eq!(
            Filter::<OrderStatus>::parse_list(Some("pending, assigned,bogus")),
            Filter::AnyOf(vec![OrderStatus::Pending, OrderStatus::Assigned])
        );
        assert_eq!(Filter::<OrderStatus>::parse_list(Some("")), Filter::Any);
        assert_eq!(Filter::<OrderStatus>::parse_list(None), Filter::Any);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Filter::from(OrderStatus::Completed), Filter::One(OrderStatus::Completed));
        assert_eq!(Filter::<OrderStatus>::from(None), Filter::Any);
        assert_eq!(
            Filter::from(vec![OrderStatus::Completed]),
            Filter::AnyOf(vec![OrderStatus::Completed])
        );
    }
}
