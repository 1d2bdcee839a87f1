use serde::{Deserialize, Serialize};

/// Latitude/longitude pair. Immutable on venues once created: it is a
/// search-index key.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Rectangular search area, inclusive on both ends of each axis.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct GeoArea {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoArea {
    pub fn latitude_interval(&self) -> Interval<f64> {
        Interval::between(self.min_latitude, self.max_latitude)
    }

    pub fn longitude_interval(&self) -> Interval<f64> {
        Interval::between(self.min_longitude, self.max_longitude)
    }
}

/// Per-dimension search predicate: match anything, or one fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter<T> {
    Any,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(v) => v == value,
        }
    }
}

/// Closed interval with optionally open ends. `Interval::any()` matches
/// everything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Interval<T> {
    pub fn any() -> Self {
        Self { min: None, max: None }
    }

    pub fn between(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub fn contains(&self, value: T) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_inclusive() {
        let i = Interval::between(1.0, 2.0);
        assert!(i.contains(1.0));
        assert!(i.contains(2.0));
        assert!(!i.contains(0.999));
        assert!(!i.contains(2.001));
    }

    #[test]
    fn open_ended_interval_matches_everything() {
        let i: Interval<f64> = Interval::any();
        assert!(i.contains(f64::MIN));
        assert!(i.contains(f64::MAX));
    }

    #[test]
    fn filter_admits() {
        assert!(Filter::<bool>::Any.admits(&true));
        assert!(Filter::Only(true).admits(&true));
        assert!(!Filter::Only(true).admits(&false));
    }
}
