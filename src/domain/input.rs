//! Per-field presence wrapper for externally sourced values.
//!
//! Every value the engine receives from a collaborator (odds, ratings,
//! weather, rest) is either `Known` or `Missing`. Call sites never invent
//! their own fallback; neutral defaults are applied in one place per
//! quantity (see `scoring::probability::resolve_probability`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<T>", into = "Option<T>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub enum Input<T> {
    Known(T),
    Missing,
}

impl<T> Default for Input<T> {
    fn default() -> Self {
        Input::Missing
    }
}

impl<T> Input<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Input::Known(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Input::Missing)
    }

    pub fn as_ref(&self) -> Input<&T> {
        match self {
            Input::Known(value) => Input::Known(value),
            Input::Missing => Input::Missing,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Input<U> {
        match self {
            Input::Known(value) => Input::Known(f(value)),
            Input::Missing => Input::Missing,
        }
    }

    /// Keep the value only if it passes the check
    pub fn filter<F: FnOnce(&T) -> bool>(self, check: F) -> Input<T> {
        match self {
            Input::Known(value) if check(&value) => Input::Known(value),
            _ => Input::Missing,
        }
    }

    /// Prefer `self`, falling back to `other` when missing
    pub fn or(self, other: Input<T>) -> Input<T> {
        match self {
            Input::Known(_) => self,
            Input::Missing => other,
        }
    }

    pub fn known(self) -> Option<T> {
        self.into()
    }
}

impl<T> From<Option<T>> for Input<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Input::Known(value),
            None => Input::Missing,
        }
    }
}

impl<T> From<Input<T>> for Option<T> {
    fn from(value: Input<T>) -> Self {
        match value {
            Input::Known(value) => Some(value),
            Input::Missing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        #[serde(default)]
        price: Input<i32>,
        #[serde(default)]
        rating: Input<f64>,
    }

    #[test]
    fn test_absent_and_null_fields_are_missing() {
        let record: Record = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(record.price, Input::Missing);
        assert_eq!(record.rating, Input::Missing);
    }

    #[test]
    fn test_present_field_is_known() {
        let record: Record = serde_json::from_str(r#"{"price": -150, "rating": 1612.5}"#).unwrap();
        assert_eq!(record.price, Input::Known(-150));
        assert_eq!(record.rating, Input::Known(1612.5));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["price"], -150);
    }

    #[test]
    fn test_or_prefers_known() {
        assert_eq!(Input::Known(1).or(Input::Known(2)), Input::Known(1));
        assert_eq!(Input::Missing.or(Input::Known(2)), Input::Known(2));
        assert_eq!(Input::<i32>::Missing.or(Input::Missing), Input::Missing);
    }

    #[test]
    fn test_filter_drops_invalid_values() {
        assert_eq!(Input::Known(0).filter(|m| *m != 0), Input::Missing);
        assert_eq!(Input::Known(-110).filter(|m| *m != 0), Input::Known(-110));
    }
}
