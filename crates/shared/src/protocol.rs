use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Combination, FilterKind},
    error::ProtocolError,
};

/// A single filter constraint. Serializes externally tagged, e.g.
/// `{"sum":{"min_sum":100,"max_sum":150}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSpec {
    Sum { min_sum: i64, max_sum: i64 },
    EvenOdd { min_even: i64, max_even: i64 },
    Distance { min_distance: i64, max_distance: i64 },
    Include { numbers: Vec<i64> },
    Exclude { numbers: Vec<i64> },
    Random { count: i64 },
    Consecutive { max_consecutive: i64 },
}

impl FilterSpec {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSpec::Sum { .. } => FilterKind::Sum,
            FilterSpec::EvenOdd { .. } => FilterKind::EvenOdd,
            FilterSpec::Distance { .. } => FilterKind::Distance,
            FilterSpec::Include { .. } => FilterKind::Include,
            FilterSpec::Exclude { .. } => FilterKind::Exclude,
            FilterSpec::Random { .. } => FilterKind::Random,
            FilterSpec::Consecutive { .. } => FilterKind::Consecutive,
        }
    }
}

/// Body of `POST /filter`. `filters: None` goes over the wire as `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub total_numbers: i64,
    pub choose: i64,
    #[serde(default, with = "filters_object")]
    pub filters: Option<FilterSpec>,
}

impl FilterRequest {
    pub fn unfiltered(total_numbers: i64, choose: i64) -> Self {
        Self {
            total_numbers,
            choose,
            filters: None,
        }
    }

    pub fn filtered(total_numbers: i64, choose: i64, filter: FilterSpec) -> Self {
        Self {
            total_numbers,
            choose,
            filters: Some(filter),
        }
    }
}

mod filters_object {
    use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

    use super::FilterSpec;

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct EmptyObject {}

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FiltersRepr {
        Spec(FilterSpec),
        Empty(EmptyObject),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<FilterSpec>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(spec) => spec.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FilterSpec>, D::Error> {
        Ok(match Option::<FiltersRepr>::deserialize(deserializer)? {
            Some(FiltersRepr::Spec(spec)) => Some(spec),
            Some(FiltersRepr::Empty(_)) | None => None,
        })
    }
}

/// Raw response body as the service sends it. The service answers with a
/// success-level status either way, so only the shape tells the cases apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResponseBody {
    /// Any JSON value; only a truthy one marks the request as failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combinations: Option<Vec<Combination>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl FilterResponseBody {
    pub fn matched(combinations: Vec<Combination>, total: u64) -> Self {
        Self {
            error: None,
            combinations: Some(combinations),
            total: Some(total),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(error.into())),
            combinations: Some(Vec::new()),
            total: Some(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatches {
    pub combinations: Vec<Combination>,
    /// Server-side match count; may exceed `combinations.len()`.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Matched(FilterMatches),
    Rejected { error: String },
}

impl TryFrom<FilterResponseBody> for FilterOutcome {
    type Error = ProtocolError;

    fn try_from(body: FilterResponseBody) -> Result<Self, Self::Error> {
        if let Some(error) = body.error.as_ref().and_then(error_message) {
            return Ok(FilterOutcome::Rejected { error });
        }
        let combinations = body
            .combinations
            .ok_or(ProtocolError::MissingField("combinations"))?;
        let total = body.total.ok_or(ProtocolError::MissingField("total"))?;
        Ok(FilterOutcome::Matched(FilterMatches {
            combinations,
            total,
        }))
    }
}

/// Falsy values (`null`, `false`, `0`, `""`) carry no error.
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sum_request_matches_wire_layout() {
        let request = FilterRequest::filtered(
            49,
            6,
            FilterSpec::Sum {
                min_sum: 100,
                max_sum: 150,
            },
        );
        assert_eq!(
            serde_json::to_string(&request).expect("encode"),
            r#"{"total_numbers":49,"choose":6,"filters":{"sum":{"min_sum":100,"max_sum":150}}}"#
        );
    }

    #[test]
    fn unfiltered_request_sends_empty_filters_object() {
        let value = serde_json::to_value(FilterRequest::unfiltered(11, 6)).expect("encode");
        assert_eq!(value, json!({"total_numbers": 11, "choose": 6, "filters": {}}));
    }

    #[test]
    fn multi_word_kinds_use_snake_case_tags() {
        let value = serde_json::to_value(FilterSpec::EvenOdd {
            min_even: 2,
            max_even: 4,
        })
        .expect("encode");
        assert_eq!(value, json!({"even_odd": {"min_even": 2, "max_even": 4}}));

        let value = serde_json::to_value(FilterSpec::Consecutive { max_consecutive: 3 })
            .expect("encode");
        assert_eq!(value, json!({"consecutive": {"max_consecutive": 3}}));
    }

    #[test]
    fn request_decodes_empty_and_missing_filters_as_none() {
        let empty: FilterRequest =
            serde_json::from_value(json!({"total_numbers": 5, "choose": 2, "filters": {}}))
                .expect("decode");
        assert_eq!(empty.filters, None);

        let missing: FilterRequest =
            serde_json::from_value(json!({"total_numbers": 5, "choose": 2})).expect("decode");
        assert_eq!(missing.filters, None);
    }

    #[test]
    fn request_rejects_combined_filters() {
        let result = serde_json::from_value::<FilterRequest>(json!({
            "total_numbers": 5,
            "choose": 2,
            "filters": {"random": {"count": 1}, "include": {"numbers": [1]}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn error_body_becomes_rejection_even_with_payload_fields() {
        let body: FilterResponseBody = serde_json::from_value(json!({
            "error": "Total numbers must be greater than numbers to choose",
            "total": 0,
            "combinations": []
        }))
        .expect("decode");
        assert_eq!(
            FilterOutcome::try_from(body).expect("outcome"),
            FilterOutcome::Rejected {
                error: "Total numbers must be greater than numbers to choose".into()
            }
        );
    }

    #[test]
    fn success_body_ignores_extra_fields() {
        let body: FilterResponseBody = serde_json::from_value(json!({
            "filterName": "Sum Filter (21-66)",
            "total": 2,
            "combinations": [[1, 2, 3], [4, 5, 6]]
        }))
        .expect("decode");
        let FilterOutcome::Matched(matches) = FilterOutcome::try_from(body).expect("outcome")
        else {
            panic!("expected matches");
        };
        assert_eq!(matches.total, 2);
        assert_eq!(matches.combinations[1], Combination(vec![4, 5, 6]));
    }

    #[test]
    fn empty_error_string_is_not_a_failure() {
        let body = FilterResponseBody {
            error: Some(Value::String(String::new())),
            ..FilterResponseBody::matched(Vec::new(), 0)
        };
        assert!(matches!(
            FilterOutcome::try_from(body),
            Ok(FilterOutcome::Matched(_))
        ));
    }

    #[test]
    fn non_string_error_values_follow_truthiness() {
        for (error, expected) in [
            (json!(42), Some("42")),
            (json!(true), Some("true")),
            (json!({"code": 7}), Some(r#"{"code":7}"#)),
            (json!(0), None),
            (json!(false), None),
            (json!(null), None),
        ] {
            let body: FilterResponseBody = serde_json::from_value(json!({
                "error": error,
                "total": 1,
                "combinations": [[1, 2]]
            }))
            .expect("decode");
            let outcome = FilterOutcome::try_from(body).expect("outcome");
            match expected {
                Some(message) => assert_eq!(
                    outcome,
                    FilterOutcome::Rejected {
                        error: message.to_string()
                    }
                ),
                None => assert!(matches!(outcome, FilterOutcome::Matched(_))),
            }
        }
    }

    #[test]
    fn body_without_total_is_malformed() {
        let body: FilterResponseBody =
            serde_json::from_value(json!({"combinations": []})).expect("decode");
        assert_eq!(
            FilterOutcome::try_from(body),
            Err(ProtocolError::MissingField("total"))
        );
    }
}
