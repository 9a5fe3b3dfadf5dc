use crate::error::SchemeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys a profile must carry, in the order they are checked.
pub const REQUIRED_PROFILE_KEYS: [&str; 7] = [
    "age",
    "gender",
    "occupation",
    "income",
    "location",
    "casteCategory",
    "disability",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: String,
    pub gender: String,
    pub occupation: String,
    /// Categorical bucket such as "Below 2.5 Lakh".
    pub income: String,
    pub location: String,
    pub caste_category: String,
    pub disability: String,
}

impl Profile {
    /// Validates a JSON profile at the boundary. Unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, SchemeError> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemeError::InvalidProfile("profile must be a JSON object".into()))?;
        let text = |key: &'static str| -> Result<String, SchemeError> {
            let raw = obj.get(key).ok_or(SchemeError::MissingProfileField(key))?;
            field_text(key, raw)
        };
        Ok(Profile {
            age: text("age")?,
            gender: text("gender")?,
            occupation: text("occupation")?,
            income: text("income")?,
            location: text("location")?,
            caste_category: text("casteCategory")?,
            disability: text("disability")?,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SchemeError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| SchemeError::InvalidProfile(format!("not valid JSON: {e}")))?;
        Self::from_value(&value)
    }
}

fn field_text(key: &str, raw: &Value) -> Result<String, SchemeError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(SchemeError::InvalidProfile(format!(
            "field `{key}` must be a scalar"
        ))),
    }
}

/// One hit from the vector store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub source: Option<String>,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    pub title: String,
    pub category: String,
    pub description: String,
    pub eligibility: String,
    pub documents: Vec<String>,
    pub apply_link: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_recommended: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_profile() -> Value {
        json!({
            "fullName": "Asha",
            "age": "34",
            "gender": "Female",
            "occupation": "Farmer",
            "income": "Below 2.5 Lakh",
            "location": "Nashik",
            "casteCategory": "OBC",
            "disability": "No"
        })
    }

    #[test]
    fn parses_complete_profile() {
        let p = Profile::from_value(&full_profile()).unwrap();
        assert_eq!(p.age, "34");
        assert_eq!(p.caste_category, "OBC");
        assert_eq!(p.disability, "No");
    }

    #[test]
    fn numeric_age_is_rendered_as_text() {
        let mut v = full_profile();
        v["age"] = json!(61);
        assert_eq!(Profile::from_value(&v).unwrap().age, "61");
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        for key in REQUIRED_PROFILE_KEYS {
            let mut v = full_profile();
            v.as_object_mut().unwrap().remove(key);
            match Profile::from_value(&v) {
                Err(SchemeError::MissingProfileField(k)) => assert_eq!(k, key),
                other => panic!("expected missing {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn key_names_are_case_sensitive() {
        let mut v = full_profile();
        let obj = v.as_object_mut().unwrap();
        let caste = obj.remove("casteCategory").unwrap();
        obj.insert("castecategory".into(), caste);
        assert!(matches!(
            Profile::from_value(&v),
            Err(SchemeError::MissingProfileField("casteCategory"))
        ));
    }

    #[test]
    fn rejects_non_object_and_nested_values() {
        assert!(matches!(
            Profile::from_value(&json!(["age"])),
            Err(SchemeError::InvalidProfile(_))
        ));
        let mut v = full_profile();
        v["location"] = json!({"city": "Pune"});
        assert!(matches!(
            Profile::from_value(&v),
            Err(SchemeError::InvalidProfile(_))
        ));
    }

    #[test]
    fn scheme_serializes_with_camel_case_keys() {
        let scheme = Scheme {
            id: Some(1),
            title: "PMAY".into(),
            category: "Housing".into(),
            description: "d".into(),
            eligibility: "e".into(),
            documents: vec!["Aadhaar".into()],
            apply_link: "https://pmay-urban.gov.in".into(),
            source: "Government Portal".into(),
            confidence: Some(0.88),
            why_recommended: Some("low income".into()),
        };
        let v = serde_json::to_value(&scheme).unwrap();
        assert_eq!(v["applyLink"], "https://pmay-urban.gov.in");
        assert_eq!(v["whyRecommended"], "low income");
        assert_eq!(v["id"], 1);
    }
}
