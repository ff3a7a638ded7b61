use serde::{Deserialize, Deserializer};

use crate::pagination::Page;

// `?page=` values that are not integers fall back to the first page
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<Page, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(Page::new)
        .unwrap_or_default())
}

// numeric search terms are searched for by their decimal form
pub fn deserialize_search_term<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<NumberOrString>::deserialize(deserializer)?.map(|term| match term {
            NumberOrString::Number(v) => v.to_string(),
            NumberOrString::String(value) => value,
        }),
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    String(String),
}

// front ends post ids either as numbers or as the string value of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "NumberOrString")]
pub struct LenientI64(pub i64);

impl TryFrom<NumberOrString> for LenientI64 {
    type Error = String;

    fn try_from(value: NumberOrString) -> Result<Self, Self::Error> {
        match value {
            NumberOrString::Number(v) => Ok(LenientI64(v)),
            NumberOrString::String(value) => match value.trim().parse::<i64>() {
                Ok(v) => Ok(LenientI64(v)),
                Err(_) => Err(format!("Wrong value {value}, can not parse to i64")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PageQuery {
        #[serde(default, deserialize_with = "deserialize_page")]
        page: Page,
    }

    fn page(json: &str) -> i64 {
        serde_json::from_str::<PageQuery>(json).unwrap().page.number()
    }

    #[test]
    fn page_is_parsed_leniently() {
        assert_eq!(page(r#"{}"#), 1);
        assert_eq!(page(r#"{"page": "3"}"#), 3);
        assert_eq!(page(r#"{"page": "abc"}"#), 1);
        assert_eq!(page(r#"{"page": "-2"}"#), -2);
        assert_eq!(page(r#"{"page": null}"#), 1);
    }

    #[derive(Deserialize)]
    struct SearchBody {
        #[serde(default, deserialize_with = "deserialize_search_term")]
        term: Option<String>,
    }

    fn term(json: &str) -> Option<String> {
        serde_json::from_str::<SearchBody>(json).unwrap().term
    }

    #[test]
    fn search_term_from_numbers_and_strings() {
        assert_eq!(term(r#"{}"#), None);
        assert_eq!(term(r#"{"term": null}"#), None);
        assert_eq!(term(r#"{"term": "title"}"#).as_deref(), Some("title"));
        assert_eq!(term(r#"{"term": 5}"#).as_deref(), Some("5"));
        assert!(serde_json::from_str::<SearchBody>(r#"{"term": [1]}"#).is_err());
    }

    #[test]
    fn ids_from_numbers_and_strings() {
        let ids: Vec<LenientI64> = serde_json::from_str(r#"[4, "7", " 9 "]"#).unwrap();
        assert_eq!(ids, vec![LenientI64(4), LenientI64(7), LenientI64(9)]);

        assert!(serde_json::from_str::<Vec<LenientI64>>(r#"["seven"]"#).is_err());
        assert!(serde_json::from_str::<Vec<LenientI64>>(r#"[true]"#).is_err());
    }
}
