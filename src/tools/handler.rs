//! Tool dispatch
//!
//! Turns a tool name plus raw JSON arguments into a call on the catalog
//! client and renders the outcome as text. Failures never escape as Rust
//! errors: they become an error [`ToolOutput`] carrying the error kind and
//! its caller-facing summary.

use super::definitions::{FILTER_CARDS, GET_CARD, GET_RANDOM_CARDS, GET_SETS, SEARCH_CARDS};
use super::format;
use crate::api::transport::{HttpTransport, Transport};
use crate::api::validators::FilterArgs;
use crate::api::CatalogClient;
use crate::error::ClassifiedError;
use serde_json::{Map, Value};

/// Textual result of one tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    fn classified(err: &ClassifiedError) -> Self {
        Self::error(format!("Error ({}): {}", err.kind(), err))
    }
}

/// Dispatches tool calls to a [`CatalogClient`]
#[derive(Debug)]
pub struct ToolHandler<T: Transport = HttpTransport> {
    client: CatalogClient<T>,
}

impl<T: Transport> ToolHandler<T> {
    pub fn new(client: CatalogClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CatalogClient<T> {
        &self.client
    }

    /// Run the named tool
    pub async fn call(&self, name: &str, arguments: Value) -> ToolOutput {
        tracing::debug!(tool = name, "handling tool call");

        let result = match name {
            SEARCH_CARDS => self.search_cards(&arguments).await,
            GET_CARD => self.get_card(&arguments).await,
            FILTER_CARDS => self.filter_cards(&arguments).await,
            GET_SETS => self.get_sets(&arguments).await,
            GET_RANDOM_CARDS => self.get_random_cards(&arguments).await,
            _ => {
                tracing::warn!(tool = name, "unknown tool requested");
                return ToolOutput::error(format!("Unknown tool: {}", name));
            }
        };

        match result {
            Ok(text) => ToolOutput::success(text),
            Err(err) => ToolOutput::classified(&err),
        }
    }

    async fn search_cards(&self, arguments: &Value) -> Result<String, ClassifiedError> {
        let args = Args::new(arguments)?;
        let name = args.required_str("name")?;
        let limit = args.int("limit")?;

        let cards = self.client.search_cards(name, limit).await?;
        let name = name.trim();
        if cards.is_empty() {
            return Ok(format!("No cards found matching '{}'", name));
        }
        Ok(format::card_list(
            &format!("Found {} cards matching '{}':", cards.len(), name),
            &cards,
        ))
    }

    async fn get_card(&self, arguments: &Value) -> Result<String, ClassifiedError> {
        let args = Args::new(arguments)?;
        let card_id = args.required_str("card_id")?;

        let card = self.client.get_card(card_id).await?;
        Ok(format::card_detail(&card))
    }

    async fn filter_cards(&self, arguments: &Value) -> Result<String, ClassifiedError> {
        let args = Args::new(arguments)?;
        let filter = FilterArgs {
            colors: args.str_list("colors")?,
            type_line: args.str("type")?.map(str::to_string),
            cmc: args.int("cmc")?,
            set: args.str("set")?.map(str::to_string),
            rarity: args.str("rarity")?.map(str::to_string),
            limit: args.int("limit")?,
        };

        let cards = self.client.filter_cards(&filter).await?;
        if cards.is_empty() {
            return Ok("No cards found matching the specified filters".to_string());
        }
        Ok(format::card_list(
            &format!("Found {} cards matching the specified filters:", cards.len()),
            &cards,
        ))
    }

    async fn get_sets(&self, arguments: &Value) -> Result<String, ClassifiedError> {
        let args = Args::new(arguments)?;
        let set_code = args.str("set_code")?;
        let name = args.str("name")?;

        let sets = self.client.get_sets(set_code, name).await?;
        if sets.is_empty() {
            return Ok(match name.map(str::trim).filter(|n| !n.is_empty()) {
                Some(name) => format!("No sets found matching '{}'", name),
                None => "No sets found".to_string(),
            });
        }
        Ok(format::set_list(&format!("Found {} sets:", sets.len()), &sets))
    }

    async fn get_random_cards(&self, arguments: &Value) -> Result<String, ClassifiedError> {
        let args = Args::new(arguments)?;
        let count = args.int("count")?;

        let cards = self.client.get_random_cards(count).await?;
        if cards.is_empty() {
            return Ok("No cards found".to_string());
        }
        Ok(format::card_list(
            &format!("Drew {} random cards:", cards.len()),
            &cards,
        ))
    }
}

/// Typed access to a raw argument object
///
/// Absent and `null` fields are "not supplied"; a present field of the wrong
/// JSON type is a validation error naming it. Unknown fields are ignored.
struct Args<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Args<'a> {
    fn new(arguments: &'a Value) -> Result<Self, ClassifiedError> {
        match arguments {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            _ => Err(ClassifiedError::validation("arguments", "must be an object")),
        }
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(name))
            .filter(|value| !value.is_null())
    }

    fn str(&self, name: &str) -> Result<Option<&'a str>, ClassifiedError> {
        match self.field(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ClassifiedError::validation(name, "must be a string")),
        }
    }

    fn required_str(&self, name: &str) -> Result<&'a str, ClassifiedError> {
        self.str(name)?
            .ok_or_else(|| ClassifiedError::validation(name, "is required"))
    }

    fn int(&self, name: &str) -> Result<Option<i64>, ClassifiedError> {
        match self.field(name) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| ClassifiedError::validation(name, "must be an integer")),
            Some(_) => Err(ClassifiedError::validation(name, "must be an integer")),
        }
    }

    fn str_list(&self, name: &str) -> Result<Option<Vec<String>>, ClassifiedError> {
        match self.field(name) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(ClassifiedError::validation(name, "must be an array of strings")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(ClassifiedError::validation(name, "must be an array of strings")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_args_types() {
        let value = json!({"name": "Bolt", "limit": 5, "colors": ["R"], "extra": true, "cmc": null});
        let args = Args::new(&value).unwrap();

        assert_eq!(args.required_str("name").unwrap(), "Bolt");
        assert_eq!(args.int("limit").unwrap(), Some(5));
        assert_eq!(args.str_list("colors").unwrap(), Some(vec!["R".to_string()]));
        assert_eq!(args.int("cmc").unwrap(), None);
        assert_eq!(args.str("missing").unwrap(), None);
    }

    #[test]
    fn test_args_wrong_types_name_the_field() {
        let value = json!({"name": 3, "limit": "ten", "count": 2.5, "colors": "R"});
        let args = Args::new(&value).unwrap();

        assert_eq!(args.str("name").unwrap_err().field(), Some("name"));
        assert_eq!(args.int("limit").unwrap_err().field(), Some("limit"));
        assert_eq!(args.int("count").unwrap_err().field(), Some("count"));
        assert_eq!(args.str_list("colors").unwrap_err().field(), Some("colors"));
        assert_eq!(args.required_str("card_id").unwrap_err().field(), Some("card_id"));
    }

    #[test]
    fn test_args_must_be_object() {
        assert!(Args::new(&json!(null)).is_ok());
        assert_eq!(
            Args::new(&json!([1])).err().unwrap().field(),
            Some("arguments")
        );
    }

    #[test]
    fn test_classified_output() {
        let output = ToolOutput::classified(&ClassifiedError::validation("limit", "must be a positive integer"));
        assert!(output.is_error);
        assert_eq!(
            output.text,
            "Error (ValidationError): Invalid parameter 'limit': must be a positive integer"
        );
    }
}
