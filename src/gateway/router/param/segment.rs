use std::sync::LazyLock;

use regex::Regex;

use super::value::{parse_datetime, Value};
use crate::{io::ConfigError, Result};

/// `{name}`, `{name:type}` or `{name:type:format}`; the format keeps any further colons.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{(?P<name>[^{}:]*)(?::(?P<kind>[^{}:]*))?(?::(?P<format>[^{}]*))?\}$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentType {
    String,
    Integer,
    Float,
    DateTime(Option<String>),
    /// Greedy capture of the remaining parts; only valid as the final segment.
    Path,
}

impl SegmentType {
    fn parse(segment: &str, kind: &str, format: Option<&str>) -> Result<Self> {
        let kind = match kind {
            "" | "str" | "string" => SegmentType::String,
            "int" | "integer" => SegmentType::Integer,
            "float" => SegmentType::Float,
            "datetime" => return Ok(SegmentType::DateTime(format.map(str::to_string))),
            "path" => SegmentType::Path,
            _ => {
                return Err(ConfigError::UnknownType {
                    segment: segment.to_string(),
                    kind: kind.to_string(),
                }
                .into())
            }
        };
        match format {
            Some(_) => Err(ConfigError::FormatNotSupported {
                segment: segment.to_string(),
                kind: format!("{kind:?}").to_lowercase(),
            }
            .into()),
            None => Ok(kind),
        }
    }

    fn convert(&self, part: &str) -> Option<Value> {
        match self {
            // An empty part never binds a string variable, so `//` is a miss.
            SegmentType::String => (!part.is_empty()).then(|| Value::Str(part.to_string())),
            SegmentType::Integer => part.parse().ok().map(Value::Int),
            SegmentType::Float => part.parse().ok().map(Value::Float),
            SegmentType::DateTime(format) => {
                parse_datetime(part, format.as_deref()).map(Value::DateTime)
            }
            SegmentType::Path => Some(Value::Path(part.to_string())),
        }
    }
}

/// One slash-delimited token of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    Variable { name: String, kind: SegmentType },
}

impl PathSegment {
    pub fn parse(segment: &str) -> Result<Self> {
        if !segment.contains(['{', '}']) {
            return Ok(PathSegment::Literal(segment.to_string()));
        }
        let captures = VARIABLE
            .captures(segment)
            .ok_or_else(|| ConfigError::UnbalancedBraces(segment.to_string()))?;
        let name = &captures["name"];
        if name.is_empty() {
            return Err(ConfigError::EmptyVariableName(segment.to_string()).into());
        }
        let kind = captures.name("kind").map_or("", |m| m.as_str());
        let format = captures.name("format").map(|m| m.as_str());
        Ok(PathSegment::Variable {
            name: name.to_string(),
            kind: SegmentType::parse(segment, kind, format)?,
        })
    }

    pub fn is_path(&self) -> bool {
        matches!(
            self,
            PathSegment::Variable {
                kind: SegmentType::Path,
                ..
            }
        )
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PathSegment::Variable { name, .. } => Some(name),
            PathSegment::Literal(_) => None,
        }
    }

    /// `Some(None)` for a matching literal, `Some(Some(value))` for a converted variable.
    pub(crate) fn matches(&self, part: &str) -> Option<Option<Value>> {
        match self {
            PathSegment::Literal(literal) => (literal == part).then_some(None),
            PathSegment::Variable { kind, .. } => kind.convert(part).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Error;

    fn variable(name: &str, kind: SegmentType) -> PathSegment {
        PathSegment::Variable {
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn parses_every_form() {
        assert_eq!(
            PathSegment::parse("items").unwrap(),
            PathSegment::Literal("items".to_string())
        );
        assert_eq!(
            PathSegment::parse("{id}").unwrap(),
            variable("id", SegmentType::String)
        );
        assert_eq!(
            PathSegment::parse("{id:int}").unwrap(),
            variable("id", SegmentType::Integer)
        );
        assert_eq!(
            PathSegment::parse("{ratio:float}").unwrap(),
            variable("ratio", SegmentType::Float)
        );
        assert_eq!(
            PathSegment::parse("{rest:path}").unwrap(),
            variable("rest", SegmentType::Path)
        );
        assert_eq!(
            PathSegment::parse("{at:datetime:%H:%M}").unwrap(),
            variable("at", SegmentType::DateTime(Some("%H:%M".to_string())))
        );
        assert_eq!(
            PathSegment::parse("{at:datetime}").unwrap(),
            variable("at", SegmentType::DateTime(None))
        );
    }

    #[test]
    fn rejects_bad_templates() {
        for segment in ["{id", "id}", "{a}{b}", "x{id}", "{}", "{:int}"] {
            assert!(
                matches!(PathSegment::parse(segment), Err(Error::Config(_))),
                "{segment} should be rejected"
            );
        }
        assert!(matches!(
            PathSegment::parse("{id:uuid}"),
            Err(Error::Config(ConfigError::UnknownType { .. }))
        ));
        assert!(matches!(
            PathSegment::parse("{id:int:%d}"),
            Err(Error::Config(ConfigError::FormatNotSupported { .. }))
        ));
    }

    #[test]
    fn conversion_failure_is_a_miss() {
        let id = PathSegment::parse("{id:int}").unwrap();
        assert_eq!(id.matches("42"), Some(Some(Value::Int(42))));
        assert_eq!(id.matches("abc"), None);
        let ratio = PathSegment::parse("{ratio:float}").unwrap();
        assert_eq!(ratio.matches("0.5"), Some(Some(Value::Float(0.5))));
        let literal = PathSegment::parse("items").unwrap();
        assert_eq!(literal.matches("items"), Some(None));
        assert_eq!(literal.matches("Items"), None);
        let name = PathSegment::parse("{name}").unwrap();
        assert_eq!(name.matches(""), None);
    }
}
