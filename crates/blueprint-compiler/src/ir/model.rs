//! Data model definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    #[serde(alias = "int")]
    Integer,
    Float,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "datetime")]
    Timestamp,
    Text,
}

impl FieldType {
    /// The blueprint spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::Text => "text",
        }
    }

    /// Whether values of this type are carried as Go strings.
    pub fn is_textual(self) -> bool {
        matches!(self, FieldType::String | FieldType::Text)
    }
}

/// Multiplicity of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    HasMany,
    BelongsTo,
    HasOne,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::HasMany => "hasMany",
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::HasOne => "hasOne",
        }
    }

    /// Whether the relation holds a collection of references.
    pub fn is_collection(self) -> bool {
        self == RelationKind::HasMany
    }
}

/// A relation descriptor, written `"<kind>:<target>"` in blueprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Relation {
    pub kind: RelationKind,
    pub target: String,
}

/// Error produced when a relation descriptor cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationParseError(pub String);

impl fmt::Display for RelationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid relation descriptor '{}', expected '<hasMany|belongsTo|hasOne>:<Model>'",
            self.0
        )
    }
}

impl std::error::Error for RelationParseError {}

impl FromStr for Relation {
    type Err = RelationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, target) = s
            .split_once(':')
            .ok_or_else(|| RelationParseError(s.to_string()))?;

        let kind = match kind.trim() {
            "hasMany" => RelationKind::HasMany,
            "belongsTo" => RelationKind::BelongsTo,
            "hasOne" => RelationKind::HasOne,
            _ => return Err(RelationParseError(s.to_string())),
        };

        let target = target.trim();
        if target.is_empty() {
            return Err(RelationParseError(s.to_string()));
        }

        Ok(Relation {
            kind,
            target: target.to_string(),
        })
    }
}

impl TryFrom<String> for Relation {
    type Error = RelationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Relation> for String {
    fn from(relation: Relation) -> Self {
        relation.to_string()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.target)
    }
}

/// A user-declared or injected entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,

    /// Routes for protected models sit behind the authentication gate.
    #[serde(default)]
    pub protected: bool,

    #[serde(default)]
    pub fields: BTreeMap<String, FieldType>,

    #[serde(default)]
    pub relations: BTreeMap<String, Relation>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protected: false,
            fields: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn field(mut self, name: impl Into<String>, typ: FieldType) -> Self {
        self.fields.insert(name.into(), typ);
        self
    }

    pub fn relation(mut self, name: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Self {
        self.relations.insert(
            name.into(),
            Relation {
                kind,
                target: target.into(),
            },
        );
        self
    }

    /// Case-insensitive name comparison used for model lookup.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Sorted union of field and relation names.
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .keys()
            .chain(self.relations.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parse() {
        let rel: Relation = "hasMany:posts".parse().unwrap();
        assert_eq!(rel.kind, RelationKind::HasMany);
        assert_eq!(rel.target, "posts");
        assert_eq!(rel.to_string(), "hasMany:posts");
    }

    #[test]
    fn test_relation_rejects_unknown_kind() {
        assert!("manyToMany:tags".parse::<Relation>().is_err());
        assert!("belongsTo".parse::<Relation>().is_err());
        assert!("belongsTo:".parse::<Relation>().is_err());
    }

    #[test]
    fn test_field_type_aliases() {
        let fields: BTreeMap<String, FieldType> =
            serde_json::from_str(r#"{"a": "int", "b": "bool", "c": "datetime", "d": "text"}"#).unwrap();
        assert_eq!(fields["a"], FieldType::Integer);
        assert_eq!(fields["b"], FieldType::Boolean);
        assert_eq!(fields["c"], FieldType::Timestamp);
        assert_eq!(fields["d"], FieldType::Text);
    }

    #[test]
    fn test_member_names_sorted() {
        let model = Model::new("post")
            .field("title", FieldType::String)
            .field("body", FieldType::Text)
            .relation("author_id", RelationKind::BelongsTo, "users");
        assert_eq!(model.member_names(), vec!["author_id", "body", "title"]);
    }
}
