//! Documentation block deserialization and schema validation.
//!
//! The DOCUMENTATION block is YAML; it is validated against a document
//! schema, and each entry of its `options` mapping against an option
//! schema. Every violation is collected -- nothing fails fast -- and each
//! one is reported as a dotted field path plus message.

use serde_yaml::{Mapping, Value};

/// Parsed DOCUMENTATION content with the accessors the version policy and
/// fragment resolution need.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDoc(pub Mapping);

impl ParsedDoc {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Mapping(map) => Some(ParsedDoc(map)),
            _ => None,
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(Value::String(key.to_string()))
    }

    /// The document version tag, stringified the way YAML scalars print
    /// (`2.3` the float and `"2.3"` the string are equivalent).
    pub fn version_added(&self) -> Option<String> {
        self.get("version_added").and_then(scalar_to_string)
    }

    pub fn options(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        if let Some(Value::Mapping(options)) = self.get("options") {
            for (key, value) in options {
                if let Value::String(name) = key {
                    out.push((name.clone(), value));
                }
            }
        }
        out
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options().iter().any(|(n, _)| n == name)
    }

    /// The referenced documentation fragment, if any.
    pub fn extends_fragment(&self) -> Option<String> {
        match self.get("extends_documentation_fragment")? {
            Value::String(s) => Some(s.clone()),
            Value::Sequence(seq) => seq.first().and_then(scalar_to_string),
            _ => None,
        }
    }

    /// version_added of one option entry, if present.
    pub fn option_version_added(option: &Value) -> Option<String> {
        match option {
            Value::Mapping(map) => map
                .get(Value::String("version_added".to_string()))
                .and_then(scalar_to_string),
            _ => None,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A YAML parse failure annotated with its position in the module source.
#[derive(Debug, Clone)]
pub struct YamlBlockError {
    /// Report error, e.g. "DOCUMENTATION is not valid YAML. Line 12 column 3".
    pub message: String,
    /// Raw diagnostic detail for the trace.
    pub trace: String,
}

/// Parse a doc block as YAML, offsetting any error location by the line the
/// block starts on so the position points into the module source.
pub fn parse_yaml_block(
    text: &str,
    block_lineno: usize,
    label: &str,
    object_name: &str,
) -> Result<Value, YamlBlockError> {
    match serde_yaml::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => {
            let (line, column) = match err.location() {
                Some(loc) => (loc.line() + block_lineno.saturating_sub(1), loc.column()),
                None => (block_lineno, 1),
            };
            Err(YamlBlockError {
                message: format!("{} is not valid YAML. Line {} column {}", label, line, column),
                trace: format!("{}.{}: {}", object_name, label, err),
            })
        }
    }
}

/// One schema violation: a dotted path into the document plus a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: &[&str], message: &str) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            message: message.to_string(),
        }
    }

    /// Render as a report error, rooted at the DOCUMENTATION block.
    pub fn to_error(&self) -> String {
        format!("DOCUMENTATION.{}: {}", self.path.join("."), self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Str,
    StrOrList,
    Bool,
    List,
    ListOfStr,
    Mapping,
    Version,
    Any,
}

fn type_matches(expected: FieldType, value: &Value) -> bool {
    match expected {
        FieldType::Str => value.is_string(),
        FieldType::StrOrList => match value {
            Value::String(_) => true,
            Value::Sequence(seq) => seq.iter().all(Value::is_string),
            _ => false,
        },
        FieldType::Bool => value.is_bool(),
        FieldType::List => value.is_sequence(),
        FieldType::ListOfStr => match value {
            Value::Sequence(seq) => seq.iter().all(Value::is_string),
            _ => false,
        },
        FieldType::Mapping => value.is_mapping(),
        FieldType::Version => matches!(value, Value::String(_) | Value::Number(_)),
        FieldType::Any => true,
    }
}

fn type_message(expected: FieldType) -> &'static str {
    match expected {
        FieldType::Str => "expected a string",
        FieldType::StrOrList => "expected a string or list of strings",
        FieldType::Bool => "expected a bool",
        FieldType::List => "expected a list",
        FieldType::ListOfStr => "expected a list of strings",
        FieldType::Mapping => "expected a mapping",
        FieldType::Version => "expected a version string",
        FieldType::Any => "unexpected value",
    }
}

struct FieldSpec {
    name: &'static str,
    required: bool,
    field_type: FieldType,
}

const fn required(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        required: true,
        field_type,
    }
}

const fn optional(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
        field_type,
    }
}

/// Document-level schema.
static DOC_SCHEMA: &[FieldSpec] = &[
    required("module", FieldType::Str),
    required("short_description", FieldType::Str),
    required("description", FieldType::StrOrList),
    optional("author", FieldType::StrOrList),
    optional("version_added", FieldType::Version),
    optional("options", FieldType::Mapping),
    optional("notes", FieldType::StrOrList),
    optional("requirements", FieldType::StrOrList),
    optional("extends_documentation_fragment", FieldType::StrOrList),
];

/// Option-level schema.
static OPTION_SCHEMA: &[FieldSpec] = &[
    required("description", FieldType::StrOrList),
    optional("required", FieldType::Bool),
    optional("default", FieldType::Any),
    optional("type", FieldType::Str),
    optional("choices", FieldType::List),
    optional("aliases", FieldType::ListOfStr),
    optional("version_added", FieldType::Version),
];

fn validate_mapping(map: &Mapping, schema: &[FieldSpec], prefix: &[&str]) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    for spec in schema {
        let key = Value::String(spec.name.to_string());
        match map.get(&key) {
            None => {
                if spec.required {
                    let mut path = prefix.to_vec();
                    path.push(spec.name);
                    violations.push(SchemaViolation::new(&path, "required field missing"));
                }
            }
            Some(value) => {
                if !type_matches(spec.field_type, value) {
                    let mut path = prefix.to_vec();
                    path.push(spec.name);
                    violations.push(SchemaViolation::new(&path, type_message(spec.field_type)));
                }
            }
        }
    }

    for key in map.keys() {
        let name = match key {
            Value::String(s) => s.as_str(),
            _ => {
                violations.push(SchemaViolation::new(prefix, "field names must be strings"));
                continue;
            }
        };
        if !schema.iter().any(|spec| spec.name == name) {
            let mut path = prefix.to_vec();
            path.push(name);
            violations.push(SchemaViolation::new(&path, "extra keys not allowed"));
        }
    }

    violations
}

/// Validate the whole document: top-level fields against the document
/// schema, then every option entry against the option schema. All
/// violations are collected; none stop the others.
pub fn validate_documentation(doc: &ParsedDoc) -> Vec<SchemaViolation> {
    let mut violations = validate_mapping(&doc.0, DOC_SCHEMA, &[]);

    for (name, value) in doc.options() {
        match value {
            Value::Mapping(option) => {
                violations.extend(validate_mapping(option, OPTION_SCHEMA, &["options", &name]));
            }
            _ => {
                violations.push(SchemaViolation::new(
                    &["options", &name],
                    "expected a mapping",
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_from(yaml: &str) -> ParsedDoc {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        ParsedDoc::from_value(value).unwrap()
    }

    const VALID_DOC: &str = "\
module: ping
short_description: Try to connect to host and return pong
description:
    - A trivial test module.
version_added: '2.3'
options:
    data:
        description:
            - Data to return.
        required: false
        default: pong
";

    #[test]
    fn test_valid_document_passes() {
        let doc = doc_from(VALID_DOC);
        let violations = validate_documentation(&doc);
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_missing_required_fields() {
        let doc = doc_from("module: ping\n");
        let violations = validate_documentation(&doc);
        let errors: Vec<String> = violations.iter().map(|v| v.to_error()).collect();
        assert!(errors.contains(&"DOCUMENTATION.short_description: required field missing".to_string()));
        assert!(errors.contains(&"DOCUMENTATION.description: required field missing".to_string()));
    }

    #[test]
    fn test_option_violations_carry_dotted_paths() {
        let doc = doc_from(
            "\
module: ping
short_description: s
description: d
options:
    data:
        required: maybe
    other: just a string
",
        );
        let errors: Vec<String> = validate_documentation(&doc)
            .iter()
            .map(|v| v.to_error())
            .collect();
        assert!(errors.contains(&"DOCUMENTATION.options.data.description: required field missing".to_string()));
        assert!(errors.contains(&"DOCUMENTATION.options.data.required: expected a bool".to_string()));
        assert!(errors.contains(&"DOCUMENTATION.options.other: expected a mapping".to_string()));
    }

    #[test]
    fn test_unknown_keys_rejected_everywhere() {
        let doc = doc_from(
            "\
module: ping
short_description: s
description: d
bogus: 1
options:
    data:
        description: d
        surprise: true
",
        );
        let errors: Vec<String> = validate_documentation(&doc)
            .iter()
            .map(|v| v.to_error())
            .collect();
        assert!(errors.contains(&"DOCUMENTATION.bogus: extra keys not allowed".to_string()));
        assert!(errors.contains(&"DOCUMENTATION.options.data.surprise: extra keys not allowed".to_string()));
    }

    #[test]
    fn test_all_violations_collected() {
        let doc = doc_from("description: 1\n");
        let violations = validate_documentation(&doc);
        // missing module, missing short_description, bad description type
        assert!(violations.len() >= 3);
    }

    #[test]
    fn test_parse_yaml_block_offsets_location() {
        // Broken on its second line; block starts at module line 10, so the
        // reported line is 11.
        let err = parse_yaml_block("ok: 1\n  bad indent: [\n", 10, "DOCUMENTATION", "ping")
            .unwrap_err();
        assert!(
            err.message.starts_with("DOCUMENTATION is not valid YAML. Line 11"),
            "got {:?}",
            err.message
        );
        assert!(err.trace.starts_with("ping.DOCUMENTATION:"));
    }

    #[test]
    fn test_version_added_accessors() {
        let doc = doc_from("module: m\nshort_description: s\ndescription: d\nversion_added: 2.3\n");
        // YAML float stringifies to the same two-component form
        assert_eq!(doc.version_added().as_deref(), Some("2.3"));

        let doc = doc_from(VALID_DOC);
        assert_eq!(doc.version_added().as_deref(), Some("2.3"));
        assert!(doc.has_option("data"));
        assert!(!doc.has_option("missing"));
    }

    #[test]
    fn test_extends_fragment() {
        let doc = doc_from("module: m\nshort_description: s\ndescription: d\nextends_documentation_fragment: rax\n");
        assert_eq!(doc.extends_fragment().as_deref(), Some("rax"));
    }
}
