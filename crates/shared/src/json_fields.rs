//! JSON field validation for JSONB-backed columns.
//!
//! Several columns in the registry schema hold free-form JSON (user
//! preferences, server capabilities, token permissions, ...). JSONB storage
//! enforces no structure, so these values are validated against compiled
//! JSON Schemas before they reach the database. Write paths reject invalid
//! values with a typed error; read paths degrade to a caller-supplied
//! fallback so malformed legacy rows never crash a query.

use std::collections::HashMap;

use jsonschema::{Draft, JSONSchema};
use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Database operation a validation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DbOperation {
    Insert,
    Update,
    Select,
}

/// JSONB columns guarded by this module.
///
/// Adding a variant forces a schema definition below; the registry is
/// exhaustive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonField {
    UserPreferences,
    ServerCapabilities,
    ToolParameters,
    TenantSettings,
    TokenPermissions,
    AuditMetadata,
}

impl JsonField {
    /// Every guarded field, in registry order.
    pub const ALL: [JsonField; 6] = [
        JsonField::UserPreferences,
        JsonField::ServerCapabilities,
        JsonField::ToolParameters,
        JsonField::TenantSettings,
        JsonField::TokenPermissions,
        JsonField::AuditMetadata,
    ];

    /// The column this field guards, as `table.column`.
    pub fn column_name(&self) -> &'static str {
        match self {
            JsonField::UserPreferences => "users.preferences",
            JsonField::ServerCapabilities => "servers.capabilities",
            JsonField::ToolParameters => "tools.parameters",
            JsonField::TenantSettings => "tenants.settings",
            JsonField::TokenPermissions => "api_tokens.permissions",
            JsonField::AuditMetadata => "audit_logs.metadata",
        }
    }

    /// Draft-07 schema definition for this field.
    fn schema_definition(&self) -> Value {
        match self {
            JsonField::UserPreferences => json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "theme": { "type": "string", "enum": ["light", "dark", "system"] },
                    "locale": { "type": "string" },
                    "timezone": { "type": "string" },
                    "notifications": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "email": { "type": "boolean" },
                            "webhook": { "type": "boolean" }
                        }
                    }
                }
            }),
            JsonField::ServerCapabilities => json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["protocol_version"],
                "properties": {
                    "protocol_version": { "type": "string" },
                    "tools": { "type": "boolean" },
                    "resources": { "type": "boolean" },
                    "prompts": { "type": "boolean" },
                    "sampling": { "type": "boolean" }
                }
            }),
            // Tool parameter blocks are themselves JSON Schemas authored by
            // server owners; structure beyond "is an object" is not ours to
            // enforce.
            JsonField::ToolParameters => json!({ "type": "object" }),
            JsonField::TenantSettings => json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "max_servers": { "type": "integer", "minimum": 0 },
                    "max_users": { "type": "integer", "minimum": 0 },
                    "features": { "type": "array", "items": { "type": "string" } }
                }
            }),
            JsonField::TokenPermissions => json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["scopes"],
                "properties": {
                    "scopes": { "type": "array", "items": { "type": "string" } },
                    "expires_in": { "type": "integer", "minimum": 0 }
                }
            }),
            JsonField::AuditMetadata => json!({ "type": "object" }),
        }
    }

    /// Property names the schema declares, used by sanitization.
    fn declared_properties(&self) -> Vec<String> {
        match self.schema_definition().get("properties") {
            Some(Value::Object(props)) => props.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

lazy_static! {
    /// Compiled validators, one per field. A schema that fails to compile
    /// is left out of the map and surfaces through `validate_schema_health`
    /// and as a validation error at use sites.
    static ref COMPILED_SCHEMAS: HashMap<JsonField, JSONSchema> = {
        let mut map = HashMap::new();
        for field in JsonField::ALL {
            match JSONSchema::options()
                .with_draft(Draft::Draft7)
                .compile(&field.schema_definition())
            {
                Ok(schema) => {
                    map.insert(field, schema);
                }
                Err(e) => {
                    warn!(field = field.column_name(), error = %e, "JSON schema failed to compile");
                }
            }
        }
        map
    };
}

/// Context a validation runs under, carried on every validation error.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationContext {
    pub operation: DbOperation,
    pub table: String,
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub batch_index: Option<usize>,
}

impl ValidationContext {
    pub fn new(operation: DbOperation, table: impl Into<String>) -> Self {
        Self {
            operation,
            table: table.into(),
            tenant_id: None,
            user_id: None,
            batch_index: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_batch_index(mut self, index: usize) -> Self {
        self.batch_index = Some(index);
        self
    }
}

/// Structural validation failure for a JSONB column.
#[derive(Debug, Clone, Error)]
#[error("JSON validation failed for '{field_name}' during {operation:?} on '{table}': {}", issues.join("; "))]
pub struct JsonValidationError {
    pub field: JsonField,
    pub field_name: &'static str,
    pub issues: Vec<String>,
    pub operation: DbOperation,
    pub table: String,
    pub batch_index: Option<usize>,
}

impl JsonValidationError {
    fn new(field: JsonField, issues: Vec<String>, context: &ValidationContext) -> Self {
        Self {
            field,
            field_name: field.column_name(),
            issues,
            operation: context.operation,
            table: context.table.clone(),
            batch_index: context.batch_index,
        }
    }
}

/// Validate a value destined for (or read from) a JSONB column.
pub fn validate_db_json_field(
    field: JsonField,
    value: &Value,
    context: &ValidationContext,
) -> Result<(), JsonValidationError> {
    let Some(schema) = COMPILED_SCHEMAS.get(&field) else {
        return Err(JsonValidationError::new(
            field,
            vec!["no schema compiled for this field".to_string()],
            context,
        ));
    };

    match schema.validate(value) {
        Ok(()) => Ok(()),
        Err(errors) => {
            let issues: Vec<String> = errors
                .map(|e| format!("'{}': {}", e.instance_path, e).replace('\n', " "))
                .collect();
            Err(JsonValidationError::new(field, issues, context))
        }
    }
}

/// Validate a value, falling back instead of erroring.
///
/// Read-time validation of relaxed legacy rows must not fail the query or
/// spam the logs, so only the insert path logs the rejection.
pub fn safe_validate_db_json_field(
    field: JsonField,
    value: &Value,
    fallback: Value,
    context: &ValidationContext,
) -> Value {
    match validate_db_json_field(field, value, context) {
        Ok(()) => value.clone(),
        Err(e) => {
            if context.operation == DbOperation::Insert {
                warn!(
                    field = field.column_name(),
                    table = %context.table,
                    issues = %e.issues.join("; "),
                    "Invalid JSON field replaced with fallback"
                );
            }
            fallback
        }
    }
}

/// Validate every mapped JSON field present on a record.
///
/// `fields` maps a record key to the guarded field it must satisfy. Keys
/// absent from the record are skipped; the first failing field aborts.
pub fn validate_db_json_fields(
    record: &Map<String, Value>,
    fields: &[(&str, JsonField)],
    context: &ValidationContext,
) -> Result<(), JsonValidationError> {
    for (key, field) in fields {
        if let Some(value) = record.get(*key) {
            validate_db_json_field(*field, value, context)?;
        }
    }
    Ok(())
}

/// Strip properties the schema does not declare from mapped JSON fields.
///
/// Defends against over-permissive client payloads. Returns the number of
/// properties removed. Fields whose schema declares no property list (free
/// form fields) are left untouched.
pub fn sanitize_json_fields(record: &mut Map<String, Value>, fields: &[(&str, JsonField)]) -> usize {
    let mut removed = 0;
    for (key, field) in fields {
        let declared = field.declared_properties();
        if declared.is_empty() {
            continue;
        }
        if let Some(Value::Object(obj)) = record.get_mut(*key) {
            let undeclared: Vec<String> = obj
                .keys()
                .filter(|k| !declared.iter().any(|d| d == *k))
                .cloned()
                .collect();
            for k in undeclared {
                obj.remove(&k);
                removed += 1;
            }
        }
    }
    removed
}

/// Validate a value about to be inserted into `table`.
pub fn validate_before_insert(
    field: JsonField,
    value: &Value,
    table: impl Into<String>,
) -> Result<(), JsonValidationError> {
    validate_db_json_field(field, value, &ValidationContext::new(DbOperation::Insert, table))
}

/// Validate a value about to be written over an existing row in `table`.
pub fn validate_before_update(
    field: JsonField,
    value: &Value,
    table: impl Into<String>,
) -> Result<(), JsonValidationError> {
    validate_db_json_field(field, value, &ValidationContext::new(DbOperation::Update, table))
}

/// Validate a batch of values for one field.
///
/// The first failure is returned with its batch index set, so a caller can
/// point at the offending record in a bulk insert without re-validating the
/// whole batch.
pub fn validate_batch_data(
    field: JsonField,
    records: &[Value],
    context: &ValidationContext,
) -> Result<(), JsonValidationError> {
    for (index, value) in records.iter().enumerate() {
        let indexed = context.clone().with_batch_index(index);
        validate_db_json_field(field, value, &indexed)?;
    }
    Ok(())
}

/// Outcome of the registry self-check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaHealthReport {
    pub registered: usize,
    /// Fields whose schema accepts an empty object.
    pub accepts_empty_object: Vec<&'static str>,
    /// Fields whose schema requires specific properties (expected for
    /// strict fields; an empty object failing here is not a defect).
    pub requires_properties: Vec<&'static str>,
    /// Fields with no compiled schema. Always a real gap.
    pub missing_schema: Vec<&'static str>,
}

impl SchemaHealthReport {
    pub fn is_healthy(&self) -> bool {
        self.missing_schema.is_empty()
    }
}

/// Parse an empty object against every registered schema and bucket the
/// results. A diagnostic, not a runtime guard.
pub fn validate_schema_health() -> SchemaHealthReport {
    let mut accepts_empty_object = Vec::new();
    let mut requires_properties = Vec::new();
    let mut missing_schema = Vec::new();

    let empty = json!({});
    for field in JsonField::ALL {
        match COMPILED_SCHEMAS.get(&field) {
            None => missing_schema.push(field.column_name()),
            Some(schema) => {
                if schema.is_valid(&empty) {
                    accepts_empty_object.push(field.column_name());
                } else {
                    requires_properties.push(field.column_name());
                }
            }
        }
    }

    SchemaHealthReport {
        registered: COMPILED_SCHEMAS.len(),
        accepts_empty_object,
        requires_properties,
        missing_schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_context() -> ValidationContext {
        ValidationContext::new(DbOperation::Insert, "users")
    }

    #[test]
    fn test_valid_preferences_accepted() {
        let value = json!({ "theme": "dark", "locale": "en-US" });
        assert!(
            validate_db_json_field(JsonField::UserPreferences, &value, &insert_context()).is_ok()
        );
    }

    #[test]
    fn test_strict_field_rejects_undeclared_property() {
        let value = json!({ "unexpectedField": 1 });
        let err = validate_db_json_field(JsonField::UserPreferences, &value, &insert_context())
            .unwrap_err();
        assert_eq!(err.field_name, "users.preferences");
        assert!(!err.issues.is_empty());
    }

    #[test]
    fn test_strict_field_rejects_wrong_type() {
        let value = json!({ "theme": "sepia" });
        let err = validate_db_json_field(JsonField::UserPreferences, &value, &insert_context())
            .unwrap_err();
        assert_eq!(err.field, JsonField::UserPreferences);
    }

    #[test]
    fn test_required_property_enforced() {
        // Capabilities without protocol_version must fail.
        let value = json!({ "tools": true });
        assert!(validate_db_json_field(
            JsonField::ServerCapabilities,
            &value,
            &ValidationContext::new(DbOperation::Insert, "servers"),
        )
        .is_err());

        let value = json!({ "protocol_version": "2025-06-18", "tools": true });
        assert!(validate_db_json_field(
            JsonField::ServerCapabilities,
            &value,
            &ValidationContext::new(DbOperation::Insert, "servers"),
        )
        .is_ok());
    }

    #[test]
    fn test_free_form_field_accepts_anything_object() {
        let value = json!({ "whatever": { "nested": [1, 2, 3] } });
        assert!(validate_db_json_field(
            JsonField::AuditMetadata,
            &value,
            &ValidationContext::new(DbOperation::Insert, "audit_logs"),
        )
        .is_ok());
    }

    #[test]
    fn test_non_object_rejected() {
        let value = json!("not an object");
        assert!(validate_db_json_field(
            JsonField::ToolParameters,
            &value,
            &ValidationContext::new(DbOperation::Insert, "tools"),
        )
        .is_err());
    }

    #[test]
    fn test_safe_validate_returns_value_when_valid() {
        let value = json!({ "theme": "light" });
        let result = safe_validate_db_json_field(
            JsonField::UserPreferences,
            &value,
            json!({}),
            &ValidationContext::new(DbOperation::Select, "users"),
        );
        assert_eq!(result, value);
    }

    #[test]
    fn test_safe_validate_returns_fallback_when_invalid() {
        let value = json!({ "bogus": true });
        let result = safe_validate_db_json_field(
            JsonField::UserPreferences,
            &value,
            json!({}),
            &ValidationContext::new(DbOperation::Select, "users"),
        );
        assert_eq!(result, json!({}));
    }

    #[test]
    fn test_validate_record_fields() {
        let mut record = Map::new();
        record.insert("preferences".to_string(), json!({ "theme": "dark" }));
        record.insert("metadata".to_string(), json!({ "source": "import" }));

        let fields = [
            ("preferences", JsonField::UserPreferences),
            ("metadata", JsonField::AuditMetadata),
        ];
        assert!(validate_db_json_fields(&record, &fields, &insert_context()).is_ok());

        record.insert("preferences".to_string(), json!({ "nope": 1 }));
        assert!(validate_db_json_fields(&record, &fields, &insert_context()).is_err());
    }

    #[test]
    fn test_validate_record_skips_absent_keys() {
        let record = Map::new();
        let fields = [("preferences", JsonField::UserPreferences)];
        assert!(validate_db_json_fields(&record, &fields, &insert_context()).is_ok());
    }

    #[test]
    fn test_sanitize_strips_undeclared_properties() {
        let mut record = Map::new();
        record.insert(
            "preferences".to_string(),
            json!({ "theme": "dark", "injected": "payload" }),
        );

        let fields = [("preferences", JsonField::UserPreferences)];
        let removed = sanitize_json_fields(&mut record, &fields);

        assert_eq!(removed, 1);
        assert_eq!(record["preferences"], json!({ "theme": "dark" }));
    }

    #[test]
    fn test_sanitize_leaves_free_form_fields_alone() {
        let mut record = Map::new();
        record.insert("metadata".to_string(), json!({ "anything": "goes" }));

        let fields = [("metadata", JsonField::AuditMetadata)];
        assert_eq!(sanitize_json_fields(&mut record, &fields), 0);
        assert_eq!(record["metadata"], json!({ "anything": "goes" }));
    }

    #[test]
    fn test_validate_before_insert_and_update() {
        let value = json!({ "scopes": ["registry:read"] });
        assert!(validate_before_insert(JsonField::TokenPermissions, &value, "api_tokens").is_ok());
        assert!(validate_before_update(JsonField::TokenPermissions, &value, "api_tokens").is_ok());

        let invalid = json!({});
        let err =
            validate_before_insert(JsonField::TokenPermissions, &invalid, "api_tokens").unwrap_err();
        assert_eq!(err.operation, DbOperation::Insert);
    }

    #[test]
    fn test_batch_error_carries_index() {
        let records = vec![
            json!({ "theme": "dark" }),
            json!({ "bad": true }),
            json!({ "theme": "light" }),
        ];
        let err = validate_batch_data(JsonField::UserPreferences, &records, &insert_context())
            .unwrap_err();
        assert_eq!(err.batch_index, Some(1));
        assert_eq!(err.field_name, "users.preferences");
    }

    #[test]
    fn test_batch_all_valid() {
        let records = vec![json!({}), json!({ "theme": "system" })];
        assert!(
            validate_batch_data(JsonField::UserPreferences, &records, &insert_context()).is_ok()
        );
    }

    #[test]
    fn test_schema_health_report() {
        let report = validate_schema_health();
        assert!(report.is_healthy());
        assert_eq!(report.registered, JsonField::ALL.len());
        // Strict fields with required properties land in the expected bucket.
        assert!(report
            .requires_properties
            .contains(&"servers.capabilities"));
        assert!(report
            .requires_properties
            .contains(&"api_tokens.permissions"));
        assert!(report.accepts_empty_object.contains(&"users.preferences"));
        assert!(report.missing_schema.is_empty());
    }

    #[test]
    fn test_error_display_names_field() {
        let err = validate_db_json_field(
            JsonField::UserPreferences,
            &json!({ "x": 1 }),
            &insert_context(),
        )
        .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("users.preferences"));
        assert!(rendered.contains("Insert"));
    }
}
