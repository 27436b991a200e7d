//! rabbitmq_user resource type - broker users as desired state
//!
//! Declares the schema for managing RabbitMQ users: identity, password
//! (verified live, never compared to a stored value), the admin flag, and
//! additional tags. The administrator capability is expressed through the
//! dedicated `admin` property; the raw "administrator" tag is reserved.

use reconcile::{
    Ensure, InsyncRule, PropertyDeclaration, ResourceInstance, ResourceTypeSchema, SchemaError,
    Value, ValidationError, ENSURE_ATTR,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// The tag spelling reserved in favor of the admin property
pub const RESERVED_ADMIN_TAG: &str = "administrator";

/// The service this resource type implicitly depends on
pub const BROKER_SERVICE: &str = "rabbitmq-server";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+$").expect("tag pattern compiles"));
static ADMIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(true|false)$").expect("admin pattern compiles"));

fn validate_password(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some(_) => Ok(()),
        None => Err("password must be a string".to_string()),
    }
}

/// Accepts the literal strings "true"/"false" and programmatic booleans
/// (which stringify to exactly those). Other truthy spellings are
/// rejected, matching the historical restriction.
fn validate_admin(value: &Value) -> Result<(), String> {
    if ADMIN_RE.is_match(&value.canonical()) {
        Ok(())
    } else {
        Err(format!("expected true or false, got {value}"))
    }
}

fn munge_admin(value: &Value) -> Value {
    Value::String(value.canonical())
}

fn validate_tags(value: &Value) -> Result<(), String> {
    let Some(tags) = value.as_list() else {
        return Err("tags must be a list of strings".to_string());
    };
    for tag in tags {
        if !TAG_RE.is_match(tag) {
            return Err(format!("invalid tag: {tag:?}"));
        }
        if tag == RESERVED_ADMIN_TAG {
            return Err("must use admin property instead of administrator tag".to_string());
        }
    }
    Ok(())
}

/// Build the rabbitmq_user schema.
///
/// Property order is the convergence order: password first (verified via
/// a live check each run), then the admin flag, then tags.
pub fn user_schema() -> Result<ResourceTypeSchema, SchemaError> {
    let mut schema = ResourceTypeSchema::new("rabbitmq_user", "name");

    schema.register(
        PropertyDeclaration::scalar("password")
            .required()
            .redacted()
            .with_validate(validate_password)
            .with_insync(InsyncRule::SecretCheck),
    )?;

    schema.register(
        PropertyDeclaration::scalar("admin")
            .with_validate(validate_admin)
            .with_munge(munge_admin)
            .with_default(Value::from("false")),
    )?;

    schema.register(
        PropertyDeclaration::list("tags")
            .with_validate(validate_tags)
            .with_default(Value::List(Vec::new()))
            .with_insync(InsyncRule::UnorderedList),
    )?;

    // The broker must be up before any user can be managed
    schema.require("service", BROKER_SERVICE);

    Ok(schema)
}

/// Convenience builder for declaring a user programmatically
#[derive(Debug, Clone)]
pub struct UserResource {
    name: String,
    ensure: Ensure,
    password: Option<String>,
    admin: Option<bool>,
    tags: Option<Vec<String>>,
}

impl UserResource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ensure: Ensure::Present,
            password: None,
            admin: None,
            tags: None,
        }
    }

    pub fn ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = ensure;
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// The raw attribute map, as a user declaration would supply it
    pub fn attrs(&self) -> BTreeMap<String, Value> {
        let mut attrs = BTreeMap::new();
        attrs.insert("name".to_string(), Value::from(self.name.as_str()));
        attrs.insert(ENSURE_ATTR.to_string(), Value::from(self.ensure.to_string()));
        if let Some(password) = &self.password {
            attrs.insert("password".to_string(), Value::from(password.as_str()));
        }
        if let Some(admin) = self.admin {
            attrs.insert("admin".to_string(), Value::Bool(admin));
        }
        if let Some(tags) = &self.tags {
            attrs.insert("tags".to_string(), Value::List(tags.clone()));
        }
        attrs
    }

    /// Validate and build the desired-state instance
    pub fn instance<'a>(
        &self,
        schema: &'a ResourceTypeSchema,
    ) -> Result<ResourceInstance<'a>, ValidationError> {
        ResourceInstance::build(schema, self.attrs())
    }
}
