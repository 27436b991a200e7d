//! End-to-end convergence tests for the rabbitmq_user type against an
//! in-memory broker.

use anyhow::Result;
use rabbitmq_resources::{user_schema, UserResource};
use reconcile::{
    sync, Ensure, Provider, SyncSummary, Value, REDACTED_NEW, REDACTED_OLD,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
struct UserRecord {
    password: String,
    admin: String,
    tags: Vec<String>,
}

/// In-memory stand-in for a broker backend. Applies creates, updates, and
/// destroys to its own state so repeated sync passes behave like a live
/// system, and records every call for assertions.
#[derive(Default)]
struct MockBroker {
    users: Mutex<BTreeMap<String, UserRecord>>,
    calls: Mutex<Vec<String>>,
}

impl MockBroker {
    fn with_user(name: &str, password: &str, admin: &str, tags: &[&str]) -> Self {
        let broker = Self::default();
        broker.users.lock().unwrap().insert(
            name.to_string(),
            UserRecord {
                password: password.to_string(),
                admin: admin.to_string(),
                tags: tags.iter().map(ToString::to_string).collect(),
            },
        );
        broker
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn user(&self, name: &str) -> Option<UserRecord> {
        self.users.lock().unwrap().get(name).cloned()
    }
}

impl Provider for MockBroker {
    fn exists(&self, identity: &str) -> Result<bool> {
        self.record(format!("exists:{identity}"));
        Ok(self.users.lock().unwrap().contains_key(identity))
    }

    fn read(&self, identity: &str, property: &str) -> Result<Value> {
        self.record(format!("read:{identity}:{property}"));
        let users = self.users.lock().unwrap();
        let user = users
            .get(identity)
            .ok_or_else(|| anyhow::anyhow!("no such user: {identity}"))?;
        match property {
            "admin" => Ok(Value::from(user.admin.as_str())),
            "tags" => Ok(Value::List(user.tags.clone())),
            // Stored passwords are not readable in comparable form
            other => anyhow::bail!("unreadable property: {other}"),
        }
    }

    fn create(&self, identity: &str, desired: &BTreeMap<String, Value>) -> Result<()> {
        self.record(format!("create:{identity}"));
        let record = UserRecord {
            password: desired
                .get("password")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            admin: desired
                .get("admin")
                .and_then(|v| v.as_str())
                .unwrap_or("false")
                .to_string(),
            tags: desired
                .get("tags")
                .and_then(|v| v.as_list())
                .unwrap_or_default()
                .to_vec(),
        };
        self.users
            .lock()
            .unwrap()
            .insert(identity.to_string(), record);
        Ok(())
    }

    fn destroy(&self, identity: &str) -> Result<()> {
        self.record(format!("destroy:{identity}"));
        self.users.lock().unwrap().remove(identity);
        Ok(())
    }

    fn update(&self, identity: &str, property: &str, value: &Value) -> Result<()> {
        self.record(format!("update:{identity}:{property}"));
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(identity)
            .ok_or_else(|| anyhow::anyhow!("no such user: {identity}"))?;
        match property {
            "password" => user.password = value.as_str().unwrap_or_default().to_string(),
            "admin" => user.admin = value.as_str().unwrap_or_default().to_string(),
            "tags" => user.tags = value.as_list().unwrap_or_default().to_vec(),
            other => anyhow::bail!("unknown property: {other}"),
        }
        Ok(())
    }

    fn check_secret(&self, identity: &str, candidate: &str) -> Result<bool> {
        self.record(format!("check_secret:{identity}"));
        let users = self.users.lock().unwrap();
        let user = users
            .get(identity)
            .ok_or_else(|| anyhow::anyhow!("no such user: {identity}"))?;
        Ok(user.password == candidate)
    }
}

#[test]
fn absent_user_already_missing_is_noop() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .ensure(Ensure::Absent)
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::default();

    let reports = sync(&instance, &broker).unwrap();
    assert!(reports.is_empty());
    assert!(!broker.calls().iter().any(|c| c.starts_with("destroy")));
}

#[test]
fn create_coerces_admin_and_applies_full_mapping() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .admin(true)
        .password("bar")
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::default();

    let reports = sync(&instance, &broker).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_ensure());
    assert_eq!(reports[0].to_display, "present");

    let user = broker.user("dan").unwrap();
    assert_eq!(user.admin, "true");
    assert_eq!(user.password, "bar");
    assert!(user.tags.is_empty());

    // Create is terminal: no per-property calls in the same pass
    assert_eq!(broker.calls(), vec!["exists:dan", "create:dan"]);
}

#[test]
fn reordered_tags_are_in_sync() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .password("bar")
        .tags(["monitoring", "tag1"])
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::with_user("dan", "bar", "false", &["tag1", "monitoring"]);

    let reports = sync(&instance, &broker).unwrap();
    assert!(reports.is_empty());
    assert!(!broker.calls().iter().any(|c| c.starts_with("update")));
}

#[test]
fn differing_tags_are_updated() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .password("bar")
        .tags(["monitoring", "tag1"])
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::with_user("dan", "bar", "false", &["tag1", "other"]);

    let reports = sync(&instance, &broker).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].property, "tags");
    assert_eq!(
        broker.user("dan").unwrap().tags,
        vec!["monitoring".to_string(), "tag1".to_string()]
    );
}

#[test]
fn stale_password_is_rotated_with_redacted_report() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .password("newpass")
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::with_user("dan", "oldpass", "false", &[]);

    let reports = sync(&instance, &broker).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].property, "password");
    assert_eq!(reports[0].from_display, REDACTED_OLD);
    assert_eq!(reports[0].to_display, REDACTED_NEW);
    let rendered = reports[0].to_string();
    assert!(!rendered.contains("oldpass"));
    assert!(!rendered.contains("newpass"));

    assert_eq!(broker.user("dan").unwrap().password, "newpass");
    // The password property verifies live, never reads back
    assert!(!broker.calls().iter().any(|c| c == "read:dan:password"));
}

#[test]
fn sync_is_idempotent() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .admin(true)
        .password("bar")
        .tags(["monitoring"])
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::default();

    let first = sync(&instance, &broker).unwrap();
    assert!(!first.is_empty());

    let second = sync(&instance, &broker).unwrap();
    assert!(second.is_empty());
}

#[test]
fn destroy_then_resync_is_idempotent() {
    let schema = user_schema().unwrap();
    let instance = UserResource::new("dan")
        .ensure(Ensure::Absent)
        .instance(&schema)
        .unwrap();
    let broker = MockBroker::with_user("dan", "bar", "false", &[]);

    let first = sync(&instance, &broker).unwrap();
    assert_eq!(first.len(), 1);
    assert!(broker.user("dan").is_none());

    let second = sync(&instance, &broker).unwrap();
    assert!(second.is_empty());
}

#[test]
fn summary_tallies_a_converged_run() {
    let schema = user_schema().unwrap();
    let broker = MockBroker::with_user("dan", "oldpass", "false", &[]);

    let dan = UserResource::new("dan")
        .password("newpass")
        .instance(&schema)
        .unwrap();
    let ghost = UserResource::new("ghost")
        .ensure(Ensure::Absent)
        .instance(&schema)
        .unwrap();
    let fresh = UserResource::new("fresh")
        .password("pw")
        .instance(&schema)
        .unwrap();

    let mut summary = SyncSummary::default();
    for instance in [&dan, &ghost, &fresh] {
        let reports = sync(instance, &broker).unwrap();
        summary.merge(&SyncSummary::from_reports(&reports));
    }

    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.total(), 2);
    assert!(summary.has_changes());
}
