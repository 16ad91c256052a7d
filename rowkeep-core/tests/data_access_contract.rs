//! Public API contract tests driven through a scripted executor.
//!
//! These tests exercise the exported helpers the way an embedding
//! application would, without a database server.

use async_trait::async_trait;
use rowkeep_core::{
    DriverError, ExecResult, InsertStatus, Row, RowkeepError, SchemaDescriptor, SqlExecutor,
    SqlValue, Statement, bootstrap, ensure_table_exists, insert_row, read_rows,
};
use std::collections::HashSet;
use std::sync::Mutex;

/// A tiny in-memory `users` table with a unique `username`.
#[derive(Default)]
struct FakeUsers {
    databases: Mutex<HashSet<String>>,
    tables: Mutex<HashSet<String>>,
    rows: Mutex<Vec<(String, String)>>,
    log: Mutex<Vec<String>>,
}

impl FakeUsers {
    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn text(value: &SqlValue) -> String {
        match value {
            SqlValue::Text(text) => text.clone(),
            other => panic!("expected text parameter, got {:?}", other),
        }
    }
}

#[async_trait]
impl SqlExecutor for FakeUsers {
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, DriverError> {
        self.log.lock().unwrap().push(statement.sql.clone());

        if let Some(name) = statement.sql.strip_prefix("CREATE DATABASE ") {
            self.databases.lock().unwrap().insert(name.to_string());
        } else if let Some(rest) = statement.sql.strip_prefix("CREATE TABLE `") {
            let name = rest.split('`').next().unwrap_or_default();
            self.tables.lock().unwrap().insert(name.to_string());
        } else if statement.sql.starts_with("INSERT INTO `users`") {
            let username = Self::text(&statement.params[0]);
            let password = Self::text(&statement.params[1]);
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|(existing, _)| existing == &username) {
                return Err(DriverError::with_code(
                    1062,
                    format!("Duplicate entry '{}' for key 'users.username'", username),
                ));
            }
            rows.push((username, password));
            return Ok(ExecResult {
                rows_affected: 1,
                last_insert_id: rows.len() as u64,
            });
        }

        Ok(ExecResult::default())
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DriverError> {
        self.log.lock().unwrap().push(statement.sql.clone());

        if statement.sql.contains("INFORMATION_SCHEMA.SCHEMATA") {
            let name = format!("`{}`", Self::text(&statement.params[0]));
            let found = self.databases.lock().unwrap().contains(&name);
            return Ok(if found { vec![Row::new()] } else { Vec::new() });
        }
        if statement.sql.contains("INFORMATION_SCHEMA.TABLES") {
            let name = Self::text(&statement.params[1]);
            let found = self.tables.lock().unwrap().contains(&name);
            return Ok(if found { vec![Row::new()] } else { Vec::new() });
        }

        let username = Self::text(&statement.params[0]);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(existing, _)| existing == &username)
            .map(|(name, password)| {
                let mut row = Row::new();
                row.insert("username".to_string(), name.as_str().into());
                row.insert("password".to_string(), password.as_str().into());
                row
            })
            .collect())
    }
}

#[tokio::test]
async fn test_bootstrap_then_insert_and_read_back() {
    let db = FakeUsers::default();
    bootstrap(&db, "app", &SchemaDescriptor::default())
        .await
        .unwrap();

    let first = insert_row(
        &db,
        "users",
        &["username", "password"],
        &["alice".into(), "pw1".into()],
    )
    .await
    .unwrap();
    assert_eq!(first.status(), InsertStatus::Success);

    let second = insert_row(
        &db,
        "users",
        &["username", "password"],
        &["alice".into(), "pw2".into()],
    )
    .await
    .unwrap();
    assert_eq!(second.status(), InsertStatus::Duplicate);

    let rows = read_rows(&db, "users", "*", "username", "alice")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["password"], "pw1");
}

#[tokio::test]
async fn test_second_bootstrap_creates_nothing() {
    let db = FakeUsers::default();
    let schema = SchemaDescriptor::default();

    bootstrap(&db, "app", &schema).await.unwrap();
    let first_run = db.log().len();
    bootstrap(&db, "app", &schema).await.unwrap();

    let second_run: Vec<String> = db.log().split_off(first_run);
    assert!(
        second_run.iter().all(|sql| !sql.starts_with("CREATE")),
        "second bootstrap issued DDL: {:?}",
        second_run
    );
    // one database check, one USE, one check per table
    assert_eq!(second_run.len(), 2 + schema.tables.len());
}

#[tokio::test]
async fn test_read_without_match_is_empty() {
    let db = FakeUsers::default();

    let rows = read_rows(&db, "users", ["username"], "username", "nobody")
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(db.log().len(), 1);
}

#[tokio::test]
async fn test_validation_errors_send_no_statement() {
    let db = FakeUsers::default();

    let insert = insert_row(&db, "users", &["username"], &["a".into(), "b".into()]).await;
    let read = read_rows(&db, "users", "*", ["username", "password"], "alice").await;

    assert!(matches!(insert, Err(RowkeepError::Validation { .. })));
    assert!(matches!(read, Err(RowkeepError::Validation { .. })));
    assert!(db.log().is_empty());
}

#[tokio::test]
async fn test_hostile_identifiers_are_quoted() {
    let db = FakeUsers::default();

    let _ = read_rows(&db, "users`; DROP TABLE users; --", "*", "username", "x").await;

    assert_eq!(
        db.log(),
        vec!["SELECT * FROM `users``; DROP TABLE users; --` WHERE `username` = ?".to_string()]
    );
}

#[tokio::test]
async fn test_dotted_table_name_stays_idempotent() {
    let db = FakeUsers::default();

    ensure_table_exists(&db, "app", "audit.log", "id INT").await.unwrap();
    ensure_table_exists(&db, "app", "audit.log", "id INT").await.unwrap();

    let creates: Vec<String> = db
        .log()
        .into_iter()
        .filter(|sql| sql.starts_with("CREATE TABLE"))
        .collect();
    assert_eq!(creates, vec!["CREATE TABLE `audit.log` (id INT)".to_string()]);
}
