//! In-memory `SqlExecutor` double for unit tests.

use crate::executor::{DriverError, ExecResult, Row, SqlExecutor};
use crate::sql::Statement;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted reply for the next statement.
pub(crate) enum Reply {
    Rows(Vec<Row>),
    Exec(ExecResult),
    Fail(DriverError),
}

/// Records every statement and answers from a script.
///
/// When the script runs dry, `fetch_all` returns no rows and `execute`
/// reports one affected row.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    statements: Mutex<Vec<Statement>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub(crate) fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|s| s.sql).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    fn next_reply(&self, statement: &Statement) -> Option<Reply> {
        self.statements.lock().unwrap().push(statement.clone());
        self.replies.lock().unwrap().pop_front()
    }
}

/// A single-column row.
pub(crate) fn row(column: &str, value: &str) -> Row {
    let mut row = Row::new();
    row.insert(column.to_string(), value.into());
    row
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, DriverError> {
        match self.next_reply(statement) {
            Some(Reply::Exec(result)) => Ok(result),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Rows(_)) => panic!("scripted rows for execute: {}", statement.sql),
            None => Ok(ExecResult {
                rows_affected: 1,
                last_insert_id: 0,
            }),
        }
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DriverError> {
        match self.next_reply(statement) {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Exec(_)) => panic!("scripted exec result for fetch: {}", statement.sql),
            None => Ok(Vec::new()),
        }
    }
}
