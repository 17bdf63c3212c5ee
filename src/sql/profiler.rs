//! Query profiler
//!
//! Times prepared statements and arbitrary callables while active and keeps
//! the resulting profiles for later inspection.

use std::backtrace::Backtrace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use serde::Serialize;

/// A statement that has been prepared and can be executed
pub trait PreparedStatement {
    type Output;
    type Error;

    /// SQL text the statement was prepared from
    fn query_string(&self) -> &str;

    fn execute(&mut self) -> Result<Self::Output, Self::Error>;
}

/// One timed execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// Query text, or the label passed to [`Profiler::call`]
    pub text: String,
    /// Elapsed wall-clock seconds
    pub time: f64,
    pub data: serde_json::Value,
    /// Captured stack, only when trace capture is enabled
    pub trace: Option<String>,
}

/// Retains query profiles
#[derive(Debug, Default)]
pub struct Profiler {
    active: AtomicBool,
    capture_trace: bool,
    profiles: Mutex<Vec<Profile>>,
}

impl Profiler {
    pub fn new(active: bool, capture_trace: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
            capture_trace,
            profiles: Mutex::new(Vec::new()),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub const fn captures_trace(&self) -> bool {
        self.capture_trace
    }

    /// Execute a statement, profiling it when active
    ///
    /// A failed execution is returned unchanged and records nothing.
    pub fn exec<S>(&self, stmt: &mut S, data: serde_json::Value) -> Result<S::Output, S::Error>
    where
        S: PreparedStatement,
    {
        if !self.is_active() {
            return stmt.execute();
        }

        let before = Instant::now();
        let result = stmt.execute()?;
        let elapsed = before.elapsed().as_secs_f64();
        self.add_profile(stmt.query_string(), elapsed, data);
        Ok(result)
    }

    /// Call a function, profiling it under `label` when active
    pub fn call<F, T>(&self, func: F, label: &str, data: serde_json::Value) -> T
    where
        F: FnOnce() -> T,
    {
        if !self.is_active() {
            return func();
        }

        let before = Instant::now();
        let result = func();
        let elapsed = before.elapsed().as_secs_f64();
        self.add_profile(label, elapsed, data);
        result
    }

    pub fn add_profile(&self, text: &str, time: f64, data: serde_json::Value) {
        let trace = self
            .capture_trace
            .then(|| Backtrace::force_capture().to_string());
        let profile = Profile {
            text: text.to_string(),
            time,
            data,
            trace,
        };
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(profile);
    }

    /// Snapshot of all recorded profiles, oldest first
    pub fn get_profiles(&self) -> Vec<Profile> {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FakeStatement {
        sql: &'static str,
        executions: usize,
        fail: bool,
    }

    impl FakeStatement {
        const fn new(sql: &'static str) -> Self {
            Self {
                sql,
                executions: 0,
                fail: false,
            }
        }
    }

    impl PreparedStatement for FakeStatement {
        type Output = bool;
        type Error = String;

        fn query_string(&self) -> &str {
            self.sql
        }

        fn execute(&mut self) -> Result<bool, String> {
            self.executions += 1;
            if self.fail {
                Err("syntax error".to_string())
            } else {
                Ok(true)
            }
        }
    }

    #[test]
    fn test_inactive_exec_records_nothing() {
        let profiler = Profiler::default();
        let mut stmt = FakeStatement::new("SELECT 1");

        assert!(!profiler.is_active());
        assert_eq!(profiler.exec(&mut stmt, json!([])), Ok(true));
        assert_eq!(stmt.executions, 1);
        assert!(profiler.get_profiles().is_empty());
    }

    #[test]
    fn test_active_exec_appends_profile() {
        let profiler = Profiler::new(true, false);
        let mut stmt = FakeStatement::new("SELECT * FROM posts WHERE id = ?");

        profiler.exec(&mut stmt, json!([5])).unwrap();
        profiler.exec(&mut stmt, json!([6])).unwrap();

        let profiles = profiler.get_profiles();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].text, "SELECT * FROM posts WHERE id = ?");
        assert_eq!(profiles[0].data, json!([5]));
        assert_eq!(profiles[1].data, json!([6]));
        assert!(profiles.iter().all(|p| p.time >= 0.0 && p.trace.is_none()));
    }

    #[test]
    fn test_exec_error_propagates() {
        let profiler = Profiler::new(true, false);
        let mut stmt = FakeStatement::new("SELEC");
        stmt.fail = true;

        assert_eq!(profiler.exec(&mut stmt, json!(null)), Err("syntax error".to_string()));
        assert!(profiler.get_profiles().is_empty());
    }

    #[test]
    fn test_call_toggling() {
        let profiler = Profiler::default();

        profiler.set_active(false);
        assert_eq!(profiler.call(|| 40 + 2, "label", json!(null)), 42);
        assert!(profiler.get_profiles().is_empty());

        profiler.set_active(true);
        assert_eq!(profiler.call(|| 40 + 2, "label", json!({"k": "v"})), 42);
        let profiles = profiler.get_profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].text, "label");
        assert_eq!(profiles[0].data, json!({"k": "v"}));
    }

    #[test]
    fn test_trace_capture_is_opt_in() {
        let profiler = Profiler::new(true, true);
        profiler.call(|| (), "traced", json!(null));
        let profiles = profiler.get_profiles();
        assert!(profiler.captures_trace());
        assert!(profiles[0].trace.is_some());
    }

    #[test]
    fn test_add_profile_serializes() {
        let profiler = Profiler::default();
        profiler.add_profile("manual", 0.5, json!({"rows": 3}));
        let value = serde_json::to_value(&profiler.get_profiles()[0]).unwrap();
        assert_eq!(
            value,
            json!({"text": "manual", "time": 0.5, "data": {"rows": 3}, "trace": null})
        );
    }
}
