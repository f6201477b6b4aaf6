// Kept in its own test binary: the panic hook is process-wide.

use recipe_costing::app_config::Environment;
use recipe_costing::error_tracking::{ErrorSink, ErrorTracker, MemoryErrorLog};
use serde_json::json;
use std::panic;
use std::sync::Arc;

#[test]
fn test_panics_are_tracked_as_uncaught() {
    let log = Arc::new(MemoryErrorLog::new(10));
    let tracker = ErrorTracker::new(log.clone(), Environment::Production);
    tracker.install_panic_hook();

    let result = panic::catch_unwind(|| panic!("oven thermostat failed"));
    let _ = panic::take_hook();

    assert!(result.is_err());
    let entries = log.recent(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].code, "UNCAUGHT_ERROR");
    assert_eq!(entries[0].status_code, 500);
    assert_eq!(entries[0].context, "global-panic");
    assert!(entries[0].message.starts_with("oven thermostat failed at "));
    assert_eq!(entries[0].details, Some(json!({ "source": "panic" })));
    assert_eq!(entries[0].environment.as_deref(), Some("production"));
}
