#![allow(dead_code)]

use std::sync::Arc;

use roster_server::core::{EmployeeDraft, ResourceLifecycleManager, SequentialCodeAllocator};
use roster_server::store::MemoryStore;
use shared::models::Gender;

pub const ACCOUNT_A: i64 = 1;
pub const ACCOUNT_B: i64 = 2;

pub fn manager_with_attempts(attempts: u32) -> ResourceLifecycleManager {
    ResourceLifecycleManager::new(
        Arc::new(MemoryStore::new()),
        SequentialCodeAllocator::default(),
        attempts,
    )
}

pub fn manager() -> ResourceLifecycleManager {
    manager_with_attempts(5)
}

pub fn draft(identity_number: &str, department_code: &str) -> EmployeeDraft {
    EmployeeDraft {
        identity_number: identity_number.to_string(),
        name: format!("Employee {identity_number}"),
        image_uri: None,
        gender: Gender::Female,
        department_code: department_code.to_string(),
    }
}
