//! Resource lifecycle orchestration
//!
//! Departments and employees move `absent -> active -> tombstoned`. Every
//! transition runs in one store transaction: guards first, then the write,
//! then commit. Any failure drops the transaction, which rolls it back.

mod department;
mod employee;

pub use employee::EmployeeDraft;

use std::sync::Arc;

use shared::models::{DepartmentView, EmployeeView};

use crate::store::{DepartmentRecord, EmployeeRecord, RecordStore};

use super::allocator::SequentialCodeAllocator;

#[derive(Debug, Clone)]
pub struct ResourceLifecycleManager {
    store: Arc<dyn RecordStore>,
    allocator: SequentialCodeAllocator,
    allocation_attempts: u32,
}

impl ResourceLifecycleManager {
    pub fn new(
        store: Arc<dyn RecordStore>,
        allocator: SequentialCodeAllocator,
        allocation_attempts: u32,
    ) -> Self {
        Self {
            store,
            allocator,
            allocation_attempts: allocation_attempts.max(1),
        }
    }

    pub fn allocator(&self) -> &SequentialCodeAllocator {
        &self.allocator
    }
}

impl From<&DepartmentRecord> for DepartmentView {
    fn from(record: &DepartmentRecord) -> Self {
        DepartmentView {
            id: record.code.clone(),
            name: record.name.clone(),
        }
    }
}

impl From<&EmployeeRecord> for EmployeeView {
    fn from(record: &EmployeeRecord) -> Self {
        EmployeeView {
            identity_number: record.identity_number.clone(),
            name: record.name.clone(),
            employee_image_uri: record.image_uri.clone(),
            gender: record.gender,
            department_id: record.department_code.clone(),
        }
    }
}
