//! Department references from employees
//!
//! There is no foreign key from employees to departments: a department is
//! tombstoned, never removed, so a plain foreign key would keep accepting
//! references to deleted departments. Both checks below run inside the
//! dependent write's transaction. The Postgres store locks the department
//! row (`FOR SHARE` to attach, `FOR UPDATE` to delete) so an attach and a
//! delete of the same department serialize; the in-memory store rejects the
//! later commit instead.

use crate::store::{DepartmentRecord, RowLock, StoreError, StoreTx};

use super::error::{LifecycleError, LifecycleResult};

pub struct ReferentialGuard;

impl ReferentialGuard {
    /// The referenced department, locked for sharing
    pub async fn assert_department_active(
        tx: &mut dyn StoreTx,
        code: &str,
    ) -> LifecycleResult<DepartmentRecord> {
        tx.find_active_department(code, RowLock::Share)
            .await?
            .ok_or_else(|| LifecycleError::UnknownDepartment(code.to_string()))
    }

    /// Block deletion while any active employee references `code`
    pub async fn assert_no_active_employees(
        tx: &mut dyn StoreTx,
        code: &str,
    ) -> LifecycleResult<()> {
        let count = tx.count_active_employees(code).await?;
        if count > 0 {
            tracing::debug!(department = code, count, "Department still has employees");
            return Err(LifecycleError::DepartmentHasEmployees {
                code: code.to_string(),
            });
        }
        Ok(())
    }

    /// Commit-time reference failure raised by an employee write
    pub fn translate_attach(err: StoreError, code: &str) -> LifecycleError {
        match err {
            StoreError::ReferenceViolation(_) => LifecycleError::UnknownDepartment(code.to_string()),
            other => LifecycleError::Store(other),
        }
    }

    /// Commit-time reference failure raised by a department tombstone
    pub fn translate_detach(err: StoreError, code: &str) -> LifecycleError {
        match err {
            StoreError::ReferenceViolation(_) => LifecycleError::DepartmentHasEmployees {
                code: code.to_string(),
            },
            other => LifecycleError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewDepartment, NewEmployee, RecordStore};
    use shared::models::Gender;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_department(&NewDepartment {
            seq: 1,
            code: "DEP-01".into(),
            account_id: 1,
            name: "Engineering".into(),
            now: 1,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_active_department_found() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let department = ReferentialGuard::assert_department_active(tx.as_mut(), "DEP-01")
            .await
            .unwrap();
        assert_eq!(department.name, "Engineering");
    }

    #[tokio::test]
    async fn test_tombstoned_department_rejected() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let department = tx
            .find_active_department("DEP-01", RowLock::None)
            .await
            .unwrap()
            .unwrap();
        tx.tombstone_department(department.id, 5).await.unwrap();

        let err = ReferentialGuard::assert_department_active(tx.as_mut(), "DEP-01")
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::UnknownDepartment(_)));
    }

    #[tokio::test]
    async fn test_dependents_block_deletion() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        assert!(
            ReferentialGuard::assert_no_active_employees(tx.as_mut(), "DEP-01")
                .await
                .is_ok()
        );

        tx.insert_employee(&NewEmployee {
            account_id: 1,
            identity_number: "E0001".into(),
            name: "Alice".into(),
            gender: Gender::Female,
            image_uri: None,
            department_code: "DEP-01".into(),
            now: 2,
        })
        .await
        .unwrap();

        let err = ReferentialGuard::assert_no_active_employees(tx.as_mut(), "DEP-01")
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::DepartmentHasEmployees { .. }));
    }
}
