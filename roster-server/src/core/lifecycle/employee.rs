//! Employee transitions
//!
//! Employees are visible to and mutable by every authenticated account;
//! only the creating account is recorded.

use shared::models::{EmployeeView, Gender};
use shared::util::now_millis;

use crate::core::error::{LifecycleError, LifecycleResult};
use crate::core::referential::ReferentialGuard;
use crate::core::uniqueness::{UniqueField, UniquenessGuard};
use crate::store::{EmployeeFilter, NewEmployee, StoreError};

use super::ResourceLifecycleManager;

/// Field values of an employee create or full update
#[derive(Debug, Clone)]
pub struct EmployeeDraft {
    pub identity_number: String,
    pub name: String,
    pub image_uri: Option<String>,
    pub gender: Gender,
    /// Display code of the department
    pub department_code: String,
}

/// Map a failed employee write
///
/// `current` is the identity the caller addressed, `draft` the values written.
fn write_error(err: StoreError, current: &str, draft: &EmployeeDraft) -> LifecycleError {
    match err {
        StoreError::StaleRow { .. } => LifecycleError::EmployeeNotFound(current.to_string()),
        err @ StoreError::ReferenceViolation(_) => {
            ReferentialGuard::translate_attach(err, &draft.department_code)
        }
        err => UniquenessGuard::translate(err, &draft.identity_number),
    }
}

impl ResourceLifecycleManager {
    /// Create an employee in an active department
    pub async fn create_employee(
        &self,
        account_id: i64,
        draft: &EmployeeDraft,
    ) -> LifecycleResult<EmployeeView> {
        let mut tx = self.store.begin().await?;
        ReferentialGuard::assert_department_active(tx.as_mut(), &draft.department_code).await?;
        UniquenessGuard::ensure_unique(
            tx.as_mut(),
            UniqueField::EmployeeIdentityNumber,
            &draft.identity_number,
            None,
        )
        .await?;

        let employee = tx
            .insert_employee(&NewEmployee {
                account_id,
                identity_number: draft.identity_number.clone(),
                name: draft.name.clone(),
                gender: draft.gender,
                image_uri: draft.image_uri.clone(),
                department_code: draft.department_code.clone(),
                now: now_millis(),
            })
            .await
            .map_err(|e| write_error(e, &draft.identity_number, draft))?;
        tx.commit()
            .await
            .map_err(|e| write_error(e, &draft.identity_number, draft))?;

        tracing::info!(
            account_id,
            identity_number = %employee.identity_number,
            department = %employee.department_code,
            "Employee created"
        );
        Ok(EmployeeView::from(&employee))
    }

    /// Replace every field of the employee currently known as `identity_number`
    pub async fn update_employee(
        &self,
        identity_number: &str,
        draft: &EmployeeDraft,
    ) -> LifecycleResult<EmployeeView> {
        let mut tx = self.store.begin().await?;
        let mut employee = tx
            .find_active_employee(identity_number)
            .await?
            .ok_or_else(|| LifecycleError::EmployeeNotFound(identity_number.to_string()))?;

        if draft.department_code != employee.department_code {
            ReferentialGuard::assert_department_active(tx.as_mut(), &draft.department_code)
                .await?;
        }
        UniquenessGuard::ensure_unique_on_change(
            tx.as_mut(),
            UniqueField::EmployeeIdentityNumber,
            &employee.identity_number,
            &draft.identity_number,
            employee.id,
        )
        .await?;

        employee.identity_number = draft.identity_number.clone();
        employee.name = draft.name.clone();
        employee.image_uri = draft.image_uri.clone();
        employee.gender = draft.gender;
        employee.department_code = draft.department_code.clone();
        employee.updated_at = now_millis();

        tx.update_employee(&employee)
            .await
            .map_err(|e| write_error(e, identity_number, draft))?;
        tx.commit()
            .await
            .map_err(|e| write_error(e, identity_number, draft))?;

        tracing::info!(
            identity_number,
            new_identity_number = %employee.identity_number,
            "Employee updated"
        );
        Ok(EmployeeView::from(&employee))
    }

    /// Tombstone an active employee
    pub async fn delete_employee(&self, identity_number: &str) -> LifecycleResult<()> {
        let not_found = || LifecycleError::EmployeeNotFound(identity_number.to_string());

        let mut tx = self.store.begin().await?;
        let employee = tx
            .find_active_employee(identity_number)
            .await?
            .ok_or_else(not_found)?;

        let stale = |err: StoreError| match err {
            StoreError::StaleRow { .. } => not_found(),
            other => LifecycleError::Store(other),
        };
        tx.tombstone_employee(employee.id, now_millis())
            .await
            .map_err(stale)?;
        tx.commit().await.map_err(stale)?;

        tracing::info!(identity_number, "Employee deleted");
        Ok(())
    }

    /// Active employees of every account, by identity number
    pub async fn list_employees(
        &self,
        filter: &EmployeeFilter,
    ) -> LifecycleResult<Vec<EmployeeView>> {
        let mut tx = self.store.begin().await?;
        let employees = tx.list_employees(filter).await?;
        tx.commit().await?;
        Ok(employees.iter().map(EmployeeView::from).collect())
    }
}
