//! Department transitions

use shared::models::DepartmentView;
use shared::util::now_millis;

use crate::core::allocator::is_collision;
use crate::core::authorizer::TenantAuthorizer;
use crate::core::error::{LifecycleError, LifecycleResult};
use crate::core::referential::ReferentialGuard;
use crate::store::{DepartmentFilter, DepartmentRecord, NewDepartment, RowLock, StoreError};

use super::ResourceLifecycleManager;

/// Map a failed department write; `code` is the department being written
fn write_error(err: StoreError, code: &str) -> LifecycleError {
    match err {
        StoreError::StaleRow { .. } => LifecycleError::DepartmentNotFound(code.to_string()),
        other => ReferentialGuard::translate_detach(other, code),
    }
}

impl ResourceLifecycleManager {
    /// Create a department owned by `account_id` under a freshly allocated code
    ///
    /// A code collision with a concurrent creator re-runs the whole
    /// transaction, up to the configured number of attempts.
    pub async fn create_department(
        &self,
        account_id: i64,
        name: &str,
    ) -> LifecycleResult<DepartmentView> {
        for attempt in 1..=self.allocation_attempts {
            match self.try_create_department(account_id, name).await {
                Ok(department) => {
                    tracing::info!(
                        account_id,
                        code = %department.code,
                        attempt,
                        "Department created"
                    );
                    return Ok(DepartmentView::from(&department));
                }
                Err(LifecycleError::Store(err)) if is_collision(&err) => {
                    tracing::warn!(account_id, attempt, error = %err, "Department code collision");
                    tokio::task::yield_now().await;
                }
                Err(err) => return Err(err),
            }
        }

        Err(LifecycleError::AllocationExhausted {
            attempts: self.allocation_attempts,
        })
    }

    async fn try_create_department(
        &self,
        account_id: i64,
        name: &str,
    ) -> LifecycleResult<DepartmentRecord> {
        let mut tx = self.store.begin().await?;
        let allocation = self.allocator.allocate(tx.as_mut()).await?;
        let department = tx
            .insert_department(&NewDepartment {
                seq: allocation.seq,
                code: allocation.code,
                account_id,
                name: name.to_string(),
                now: now_millis(),
            })
            .await?;
        tx.commit().await?;
        Ok(department)
    }

    /// Rename a department; only its owner may do so
    pub async fn update_department(
        &self,
        account_id: i64,
        code: &str,
        name: &str,
    ) -> LifecycleResult<DepartmentView> {
        let mut tx = self.store.begin().await?;
        let mut department = tx
            .find_active_department(code, RowLock::Update)
            .await?
            .ok_or_else(|| LifecycleError::DepartmentNotFound(code.to_string()))?;
        TenantAuthorizer::authorize_ownership(account_id, &department)?;

        department.name = name.to_string();
        department.updated_at = now_millis();
        tx.update_department(&department)
            .await
            .map_err(|e| write_error(e, code))?;
        tx.commit().await.map_err(|e| write_error(e, code))?;

        tracing::info!(account_id, code, "Department updated");
        Ok(DepartmentView::from(&department))
    }

    /// Tombstone a department that no active employee references
    pub async fn delete_department(&self, account_id: i64, code: &str) -> LifecycleResult<()> {
        let mut tx = self.store.begin().await?;
        let department = tx
            .find_active_department(code, RowLock::Update)
            .await?
            .ok_or_else(|| LifecycleError::DepartmentNotFound(code.to_string()))?;
        TenantAuthorizer::authorize_ownership(account_id, &department)?;
        ReferentialGuard::assert_no_active_employees(tx.as_mut(), code).await?;

        tx.tombstone_department(department.id, now_millis())
            .await
            .map_err(|e| write_error(e, code))?;
        tx.commit().await.map_err(|e| write_error(e, code))?;

        tracing::info!(account_id, code, "Department deleted");
        Ok(())
    }

    /// Active departments of `account_id`, oldest first
    pub async fn list_departments(
        &self,
        account_id: i64,
        filter: &DepartmentFilter,
    ) -> LifecycleResult<Vec<DepartmentView>> {
        let mut tx = self.store.begin().await?;
        let departments = tx.list_departments(account_id, filter).await?;
        tx.commit().await?;
        Ok(departments.iter().map(DepartmentView::from).collect())
    }
}
