//! Uniqueness of employee identity numbers and account emails
//!
//! The check runs inside the writing transaction. The store's unique
//! indexes still have the final word; [`UniquenessGuard::translate`] turns
//! their violations into the same domain errors the check produces.

use crate::store::{StoreError, StoreTx, constraints};

use super::error::{LifecycleError, LifecycleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// Unique among active employees of every account
    EmployeeIdentityNumber,
    /// Unique among all accounts
    AccountEmail,
}

impl UniqueField {
    pub fn constraint(&self) -> &'static str {
        match self {
            UniqueField::EmployeeIdentityNumber => constraints::EMPLOYEE_IDENTITY_ACTIVE,
            UniqueField::AccountEmail => constraints::ACCOUNT_EMAIL,
        }
    }

    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            constraints::EMPLOYEE_IDENTITY_ACTIVE => Some(UniqueField::EmployeeIdentityNumber),
            constraints::ACCOUNT_EMAIL => Some(UniqueField::AccountEmail),
            _ => None,
        }
    }

    fn conflict(&self, value: &str) -> LifecycleError {
        match self {
            UniqueField::EmployeeIdentityNumber => {
                LifecycleError::IdentityNumberExists(value.to_string())
            }
            UniqueField::AccountEmail => LifecycleError::EmailExists(value.to_string()),
        }
    }
}

pub struct UniquenessGuard;

impl UniquenessGuard {
    /// `true` when no other active record holds `value`
    ///
    /// `exclude` is the id of the record being updated, if any.
    pub async fn check_unique(
        tx: &mut dyn StoreTx,
        field: UniqueField,
        value: &str,
        exclude: Option<i64>,
    ) -> LifecycleResult<bool> {
        let in_use = match field {
            UniqueField::EmployeeIdentityNumber => {
                tx.identity_number_in_use(value, exclude).await?
            }
            UniqueField::AccountEmail => tx.email_in_use(value, exclude).await?,
        };
        Ok(!in_use)
    }

    /// Fail with the field's `AlreadyExists` error when `value` is taken
    pub async fn ensure_unique(
        tx: &mut dyn StoreTx,
        field: UniqueField,
        value: &str,
        exclude: Option<i64>,
    ) -> LifecycleResult<()> {
        if Self::check_unique(tx, field, value, exclude).await? {
            Ok(())
        } else {
            Err(field.conflict(value))
        }
    }

    /// Re-check on update; an unchanged value is never a conflict
    pub async fn ensure_unique_on_change(
        tx: &mut dyn StoreTx,
        field: UniqueField,
        current: &str,
        requested: &str,
        record_id: i64,
    ) -> LifecycleResult<()> {
        if current == requested {
            return Ok(());
        }
        Self::ensure_unique(tx, field, requested, Some(record_id)).await
    }

    /// Map a store error raised by a write of `value` into the domain error
    pub fn translate(err: StoreError, value: &str) -> LifecycleError {
        match err.violated_constraint().and_then(UniqueField::from_constraint) {
            Some(field) => field.conflict(value),
            None => LifecycleError::Store(err),
        }
    }
}
