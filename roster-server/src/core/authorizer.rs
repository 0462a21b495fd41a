//! Tenant ownership checks

use crate::store::DepartmentRecord;

use super::error::{LifecycleError, LifecycleResult};

/// A resource with an immutable owning account
pub trait Owned {
    fn owner_id(&self) -> i64;
    /// Identifier reported when ownership is denied
    fn display_id(&self) -> &str;
}

impl Owned for DepartmentRecord {
    fn owner_id(&self) -> i64 {
        self.account_id
    }

    fn display_id(&self) -> &str {
        &self.code
    }
}

pub struct TenantAuthorizer;

impl TenantAuthorizer {
    /// Pure comparison; loading the resource is the caller's job
    pub fn authorize_ownership<R: Owned + ?Sized>(
        account_id: i64,
        resource: &R,
    ) -> LifecycleResult<()> {
        if resource.owner_id() == account_id {
            Ok(())
        } else {
            tracing::warn!(
                account_id,
                owner_id = resource.owner_id(),
                resource = resource.display_id(),
                "Ownership check failed"
            );
            Err(LifecycleError::NotOwner {
                code: resource.display_id().to_string(),
            })
        }
    }
}
