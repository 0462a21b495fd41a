//! Transactional record store
//!
//! The lifecycle core talks to persistence only through [`RecordStore`] and
//! [`StoreTx`]. Every mutation runs inside one transaction; dropping a
//! [`StoreTx`] without calling [`StoreTx::commit`] rolls it back.
//!
//! Two implementations ship with the server:
//! - [`PgStore`]: PostgreSQL via sqlx, partial unique indexes as the backstop
//! - [`MemoryStore`]: in-process tables with commit-time constraint checks

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use shared::models::Gender;
use thiserror::Error;

use crate::core::pagination::Page;

/// Names of the unique constraints the store enforces.
///
/// Both stores report violations with these names so callers can map them
/// to domain errors without inspecting messages.
pub mod constraints {
    pub const ACCOUNT_EMAIL: &str = "accounts_email_key";
    pub const DEPARTMENT_SEQ: &str = "departments_seq_key";
    pub const DEPARTMENT_CODE_ACTIVE: &str = "departments_code_active_key";
    pub const EMPLOYEE_IDENTITY_ACTIVE: &str = "employees_identity_number_active_key";
}

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Referential integrity violated: {0}")]
    ReferenceViolation(String),

    /// The row was tombstoned or changed by a concurrent transaction
    #[error("Row no longer active: {table}#{id}")]
    StaleRow { table: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Constraint name when this is a unique violation
    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                }
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Row lock taken when reading a department inside a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    None,
    /// Held while attaching an employee
    Share,
    /// Held while tombstoning the department
    Update,
}

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub user_image_uri: Option<String>,
    pub company_name: Option<String>,
    pub company_image_uri: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DepartmentRecord {
    pub id: i64,
    pub seq: i64,
    pub code: String,
    pub account_id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl DepartmentRecord {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: i64,
    /// Account that created the employee
    pub account_id: i64,
    pub identity_number: String,
    pub name: String,
    pub gender: Gender,
    pub image_uri: Option<String>,
    pub department_code: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl EmployeeRecord {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileRecord {
    pub id: i64,
    pub account_id: i64,
    pub filename: String,
    pub uri: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: i64,
}

// =============================================================================
// Inserts and filters
// =============================================================================

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub now: i64,
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub seq: i64,
    pub code: String,
    pub account_id: i64,
    pub name: String,
    pub now: i64,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub account_id: i64,
    pub identity_number: String,
    pub name: String,
    pub gender: Gender,
    pub image_uri: Option<String>,
    pub department_code: String,
    pub now: i64,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub account_id: i64,
    pub filename: String,
    pub uri: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub now: i64,
}

/// Active departments of one account
#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub page: Page,
}

/// Active employees, across all accounts
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Case-insensitive prefix of the identity number
    pub identity_number: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub department_code: Option<String>,
    pub page: Page,
}

// =============================================================================
// Traits
// =============================================================================

/// Source of transactions
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;
}

/// One open transaction
///
/// Reads see committed data plus this transaction's own writes.
#[async_trait]
pub trait StoreTx: Send {
    // ── Accounts ──
    async fn insert_account(&mut self, new: &NewAccount) -> StoreResult<AccountRecord>;
    async fn find_account(&mut self, id: i64) -> StoreResult<Option<AccountRecord>>;
    async fn find_account_by_email(&mut self, email: &str) -> StoreResult<Option<AccountRecord>>;
    async fn update_account(&mut self, account: &AccountRecord) -> StoreResult<()>;
    async fn email_in_use(&mut self, email: &str, exclude: Option<i64>) -> StoreResult<bool>;

    // ── Departments ──
    /// Highest `seq` over all rows, tombstoned included; 0 when empty
    async fn max_department_seq(&mut self) -> StoreResult<i64>;
    async fn insert_department(&mut self, new: &NewDepartment) -> StoreResult<DepartmentRecord>;
    async fn find_active_department(
        &mut self,
        code: &str,
        lock: RowLock,
    ) -> StoreResult<Option<DepartmentRecord>>;
    async fn update_department(&mut self, department: &DepartmentRecord) -> StoreResult<()>;
    async fn tombstone_department(&mut self, id: i64, now: i64) -> StoreResult<()>;
    async fn list_departments(
        &mut self,
        account_id: i64,
        filter: &DepartmentFilter,
    ) -> StoreResult<Vec<DepartmentRecord>>;

    // ── Employees ──
    async fn insert_employee(&mut self, new: &NewEmployee) -> StoreResult<EmployeeRecord>;
    async fn find_active_employee(
        &mut self,
        identity_number: &str,
    ) -> StoreResult<Option<EmployeeRecord>>;
    async fn identity_number_in_use(
        &mut self,
        identity_number: &str,
        exclude: Option<i64>,
    ) -> StoreResult<bool>;
    async fn count_active_employees(&mut self, department_code: &str) -> StoreResult<i64>;
    async fn update_employee(&mut self, employee: &EmployeeRecord) -> StoreResult<()>;
    async fn tombstone_employee(&mut self, id: i64, now: i64) -> StoreResult<()>;
    async fn list_employees(&mut self, filter: &EmployeeFilter) -> StoreResult<Vec<EmployeeRecord>>;

    // ── Files ──
    async fn insert_file(&mut self, new: &NewFile) -> StoreResult<FileRecord>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
