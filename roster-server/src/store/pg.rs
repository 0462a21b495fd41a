//! PostgreSQL record store
//!
//! Runtime-checked `sqlx::query` / `query_as` against the schema in
//! `migrations/`. Active-row uniqueness is enforced by partial unique
//! indexes; department rows are locked when an employee is attached or the
//! department is tombstoned.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use super::{
    AccountRecord, DepartmentFilter, DepartmentRecord, EmployeeFilter, EmployeeRecord, FileRecord,
    NewAccount, NewDepartment, NewEmployee, NewFile, RecordStore, RowLock, StoreError, StoreResult,
    StoreTx,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run embedded migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {e}")))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    account_id: i64,
    identity_number: String,
    name: String,
    gender: String,
    image_uri: Option<String>,
    department_code: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<EmployeeRow> for EmployeeRecord {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(EmployeeRecord {
            gender: row.gender.parse().map_err(StoreError::Database)?,
            id: row.id,
            account_id: row.account_id,
            identity_number: row.identity_number,
            name: row.name,
            image_uri: row.image_uri,
            department_code: row.department_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn like_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn contains_pattern(value: Option<&str>) -> Option<String> {
    value.map(|v| format!("%{}%", like_escape(v)))
}

fn prefix_pattern(value: Option<&str>) -> Option<String> {
    value.map(|v| format!("{}%", like_escape(v)))
}

fn stale(table: &'static str, id: i64, rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        return Err(StoreError::StaleRow { table, id });
    }
    Ok(())
}

#[async_trait]
impl StoreTx for PgTx {
    // ── Accounts ──

    async fn insert_account(&mut self, new: &NewAccount) -> StoreResult<AccountRecord> {
        let account = sqlx::query_as(
            "INSERT INTO accounts (email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $3)
             RETURNING *",
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.now)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(account)
    }

    async fn find_account(&mut self, id: i64) -> StoreResult<Option<AccountRecord>> {
        let account = sqlx::query_as("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(account)
    }

    async fn find_account_by_email(&mut self, email: &str) -> StoreResult<Option<AccountRecord>> {
        let account = sqlx::query_as("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(account)
    }

    async fn update_account(&mut self, account: &AccountRecord) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE accounts
             SET email = $1, name = $2, user_image_uri = $3, company_name = $4,
                 company_image_uri = $5, updated_at = $6
             WHERE id = $7",
        )
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.user_image_uri)
        .bind(&account.company_name)
        .bind(&account.company_image_uri)
        .bind(account.updated_at)
        .bind(account.id)
        .execute(&mut *self.tx)
        .await?;
        stale("accounts", account.id, result.rows_affected())
    }

    async fn email_in_use(&mut self, email: &str, exclude: Option<i64>) -> StoreResult<bool> {
        let in_use = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM accounts
                 WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(in_use)
    }

    // ── Departments ──

    async fn max_department_seq(&mut self) -> StoreResult<i64> {
        let max = sqlx::query_scalar("SELECT COALESCE(MAX(seq), 0)::BIGINT FROM departments")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(max)
    }

    async fn insert_department(&mut self, new: &NewDepartment) -> StoreResult<DepartmentRecord> {
        let department = sqlx::query_as(
            "INSERT INTO departments (seq, code, account_id, name, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING *",
        )
        .bind(new.seq)
        .bind(&new.code)
        .bind(new.account_id)
        .bind(&new.name)
        .bind(new.now)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(department)
    }

    async fn find_active_department(
        &mut self,
        code: &str,
        lock: RowLock,
    ) -> StoreResult<Option<DepartmentRecord>> {
        let sql = match lock {
            RowLock::None => "SELECT * FROM departments WHERE code = $1 AND deleted_at IS NULL",
            RowLock::Share => {
                "SELECT * FROM departments WHERE code = $1 AND deleted_at IS NULL FOR SHARE"
            }
            RowLock::Update => {
                "SELECT * FROM departments WHERE code = $1 AND deleted_at IS NULL FOR UPDATE"
            }
        };
        let department = sqlx::query_as(sql)
            .bind(code)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(department)
    }

    async fn update_department(&mut self, department: &DepartmentRecord) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE departments SET name = $1, updated_at = $2
             WHERE id = $3 AND deleted_at IS NULL",
        )
        .bind(&department.name)
        .bind(department.updated_at)
        .bind(department.id)
        .execute(&mut *self.tx)
        .await?;
        stale("departments", department.id, result.rows_affected())
    }

    async fn tombstone_department(&mut self, id: i64, now: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE departments SET deleted_at = $1, updated_at = $1
             WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *self.tx)
        .await?;
        stale("departments", id, result.rows_affected())
    }

    async fn list_departments(
        &mut self,
        account_id: i64,
        filter: &DepartmentFilter,
    ) -> StoreResult<Vec<DepartmentRecord>> {
        let departments = sqlx::query_as(
            "SELECT * FROM departments
             WHERE account_id = $1 AND deleted_at IS NULL
               AND ($2::TEXT IS NULL OR name ILIKE $2)
             ORDER BY id ASC
             LIMIT $3 OFFSET $4",
        )
        .bind(account_id)
        .bind(contains_pattern(filter.name.as_deref()))
        .bind(filter.page.limit)
        .bind(filter.page.offset)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(departments)
    }

    // ── Employees ──

    async fn insert_employee(&mut self, new: &NewEmployee) -> StoreResult<EmployeeRecord> {
        let row: EmployeeRow = sqlx::query_as(
            "INSERT INTO employees
                 (account_id, identity_number, name, gender, image_uri, department_code,
                  created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING *",
        )
        .bind(new.account_id)
        .bind(&new.identity_number)
        .bind(&new.name)
        .bind(new.gender.as_str())
        .bind(&new.image_uri)
        .bind(&new.department_code)
        .bind(new.now)
        .fetch_one(&mut *self.tx)
        .await?;
        row.try_into()
    }

    async fn find_active_employee(
        &mut self,
        identity_number: &str,
    ) -> StoreResult<Option<EmployeeRecord>> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            "SELECT * FROM employees WHERE identity_number = $1 AND deleted_at IS NULL",
        )
        .bind(identity_number)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(EmployeeRecord::try_from).transpose()
    }

    async fn identity_number_in_use(
        &mut self,
        identity_number: &str,
        exclude: Option<i64>,
    ) -> StoreResult<bool> {
        let in_use = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM employees
                 WHERE identity_number = $1 AND deleted_at IS NULL
                   AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(identity_number)
        .bind(exclude)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(in_use)
    }

    async fn count_active_employees(&mut self, department_code: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees WHERE department_code = $1 AND deleted_at IS NULL",
        )
        .bind(department_code)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(count)
    }

    async fn update_employee(&mut self, employee: &EmployeeRecord) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE employees
             SET identity_number = $1, name = $2, gender = $3, image_uri = $4,
                 department_code = $5, updated_at = $6
             WHERE id = $7 AND deleted_at IS NULL",
        )
        .bind(&employee.identity_number)
        .bind(&employee.name)
        .bind(employee.gender.as_str())
        .bind(&employee.image_uri)
        .bind(&employee.department_code)
        .bind(employee.updated_at)
        .bind(employee.id)
        .execute(&mut *self.tx)
        .await?;
        stale("employees", employee.id, result.rows_affected())
    }

    async fn tombstone_employee(&mut self, id: i64, now: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE employees SET deleted_at = $1, updated_at = $1
             WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *self.tx)
        .await?;
        stale("employees", id, result.rows_affected())
    }

    async fn list_employees(&mut self, filter: &EmployeeFilter) -> StoreResult<Vec<EmployeeRecord>> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(
            "SELECT * FROM employees
             WHERE deleted_at IS NULL
               AND ($1::TEXT IS NULL OR identity_number ILIKE $1)
               AND ($2::TEXT IS NULL OR name ILIKE $2)
               AND ($3::TEXT IS NULL OR gender = $3)
               AND ($4::TEXT IS NULL OR department_code = $4)
             ORDER BY identity_number COLLATE \"C\" ASC
             LIMIT $5 OFFSET $6",
        )
        .bind(prefix_pattern(filter.identity_number.as_deref()))
        .bind(contains_pattern(filter.name.as_deref()))
        .bind(filter.gender.map(|g| g.as_str()))
        .bind(&filter.department_code)
        .bind(filter.page.limit)
        .bind(filter.page.offset)
        .fetch_all(&mut *self.tx)
        .await?;
        rows.into_iter().map(EmployeeRecord::try_from).collect()
    }

    // ── Files ──

    async fn insert_file(&mut self, new: &NewFile) -> StoreResult<FileRecord> {
        let file = sqlx::query_as(
            "INSERT INTO uploaded_files
                 (account_id, filename, uri, content_type, size_bytes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(new.account_id)
        .bind(&new.filename)
        .bind(&new.uri)
        .bind(&new.content_type)
        .bind(new.size_bytes)
        .bind(new.now)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(file)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_escape() {
        assert_eq!(like_escape("50%_off"), "50\\%\\_off");
        assert_eq!(like_escape(r"a\b"), r"a\\b");
        assert_eq!(like_escape("plain"), "plain");
    }

    #[test]
    fn test_patterns() {
        assert_eq!(contains_pattern(Some("eng")), Some("%eng%".to_string()));
        assert_eq!(prefix_pattern(Some("E0")), Some("E0%".to_string()));
        assert_eq!(prefix_pattern(None), None);
    }
}
