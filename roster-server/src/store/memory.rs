//! In-memory record store
//!
//! Tables live behind one `parking_lot::Mutex`. A transaction stages full row
//! images and reads committed rows overlaid with its own writes, merging the
//! two under the lock instead of copying the committed tables. Constraints
//! are checked when a row is staged and again at commit under the lock, so
//! two transactions racing for the same unique value or reference cannot
//! both commit. Used by the test suite and by local runs without a database.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::collections::HashSet;
use std::iter::Peekable;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::constraints;
use super::{
    AccountRecord, DepartmentFilter, DepartmentRecord, EmployeeFilter, EmployeeRecord, FileRecord,
    NewAccount, NewDepartment, NewEmployee, NewFile, RecordStore, RowLock, StoreError, StoreResult,
    StoreTx,
};
use crate::core::pagination::Page;

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i64, AccountRecord>,
    departments: BTreeMap<i64, DepartmentRecord>,
    employees: BTreeMap<i64, EmployeeRecord>,
    files: BTreeMap<i64, FileRecord>,
}

impl Tables {
    fn overlay(&mut self, staged: Tables) {
        self.accounts.extend(staged.accounts);
        self.departments.extend(staged.departments);
        self.employees.extend(staged.employees);
        self.files.extend(staged.files);
    }
}

/// Iterate `committed` in id order with rows in `staged` taking precedence
fn merged<'a, T>(
    committed: &'a BTreeMap<i64, T>,
    staged: &'a BTreeMap<i64, T>,
) -> MergeById<'a, T> {
    MergeById {
        base: committed.iter().peekable(),
        over: staged.iter().peekable(),
    }
}

struct MergeById<'a, T> {
    base: Peekable<btree_map::Iter<'a, i64, T>>,
    over: Peekable<btree_map::Iter<'a, i64, T>>,
}

impl<'a, T> Iterator for MergeById<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let base = self.base.peek().map(|(id, _)| **id);
        let over = self.over.peek().map(|(id, _)| **id);
        match (base, over) {
            (Some(b), Some(o)) if b < o => self.base.next().map(|(_, row)| row),
            (Some(b), Some(o)) if b == o => {
                self.base.next();
                self.over.next().map(|(_, row)| row)
            }
            (_, Some(_)) => self.over.next().map(|(_, row)| row),
            (Some(_), None) => self.base.next().map(|(_, row)| row),
            (None, None) => None,
        }
    }
}

/// Committed tables as seen through one transaction's staged rows
#[derive(Clone, Copy)]
struct View<'a> {
    committed: &'a Tables,
    staged: &'a Tables,
}

impl<'a> View<'a> {
    fn accounts(self) -> MergeById<'a, AccountRecord> {
        merged(&self.committed.accounts, &self.staged.accounts)
    }

    fn departments(self) -> MergeById<'a, DepartmentRecord> {
        merged(&self.committed.departments, &self.staged.departments)
    }

    fn employees(self) -> MergeById<'a, EmployeeRecord> {
        merged(&self.committed.employees, &self.staged.employees)
    }

    fn account(self, id: i64) -> Option<&'a AccountRecord> {
        self.staged
            .accounts
            .get(&id)
            .or_else(|| self.committed.accounts.get(&id))
    }

    fn department(self, id: i64) -> Option<&'a DepartmentRecord> {
        self.staged
            .departments
            .get(&id)
            .or_else(|| self.committed.departments.get(&id))
    }

    fn employee(self, id: i64) -> Option<&'a EmployeeRecord> {
        self.staged
            .employees
            .get(&id)
            .or_else(|| self.committed.employees.get(&id))
    }

    /// Check every constraint the Postgres schema declares
    fn validate(self) -> StoreResult<()> {
        let mut emails = HashSet::new();
        for account in self.accounts() {
            if !emails.insert(account.email.as_str()) {
                return Err(unique(constraints::ACCOUNT_EMAIL));
            }
        }

        let mut seqs = HashSet::new();
        let mut active_codes = HashSet::new();
        for department in self.departments() {
            if !seqs.insert(department.seq) {
                return Err(unique(constraints::DEPARTMENT_SEQ));
            }
            if department.is_active() && !active_codes.insert(department.code.as_str()) {
                return Err(unique(constraints::DEPARTMENT_CODE_ACTIVE));
            }
        }

        let mut identities = HashSet::new();
        for employee in self.employees().filter(|e| e.is_active()) {
            if !identities.insert(employee.identity_number.as_str()) {
                return Err(unique(constraints::EMPLOYEE_IDENTITY_ACTIVE));
            }
            if !active_codes.contains(employee.department_code.as_str()) {
                return Err(StoreError::ReferenceViolation(format!(
                    "employee {} references inactive department {}",
                    employee.identity_number, employee.department_code
                )));
            }
        }

        Ok(())
    }
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn paginate<T>(rows: impl Iterator<Item = T>, page: &Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(0);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    rows.skip(offset).take(limit).collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn starts_with_ci(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[derive(Debug, Default)]
struct Shared {
    tables: Mutex<Tables>,
    next_id: AtomicI64,
}

/// In-process [`RecordStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        Ok(Box::new(MemoryTx {
            shared: self.shared.clone(),
            staged: Tables::default(),
            must_be_active: Vec::new(),
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Accounts,
    Departments,
    Employees,
}

struct MemoryTx {
    shared: Arc<Shared>,
    staged: Tables,
    /// Pre-existing rows this transaction modified
    must_be_active: Vec<(Table, i64)>,
}

impl MemoryTx {
    fn next_id(&self) -> i64 {
        self.shared.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run `f` against the merged view while holding the table lock
    fn read<R>(&self, f: impl FnOnce(View<'_>) -> R) -> R {
        let committed = self.shared.tables.lock();
        f(View {
            committed: &committed,
            staged: &self.staged,
        })
    }

    /// Validate the view after staging a write
    fn check(&self) -> StoreResult<()> {
        self.read(|view| view.validate())
    }

    fn committed_contains(&self, table: Table, id: i64) -> bool {
        let tables = self.shared.tables.lock();
        match table {
            Table::Accounts => tables.accounts.contains_key(&id),
            Table::Departments => tables.departments.contains_key(&id),
            Table::Employees => tables.employees.contains_key(&id),
        }
    }

    fn track(&mut self, table: Table, id: i64) {
        if self.committed_contains(table, id) {
            self.must_be_active.push((table, id));
        }
    }

    fn active_department(&self, id: i64) -> StoreResult<DepartmentRecord> {
        self.read(|view| view.department(id).filter(|d| d.is_active()).cloned())
            .ok_or(StoreError::StaleRow {
                table: "departments",
                id,
            })
    }

    fn active_employee(&self, id: i64) -> StoreResult<EmployeeRecord> {
        self.read(|view| view.employee(id).filter(|e| e.is_active()).cloned())
            .ok_or(StoreError::StaleRow {
                table: "employees",
                id,
            })
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    // ── Accounts ──

    async fn insert_account(&mut self, new: &NewAccount) -> StoreResult<AccountRecord> {
        let account = AccountRecord {
            id: self.next_id(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            name: None,
            user_image_uri: None,
            company_name: None,
            company_image_uri: None,
            created_at: new.now,
            updated_at: new.now,
        };
        self.staged.accounts.insert(account.id, account.clone());
        self.check()?;
        Ok(account)
    }

    async fn find_account(&mut self, id: i64) -> StoreResult<Option<AccountRecord>> {
        Ok(self.read(|view| view.account(id).cloned()))
    }

    async fn find_account_by_email(&mut self, email: &str) -> StoreResult<Option<AccountRecord>> {
        Ok(self.read(|view| view.accounts().find(|a| a.email == email).cloned()))
    }

    async fn update_account(&mut self, account: &AccountRecord) -> StoreResult<()> {
        if self.read(|view| view.account(account.id).is_none()) {
            return Err(StoreError::StaleRow {
                table: "accounts",
                id: account.id,
            });
        }
        self.track(Table::Accounts, account.id);
        self.staged.accounts.insert(account.id, account.clone());
        self.check()
    }

    async fn email_in_use(&mut self, email: &str, exclude: Option<i64>) -> StoreResult<bool> {
        Ok(self.read(|view| {
            view.accounts()
                .any(|a| a.email == email && Some(a.id) != exclude)
        }))
    }

    // ── Departments ──

    async fn max_department_seq(&mut self) -> StoreResult<i64> {
        Ok(self.read(|view| view.departments().map(|d| d.seq).max().unwrap_or(0)))
    }

    async fn insert_department(&mut self, new: &NewDepartment) -> StoreResult<DepartmentRecord> {
        let department = DepartmentRecord {
            id: self.next_id(),
            seq: new.seq,
            code: new.code.clone(),
            account_id: new.account_id,
            name: new.name.clone(),
            created_at: new.now,
            updated_at: new.now,
            deleted_at: None,
        };
        self.staged
            .departments
            .insert(department.id, department.clone());
        self.check()?;
        Ok(department)
    }

    async fn find_active_department(
        &mut self,
        code: &str,
        _lock: RowLock,
    ) -> StoreResult<Option<DepartmentRecord>> {
        Ok(self.read(|view| {
            view.departments()
                .find(|d| d.is_active() && d.code == code)
                .cloned()
        }))
    }

    async fn update_department(&mut self, department: &DepartmentRecord) -> StoreResult<()> {
        let mut row = self.active_department(department.id)?;
        row.name = department.name.clone();
        row.updated_at = department.updated_at;
        self.track(Table::Departments, row.id);
        self.staged.departments.insert(row.id, row);
        self.check()
    }

    async fn tombstone_department(&mut self, id: i64, now: i64) -> StoreResult<()> {
        let mut row = self.active_department(id)?;
        row.deleted_at = Some(now);
        row.updated_at = now;
        self.track(Table::Departments, id);
        self.staged.departments.insert(id, row);
        self.check()
    }

    async fn list_departments(
        &mut self,
        account_id: i64,
        filter: &DepartmentFilter,
    ) -> StoreResult<Vec<DepartmentRecord>> {
        Ok(self.read(|view| {
            let rows = view.departments().filter(|d| {
                d.is_active()
                    && d.account_id == account_id
                    && filter
                        .name
                        .as_deref()
                        .is_none_or(|name| contains_ci(&d.name, name))
            });
            paginate(rows.cloned(), &filter.page)
        }))
    }

    // ── Employees ──

    async fn insert_employee(&mut self, new: &NewEmployee) -> StoreResult<EmployeeRecord> {
        let employee = EmployeeRecord {
            id: self.next_id(),
            account_id: new.account_id,
            identity_number: new.identity_number.clone(),
            name: new.name.clone(),
            gender: new.gender,
            image_uri: new.image_uri.clone(),
            department_code: new.department_code.clone(),
            created_at: new.now,
            updated_at: new.now,
            deleted_at: None,
        };
        self.staged.employees.insert(employee.id, employee.clone());
        self.check()?;
        Ok(employee)
    }

    async fn find_active_employee(
        &mut self,
        identity_number: &str,
    ) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.read(|view| {
            view.employees()
                .find(|e| e.is_active() && e.identity_number == identity_number)
                .cloned()
        }))
    }

    async fn identity_number_in_use(
        &mut self,
        identity_number: &str,
        exclude: Option<i64>,
    ) -> StoreResult<bool> {
        Ok(self.read(|view| {
            view.employees().any(|e| {
                e.is_active() && e.identity_number == identity_number && Some(e.id) != exclude
            })
        }))
    }

    async fn count_active_employees(&mut self, department_code: &str) -> StoreResult<i64> {
        let count = self.read(|view| {
            view.employees()
                .filter(|e| e.is_active() && e.department_code == department_code)
                .count()
        });
        Ok(count as i64)
    }

    async fn update_employee(&mut self, employee: &EmployeeRecord) -> StoreResult<()> {
        let mut row = self.active_employee(employee.id)?;
        row.identity_number = employee.identity_number.clone();
        row.name = employee.name.clone();
        row.gender = employee.gender;
        row.image_uri = employee.image_uri.clone();
        row.department_code = employee.department_code.clone();
        row.updated_at = employee.updated_at;
        self.track(Table::Employees, row.id);
        self.staged.employees.insert(row.id, row);
        self.check()
    }

    async fn tombstone_employee(&mut self, id: i64, now: i64) -> StoreResult<()> {
        let mut row = self.active_employee(id)?;
        row.deleted_at = Some(now);
        row.updated_at = now;
        self.track(Table::Employees, id);
        self.staged.employees.insert(id, row);
        self.check()
    }

    async fn list_employees(&mut self, filter: &EmployeeFilter) -> StoreResult<Vec<EmployeeRecord>> {
        let page = self.read(|view| {
            let mut rows: Vec<&EmployeeRecord> = view
                .employees()
                .filter(|e| {
                    e.is_active()
                        && filter
                            .identity_number
                            .as_deref()
                            .is_none_or(|prefix| starts_with_ci(&e.identity_number, prefix))
                        && filter
                            .name
                            .as_deref()
                            .is_none_or(|name| contains_ci(&e.name, name))
                        && filter.gender.is_none_or(|g| e.gender == g)
                        && filter
                            .department_code
                            .as_deref()
                            .is_none_or(|code| e.department_code == code)
                })
                .collect();
            rows.sort_by(|a, b| a.identity_number.cmp(&b.identity_number));
            paginate(rows.into_iter().cloned(), &filter.page)
        });
        Ok(page)
    }

    // ── Files ──

    async fn insert_file(&mut self, new: &NewFile) -> StoreResult<FileRecord> {
        let file = FileRecord {
            id: self.next_id(),
            account_id: new.account_id,
            filename: new.filename.clone(),
            uri: new.uri.clone(),
            content_type: new.content_type.clone(),
            size_bytes: new.size_bytes,
            created_at: new.now,
        };
        self.staged.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx {
            shared,
            staged,
            must_be_active,
        } = *self;
        let mut committed = shared.tables.lock();

        for (table, id) in &must_be_active {
            let (name, active) = match table {
                Table::Accounts => ("accounts", committed.accounts.contains_key(id)),
                Table::Departments => (
                    "departments",
                    committed.departments.get(id).is_some_and(|d| d.is_active()),
                ),
                Table::Employees => (
                    "employees",
                    committed.employees.get(id).is_some_and(|e| e.is_active()),
                ),
            };
            if !active {
                return Err(StoreError::StaleRow {
                    table: name,
                    id: *id,
                });
            }
        }

        View {
            committed: &committed,
            staged: &staged,
        }
        .validate()?;
        committed.overlay(staged);
        Ok(())
    }
}
