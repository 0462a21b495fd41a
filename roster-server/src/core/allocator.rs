//! Department display-code allocation
//!
//! Codes are `{prefix}{seq:0width}` where `seq` is one past the highest
//! sequence number ever issued, tombstoned rows included. Counting active
//! rows instead would reissue the code of a live department as soon as an
//! older one is deleted.
//!
//! Two concurrent creators may read the same maximum. The loser hits
//! `departments_seq_key` (or `departments_code_active_key`) on insert or
//! commit; [`is_collision`] recognises that and the caller re-runs the whole
//! creating transaction.

use crate::store::{StoreError, StoreResult, StoreTx, constraints};

pub const DEFAULT_PREFIX: &str = "DEP-";
pub const DEFAULT_WIDTH: usize = 2;

/// Sequence number and the code derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub seq: i64,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct SequentialCodeAllocator {
    prefix: String,
    width: usize,
}

impl Default for SequentialCodeAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_WIDTH)
    }
}

impl SequentialCodeAllocator {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    pub fn format(&self, seq: i64) -> String {
        format!("{}{:0width$}", self.prefix, seq, width = self.width)
    }

    /// Sequence number of a well-formed code
    ///
    /// Only the canonical form is accepted: `DEP-7` and `DEP-007` are
    /// rejected when the width is 2.
    pub fn parse(&self, code: &str) -> Option<i64> {
        let digits = code.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let seq: i64 = digits.parse().ok()?;
        (seq > 0 && self.format(seq) == code).then_some(seq)
    }

    /// Read the highest issued sequence inside `tx` and derive the next code
    pub async fn allocate(&self, tx: &mut dyn StoreTx) -> StoreResult<Allocation> {
        let seq = tx.max_department_seq().await? + 1;
        Ok(Allocation {
            seq,
            code: self.format(seq),
        })
    }
}

/// Whether a store failure means another creator took the same sequence
pub fn is_collision(err: &StoreError) -> bool {
    matches!(
        err.violated_constraint(),
        Some(constraints::DEPARTMENT_SEQ | constraints::DEPARTMENT_CODE_ACTIVE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewDepartment, RecordStore};

    #[test]
    fn test_format_pads_to_width() {
        let allocator = SequentialCodeAllocator::default();
        assert_eq!(allocator.format(1), "DEP-01");
        assert_eq!(allocator.format(42), "DEP-42");
        assert_eq!(allocator.format(123), "DEP-123");
    }

    #[test]
    fn test_parse_accepts_canonical_codes_only() {
        let allocator = SequentialCodeAllocator::default();
        assert_eq!(allocator.parse("DEP-07"), Some(7));
        assert_eq!(allocator.parse("DEP-123"), Some(123));
        assert_eq!(allocator.parse("DEP-7"), None);
        assert_eq!(allocator.parse("DEP-007"), None);
        assert_eq!(allocator.parse("DEP-00"), None);
        assert_eq!(allocator.parse("DEP-"), None);
        assert_eq!(allocator.parse("DEP-1a"), None);
        assert_eq!(allocator.parse("dep-01"), None);
    }

    #[test]
    fn test_custom_prefix() {
        let allocator = SequentialCodeAllocator::new("TEAM-", 3);
        assert_eq!(allocator.format(5), "TEAM-005");
        assert_eq!(allocator.parse("TEAM-005"), Some(5));
    }

    #[test]
    fn test_collision_detection() {
        let seq = StoreError::UniqueViolation {
            constraint: constraints::DEPARTMENT_SEQ.to_string(),
        };
        let identity = StoreError::UniqueViolation {
            constraint: constraints::EMPLOYEE_IDENTITY_ACTIVE.to_string(),
        };
        assert!(is_collision(&seq));
        assert!(!is_collision(&identity));
        assert!(!is_collision(&StoreError::Database("timeout".into())));
    }

    #[tokio::test]
    async fn test_allocate_counts_tombstoned_rows() {
        let store = MemoryStore::new();
        let allocator = SequentialCodeAllocator::default();

        let mut tx = store.begin().await.unwrap();
        for seq in 1..=3 {
            let department = tx
                .insert_department(&NewDepartment {
                    seq,
                    code: allocator.format(seq),
                    account_id: 1,
                    name: "Dept".to_string(),
                    now: 1,
                })
                .await
                .unwrap();
            if seq == 3 {
                tx.tombstone_department(department.id, 2).await.unwrap();
            }
        }

        let next = allocator.allocate(tx.as_mut()).await.unwrap();
        assert_eq!(
            next,
            Allocation {
                seq: 4,
                code: "DEP-04".to_string()
            }
        );
    }
}
