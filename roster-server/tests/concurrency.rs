mod common;

use std::collections::HashSet;

use common::{ACCOUNT_A, ACCOUNT_B, draft, manager, manager_with_attempts};
use roster_server::core::{LifecycleError, Page};
use roster_server::store::DepartmentFilter;

const CREATORS: u32 = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creators_get_distinct_codes() {
    // Each lost race means another creator committed, so CREATORS attempts always suffice
    let lifecycle = manager_with_attempts(CREATORS);

    let mut handles = Vec::new();
    for i in 0..CREATORS {
        let lifecycle = lifecycle.clone();
        let account = if i % 2 == 0 { ACCOUNT_A } else { ACCOUNT_B };
        handles.push(tokio::spawn(async move {
            lifecycle
                .create_department(account, &format!("Team {i:02}"))
                .await
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let department = handle.await.unwrap().unwrap();
        assert!(codes.insert(department.id), "code issued twice");
    }

    let expected: HashSet<String> = (1..=CREATORS).map(|n| format!("DEP-{n:02}")).collect();
    assert_eq!(codes, expected);

    let filter = DepartmentFilter {
        page: Page::new(Some(100), None),
        ..Default::default()
    };
    let listed = lifecycle.list_departments(ACCOUNT_A, &filter).await.unwrap().len()
        + lifecycle.list_departments(ACCOUNT_B, &filter).await.unwrap().len();
    assert_eq!(listed, CREATORS as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_identity_claims_admit_one() {
    let lifecycle = manager();
    lifecycle.create_department(ACCOUNT_A, "Alpha Team").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let lifecycle = lifecycle.clone();
        handles.push(tokio::spawn(async move {
            lifecycle
                .create_employee(ACCOUNT_A, &draft("E001", "DEP-01"))
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(LifecycleError::IdentityNumberExists(identity)) => assert_eq!(identity, "E001"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_attach_and_delete_never_both_succeed() {
    for round in 0..20 {
        let lifecycle = manager();
        lifecycle.create_department(ACCOUNT_A, "Alpha Team").await.unwrap();

        let attach = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move {
                lifecycle
                    .create_employee(ACCOUNT_A, &draft("E001", "DEP-01"))
                    .await
            })
        };
        let delete = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move { lifecycle.delete_department(ACCOUNT_A, "DEP-01").await })
        };

        let attach = attach.await.unwrap();
        let delete = delete.await.unwrap();
        match (attach, delete) {
            (Ok(_), Err(LifecycleError::DepartmentHasEmployees { .. })) => {}
            (Err(LifecycleError::UnknownDepartment(_)), Ok(())) => {}
            (attach, delete) => panic!("round {round}: attach={attach:?} delete={delete:?}"),
        }
    }
}
