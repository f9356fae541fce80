mod common;

use async_trait::async_trait;
use common::{create_request, TestApp};
use std::sync::{Arc, Mutex};
use tenancy_backend::domain::models::role::DEFAULT_ROLES;
use tenancy_backend::domain::models::tenant::TenantRecord;
use tenancy_backend::domain::ports::{
    DatabaseProvisioner, RoleRepository, SeedContext, SeedStep, UserRepository,
};
use tenancy_backend::error::AppError;
use tokio_util::sync::CancellationToken;

struct RecordingStep {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SeedStep for RecordingStep {
    async fn run(&self, ctx: &SeedContext, _cancel: &CancellationToken) -> Result<(), AppError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, ctx.tenant.id));
        Ok(())
    }
}

struct FailingStep;

#[async_trait]
impl SeedStep for FailingStep {
    async fn run(&self, _ctx: &SeedContext, _cancel: &CancellationToken) -> Result<(), AppError> {
        Err(AppError::Internal("Custom seed step exploded".to_string()))
    }
}

#[tokio::test]
async fn test_create_seeds_roles_and_admin_user() {
    let app = TestApp::new().await;

    app.state
        .tenant_service
        .create(
            create_request("acme", "Acme Co", "admin@acme.io"),
            CancellationToken::new(),
        )
        .await
        .expect("Create failed");

    for role_name in DEFAULT_ROLES {
        let role = app
            .state
            .role_repo
            .find_by_name("acme", role_name)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("Role {role_name} was not seeded"));
        assert!(role.description.contains("acme"));
    }

    let admin = app
        .state
        .user_repo
        .find_by_email("acme", "admin@acme.io")
        .await
        .unwrap()
        .expect("Admin user was not seeded");
    assert_eq!(admin.username, "admin");
    assert!(admin.email_confirmed);
    assert!(admin.phone_confirmed);
    assert!(admin.is_active);
    assert!(!admin.password_hash.is_empty());

    // Every default role except the reserved super-admin role.
    let assigned = app
        .state
        .user_repo
        .list_roles("acme", &admin.id)
        .await
        .unwrap();
    assert_eq!(assigned, vec!["Admin".to_string(), "Basic".to_string()]);
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let app = TestApp::new().await;

    app.state
        .tenant_service
        .create(
            create_request("acme", "Acme Co", "admin@acme.io"),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    // Re-running the pipeline against the already-seeded database must not
    // create duplicates and must not fail.
    let tenant = app.state.tenant_service.get_by_id("acme").await.unwrap();
    app.state
        .provisioner
        .initialize(&tenant, CancellationToken::new())
        .await
        .expect("Second seeding run failed");
    app.state
        .provisioner
        .initialize(&tenant, CancellationToken::new())
        .await
        .expect("Third seeding run failed");

    assert_eq!(app.state.role_repo.list("acme").await.unwrap().len(), 3);

    let admin = app
        .state
        .user_repo
        .find_by_email("acme", "admin@acme.io")
        .await
        .unwrap()
        .expect("Admin user missing after re-seed");
    let assigned = app
        .state
        .user_repo
        .list_roles("acme", &admin.id)
        .await
        .unwrap();
    assert_eq!(assigned.len(), 2, "Role assignments must not duplicate");
}

#[tokio::test]
async fn test_seeding_skips_admin_when_email_missing() {
    let app = TestApp::new().await;

    // Bypass the lifecycle service: a record with no admin email still gets
    // its baseline roles, just no administrator.
    let tenant = TenantRecord::new(
        "headless".to_string(),
        "Headless Co".to_string(),
        String::new(),
        String::new(),
        None,
    );
    app.state
        .provisioner
        .initialize(&tenant, CancellationToken::new())
        .await
        .expect("Seeding failed");

    assert_eq!(app.state.role_repo.list("headless").await.unwrap().len(), 3);
    let admin = app
        .state
        .user_repo
        .find_by_username("headless", "admin")
        .await
        .unwrap();
    assert!(admin.is_none(), "No admin should be seeded without an email");
}

#[tokio::test]
async fn test_custom_seed_steps_run_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let app = TestApp::with_seed_steps(vec![
        Arc::new(RecordingStep {
            name: "first",
            log: log.clone(),
        }),
        Arc::new(RecordingStep {
            name: "second",
            log: log.clone(),
        }),
    ])
    .await;

    app.state
        .tenant_service
        .create(
            create_request("acme", "Acme Co", "admin@acme.io"),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    let entries = log.lock().unwrap().clone();
    assert_eq!(entries, vec!["first:acme".to_string(), "second:acme".to_string()]);
}

#[tokio::test]
async fn test_failing_seed_step_surfaces_as_seeding_failure_and_compensates() {
    let app = TestApp::with_seed_steps(vec![Arc::new(FailingStep)]).await;

    let err = app
        .state
        .tenant_service
        .create(
            create_request("acme", "Acme Co", "admin@acme.io"),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        AppError::Provisioning { source, .. } => {
            assert!(
                matches!(*source, AppError::Seeding { .. }),
                "seeding failures surface inside the provisioning failure: {source:?}"
            );
        }
        other => panic!("Expected Provisioning error, got: {other:?}"),
    }

    // The tenant record was compensated away.
    assert!(!app
        .state
        .tenant_service
        .exists_by_id("acme")
        .await
        .unwrap());
}
