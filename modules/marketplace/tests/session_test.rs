//! Async session: latency, cancellation of dismissed views, double-submit
//! guard and the fallbacks of the mocked collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing_test::traced_test;

use marketplace::config::{LatencyConfig, MarketplaceConfig};
use marketplace::contract::model::{
    AuthRequest, JobListing, NewJob, NoticeKind, Screen, StudentProfile, SyncStatus, User,
    UserMode,
};
use marketplace::domain::auth::{DEMO_EMPLOYER, DEMO_PASSWORD, DEMO_STUDENT};
use marketplace::domain::error::{AuthError, DomainError};
use marketplace::domain::pending::ViewKind;
use marketplace::domain::ports::{BackendPort, TextGenerator};
use marketplace::domain::session::{
    DESCRIPTION_FALLBACK, DESCRIPTION_NO_KEY, PROFILE_SAVED, PROFILE_SYNC_FAILED, TITLE_REQUIRED,
};
use marketplace::domain::store::{PersistedStore, StorageKey};
use marketplace::infra::backend::MockBackend;
use marketplace::infra::storage::MemoryStore;
use marketplace::infra::textgen::TemplateGenerator;
use marketplace::{Session, Shell};

/// Backend whose profile sync can be made to fail.
struct ScriptedBackend {
    sync_ok: bool,
    saves: AtomicUsize,
}

#[async_trait]
impl BackendPort for ScriptedBackend {
    async fn login(&self, _email: &str, _password: &str) -> Option<User> {
        None
    }

    async fn save_profile(&self, _profile: &StudentProfile) -> bool {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.sync_ok
    }

    async fn fetch_profile(&self, _user_id: &str) -> Option<StudentProfile> {
        None
    }

    async fn post_job(&self, _job: &NewJob) -> Option<JobListing> {
        None
    }
}

/// Generator that always errors.
struct BrokenGenerator;

#[async_trait]
impl TextGenerator for BrokenGenerator {
    async fn job_description(&self, _title: &str, _company: &str) -> Result<String, DomainError> {
        Err(DomainError::generation("quota exceeded"))
    }

    async fn improve_bio(&self, _bio: &str) -> Result<String, DomainError> {
        Err(DomainError::generation("quota exceeded"))
    }
}

fn instant_config() -> MarketplaceConfig {
    MarketplaceConfig {
        latency: LatencyConfig::instant(),
        ..MarketplaceConfig::default()
    }
}

fn slow_config(ms: u64) -> MarketplaceConfig {
    MarketplaceConfig {
        latency: LatencyConfig {
            login_ms: ms,
            profile_ms: ms,
            post_job_ms: ms,
            generation_ms: ms,
        },
        ..MarketplaceConfig::default()
    }
}

fn build(
    config: MarketplaceConfig,
    backend: Arc<dyn BackendPort>,
    textgen: Arc<dyn TextGenerator>,
) -> (Session, PersistedStore) {
    let store = PersistedStore::new(Arc::new(MemoryStore::new()), config.key_prefix.clone());
    let shell = Shell::start(store.clone(), &config);
    (Session::new(shell, backend, textgen, config), store)
}

fn default_session(config: MarketplaceConfig) -> (Session, PersistedStore) {
    let backend = MockBackend::from_base_url(&config.api_base_url).expect("default url parses");
    let textgen = TemplateGenerator::new(Some("test-key".to_string()));
    build(config, Arc::new(backend), Arc::new(textgen))
}

fn job_form() -> NewJob {
    NewJob {
        title: "Kitchen Porter".to_string(),
        location: "Galway".to_string(),
        deadline: "2026-11-30".to_string(),
        description: "Evening shifts.".to_string(),
        ..NewJob::default()
    }
}

#[tokio::test]
async fn test_demo_accounts_sign_in_to_their_role() -> Result<()> {
    let (session, store) = default_session(instant_config());

    assert_eq!(
        session.sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD)).await?,
        Screen::Dashboard
    );
    assert_eq!(
        session.shell().user().map(|u| u.display_name().to_string()),
        Some("Global Ventures Ltd".to_string())
    );
    let persisted: Option<User> = store.load(&StorageKey::CurrentUser)?;
    assert_eq!(persisted.map(|u| u.mode), Some(UserMode::Employer));

    session.sign_out()?;
    assert_eq!(
        session.sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD)).await?,
        Screen::Feed
    );
    Ok(())
}

#[tokio::test]
async fn test_rejected_credentials_change_nothing() {
    let (session, store) = default_session(instant_config());

    let err = session
        .sign_in(AuthRequest::login(DEMO_STUDENT, "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::IncorrectPassword)));

    let err = session
        .sign_in(AuthRequest::login("no-at-sign", "secret123"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));

    assert!(session.shell().user().is_none());
    assert_eq!(store.load::<User>(&StorageKey::CurrentUser).unwrap(), None);
}

#[tokio::test]
async fn test_signup_creates_student() -> Result<()> {
    let (session, _) = default_session(instant_config());
    let mut req = AuthRequest::signup(UserMode::Student, "ciara@ucd.ie", "secret1");
    req.first_name = "Ciara".to_string();
    req.university = "University College Dublin".to_string();

    assert_eq!(session.sign_in(req).await?, Screen::Feed);
    let shell = session.shell();
    let user = shell.user().expect("signed in");
    assert!(user.student_id.as_deref().is_some_and(|id| id.starts_with("s-")));
    assert_eq!(user.display_name(), "Ciara");
    Ok(())
}

#[tokio::test]
async fn test_dismissed_auth_modal_drops_the_result() -> Result<()> {
    let (session, _) = default_session(slow_config(5_000));
    let session = Arc::new(session);
    session.open_view(ViewKind::AuthModal);
    assert!(session.shell().state().auth_modal_open);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move {
            session
                .sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.dismiss_view(ViewKind::AuthModal);

    let outcome = tokio::time::timeout(Duration::from_secs(2), pending).await??;
    assert!(matches!(outcome, Err(DomainError::Cancelled { op: "sign_in" })));
    assert!(session.shell().user().is_none());
    assert!(!session.shell().state().auth_modal_open);
    assert!(!session.is_pending("sign_in"));
    Ok(())
}

#[tokio::test]
async fn test_double_submit_is_rejected() -> Result<()> {
    let (session, _) = default_session(slow_config(300));
    let session = Arc::new(session);

    let first = {
        let session = session.clone();
        tokio::spawn(async move {
            session
                .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(session.is_pending("sign_in"));

    let second = session
        .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
        .await;
    assert!(matches!(second, Err(DomainError::Busy { op: "sign_in" })));

    assert_eq!(first.await??, Screen::Dashboard);
    assert!(!session.is_pending("sign_in"));
    Ok(())
}

#[tokio::test]
async fn test_submit_job_validates_before_waiting() -> Result<()> {
    let (session, store) = default_session(slow_config(5_000));
    session.shell().login(harbour_bar())?;

    let bad = NewJob {
        deadline: "soon".to_string(),
        ..job_form()
    };
    let res = tokio::time::timeout(Duration::from_secs(1), session.submit_job(bad)).await?;
    assert!(matches!(res, Err(DomainError::Validation { .. })));
    assert_eq!(store.load::<Vec<JobListing>>(&StorageKey::Jobs)?, None);
    Ok(())
}

#[tokio::test]
async fn test_submit_job_posts_for_employer() -> Result<()> {
    let (session, _) = default_session(instant_config());
    session
        .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
        .await?;
    session.shell().request_screen(Screen::CreateJob);

    let listing = session.submit_job(job_form()).await?;
    assert_eq!(listing.company, "Global Ventures Ltd");
    assert_eq!(listing.logo, format!("https://picsum.photos/seed/{}/200", listing.id));

    let shell = session.shell();
    assert_eq!(shell.current_screen(), Screen::Dashboard);
    assert_eq!(shell.employer_jobs().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_students_cannot_submit_jobs() {
    let (session, _) = default_session(instant_config());
    session
        .sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD))
        .await
        .unwrap();
    assert!(matches!(
        session.submit_job(job_form()).await,
        Err(DomainError::WrongRole { .. })
    ));
}

#[tokio::test]
async fn test_profile_save_reports_sync_outcome() -> Result<()> {
    for (sync_ok, expected, text, kind) in [
        (true, SyncStatus::Synced, PROFILE_SAVED, NoticeKind::Success),
        (false, SyncStatus::Failed, PROFILE_SYNC_FAILED, NoticeKind::Error),
    ] {
        let backend = Arc::new(ScriptedBackend {
            sync_ok,
            saves: AtomicUsize::new(0),
        });
        let (session, store) = build(
            instant_config(),
            backend.clone(),
            Arc::new(TemplateGenerator::new(None)),
        );
        session
            .sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD))
            .await?;

        let mut profile = session.load_profile().await?;
        profile.phone = "+353 1 555 0100".to_string();
        assert_eq!(session.save_profile(&profile).await?, expected);
        assert_eq!(backend.saves.load(Ordering::SeqCst), 1);

        // The local copy is kept whatever the backend said.
        let stored: Option<StudentProfile> =
            store.load(&StorageKey::Profile(DEMO_STUDENT.to_string()))?;
        assert_eq!(stored, Some(profile));

        let notice = session.shell().dismiss_notice().expect("banner shown");
        assert_eq!(notice.kind, kind);
        assert_eq!(notice.text, text);
    }
    Ok(())
}

#[tokio::test]
async fn test_draft_description_fallbacks() -> Result<()> {
    let (configured, _) = default_session(instant_config());
    configured
        .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
        .await?;
    let text = configured.draft_description("Barista").await?;
    assert!(text.contains("Global Ventures Ltd"));

    let err = configured.draft_description("  ").await.unwrap_err();
    assert!(
        matches!(err, DomainError::Validation { ref message, .. } if message == TITLE_REQUIRED)
    );

    let backend = Arc::new(MockBackend::from_base_url("http://localhost:3001")?);
    let (no_key, _) = build(
        instant_config(),
        backend.clone(),
        Arc::new(TemplateGenerator::new(None)),
    );
    no_key
        .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
        .await?;
    assert_eq!(no_key.draft_description("Barista").await?, DESCRIPTION_NO_KEY);

    let (broken, _) = build(instant_config(), backend, Arc::new(BrokenGenerator));
    broken
        .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
        .await?;
    assert_eq!(broken.draft_description("Barista").await?, DESCRIPTION_FALLBACK);
    Ok(())
}

#[tokio::test]
async fn test_refine_bio_keeps_original_on_failure() -> Result<()> {
    let backend = Arc::new(MockBackend::from_base_url("http://localhost:3001")?);
    let (session, _) = build(instant_config(), backend, Arc::new(BrokenGenerator));
    session
        .sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD))
        .await?;

    let bio = "I like coffee and spreadsheets.";
    assert_eq!(session.refine_bio(bio).await?, bio);
    assert_eq!(session.refine_bio("").await?, "");
    Ok(())
}

#[tokio::test]
async fn test_dismissing_editor_cancels_refinement() -> Result<()> {
    let (session, _) = default_session(slow_config(5_000));
    session.shell().login(User {
        mode: UserMode::Student,
        email: "eoin@ul.ie".to_string(),
        student_id: Some("s-00002".to_string()),
        employer_id: None,
        token: "mock-jwt-token".to_string(),
        first_name: Some("Eoin".to_string()),
        last_name: None,
        university: Some("University of Limerick".to_string()),
        company_name: None,
    })?;
    let session = Arc::new(session);
    session.open_view(ViewKind::ProfileEditor);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.refine_bio("Hard working.").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.dismiss_view(ViewKind::ProfileEditor);

    let outcome = tokio::time::timeout(Duration::from_secs(2), pending).await??;
    assert!(matches!(outcome, Err(DomainError::Cancelled { op: "refine_bio" })));
    Ok(())
}

fn harbour_bar() -> User {
    User {
        mode: UserMode::Employer,
        email: "hr@harbour.ie".to_string(),
        student_id: None,
        employer_id: Some("e-00001".to_string()),
        token: "mock-jwt-token".to_string(),
        first_name: Some("Harbour Bar".to_string()),
        last_name: None,
        university: None,
        company_name: Some("Harbour Bar".to_string()),
    }
}

#[tokio::test]
async fn test_dismissed_create_job_posts_nothing() -> Result<()> {
    let (session, store) = default_session(slow_config(5_000));
    session.shell().login(harbour_bar())?;
    let session = Arc::new(session);
    session.open_view(ViewKind::CreateJob);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_job(job_form()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.dismiss_view(ViewKind::CreateJob);

    let outcome = tokio::time::timeout(Duration::from_secs(2), pending).await??;
    assert!(matches!(outcome, Err(DomainError::Cancelled { op: "post_job" })));
    assert!(session.shell().feed_jobs().is_empty());
    assert_eq!(store.load::<Vec<JobListing>>(&StorageKey::Jobs)?, None);
    assert!(!session.is_pending("post_job"));
    Ok(())
}

#[tokio::test]
async fn test_dismissed_editor_keeps_local_profile_and_skips_sync() -> Result<()> {
    let backend = Arc::new(ScriptedBackend {
        sync_ok: true,
        saves: AtomicUsize::new(0),
    });
    let (session, store) = build(
        slow_config(5_000),
        backend.clone(),
        Arc::new(TemplateGenerator::new(None)),
    );
    session.shell().login(User {
        mode: UserMode::Student,
        email: "aoife@dcu.ie".to_string(),
        student_id: Some("s-00003".to_string()),
        employer_id: None,
        token: "mock-jwt-token".to_string(),
        first_name: Some("Aoife".to_string()),
        last_name: None,
        university: Some("Dublin City University".to_string()),
        company_name: None,
    })?;
    let mut profile = session.shell().load_profile()?;
    profile.bio = "Weekend barista, weekday coder.".to_string();

    let session = Arc::new(session);
    session.open_view(ViewKind::ProfileEditor);
    let pending = {
        let session = session.clone();
        let profile = profile.clone();
        tokio::spawn(async move { session.save_profile(&profile).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.dismiss_view(ViewKind::ProfileEditor);

    let outcome = tokio::time::timeout(Duration::from_secs(2), pending).await??;
    assert_eq!(outcome?, SyncStatus::Abandoned);

    let stored: Option<StudentProfile> =
        store.load(&StorageKey::Profile("aoife@dcu.ie".to_string()))?;
    assert_eq!(stored.map(|p| p.bio), Some(profile.bio));
    assert_eq!(backend.saves.load(Ordering::SeqCst), 0);
    assert!(session.shell().state().notice.is_none());
    assert!(!session.is_pending("save_profile"));
    Ok(())
}

#[tokio::test]
async fn test_open_job_and_message() -> Result<()> {
    let (session, _) = default_session(instant_config());
    session
        .sign_in(AuthRequest::login(DEMO_EMPLOYER, DEMO_PASSWORD))
        .await?;
    let listing = session.submit_job(job_form()).await?;
    session.sign_out()?;

    session
        .sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD))
        .await?;
    assert_eq!(session.open_job(&listing.id)?.title, "Kitchen Porter");
    let msg = session.shell().send_message("Is this still open?")?;
    assert_eq!(msg.job_id, listing.id);
    assert_eq!(msg.student_name, "Test");

    session.dismiss_view(ViewKind::JobDetail);
    assert!(session.shell().selected_job().is_none());
    Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_mock_backend_logs_base_url() {
    let (session, _) = default_session(instant_config());
    session
        .sign_in(AuthRequest::login(DEMO_STUDENT, DEMO_PASSWORD))
        .await
        .unwrap();
    let profile = session.load_profile().await.unwrap();
    session.save_profile(&profile).await.unwrap();

    assert!(logs_contain("marketplace.session.sign_in"));
    assert!(logs_contain("http://localhost:3001/auth/login"));
    assert!(logs_contain("http://localhost:3001/profile"));
}
