use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photos_api::{ClientConfig, PhotoApiClient};
use photos_auth::{
    AuthGateway, GatewayConfig, Prompt, ProviderConfig, ProviderError, TokenCallback, TokenGrant,
    TokenProvider, TokenRequest,
};
use photosflix::cli::Command;
use photosflix::library::Library;
use photosflix::session::SessionState;
use photosflix::App;

/// Grants every request and records the prompt it was asked for.
#[derive(Default)]
struct RecordingProvider {
    prompts: Mutex<Vec<Prompt>>,
}

#[async_trait]
impl TokenProvider for RecordingProvider {
    fn initialize(&self, _config: &ProviderConfig) -> Result<(), ProviderError> {
        Ok(())
    }

    fn request_token(&self, request: TokenRequest, callback: TokenCallback) {
        self.prompts.lock().unwrap().push(request.prompt);
        callback.resolve(TokenGrant::new("live-token"));
    }

    async fn revoke(&self, _access_token: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}

async fn live_app(
    dir: &tempfile::TempDir,
    server: &MockServer,
    provider: Arc<RecordingProvider>,
) -> App<Vec<u8>> {
    Mock::given(method("GET"))
        .and(path("/albums"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "albums": [{"id": "real-1", "title": "Real album", "mediaItemsCount": "2"}]
        })))
        .mount(server)
        .await;

    let gateway = AuthGateway::new(provider, GatewayConfig::new("client-id", vec![]));
    let client = PhotoApiClient::new(
        Arc::new(gateway),
        ClientConfig {
            base_url: server.uri(),
            ..Default::default()
        },
    );
    let session = SessionState::load(dir.path()).await.unwrap();
    App::new(Library::with_client(client), session, Vec::new())
}

async fn demo_app(dir: &tempfile::TempDir) -> App<Vec<u8>> {
    let session = SessionState::load(dir.path()).await.unwrap();
    App::new(Library::demo(), session, Vec::new())
}

fn output(app: &App<Vec<u8>>) -> String {
    String::from_utf8(app.output().clone()).unwrap()
}

#[tokio::test]
async fn test_albums_lists_demo_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app(&dir).await;

    app.run(Command::Albums).await.unwrap();

    let out = output(&app);
    assert!(out.starts_with("6 albums (demo)"));
    assert!(out.contains("leonie"));
    assert!(out.contains("300 items"));
}

#[tokio::test]
async fn test_favorite_marks_album() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app(&dir).await;

    app.execute(Command::Favorite {
        album_id: "sport".into(),
    })
    .await
    .unwrap();
    app.execute(Command::Albums).await.unwrap();

    let out = output(&app);
    assert!(out.contains("Added to my list: sport"));
    assert!(out.lines().any(|l| l.starts_with('*') && l.contains("sport")));
    assert!(app.session().is_favorite("sport"));
}

#[tokio::test]
async fn test_play_records_resume_position() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app(&dir).await;

    app.execute(Command::Play {
        album_id: "misc".into(),
        interval_secs: 0,
        count: Some(3),
    })
    .await
    .unwrap();
    assert_eq!(app.session().resume_index("misc"), Some(2));

    // A second run picks up where the first stopped
    app.execute(Command::Play {
        album_id: "misc".into(),
        interval_secs: 0,
        count: Some(2),
    })
    .await
    .unwrap();
    assert_eq!(app.session().resume_index("misc"), Some(3));

    let out = output(&app);
    assert!(out.contains("[1/60]"));
    assert!(out.contains("[3/60]"));
    assert!(out.contains("[4/60]"));

    let reloaded = SessionState::load(dir.path()).await.unwrap();
    assert_eq!(reloaded.resume_index("misc"), Some(3));
}

#[tokio::test]
async fn test_items_of_unknown_album_use_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app(&dir).await;

    app.execute(Command::Items {
        album_id: "nowhere".into(),
    })
    .await
    .unwrap();

    assert!(output(&app).starts_with("60 items in nowhere"));
}

#[tokio::test]
async fn test_sign_in_without_live_api_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app(&dir).await;

    let err = app.execute(Command::SignIn).await.unwrap_err();
    assert!(err.to_string().contains("Live API disabled"));
}

#[tokio::test]
async fn test_shell_runs_commands_until_quit() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = demo_app(&dir).await;

    let script = b"favorite we\n\nmy-list\nbogus\nsign-in\nquit\nalbums\n";
    app.shell(&script[..]).await.unwrap();

    let out = output(&app);
    assert!(out.contains("Added to my list: we"));
    assert!(out.lines().any(|l| l == "we"));
    // Errors are reported without ending the session
    assert!(out.contains("Error: Configuration error: Live API disabled"));
    // Nothing after quit
    assert!(!out.contains("albums (demo)"));
}

#[tokio::test]
async fn test_run_signs_in_before_reading_live_data() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let provider = Arc::new(RecordingProvider::default());
    let mut app = live_app(&dir, &server, provider.clone())
        .await
        .force_consent(true);

    app.run(Command::Albums).await.unwrap();

    assert!(app.library().is_live());
    assert_eq!(*provider.prompts.lock().unwrap(), vec![Prompt::Consent]);
    let out = output(&app);
    assert!(out.starts_with("Signed in"));
    assert!(out.contains("1 albums (live)"));
    assert!(out.contains("real-1"));
}

#[tokio::test]
async fn test_run_skips_sign_in_for_local_commands() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let provider = Arc::new(RecordingProvider::default());
    let mut app = live_app(&dir, &server, provider.clone()).await;

    app.run(Command::MyList).await.unwrap();

    assert!(!app.library().is_live());
    assert!(provider.prompts.lock().unwrap().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(output(&app), "My list is empty\n");
}
