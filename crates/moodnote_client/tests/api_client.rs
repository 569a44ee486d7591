use moodnote_client::wire::remote_note_id;
use moodnote_client::{
    ApiClient, ClientConfig, ClientError, FileTokenStore, LabelCreate, MemoryTokenStore,
    NoteCreate, NoteUpdate, TokenStore, UserLogin,
};
use moodnote_core::{Mood, Note, NoteColor};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn note_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content": "so happy today",
        "note_type": "text",
        "is_pinned": false,
        "is_archived": false,
        "color": "white",
        "detected_mood": "happy",
        "mood_confidence": 0.45,
        "labels": ["daily"],
        "user_id": 1,
        "created_at": "2024-05-01T08:00:00"
    })
}

fn client_for(server: &MockServer, tokens: impl TokenStore + 'static) -> ApiClient {
    ApiClient::new(ClientConfig::with_base_url(&server.uri()), tokens).unwrap()
}

#[tokio::test]
async fn login_stores_token_and_later_calls_send_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "a@example.com",
            "username": "a",
            "access_token": "tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(header("authorization", "Bearer tok-123"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([note_json(1, "First")])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");
    let client = client_for(&server, FileTokenStore::new(&token_path));
    assert!(!client.is_authenticated().unwrap());

    let user = client
        .login(&UserLogin {
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.username, "a");
    assert!(client.is_authenticated().unwrap());
    assert_eq!(
        FileTokenStore::new(&token_path).load().unwrap().as_deref(),
        Some("tok-123")
    );

    let notes = client.list_notes(None, None).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "First");

    client.logout().unwrap();
    assert!(!client.is_authenticated().unwrap());
}

#[tokio::test]
async fn fetch_notes_converts_into_core_notes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([note_json(4, "Four"), note_json(5, "Five")])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::with_token("t"));
    let notes = client.fetch_notes().await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, remote_note_id(4));
    assert_eq!(notes[1].mood, Some(Mood::Happy));
    assert_eq!(notes[1].labels, vec!["daily"]);
}

#[tokio::test]
async fn create_update_and_delete_note() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_json(json!({
            "title": "Plan",
            "content": "write things down",
            "note_type": "text",
            "is_pinned": false,
            "is_archived": false,
            "color": "rose"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(9, "Plan")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notes/9"))
        .and(body_json(json!({"is_pinned": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(9, "Plan")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/notes/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Note deleted successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::with_token("t"));
    let mut note = Note::new("Plan", "write things down");
    note.color = NoteColor::Rose;

    let created = client.create_note(&NoteCreate::from(&note)).await.unwrap();
    assert_eq!(created.id, 9);

    let update = NoteUpdate {
        is_pinned: Some(true),
        ..NoteUpdate::default()
    };
    client.update_note(created.id, &update).await.unwrap();

    let deleted = client.delete_note(created.id).await.unwrap();
    assert_eq!(deleted.message, "Note deleted successfully");
}

#[tokio::test]
async fn backend_detail_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/notes/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Note not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::new());

    let err = client
        .update_note(404, &NoteUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Note not found");

    let err = client.list_labels().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn requests_without_token_omit_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "message": "Notes App API is running",
            "database": "connected",
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::new());
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.database.as_deref(), Some("connected"));
}

#[tokio::test]
async fn link_preview_caches_success_and_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/link-preview"))
        .and(query_param("url", "https://ok.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://ok.example",
            "title": "OK",
            "site_name": "Example"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/link-preview"))
        .and(query_param("url", "https://bad.example"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Failed to fetch preview: timeout"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::new());

    for _ in 0..2 {
        let preview = client.link_preview("https://ok.example").await.unwrap();
        assert_eq!(preview.title.as_deref(), Some("OK"));
    }
    for _ in 0..2 {
        match client.link_preview("https://bad.example").await {
            Err(ClientError::LinkPreview { message, .. }) => {
                assert_eq!(message, "Failed to fetch preview: timeout");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[tokio::test]
async fn uploads_send_multipart_file_and_check_mime() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/image"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"cat.png\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"file_url": "/uploads/images/cat.png"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::with_token("t"));
    let uploaded = client
        .upload_image("cat.png", "image/png", b"png-bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(uploaded.file_url, "/uploads/images/cat.png");
    assert_eq!(uploaded.filename, None);

    let err = client
        .upload_audio("cat.png", "image/png", b"png-bytes".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::UnsupportedMedia {
            expected: "audio/",
            ..
        }
    ));
}

#[tokio::test]
async fn labels_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/labels"))
        .and(body_json(json!({"name": "ideas", "color": "blue"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "name": "ideas",
            "color": "blue",
            "user_id": 1,
            "created_at": "2024-05-01T08:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStore::with_token("t"));
    let created = client
        .create_label(&LabelCreate::new("ideas", None))
        .await
        .unwrap();
    let label = created.into_label().unwrap();
    assert_eq!(label.name, "ideas");
    assert_eq!(label.color, NoteColor::Blue);
}
