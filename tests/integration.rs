use base64::Engine as _;
use std::sync::Arc;
use std::time::Duration;
use vsd_hotspots::{
    ai::{ChatService, MockChatClient, OpenAiChatClient},
    conversation::{Conversation, Message, RequestConfig, Role},
    generator::HotspotGenerator,
    image::{UploadService, UploadStore},
    models::Hotspot,
    Error,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPLY: &str =
    "Hotspot 1: Dog\n- Option 1: Pet\n- Option 2: Woof\nHotspot 2: Ball\n- Option 1: Throw\n";

fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn openai_client(server: &MockServer) -> Arc<dyn ChatService> {
    Arc::new(
        OpenAiChatClient::new("test-key".to_string(), Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri()),
    )
}

fn png_upload() -> String {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 200, 30]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[tokio::test]
async fn test_upload_to_hotspots_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_string_contains("\"max_tokens\":500"))
        .and(body_string_contains("data:image/png;base64,"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(REPLY)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let uploads = UploadStore::new(dir.path()).unwrap();
    let generator = HotspotGenerator::new(openai_client(&server), RequestConfig::default());

    let upload = uploads.save_upload(&png_upload()).await.unwrap();
    let image_path = upload.to_path_buf();
    let hotspots = generator.generate_hotspots(&upload).await.unwrap();
    drop(upload);

    assert_eq!(
        hotspots,
        vec![
            Hotspot {
                name: "Dog".to_string(),
                options: vec!["Pet".to_string(), "Woof".to_string()],
            },
            Hotspot {
                name: "Ball".to_string(),
                options: vec!["Throw".to_string()],
            },
        ]
    );

    let json = serde_json::to_value(&hotspots).unwrap();
    assert_eq!(json[0]["hotspotName"], "Dog");
    assert!(!image_path.exists());
}

#[tokio::test]
async fn test_remote_error_surfaces_from_generator() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("scene.png");
    std::fs::write(&image_path, [0x89, 0x50, 0x4E, 0x47]).unwrap();

    let generator = HotspotGenerator::new(openai_client(&server), RequestConfig::default());
    let err = generator.generate_hotspots(&image_path).await.unwrap_err();

    assert!(matches!(err, Error::RemoteCall(_)));
}

#[tokio::test]
async fn test_conversation_over_http_keeps_history_and_survives_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("first answer")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("first answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("second answer")))
        .mount(&server)
        .await;

    let mut conversation = Conversation::new(openai_client(&server), RequestConfig::default());

    assert_eq!(
        conversation.speak(Message::user("hello")).await.unwrap(),
        "first answer"
    );

    let err = conversation.speak(Message::user("more")).await.unwrap_err();
    assert!(matches!(err, Error::RemoteCall(_)));
    assert_eq!(conversation.transcript().len(), 2);

    assert_eq!(
        conversation.speak(Message::user("more")).await.unwrap(),
        "second answer"
    );
    let roles: Vec<Role> = conversation.transcript().iter().map(Message::role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}

#[tokio::test]
async fn test_branched_conversations_run_concurrently() {
    let mock = MockChatClient::new();
    let mut original = Conversation::new(Arc::new(mock.clone()), RequestConfig::default());
    original.speak(Message::user("start")).await.unwrap();

    let mut left = original.copy();
    let mut right = original.copy();

    let (a, b) = tokio::join!(
        left.speak(Message::user("left")),
        right.speak(Message::user("right"))
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(original.transcript().len(), 2);
    assert_eq!(left.transcript()[2].text(), "left");
    assert_eq!(right.transcript()[2].text(), "right");
    assert_eq!(mock.get_call_count(), 3);
}
