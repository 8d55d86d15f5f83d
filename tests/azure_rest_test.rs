use speech_trigger::synth::azure::{
    AzureSynthesizer, Credentials, OUTPUT_FORMAT, OUTPUT_FORMAT_HEADER, SUBSCRIPTION_KEY_HEADER,
};
use speech_trigger::synth::{SynthError, Synthesizer, UtteranceRequest};

fn credentials() -> Credentials {
    Credentials {
        subscription_key: "test-subscription-key".to_string(),
        region: "eastus".to_string(),
    }
}

fn hello_request() -> UtteranceRequest {
    UtteranceRequest::new("Hello", "en-US", "en-US-ChristopherNeural")
}

#[tokio::test]
async fn synthesize_posts_ssml_and_returns_the_audio_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/cognitiveservices/v1")
        .match_header(SUBSCRIPTION_KEY_HEADER, "test-subscription-key")
        .match_header(OUTPUT_FORMAT_HEADER, OUTPUT_FORMAT)
        .match_header("content-type", "application/ssml+xml")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("<speak version='1.0' xml:lang='en-US'>".to_string()),
            mockito::Matcher::Regex("xml:gender='Male'".to_string()),
            mockito::Matcher::Regex("name='en-US-ChristopherNeural'".to_string()),
            mockito::Matcher::Regex("Hello".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "audio/x-wav")
        .with_body(b"RIFF-audio-bytes")
        .create_async()
        .await;

    let synth = AzureSynthesizer::with_endpoint(
        credentials(),
        format!("{}/cognitiveservices/v1", server.url()),
    );

    let audio = synth
        .synthesize(&hello_request())
        .await
        .expect("synthesis should succeed");

    assert_eq!(audio.as_slice(), b"RIFF-audio-bytes");
    mock.assert_async().await;
}

#[tokio::test]
async fn synthesize_issues_exactly_one_request_per_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/cognitiveservices/v1")
        .with_status(200)
        .with_body(b"audio")
        .expect(1)
        .create_async()
        .await;

    let synth = AzureSynthesizer::with_endpoint(
        credentials(),
        format!("{}/cognitiveservices/v1", server.url()),
    );
    synth
        .synthesize(&hello_request())
        .await
        .expect("synthesis should succeed");

    mock.assert_async().await;
}

#[tokio::test]
async fn synthesize_surfaces_service_rejections() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/cognitiveservices/v1")
        .with_status(401)
        .with_body("invalid subscription key")
        .create_async()
        .await;

    let synth = AzureSynthesizer::with_endpoint(
        credentials(),
        format!("{}/cognitiveservices/v1", server.url()),
    );

    match synth.synthesize(&hello_request()).await {
        Err(SynthError::Service { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid subscription key"));
        }
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[tokio::test]
async fn synthesize_surfaces_transport_failures() {
    // Port 1 is never listening.
    let synth = AzureSynthesizer::with_endpoint(
        credentials(),
        "http://127.0.0.1:1/cognitiveservices/v1",
    );

    let err = synth
        .synthesize(&hello_request())
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, SynthError::Transport(_)));
}
