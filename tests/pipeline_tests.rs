//! End-to-end pipeline tests: real codec, real HTTP, mock provider

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use iris::application::{DescriptionService, PipelineController, PipelineOptions, StateObserver};
use iris::domain::image::CapturedImage;
use iris::domain::language;
use iris::domain::pipeline::{FailureReason, PipelinePhase, PipelineState};
use iris::domain::provider::{ProviderKind, ProviderSettings};
use iris::infrastructure::{JpegPreprocessor, ReqwestTransport};

type Controller = PipelineController<JpegPreprocessor, ReqwestTransport>;

fn noisy_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        image::Rgb([next(), next(), next()])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn stairs_body() -> serde_json::Value {
    json!({
        "result": {
            "response": "Stairs ahead, five steps down",
            "usage": { "prompt_tokens": 812, "completion_tokens": 9, "total_tokens": 821 }
        }
    })
}

fn controller(server: &MockServer, locale: &str) -> (Arc<Controller>, Arc<Mutex<Vec<PipelinePhase>>>) {
    let settings = ProviderSettings::new(ProviderKind::WorkersAi, server.uri(), "test-key");
    let transport = ReqwestTransport::new(Duration::from_secs(30)).unwrap();
    let options = PipelineOptions {
        locale: locale.to_string(),
        ..PipelineOptions::default()
    };

    let phases = Arc::new(Mutex::new(Vec::new()));
    let observer: StateObserver = {
        let phases = Arc::clone(&phases);
        Arc::new(move |state: &PipelineState| phases.lock().unwrap().push(state.phase()))
    };

    let controller = PipelineController::new(
        JpegPreprocessor::new(),
        DescriptionService::new(transport, settings),
        options,
    )
    .with_observer(observer);

    (Arc::new(controller), phases)
}

#[tokio::test]
async fn capture_is_described() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stairs_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, phases) = controller(&server, "fr-FR");
    let state = controller
        .capture_received(CapturedImage::encoded(noisy_png(320, 240)))
        .await;

    match state {
        PipelineState::Done(result) => assert_eq!(result.text(), "Stairs ahead, five steps down"),
        other => panic!("expected Done, got {:?}", other),
    }
    assert_eq!(
        *phases.lock().unwrap(),
        vec![PipelinePhase::Preprocessing, PipelinePhase::Requesting, PipelinePhase::Done]
    );

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let system = body["messages"][0]["content"][0]["text"].as_str().unwrap();
    let image_url = body["messages"][1]["content"][0]["image_url"]["url"].as_str().unwrap();

    assert!(system.contains("Respond only in French."));
    assert!(image_url.starts_with("data:image/jpeg;base64,/9j/"));
}

#[tokio::test]
async fn undecodable_capture_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stairs_body()))
        .expect(0)
        .mount(&server)
        .await;

    let (controller, _) = controller(&server, "en");
    let state = controller
        .capture_received(CapturedImage::encoded(b"not a picture".to_vec()))
        .await;

    assert!(matches!(state, PipelineState::Failed(FailureReason::Encoding(_))));
}

#[tokio::test]
async fn provider_failure_maps_to_localized_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let (controller, _) = controller(&server, "es-MX");
    let state = controller
        .capture_received(CapturedImage::encoded(noisy_png(64, 64)))
        .await;

    match state {
        PipelineState::Failed(reason) => {
            assert_eq!(reason.user_message("es-MX"), language::fallback_message("es"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn second_capture_supersedes_slow_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": { "response": "stale answer" } }))
                .set_delay(Duration::from_secs(10)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stairs_body()))
        .mount(&server)
        .await;

    let (controller, phases) = controller(&server, "en");

    let first = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            controller
                .capture_received(CapturedImage::encoded(noisy_png(64, 64)))
                .await
        })
    };
    while controller.state().await.phase() != PipelinePhase::Requesting {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let second = controller
        .capture_received(CapturedImage::encoded(noisy_png(64, 64)))
        .await;

    assert_eq!(first.await.unwrap(), PipelineState::Cancelled);
    match second {
        PipelineState::Done(result) => assert_eq!(result.text(), "Stairs ahead, five steps down"),
        other => panic!("expected Done, got {:?}", other),
    }
    assert_eq!(
        *phases.lock().unwrap(),
        vec![
            PipelinePhase::Preprocessing,
            PipelinePhase::Requesting,
            PipelinePhase::Cancelled,
            PipelinePhase::Preprocessing,
            PipelinePhase::Requesting,
            PipelinePhase::Done,
        ]
    );
}

#[tokio::test]
async fn external_cancel_while_requesting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(stairs_body())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let (controller, _) = controller(&server, "en");
    let task = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            controller
                .capture_received(CapturedImage::encoded(noisy_png(64, 64)))
                .await
        })
    };
    while controller.state().await.phase() != PipelinePhase::Requesting {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    controller.cancel().await;

    let outcome = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("cancel should resolve promptly")
        .unwrap();
    assert_eq!(outcome, PipelineState::Cancelled);
    assert_eq!(controller.state().await, PipelineState::Cancelled);
    assert_eq!(controller.service().in_flight(), None);
}
