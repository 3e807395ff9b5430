use std::time::Duration;

use poll_core::{JobKey, JobStatus, StatusReport};
use poll_engine::{FailureKind, FetchSettings, ReqwestStatusFetcher, StatusFetcher};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> FetchSettings {
    FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    }
}

#[tokio::test]
async fn preview_poll_sends_job_id_and_decodes_done() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview_poll"))
        .and(query_param("jobid", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job_info": { "jobstatus": "Done", "renderurl": "/img/42.png" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(settings_for(&server)).unwrap();
    let report = fetcher.fetch_status(&JobKey::preview("42")).await.expect("fetch ok");

    assert_eq!(report, StatusReport::done("/img/42.png"));
}

#[tokio::test]
async fn full_render_uses_status_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status_poll"))
        .and(query_param("jobid", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job_info": { "jobstatus": "Queued" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(settings_for(&server)).unwrap();
    let report = fetcher
        .fetch_status(&JobKey::full_render("7"))
        .await
        .expect("fetch ok");

    assert_eq!(report.status, JobStatus::InProgress("Queued".to_string()));
    assert_eq!(report.render_url, None);
}

#[tokio::test]
async fn server_error_is_reported_as_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview_poll"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(settings_for(&server)).unwrap();
    let err = fetcher.fetch_status(&JobKey::preview("1")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview_poll"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let fetcher = ReqwestStatusFetcher::new(settings_for(&server)).unwrap();
    let err = fetcher.fetch_status(&JobKey::preview("1")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn configured_request_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status_poll"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "job_info": { "jobstatus": "Queued" } })),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..settings_for(&server)
    };
    let fetcher = ReqwestStatusFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch_status(&JobKey::full_render("7"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_payload_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview_poll"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..settings_for(&server)
    };
    let fetcher = ReqwestStatusFetcher::new(settings).unwrap();
    let err = fetcher.fetch_status(&JobKey::preview("1")).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
}
