mod helpers;

use helpers::{progress_record, CannedResponse, FakeServer};
use persona_dashboard::error::ApiError;
use persona_dashboard::models::{BulkQuestionRequest, StreamRecord};
use persona_dashboard::workflow::{BulkRunPresenter, ProgressUpdate, RunReport, TickSnapshot};
use persona_dashboard::{
    AppError, BulkQuestionSource, BulkRunController, InterviewApi, PersonaApi, PersonaClient,
    RunOutcome,
};
use futures::TryStreamExt;

fn client(server: &FakeServer) -> PersonaClient {
    PersonaClient::with_http(reqwest::Client::new(), &server.base_url())
}

#[derive(Default)]
struct Collect {
    answers: Vec<String>,
    finished: bool,
}

impl BulkRunPresenter for Collect {
    fn on_progress(&mut self, update: &ProgressUpdate<'_>) {
        self.answers.push(update.event.answer.clone());
    }

    fn on_finished(&mut self, _report: &RunReport, _tick: &TickSnapshot) {
        self.finished = true;
    }
}

#[tokio::test]
async fn test_usage_success() {
    let server = FakeServer::start(vec![CannedResponse::json(
        200,
        r#"{"quota_pct_used": 12.5, "requests_today": 188, "rpd_limit": 1500,
            "rpm_current": 3, "rpm_limit": 15, "requests_remaining_today": 1312}"#,
    )])
    .await;

    let usage = client(&server).usage().await.unwrap();

    assert_eq!(usage.requests_today, 188);
    assert_eq!(usage.rpm_limit, Some(15));
    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/usage");
}

#[tokio::test]
async fn test_list_personas_sends_filter_query() {
    let server =
        FakeServer::start(vec![CannedResponse::json(200, r#"{"personas": [], "total": 0}"#)]).await;

    let list = client(&server)
        .list_personas(Some("東京都"), None)
        .await
        .unwrap();

    assert_eq!(list.total, 0);
    let path = &server.requests()[0].path;
    assert!(path.starts_with("/api/personas?prefecture="), "path: {}", path);
    assert!(!path.contains("region"));
}

#[tokio::test]
async fn test_interview_429_is_quota_error() {
    let server = FakeServer::start(vec![CannedResponse::json(
        429,
        r#"{"detail": "rate limited"}"#,
    )])
    .await;

    let err = client(&server)
        .interview("P-13-001", "こんにちは", &[])
        .await
        .unwrap_err();

    assert!(err.is_quota_exceeded());
    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/interview/P-13-001");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["message"], "こんにちは");
    assert_eq!(body["history"], serde_json::json!([]));
}

#[tokio::test]
async fn test_resource_exhausted_detail_is_quota_error() {
    let server = FakeServer::start(vec![CannedResponse::json(
        500,
        r#"{"detail": "Gemini error: 429 RESOURCE_EXHAUSTED"}"#,
    )])
    .await;

    let err = client(&server)
        .enhance_profile("P-13-001")
        .await
        .unwrap_err();

    assert!(err.is_quota_exceeded());
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_other_status_carries_detail() {
    let server = FakeServer::start(vec![CannedResponse::json(
        404,
        r#"{"detail": "Persona not found"}"#,
    )])
    .await;

    let err = client(&server).get_profile("P-99-999").await.unwrap_err();

    match &err {
        AppError::Api(ApiError::BadStatus { status, detail, .. }) => {
            assert_eq!(*status, 404);
            assert_eq!(detail, "Persona not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.to_string(), "サーバーエラー (404): Persona not found");
}

#[tokio::test]
async fn test_bulk_stream_with_split_multibyte_character() {
    let mut body = Vec::new();
    body.extend_from_slice(progress_record(1, 3, "賛成です").as_bytes());
    body.extend_from_slice(progress_record(2, 3, "反対です").as_bytes());
    body.extend_from_slice(progress_record(3, 3, "どちらでもない").as_bytes());
    body.extend_from_slice("event: done\ndata: {\"message\": \"完了\"}\n\n".as_bytes());

    // "賛" 的第一个字节之后切开
    let pos = String::from_utf8_lossy(&body).find('賛').unwrap() + 1;
    let (a, rest) = body.split_at(pos);
    let (b, c) = rest.split_at(rest.len() / 2);
    let server = FakeServer::start(vec![CannedResponse::stream(vec![
        a.to_vec(),
        b.to_vec(),
        c.to_vec(),
    ])])
    .await;

    let controller = BulkRunController::new(client(&server));
    let mut presenter = Collect::default();
    let outcome = controller
        .start_run("AI規制についてどう思いますか", Some("北海道"), &mut presenter)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    assert_eq!(presenter.answers, vec!["賛成です", "反対です", "どちらでもない"]);
    assert!(presenter.finished);
    assert_eq!(controller.state().results.len(), 3);

    let request = &server.requests()[0];
    assert_eq!(request.path, "/api/bulk-question");
    let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent["question"], "AI規制についてどう思いますか");
    assert_eq!(sent["prefecture_filter"], "北海道");
}

#[tokio::test]
async fn test_bulk_without_filter_omits_field() {
    let server = FakeServer::start(vec![CannedResponse::stream(vec![progress_record(
        1, 1, "はい",
    )
    .trim_end()
    .as_bytes()
    .to_vec()])])
    .await;

    let request = BulkQuestionRequest::new("質問", None);
    let records: Vec<StreamRecord> = client(&server)
        .open_bulk_question(&request)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    // 末尾没有换行的记录也会被解析
    assert_eq!(records.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
    assert!(sent.get("prefecture_filter").is_none());
}

#[tokio::test]
async fn test_bulk_non_success_fails_run_without_results() {
    let server = FakeServer::start(vec![CannedResponse::json(
        503,
        r#"{"detail": "service unavailable"}"#,
    )])
    .await;

    let controller = BulkRunController::new(client(&server));
    let mut presenter = Collect::default();
    let outcome = controller
        .start_run("質問", None, &mut presenter)
        .await
        .unwrap();

    match outcome {
        RunOutcome::Failed { report, error } => {
            assert_eq!(report.result_count, 0);
            assert_eq!(error.status(), Some(503));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!controller.is_running());
    assert!(presenter.answers.is_empty());
}
