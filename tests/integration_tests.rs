// Integration tests for Role Scout

use mockito::{Matcher, Server};
use role_scout::core::{Orchestrator, RateLimiter};
use role_scout::models::{DetailRecord, SearchCriteria};
use role_scout::services::{
    DirectoryClient, EnrichmentClient, ResultStore, SearchClient, SimulatedDirectory,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn create_client(server: &Server) -> Arc<DirectoryClient> {
    Arc::new(
        DirectoryClient::new(
            server.url(),
            Some("secret".to_string()),
            "/search_people".to_string(),
            "/get_user_profile_by_username".to_string(),
            Duration::from_secs(5),
        )
        .unwrap(),
    )
}

fn porto_criteria() -> SearchCriteria {
    SearchCriteria {
        titles: vec!["VP of Business Development".to_string()],
        industries: vec!["SaaS".to_string()],
        locations: vec!["Porto, Portugal".to_string()],
        ..SearchCriteria::default()
    }
}

fn create_orchestrator(
    dir: &tempfile::TempDir,
    criteria: SearchCriteria,
    client: Arc<DirectoryClient>,
) -> Orchestrator {
    let store = ResultStore::new(
        dir.path().join("job_results.json"),
        dir.path().join("search_log.txt"),
    );
    Orchestrator::new(criteria, client.clone(), client, store)
        .with_rate_limiter(Arc::new(RateLimiter::unthrottled()))
}

async fn mock_single_hit(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/search_people")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("keywords".into(), "VP of Business Development SaaS".into()),
            Matcher::UrlEncoded("location".into(), "Porto, Portugal".into()),
            Matcher::UrlEncoded("start".into(), "0".into()),
        ]))
        .match_header("x-api-key", "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "data": {
                    "total": 1,
                    "items": [{"identifier": "sample-1", "displayName": "Sample One", "location": "Porto, Portugal"}]
                }
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_detail(server: &mut Server, location: &str) -> mockito::Mock {
    server
        .mock("GET", "/get_user_profile_by_username")
        .match_query(Matcher::UrlEncoded("username".into(), "sample-1".into()))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "data": {
                    "firstName": "Sample",
                    "lastName": "One",
                    "headline": "VP of Business Development",
                    "location": location,
                    "summary": "Building remote revenue teams",
                    "skills": ["SaaS"]
                }
            })
            .to_string(),
        )
        .create_async()
        .await
}

#[tokio::test]
async fn test_end_to_end_single_match() {
    let mut server = Server::new_async().await;
    let search = mock_single_hit(&mut server).await;
    let detail = mock_detail(&mut server, "Porto, Portugal").await;

    let dir = tempfile::tempdir().unwrap();
    let result = create_orchestrator(&dir, porto_criteria(), create_client(&server))
        .run()
        .await
        .unwrap();

    search.assert_async().await;
    detail.assert_async().await;

    assert_eq!(result.matches.len(), 1);
    let record = &result.matches[0];
    assert_eq!(record.title, "VP of Business Development");
    assert_eq!(record.industry, "SaaS");
    assert_eq!(record.location, "Porto, Portugal");
    assert_eq!(record.detail.location, "Porto, Portugal");
    assert!(record.detail.summary.contains("remote"));

    let written: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("job_results.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written["matches"][0]["detail"]["firstName"], "Sample");
    assert_eq!(written["totals"]["matches"], 1);
}

#[tokio::test]
async fn test_end_to_end_excluded_location() {
    let mut server = Server::new_async().await;
    let _search = mock_single_hit(&mut server).await;
    let _detail = mock_detail(&mut server, "Moscow, Russian Federation").await;

    let dir = tempfile::tempdir().unwrap();
    let result = create_orchestrator(&dir, porto_criteria(), create_client(&server))
        .run()
        .await
        .unwrap();

    assert!(result.matches.is_empty());
    assert_eq!(result.totals.hits_seen, 1);
}

#[tokio::test]
async fn test_server_error_becomes_failed_search() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/search_people")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let client = create_client(&server);
    let page = client.search("COO SaaS", "Lisbon", 0).await;

    assert!(!page.success);
    assert!(page.hits.is_empty());
    assert!(page.message.unwrap().contains("503"));
}

#[tokio::test]
async fn test_malformed_detail_becomes_failed_result() {
    let mut server = Server::new_async().await;
    let _detail = server
        .mock("GET", "/get_user_profile_by_username")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = create_client(&server);
    let result = client.get_details("sample-1").await;

    assert!(!result.success);
    assert_eq!(result.detail, DetailRecord::default());
    assert!(result.message.unwrap().contains("Failed to parse"));
}

#[tokio::test]
async fn test_api_level_failure_is_reported() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/search_people")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success": false, "message": "rate limited", "data": {"items": []}}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = create_orchestrator(&dir, porto_criteria(), create_client(&server))
        .run()
        .await
        .unwrap();

    assert!(result.matches.is_empty());
    assert_eq!(result.totals.dimensions_failed, 1);

    let log = std::fs::read_to_string(dir.path().join("search_log.txt")).unwrap();
    assert!(log.contains("rate limited"));
    assert!(log.contains("Search complete. Found 0 relevant profiles"));
}

#[tokio::test]
async fn test_repeated_runs_write_identical_matches() {
    let criteria = SearchCriteria {
        titles: vec!["COO".to_string(), "Head of Growth".to_string()],
        industries: vec!["SaaS".to_string()],
        locations: vec!["Porto".to_string(), "Moscow, Russia".to_string()],
        ..SearchCriteria::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let directory = Arc::new(SimulatedDirectory::new());
    let store = ResultStore::new(dir.path().join("results.json"), dir.path().join("log.txt"));
    let orchestrator = Orchestrator::new(criteria, directory.clone(), directory, store)
        .with_rate_limiter(Arc::new(RateLimiter::unthrottled()));

    let mut documents = Vec::new();
    for _ in 0..2 {
        orchestrator.run().await.unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("results.json")).unwrap(),
        )
        .unwrap();
        doc.as_object_mut().unwrap().remove("started_at");
        documents.push(serde_json::to_vec_pretty(&doc).unwrap());
    }

    assert_eq!(documents[0], documents[1]);
}

#[tokio::test]
async fn test_log_is_appended_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let directory = Arc::new(SimulatedDirectory::new());
    let store = ResultStore::new(dir.path().join("results.json"), dir.path().join("log.txt"));
    let orchestrator = Orchestrator::new(porto_criteria(), directory.clone(), directory, store)
        .with_rate_limiter(Arc::new(RateLimiter::unthrottled()));

    orchestrator.run().await.unwrap();
    let first = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
    orchestrator.run().await.unwrap();
    let second = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();

    assert!(second.starts_with(&first));
    assert_eq!(second.lines().count(), first.lines().count() * 2);
}
