use crate::services::analysis::AnalysisError;
use crate::tests::common::{
    StubApi, count_documents, create_shared_test_db, create_test_db, create_test_user,
    document_service_with, get_credits,
};
use crate::utils::ApiError;

#[tokio::test]
async fn test_successful_analysis_stores_row_and_deducts_credit() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "a@example.com", 3).await;
    let api = StubApi::replying("Looks fine overall. Score: 85");
    let service = document_service_with(pool.clone(), api.clone());

    let response = service
        .run_analysis(user_id, "Standard consulting agreement", "contract.txt", "llama70b")
        .await
        .expect("analysis should succeed");

    assert!(response.success);
    assert_eq!(response.remaining_credits, 2);
    assert_eq!(api.call_count(), 1);
    assert_eq!(count_documents(&pool, user_id).await, 1);

    let doc = service.get_document(user_id, &response.document_id).await.expect("stored");
    assert_eq!(doc.status, "completed");
    assert_eq!(doc.score, Some(85));
    assert_eq!(doc.risk_level, Some("low".to_string()));
    assert_eq!(doc.model_used, Some("llama70b".to_string()));
    assert_eq!(doc.analysis_results, Some("Looks fine overall. Score: 85".to_string()));
}

#[tokio::test]
async fn test_zero_credits_rejected_before_any_call() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "broke@example.com", 0).await;
    let api = StubApi::replying("Score: 85");
    let service = document_service_with(pool.clone(), api.clone());

    let err = service
        .run_analysis(user_id, "Some contract", "contract.txt", "llama70b")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InsufficientCredits));
    assert_eq!(api.call_count(), 0, "no outbound call without credits");
    assert_eq!(count_documents(&pool, user_id).await, 0);
}

#[tokio::test]
async fn test_missing_user_rejected() {
    let pool = create_test_db().await;
    let api = StubApi::replying("Score: 85");
    let service = document_service_with(pool, api.clone());

    let err = service.run_analysis(999, "text", "f.txt", "llama70b").await.unwrap_err();
    assert!(matches!(err, ApiError::UserNotFound));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_timeout_leaves_credits_and_history_untouched() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "t@example.com", 2).await;
    let api = StubApi::failing(AnalysisError::Timeout(25));
    let service = document_service_with(pool.clone(), api.clone());

    let err = service
        .run_analysis(user_id, "Long contract", "contract.txt", "llama70b")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AnalysisTimeout));
    assert_eq!(api.call_count(), 1, "one attempt, no retry");
    assert_eq!(get_credits(&pool, user_id).await, 2);
    assert_eq!(count_documents(&pool, user_id).await, 0);
}

#[tokio::test]
async fn test_upstream_failure_costs_nothing() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "u@example.com", 1).await;
    let api = StubApi::failing(AnalysisError::Upstream("upstream returned Bad Gateway".into()));
    let service = document_service_with(pool.clone(), api);

    let err = service.run_analysis(user_id, "text", "f.txt", "llama70b").await.unwrap_err();
    assert!(matches!(err, ApiError::UpstreamError(_)));
    assert_eq!(get_credits(&pool, user_id).await, 1);
}

#[tokio::test]
async fn test_empty_document_rejected_without_spend() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "e@example.com", 1).await;
    let api = StubApi::replying("Score: 85");
    let service = document_service_with(pool.clone(), api.clone());

    let err = service.run_analysis(user_id, "   \n\t  ", "f.txt", "llama70b").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(api.call_count(), 0);
    assert_eq!(get_credits(&pool, user_id).await, 1);
}

#[tokio::test]
async fn test_last_credit_spent_exactly_once() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "last@example.com", 1).await;
    let api = StubApi::replying("Score: 50");
    let service = document_service_with(pool.clone(), api.clone());

    let first = service.run_analysis(user_id, "contract", "f.txt", "llama70b").await;
    assert!(first.is_ok());
    assert_eq!(first.unwrap().remaining_credits, 0);

    let second = service.run_analysis(user_id, "contract", "f.txt", "llama70b").await;
    assert!(matches!(second.unwrap_err(), ApiError::InsufficientCredits));

    assert_eq!(get_credits(&pool, user_id).await, 0);
    assert_eq!(count_documents(&pool, user_id).await, 1);
}

#[tokio::test]
async fn test_concurrent_requests_cannot_overspend_last_credit() {
    // Shared-cache database with a multi-connection pool so the requests run
    // in genuinely concurrent transactions. All of them pass the precondition
    // read on a balance of one; the conditional decrement lets exactly one
    // commit and rolls the rest back.
    let pool = create_shared_test_db("overspend_guard").await;
    let user_id = create_test_user(&pool, "race@example.com", 1).await;
    let api = StubApi::replying("Score: 50");
    let service = document_service_with(pool.clone(), api);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.run_analysis(user_id, "contract", "f.txt", "llama70b").await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task completes").is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1, "only one request may spend the last credit");
    assert_eq!(get_credits(&pool, user_id).await, 0);
    assert_eq!(count_documents(&pool, user_id).await, 1);
}

#[tokio::test]
async fn test_keyword_fallback_reply_still_persists() {
    let pool = create_test_db().await;
    let user_id = create_test_user(&pool, "k@example.com", 1).await;
    // No numeric score anywhere; extraction falls back to keyword scoring
    let api = StubApi::replying("There is a serious concern with the indemnity clause.");
    let service = document_service_with(pool.clone(), api);

    let response =
        service.run_analysis(user_id, "contract", "f.txt", "llama70b").await.expect("persists");
    let doc = service.get_document(user_id, &response.document_id).await.expect("stored");
    assert_eq!(doc.score, Some(60));
    assert_eq!(doc.risk_level, Some("medium".to_string()));
}

#[tokio::test]
async fn test_listing_is_owner_scoped_and_newest_first() {
    let pool = create_test_db().await;
    let owner = create_test_user(&pool, "owner@example.com", 5).await;
    let other = create_test_user(&pool, "other@example.com", 5).await;
    let api = StubApi::replying("Score: 85");
    let service = document_service_with(pool.clone(), api);

    let first = service.run_analysis(owner, "first", "a.txt", "llama70b").await.expect("ok");
    service.run_analysis(other, "theirs", "b.txt", "llama70b").await.expect("ok");

    let docs = service.list_documents(owner).await.expect("list");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, first.document_id);

    // Another account's document id reads as absent, not forbidden
    let err = service.get_document(other, &first.document_id).await.unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound(_)));
}
