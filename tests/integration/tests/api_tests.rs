//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error_code, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn register(server: &TestServer) -> AuthResponse {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", None, &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn anonymous(server: &TestServer) -> String {
    let response = server.post_empty("/auth/anonymous", None).await.unwrap();
    let token: AnonymousTokenResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    token.token
}

async fn create_topic(server: &TestServer, token: &str, labels: &[&str]) -> TopicResponse {
    let request = CreateTopicRequest::with_options(labels);
    let response = server.post("/topics", Some(token), &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn vote(server: &TestServer, token: &str, topic_id: &str, option_index: usize) -> TopicResponse {
    let response = server
        .post(
            &format!("/topics/{topic_id}/vote"),
            Some(token),
            &CastVoteRequest { option_index },
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn comment(
    server: &TestServer,
    token: &str,
    topic_id: &str,
    request: &CreateCommentRequest,
) -> CommentResponse {
    let response = server
        .post(&format!("/topics/{topic_id}/comments"), Some(token), request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", None, &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(auth.user.nickname, request.nickname);
    assert_eq!(auth.user.role, "user");
    assert!(!auth.access_token.is_empty());

    let login = LoginRequest::from_register(&request);
    let response = server.post("/auth/login", None, &login).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.email.as_deref(), Some(request.email.as_str()));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/auth/register", None, &request).await.unwrap();

    let response = server.post("/auth/register", None, &request).await.unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        email: "nonexistent@example.com".to_string(),
        password: "wrongpass1".to_string(),
    };

    let response = server.post("/auth/login", None, &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_token_rotates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let request = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/auth/refresh", None, &request).await.unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!refreshed.access_token.is_empty());

    // The old refresh token was revoked
    let response = server.post("/auth/refresh", None, &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_me_requires_member_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/users/@me", None).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let anon = anonymous(&server).await;
    let response = server.get("/users/@me", Some(&anon)).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let auth = register(&server).await;
    let response = server.get("/users/@me", Some(&auth.access_token)).await.unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
}

#[tokio::test]
async fn test_my_topics_lists_own_topics() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let first = create_topic(&server, &auth.access_token, &["Yes", "No"]).await;
    let second = create_topic(&server, &auth.access_token, &["A", "B", "C"]).await;
    let other = register(&server).await;
    create_topic(&server, &other.access_token, &["Yes", "No"]).await;

    let response = server
        .get("/users/@me/topics", Some(&auth.access_token))
        .await
        .unwrap();
    let mine: Vec<TopicSummaryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<&str> = mine.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    assert!(mine.iter().all(|t| t.comment_count == 0 && t.total_votes == 0));

    let response = server.get("/users/@me/topics", None).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_delete_account_removes_topics_and_sessions() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", None, &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let own = create_topic(&server, &auth.access_token, &["Yes", "No"]).await;
    let writer = anonymous(&server).await;
    vote(&server, &writer, &own.id, 0).await;
    comment(&server, &writer, &own.id, &CreateCommentRequest::on_option(0, "agree")).await;

    let response = server.delete("/users/@me", &auth.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/topics/{}", own.id), None).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let login = LoginRequest::from_register(&request);
    let response = server.post("/auth/login", None, &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let refresh = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/auth/refresh", None, &refresh).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // Anonymous visitors have no account to delete
    let response = server.delete("/users/@me", &writer).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Topic Tests
// ============================================================================

#[tokio::test]
async fn test_create_topic_option_bounds() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let request = CreateTopicRequest::with_options(&["Only"]);
    let response = server
        .post("/topics", Some(&auth.access_token), &request)
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_OPTION_COUNT");

    let topic = create_topic(&server, &auth.access_token, &["A", "B", "C"]).await;
    assert_eq!(topic.options.len(), 3);
    assert_eq!(topic.total_votes, 0);
    assert!(topic.is_author);
    assert!(!topic.pinned);
}

#[tokio::test]
async fn test_list_topics_contains_new_topic() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let topic = create_topic(&server, &auth.access_token, &["Yes", "No"]).await;

    let response = server.get("/topics?category=politics", None).await.unwrap();
    let page: Paginated<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.pagination.page, 1);
    assert!(page.pagination.total >= 1);
    assert!(page.data.iter().any(|t| t["id"] == topic.id.as_str()));
}

// ============================================================================
// Vote and Comment Gate Tests
// ============================================================================

#[tokio::test]
async fn test_vote_gates_comments_and_blocks_cancel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let voter = anonymous(&server).await;

    let voted = vote(&server, &voter, &topic.id, 0).await;
    assert_eq!(voted.my_vote, Some(0));
    assert_eq!(voted.options[0].vote_count, 1);
    assert_eq!(voted.options[0].percentage, 100);

    // A second vote is refused
    let response = server
        .post(
            &format!("/topics/{}/vote", topic.id),
            Some(&voter),
            &CastVoteRequest { option_index: 1 },
        )
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_VOTED");

    // Commenting under the other option is refused
    let response = server
        .post(
            &format!("/topics/{}/comments", topic.id),
            Some(&voter),
            &CreateCommentRequest::on_option(1, "wrong side"),
        )
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "VOTE_REQUIRED");

    let posted = comment(
        &server,
        &voter,
        &topic.id,
        &CreateCommentRequest::on_option(0, "my side"),
    )
    .await;
    assert_eq!(posted.option_index, 0);
    assert!(posted.author.anonymous);

    // Cancelling after commenting is refused
    let response = server
        .delete(&format!("/topics/{}/vote", topic.id), &voter)
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body["error"]["code"], "COMMENT_ALREADY_POSTED");
    assert_eq!(body["error"]["message"], "cannot cancel: comment already posted");
}

#[tokio::test]
async fn test_cancel_vote_without_comment() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let voter = anonymous(&server).await;

    vote(&server, &voter, &topic.id, 1).await;

    let response = server
        .delete(&format!("/topics/{}/vote", topic.id), &voter)
        .await
        .unwrap();
    let cancelled: TopicResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(cancelled.my_vote, None);
    assert_eq!(cancelled.options[1].vote_count, 0);

    let response = server
        .delete(&format!("/topics/{}/vote", topic.id), &voter)
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "NO_ACTIVE_VOTE");
}

#[tokio::test]
async fn test_topic_author_comments_without_vote() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;

    let posted = comment(
        &server,
        &author.access_token,
        &topic.id,
        &CreateCommentRequest::on_option(1, "from the author"),
    )
    .await;
    assert!(posted.author.is_topic_author);
    assert_eq!(posted.author.name, author.user.nickname);
}

#[tokio::test]
async fn test_anonymous_labels_follow_first_comment_order() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;

    let first = anonymous(&server).await;
    let second = anonymous(&server).await;
    vote(&server, &first, &topic.id, 0).await;
    vote(&server, &second, &topic.id, 0).await;

    let a = comment(&server, &first, &topic.id, &CreateCommentRequest::on_option(0, "one")).await;
    let b = comment(&server, &second, &topic.id, &CreateCommentRequest::on_option(0, "two")).await;
    assert_eq!(a.author.name, "Anonymous1");
    assert_eq!(b.author.name, "Anonymous2");

    // Replies need no vote and keep the replier's label
    let reply = comment(&server, &author.access_token, &topic.id, &CreateCommentRequest::reply_to(&a.id, "thanks")).await;
    assert_eq!(reply.parent_id.as_deref(), Some(a.id.as_str()));
    assert_eq!(reply.option_index, 0);

    let response = server
        .get(&format!("/topics/{}/comments?option=0", topic.id), None)
        .await
        .unwrap();
    let page: Paginated<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let listed_first = page.data.iter().find(|c| c.id == a.id).unwrap();
    assert_eq!(listed_first.author.name, "Anonymous1");
    assert_eq!(listed_first.replies.len(), 1);
    assert!(!page.pagination.has_more);
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle_restores_tally() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let writer = anonymous(&server).await;
    vote(&server, &writer, &topic.id, 0).await;
    let posted = comment(&server, &writer, &topic.id, &CreateCommentRequest::on_option(0, "react to me")).await;

    let path = format!("/comments/{}/reactions", posted.id);

    let response = server
        .post(&path, Some(&author.access_token), &ReactRequest::new("thumbs_up"))
        .await
        .unwrap();
    let added: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(added.reaction.as_deref(), Some("thumbs_up"));
    assert_eq!(added.reactions.thumbs_up, 1);
    assert_eq!(added.score, 3);

    // Switching replaces the previous reaction
    let response = server
        .post(&path, Some(&author.access_token), &ReactRequest::new("💪"))
        .await
        .unwrap();
    let switched: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(switched.reactions.thumbs_up, 0);
    assert_eq!(switched.reactions.strong, 1);
    assert_eq!(switched.score, 2);

    // Same kind again removes it
    let response = server
        .post(&path, Some(&author.access_token), &ReactRequest::new("strong"))
        .await
        .unwrap();
    let removed: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(removed.reaction, None);
    assert_eq!(removed.score, 0);
    assert_eq!(
        removed.reactions.thumbs_up
            + removed.reactions.thumbs_down
            + removed.reactions.sad
            + removed.reactions.angry
            + removed.reactions.strong,
        0
    );
}

#[tokio::test]
async fn test_reaction_requires_matching_vote() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let writer = anonymous(&server).await;
    vote(&server, &writer, &topic.id, 0).await;
    let posted = comment(&server, &writer, &topic.id, &CreateCommentRequest::on_option(0, "side A")).await;

    let other_side = anonymous(&server).await;
    vote(&server, &other_side, &topic.id, 1).await;

    let response = server
        .post(
            &format!("/comments/{}/reactions", posted.id),
            Some(&other_side),
            &ReactRequest::new("thumbs_down"),
        )
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "VOTE_REQUIRED");
}

// ============================================================================
// Report and Moderation Tests
// ============================================================================

#[tokio::test]
async fn test_reports_blind_comment_until_admin_restore() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let writer = anonymous(&server).await;
    vote(&server, &writer, &topic.id, 0).await;
    let posted = comment(&server, &writer, &topic.id, &CreateCommentRequest::on_option(0, "controversial")).await;

    let path = format!("/comments/{}/report", posted.id);
    let mut last = None;
    for _ in 0..5 {
        let reporter = anonymous(&server).await;
        let response = server.post_empty(&path, Some(&reporter)).await.unwrap();
        let report: ReportResponse = assert_json(response, StatusCode::OK).await.unwrap();
        last = Some(report);
    }
    let last = last.unwrap();
    assert_eq!(last.report_count, 5);
    assert_eq!(last.visibility.as_deref(), Some("blinded"));

    // The same identity cannot report twice
    let response = server.post_empty(&path, Some(&writer)).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let response = server.post_empty(&path, Some(&writer)).await.unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_REPORTED");

    let response = server
        .get(&format!("/topics/{}/comments?option=0", topic.id), None)
        .await
        .unwrap();
    let page: Paginated<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let listed = page.data.iter().find(|c| c.id == posted.id).unwrap();
    assert!(listed.blinded);
    assert!(listed.body.is_none());

    // Only an admin can restore
    let restore = format!("/admin/comments/{}/restore", posted.id);
    let response = server.post_empty(&restore, Some(&author.access_token)).await.unwrap();
    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ADMIN_REQUIRED");

    let admin = register(&server).await;
    server.promote_to_admin(&admin.user.id).await.unwrap();

    let response = server.post_empty(&restore, Some(&admin.access_token)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get(&format!("/topics/{}/comments?option=0", topic.id), None)
        .await
        .unwrap();
    let page: Paginated<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let listed = page.data.iter().find(|c| c.id == posted.id).unwrap();
    assert!(!listed.blinded);
    assert_eq!(listed.body.as_deref(), Some("controversial"));
}

#[tokio::test]
async fn test_admin_pins_topic() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let admin = register(&server).await;
    server.promote_to_admin(&admin.user.id).await.unwrap();

    let response = server
        .put(
            &format!("/admin/topics/{}/pin", topic.id),
            &admin.access_token,
            &json!({ "pinned": true }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/topics/{}", topic.id), None).await.unwrap();
    let fetched: TopicResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(fetched.pinned);

    // Admins cannot demote themselves
    let response = server
        .put(
            &format!("/admin/users/{}/role", admin.user.id),
            &admin.access_token,
            &json!({ "role": "user" }),
        )
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "CANNOT_MODIFY_SELF");
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_comment_notifies_topic_author() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    let writer = anonymous(&server).await;
    vote(&server, &writer, &topic.id, 1).await;
    comment(&server, &writer, &topic.id, &CreateCommentRequest::on_option(1, "hello")).await;

    let response = server
        .get("/notifications", Some(&author.access_token))
        .await
        .unwrap();
    let list: NotificationListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.unread_count, 1);
    let notification = &list.notifications[0];
    assert_eq!(notification.kind, "comment");
    assert_eq!(notification.sender_name, "Anonymous");
    assert!(!notification.read);

    let response = server
        .post_empty(
            &format!("/notifications/{}/read", notification.id),
            Some(&author.access_token),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get("/notifications?unread_only=true", Some(&author.access_token))
        .await
        .unwrap();
    let list: NotificationListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.unread_count, 0);
    assert!(list.notifications.is_empty());
}

#[tokio::test]
async fn test_notifications_can_be_deleted() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = register(&server).await;
    let topic = create_topic(&server, &author.access_token, &["A", "B"]).await;
    for option_index in [0, 1] {
        let writer = anonymous(&server).await;
        vote(&server, &writer, &topic.id, option_index).await;
        comment(
            &server,
            &writer,
            &topic.id,
            &CreateCommentRequest::on_option(option_index, "hello"),
        )
        .await;
    }

    let response = server
        .get("/notifications", Some(&author.access_token))
        .await
        .unwrap();
    let list: NotificationListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.notifications.len(), 2);
    let path = format!("/notifications/{}", list.notifications[0].id);

    // Someone else cannot delete it
    let stranger = register(&server).await;
    let response = server.delete(&path, &stranger.access_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.delete(&path, &author.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = server.delete(&path, &author.access_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .delete("/notifications", &author.access_token)
        .await
        .unwrap();
    let cleared: ClearedNotificationsResponse =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(cleared.deleted, 1);

    let response = server
        .get("/notifications", Some(&author.access_token))
        .await
        .unwrap();
    let list: NotificationListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(list.notifications.is_empty());
    assert_eq!(list.unread_count, 0);
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_image() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .upload(Some("chart.png"), Some("image/png"), b"\x89PNG fake".to_vec())
        .await
        .unwrap();
    let uploaded: UploadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(uploaded.url.contains("/images/"));
    assert!(uploaded.url.ends_with("_chart.png"));
}

#[tokio::test]
async fn test_upload_errors_are_plain_text() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .upload(None, Some("image/png"), b"bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Missing file data");

    // A recognisable extension does not stand in for the content type
    let response = server
        .upload(Some("chart.png"), None, b"\x89PNG fake".to_vec())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Missing file data");

    let response = server
        .upload(Some("anim.gif"), Some("image/gif"), b"GIF89a".to_vec())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Unsupported file type");
}
