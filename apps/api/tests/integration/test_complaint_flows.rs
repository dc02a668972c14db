use super::helpers::{
    empty_request, expect_status, json_request, login_admin, read_json, send, signup_student,
    spawn_app, submit,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

const LIBRARY_WIFI: &str = "Library wifi disconnects during exams";
const EXAM_WIFI: &str = "Exam week wifi connectivity drops";
const HOSTEL_COOLER: &str = "Hostel water cooler broken";

fn entries_in_cluster<'a>(board: &'a Value, cluster_id: &Value) -> Vec<&'a Value> {
    board["complaints"]
        .as_array()
        .expect("leaderboard complaints should be an array")
        .iter()
        .filter(|entry| &entry["cluster_id"] == cluster_id)
        .collect()
}

#[tokio::test]
async fn abusive_submission_bans_logs_and_stores_nothing() {
    let app = spawn_app().await;
    let (token, _) = signup_student(&app.app, "abuse").await;

    let res = expect_status(
        submit(&app.app, &token, "The fuck is this wifi").await,
        StatusCode::FORBIDDEN,
    )
    .await;
    let body: Value = read_json(res).await;
    assert!(
        body["error"]
            .as_str()
            .expect("missing error message")
            .contains("suspended for 48 hours")
    );
    assert!(body["banned_until"].is_string(), "ban expiry should be reported");

    let me = expect_status(
        send(&app.app, empty_request("GET", "/api/v1/auth/me", Some(&token))).await,
        StatusCode::OK,
    )
    .await;
    let me: Value = read_json(me).await;
    assert_eq!(me["banned_until"], body["banned_until"]);

    // A clean follow-up is still refused while the ban runs.
    let res = expect_status(
        submit(&app.app, &token, LIBRARY_WIFI).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Your account is temporarily banned");

    let admin = login_admin(&app.app).await;
    let dashboard = expect_status(
        send(
            &app.app,
            empty_request("GET", "/api/v1/admin/dashboard", Some(&admin)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let dashboard: Value = read_json(dashboard).await;
    assert_eq!(dashboard["stats"]["complaints"]["total"], 0);
    assert_eq!(dashboard["stats"]["abuse_logs"], 1);
    let logs = dashboard["abuse_logs"].as_array().expect("abuse logs array");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["flagged_text"], "The fuck is this wifi");
    assert!(
        logs[0]["detected_words"]
            .as_array()
            .expect("detected words array")
            .iter()
            .any(|w| w == "fuck")
    );
}

#[tokio::test]
async fn low_overlap_complaint_opens_a_second_cluster() {
    let app = spawn_app().await;
    app.analyzer.script(LIBRARY_WIFI, &["wifi", "library", "exams"]);
    app.analyzer.script(EXAM_WIFI, &["wifi", "exam", "connectivity"]);
    let (token, _) = signup_student(&app.app, "wifi").await;

    let first = expect_status(submit(&app.app, &token, LIBRARY_WIFI).await, StatusCode::CREATED).await;
    let first: Value = read_json(first).await;
    assert!(first["cluster_id"].is_string());
    assert_eq!(first["similar_complaints_count"], 1);
    assert_eq!(first["urgency"], "normal");

    let second = expect_status(submit(&app.app, &token, EXAM_WIFI).await, StatusCode::CREATED).await;
    let second: Value = read_json(second).await;
    assert!(second["cluster_id"].is_string());
    assert_ne!(first["cluster_id"], second["cluster_id"]);
    assert_eq!(second["similar_complaints_count"], 1);
}

#[tokio::test]
async fn ten_actives_turn_urgent_and_resolving_one_drops_back() {
    let app = spawn_app().await;
    app.analyzer.script(HOSTEL_COOLER, &["hostel", "water", "cooler"]);
    let (token, _) = signup_student(&app.app, "cooler").await;

    let mut last = Value::Null;
    for _ in 0..10 {
        let res = expect_status(submit(&app.app, &token, HOSTEL_COOLER).await, StatusCode::CREATED).await;
        last = read_json(res).await;
    }
    assert_eq!(last["similar_complaints_count"], 10);
    assert_eq!(last["urgency"], "urgent");
    let cluster_id = last["cluster_id"].clone();

    let board = expect_status(
        send(&app.app, empty_request("GET", "/api/v1/leaderboard", None)).await,
        StatusCode::OK,
    )
    .await;
    let board: Value = read_json(board).await;
    let members = entries_in_cluster(&board, &cluster_id);
    assert_eq!(members.len(), 10);
    assert!(members.iter().all(|m| m["urgency"] == "urgent"));
    assert!(members.iter().all(|m| m["similar_complaints_count"] == 10));
    assert_eq!(board["stats"]["urgent"], 10);

    let admin = login_admin(&app.app).await;
    let target = members[0]["id"].as_str().expect("complaint id").to_string();
    let solved = expect_status(
        send(
            &app.app,
            empty_request(
                "PUT",
                &format!("/api/v1/complaints/{}/solve", target),
                Some(&admin),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let solved: Value = read_json(solved).await;
    assert_eq!(solved["solved"], true);
    assert_eq!(solved["status"], "solved");
    assert_eq!(solved["urgency"], "normal");

    let board = expect_status(
        send(&app.app, empty_request("GET", "/api/v1/leaderboard", None)).await,
        StatusCode::OK,
    )
    .await;
    let board: Value = read_json(board).await;
    let remaining: Vec<_> = entries_in_cluster(&board, &cluster_id)
        .into_iter()
        .filter(|m| m["solved"] == false)
        .collect();
    assert_eq!(remaining.len(), 9);
    assert!(remaining.iter().all(|m| m["urgency"] == "normal"));
    assert!(remaining.iter().all(|m| m["similar_complaints_count"] == 9));
}

#[tokio::test]
async fn submission_requires_auth_and_text() {
    let app = spawn_app().await;

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/complaints",
            None,
            json!({ "original_text": LIBRARY_WIFI }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (token, _) = signup_student(&app.app, "empty").await;
    let res = expect_status(submit(&app.app, &token, "").await, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Complaint text is required");
}

#[tokio::test]
async fn votes_and_reactions_toggle_and_show_on_leaderboard() {
    let app = spawn_app().await;
    let (token, _) = signup_student(&app.app, "voter").await;
    let created = expect_status(submit(&app.app, &token, HOSTEL_COOLER).await, StatusCode::CREATED).await;
    let created: Value = read_json(created).await;
    let id = created["id"].as_str().expect("complaint id");

    let like_uri = format!("/api/v1/complaints/{}/like", id);
    let liked = expect_status(
        send(&app.app, empty_request("POST", &like_uri, Some(&token))).await,
        StatusCode::OK,
    )
    .await;
    let liked: Value = read_json(liked).await;
    assert_eq!(liked["current"], "like");
    assert_eq!(liked["likes_count"], 1);

    let disliked = expect_status(
        send(
            &app.app,
            empty_request(
                "POST",
                &format!("/api/v1/complaints/{}/dislike", id),
                Some(&token),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let disliked: Value = read_json(disliked).await;
    assert_eq!(disliked["current"], "dislike");
    assert_eq!(disliked["likes_count"], 0);
    assert_eq!(disliked["dislikes_count"], 1);

    let react_uri = format!("/api/v1/complaints/{}/react", id);
    let reacted = expect_status(
        send(
            &app.app,
            json_request("POST", &react_uri, Some(&token), json!({ "emoji": "fire" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let reacted: Value = read_json(reacted).await;
    assert_eq!(reacted["added"], true);

    let res = send(
        &app.app,
        json_request("POST", &react_uri, Some(&token), json!({ "emoji": "party" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let board = expect_status(
        send(&app.app, empty_request("GET", "/api/v1/leaderboard", Some(&token))).await,
        StatusCode::OK,
    )
    .await;
    let board: Value = read_json(board).await;
    let entry = &board["complaints"][0];
    assert_eq!(entry["id"], id);
    assert_eq!(entry["user_disliked"], true);
    assert_eq!(entry["user_liked"], false);
    assert_eq!(entry["user_reactions"], json!(["fire"]));
    assert_eq!(entry["reactions"], json!([{ "emoji": "fire", "count": 1 }]));
}

#[tokio::test]
async fn only_owner_or_staff_can_delete() {
    let app = spawn_app().await;
    let (owner, _) = signup_student(&app.app, "owner").await;
    let (other, _) = signup_student(&app.app, "other").await;

    let created = expect_status(submit(&app.app, &owner, HOSTEL_COOLER).await, StatusCode::CREATED).await;
    let created: Value = read_json(created).await;
    let uri = format!("/api/v1/complaints/{}", created["id"].as_str().expect("id"));

    let res = send(&app.app, empty_request("DELETE", &uri, Some(&other))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    expect_status(
        send(&app.app, empty_request("DELETE", &uri, Some(&owner))).await,
        StatusCode::OK,
    )
    .await;

    let res = send(&app.app, empty_request("DELETE", &uri, Some(&owner))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
