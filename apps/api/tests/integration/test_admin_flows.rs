use super::helpers::{
    empty_request, expect_status, json_request, login_admin, read_json, send, signup_student,
    spawn_app, submit,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

const HOSTEL_COOLER: &str = "Hostel water cooler broken";

#[tokio::test]
async fn health_reports_memory_backend() {
    let app = spawn_app().await;
    let res = expect_status(
        send(&app.app, empty_request("GET", "/health", None)).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "memory");
}

#[tokio::test]
async fn staff_routes_reject_students_until_promoted() {
    let app = spawn_app().await;
    let admin = login_admin(&app.app).await;
    let (student, student_id) = signup_student(&app.app, "helper").await;

    let res = send(
        &app.app,
        empty_request("GET", "/api/v1/admin/dashboard", Some(&student)),
    )
    .await;
    let res = expect_status(res, StatusCode::FORBIDDEN).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Staff access required");

    let res = send(&app.app, empty_request("GET", "/api/v1/admin/dashboard", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(
        &app.app,
        json_request(
            "PUT",
            &format!("/api/v1/admin/users/{}/role", student_id),
            Some(&admin),
            json!({ "role": "overlord" }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    expect_status(
        send(
            &app.app,
            json_request(
                "PUT",
                &format!("/api/v1/admin/users/{}/role", student_id),
                Some(&admin),
                json!({ "role": "moderator" }),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    // The old token still works: staff status is read from storage.
    expect_status(
        send(
            &app.app,
            empty_request("GET", "/api/v1/admin/dashboard", Some(&student)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
}

#[tokio::test]
async fn admin_ban_blocks_submission_until_unban() {
    let app = spawn_app().await;
    let admin = login_admin(&app.app).await;
    let (student, student_id) = signup_student(&app.app, "banned").await;

    let res = expect_status(
        send(
            &app.app,
            json_request(
                "PUT",
                &format!("/api/v1/admin/users/{}/ban", student_id),
                Some(&admin),
                json!({ "hours": 2 }),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["success"], true);
    assert!(body["banned_until"].is_string());

    let res = submit(&app.app, &student, HOSTEL_COOLER).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    expect_status(
        send(
            &app.app,
            empty_request(
                "PUT",
                &format!("/api/v1/admin/users/{}/unban", student_id),
                Some(&admin),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    expect_status(
        submit(&app.app, &student, HOSTEL_COOLER).await,
        StatusCode::CREATED,
    )
    .await;
}

#[tokio::test]
async fn oversized_ban_is_a_bad_request() {
    let app = spawn_app().await;
    let admin = login_admin(&app.app).await;
    let (student, student_id) = signup_student(&app.app, "longban").await;

    expect_status(
        send(
            &app.app,
            json_request(
                "PUT",
                &format!("/api/v1/admin/users/{}/ban", student_id),
                Some(&admin),
                json!({ "hours": 10_000_000_000_i64 }),
            ),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;

    expect_status(
        submit(&app.app, &student, HOSTEL_COOLER).await,
        StatusCode::CREATED,
    )
    .await;
}

#[tokio::test]
async fn admin_edit_bulk_delete_and_recalculate() {
    let app = spawn_app().await;
    app.analyzer.script(HOSTEL_COOLER, &["hostel", "water", "cooler"]);
    let admin = login_admin(&app.app).await;
    let (student, _) = signup_student(&app.app, "bulk").await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let res = expect_status(
            submit(&app.app, &student, HOSTEL_COOLER).await,
            StatusCode::CREATED,
        )
        .await;
        let body: Value = read_json(res).await;
        ids.push(body["id"].as_str().expect("complaint id").to_string());
    }

    let edited = expect_status(
        send(
            &app.app,
            json_request(
                "PUT",
                &format!("/api/v1/admin/complaints/{}", ids[0]),
                Some(&admin),
                json!({ "original_text": "Hostel cooler leaking", "status": "solved" }),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let edited: Value = read_json(edited).await;
    assert_eq!(edited["original_text"], "Hostel cooler leaking");
    assert_eq!(edited["solved"], true);
    assert_eq!(edited["urgency"], "normal");

    let deleted = expect_status(
        send(
            &app.app,
            json_request(
                "DELETE",
                "/api/v1/admin/complaints/bulk",
                Some(&admin),
                json!({ "ids": [ids[1], ids[2]] }),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let deleted: Value = read_json(deleted).await;
    assert_eq!(deleted["deleted"], 2);

    let res = send(
        &app.app,
        json_request(
            "DELETE",
            "/api/v1/admin/complaints/bulk",
            Some(&admin),
            json!({ "ids": [] }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let recalculated = expect_status(
        send(
            &app.app,
            empty_request("POST", "/api/v1/admin/clusters/recalculate", Some(&admin)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let recalculated: Value = read_json(recalculated).await;
    assert_eq!(recalculated["clusters"], 1);

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
    assert_eq!(dashboard["stats"]["complaints"]["total"], 1);
    assert_eq!(dashboard["stats"]["complaints"]["solved"], 1);
    assert!(
        dashboard["users"]
            .as_array()
            .expect("users array")
            .iter()
            .all(|u| u.get("password_hash").is_none())
    );
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = spawn_app().await;
    let (student, _) = signup_student(&app.app, "rotate").await;

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/auth/change-password",
            Some(&student),
            json!({ "current_password": "wrong-pass", "new_password": "next-pass" }),
        ),
    )
    .await;
    let res = expect_status(res, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Current password is incorrect");

    expect_status(
        send(
            &app.app,
            json_request(
                "POST",
                "/api/v1/auth/change-password",
                Some(&student),
                json!({ "current_password": "student-pass", "new_password": "next-pass" }),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
}
