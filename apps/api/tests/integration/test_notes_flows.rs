use super::helpers::{
    empty_request, expect_status, json_request, login_admin, read_json, send, signup_student,
    spawn_app,
};
use axum::{Router, http::StatusCode};
use serde_json::{Value, json};

async fn create_category(app: &Router, admin: &str, semester: i32) -> String {
    let res = expect_status(
        send(
            app,
            json_request(
                "POST",
                "/api/v1/admin/notes/categories",
                Some(admin),
                json!({ "branch": "cse", "semester": semester, "subject": "Data Structures" }),
            ),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["branch"], "CSE");
    body["id"].as_str().expect("category id").to_string()
}

async fn create_file(app: &Router, admin: &str, category_id: &str, title: &str, price: i32) -> Value {
    let res = expect_status(
        send(
            app,
            json_request(
                "POST",
                "/api/v1/admin/notes/files",
                Some(admin),
                json!({
                    "category_id": category_id,
                    "title": title,
                    "file_url": format!("https://files.campus.test/{}.pdf", title),
                    "price": price,
                }),
            ),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    read_json(res).await
}

#[tokio::test]
async fn first_semester_files_are_free() {
    let app = spawn_app().await;
    let admin = login_admin(&app.app).await;
    let (student, _) = signup_student(&app.app, "fresher").await;

    let category = create_category(&app.app, &admin, 1).await;
    let file = create_file(&app.app, &admin, &category, "linked-lists", 80).await;
    assert_eq!(file["is_free"], true);
    assert_eq!(file["price"], 0);
    assert!(file.get("file_url").is_none(), "download url must stay hidden");
    let file_id = file["id"].as_str().expect("file id");

    let access = expect_status(
        send(
            &app.app,
            empty_request(
                "GET",
                &format!("/api/v1/notes/files/{}/access", file_id),
                Some(&student),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let access: Value = read_json(access).await;
    assert_eq!(access["file_url"], "https://files.campus.test/linked-lists.pdf");

    let res = send(
        &app.app,
        json_request(
            "POST",
            &format!("/api/v1/notes/files/{}/purchase", file_id),
            Some(&student),
            json!({ "payment_proof": "https://proof.campus.test/1.png" }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn paid_file_unlocks_after_verification() {
    let app = spawn_app().await;
    let admin = login_admin(&app.app).await;
    let (student, student_id) = signup_student(&app.app, "buyer").await;

    let category = create_category(&app.app, &admin, 3).await;
    let file = create_file(&app.app, &admin, &category, "graphs", 50).await;
    assert_eq!(file["is_free"], false);
    let file_id = file["id"].as_str().expect("file id");
    let access_uri = format!("/api/v1/notes/files/{}/access", file_id);

    let listed = expect_status(
        send(
            &app.app,
            empty_request(
                "GET",
                &format!("/api/v1/notes/categories/{}/files", category),
                None,
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let listed: Value = read_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let res = send(&app.app, empty_request("GET", &access_uri, Some(&student))).await;
    let res = expect_status(res, StatusCode::FORBIDDEN).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Purchase required to access this file");

    let purchase = expect_status(
        send(
            &app.app,
            json_request(
                "POST",
                &format!("/api/v1/notes/files/{}/purchase", file_id),
                Some(&student),
                json!({ "payment_proof": "https://proof.campus.test/2.png" }),
            ),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let purchase: Value = read_json(purchase).await;
    assert_eq!(purchase["payment_status"], "pending");
    assert_eq!(purchase["buyer_id"], student_id);
    let purchase_id = purchase["id"].as_str().expect("purchase id");

    let pending = expect_status(
        send(
            &app.app,
            empty_request("GET", "/api/v1/admin/notes/purchases", Some(&admin)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let pending: Value = read_json(pending).await;
    assert_eq!(pending["files"][0]["id"], purchase_id);

    let verify_uri = format!("/api/v1/admin/notes/purchases/{}/verify", purchase_id);
    let res = send(
        &app.app,
        json_request("PUT", &verify_uri, Some(&admin), json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let verified = expect_status(
        send(
            &app.app,
            json_request("PUT", &verify_uri, Some(&admin), json!({ "status": "verified" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let verified: Value = read_json(verified).await;
    assert_eq!(verified["payment_status"], "verified");

    expect_status(
        send(&app.app, empty_request("GET", &access_uri, Some(&student))).await,
        StatusCode::OK,
    )
    .await;

    let mine = expect_status(
        send(&app.app, empty_request("GET", "/api/v1/me/purchases", Some(&student))).await,
        StatusCode::OK,
    )
    .await;
    let mine: Value = read_json(mine).await;
    assert_eq!(mine["files"].as_array().map(Vec::len), Some(1));
    assert_eq!(mine["bundles"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn verified_bundle_grants_access_to_its_files() {
    let app = spawn_app().await;
    let admin = login_admin(&app.app).await;
    let (student, _) = signup_student(&app.app, "bundler").await;

    let category = create_category(&app.app, &admin, 4).await;
    let trees = create_file(&app.app, &admin, &category, "trees", 40).await;
    let heaps = create_file(&app.app, &admin, &category, "heaps", 40).await;

    let bundle = expect_status(
        send(
            &app.app,
            json_request(
                "POST",
                "/api/v1/admin/notes/bundles",
                Some(&admin),
                json!({
                    "category_id": category,
                    "name": "Unit 3 pack",
                    "price": 60,
                    "discount_percentage": 25,
                    "file_ids": [trees["id"], heaps["id"]],
                }),
            ),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let bundle: Value = read_json(bundle).await;
    let bundle_id = bundle["id"].as_str().expect("bundle id");

    let bundles = expect_status(
        send(
            &app.app,
            empty_request(
                "GET",
                &format!("/api/v1/notes/categories/{}/bundles", category),
                None,
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let bundles: Value = read_json(bundles).await;
    assert_eq!(bundles[0]["id"], bundle_id);

    let purchase = expect_status(
        send(
            &app.app,
            json_request(
                "POST",
                &format!("/api/v1/notes/bundles/{}/purchase", bundle_id),
                Some(&student),
                json!({ "payment_proof": "https://proof.campus.test/3.png" }),
            ),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let purchase: Value = read_json(purchase).await;
    let purchase_id = purchase["id"].as_str().expect("purchase id");

    let heaps_access = format!(
        "/api/v1/notes/files/{}/access",
        heaps["id"].as_str().expect("file id")
    );
    let res = send(&app.app, empty_request("GET", &heaps_access, Some(&student))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    expect_status(
        send(
            &app.app,
            json_request(
                "PUT",
                &format!("/api/v1/admin/notes/bundle-purchases/{}/verify", purchase_id),
                Some(&admin),
                json!({ "status": "verified" }),
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let access = expect_status(
        send(&app.app, empty_request("GET", &heaps_access, Some(&student))).await,
        StatusCode::OK,
    )
    .await;
    let access: Value = read_json(access).await;
    assert_eq!(access["file_url"], "https://files.campus.test/heaps.pdf");
}

#[tokio::test]
async fn notes_management_is_staff_only() {
    let app = spawn_app().await;
    let (student, _) = signup_student(&app.app, "sneaky").await;

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/admin/notes/categories",
            Some(&student),
            json!({ "branch": "cse", "semester": 2, "subject": "Compilers" }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let categories = expect_status(
        send(&app.app, empty_request("GET", "/api/v1/notes/categories", None)).await,
        StatusCode::OK,
    )
    .await;
    let categories: Value = read_json(categories).await;
    assert_eq!(categories.as_array().map(Vec::len), Some(0));
}
