mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn orphanage_manages_its_requirements() {
    let t = spawn_app().await;
    let (_, home_id, home_token) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let uri = format!("/orphanages/{home_id}/requirements");

    let (status, rice) = t
        .post_as(
            &uri,
            json!({ "name": "Rice", "quantity": "25", "category": "groceries" }),
            &home_token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rice["unit"], "kgs");
    assert_eq!(rice["quantity"], 25.0);
    assert_eq!(rice["category"], "groceries");

    let (status, pens) = t
        .post_as(
            &uri,
            json!({ "name": "Pens", "quantity": 100, "unit": "pcs", "category": "Stationary" }),
            &home_token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pens["category"], "stationery");

    let (status, milk) = t
        .post_as(&uri, json!({ "name": "Milk", "quantity": 2.5, "unit": "litres" }), &home_token)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(milk["category"], "general");

    let (status, body) = t.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = t.get(&format!("{uri}?category=stationery"), None).await;
    let only = body.as_array().unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0]["name"], "Pens");

    let (status, body) = t.get(&format!("{uri}?category=toys"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown category: toys");

    let (_, detail) = t.get(&format!("/orphanages/{home_id}"), None).await;
    assert_eq!(detail["requirements"].as_array().unwrap().len(), 3);

    let rice_uri = format!("{uri}/{}", rice["id"]);
    let (status, _) = t
        .request(Method::DELETE, &rice_uri, None, Some(&home_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = t
        .request(Method::DELETE, &rice_uri, None, Some(&home_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Requirement not found");
}

#[tokio::test]
async fn requirement_input_is_validated() {
    let t = spawn_app().await;
    let (_, home_id, home_token) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let uri = format!("/orphanages/{home_id}/requirements");

    let cases = [
        (json!({ "quantity": 3 }), "Please fill all fields"),
        (json!({ "name": "Rice" }), "Please fill all fields"),
        (json!({ "name": "Rice", "quantity": 0 }), "Quantity must be a positive number"),
        (json!({ "name": "Rice", "quantity": "lots" }), "Quantity must be a positive number"),
        (
            json!({ "name": "Rice", "quantity": 1, "unit": "tons" }),
            "Unit must be one of kgs, litres, pcs",
        ),
    ];
    for (payload, expected) in cases {
        let (status, body) = t.post_as(&uri, payload, &home_token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], expected);
    }
}

#[tokio::test]
async fn other_accounts_cannot_edit_requirements() {
    let t = spawn_app().await;
    let (_, home_id, _) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let (_, _, rival_token) = t
        .create_orphanage("rival@example.org", "Other Home", "Delhi")
        .await;
    let uri = format!("/orphanages/{home_id}/requirements");

    let (status, body) = t
        .post_as(&uri, json!({ "name": "Rice", "quantity": 1 }), &rival_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only the orphanage can manage its requirements");

    let (status, body) = t.post(&uri, json!({ "name": "Rice", "quantity": 1 })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn donation_request_lifecycle() {
    let t = spawn_app().await;
    let (_, home_id, home_token) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let (_, donor_token) = t.create_donor("asha@example.com", "Asha").await;

    let (status, created) = t
        .post_as(
            &format!("/orphanages/{home_id}/donation-requests"),
            json!({ "category": "books", "items": ["Atlas", "  ", "Story books"] }),
            &donor_token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["orphanageName"], "Hope Home");
    assert_eq!(created["donorName"], "Asha");
    assert_eq!(created["email"], "asha@example.com");
    assert_eq!(created["items"], json!(["Atlas", "Story books"]));
    let id = created["id"].as_i64().unwrap();

    let (status, mine) = t.get("/my/donation-requests", Some(&donor_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, incoming) = t
        .get("/donation-requests?status=pending", Some(&home_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(incoming.as_array().unwrap().len(), 1);
    assert_eq!(incoming[0]["id"], id);

    // donors cannot review
    let (status, _) = t
        .request(
            Method::POST,
            &format!("/donation-requests/{id}/approve"),
            None,
            Some(&donor_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // pending cannot jump to completed
    let (status, body) = t
        .request(
            Method::POST,
            &format!("/donation-requests/{id}/complete"),
            None,
            Some(&home_token),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Invalid status transition");

    for (action, expected) in [("approve", "approved"), ("complete", "completed")] {
        let (status, body) = t
            .request(
                Method::POST,
                &format!("/donation-requests/{id}/{action}"),
                None,
                Some(&home_token),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], expected);
    }

    let (status, _) = t
        .request(
            Method::POST,
            &format!("/donation-requests/{id}/reject"),
            None,
            Some(&home_token),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, pending) = t
        .get("/donation-requests?status=pending", Some(&home_token))
        .await;
    assert_eq!(pending, json!([]));
    let (_, done) = t
        .get("/donation-requests?status=completed", Some(&home_token))
        .await;
    assert_eq!(done.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_request_is_final() {
    let t = spawn_app().await;
    let (_, home_id, home_token) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let (_, donor_token) = t.create_donor("asha@example.com", "Asha").await;

    let (_, created) = t
        .post_as(
            &format!("/orphanages/{home_id}/donation-requests"),
            json!({ "category": "food", "items": ["Dal"] }),
            &donor_token,
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let reject = format!("/donation-requests/{id}/reject");
    let (status, body) = t
        .request(Method::POST, &reject, None, Some(&home_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (status, _) = t
        .request(
            Method::POST,
            &format!("/donation-requests/{id}/approve"),
            None,
            Some(&home_token),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn another_orphanage_cannot_review() {
    let t = spawn_app().await;
    let (_, home_id, _) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let (_, _, rival_token) = t
        .create_orphanage("rival@example.org", "Other Home", "Delhi")
        .await;
    let (_, donor_token) = t.create_donor("asha@example.com", "Asha").await;

    let (_, created) = t
        .post_as(
            &format!("/orphanages/{home_id}/donation-requests"),
            json!({ "category": "clothes", "items": ["Jackets"] }),
            &donor_token,
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = t
        .request(
            Method::POST,
            &format!("/donation-requests/{id}/approve"),
            None,
            Some(&rival_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Donation request belongs to another orphanage");

    let (_, incoming) = t.get("/donation-requests", Some(&rival_token)).await;
    assert_eq!(incoming, json!([]));
}

#[tokio::test]
async fn donation_request_input_is_validated() {
    let t = spawn_app().await;
    let (_, home_id, home_token) = t
        .create_orphanage("home@example.org", "Hope Home", "Chennai")
        .await;
    let (_, donor_token) = t.create_donor("asha@example.com", "Asha").await;
    let uri = format!("/orphanages/{home_id}/donation-requests");

    let (status, body) = t
        .post_as(&uri, json!({ "items": ["Rice"] }), &donor_token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Category is required");

    let (status, body) = t
        .post_as(&uri, json!({ "category": "books", "items": [" "] }), &donor_token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one item is required");

    let (status, _) = t
        .post_as(
            "/orphanages/9999/donation-requests",
            json!({ "category": "books", "items": ["Atlas"] }),
            &donor_token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = t
        .post_as(&uri, json!({ "category": "books", "items": ["Atlas"] }), &home_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only donors can submit donation requests");
}
