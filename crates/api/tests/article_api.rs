//! HTTP integration tests for articles, grades and revisions.
//!
//! These need a PostgreSQL `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{
    build_test_app, create_topic, create_user, delete, expect_json, get, post_empty, post_json,
    put_json, token_for,
};

/// Create an article through the API and return its JSON representation.
async fn create_article(pool: &PgPool, token: &str, topic_id: i64, body: &str) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/articles",
        token,
        json!({"topic_id": topic_id, "title": "Danube", "body": body, "fields": {"region": "EU"}}),
    )
    .await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_requires_topic(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let token = token_for(author.id);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/articles",
        &token,
        json!({"title": "No topic"}),
    )
    .await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/articles",
        &token,
        json!({"topic_id": 999_999, "title": "Unknown topic"}),
    )
    .await;
    expect_json(response, StatusCode::NOT_FOUND).await;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_ignores_protected_fields(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let topic_id = create_topic(&pool, "Rivers").await;
    let token = token_for(author.id);
    let article = create_article(&pool, &token, topic_id, "v1").await;
    let id = article["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/articles/{id}"),
        &token,
        json!({
            "title": "Danube river",
            "id": 77,
            "version": 40,
            "owner_id": 12,
            "topic_id": 13,
            "grades": [{"reviewer_id": 1, "reviewer_name": "x", "score": 1}],
            "fields": {"length_km": 2850}
        }),
    )
    .await;
    let updated = expect_json(response, StatusCode::OK).await["data"].clone();

    assert_eq!(updated["id"], id);
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["owner_id"], author.id);
    assert_eq!(updated["topic_id"], topic_id);
    assert_eq!(updated["title"], "Danube river");
    assert_eq!(updated["body"], "v1");
    assert_eq!(updated["fields"], json!({"region": "EU", "length_km": 2850}));
    assert_eq!(updated["grades"], json!([]));

    let history = expect_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/articles/{id}/revisions"),
            Some(&token),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let revisions = history["data"].as_array().unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0]["article_id"], id);
    assert_eq!(revisions[0]["version"], 1);
    assert_eq!(revisions[0]["title"], "Danube");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_owner_may_update_or_delete(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let other = create_user(&pool, "other").await;
    let topic_id = create_topic(&pool, "Rivers").await;
    let article = create_article(&pool, &token_for(author.id), topic_id, "v1").await;
    let uri = format!("/api/v1/articles/{}", article["id"]);

    let response = put_json(
        build_test_app(pool.clone()),
        &uri,
        &token_for(other.id),
        json!({"body": "hijacked"}),
    )
    .await;
    let body = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(body["code"], "FORBIDDEN");

    let response = delete(build_test_app(pool.clone()), &uri, &token_for(other.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(build_test_app(pool.clone()), &uri, &token_for(author.id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool.clone()), &uri, Some(&token_for(author.id))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grade_once_and_clear_on_edit(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let reviewer = create_user(&pool, "reviewer").await;
    let topic_id = create_topic(&pool, "Rivers").await;
    let article = create_article(&pool, &token_for(author.id), topic_id, "v1").await;
    let id = article["id"].as_i64().unwrap();
    let grades_uri = format!("/api/v1/articles/{id}/grades");

    let response = post_json(
        build_test_app(pool.clone()),
        &grades_uri,
        &token_for(reviewer.id),
        json!({"score": {"clarity": 4, "depth": 3}}),
    )
    .await;
    let graded = expect_json(response, StatusCode::CREATED).await["data"].clone();
    assert_eq!(graded["version"], 1);
    assert_eq!(graded["grades"][0]["reviewer_id"], reviewer.id);
    assert_eq!(graded["grades"][0]["reviewer_name"], "reviewer display");

    let response = post_json(
        build_test_app(pool.clone()),
        &grades_uri,
        &token_for(reviewer.id),
        json!({"score": 1}),
    )
    .await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/articles/{id}"),
        &token_for(author.id),
        json!({"body": "v2"}),
    )
    .await;
    let edited = expect_json(response, StatusCode::OK).await["data"].clone();
    assert_eq!(edited["grades"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_and_diff(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let reviewer = create_user(&pool, "reviewer").await;
    let topic_id = create_topic(&pool, "Rivers").await;
    let token = token_for(author.id);
    let article = create_article(&pool, &token, topic_id, "line one\nline two").await;
    let id = article["id"].as_i64().unwrap();

    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/articles/{id}"),
        &token,
        json!({"body": "line one\nline 2"}),
    )
    .await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/articles/{id}/grades"),
        &token_for(reviewer.id),
        json!({"score": 9}),
    )
    .await;

    let history = expect_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/articles/{id}/revisions"),
            Some(&token),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let revision_id = history["data"][0]["id"].as_i64().unwrap();

    let diff = expect_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/revisions/{revision_id}/diff"),
            Some(&token),
        )
        .await,
        StatusCode::OK,
    )
    .await["data"]
        .clone();
    assert_eq!(diff["revision_version"], 1);
    assert_eq!(diff["current_version"], 2);
    assert_eq!(
        diff["lines"],
        json!([
            {"change": "unchanged", "content": "line one"},
            {"change": "removed", "content": "line two"},
            {"change": "added", "content": "line 2"},
        ])
    );

    // Only the revision's owner may restore it.
    let response = post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/revisions/{revision_id}/restore"),
        &token_for(reviewer.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/revisions/{revision_id}/restore"),
        &token,
    )
    .await;
    let restored = expect_json(response, StatusCode::OK).await["data"].clone();
    assert_eq!(restored["version"], 3);
    assert_eq!(restored["body"], "line one\nline two");
    assert_eq!(restored["grades"].as_array().unwrap().len(), 1);

    let revision = expect_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/revisions/{revision_id}"),
            Some(&token),
        )
        .await,
        StatusCode::OK,
    )
    .await["data"]
        .clone();
    assert_eq!(revision["owner_name"], "author display");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_mine_and_pagination(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let topic_id = create_topic(&pool, "Rivers").await;
    for _ in 0..3 {
        create_article(&pool, &token_for(alice.id), topic_id, "a").await;
    }
    create_article(&pool, &token_for(bob.id), topic_id, "b").await;

    let all = expect_json(
        get(build_test_app(pool.clone()), "/api/v1/articles", Some(&token_for(bob.id))).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 4);

    let mine = expect_json(
        get(
            build_test_app(pool.clone()),
            "/api/v1/articles?mine=true",
            Some(&token_for(bob.id)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let mine = mine["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["owner_name"], "bob display");

    let page = expect_json(
        get(
            build_test_app(pool.clone()),
            "/api/v1/articles?limit=2&offset=3",
            Some(&token_for(bob.id)),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
}
