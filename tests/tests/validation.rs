//! Malformed input is rejected before any statement runs.

use tether_tests::prelude::*;

#[test]
fn test_create_and_connect_conflict() {
    Scenario::new("conflict")
        .seed("INSERT INTO users (id, name) VALUES (1, 'a');")
        .step(
            "create_and_connect_author",
            create(
                "posts",
                json!({"title": "x", "author": {"create": {"name": "b"}, "connectById": {"id": 1}}}),
            ),
            |a| {
                a.error(ExpectedError::Validation)
                    .error_at("input.author")
                    .rows("users", 1)
                    .rows("posts", 0)
            },
        )
        .run()
        .unwrap();
}

#[test]
fn test_unique_reverse_slot_conflict() {
    Scenario::new("profile_conflict")
        .step(
            "create_and_connect_profile",
            create(
                "users",
                json!({"name": "a", "profile": {"create": {"bio": "x"}, "connectByUserId": {"userId": 1}}}),
            ),
            |a| a.error(ExpectedError::Validation).error_at("input.profile").rows("users", 0),
        )
        .run()
        .unwrap();
}

#[test]
fn test_many_slot_allows_mixed_operations() {
    Scenario::new("mixed")
        .seed("INSERT INTO users (id, name) VALUES (1, 'a'); INSERT INTO posts (id, title, author_id) VALUES (5, 'old', 1);")
        .step(
            "create_and_connect_posts",
            create(
                "users",
                json!({"name": "b", "posts": {"create": [{"title": "new"}], "connectById": [{"id": 5}]}}),
            ),
            |a| a.inserted("posts", 1).updated("posts", 1),
        )
        .run()
        .unwrap();
}

#[test]
fn test_scalar_type_mismatch() {
    Scenario::new("codec")
        .step(
            "numeric_title",
            create("users", json!({"name": "a", "posts": {"create": [{"title": 12}]}})),
            |a| a.error(ExpectedError::Validation).error_at("input.posts.create[0].title").rows("users", 0),
        )
        .run()
        .unwrap();
}

#[test]
fn test_unknown_fields() {
    Scenario::new("unknown")
        .step(
            "unknown_attribute",
            create("users", json!({"name": "a", "nickname": "b"})),
            |a| a.error(ExpectedError::Validation).error_at("input.nickname"),
        )
        .step(
            "unknown_sub_operation",
            create("posts", json!({"title": "x", "author": {"upsert": {"name": "a"}}})),
            |a| a.error(ExpectedError::Validation).error_at("input.author.upsert"),
        )
        .step("unknown_table", create("comments", json!({})), |a| a.error(ExpectedError::Validation))
        .run()
        .unwrap();
}

#[test]
fn test_list_for_single_slot() {
    Scenario::new("shape")
        .step(
            "author_list",
            create("posts", json!({"title": "x", "author": {"create": [{"name": "a"}]}})),
            |a| a.error(ExpectedError::Validation).error_at("input.author.create"),
        )
        .run()
        .unwrap();
}
