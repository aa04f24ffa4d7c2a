//! A request either fully applies or leaves nothing behind.

use tether_tests::prelude::*;

#[test]
fn test_failed_second_child_rolls_back_everything() {
    // The second post's empty title fails the CHECK constraint.
    Scenario::new("atomicity")
        .step(
            "create_user_with_bad_post",
            create(
                "users",
                json!({"name": "a", "posts": {"create": [{"title": "ok"}, {"title": ""}]}}),
            ),
            |a| {
                a.error(ExpectedError::ConstraintViolation)
                    .error_at("input.posts.create[1]")
                    .error_matches("CHECK constraint failed")
                    .rows("users", 0)
                    .rows("posts", 0)
            },
        )
        .run()
        .unwrap();
}

#[test]
fn test_not_null_violation_names_forward_child() {
    Scenario::new("not_null")
        .step(
            "create_post_with_nameless_author",
            create("posts", json!({"title": "x", "author": {"create": {"email": "a@b.c"}}})),
            |a| {
                a.error(ExpectedError::ConstraintViolation)
                    .error_at("input.author.create")
                    .rows("users", 0)
                    .rows("posts", 0)
            },
        )
        .run()
        .unwrap();
}

#[test]
fn test_earlier_requests_survive_a_failed_one() {
    Scenario::new("isolation")
        .step("create_user", create("users", json!({"name": "a"})), |a| a.rows("users", 1))
        .step(
            "bad_post_after_success",
            create("users", json!({"name": "b", "email": "x@y.z", "posts": {"create": {"title": ""}}})),
            |a| a.error(ExpectedError::ConstraintViolation).rows("users", 1),
        )
        .run()
        .unwrap();
}
