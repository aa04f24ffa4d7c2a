//! Opaque row identifiers as keys.

use tether_tests::prelude::*;

const SEED: &str = "
INSERT INTO users (id, name) VALUES (1, 'ann');
INSERT INTO posts (id, title, author_id) VALUES (10, 'hello', 1);
";

#[test]
fn test_node_id_round_trip() {
    // GIVEN the identifier of an existing user
    let scenario = Scenario::new("node_id").seed(SEED);
    let tether = scenario.tether().unwrap();
    let id = tether.node_id("users", &row! { "id" => 1i64 }).unwrap();

    // WHEN the user is patched by that identifier
    let conn = scenario
        .step(
            "rename_by_node_id",
            update_by_node_id("users", &id, json!({"name": "anne"})).returning(&["id", "name"]),
            |a| a.root("id", json!(1)).root("name", json!("anne")),
        )
        .run()
        .unwrap();

    // THEN the row changed
    assert_eq!(count_rows(&conn, "users").unwrap(), 1);
}

#[test]
fn test_connect_by_node_id() {
    Scenario::new("connect_by_node_id")
        .seed(SEED)
        .step(
            "post_for_ann",
            create(
                "posts",
                json!({"title": "t", "author": {"connectByNodeId": {"nodeId": "[\"users\",1]"}}}),
            ),
            |a| a.looked_up("users", 1).inserted("posts", 1).rows("posts", 2),
        )
        .run()
        .unwrap();
}

#[test]
fn test_node_id_of_other_table_rejected() {
    Scenario::new("wrong_table")
        .seed(SEED)
        .step(
            "patch_post_id_as_user",
            update_by_node_id("users", "[\"posts\",10]", json!({"name": "x"})),
            |a| a.error(ExpectedError::Validation).error_at("input"),
        )
        .step(
            "garbage_id",
            update_by_node_id("users", "not an id", json!({"name": "x"})),
            |a| a.error(ExpectedError::Validation),
        )
        .run()
        .unwrap();
}

#[test]
fn test_custom_label() {
    let config = TetherConfig::default().with_node_id_label("global_id");
    Scenario::new("custom_label")
        .config(config)
        .seed(SEED)
        .step(
            "connect_by_global_id",
            create(
                "posts",
                json!({"title": "t", "author": {"connectByGlobalId": {"globalId": "[\"users\",1]"}}}),
            ),
            |a| a.inserted("posts", 1),
        )
        .run()
        .unwrap();
}
