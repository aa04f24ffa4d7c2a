//! Connecting, updating and deleting existing rows through connectors.

use pretty_assertions::assert_eq;
use tether_tests::prelude::*;

const SEED: &str = "
INSERT INTO users (id, name, email) VALUES (1, 'ann', 'ann@example.com');
INSERT INTO users (id, name, email) VALUES (2, 'bob', 'bob@example.com');
INSERT INTO posts (id, title, author_id) VALUES (10, 'hello', 1);
INSERT INTO posts (id, title, author_id) VALUES (11, 'again', 1);
";

fn title_author(conn: &rusqlite::Connection, id: i64) -> (String, i64) {
    conn.query_row("SELECT title, author_id FROM posts WHERE id = ?1", [id], |r| {
        Ok((r.get(0)?, r.get(1)?))
    })
    .unwrap()
}

mod connect {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forward_connect_by_unique_email() {
        let conn = Scenario::new("connect_by_email")
            .seed(SEED)
            .step(
                "post_for_bob",
                create(
                    "posts",
                    json!({"title": "mine", "author": {"connectByEmail": {"email": "bob@example.com"}}}),
                )
                .returning(&["id"]),
                |a| a.looked_up("users", 1).inserted("posts", 1),
            )
            .run()
            .unwrap();

        let author: i64 = conn
            .query_row("SELECT author_id FROM posts WHERE title = 'mine'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(author, 2);
    }

    #[test]
    fn test_reverse_connect_moves_posts() {
        let conn = Scenario::new("reverse_connect")
            .seed(SEED)
            .step(
                "bob_takes_posts",
                update("users", "id", json!(2), json!({"posts": {"connectById": [{"id": 10}, {"id": 11}]}})),
                |a| a.updated("posts", 2),
            )
            .run()
            .unwrap();

        assert_eq!(title_author(&conn, 10).1, 2);
        assert_eq!(title_author(&conn, 11).1, 2);
    }
}

mod update {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_update_by_key() {
        Scenario::new("root_update")
            .seed(SEED)
            .step(
                "rename_ann",
                update("users", "email", json!("ann@example.com"), json!({"name": "anne"})).returning(&["id", "name"]),
                |a| a.root("id", json!(1)).root("name", json!("anne")),
            )
            .run()
            .unwrap();
    }

    #[test]
    fn test_nested_reverse_update_scoped_to_parent() {
        let conn = Scenario::new("reverse_update")
            .seed(SEED)
            .step(
                "retitle_and_move",
                update(
                    "users",
                    "id",
                    json!(2),
                    json!({"posts": {"updateById": {"id": 10, "patch": {"title": "moved"}}}}),
                ),
                |a| a.updated("users", 1).updated("posts", 1),
            )
            .run()
            .unwrap();

        assert_eq!(title_author(&conn, 10), ("moved".to_string(), 2));
    }

    #[test]
    fn test_nested_forward_update_runs_before_parent() {
        let conn = Scenario::new("forward_update")
            .seed(SEED)
            .step(
                "post_by_renamed_bob",
                create(
                    "posts",
                    json!({"title": "new", "author": {"updateByEmail": {"email": "bob@example.com", "patch": {"name": "robert"}}}}),
                ),
                |a| a.updated("users", 1).inserted("posts", 1),
            )
            .run()
            .unwrap();

        let name: String = conn.query_row("SELECT name FROM users WHERE id = 2", [], |r| r.get(0)).unwrap();
        assert_eq!(name, "robert");
    }

    #[test]
    fn test_patch_may_nest_connectors() {
        Scenario::new("patch_nesting")
            .seed(SEED)
            .step(
                "update_post_and_add_sibling",
                update(
                    "users",
                    "id",
                    json!(1),
                    json!({"posts": {"updateById": {"id": 10, "patch": {"title": "t", "author": {"connectById": {"id": 2}}}}}}),
                ),
                // The patch rebinds author_id, which the reverse slot already seeds.
                |a| a.error(ExpectedError::Validation).rows("posts", 2),
            )
            .run()
            .unwrap();
    }
}

mod delete {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delete_scoped_to_parent() {
        Scenario::new("delete")
            .seed(SEED)
            .step(
                "bob_cannot_delete_anns_post",
                update("users", "id", json!(2), json!({"posts": {"deleteById": {"id": 10}}})),
                |a| a.error(ExpectedError::NotFound).error_at("input.posts.deleteById").rows("posts", 2),
            )
            .step(
                "ann_deletes_her_post",
                update("users", "id", json!(1), json!({"posts": {"deleteById": [{"id": 10}]}})),
                |a| a.deleted("posts", 1).rows("posts", 1),
            )
            .run()
            .unwrap();
    }

    #[test]
    fn test_replace_one_to_one_child() {
        let conn = Scenario::new("replace_profile")
            .seed(SEED)
            .seed("INSERT INTO profiles (user_id, bio) VALUES (1, 'old');")
            .step(
                "swap_profile",
                update(
                    "users",
                    "id",
                    json!(1),
                    json!({"profile": {"deleteByUserId": {"userId": 1}, "create": {"bio": "new"}}}),
                ),
                |a| a.deleted("profiles", 1).inserted("profiles", 1).rows("profiles", 1),
            )
            .run()
            .unwrap();

        let bio: String = conn
            .query_row("SELECT bio FROM profiles WHERE user_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(bio, "new");
    }

    #[test]
    fn test_delete_alongside_create() {
        Scenario::new("replace")
            .seed(SEED)
            .step(
                "swap_post",
                update(
                    "users",
                    "id",
                    json!(1),
                    json!({"posts": {"deleteById": [{"id": 11}], "create": [{"title": "fresh"}]}}),
                ),
                |a| a.deleted("posts", 1).inserted("posts", 1).rows("posts", 2),
            )
            .run()
            .unwrap();
    }
}

mod not_found {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connect_to_missing_row() {
        Scenario::new("missing_connect")
            .seed(SEED)
            .step(
                "connect_ghost",
                create("posts", json!({"title": "x", "author": {"connectById": {"id": 99}}})),
                |a| {
                    a.error(ExpectedError::NotFound)
                        .error_at("input.author.connectById")
                        .rows("posts", 2)
                },
            )
            .run()
            .unwrap();
    }

    #[test]
    fn test_missing_child_rolls_back_root() {
        Scenario::new("missing_update")
            .seed(SEED)
            .step(
                "rename_and_update_ghost",
                update(
                    "users",
                    "id",
                    json!(1),
                    json!({"name": "zed", "posts": {"updateById": {"id": 99, "patch": {"title": "t"}}}}),
                ),
                |a| a.error(ExpectedError::NotFound).error_at("input.posts.updateById"),
            )
            .run()
            .map(|conn| {
                let name: String = conn.query_row("SELECT name FROM users WHERE id = 1", [], |r| r.get(0)).unwrap();
                assert_eq!(name, "ann");
            })
            .unwrap();
    }

    #[test]
    fn test_root_update_of_missing_row() {
        Scenario::new("missing_root")
            .step(
                "update_ghost",
                update("users", "id", json!(42), json!({"name": "x"})),
                |a| a.error(ExpectedError::NotFound).error_at("input"),
            )
            .run()
            .unwrap();
    }
}
