//! Nested creates in both directions.

use pretty_assertions::assert_eq;
use tether_tests::prelude::*;

mod ordering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forward_child_is_inserted_first() {
        // GIVEN a post whose author is created inline
        let tether = blog_tether(TetherConfig::default()).unwrap();
        let request = create("posts", json!({"title": "x", "author": {"create": {"name": "a"}}}));

        // WHEN planned
        let plan = tether.plan(&request).unwrap();

        // THEN one users insert returning only its id precedes one posts insert
        let sql: Vec<&str> = plan.statements().iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "INSERT INTO \"users\" (\"name\") VALUES (?1) RETURNING \"id\"",
                "INSERT INTO \"posts\" (\"title\", \"author_id\") VALUES (?1, ?2)",
            ]
        );
    }

    #[test]
    fn test_round_trip_links_new_author() {
        let conn = Scenario::new("round_trip")
            .step(
                "create_post_with_author",
                create("posts", json!({"title": "x", "author": {"create": {"name": "a"}}})).returning(&["author_id"]),
                |a| a.inserted("users", 1).inserted("posts", 1).root("author_id", json!(1)),
            )
            .run()
            .unwrap();

        let author: i64 = conn
            .query_row("SELECT author_id FROM posts WHERE title = 'x'", [], |r| r.get(0))
            .unwrap();
        let user: i64 = conn.query_row("SELECT id FROM users", [], |r| r.get(0)).unwrap();
        assert_eq!(author, user);
    }
}

mod fan_out {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reverse_children_follow_root() {
        // GIVEN a user with two posts
        let tether = blog_tether(TetherConfig::default()).unwrap();
        let request = create(
            "users",
            json!({"name": "a", "posts": {"create": [{"title": "p1"}, {"title": "p2"}]}}),
        );

        // WHEN planned
        let plan = tether.plan(&request).unwrap();

        // THEN the user comes first and returns its id for both posts
        let tables: Vec<&str> = plan.statements().iter().map(|s| s.table.as_str()).collect();
        assert_eq!(tables, vec!["users", "posts", "posts"]);
        assert_eq!(plan.statements()[0].returning, vec!["id".to_string()]);
        assert!(plan.statements()[1..].iter().all(|s| s.deferred_count() == 1));
    }

    #[test]
    fn test_reverse_children_share_parent_key() {
        let conn = Scenario::new("fan_out")
            .step(
                "create_user_with_posts",
                create(
                    "users",
                    json!({"name": "a", "posts": {"create": [{"title": "p1"}, {"title": "p2"}]}}),
                ),
                |a| a.statements(3).inserted("users", 1).inserted("posts", 2),
            )
            .run()
            .unwrap();

        let distinct: i64 = conn
            .query_row("SELECT COUNT(DISTINCT author_id) FROM posts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(distinct, 1);
    }

    #[test]
    fn test_single_object_is_a_one_element_list() {
        Scenario::new("single_object")
            .step(
                "create_user_with_post",
                create("users", json!({"name": "a", "posts": {"create": {"title": "p1"}}})),
                |a| a.inserted("posts", 1).rows("posts", 1),
            )
            .run()
            .unwrap();
    }
}

mod recursion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_payloads_recurse() {
        // post -> new author -> that author's profile and a second post
        Scenario::new("recursion")
            .step(
                "create_deep",
                create(
                    "posts",
                    json!({
                        "title": "first",
                        "author": {"create": {
                            "name": "a",
                            "profile": {"create": {"bio": "hi"}},
                            "posts": {"create": [{"title": "second"}]}
                        }}
                    }),
                ),
                |a| a.inserted("users", 1).inserted("posts", 2).inserted("profiles", 1),
            )
            .run()
            .unwrap();
    }

    #[test]
    fn test_self_reference_tree() {
        let conn = Scenario::new("categories")
            .step(
                "create_tree",
                create(
                    "categories",
                    json!({
                        "name": "child",
                        "parent": {"create": {"name": "root"}},
                        "categories": {"create": [{"name": "grandchild"}]}
                    }),
                ),
                |a| a.inserted("categories", 3),
            )
            .run()
            .unwrap();

        let parent_of_child: String = conn
            .query_row(
                "SELECT p.name FROM categories c JOIN categories p ON c.parent_id = p.id WHERE c.name = 'child'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(parent_of_child, "root");
    }
}

mod codecs {
    use super::*;

    #[test]
    fn test_bool_and_json_round_trip() {
        Scenario::new("codecs")
            .seed("INSERT INTO users (id, name) VALUES (1, 'a');")
            .step(
                "create_post",
                create(
                    "posts",
                    json!({"title": "t", "published": true, "metadata": {"tags": ["x"]}, "author": {"connectById": {"id": 1}}}),
                )
                .returning(&["published", "metadata"]),
                |a| a.root("published", json!(true)).root("metadata", json!({"tags": ["x"]})),
            )
            .run()
            .unwrap();
    }
}
