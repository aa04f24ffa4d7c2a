//! Blog schema shared by the integration tests.

use rusqlite::Connection;
use tether_catalog::{AttributeDef, Catalog, CatalogBuilder, CatalogResult};
use tether_core::Codec;
use tether_session::{Tether, TetherConfig};

/// DDL matching [`blog_catalog`].
///
/// The CHECK on `posts.title` gives tests a cheap way to make one row of a
/// batch fail.
pub const BLOG_DDL: &str = "
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE
);
CREATE TABLE posts (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL CHECK (length(title) > 0),
    published INTEGER NOT NULL DEFAULT 0,
    metadata TEXT,
    author_id INTEGER NOT NULL REFERENCES users(id)
);
CREATE TABLE profiles (
    user_id INTEGER PRIMARY KEY REFERENCES users(id),
    bio TEXT
);
CREATE TABLE categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    parent_id INTEGER REFERENCES categories(id)
);
";

/// users, posts (author), profiles (one per user), categories (self-referencing).
pub fn blog_catalog() -> CatalogResult<Catalog> {
    let mut builder = CatalogBuilder::new();
    builder
        .add_table("users")
        .attr(AttributeDef::new("id", Codec::Int).with_default())
        .attr(AttributeDef::new("name", Codec::Text))
        .attr(AttributeDef::new("email", Codec::Text).nullable())
        .primary_key(&["id"])
        .unique(&["email"])
        .done()?;
    builder
        .add_table("posts")
        .attr(AttributeDef::new("id", Codec::Int).with_default())
        .attr(AttributeDef::new("title", Codec::Text))
        .attr(AttributeDef::new("published", Codec::Bool).with_default())
        .attr(AttributeDef::new("metadata", Codec::Json).nullable())
        .attr(AttributeDef::new("author_id", Codec::Int))
        .primary_key(&["id"])
        .foreign_key(&["author_id"], "users", &["id"])
        .done()?;
    builder
        .add_table("profiles")
        .attr(AttributeDef::new("user_id", Codec::Int))
        .attr(AttributeDef::new("bio", Codec::Text).nullable())
        .primary_key(&["user_id"])
        .foreign_key(&["user_id"], "users", &["id"])
        .done()?;
    builder
        .add_table("categories")
        .attr(AttributeDef::new("id", Codec::Int).with_default())
        .attr(AttributeDef::new("name", Codec::Text))
        .attr(AttributeDef::new("parent_id", Codec::Int).nullable())
        .primary_key(&["id"])
        .foreign_key(&["parent_id"], "categories", &["id"])
        .done()?;
    builder.build()
}

/// Fresh in-memory database with the blog tables.
pub fn blog_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(BLOG_DDL)?;
    Ok(conn)
}

pub fn blog_tether(config: TetherConfig) -> CatalogResult<Tether> {
    Ok(Tether::new(blog_catalog()?, config))
}

pub fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", table);
    conn.query_row(&sql, [], |row| row.get(0))
}
