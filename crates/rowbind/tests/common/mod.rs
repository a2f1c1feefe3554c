//! Shared fixtures: the `Customer` record and a seeded SQLite schema.

#![allow(dead_code)]

use rusqlite::Connection;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customer {
    pub uin: i64,
    pub app_id: i64,
    pub user_name: String,
    pub age: i64,
}

rowbind::record! {
    Customer {
        uin => "uin" @ ["brief"],
        app_id => "appId",
        user_name => "userName" @ ["brief"],
        age => "age",
    }
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn open_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    create_schema(&conn);
    conn
}

pub fn create_schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE users (
            uin      INTEGER NOT NULL UNIQUE,
            appId    INTEGER NOT NULL DEFAULT 0,
            userName TEXT NOT NULL DEFAULT '',
            age      INTEGER NOT NULL DEFAULT 0
        );",
    )
    .expect("create schema");
}

pub fn seed(conn: &Connection, rows: &[(i64, i64, &str, i64)]) {
    for &(uin, app_id, name, age) in rows {
        conn.execute(
            "INSERT INTO users (uin, appId, userName, age) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![uin, app_id, name, age],
        )
        .expect("seed row");
    }
}
