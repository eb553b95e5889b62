//! MySQL diagnostic session integration tests.
//!
//! This test suite covers:
//! - Identity row and table listing against a real server
//! - Exact stdout lines for a full run
//! - Rejected logins surfacing as connection errors

#![cfg(feature = "mysql")]
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use dbprobe_core::{
    DiagnosticSession, MySqlConnector, MySqlSession, ProbeError, Result, RunSettings, SecretMap,
    SecretPayload, decode_secret_payload, run_diagnostics,
};
use sqlx::MySqlPool;
use std::time::Duration;
use testcontainers_modules::{mysql::Mysql, testcontainers::runners::AsyncRunner};

/// Helper function to wait for MySQL to be ready
async fn wait_for_mysql_ready(database_url: &str, max_attempts: u32) -> Result<()> {
    let mut attempts = 0;
    while attempts < max_attempts {
        if let Ok(pool) = MySqlPool::connect(database_url).await {
            if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                pool.close().await;
                return Ok(());
            }
            pool.close().await;
        }
        attempts += 1;
        if attempts < max_attempts {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
    Err(ProbeError::connection_failed(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        format!("MySQL failed to become ready after {} attempts", max_attempts),
    )))
}

fn bundle(port: u16, password: &str) -> SecretMap {
    let json = serde_json::json!({
        "host": "127.0.0.1",
        "port": port,
        "username": "root",
        "password": password,
        "dbname": "test",
    });
    decode_secret_payload(SecretPayload::Text(json.to_string())).unwrap()
}

async fn seed_tables(database_url: &str) {
    let pool = MySqlPool::connect(database_url).await.unwrap();
    sqlx::query(
        "CREATE TABLE users (
            id INT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TABLE orders (
            id INT AUTO_INCREMENT PRIMARY KEY,
            user_id INT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;
}

#[tokio::test]
async fn test_mysql_integration_full_run() -> Result<()> {
    let mysql = Mysql::default().start().await.unwrap();
    let port = mysql.get_host_port_ipv4(3306).await.unwrap();
    let database_url = format!("mysql://root@127.0.0.1:{}/test", port);

    wait_for_mysql_ready(&database_url, 30).await?;
    seed_tables(&database_url).await;

    let mut out = Vec::new();
    let report = run_diagnostics(
        &MySqlConnector,
        &bundle(port, ""),
        &RunSettings::default(),
        &mut out,
    )
    .await?;

    assert_eq!(report.identity.database.as_deref(), Some("test"));
    assert!(report.identity.current_user.starts_with("root@"));
    assert!(!report.identity.version.is_empty());

    let printed = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("{'host': '127.0.0.1', 'port': "));
    assert_eq!(
        lines[1],
        format!(
            "MySQL VERSION={}, USER={}, DB=test",
            report.identity.version, report.identity.current_user
        )
    );
    // SHOW TABLES returns names in sorted order
    assert_eq!(lines[2], "Tables: ['orders', 'users']");

    Ok(())
}

#[tokio::test]
async fn test_mysql_integration_empty_database() -> Result<()> {
    let mysql = Mysql::default().start().await.unwrap();
    let port = mysql.get_host_port_ipv4(3306).await.unwrap();
    let database_url = format!("mysql://root@127.0.0.1:{}/test", port);

    wait_for_mysql_ready(&database_url, 30).await?;

    let config = dbprobe_core::ConnectionConfig::from_secret(&bundle(port, ""))?;
    let mut session = MySqlSession::connect(&config).await?;
    let tables = session.list_tables().await?;
    Box::new(session).close().await?;

    assert!(tables.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_mysql_integration_rejected_login() -> Result<()> {
    let mysql = Mysql::default().start().await.unwrap();
    let port = mysql.get_host_port_ipv4(3306).await.unwrap();
    let database_url = format!("mysql://root@127.0.0.1:{}/test", port);

    wait_for_mysql_ready(&database_url, 30).await?;

    let mut out = Vec::new();
    let result = run_diagnostics(
        &MySqlConnector,
        &bundle(port, "definitely-wrong-password"),
        &RunSettings::default(),
        &mut out,
    )
    .await;

    match result {
        Err(error @ ProbeError::Connection { .. }) => {
            let message = format!("{:?}", error);
            assert!(!message.contains("definitely-wrong-password"));
        }
        other => panic!("expected Connection error, got {:?}", other),
    }

    // Only the configuration line was printed
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    Ok(())
}
