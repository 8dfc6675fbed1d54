use chrono::NaiveDate;
use dupsweep::configuration::{self, DatabaseConfigs};
use dupsweep::startup::{self, Application};
use dupsweep::telemetry;
use secrecy::Secret;
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::OnceLock;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub api_client: reqwest::Client,
}

static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        if std::env::var("TEST_LOG").is_ok() {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
            telemetry::init_subscriber(subscriber);
        } else {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            telemetry::init_subscriber(subscriber);
        };
    });
}

pub async fn spawn_app() -> TestApp {
    init_tracing();

    let configuration = {
        let mut c = configuration::get_config().expect("Failed to read configuration.");
        c.database.database_name = Uuid::new_v4().to_string();
        c.application.port = 0;
        c
    };

    configure_database(&configuration.database).await;

    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        db_pool: startup::get_connection_pool(&configuration.database),
        api_client: reqwest::Client::new(),
    }
}

async fn configure_database(config: &DatabaseConfigs) -> PgPool {
    let maintenance_settings = DatabaseConfigs {
        database_name: "postgres".to_string(),
        username: "postgres".to_string(),
        password: Secret::new("password".to_string()),
        ..config.clone()
    };

    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

impl TestApp {
    pub async fn remove_duplicates(&self) -> reqwest::Response {
        self.api_client
            .delete(format!("{}/cleanup", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sends the cleanup request, asserts it succeeded and returns the `results` object.
    pub async fn remove_duplicates_ok(&self) -> Value {
        let response = self.remove_duplicates().await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.expect("Response body is not JSON");
        assert_eq!(body["message"], "Duplicates removed successfully");
        body["results"].clone()
    }

    pub async fn insert_user(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, name, email, password) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind("Test User")
            .bind(email)
            .bind("hashed-password")
            .execute(&self.db_pool)
            .await
            .expect("Failed to insert user");
        id
    }

    pub async fn insert_customer(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO customers (id, name, email, image_url) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind("Test Customer")
            .bind(email)
            .bind("/customers/test.png")
            .execute(&self.db_pool)
            .await
            .expect("Failed to insert customer");
        id
    }

    pub async fn insert_invoice(
        &self,
        customer_id: Uuid,
        amount: i32,
        status: &str,
        date: NaiveDate,
    ) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO invoices (id, customer_id, amount, status, date) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(customer_id)
        .bind(amount)
        .bind(status)
        .bind(date)
        .execute(&self.db_pool)
        .await
        .expect("Failed to insert invoice");
        id
    }

    pub async fn insert_revenue(&self, month: &str, revenue: i32) {
        sqlx::query("INSERT INTO revenue (month, revenue) VALUES ($1, $2)")
            .bind(month)
            .bind(revenue)
            .execute(&self.db_pool)
            .await
            .expect("Failed to insert revenue");
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count rows")
    }

    pub async fn count_distinct(&self, table: &str, key_columns: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM (SELECT 1 FROM {table} GROUP BY {key_columns}) AS key_groups"
        ))
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to count duplicate groups")
    }

    pub async fn user_ids(&self) -> Vec<Uuid> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users ORDER BY ctid")
            .fetch_all(&self.db_pool)
            .await
            .expect("Failed to fetch user ids")
    }
}
