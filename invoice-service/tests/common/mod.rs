//! Test helper module for invoice-service integration tests.
//!
//! Spawns the application on a random port against the in-memory store and
//! drives it over HTTP.

#![allow(dead_code)]

use invoice_service::config::{
    AdminConfig, CompanyConfig, DatabaseConfig, Environment, InvoiceConfig, InvoiceDefaults,
    SecurityConfig,
};
use invoice_service::services::MemoryInvoiceStore;
use invoice_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "test-password";

/// Configuration for a test instance: random port, in-memory store.
pub fn test_config() -> InvoiceConfig {
    InvoiceConfig {
        common: CoreConfig { port: 0 },
        environment: Environment::Dev,
        service_name: "invoice-service-test".to_string(),
        log_level: "warn".to_string(),
        database: DatabaseConfig {
            url: "postgres://unused-in-tests".to_string(),
            max_connections: 5,
            min_connections: 1,
        },
        admin: AdminConfig {
            username: TEST_ADMIN_USERNAME.to_string(),
            password: TEST_ADMIN_PASSWORD.to_string(),
            session_ttl_hours: 24,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        company: CompanyConfig {
            name: "Al Rayyan Furniture".to_string(),
            address: "Bayader Wadi Alser-Industrial Zone-Aldarbiat 12st".to_string(),
            phone: "00962798557397".to_string(),
            email: "samer@alrayyanfuriture.com".to_string(),
            logo_path: "/assets/images/logo.png".to_string(),
        },
        defaults: InvoiceDefaults {
            tax_rate_percent: 16.0,
            validity_days: 15,
            currency: "JOD".to_string(),
        },
    }
}

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryInvoiceStore::new());
        let app = Application::with_store(test_config(), store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    /// Log in with the test credentials and return the session token.
    pub async fn login(&self) -> String {
        let response = self
            .client
            .post(format!("{}/auth/login", self.address))
            .json(&serde_json::json!({
                "username": TEST_ADMIN_USERNAME,
                "password": TEST_ADMIN_PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to send login request");
        assert!(response.status().is_success(), "Login failed");

        let body: serde_json::Value = response.json().await.expect("Invalid login response");
        body["token"]
            .as_str()
            .expect("Missing token in login response")
            .to_string()
    }

    pub async fn create_invoice(
        &self,
        token: &str,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/invoices", self.address))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to send create request")
    }

    pub async fn get_invoice(&self, token: &str, id: i64) -> reqwest::Response {
        self.client
            .get(format!("{}/invoices/{}", self.address, id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send get request")
    }
}

/// A realistic furniture order: three lines, 16% tax.
pub fn sample_invoice_body() -> serde_json::Value {
    serde_json::json!({
        "customer": {
            "company_name": "Petra Hotels Group",
            "attention": "Procurement Office",
            "phone": "0790000000"
        },
        "items": [
            { "description": "Office desk, walnut", "quantity": 16, "price": 56 },
            { "description": "Executive chair", "quantity": 2, "price": 172.5 },
            { "description": "Filing cabinet", "quantity": 1, "price": 86.5 }
        ],
        "tax_rate": 16,
        "terms": "Payment due within 30 days of delivery"
    })
}
