//! PostgreSQL invoice store.

use crate::models::{CreateInvoice, CustomerInfo, Invoice, InvoiceItem, InvoiceStatus, UpdateInvoice};
use crate::services::metrics::{DB_QUERY_DURATION, ERRORS_TOTAL};
use crate::services::store::{FIRST_INVOICE_ID, InvoiceStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Attempts at the id-assignment insert before giving up. The primary key
/// turns a lost race into a unique violation; the loser recomputes and
/// retries.
const CREATE_ID_RETRIES: u32 = 3;

/// Database-backed invoice store.
#[derive(Clone)]
pub struct PgInvoiceStore {
    pool: PgPool,
}

/// Flat row shape for the `invoices` table; items travel as a JSONB list.
#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    quote_number: Option<String>,
    date: NaiveDate,
    validity_period: i32,
    customer_company_name: String,
    customer_attention: Option<String>,
    customer_phone: Option<String>,
    items: Json<Vec<InvoiceItem>>,
    tax_rate: f64,
    subtotal: f64,
    tax: f64,
    total: f64,
    terms: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            quote_number: row.quote_number,
            date: row.date,
            validity_period: row.validity_period,
            customer: CustomerInfo {
                company_name: row.customer_company_name,
                attention: row.customer_attention,
                phone: row.customer_phone,
            },
            items: row.items.0,
            tax_rate: row.tax_rate,
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            terms: row.terms,
            notes: row.notes,
            status: InvoiceStatus::from_string(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const INVOICE_COLUMNS: &str = "id, quote_number, date, validity_period, \
     customer_company_name, customer_attention, customer_phone, \
     items, tax_rate, subtotal, tax, total, terms, notes, status, \
     created_at, updated_at";

fn store_error(context: &str, e: sqlx::Error) -> AppError {
    ERRORS_TOTAL.with_label_values(&["database"]).inc();
    match e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::ServiceUnavailable
        }
        e => AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, e)),
    }
}

impl PgInvoiceStore {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    #[instrument(skip(self))]
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to list invoices", e))?;

        timer.observe_duration();

        Ok(rows.into_iter().map(Invoice::from).collect())
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to get invoice", e))?;

        timer.observe_duration();

        Ok(row.map(Invoice::from))
    }

    #[instrument(skip(self, input), fields(customer = %input.customer.company_name))]
    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO invoices (
                id, quote_number, date, validity_period,
                customer_company_name, customer_attention, customer_phone,
                items, tax_rate, subtotal, tax, total, terms, notes, status,
                created_at, updated_at
            )
            SELECT COALESCE(MAX(id) + 1, $1), $2, COALESCE($3::date, CURRENT_DATE), $4,
                $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'draft', NOW(), NOW()
            FROM invoices
            RETURNING {INVOICE_COLUMNS}
            "#
        );

        let mut attempt = 0;
        let invoice = loop {
            attempt += 1;
            let result = sqlx::query_as::<_, InvoiceRow>(&sql)
                .bind(FIRST_INVOICE_ID)
                .bind(&input.quote_number)
                .bind(input.date)
                .bind(input.validity_period)
                .bind(&input.customer.company_name)
                .bind(&input.customer.attention)
                .bind(&input.customer.phone)
                .bind(Json(&input.items))
                .bind(input.tax_rate)
                .bind(input.subtotal)
                .bind(input.tax)
                .bind(input.total)
                .bind(&input.terms)
                .bind(&input.notes)
                .fetch_one(&self.pool)
                .await;

            match result {
                Ok(row) => break Invoice::from(row),
                Err(sqlx::Error::Database(ref db_err))
                    if db_err.is_unique_violation() && attempt < CREATE_ID_RETRIES =>
                {
                    warn!(attempt = attempt, "Invoice id race lost, retrying assignment");
                    continue;
                }
                Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                    return Err(AppError::Conflict(anyhow::anyhow!(
                        "Invoice id assignment kept conflicting after {} attempts",
                        attempt
                    )));
                }
                Err(e) => return Err(store_error("Failed to create invoice", e)),
            }
        };

        timer.observe_duration();

        info!(invoice_id = %invoice.id, "Draft invoice created");

        Ok(invoice)
    }

    #[instrument(skip(self, input), fields(invoice_id = %id))]
    async fn update_invoice(
        &self,
        id: i64,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE invoices
            SET quote_number = $2, date = $3, validity_period = $4,
                customer_company_name = $5, customer_attention = $6, customer_phone = $7,
                items = $8, tax_rate = $9, subtotal = $10, tax = $11, total = $12,
                terms = $13, notes = $14, status = $15, updated_at = NOW()
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .bind(&input.quote_number)
            .bind(input.date)
            .bind(input.validity_period)
            .bind(&input.customer.company_name)
            .bind(&input.customer.attention)
            .bind(&input.customer.phone)
            .bind(Json(&input.items))
            .bind(input.tax_rate)
            .bind(input.subtotal)
            .bind(input.tax)
            .bind(input.total)
            .bind(&input.terms)
            .bind(&input.notes)
            .bind(input.status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to update invoice", e))?;

        timer.observe_duration();

        if let Some(ref row) = row {
            info!(invoice_id = %row.id, "Invoice updated");
        }

        Ok(row.map(Invoice::from))
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn delete_invoice(&self, id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete invoice", e))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(invoice_id = %id, "Invoice deleted");
        }

        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Health check failed", e))?;
        Ok(())
    }
}
