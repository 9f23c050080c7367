//! PostgreSQL implementation of the persistence gateway

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{
    parse_unit, Adjustment, Event, EventKind, Medication, MedicationStatus, PeriodStatus,
    ReportingPeriod,
};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Gateway backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct MedicationRow {
    id: Uuid,
    medication_code: String,
    medication_name: String,
    medication_amount: Decimal,
    preferred_unit: String,
    fill_amount: Decimal,
    concentration: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    modified_by: Option<String>,
}

impl TryFrom<MedicationRow> for Medication {
    type Error = AppError;

    fn try_from(row: MedicationRow) -> Result<Self, Self::Error> {
        let status = MedicationStatus::from_code(&row.status).ok_or_else(|| {
            AppError::Internal(format!(
                "medication {} has unrecognized status {}",
                row.medication_code, row.status
            ))
        })?;
        Ok(Medication {
            id: row.id,
            medication_code: row.medication_code,
            medication_name: row.medication_name,
            medication_amount: row.medication_amount,
            preferred_unit: parse_unit(&row.preferred_unit)?,
            fill_amount: row.fill_amount,
            concentration: row.concentration,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            modified_by: row.modified_by,
        })
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    event_code: String,
    event_name: String,
    description: String,
    modifier: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    modified_by: Option<String>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_code = EventKind::from_code(&row.event_code).ok_or_else(|| {
            AppError::Internal(format!("unrecognized event code {}", row.event_code))
        })?;
        Ok(Event {
            id: row.id,
            event_code,
            event_name: row.event_name,
            description: row.description,
            modifier: row.modifier,
            created_at: row.created_at,
            updated_at: row.updated_at,
            modified_by: row.modified_by,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReportingPeriodRow {
    id: Uuid,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    modified_by: Option<String>,
}

impl TryFrom<ReportingPeriodRow> for ReportingPeriod {
    type Error = AppError;

    fn try_from(row: ReportingPeriodRow) -> Result<Self, Self::Error> {
        let status = PeriodStatus::from_code(&row.status).ok_or_else(|| {
            AppError::Internal(format!(
                "reporting period {} has unrecognized status {}",
                row.id, row.status
            ))
        })?;
        Ok(ReportingPeriod {
            id: row.id,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            modified_by: row.modified_by,
        })
    }
}

#[derive(Debug, FromRow)]
struct AdjustmentRow {
    id: Uuid,
    adjustment_date: DateTime<Utc>,
    event_code: String,
    medication_code: String,
    amount: Decimal,
    reference_id: Option<String>,
    reporting_period_id: Uuid,
    created_at: DateTime<Utc>,
    modified_by: Option<String>,
}

impl TryFrom<AdjustmentRow> for Adjustment {
    type Error = AppError;

    fn try_from(row: AdjustmentRow) -> Result<Self, Self::Error> {
        let event_code = EventKind::from_code(&row.event_code).ok_or_else(|| {
            AppError::Internal(format!(
                "adjustment {} has unrecognized event code {}",
                row.id, row.event_code
            ))
        })?;
        Ok(Adjustment {
            id: row.id,
            adjustment_date: row.adjustment_date,
            event_code,
            medication_code: row.medication_code,
            amount: row.amount,
            reference_id: row.reference_id,
            reporting_period_id: row.reporting_period_id,
            created_at: row.created_at,
            modified_by: row.modified_by,
        })
    }
}

/// Surface unique-key violations as duplicate-entry errors; everything else
/// propagates unchanged.
fn map_insert_error(err: sqlx::Error, field: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::DuplicateEntry(field.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn insert_medication(&self, medication: &Medication) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO medications (
                id, medication_code, medication_name, medication_amount,
                preferred_unit, fill_amount, concentration, status,
                created_at, updated_at, modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(medication.id)
        .bind(&medication.medication_code)
        .bind(&medication.medication_name)
        .bind(medication.medication_amount)
        .bind(medication.preferred_unit.as_str())
        .bind(medication.fill_amount)
        .bind(medication.concentration)
        .bind(medication.status.as_str())
        .bind(medication.created_at)
        .bind(medication.updated_at)
        .bind(&medication.modified_by)
        .execute(&self.db)
        .await
        .map_err(|e| map_insert_error(e, "medication_code"))?;

        Ok(())
    }

    async fn medication_by_code(&self, code: &str) -> AppResult<Option<Medication>> {
        let row = sqlx::query_as::<_, MedicationRow>(
            r#"
            SELECT id, medication_code, medication_name, medication_amount,
                   preferred_unit, fill_amount, concentration, status,
                   created_at, updated_at, modified_by
            FROM medications
            WHERE medication_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?;

        row.map(Medication::try_from).transpose()
    }

    async fn list_medications(&self) -> AppResult<Vec<Medication>> {
        let rows = sqlx::query_as::<_, MedicationRow>(
            r#"
            SELECT id, medication_code, medication_name, medication_amount,
                   preferred_unit, fill_amount, concentration, status,
                   created_at, updated_at, modified_by
            FROM medications
            ORDER BY medication_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Medication::try_from).collect()
    }

    async fn active_medications(&self) -> AppResult<Vec<Medication>> {
        let rows = sqlx::query_as::<_, MedicationRow>(
            r#"
            SELECT id, medication_code, medication_name, medication_amount,
                   preferred_unit, fill_amount, concentration, status,
                   created_at, updated_at, modified_by
            FROM medications
            WHERE status = 'ACTIVE'
            ORDER BY medication_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Medication::try_from).collect()
    }

    async fn update_medication_status(
        &self,
        code: &str,
        status: MedicationStatus,
        modified_by: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE medications
            SET status = $1, updated_at = NOW(), modified_by = $2
            WHERE medication_code = $3
            "#,
        )
        .bind(status.as_str())
        .bind(modified_by)
        .bind(code)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Medication".to_string()));
        }

        Ok(())
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, event_code, event_name, description, modifier,
                   created_at, updated_at, modified_by
            FROM events
            ORDER BY event_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn insert_reporting_period(&self, period: &ReportingPeriod) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reporting_periods (
                id, start_date, end_date, status, created_at, updated_at, modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(period.id)
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.status.as_str())
        .bind(period.created_at)
        .bind(period.updated_at)
        .bind(&period.modified_by)
        .execute(&self.db)
        .await
        .map_err(|e| map_insert_error(e, "reporting_period"))?;

        Ok(())
    }

    async fn reporting_period(&self, id: Uuid) -> AppResult<Option<ReportingPeriod>> {
        let row = sqlx::query_as::<_, ReportingPeriodRow>(
            r#"
            SELECT id, start_date, end_date, status, created_at, updated_at, modified_by
            FROM reporting_periods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(ReportingPeriod::try_from).transpose()
    }

    async fn open_reporting_periods(&self) -> AppResult<Vec<ReportingPeriod>> {
        let rows = sqlx::query_as::<_, ReportingPeriodRow>(
            r#"
            SELECT id, start_date, end_date, status, created_at, updated_at, modified_by
            FROM reporting_periods
            WHERE status = 'OPEN'
            ORDER BY start_date ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ReportingPeriod::try_from).collect()
    }

    async fn list_reporting_periods(&self) -> AppResult<Vec<ReportingPeriod>> {
        let rows = sqlx::query_as::<_, ReportingPeriodRow>(
            r#"
            SELECT id, start_date, end_date, status, created_at, updated_at, modified_by
            FROM reporting_periods
            ORDER BY start_date ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ReportingPeriod::try_from).collect()
    }

    async fn close_reporting_period(
        &self,
        id: Uuid,
        end_date: DateTime<Utc>,
        modified_by: Option<&str>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reporting_periods
            SET end_date = $1, status = 'CLOSED', updated_at = NOW(), modified_by = $2
            WHERE id = $3
            "#,
        )
        .bind(end_date)
        .bind(modified_by)
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Reporting period".to_string()));
        }

        Ok(())
    }

    async fn insert_adjustment(&self, adjustment: &Adjustment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, adjustment_date, event_code, medication_code, amount,
                reference_id, reporting_period_id, created_at, modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(adjustment.id)
        .bind(adjustment.adjustment_date)
        .bind(adjustment.event_code.as_str())
        .bind(&adjustment.medication_code)
        .bind(adjustment.amount)
        .bind(&adjustment.reference_id)
        .bind(adjustment.reporting_period_id)
        .bind(adjustment.created_at)
        .bind(&adjustment.modified_by)
        .execute(&self.db)
        .await
        .map_err(|e| map_insert_error(e, "adjustment"))?;

        Ok(())
    }

    async fn adjustments_for_medication(&self, code: &str) -> AppResult<Vec<Adjustment>> {
        let rows = sqlx::query_as::<_, AdjustmentRow>(
            r#"
            SELECT id, adjustment_date, event_code, medication_code, amount,
                   reference_id, reporting_period_id, created_at, modified_by
            FROM inventory
            WHERE medication_code = $1
            ORDER BY adjustment_date ASC, created_at ASC
            "#,
        )
        .bind(code)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Adjustment::try_from).collect()
    }

    async fn sum_for_event(
        &self,
        code: &str,
        event: EventKind,
        period_id: Uuid,
    ) -> AppResult<Option<Decimal>> {
        let sum = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(amount)
            FROM inventory
            WHERE medication_code = $1
              AND event_code = $2
              AND reporting_period_id = $3
            "#,
        )
        .bind(code)
        .bind(event.as_str())
        .bind(period_id)
        .fetch_one(&self.db)
        .await?;

        Ok(sum)
    }

    async fn sum_all(&self, code: &str) -> AppResult<Option<Decimal>> {
        let sum = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(amount)
            FROM inventory
            WHERE medication_code = $1
            "#,
        )
        .bind(code)
        .fetch_one(&self.db)
        .await?;

        Ok(sum)
    }
}
