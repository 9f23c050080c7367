//! In-memory implementation of the persistence gateway
//!
//! Backs the test suite and local experimentation. Keeps the same ordering
//! and sum semantics as `PgStore`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    Adjustment, Event, EventKind, Medication, MedicationStatus, PeriodStatus, ReportingPeriod,
};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

#[derive(Debug, Default)]
struct Inner {
    medications: Vec<Medication>,
    events: Vec<Event>,
    periods: Vec<ReportingPeriod>,
    adjustments: Vec<Adjustment>,
}

/// Gateway holding everything in process memory
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemStore {
    /// Empty store with the six-event catalog seeded, mirroring the
    /// database migration.
    pub fn new() -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.write() {
            let now = Utc::now();
            for kind in EventKind::ALL {
                inner.events.push(Event {
                    id: Uuid::new_v4(),
                    event_code: kind,
                    event_name: kind.display_name().to_string(),
                    description: format!("{} inventory event", kind.display_name()),
                    modifier: kind.modifier(),
                    created_at: now,
                    updated_at: now,
                    modified_by: None,
                });
            }
        }
        store
    }

    /// A poisoned lock means a writer panicked mid-update; surface that as
    /// a storage error instead of propagating the panic.
    fn read(&self) -> AppResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl InventoryStore for MemStore {
    async fn insert_medication(&self, medication: &Medication) -> AppResult<()> {
        let mut inner = self.write()?;
        if inner
            .medications
            .iter()
            .any(|m| m.medication_code == medication.medication_code)
        {
            return Err(AppError::DuplicateEntry("medication_code".to_string()));
        }
        inner.medications.push(medication.clone());
        Ok(())
    }

    async fn medication_by_code(&self, code: &str) -> AppResult<Option<Medication>> {
        let inner = self.read()?;
        Ok(inner
            .medications
            .iter()
            .find(|m| m.medication_code == code)
            .cloned())
    }

    async fn list_medications(&self) -> AppResult<Vec<Medication>> {
        let inner = self.read()?;
        let mut medications = inner.medications.clone();
        medications.sort_by(|a, b| a.medication_code.cmp(&b.medication_code));
        Ok(medications)
    }

    async fn active_medications(&self) -> AppResult<Vec<Medication>> {
        let inner = self.read()?;
        let mut medications: Vec<Medication> = inner
            .medications
            .iter()
            .filter(|m| m.status == MedicationStatus::Active)
            .cloned()
            .collect();
        medications.sort_by(|a, b| a.medication_code.cmp(&b.medication_code));
        Ok(medications)
    }

    async fn update_medication_status(
        &self,
        code: &str,
        status: MedicationStatus,
        modified_by: Option<&str>,
    ) -> AppResult<()> {
        let mut inner = self.write()?;
        let medication = inner
            .medications
            .iter_mut()
            .find(|m| m.medication_code == code)
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))?;
        medication.status = status;
        medication.updated_at = Utc::now();
        medication.modified_by = modified_by.map(str::to_string);
        Ok(())
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let inner = self.read()?;
        let mut events = inner.events.clone();
        events.sort_by_key(|e| e.event_code.as_str());
        Ok(events)
    }

    async fn insert_reporting_period(&self, period: &ReportingPeriod) -> AppResult<()> {
        let mut inner = self.write()?;
        inner.periods.push(period.clone());
        Ok(())
    }

    async fn reporting_period(&self, id: Uuid) -> AppResult<Option<ReportingPeriod>> {
        let inner = self.read()?;
        Ok(inner.periods.iter().find(|p| p.id == id).cloned())
    }

    async fn open_reporting_periods(&self) -> AppResult<Vec<ReportingPeriod>> {
        let inner = self.read()?;
        let mut periods: Vec<ReportingPeriod> = inner
            .periods
            .iter()
            .filter(|p| p.status == PeriodStatus::Open)
            .cloned()
            .collect();
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    }

    async fn list_reporting_periods(&self) -> AppResult<Vec<ReportingPeriod>> {
        let inner = self.read()?;
        let mut periods = inner.periods.clone();
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    }

    async fn close_reporting_period(
        &self,
        id: Uuid,
        end_date: DateTime<Utc>,
        modified_by: Option<&str>,
    ) -> AppResult<()> {
        let mut inner = self.write()?;
        let period = inner
            .periods
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Reporting period".to_string()))?;
        period.end_date = Some(end_date);
        period.status = PeriodStatus::Closed;
        period.updated_at = Utc::now();
        period.modified_by = modified_by.map(str::to_string);
        Ok(())
    }

    async fn insert_adjustment(&self, adjustment: &Adjustment) -> AppResult<()> {
        let mut inner = self.write()?;
        inner.adjustments.push(adjustment.clone());
        Ok(())
    }

    async fn adjustments_for_medication(&self, code: &str) -> AppResult<Vec<Adjustment>> {
        let inner = self.read()?;
        let mut adjustments: Vec<Adjustment> = inner
            .adjustments
            .iter()
            .filter(|a| a.medication_code == code)
            .cloned()
            .collect();
        adjustments.sort_by_key(|a| (a.adjustment_date, a.created_at));
        Ok(adjustments)
    }

    async fn sum_for_event(
        &self,
        code: &str,
        event: EventKind,
        period_id: Uuid,
    ) -> AppResult<Option<Decimal>> {
        let inner = self.read()?;
        let mut matched = false;
        let mut total = Decimal::ZERO;
        for adjustment in inner.adjustments.iter().filter(|a| {
            a.medication_code == code
                && a.event_code == event
                && a.reporting_period_id == period_id
        }) {
            matched = true;
            total += adjustment.amount;
        }
        Ok(matched.then_some(total))
    }

    async fn sum_all(&self, code: &str) -> AppResult<Option<Decimal>> {
        let inner = self.read()?;
        let mut matched = false;
        let mut total = Decimal::ZERO;
        for adjustment in inner.adjustments.iter().filter(|a| a.medication_code == code) {
            matched = true;
            total += adjustment.amount;
        }
        Ok(matched.then_some(total))
    }
}
