//! Adjustment ledger and reporting period tests
//!
//! Exercises the write path: conversion to standard units, sign
//! application, the open-period guard, and medication lifecycle rules.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use cst_backend::error::AppError;
use cst_backend::services::adjustment::{AdjustmentService, RecordAdjustmentInput};
use cst_backend::services::medication::{
    CreateMedicationInput, MedicationService, UpdateStatusInput,
};
use cst_backend::services::period::{ClosePeriodInput, OpenPeriodInput, PeriodService};
use cst_backend::store::{InventoryStore, MemStore};
use shared::{EventKind, MedicationStatus, PeriodStatus, Unit};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn morphine_input() -> CreateMedicationInput {
    CreateMedicationInput {
        medication_code: "MORPH-10".to_string(),
        medication_name: "Morphine 10mg/1mL".to_string(),
        medication_amount: dec("10"),
        preferred_unit: Unit::Mg,
        fill_amount: dec("1"),
        concentration: None,
        modified_by: Some("tester".to_string()),
    }
}

fn adjustment_input(event: EventKind, amount: Decimal) -> RecordAdjustmentInput {
    RecordAdjustmentInput {
        medication_code: "MORPH-10".to_string(),
        event_code: event,
        amount,
        reference_id: Some("RUN-42".to_string()),
        adjustment_date: None,
        modified_by: None,
    }
}

async fn setup() -> MemStore {
    let store = MemStore::new();
    PeriodService::new(store.clone())
        .open(OpenPeriodInput::default())
        .await
        .unwrap();
    MedicationService::new(store.clone())
        .create(morphine_input())
        .await
        .unwrap();
    store
}

// ============================================================================
// Adjustment recording
// ============================================================================

#[tokio::test]
async fn test_additive_adjustment_is_converted_and_positive() {
    let store = setup().await;

    let adjustment = AdjustmentService::new(store)
        .record(adjustment_input(EventKind::Order, dec("10")))
        .await
        .unwrap();

    // 10 mg = 1,000,000 standard units, Order is additive
    assert_eq!(adjustment.amount, dec("1000000"));
    assert_eq!(adjustment.event_code, EventKind::Order);
    assert_eq!(adjustment.reference_id.as_deref(), Some("RUN-42"));
}

#[tokio::test]
async fn test_subtractive_adjustment_is_stored_negative() {
    let store = setup().await;

    let service = AdjustmentService::new(store);
    for event in [
        EventKind::Use,
        EventKind::Waste,
        EventKind::Destroy,
        EventKind::Loss,
    ] {
        let adjustment = service
            .record(adjustment_input(event, dec("1")))
            .await
            .unwrap();
        assert_eq!(adjustment.amount, dec("-100000"));
    }
}

#[tokio::test]
async fn test_adjustment_amount_must_be_positive() {
    let store = setup().await;

    let service = AdjustmentService::new(store);
    for amount in [Decimal::ZERO, dec("-5")] {
        let err = service
            .record(adjustment_input(EventKind::Use, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}

#[tokio::test]
async fn test_adjustment_requires_known_medication() {
    let store = setup().await;

    let err = AdjustmentService::new(store)
        .record(RecordAdjustmentInput {
            medication_code: "NO-SUCH-MED".to_string(),
            event_code: EventKind::Import,
            amount: dec("10"),
            reference_id: None,
            adjustment_date: None,
            modified_by: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_adjustment_requires_active_medication() {
    let store = setup().await;

    MedicationService::new(store.clone())
        .set_status(
            "MORPH-10",
            UpdateStatusInput {
                status: MedicationStatus::Inactive,
                modified_by: None,
            },
        )
        .await
        .unwrap();

    let err = AdjustmentService::new(store)
        .record(adjustment_input(EventKind::Use, dec("1")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn test_adjustment_requires_open_period() {
    let store = MemStore::new();
    MedicationService::new(store.clone())
        .create(morphine_input())
        .await
        .unwrap();

    let err = AdjustmentService::new(store)
        .record(adjustment_input(EventKind::Import, dec("10")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoOpenReportingPeriod));
}

#[tokio::test]
async fn test_current_stock_sums_signed_ledger() {
    let store = setup().await;

    let service = AdjustmentService::new(store);
    service
        .record(adjustment_input(EventKind::Import, dec("10")))
        .await
        .unwrap();
    service
        .record(adjustment_input(EventKind::Use, dec("3")))
        .await
        .unwrap();

    // (10 - 3) mg in standard units
    let stock = service.current_stock("MORPH-10").await.unwrap();
    assert_eq!(stock, dec("700000"));

    let ledger = service.list_for_medication("MORPH-10").await.unwrap();
    assert_eq!(ledger.len(), 2);
}

// ============================================================================
// Reporting period lifecycle
// ============================================================================

#[tokio::test]
async fn test_only_one_period_may_be_open() {
    let store = setup().await;

    let err = PeriodService::new(store)
        .open(OpenPeriodInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
}

#[tokio::test]
async fn test_close_then_reopen_period() {
    let store = MemStore::new();
    let service = PeriodService::new(store);

    let first = service.open(OpenPeriodInput::default()).await.unwrap();
    let closed = service
        .close(first.id, ClosePeriodInput::default())
        .await
        .unwrap();
    assert_eq!(closed.status, PeriodStatus::Closed);
    assert!(closed.end_date.is_some());

    let second = service.open(OpenPeriodInput::default()).await.unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(service.current_open().await.unwrap().id, second.id);
    assert_eq!(service.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_closing_twice_fails() {
    let store = MemStore::new();
    let service = PeriodService::new(store);

    let period = service.open(OpenPeriodInput::default()).await.unwrap();
    service
        .close(period.id, ClosePeriodInput::default())
        .await
        .unwrap();

    let err = service
        .close(period.id, ClosePeriodInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn test_end_date_must_not_precede_start() {
    let store = MemStore::new();
    let service = PeriodService::new(store);

    let period = service.open(OpenPeriodInput::default()).await.unwrap();
    let err = service
        .close(
            period.id,
            ClosePeriodInput {
                end_date: Some(period.start_date - Duration::days(1)),
                modified_by: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_open_with_explicit_start_date() {
    let store = MemStore::new();
    let start = Utc::now() - Duration::days(30);

    let period = PeriodService::new(store)
        .open(OpenPeriodInput {
            start_date: Some(start),
            modified_by: None,
        })
        .await
        .unwrap();
    assert_eq!(period.start_date, start);
    assert_eq!(period.status, PeriodStatus::Open);
}

#[tokio::test]
async fn test_period_lifecycle_stamps_audit_fields() {
    let store = MemStore::new();
    let service = PeriodService::new(store);

    let period = service
        .open(OpenPeriodInput {
            start_date: None,
            modified_by: Some("supervisor".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(period.modified_by.as_deref(), Some("supervisor"));

    let closed = service
        .close(
            period.id,
            ClosePeriodInput {
                end_date: None,
                modified_by: Some("auditor".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(closed.modified_by.as_deref(), Some("auditor"));
    assert!(closed.updated_at >= period.updated_at);
}

#[tokio::test]
async fn test_event_catalog_carries_audit_columns() {
    let store = MemStore::new();

    let events = store.list_events().await.unwrap();
    assert_eq!(events.len(), 6);
    for event in events {
        assert_eq!(event.modifier, event.event_code.modifier());
        // Seeded rows have no modifying user
        assert!(event.modified_by.is_none());
    }
}

// ============================================================================
// Medication lifecycle
// ============================================================================

#[tokio::test]
async fn test_duplicate_medication_code_rejected() {
    let store = setup().await;

    let err = MedicationService::new(store)
        .create(morphine_input())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEntry(_)));
}

#[tokio::test]
async fn test_concentration_derived_when_absent() {
    let store = MemStore::new();

    // 100 mcg in 2 ml derives 50 mcg/ml
    let medication = MedicationService::new(store)
        .create(CreateMedicationInput {
            medication_code: "FENT-100".to_string(),
            medication_name: "Fentanyl 100mcg/2mL".to_string(),
            medication_amount: dec("100"),
            preferred_unit: Unit::Mcg,
            fill_amount: dec("2"),
            concentration: None,
            modified_by: None,
        })
        .await
        .unwrap();
    assert_eq!(medication.concentration, dec("50"));
}

#[tokio::test]
async fn test_standard_is_not_a_preferred_unit() {
    let store = MemStore::new();

    let mut input = morphine_input();
    input.preferred_unit = Unit::Std;
    let err = MedicationService::new(store)
        .create(input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_invalid_medication_code_rejected() {
    let store = MemStore::new();

    let mut input = morphine_input();
    input.medication_code = "morph 10".to_string();
    let err = MedicationService::new(store)
        .create(input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_discontinued_is_terminal() {
    let store = setup().await;
    let service = MedicationService::new(store);

    service
        .set_status(
            "MORPH-10",
            UpdateStatusInput {
                status: MedicationStatus::Discontinued,
                modified_by: None,
            },
        )
        .await
        .unwrap();

    let err = service
        .set_status(
            "MORPH-10",
            UpdateStatusInput {
                status: MedicationStatus::Active,
                modified_by: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStateTransition(_)));
}
