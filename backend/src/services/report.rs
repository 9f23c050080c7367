//! Bi-annual inventory report
//!
//! Aggregates the signed standard-unit ledger per medication and event kind
//! for the open reporting period and presents every figure in milliliters.
//! Subtractive events are stored negative, so their display value is the
//! negated sum; the ending amount re-subtracts them, which keeps a single
//! sign convention between storage and presentation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::{conversion, EventKind, Medication};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Per-medication figures for one reporting period, all in milliliters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationPeriodSummary {
    pub medication_name: String,
    pub preferred_unit: String,
    pub concentration: Decimal,
    pub starting_amount: Decimal,
    pub amount_received: Decimal,
    pub amount_used: Decimal,
    pub amount_wasted: Decimal,
    pub amount_destroyed: Decimal,
    pub amount_lost: Decimal,
    pub ending_amount: Decimal,
}

/// Report keyed by reporting period id, then medication code. BTreeMap on
/// both levels so serialization order is deterministic.
pub type BiAnnualReport = BTreeMap<Uuid, BTreeMap<String, MedicationPeriodSummary>>;

/// One line of the current-inventory view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStockLine {
    pub medication_code: String,
    pub medication_name: String,
    pub preferred_unit: String,
    /// On-hand quantity in the preferred unit
    pub amount: Decimal,
}

/// Service producing inventory reports from the adjustment ledger
#[derive(Clone)]
pub struct ReportService<S> {
    store: S,
}

impl<S: InventoryStore> ReportService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Build the bi-annual controlled substance report for the open
    /// reporting period.
    ///
    /// Every ACTIVE medication must carry an IMPORT adjustment in the
    /// period; a missing opening balance makes the whole report
    /// unreliable and fails it outright.
    pub async fn bi_annual(&self) -> AppResult<BiAnnualReport> {
        let period = super::current_open_period(&self.store).await?;
        let medications = self.store.active_medications().await?;

        let mut summaries = BTreeMap::new();
        for medication in &medications {
            let summary = self.summarize(medication, period.id).await?;
            summaries.insert(medication.medication_code.clone(), summary);
        }

        tracing::info!(
            period_id = %period.id,
            medications = summaries.len(),
            "built bi-annual report"
        );

        let mut report = BTreeMap::new();
        report.insert(period.id, summaries);
        Ok(report)
    }

    async fn summarize(
        &self,
        medication: &Medication,
        period_id: Uuid,
    ) -> AppResult<MedicationPeriodSummary> {
        let mut totals = BTreeMap::new();
        for kind in EventKind::ALL {
            let sum = self
                .store
                .sum_for_event(&medication.medication_code, kind, period_id)
                .await?;

            let quantity = match sum {
                Some(quantity) => quantity,
                None if kind == EventKind::Import => {
                    return Err(AppError::MissingOpeningBalance {
                        medication_code: medication.medication_code.clone(),
                    });
                }
                None => Decimal::ZERO,
            };

            // Subtractive sums are negative in the ledger; report them
            // as positive magnitudes.
            let display = if kind.is_subtractive() { -quantity } else { quantity };

            let milliliters = conversion::to_milliliters(
                display,
                medication.preferred_unit,
                medication.concentration,
            )?;
            totals.insert(kind, milliliters);
        }

        let starting_amount = totals[&EventKind::Import];
        let amount_received = totals[&EventKind::Order];
        let amount_used = totals[&EventKind::Use];
        let amount_wasted = totals[&EventKind::Waste];
        let amount_destroyed = totals[&EventKind::Destroy];
        let amount_lost = totals[&EventKind::Loss];

        let ending_amount = (starting_amount + amount_received
            - amount_used
            - amount_wasted
            - amount_destroyed
            - amount_lost)
            .round_dp(conversion::REPORT_PRECISION);

        Ok(MedicationPeriodSummary {
            medication_name: medication.medication_name.clone(),
            preferred_unit: medication.preferred_unit.to_string(),
            concentration: medication.concentration,
            starting_amount,
            amount_received,
            amount_used,
            amount_wasted,
            amount_destroyed,
            amount_lost,
            ending_amount,
        })
    }

    /// On-hand quantities across all periods, one line per ACTIVE
    /// medication in its preferred unit
    pub async fn current_inventory(&self) -> AppResult<Vec<CurrentStockLine>> {
        let medications = self.store.active_medications().await?;

        let mut lines = Vec::with_capacity(medications.len());
        for medication in medications {
            let total = self
                .store
                .sum_all(&medication.medication_code)
                .await?
                .unwrap_or(Decimal::ZERO);
            lines.push(CurrentStockLine {
                amount: conversion::to_preferred(total, medication.preferred_unit),
                medication_code: medication.medication_code,
                medication_name: medication.medication_name,
                preferred_unit: medication.preferred_unit.to_string(),
            });
        }
        Ok(lines)
    }

    /// Flatten the bi-annual report into CSV, one row per period and
    /// medication
    pub async fn bi_annual_csv(&self) -> AppResult<String> {
        let report = self.bi_annual().await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "reporting_period_id",
                "medication_code",
                "medication_name",
                "preferred_unit",
                "concentration",
                "starting_amount_ml",
                "amount_received_ml",
                "amount_used_ml",
                "amount_wasted_ml",
                "amount_destroyed_ml",
                "amount_lost_ml",
                "ending_amount_ml",
            ])
            .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;

        for (period_id, medications) in &report {
            for (code, summary) in medications {
                writer
                    .write_record([
                        period_id.to_string(),
                        code.clone(),
                        summary.medication_name.clone(),
                        summary.preferred_unit.clone(),
                        summary.concentration.to_string(),
                        summary.starting_amount.to_string(),
                        summary.amount_received.to_string(),
                        summary.amount_used.to_string(),
                        summary.amount_wasted.to_string(),
                        summary.amount_destroyed.to_string(),
                        summary.amount_lost.to_string(),
                        summary.ending_amount.to_string(),
                    ])
                    .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to finish CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV output was not UTF-8: {}", e)))
    }
}
