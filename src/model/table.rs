//! The Sales Table: normalized Sale Records plus the derived `closed_date`, `closed_month` and
//! `payment_check` columns.

use crate::error::RecordError;
use crate::model::{Amount, Month, Record, Value};
use crate::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// The columns of the Sales Table that the reports depend on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleColumn {
    DateClosed,
    Zone,
    Waiter,
    Total,
    Payments,
    ClosedDate,
    ClosedMonth,
    PaymentCheck,
}

serde_plain::derive_display_from_serialize!(SaleColumn);
serde_plain::derive_fromstr_from_deserialize!(SaleColumn);

impl SaleColumn {
    /// Columns computed by the normalizer, in the order they are appended to the table.
    pub const DERIVED: [SaleColumn; 3] = [
        SaleColumn::ClosedDate,
        SaleColumn::ClosedMonth,
        SaleColumn::PaymentCheck,
    ];

    /// The payment sub-record field that is summed into `payment_check`.
    pub const PAYMENT_AMOUNT: &'static str = "amount";
}

/// One row of the Sales Table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SaleRow {
    record: Record,
    zone: String,
    waiter: String,
    total: Amount,
    closed_at: NaiveDateTime,
    closed_date: NaiveDate,
    closed_month: Month,
    payment_check: Amount,
}

impl SaleRow {
    /// Validates the required fields of `record` and computes the calendar columns.
    /// `payment_check` starts at zero until `SalesTable::reconcile_payments` runs.
    fn normalize(row: usize, mut record: Record) -> std::result::Result<Self, RecordError> {
        let closed_at = match required(row, &record, SaleColumn::DateClosed)? {
            Value::Text(s) => parse_timestamp(s).ok_or_else(|| RecordError::MalformedTimestamp {
                row,
                value: s.clone(),
            })?,
            Value::Timestamp(t) => *t,
            _ => {
                return Err(RecordError::invalid(
                    row,
                    SaleColumn::DateClosed.to_string(),
                    "a timestamp string",
                ))
            }
        };
        let zone = label(row, &record, SaleColumn::Zone)?;
        let waiter = label(row, &record, SaleColumn::Waiter)?;
        let total = required(row, &record, SaleColumn::Total)?
            .as_amount()
            .ok_or_else(|| RecordError::invalid(row, SaleColumn::Total.to_string(), "a number"))?;

        record.set(SaleColumn::DateClosed.to_string(), Value::Timestamp(closed_at));
        let closed_date = closed_at.date();

        Ok(Self {
            record,
            zone,
            waiter,
            total,
            closed_at,
            closed_date,
            closed_month: Month::from(closed_date),
            payment_check: Amount::ZERO,
        })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn waiter(&self) -> &str {
        &self.waiter
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn closed_at(&self) -> NaiveDateTime {
        self.closed_at
    }

    pub fn closed_date(&self) -> NaiveDate {
        self.closed_date
    }

    pub fn closed_month(&self) -> Month {
        self.closed_month
    }

    pub fn payment_check(&self) -> Amount {
        self.payment_check
    }
}

/// The normalized, in-memory collection of Sale Records.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SalesTable {
    columns: Vec<String>,
    rows: Vec<SaleRow>,
}

impl SalesTable {
    /// Normalizes and reconciles in one step. This is what the report pipeline uses.
    pub fn load(records: Vec<Record>) -> Result<Self> {
        let mut table = Self::normalize(records)?;
        table.reconcile_payments()?;
        Ok(table)
    }

    /// Flattens `records` into rows, validates the required fields and adds the derived
    /// columns. Fails on the first record that cannot be normalized.
    pub fn normalize(records: Vec<Record>) -> Result<Self> {
        let derived: Vec<String> = SaleColumn::DERIVED.iter().map(|c| c.to_string()).collect();
        let mut seen = BTreeSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for (ix, record) in records.into_iter().enumerate() {
            seen.extend(record.columns().map(str::to_string));
            rows.push(SaleRow::normalize(ix, record)?);
        }

        let mut columns: Vec<String> = seen.into_iter().filter(|c| !derived.contains(c)).collect();
        columns.extend(derived);

        debug!(
            "Normalized {} records into {} columns",
            rows.len(),
            columns.len()
        );
        Ok(Self { columns, rows })
    }

    /// Overwrites `payment_check` on every row with the sum of the row's own payment amounts.
    pub fn reconcile_payments(&mut self) -> Result<()> {
        for (ix, row) in self.rows.iter_mut().enumerate() {
            row.payment_check = payment_sum(ix, &row.record)?;
            trace!(
                "Row {ix}: total {} payments {}",
                row.total,
                row.payment_check
            );
        }
        Ok(())
    }

    /// The union of every column seen in the source records followed by the derived columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SaleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sums `amount` over the record's `payments`. A missing or null `payments` field sums to zero,
/// as does a payment entry without an `amount`.
pub fn payment_sum(row: usize, record: &Record) -> std::result::Result<Amount, RecordError> {
    let payments_field = SaleColumn::Payments.to_string();
    let nested = format!("{payments_field}.");
    let not_a_list = || RecordError::invalid(row, &payments_field, "a list of payments");
    let payments = match record.get(&payments_field) {
        // a `payments` object was flattened into `payments.*` columns
        None if record.columns().any(|c| c.starts_with(&nested)) => return Err(not_a_list()),
        None | Some(Value::Null) => return Ok(Amount::ZERO),
        Some(value) => value.as_list().ok_or_else(not_a_list)?,
    };

    let field = format!("{payments_field}.{}", SaleColumn::PAYMENT_AMOUNT);
    let mut sum = Amount::ZERO;
    for payment in payments {
        let entry = payment.as_map().ok_or_else(not_a_list)?;
        if let Some(amount) = entry.get(SaleColumn::PAYMENT_AMOUNT) {
            let amount = amount
                .as_amount()
                .ok_or_else(|| RecordError::invalid(row, &field, "a number"))?;
            sum = sum
                .checked_add(amount)
                .ok_or_else(|| RecordError::AmountOverflow {
                    row,
                    field: field.clone(),
                })?;
        }
    }
    Ok(sum)
}

/// Parses `date_closed`. Offsets are kept as wall-clock time in that offset, not converted.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn required(
    row: usize,
    record: &Record,
    column: SaleColumn,
) -> std::result::Result<&Value, RecordError> {
    match record.get(&column.to_string()) {
        None | Some(Value::Null) => Err(RecordError::missing(row, column.to_string())),
        Some(value) => Ok(value),
    }
}

fn label(row: usize, record: &Record, column: SaleColumn) -> std::result::Result<String, RecordError> {
    required(row, record, column)?
        .as_label()
        .ok_or_else(|| RecordError::invalid(row, column.to_string(), "a text label"))
}
