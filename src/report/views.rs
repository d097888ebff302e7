use crate::model::{Amount, Month, SaleColumn, SaleRow, SalesTable};
use crate::report::{Cell, ReportKind, ReportRow, ReportView};
use crate::Result;
use anyhow::anyhow;
use std::collections::BTreeMap;

/// Builds the six reports in `ReportKind::ALL` order.
pub fn build_all(table: &SalesTable) -> Result<Vec<ReportView>> {
    ReportKind::ALL
        .iter()
        .map(|kind| {
            Ok(match kind {
                ReportKind::ZoneAttention => zone_attention(table),
                ReportKind::SalesByZone => sales_by_zone(table),
                ReportKind::SalesByDay => sales_by_day(table),
                ReportKind::SalesByMonth => sales_by_month(table)?,
                ReportKind::PaymentCheck => payment_check(table),
                ReportKind::WaitersWork => waiters_work(table),
            })
        })
        .collect()
}

/// Number of sales per zone, keyed by zone.
pub fn zone_attention(table: &SalesTable) -> ReportView {
    let rows = count_by(table, |row| row.zone())
        .into_iter()
        .map(|(zone, count)| ReportRow::new(vec![text(zone)], vec![Cell::Count(count)]))
        .collect();
    ReportView::new(ReportKind::ZoneAttention, [SaleColumn::Zone.to_string()], rows)
}

/// Number of sales per zone and waiter, keyed by both.
pub fn sales_by_zone(table: &SalesTable) -> ReportView {
    let rows = count_by(table, |row| (row.zone(), row.waiter()))
        .into_iter()
        .map(|((zone, waiter), count)| {
            ReportRow::new(vec![text(zone), text(waiter)], vec![Cell::Count(count)])
        })
        .collect();
    ReportView::new(ReportKind::SalesByZone, [SaleColumn::Zone.to_string()], rows)
}

/// Every sale's total next to the day it closed, in table order.
pub fn sales_by_day(table: &SalesTable) -> ReportView {
    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(ix, row)| {
            ReportRow::new(
                vec![Cell::RowNumber(ix)],
                vec![Cell::Amount(row.total()), Cell::Date(row.closed_date())],
            )
        })
        .collect();
    ReportView::new(
        ReportKind::SalesByDay,
        [SaleColumn::Total, SaleColumn::ClosedDate].map(|c| c.to_string()),
        rows,
    )
}

/// Sum of `total` per month, largest first.
///
/// # Errors
/// A month whose totals add up to more than an `Amount` can hold.
pub fn sales_by_month(table: &SalesTable) -> Result<ReportView> {
    let mut sums: BTreeMap<Month, Amount> = BTreeMap::new();
    for row in table.rows() {
        let month = row.closed_month();
        let sum = sums.entry(month).or_default();
        *sum = sum
            .checked_add(row.total())
            .ok_or_else(|| anyhow!("The sales total for {month} is too large to represent"))?;
    }
    let mut sums: Vec<(Month, Amount)> = sums.into_iter().collect();
    sums.sort_by(|a, b| b.1.cmp(&a.1));

    let rows = sums
        .into_iter()
        .enumerate()
        .map(|(ix, (month, sum))| {
            ReportRow::new(
                vec![Cell::RowNumber(ix)],
                vec![Cell::Month(month), Cell::Amount(sum)],
            )
        })
        .collect();
    Ok(ReportView::new(
        ReportKind::SalesByMonth,
        [SaleColumn::ClosedMonth.to_string(), "count".to_string()],
        rows,
    ))
}

/// Every sale's total next to the sum of its payments, so that mismatches can be spotted.
pub fn payment_check(table: &SalesTable) -> ReportView {
    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(ix, row)| {
            ReportRow::new(
                vec![Cell::RowNumber(ix)],
                vec![
                    Cell::Date(row.closed_date()),
                    Cell::Amount(row.total()),
                    Cell::Amount(row.payment_check()),
                ],
            )
        })
        .collect();
    ReportView::new(
        ReportKind::PaymentCheck,
        [
            SaleColumn::ClosedDate,
            SaleColumn::Total,
            SaleColumn::PaymentCheck,
        ]
        .map(|c| c.to_string()),
        rows,
    )
    .with_header(["Date", "total", "total_payments"])
}

/// Number of sales per month, zone and waiter, busiest first.
pub fn waiters_work(table: &SalesTable) -> ReportView {
    let mut counts: Vec<((Month, &str, &str), u64)> =
        count_by(table, |row| (row.closed_month(), row.zone(), row.waiter()))
            .into_iter()
            .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let rows = counts
        .into_iter()
        .enumerate()
        .map(|(ix, ((month, zone, waiter), count))| {
            ReportRow::new(
                vec![Cell::RowNumber(ix)],
                vec![
                    Cell::Month(month),
                    text(zone),
                    text(waiter),
                    Cell::Count(count),
                ],
            )
        })
        .collect();
    ReportView::new(
        ReportKind::WaitersWork,
        [
            SaleColumn::ClosedMonth.to_string(),
            SaleColumn::Zone.to_string(),
            SaleColumn::Waiter.to_string(),
            "count".to_string(),
        ],
        rows,
    )
    .with_header(["day", "zone", "waiter", "total"])
}

/// Counts rows per key. Keys come back in ascending order.
fn count_by<'a, K, F>(table: &'a SalesTable, key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&'a SaleRow) -> K,
{
    let mut counts = BTreeMap::new();
    for row in table.rows() {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}
