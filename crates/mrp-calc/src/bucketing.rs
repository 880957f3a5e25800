//! 時間分桶：日期 → 期別

use chrono::NaiveDate;
use mrp_core::{ItemId, MasterScheduleEntry, PlanningCalendar, ScheduledReceipt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 帶日期的數量（呼叫端的銷售訂單、預測、採購單等）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedQuantity {
    pub item_id: ItemId,
    pub date: NaiveDate,
    pub quantity: Decimal,
    #[serde(default)]
    pub source_ref: Option<String>,
}

impl DatedQuantity {
    pub fn new(item_id: impl Into<ItemId>, date: NaiveDate, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            date,
            quantity,
            source_ref: None,
        }
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

/// 時間分桶計算器
pub struct BucketingCalculator;

impl BucketingCalculator {
    /// 日期所屬期別；早於第 1 期的日期歸入第 1 期（已逾期的需求/供應）
    pub fn period_for(calendar: &PlanningCalendar, date: NaiveDate) -> u32 {
        calendar.period_of(date).unwrap_or(1)
    }

    /// 將帶日期的需求轉為主生產排程
    pub fn master_schedule(
        calendar: &PlanningCalendar,
        demands: &[DatedQuantity],
    ) -> Vec<MasterScheduleEntry> {
        demands
            .iter()
            .map(|d| MasterScheduleEntry {
                period: Self::period_for(calendar, d.date),
                item_id: d.item_id.clone(),
                quantity: d.quantity,
                source_ref: d.source_ref.clone(),
            })
            .collect()
    }

    /// 將帶日期的在途單據轉為預計收貨
    pub fn scheduled_receipts(
        calendar: &PlanningCalendar,
        supplies: &[DatedQuantity],
    ) -> Vec<ScheduledReceipt> {
        supplies
            .iter()
            .map(|s| ScheduledReceipt {
                item_id: s.item_id.clone(),
                period: Self::period_for(calendar, s.date),
                quantity: s.quantity,
                source_ref: s.source_ref.clone(),
            })
            .collect()
    }
}
