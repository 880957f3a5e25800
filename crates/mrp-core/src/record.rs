//! MRP 記錄（單物料的逐期計算表）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ItemId, LotSizingPolicy, PeggingRecord, Period, PlannedOrder};

/// 單一期別的 MRP 列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrpPeriodRow {
    /// 期別
    pub period: Period,
    /// 毛需求
    pub gross_requirements: Decimal,
    /// 預計收貨
    pub scheduled_receipts: Decimal,
    /// 預計庫存（期末）
    pub projected_on_hand: Decimal,
    /// 淨需求
    pub net_requirements: Decimal,
    /// 計劃訂單收貨
    pub planned_order_receipt: Decimal,
    /// 計劃訂單下達
    pub planned_order_release: Decimal,
}

impl MrpPeriodRow {
    /// 創建空的期別列
    pub fn new(period: Period) -> Self {
        Self {
            period,
            gross_requirements: Decimal::ZERO,
            scheduled_receipts: Decimal::ZERO,
            projected_on_hand: Decimal::ZERO,
            net_requirements: Decimal::ZERO,
            planned_order_receipt: Decimal::ZERO,
            planned_order_release: Decimal::ZERO,
        }
    }
}

/// 單物料 MRP 記錄
///
/// 每次運算重新產生，不就地修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrpRecord {
    /// 物料ID
    pub item_id: ItemId,

    /// 低階碼
    pub low_level_code: u32,

    /// 使用的提前期（期）
    pub lead_time: u32,

    /// 使用的批量規則
    pub lot_sizing: LotSizingPolicy,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 期初庫存
    pub on_hand_start: Decimal,

    /// 逐期計算表（期別 1..=H）
    pub rows: Vec<MrpPeriodRow>,

    /// 計劃訂單（依收貨期排序，含已逾期下達者）
    pub planned_orders: Vec<PlannedOrder>,

    /// 毛需求追溯
    pub pegging: Vec<PeggingRecord>,
}

impl MrpRecord {
    /// 計劃訂單下達清單 `(下達期, 數量)`，下達期 ≤ 0 表示已逾期
    pub fn planned_order_releases(&self) -> Vec<(i64, Decimal)> {
        self.planned_orders
            .iter()
            .map(|o| (o.release_period, o.quantity))
            .collect()
    }

    /// 已逾期（下達期在計劃時界之前）的計劃訂單
    pub fn past_due_orders(&self) -> impl Iterator<Item = &PlannedOrder> {
        self.planned_orders.iter().filter(|o| o.is_past_due())
    }

    /// 獲取指定期別的列
    pub fn row(&self, period: Period) -> Option<&MrpPeriodRow> {
        period
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx as usize))
    }

    /// 計劃時界
    pub fn horizon(&self) -> u32 {
        self.rows.len() as u32
    }

    /// 毛需求合計（溢位時為 None）
    pub fn total_gross_requirements(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.gross_requirements))
    }

    /// 計劃訂單收貨合計（溢位時為 None）
    pub fn total_planned_receipts(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.planned_order_receipt))
    }

    /// 期末預計庫存
    pub fn ending_on_hand(&self) -> Decimal {
        self.rows
            .last()
            .map(|r| r.projected_on_hand)
            .unwrap_or(self.on_hand_start)
    }
}
