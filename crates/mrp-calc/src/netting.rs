//! 淨需求計算
//!
//! 單物料逐期由左至右的摺疊運算：毛需求 → 淨需求 → 批量 → 計劃訂單收貨/下達。
//! 不回溯，相同輸入必得相同輸出。

use mrp_core::{MrpConfig, MrpError, MrpPeriodRow, PlannedOrder, PlannedOrderType};
use rust_decimal::Decimal;

use crate::lot_sizing::LotSizingCalculator;

/// 單物料淨需求計算結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NettingResult {
    /// 逐期計算表（期別 1..=H）
    pub rows: Vec<MrpPeriodRow>,
    /// 計劃訂單（依收貨期排序）
    pub planned_orders: Vec<PlannedOrder>,
}

/// 淨需求計算器
pub struct NettingCalculator;

impl NettingCalculator {
    /// 計算淨需求
    ///
    /// # 參數
    /// * `gross_requirements` - 毛需求，索引 0 為第 1 期；長度即計劃時界
    /// * `scheduled_receipts` - 預計收貨，與毛需求對齊，不足的期別視為 0
    /// * `on_hand_start` - 期初庫存
    /// * `lead_time` - 提前期（期）
    /// * `config` - 批量規則、安全庫存、訂購量限制
    ///
    /// 淨需求 = max(0, 毛需求 + 安全庫存 - (前期庫存 + 預計收貨))。
    /// 下達期 = 收貨期 - 提前期；下達期 < 1 的訂單保留在計劃訂單中（逾期），
    /// 但不寫入任何期別列。
    ///
    /// 任何累加超出 Decimal 範圍時回傳 [`MrpError::QuantityOverflow`]。
    pub fn calculate(
        item_id: &str,
        gross_requirements: &[Decimal],
        scheduled_receipts: &[Decimal],
        on_hand_start: Decimal,
        lead_time: u32,
        config: &MrpConfig,
    ) -> mrp_core::Result<NettingResult> {
        let overflow = || MrpError::overflow("淨需求計算", item_id);
        let horizon = gross_requirements.len();
        let order_type = PlannedOrderType::from(config.procurement_type);

        let mut rows = Vec::with_capacity(horizon);
        let mut planned_orders = Vec::new();
        let mut on_hand = on_hand_start;

        for (idx, &gross) in gross_requirements.iter().enumerate() {
            let period = idx as u32 + 1;
            let receipt = scheduled_receipts.get(idx).copied().unwrap_or(Decimal::ZERO);

            let available = on_hand.checked_add(receipt).ok_or_else(overflow)?;
            let net = gross
                .checked_add(config.safety_stock)
                .and_then(|required| required.checked_sub(available))
                .ok_or_else(overflow)?
                .max(Decimal::ZERO);

            let order_qty = if net > Decimal::ZERO {
                LotSizingCalculator::order_quantity(config, net)?
            } else {
                Decimal::ZERO
            };

            if order_qty > Decimal::ZERO {
                planned_orders.push(PlannedOrder::new(
                    item_id,
                    order_qty,
                    period,
                    lead_time,
                    order_type,
                ));
            }

            on_hand = available
                .checked_add(order_qty)
                .and_then(|supply| supply.checked_sub(gross))
                .ok_or_else(overflow)?;

            rows.push(MrpPeriodRow {
                period,
                gross_requirements: gross,
                scheduled_receipts: receipt,
                projected_on_hand: on_hand.max(Decimal::ZERO),
                net_requirements: net,
                planned_order_receipt: order_qty,
                planned_order_release: Decimal::ZERO,
            });
        }

        // 下達期落在時界內者寫回對應期別
        for order in &planned_orders {
            if let Some(release) = order.release_period_in_horizon() {
                let row = &mut rows[release as usize - 1];
                row.planned_order_release = row
                    .planned_order_release
                    .checked_add(order.quantity)
                    .ok_or_else(overflow)?;
            }
        }

        Ok(NettingResult {
            rows,
            planned_orders,
        })
    }
}
