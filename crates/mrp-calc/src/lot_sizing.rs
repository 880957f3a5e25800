//! 批量規則實現

use mrp_core::{LotSizingPolicy, MrpConfig, MrpError};
use rust_decimal::Decimal;

/// 批量規則計算器
pub struct LotSizingCalculator;

impl LotSizingCalculator {
    /// 應用批量規則：淨需求 → 訂購量
    ///
    /// 淨需求為 0 時一律不下單，避免產生幽靈訂單。
    /// 固定批量向上取整超出 Decimal 範圍時為 None。
    pub fn apply(policy: LotSizingPolicy, net_requirement: Decimal) -> Option<Decimal> {
        if net_requirement <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        match policy {
            LotSizingPolicy::LotForLot => Some(Self::lot_for_lot(net_requirement)),
            LotSizingPolicy::FixedOrderQuantity(lot_size) => {
                Self::fixed_order_quantity(net_requirement, lot_size)
            }
            LotSizingPolicy::EconomicOrderQuantity(eoq) => {
                Some(Self::economic_order_quantity(net_requirement, eoq))
            }
            LotSizingPolicy::PeriodOrderQuantity => {
                Some(Self::period_order_quantity(net_requirement))
            }
        }
    }

    /// 應用物料配置：批量規則之後再套用最小訂購量與訂購倍數
    pub fn order_quantity(config: &MrpConfig, net_requirement: Decimal) -> mrp_core::Result<Decimal> {
        Self::apply(config.lot_sizing, net_requirement)
            .and_then(|qty| config.adjust_order_quantity(qty))
            .ok_or_else(|| MrpError::overflow("訂購量", &config.item_id))
    }

    /// 批對批（Lot for Lot）
    fn lot_for_lot(net_requirement: Decimal) -> Decimal {
        net_requirement
    }

    /// 固定訂購量（Fixed Order Quantity）
    /// 訂購固定批量的整數倍，可能超量
    fn fixed_order_quantity(net_requirement: Decimal, lot_size: Decimal) -> Option<Decimal> {
        if lot_size <= Decimal::ZERO {
            return Some(net_requirement);
        }
        net_requirement
            .checked_div(lot_size)?
            .ceil()
            .checked_mul(lot_size)
    }

    /// 經濟訂購量（EOQ）
    /// 一旦觸發，至少生產一個 EOQ 批量
    fn economic_order_quantity(net_requirement: Decimal, eoq: Decimal) -> Decimal {
        net_requirement.max(eoq)
    }

    /// 週期訂購量（POQ）
    /// 單物料層級不合併多期需求，行為同批對批
    fn period_order_quantity(net_requirement: Decimal) -> Decimal {
        Self::lot_for_lot(net_requirement)
    }
}
