//! MRP 配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ensure_non_negative, ItemId, MrpError, Result};

/// 物料MRP參數配置
///
/// 未提供配置的物料使用 [`MrpConfig::default_for`]：批對批、無安全庫存、無訂購量限制。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrpConfig {
    /// 物料ID
    pub item_id: ItemId,

    /// 批量規則
    #[serde(default)]
    pub lot_sizing: LotSizingPolicy,

    /// 提前期（期）
    ///
    /// 未設置時取 BOM 中以此物料為子件的關係之最大提前期，再無則為 0。
    #[serde(default)]
    pub lead_time_periods: Option<u32>,

    /// 安全庫存
    #[serde(default)]
    pub safety_stock: Decimal,

    /// 最小訂購量
    #[serde(default)]
    pub minimum_order_qty: Option<Decimal>,

    /// 訂購倍數（必須是此倍數）
    #[serde(default)]
    pub order_multiple: Option<Decimal>,

    /// 採購/生產標記
    #[serde(default)]
    pub procurement_type: ProcurementType,
}

impl MrpConfig {
    /// 創建新的 MRP 配置
    pub fn new(item_id: impl Into<ItemId>, procurement_type: ProcurementType) -> Self {
        Self {
            item_id: item_id.into(),
            lot_sizing: LotSizingPolicy::LotForLot,
            lead_time_periods: None,
            safety_stock: Decimal::ZERO,
            minimum_order_qty: None,
            order_multiple: None,
            procurement_type,
        }
    }

    /// 缺少配置時的預設值
    pub fn default_for(item_id: impl Into<ItemId>) -> Self {
        Self::new(item_id, ProcurementType::default())
    }

    /// 建構器模式：設置批量規則
    pub fn with_lot_sizing(mut self, policy: LotSizingPolicy) -> Self {
        self.lot_sizing = policy;
        self
    }

    /// 建構器模式：設置提前期
    pub fn with_lead_time(mut self, periods: u32) -> Self {
        self.lead_time_periods = Some(periods);
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, stock: Decimal) -> Self {
        self.safety_stock = stock;
        self
    }

    /// 建構器模式：設置最小訂購量
    pub fn with_minimum_order_qty(mut self, qty: Decimal) -> Self {
        self.minimum_order_qty = Some(qty);
        self
    }

    /// 建構器模式：設置訂購倍數
    pub fn with_order_multiple(mut self, multiple: Decimal) -> Self {
        self.order_multiple = Some(multiple);
        self
    }

    /// 調整訂購量以符合最小訂購量與訂購倍數
    ///
    /// 只會向上調整；數量為 0 時不產生訂單。向上取倍數溢位時為 None。
    pub fn adjust_order_quantity(&self, mut quantity: Decimal) -> Option<Decimal> {
        if quantity <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        // 應用最小訂購量
        if let Some(min_qty) = self.minimum_order_qty {
            if quantity < min_qty {
                quantity = min_qty;
            }
        }

        // 應用訂購倍數
        if let Some(multiple) = self.order_multiple {
            if multiple > Decimal::ZERO {
                let remainder = quantity % multiple;
                if remainder > Decimal::ZERO {
                    quantity = (quantity - remainder).checked_add(multiple)?;
                }
            }
        }

        Some(quantity)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("安全庫存", &self.item_id, self.safety_stock)?;
        self.lot_sizing.validate(&self.item_id)?;

        if let Some(min_qty) = self.minimum_order_qty {
            if min_qty < Decimal::ZERO {
                return Err(MrpError::InvalidLotSize {
                    item: self.item_id.clone(),
                    reason: format!("最小訂購量不可為負: {min_qty}"),
                });
            }
        }
        if let Some(multiple) = self.order_multiple {
            if multiple <= Decimal::ZERO {
                return Err(MrpError::InvalidLotSize {
                    item: self.item_id.clone(),
                    reason: format!("訂購倍數必須大於 0: {multiple}"),
                });
            }
        }
        Ok(())
    }
}

/// 採購類型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcurementType {
    /// 採購
    Buy,
    /// 生產
    #[default]
    Make,
    /// 調撥
    Transfer,
}

/// 批量規則
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "quantity")]
pub enum LotSizingPolicy {
    /// 批對批（Lot for Lot）- 按實際淨需求訂購
    #[default]
    LotForLot,

    /// 固定訂購量（Fixed Order Quantity）- 訂購量為固定批量的整數倍
    FixedOrderQuantity(Decimal),

    /// 經濟訂購量（Economic Order Quantity）- 至少訂購 EOQ 批量
    EconomicOrderQuantity(Decimal),

    /// 週期訂購量（Period Order Quantity）
    ///
    /// 單物料層級等同批對批，不合併多期需求。
    PeriodOrderQuantity,
}

impl LotSizingPolicy {
    pub fn validate(&self, item_id: &str) -> Result<()> {
        let invalid = |reason: String| MrpError::InvalidLotSize {
            item: item_id.to_string(),
            reason,
        };

        match *self {
            LotSizingPolicy::FixedOrderQuantity(q) if q <= Decimal::ZERO => {
                Err(invalid(format!("固定批量必須大於 0: {q}")))
            }
            LotSizingPolicy::EconomicOrderQuantity(q) if q < Decimal::ZERO => {
                Err(invalid(format!("經濟批量不可為負: {q}")))
            }
            _ => Ok(()),
        }
    }
}

/// 相依需求的時間點
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependentDemandTiming {
    /// 子件需求落在父件計劃訂單下達期（開工即需領料）
    #[default]
    AtParentRelease,
    /// 子件需求落在父件計劃訂單收貨期
    AtParentReceipt,
}

/// 整次計劃運算的選項
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningOptions {
    /// 計劃時界（期數）
    pub horizon_periods: u32,

    /// 同層物料是否並行計算
    #[serde(default)]
    pub parallel: bool,

    /// 相依需求時間點
    #[serde(default)]
    pub dependent_demand_timing: DependentDemandTiming,
}

impl PlanningOptions {
    pub fn new(horizon_periods: u32) -> Self {
        Self {
            horizon_periods,
            parallel: false,
            dependent_demand_timing: DependentDemandTiming::default(),
        }
    }

    /// 建構器模式：啟用同層並行計算
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置相依需求時間點
    pub fn with_dependent_demand_timing(mut self, timing: DependentDemandTiming) -> Self {
        self.dependent_demand_timing = timing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_periods == 0 {
            return Err(MrpError::InvalidHorizon);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_config() {
        let config = MrpConfig::new("BIKE-001", ProcurementType::Make).with_lead_time(5);

        assert_eq!(config.item_id, "BIKE-001");
        assert_eq!(config.lead_time_periods, Some(5));
        assert_eq!(config.lot_sizing, LotSizingPolicy::LotForLot);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = MrpConfig::new("FRAME-001", ProcurementType::Buy)
            .with_lot_sizing(LotSizingPolicy::FixedOrderQuantity(Decimal::from(100)))
            .with_minimum_order_qty(Decimal::from(50))
            .with_safety_stock(Decimal::from(20));

        assert_eq!(
            config.lot_sizing,
            LotSizingPolicy::FixedOrderQuantity(Decimal::from(100))
        );
        assert_eq!(config.minimum_order_qty, Some(Decimal::from(50)));
        assert_eq!(config.safety_stock, Decimal::from(20));
    }

    #[test]
    fn test_adjust_order_quantity() {
        let config = MrpConfig::new("WHEEL-001", ProcurementType::Buy)
            .with_minimum_order_qty(Decimal::from(50))
            .with_order_multiple(Decimal::from(10));

        // 低於最小訂購量
        assert_eq!(config.adjust_order_quantity(Decimal::from(30)), Some(Decimal::from(50)));

        // 需要調整到倍數
        assert_eq!(config.adjust_order_quantity(Decimal::from(75)), Some(Decimal::from(80)));

        // 無需求不下單
        assert_eq!(config.adjust_order_quantity(Decimal::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn test_order_multiple_adjustment() {
        let config = MrpConfig::new("SCREW-001", ProcurementType::Buy)
            .with_order_multiple(Decimal::from(100));

        // 123 應該調整為 200
        assert_eq!(config.adjust_order_quantity(Decimal::from(123)), Some(Decimal::from(200)));

        // 200 已經是倍數，不需調整
        assert_eq!(config.adjust_order_quantity(Decimal::from(200)), Some(Decimal::from(200)));
    }

    #[test]
    fn test_order_multiple_overflow() {
        let config = MrpConfig::new("SCREW-001", ProcurementType::Buy)
            .with_order_multiple(Decimal::from(1000));

        assert_eq!(config.adjust_order_quantity(Decimal::MAX), None);
    }

    #[test]
    fn test_invalid_fixed_lot_size() {
        let config = MrpConfig::default_for("X")
            .with_lot_sizing(LotSizingPolicy::FixedOrderQuantity(Decimal::ZERO));
        assert!(matches!(
            config.validate(),
            Err(MrpError::InvalidLotSize { .. })
        ));
    }

    #[test]
    fn test_lot_sizing_policy_serde() {
        let json = serde_json::to_string(&LotSizingPolicy::FixedOrderQuantity(Decimal::from(25)))
            .unwrap();
        assert_eq!(json, r#"{"method":"FixedOrderQuantity","quantity":"25"}"#);

        let policy: LotSizingPolicy = serde_json::from_str(r#"{"method":"LotForLot"}"#).unwrap();
        assert_eq!(policy, LotSizingPolicy::LotForLot);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert_eq!(PlanningOptions::new(0).validate(), Err(MrpError::InvalidHorizon));
    }
}
