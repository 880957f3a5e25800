//! BOM 關係模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ItemId, MrpError, Result};

/// BOM 關係（父件 → 子件）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomEdge {
    /// 父件ID
    pub parent_id: ItemId,

    /// 子件ID
    pub component_id: ItemId,

    /// 單位用量（每個父件需要的子件數量，必須 > 0）
    pub quantity_per: Decimal,

    /// 損耗係數（≥ 1.0，1.1 表示多備 10%）
    #[serde(default = "default_scrap_factor")]
    pub scrap_factor: Decimal,

    /// 子件提前期（期）
    #[serde(default)]
    pub lead_time: u32,

    /// 呼叫端提供的層級（僅供參考，引擎會重新計算低階碼）
    #[serde(default)]
    pub level: u32,
}

fn default_scrap_factor() -> Decimal {
    Decimal::ONE
}

impl BomEdge {
    /// 創建新的 BOM 關係（無損耗、提前期 0）
    pub fn new(parent_id: impl Into<ItemId>, component_id: impl Into<ItemId>, quantity_per: Decimal) -> Self {
        Self {
            parent_id: parent_id.into(),
            component_id: component_id.into(),
            quantity_per,
            scrap_factor: Decimal::ONE,
            lead_time: 0,
            level: 0,
        }
    }

    /// 建構器模式：設置損耗係數
    pub fn with_scrap_factor(mut self, scrap_factor: Decimal) -> Self {
        self.scrap_factor = scrap_factor;
        self
    }

    /// 建構器模式：設置子件提前期
    pub fn with_lead_time(mut self, lead_time: u32) -> Self {
        self.lead_time = lead_time;
        self
    }

    /// 建構器模式：設置參考層級
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// 每個父件實際消耗的子件數量（用量 × 損耗係數）
    ///
    /// 通過 [`BomEdge::validate`] 的關係保證乘積可表示。
    pub fn extended_quantity(&self) -> Decimal {
        self.quantity_per
            .checked_mul(self.scrap_factor)
            .unwrap_or(Decimal::MAX)
    }

    /// 驗證單一關係
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| MrpError::InvalidBomEdge {
            parent: self.parent_id.clone(),
            component: self.component_id.clone(),
            reason: reason.to_string(),
        };

        if self.parent_id == self.component_id {
            return Err(MrpError::CyclicBom {
                path: vec![self.parent_id.clone(), self.component_id.clone()],
            });
        }
        if self.quantity_per <= Decimal::ZERO {
            return Err(invalid("單位用量必須大於 0"));
        }
        if self.scrap_factor < Decimal::ONE {
            return Err(invalid("損耗係數不可小於 1"));
        }
        if self.quantity_per.checked_mul(self.scrap_factor).is_none() {
            return Err(invalid("用量 × 損耗係數超出可表示範圍"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_quantity() {
        let edge = BomEdge::new("F", "C", Decimal::from(2)).with_scrap_factor(Decimal::new(11, 1));
        assert_eq!(edge.extended_quantity(), Decimal::new(22, 1));
    }

    #[test]
    fn test_invalid_quantity_per() {
        let edge = BomEdge::new("F", "C", Decimal::ZERO);
        assert!(matches!(edge.validate(), Err(MrpError::InvalidBomEdge { .. })));
    }

    #[test]
    fn test_invalid_scrap_factor() {
        let edge = BomEdge::new("F", "C", Decimal::ONE).with_scrap_factor(Decimal::new(9, 1));
        assert!(matches!(edge.validate(), Err(MrpError::InvalidBomEdge { .. })));
    }

    #[test]
    fn test_unrepresentable_extended_quantity() {
        let edge = BomEdge::new("F", "C", Decimal::MAX).with_scrap_factor(Decimal::from(2));
        assert!(matches!(edge.validate(), Err(MrpError::InvalidBomEdge { .. })));
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let edge = BomEdge::new("A", "A", Decimal::ONE);
        assert!(matches!(edge.validate(), Err(MrpError::CyclicBom { .. })));
    }

    #[test]
    fn test_deserialize_defaults() {
        let edge: BomEdge = serde_json::from_str(
            r#"{"parent_id":"F","component_id":"C","quantity_per":"2"}"#,
        )
        .unwrap();
        assert_eq!(edge.scrap_factor, Decimal::ONE);
        assert_eq!(edge.lead_time, 0);
    }
}
