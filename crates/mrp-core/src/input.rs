//! 計劃運算輸入快照

use serde::{Deserialize, Serialize};

use crate::{
    BomEdge, InventorySnapshot, MasterScheduleEntry, MrpConfig, MrpError, PlanningOptions, Result,
    ScheduledReceipt,
};

/// 一次 MRP 運算所需的完整輸入
///
/// 呼叫端負責持久化與讀取；引擎只消費這份不可變快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningInput {
    /// 主生產排程
    #[serde(default)]
    pub master_schedule: Vec<MasterScheduleEntry>,

    /// BOM 關係
    #[serde(default)]
    pub bom: Vec<BomEdge>,

    /// 期初庫存
    #[serde(default)]
    pub inventory: InventorySnapshot,

    /// 預計收貨
    #[serde(default)]
    pub scheduled_receipts: Vec<ScheduledReceipt>,

    /// 物料配置（未列出者使用預設值）
    #[serde(default)]
    pub configs: Vec<MrpConfig>,

    /// 運算選項
    pub options: PlanningOptions,
}

impl PlanningInput {
    /// 創建空的輸入
    pub fn new(options: PlanningOptions) -> Self {
        Self {
            master_schedule: Vec::new(),
            bom: Vec::new(),
            inventory: InventorySnapshot::new(),
            scheduled_receipts: Vec::new(),
            configs: Vec::new(),
            options,
        }
    }

    /// 建構器模式：設置主生產排程
    pub fn with_master_schedule(mut self, entries: Vec<MasterScheduleEntry>) -> Self {
        self.master_schedule = entries;
        self
    }

    /// 建構器模式：設置 BOM
    pub fn with_bom(mut self, edges: Vec<BomEdge>) -> Self {
        self.bom = edges;
        self
    }

    /// 建構器模式：設置庫存
    pub fn with_inventory(mut self, inventory: InventorySnapshot) -> Self {
        self.inventory = inventory;
        self
    }

    /// 建構器模式：設置預計收貨
    pub fn with_scheduled_receipts(mut self, receipts: Vec<ScheduledReceipt>) -> Self {
        self.scheduled_receipts = receipts;
        self
    }

    /// 建構器模式：添加物料配置
    pub fn with_config(mut self, config: MrpConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// 逐筆驗證輸入（BOM 循環檢查由展開引擎負責）
    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;

        for edge in &self.bom {
            edge.validate()?;
        }
        for entry in &self.master_schedule {
            entry.validate()?;
        }
        for receipt in &self.scheduled_receipts {
            receipt.validate()?;
        }
        for config in &self.configs {
            config.validate()?;
        }
        self.inventory.validate()
    }

    /// 從 JSON 解析
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MrpError::InvalidInput(e.to_string()))
    }

    /// 序列化為 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MrpError::InvalidInput(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_minimal_json() {
        let input = PlanningInput::from_json(
            r#"{
                "master_schedule": [{"period": 5, "item_id": "A", "quantity": "100"}],
                "inventory": {"A": "20"},
                "configs": [{"item_id": "A", "lead_time_periods": 2}],
                "options": {"horizon_periods": 8}
            }"#,
        )
        .unwrap();

        assert_eq!(input.master_schedule.len(), 1);
        assert_eq!(input.inventory.on_hand("A"), Decimal::from(20));
        assert_eq!(input.configs[0].lead_time_periods, Some(2));
        assert!(!input.options.parallel);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_invalid_json_reported() {
        let err = PlanningInput::from_json("{not json").unwrap_err();
        assert!(matches!(err, MrpError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_negative_inventory() {
        let input = PlanningInput::new(PlanningOptions::new(4))
            .with_inventory(InventorySnapshot::new().with_balance("A", Decimal::from(-3)));

        assert!(matches!(
            input.validate(),
            Err(MrpError::NegativeQuantity { .. })
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_input() {
        let input = PlanningInput::new(PlanningOptions::new(6))
            .with_master_schedule(vec![MasterScheduleEntry::new(2, "A", Decimal::from(10))])
            .with_bom(vec![BomEdge::new("A", "B", Decimal::from(2))]);

        let json = input.to_json().unwrap();
        assert_eq!(PlanningInput::from_json(&json).unwrap(), input);
    }
}
