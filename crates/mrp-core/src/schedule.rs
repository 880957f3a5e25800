//! 主生產排程與預計收貨模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ensure_non_negative, ensure_period, ItemId, Period, Result};

/// 主生產排程項目（獨立需求）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterScheduleEntry {
    /// 期別（從 1 開始）
    pub period: Period,

    /// 物料ID
    pub item_id: ItemId,

    /// 需求數量
    pub quantity: Decimal,

    /// 來源單據（如銷售訂單號）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

impl MasterScheduleEntry {
    /// 創建新的排程項目
    pub fn new(period: Period, item_id: impl Into<ItemId>, quantity: Decimal) -> Self {
        Self {
            period,
            item_id: item_id.into(),
            quantity,
            source_ref: None,
        }
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_period("主生產排程", &self.item_id, self.period)?;
        ensure_non_negative("主生產排程", &self.item_id, self.quantity)
    }
}

/// 預計收貨（運算前已確認的在途採購單/工單）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReceipt {
    /// 物料ID
    pub item_id: ItemId,

    /// 到貨期別
    pub period: Period,

    /// 收貨數量
    pub quantity: Decimal,

    /// 來源單據（如採購單號）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

impl ScheduledReceipt {
    /// 創建新的預計收貨
    pub fn new(item_id: impl Into<ItemId>, period: Period, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            period,
            quantity,
            source_ref: None,
        }
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_period("預計收貨", &self.item_id, self.period)?;
        ensure_non_negative("預計收貨", &self.item_id, self.quantity)
    }
}
