//! 計劃訂單與需求追溯模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ItemId, Period, ProcurementType};

/// 計劃訂單類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedOrderType {
    /// 採購
    Purchase,
    /// 生產
    Production,
    /// 調撥
    Transfer,
}

impl From<ProcurementType> for PlannedOrderType {
    fn from(procurement_type: ProcurementType) -> Self {
        match procurement_type {
            ProcurementType::Buy => PlannedOrderType::Purchase,
            ProcurementType::Make => PlannedOrderType::Production,
            ProcurementType::Transfer => PlannedOrderType::Transfer,
        }
    }
}

/// 計劃訂單（MRP計算結果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOrder {
    /// 計劃訂單ID（由物料與收貨期推導，同一輸入必得同一ID）
    pub id: Uuid,

    /// 物料ID
    pub item_id: ItemId,

    /// 計劃數量
    pub quantity: Decimal,

    /// 收貨期（完成期）
    pub receipt_period: Period,

    /// 下達期（開始期）= 收貨期 - 提前期，可能 ≤ 0
    pub release_period: i64,

    /// 訂單類型
    pub order_type: PlannedOrderType,
}

impl PlannedOrder {
    /// 創建新的計劃訂單
    pub fn new(
        item_id: impl Into<ItemId>,
        quantity: Decimal,
        receipt_period: Period,
        lead_time: u32,
        order_type: PlannedOrderType,
    ) -> Self {
        let item_id = item_id.into();
        Self {
            id: Self::derive_id(&item_id, receipt_period),
            release_period: i64::from(receipt_period) - i64::from(lead_time),
            item_id,
            quantity,
            receipt_period,
            order_type,
        }
    }

    fn derive_id(item_id: &str, receipt_period: Period) -> Uuid {
        let key = format!("planned-order/{item_id}/{receipt_period}");
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
    }

    /// 下達期是否已落在計劃時界之前（需加急）
    pub fn is_past_due(&self) -> bool {
        self.release_period < 1
    }

    /// 下達期（若在計劃時界內）
    pub fn release_period_in_horizon(&self) -> Option<Period> {
        Period::try_from(self.release_period).ok().filter(|p| *p >= 1)
    }

    /// 計算提前期（期數）
    pub fn lead_time(&self) -> i64 {
        i64::from(self.receipt_period) - self.release_period
    }

    /// 檢查是否為採購訂單
    pub fn is_purchase(&self) -> bool {
        self.order_type == PlannedOrderType::Purchase
    }

    /// 檢查是否為生產訂單
    pub fn is_production(&self) -> bool {
        self.order_type == PlannedOrderType::Production
    }
}

/// 毛需求來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DemandSource {
    /// 主生產排程（獨立需求）
    Independent { source_ref: Option<String> },
    /// 父件計劃訂單展開（相依需求）
    Dependent { parent_id: ItemId, order_id: Uuid },
}

/// 需求追溯記錄（單層）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeggingRecord {
    /// 需求所在期別
    pub period: Period,

    /// 追溯數量
    pub quantity: Decimal,

    /// 需求來源
    pub source: DemandSource,
}

impl PeggingRecord {
    /// 創建獨立需求的追溯記錄
    pub fn independent(period: Period, quantity: Decimal, source_ref: Option<String>) -> Self {
        Self {
            period,
            quantity,
            source: DemandSource::Independent { source_ref },
        }
    }

    /// 創建相依需求的追溯記錄
    pub fn dependent(period: Period, quantity: Decimal, parent: &PlannedOrder) -> Self {
        Self {
            period,
            quantity,
            source: DemandSource::Dependent {
                parent_id: parent.item_id.clone(),
                order_id: parent.id,
            },
        }
    }

    /// 父件ID（獨立需求為 None）
    pub fn parent_id(&self) -> Option<&str> {
        match &self.source {
            DemandSource::Dependent { parent_id, .. } => Some(parent_id),
            DemandSource::Independent { .. } => None,
        }
    }

    pub fn is_independent(&self) -> bool {
        matches!(self.source, DemandSource::Independent { .. })
    }
}
