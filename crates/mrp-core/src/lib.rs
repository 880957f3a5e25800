//! # MRP Core
//!
//! 核心資料模型與類型定義
//!
//! 所有類型都是值（快照），引擎只在單次計劃運算期間持有它們。

pub mod action;
pub mod bom;
pub mod calendar;
pub mod capacity;
pub mod config;
pub mod input;
pub mod inventory;
pub mod plan;
pub mod record;
pub mod schedule;

// Re-export 主要類型
pub use action::{ActionMessage, MrpWarning, WarningSeverity};
pub use bom::BomEdge;
pub use calendar::{BucketSize, PlanningCalendar};
pub use capacity::{CrpLoadRow, Overload, RoutingStep, WorkCenter};
pub use config::{
    DependentDemandTiming, LotSizingPolicy, MrpConfig, PlanningOptions, ProcurementType,
};
pub use input::PlanningInput;
pub use inventory::InventorySnapshot;
pub use plan::{DemandSource, PeggingRecord, PlannedOrder, PlannedOrderType};
pub use record::{MrpPeriodRow, MrpRecord};
pub use schedule::{MasterScheduleEntry, ScheduledReceipt};

/// 物料識別碼（以字串鍵引用）
pub type ItemId = String;

/// 期別（從 1 開始）
pub type Period = u32;

/// MRP 錯誤類型
///
/// 全部為結構性錯誤：一旦出現，整次運算中止，不回傳部分結果。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MrpError {
    #[error("BOM 存在循環: {}", path.join(" -> "))]
    CyclicBom { path: Vec<ItemId> },

    #[error("無效的 BOM 關係 {parent} -> {component}: {reason}")]
    InvalidBomEdge {
        parent: ItemId,
        component: ItemId,
        reason: String,
    },

    #[error("{context} 數量不可為負: 物料 {item}, 數量 {value}")]
    NegativeQuantity {
        context: &'static str,
        item: String,
        value: rust_decimal::Decimal,
    },

    #[error("{context} 期別無效: 物料 {item}, 期別 {period}（期別從 1 開始）")]
    InvalidPeriod {
        context: &'static str,
        item: String,
        period: Period,
    },

    #[error("計劃時界必須至少 1 期")]
    InvalidHorizon,

    #[error("物料 {item} 批量參數無效: {reason}")]
    InvalidLotSize { item: ItemId, reason: String },

    #[error("{context} 數值溢位: 物料 {item}")]
    QuantityOverflow { context: &'static str, item: ItemId },

    #[error("輸入資料解析失敗: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, MrpError>;

impl MrpError {
    /// 數量運算超出 Decimal 可表示範圍
    pub fn overflow(context: &'static str, item: &str) -> Self {
        Self::QuantityOverflow {
            context,
            item: item.to_string(),
        }
    }
}

/// 檢查數量不可為負
pub(crate) fn ensure_non_negative(
    context: &'static str,
    item: &str,
    value: rust_decimal::Decimal,
) -> Result<()> {
    if value < rust_decimal::Decimal::ZERO {
        return Err(MrpError::NegativeQuantity {
            context,
            item: item.to_string(),
            value,
        });
    }
    Ok(())
}

/// 檢查期別從 1 開始
pub(crate) fn ensure_period(context: &'static str, item: &str, period: Period) -> Result<()> {
    if period == 0 {
        return Err(MrpError::InvalidPeriod {
            context,
            item: item.to_string(),
            period,
        });
    }
    Ok(())
}
