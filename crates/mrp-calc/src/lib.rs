//! # MRP Calculation Engine
//!
//! 核心 MRP 計算引擎：BOM 圖、批量、淨需求、BOM 展開、需求追溯、行動訊息

pub mod action;
pub mod bom_graph;
pub mod bucketing;
pub mod calculator;
pub mod lead_time;
pub mod lot_sizing;
pub mod netting;
pub mod pegging;

use mrp_core::{ActionMessage, MrpRecord, MrpWarning, PlannedOrder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// Re-export 主要類型
pub use action::ActionMessageGenerator;
pub use bom_graph::BomGraph;
pub use bucketing::{BucketingCalculator, DatedQuantity};
pub use calculator::MrpCalculator;
pub use lead_time::{CriticalPath, LeadTimeCalculator};
pub use lot_sizing::LotSizingCalculator;
pub use netting::{NettingCalculator, NettingResult};
pub use pegging::{PeggedRequirement, PeggingCalculator, PeggingType};

/// MRP 計算結果
///
/// 同一份輸入必得到完全相同的結果；不含任何時間戳記或耗時資訊。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrpPlan {
    /// 每個物料一筆記錄，依（低階碼, 物料）排序
    pub records: Vec<MrpRecord>,

    /// 加急 / 下達（/ 超載）訊息
    pub action_messages: Vec<ActionMessage>,

    /// 警告信息
    pub warnings: Vec<MrpWarning>,

    /// 主排程物料的關鍵路徑
    pub critical_paths: Vec<CriticalPath>,
}

impl MrpPlan {
    /// 查詢單一物料的記錄
    pub fn record(&self, item_id: &str) -> Option<&MrpRecord> {
        self.records.iter().find(|r| r.item_id == item_id)
    }

    /// 所有計劃訂單
    pub fn planned_orders(&self) -> impl Iterator<Item = &PlannedOrder> {
        self.records.iter().flat_map(|r| r.planned_orders.iter())
    }

    /// 需求追溯
    pub fn pegging(&self, pegging_type: PeggingType) -> BTreeMap<Uuid, Vec<PeggedRequirement>> {
        PeggingCalculator::perform(&self.records, pegging_type)
    }
}
