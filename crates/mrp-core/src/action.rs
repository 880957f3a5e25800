//! 行動訊息與警告

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ItemId, Period};

/// 行動訊息（計劃員需處理的訊號）
///
/// 不是錯誤：不可行的計劃照樣回傳完整記錄，並以此告知哪裡、差多少。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ActionMessage {
    /// 加急：下達期已落在計劃時界之前
    Expedite {
        item_id: ItemId,
        order_id: Uuid,
        release_period: i64,
        receipt_period: Period,
        quantity: Decimal,
    },
    /// 下達：本期必須下單
    Release {
        item_id: ItemId,
        order_id: Uuid,
        receipt_period: Period,
        quantity: Decimal,
    },
    /// 超載：工作中心該期負荷超過可用工時
    Overload {
        work_center: String,
        period: Period,
        required_hours: Decimal,
        available_hours: Decimal,
        overload_hours: Decimal,
    },
}

impl ActionMessage {
    /// 相關物料（超載訊息為 None）
    pub fn item_id(&self) -> Option<&str> {
        match self {
            ActionMessage::Expedite { item_id, .. } | ActionMessage::Release { item_id, .. } => {
                Some(item_id)
            }
            ActionMessage::Overload { .. } => None,
        }
    }

    pub fn is_expedite(&self) -> bool {
        matches!(self, ActionMessage::Expedite { .. })
    }

    pub fn is_release(&self) -> bool {
        matches!(self, ActionMessage::Release { .. })
    }

    pub fn is_overload(&self) -> bool {
        matches!(self, ActionMessage::Overload { .. })
    }
}

/// MRP 警告（可自動降級處理的輸入狀況）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrpWarning {
    pub item_id: ItemId,
    pub message: String,
    pub severity: WarningSeverity,
}

impl MrpWarning {
    pub fn new(item_id: impl Into<ItemId>, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            item_id: item_id.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn info(item_id: impl Into<ItemId>, message: impl Into<String>) -> Self {
        Self::new(item_id, message, WarningSeverity::Info)
    }

    pub fn warning(item_id: impl Into<ItemId>, message: impl Into<String>) -> Self {
        Self::new(item_id, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
