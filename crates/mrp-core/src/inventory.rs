//! 庫存快照

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ensure_non_negative, ItemId, Result};

/// 期初現有庫存（物料ID → 數量）
///
/// 未列出的物料視為 0。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot {
    balances: BTreeMap<ItemId, Decimal>,
}

impl InventorySnapshot {
    /// 創建空的庫存快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置物料庫存
    pub fn with_balance(mut self, item_id: impl Into<ItemId>, on_hand: Decimal) -> Self {
        self.set(item_id, on_hand);
        self
    }

    /// 設置物料庫存（覆蓋既有值）
    pub fn set(&mut self, item_id: impl Into<ItemId>, on_hand: Decimal) {
        self.balances.insert(item_id.into(), on_hand);
    }

    /// 獲取期初庫存
    pub fn on_hand(&self, item_id: &str) -> Decimal {
        self.balances.get(item_id).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Decimal)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        for (item_id, qty) in &self.balances {
            ensure_non_negative("庫存", item_id, *qty)?;
        }
        Ok(())
    }
}

impl<K: Into<ItemId>> FromIterator<(K, Decimal)> for InventorySnapshot {
    fn from_iter<T: IntoIterator<Item = (K, Decimal)>>(iter: T) -> Self {
        Self {
            balances: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
