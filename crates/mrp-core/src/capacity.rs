//! 產能模型（工作中心、途程、負荷）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ensure_non_negative, ItemId, Period, Result};

/// 工作中心
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCenter {
    /// 工作中心ID
    pub id: String,

    /// 每期可用工時
    pub hours_available_per_period: Decimal,
}

impl WorkCenter {
    pub fn new(id: impl Into<String>, hours_available_per_period: Decimal) -> Self {
        Self {
            id: id.into(),
            hours_available_per_period,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("工作中心可用工時", &self.id, self.hours_available_per_period)
    }
}

/// 途程工序（物料在某工作中心的工時）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStep {
    /// 物料ID
    pub item_id: ItemId,

    /// 工作中心ID
    pub work_center: String,

    /// 每張訂單的準備工時
    #[serde(default)]
    pub setup_hours: Decimal,

    /// 每單位加工工時
    #[serde(default)]
    pub run_hours_per_unit: Decimal,
}

impl RoutingStep {
    pub fn new(
        item_id: impl Into<ItemId>,
        work_center: impl Into<String>,
        setup_hours: Decimal,
        run_hours_per_unit: Decimal,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            work_center: work_center.into(),
            setup_hours,
            run_hours_per_unit,
        }
    }

    /// 一張訂單在此工序所需工時（溢位時為 None）
    pub fn hours_for(&self, quantity: Decimal) -> Option<Decimal> {
        self.run_hours_per_unit
            .checked_mul(quantity)?
            .checked_add(self.setup_hours)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("準備工時", &self.item_id, self.setup_hours)?;
        ensure_non_negative("單位加工工時", &self.item_id, self.run_hours_per_unit)
    }
}

/// 工作中心逐期負荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrpLoadRow {
    pub work_center: String,
    pub period: Period,
    pub required_hours: Decimal,
    pub available_hours: Decimal,
    /// 負荷率（%），可用工時為 0 或比值超出可表示範圍時為 None
    pub utilization_pct: Option<Decimal>,
    pub overloaded: bool,
}

impl CrpLoadRow {
    /// 由需求工時與可用工時推導負荷列
    pub fn new(
        work_center: impl Into<String>,
        period: Period,
        required_hours: Decimal,
        available_hours: Decimal,
    ) -> Self {
        let utilization_pct = (available_hours > Decimal::ZERO)
            .then(|| required_hours.checked_div(available_hours))
            .flatten()
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

        Self {
            work_center: work_center.into(),
            period,
            required_hours,
            available_hours,
            utilization_pct,
            overloaded: required_hours > available_hours,
        }
    }

    /// 超出可用工時的部分
    pub fn overload_hours(&self) -> Decimal {
        (self.required_hours - self.available_hours).max(Decimal::ZERO)
    }
}

/// 超載摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overload {
    pub work_center: String,
    pub period: Period,
    pub overload_hours: Decimal,
}

impl From<&CrpLoadRow> for Overload {
    fn from(row: &CrpLoadRow) -> Self {
        Self {
            work_center: row.work_center.clone(),
            period: row.period,
            overload_hours: row.overload_hours(),
        }
    }
}
