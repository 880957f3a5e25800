//! 產能需求計劃（CRP）

use mrp_core::{CrpLoadRow, MrpError, Overload, Period, PlannedOrder, RoutingStep, WorkCenter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// CRP 計算結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrpResult {
    /// 每個工作中心 × 每期一列，依（工作中心, 期別）排序
    pub loading: Vec<CrpLoadRow>,

    /// 超載期別
    pub overloads: Vec<Overload>,
}

impl CrpResult {
    /// 查詢工作中心某期的負荷
    pub fn row(&self, work_center: &str, period: Period) -> Option<&CrpLoadRow> {
        self.loading
            .iter()
            .find(|r| r.work_center == work_center && r.period == period)
    }

    /// 工作中心的最高利用率（可用工時為 0 的期別不計）
    pub fn peak_utilization(&self, work_center: &str) -> Option<Decimal> {
        self.loading
            .iter()
            .filter(|r| r.work_center == work_center)
            .filter_map(|r| r.utilization_pct)
            .max()
    }

    /// 工作中心在整個時界內的需求工時（溢位時為 None）
    pub fn total_required_hours(&self, work_center: &str) -> Option<Decimal> {
        self.loading
            .iter()
            .filter(|r| r.work_center == work_center)
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.required_hours))
    }

    /// 是否有任何超載
    pub fn has_overload(&self) -> bool {
        !self.overloads.is_empty()
    }
}

/// 產能規劃器
pub struct CapacityPlanner;

impl CapacityPlanner {
    /// 計算工作中心負荷
    ///
    /// 訂單在下達期佔用產能；下達期已逾期或超出時界的訂單不計入負荷。
    /// 沒有途程的物料對任何工作中心貢獻 0 工時；途程引用不存在的工作中心時，
    /// 該工序略過並記錄警告。
    pub fn run(
        planned_orders: &[PlannedOrder],
        routings: &[RoutingStep],
        work_centers: &[WorkCenter],
        horizon_periods: u32,
    ) -> mrp_core::Result<CrpResult> {
        tracing::info!(
            "開始 CRP 計算：計劃訂單 {} 筆，途程 {} 筆，工作中心 {} 個",
            planned_orders.len(),
            routings.len(),
            work_centers.len()
        );

        Self::validate(routings, work_centers, horizon_periods)?;

        let known: BTreeSet<&str> = work_centers.iter().map(|wc| wc.id.as_str()).collect();
        let mut routings_by_item: HashMap<&str, Vec<&RoutingStep>> = HashMap::new();
        for step in routings {
            if !known.contains(step.work_center.as_str()) {
                tracing::warn!(
                    "物料 {} 的途程引用了不存在的工作中心 {}，該工序不計入負荷",
                    step.item_id,
                    step.work_center
                );
                continue;
            }
            routings_by_item
                .entry(step.item_id.as_str())
                .or_default()
                .push(step);
        }

        // (工作中心, 期別) → 需求工時
        let mut required: HashMap<(&str, Period), Decimal> = HashMap::new();
        for order in planned_orders {
            let Some(period) = order
                .release_period_in_horizon()
                .filter(|p| *p <= horizon_periods)
            else {
                tracing::debug!(
                    "計劃訂單 {}（{}）下達期 {} 不在時界內，不計入負荷",
                    order.id,
                    order.item_id,
                    order.release_period
                );
                continue;
            };

            for step in routings_by_item.get(order.item_id.as_str()).into_iter().flatten() {
                let slot = required
                    .entry((step.work_center.as_str(), period))
                    .or_insert(Decimal::ZERO);
                let total = step
                    .hours_for(order.quantity)
                    .and_then(|hours| slot.checked_add(hours))
                    .ok_or_else(|| MrpError::overflow("產能工時", &order.item_id))?;
                *slot = total;
            }
        }

        let available: BTreeMap<&str, Decimal> = work_centers
            .iter()
            .map(|wc| (wc.id.as_str(), wc.hours_available_per_period))
            .collect();

        let mut loading = Vec::with_capacity(available.len() * horizon_periods as usize);
        for (&work_center, &hours) in &available {
            for period in 1..=horizon_periods {
                let required_hours = required
                    .get(&(work_center, period))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                loading.push(CrpLoadRow::new(work_center, period, required_hours, hours));
            }
        }

        let overloads: Vec<Overload> = loading
            .iter()
            .filter(|r| r.overloaded)
            .map(Overload::from)
            .collect();

        for overload in &overloads {
            tracing::warn!(
                "工作中心 {} 第 {} 期超載 {} 小時",
                overload.work_center,
                overload.period,
                overload.overload_hours
            );
        }
        tracing::info!(
            "CRP 計算完成：負荷列 {} 筆，超載 {} 筆",
            loading.len(),
            overloads.len()
        );

        Ok(CrpResult { loading, overloads })
    }

    fn validate(
        routings: &[RoutingStep],
        work_centers: &[WorkCenter],
        horizon_periods: u32,
    ) -> mrp_core::Result<()> {
        if horizon_periods == 0 {
            return Err(MrpError::InvalidHorizon);
        }
        for work_center in work_centers {
            work_center.validate()?;
        }
        for step in routings {
            step.validate()?;
        }
        Ok(())
    }
}
