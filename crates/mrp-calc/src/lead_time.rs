//! 提前期計算（累計提前期 / 關鍵路徑）

use mrp_core::{ItemId, MrpConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bom_graph::BomGraph;

/// 關鍵路徑：從物料往下到某個原材料的最長累計提前期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPath {
    /// 起點物料
    pub item_id: ItemId,
    /// 累計提前期（期）
    pub total_lead_time: u32,
    /// 路徑（起點物料在前，原材料在後）
    pub path: Vec<ItemId>,
}

impl CriticalPath {
    /// 計劃時界至少需要多少期，末期需求才能在時界內完成整條路徑的下達
    pub fn minimum_horizon(&self) -> u32 {
        self.total_lead_time.saturating_add(1)
    }
}

/// 交期計算器
pub struct LeadTimeCalculator;

impl LeadTimeCalculator {
    /// 決定物料的提前期
    ///
    /// 優先使用物料配置；否則取 BOM 中以此物料為子件的關係之最大提前期；再無則為 0。
    pub fn resolve(item_id: &str, config: Option<&MrpConfig>, graph: &BomGraph) -> u32 {
        config
            .and_then(|c| c.lead_time_periods)
            .or_else(|| graph.component_lead_time(item_id))
            .unwrap_or(0)
    }

    /// 計算以 `item_id` 為根的關鍵路徑
    ///
    /// 依拓撲逆序做深度優先的記憶化：
    /// `累計(x) = 提前期(x) + max(累計(子件))`，同值時取 BOM 中先出現的子件。
    pub fn critical_path<F>(
        graph: &BomGraph,
        item_id: &str,
        lead_time_of: F,
    ) -> mrp_core::Result<CriticalPath>
    where
        F: Fn(&str) -> u32,
    {
        let order = graph.topological_order()?;

        // 物料 → (累計提前期, 關鍵子件)
        let mut cumulative: HashMap<&str, (u32, Option<&str>)> = HashMap::new();
        for item in order.iter().rev() {
            let mut best: Option<(u32, &str)> = None;
            for edge in graph.children(item) {
                let child_total = cumulative
                    .get(edge.component_id.as_str())
                    .map_or(0, |(total, _)| *total);
                if best.map_or(true, |(b, _)| child_total > b) {
                    best = Some((child_total, edge.component_id.as_str()));
                }
            }
            let own = lead_time_of(item);
            let total = own.saturating_add(best.map_or(0, |(b, _)| b));
            cumulative.insert(item.as_str(), (total, best.map(|(_, c)| c)));
        }

        let mut path = vec![item_id.to_string()];
        let total_lead_time = match cumulative.get(item_id) {
            Some(&(total, mut next)) => {
                while let Some(child) = next {
                    path.push(child.to_string());
                    next = cumulative.get(child).and_then(|(_, n)| *n);
                }
                total
            }
            // 不在 BOM 中的物料：只有自身提前期
            None => lead_time_of(item_id),
        };

        Ok(CriticalPath {
            item_id: item_id.to_string(),
            total_lead_time,
            path,
        })
    }
}
