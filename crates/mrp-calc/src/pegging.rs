//! 需求追溯

use mrp_core::{DemandSource, ItemId, MrpRecord, PlannedOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// 追溯類型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeggingType {
    /// 單層追溯
    SingleLevel,
    /// 多層追溯（追溯到最終需求）
    MultiLevel,
}

/// 計劃訂單所滿足的需求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeggedRequirement {
    /// 追溯數量
    pub quantity: Decimal,
    /// 追溯路徑（最上層物料在前，本物料在後）
    pub path: Vec<ItemId>,
    /// 最上層獨立需求的來源單據
    pub source_ref: Option<String>,
}

impl PeggedRequirement {
    /// 追溯深度（層級）
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// 最上層物料
    pub fn end_item(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// 需求追溯計算器
pub struct PeggingCalculator;

impl PeggingCalculator {
    /// 執行需求追溯
    ///
    /// 每張計劃訂單對應其收貨期的毛需求，依來源順序分配數量，直到訂單數量用完。
    pub fn perform(
        records: &[MrpRecord],
        pegging_type: PeggingType,
    ) -> BTreeMap<Uuid, Vec<PeggedRequirement>> {
        let index: HashMap<Uuid, (&PlannedOrder, &MrpRecord)> = records
            .iter()
            .flat_map(|r| r.planned_orders.iter().map(move |o| (o.id, (o, r))))
            .collect();

        let mut pegging_map = BTreeMap::new();
        for record in records {
            for order in &record.planned_orders {
                let pegged = Self::trace_order(order, record, &index, pegging_type);
                pegging_map.insert(order.id, pegged);
            }
        }

        pegging_map
    }

    /// 追溯單張訂單
    fn trace_order(
        order: &PlannedOrder,
        record: &MrpRecord,
        index: &HashMap<Uuid, (&PlannedOrder, &MrpRecord)>,
        pegging_type: PeggingType,
    ) -> Vec<PeggedRequirement> {
        let mut pegged = Vec::new();
        let mut remaining = order.quantity;

        for requirement in record
            .pegging
            .iter()
            .filter(|p| p.period == order.receipt_period)
        {
            if remaining <= Decimal::ZERO {
                break;
            }
            let quantity = requirement.quantity.min(remaining);
            remaining -= quantity;

            let (path, source_ref) = match (&requirement.source, pegging_type) {
                (DemandSource::Independent { source_ref }, _) => {
                    (vec![order.item_id.clone()], source_ref.clone())
                }
                (DemandSource::Dependent { .. }, PeggingType::SingleLevel) => {
                    (vec![order.item_id.clone()], None)
                }
                (DemandSource::Dependent { order_id, .. }, PeggingType::MultiLevel) => {
                    let (mut path, source_ref) = Self::trace_parent_demand(*order_id, index);
                    path.push(order.item_id.clone());
                    (path, source_ref)
                }
            };

            pegged.push(PeggedRequirement {
                quantity,
                path,
                source_ref,
            });
        }

        pegged
    }

    /// 沿父件計劃訂單往上追溯到獨立需求（每層取第一個來源）
    fn trace_parent_demand(
        mut order_id: Uuid,
        index: &HashMap<Uuid, (&PlannedOrder, &MrpRecord)>,
    ) -> (Vec<ItemId>, Option<String>) {
        let mut path = Vec::new();

        let source_ref = loop {
            let Some((order, record)) = index.get(&order_id) else {
                break None;
            };
            path.push(order.item_id.clone());

            let source = record
                .pegging
                .iter()
                .find(|p| p.period == order.receipt_period)
                .map(|p| &p.source);

            match source {
                Some(DemandSource::Dependent {
                    order_id: parent_order,
                    ..
                }) => order_id = *parent_order,
                Some(DemandSource::Independent { source_ref }) => break source_ref.clone(),
                None => break None,
            }
        };

        path.reverse();
        (path, source_ref)
    }
}
