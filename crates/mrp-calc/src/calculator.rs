//! MRP 主計算器（BOM 展開驅動）

use mrp_core::{
    DependentDemandTiming, InventorySnapshot, ItemId, MasterScheduleEntry, MrpConfig, MrpError,
    MrpRecord, MrpWarning, PeggingRecord, PlanningInput, PlanningOptions, ScheduledReceipt,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::action::ActionMessageGenerator;
use crate::bom_graph::BomGraph;
use crate::lead_time::LeadTimeCalculator;
use crate::netting::NettingCalculator;
use crate::MrpPlan;

/// 已分桶的獨立需求與預計收貨
struct BucketedInputs {
    demand: BTreeMap<ItemId, Vec<Decimal>>,
    demand_pegging: BTreeMap<ItemId, Vec<PeggingRecord>>,
    receipts: BTreeMap<ItemId, Vec<Decimal>>,
    warnings: Vec<MrpWarning>,
}

/// MRP 計算器
pub struct MrpCalculator {
    /// BOM 圖（已驗證無循環）
    graph: BomGraph,

    /// MRP 配置（未列出的物料使用預設值）
    configs: HashMap<ItemId, MrpConfig>,

    /// 運算選項
    options: PlanningOptions,
}

impl MrpCalculator {
    /// 創建新的 MRP 計算器
    pub fn new(
        graph: BomGraph,
        configs: HashMap<ItemId, MrpConfig>,
        options: PlanningOptions,
    ) -> Self {
        Self {
            graph,
            configs,
            options,
        }
    }

    /// 由完整輸入快照建立計算器（驗證輸入並建立 BOM 圖）
    pub fn from_input(input: &PlanningInput) -> mrp_core::Result<Self> {
        input.validate()?;
        let graph = BomGraph::from_edges(input.bom.clone())?;
        let configs = input
            .configs
            .iter()
            .map(|c| (c.item_id.clone(), c.clone()))
            .collect();

        Ok(Self::new(graph, configs, input.options.clone()))
    }

    /// 主 MRP 計算入口
    ///
    /// 依低階碼由上往下逐層處理：同一層的物料彼此獨立，可平行計算；
    /// 子件只在所有父件都完成淨需求計算後才處理。
    pub fn calculate(
        &self,
        master_schedule: &[MasterScheduleEntry],
        inventory: &InventorySnapshot,
        scheduled_receipts: &[ScheduledReceipt],
    ) -> mrp_core::Result<MrpPlan> {
        tracing::info!(
            "開始 MRP 計算：主排程 {} 筆，BOM 關係 {} 筆，預計收貨 {} 筆，時界 {} 期",
            master_schedule.len(),
            self.graph.edge_count(),
            scheduled_receipts.len(),
            self.options.horizon_periods
        );
        let start_time = std::time::Instant::now();

        // Step 1: 驗證（結構性錯誤直接中止）
        self.validate(master_schedule, inventory, scheduled_receipts)?;

        // Step 2: 低階碼
        let low_level_codes = self.graph.low_level_codes()?;

        // Step 3: 獨立需求與預計收貨分桶
        tracing::debug!("Step 3: 時間分桶");
        let bucketed = self.bucket_inputs(master_schedule, scheduled_receipts)?;

        // Step 4: 由主排程可達的物料，依低階碼分層
        let roots: BTreeSet<&str> = master_schedule.iter().map(|e| e.item_id.as_str()).collect();
        let planned_items = self.graph.reachable_from(roots.iter().copied());
        let mut levels: BTreeMap<u32, Vec<ItemId>> = BTreeMap::new();
        for item_id in &planned_items {
            let level = low_level_codes.get(item_id).copied().unwrap_or(0);
            levels.entry(level).or_default().push(item_id.clone());
        }

        // 有預計收貨但不在計劃範圍內的物料不產生記錄
        let idle_receipts: BTreeSet<&str> = scheduled_receipts
            .iter()
            .map(|r| r.item_id.as_str())
            .filter(|item_id| !planned_items.contains(*item_id))
            .collect();

        // Step 5: 逐層計算
        let mut finished: BTreeMap<ItemId, MrpRecord> = BTreeMap::new();
        let mut records = Vec::new();

        for (&level, items) in &levels {
            tracing::debug!("計算第 {} 層：{} 個物料", level, items.len());

            let plan_item = |item_id: &ItemId| {
                self.plan_item(item_id, level, &bucketed, inventory, &finished)
            };
            let level_records: Vec<MrpRecord> = if self.options.parallel {
                items.par_iter().map(plan_item).collect::<mrp_core::Result<_>>()?
            } else {
                items.iter().map(plan_item).collect::<mrp_core::Result<_>>()?
            };

            for record in level_records {
                records.push(record.clone());
                finished.insert(record.item_id.clone(), record);
            }
        }

        // Step 6: 關鍵路徑與時界檢查
        let mut warnings = bucketed.warnings;
        for item_id in idle_receipts {
            tracing::debug!("物料 {} 有預計收貨但無需求，不產生記錄", item_id);
            warnings.push(MrpWarning::info(
                item_id,
                "有預計收貨，但不在主排程展開範圍內，未產生 MRP 記錄",
            ));
        }
        let mut critical_paths = Vec::with_capacity(roots.len());
        for item_id in &roots {
            let path = LeadTimeCalculator::critical_path(&self.graph, item_id, |item| {
                self.lead_time_of(item)
            })?;
            if path.total_lead_time >= self.options.horizon_periods {
                tracing::warn!(
                    "物料 {} 累計提前期 {} 期，計劃時界 {} 期不足",
                    item_id,
                    path.total_lead_time,
                    self.options.horizon_periods
                );
                warnings.push(MrpWarning::warning(
                    *item_id,
                    format!(
                        "累計提前期 {} 期（{}），計劃時界至少需要 {} 期",
                        path.total_lead_time,
                        path.path.join(" -> "),
                        path.minimum_horizon()
                    ),
                ));
            }
            critical_paths.push(path);
        }

        // Step 7: 行動訊息
        let action_messages = ActionMessageGenerator::from_records(&records);

        let plan = MrpPlan {
            records,
            action_messages,
            warnings,
            critical_paths,
        };

        tracing::info!("MRP 計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "MRP 記錄 {} 筆，計劃訂單 {} 筆，行動訊息 {} 筆",
            plan.records.len(),
            plan.planned_orders().count(),
            plan.action_messages.len()
        );

        Ok(plan)
    }

    /// 物料配置（未配置則為預設：批對批、自製、無安全庫存）
    pub fn config_for(&self, item_id: &str) -> MrpConfig {
        self.configs
            .get(item_id)
            .cloned()
            .unwrap_or_else(|| MrpConfig::default_for(item_id))
    }

    /// 物料提前期
    pub fn lead_time_of(&self, item_id: &str) -> u32 {
        LeadTimeCalculator::resolve(item_id, self.configs.get(item_id), &self.graph)
    }

    fn validate(
        &self,
        master_schedule: &[MasterScheduleEntry],
        inventory: &InventorySnapshot,
        scheduled_receipts: &[ScheduledReceipt],
    ) -> mrp_core::Result<()> {
        self.options.validate()?;
        for entry in master_schedule {
            entry.validate()?;
        }
        inventory.validate()?;
        for receipt in scheduled_receipts {
            receipt.validate()?;
        }
        for config in self.configs.values() {
            config.validate()?;
        }
        Ok(())
    }

    /// 將主排程與預計收貨放入期別向量；超出時界者忽略並警告
    fn bucket_inputs(
        &self,
        master_schedule: &[MasterScheduleEntry],
        scheduled_receipts: &[ScheduledReceipt],
    ) -> mrp_core::Result<BucketedInputs> {
        let horizon = self.options.horizon_periods;
        let mut bucketed = BucketedInputs {
            demand: BTreeMap::new(),
            demand_pegging: BTreeMap::new(),
            receipts: BTreeMap::new(),
            warnings: Vec::new(),
        };

        for entry in master_schedule {
            if entry.period > horizon {
                tracing::warn!(
                    "物料 {} 第 {} 期需求超出計劃時界，已忽略",
                    entry.item_id,
                    entry.period
                );
                bucketed.warnings.push(MrpWarning::warning(
                    entry.item_id.as_str(),
                    format!("第 {} 期需求 {} 超出計劃時界 {} 期，已忽略", entry.period, entry.quantity, horizon),
                ));
                continue;
            }

            let vector = bucketed
                .demand
                .entry(entry.item_id.clone())
                .or_insert_with(|| vec![Decimal::ZERO; horizon as usize]);
            let slot = &mut vector[entry.period as usize - 1];
            *slot = slot
                .checked_add(entry.quantity)
                .ok_or_else(|| MrpError::overflow("主排程", &entry.item_id))?;

            bucketed
                .demand_pegging
                .entry(entry.item_id.clone())
                .or_default()
                .push(PeggingRecord::independent(
                    entry.period,
                    entry.quantity,
                    entry.source_ref.clone(),
                ));
        }

        for receipt in scheduled_receipts {
            if receipt.period > horizon {
                tracing::warn!(
                    "物料 {} 第 {} 期預計收貨超出計劃時界，已忽略",
                    receipt.item_id,
                    receipt.period
                );
                bucketed.warnings.push(MrpWarning::warning(
                    receipt.item_id.as_str(),
                    format!("第 {} 期預計收貨 {} 超出計劃時界 {} 期，已忽略", receipt.period, receipt.quantity, horizon),
                ));
                continue;
            }

            let vector = bucketed
                .receipts
                .entry(receipt.item_id.clone())
                .or_insert_with(|| vec![Decimal::ZERO; horizon as usize]);
            let slot = &mut vector[receipt.period as usize - 1];
            *slot = slot
                .checked_add(receipt.quantity)
                .ok_or_else(|| MrpError::overflow("預計收貨", &receipt.item_id))?;
        }

        Ok(bucketed)
    }

    /// 單物料 MRP 計算
    fn plan_item(
        &self,
        item_id: &str,
        level: u32,
        bucketed: &BucketedInputs,
        inventory: &InventorySnapshot,
        finished: &BTreeMap<ItemId, MrpRecord>,
    ) -> mrp_core::Result<MrpRecord> {
        let horizon = self.options.horizon_periods as usize;

        let mut gross = bucketed
            .demand
            .get(item_id)
            .cloned()
            .unwrap_or_else(|| vec![Decimal::ZERO; horizon]);
        let mut pegging = bucketed
            .demand_pegging
            .get(item_id)
            .cloned()
            .unwrap_or_default();

        // 相依需求：所有父件計劃訂單 × 用量 × 損耗係數（多父件加總）
        for edge in self.graph.parents(item_id) {
            let Some(parent) = finished.get(&edge.parent_id) else {
                continue;
            };
            for order in &parent.planned_orders {
                let period = match self.options.dependent_demand_timing {
                    DependentDemandTiming::AtParentRelease => {
                        order.release_period_in_horizon().unwrap_or(1)
                    }
                    DependentDemandTiming::AtParentReceipt => order.receipt_period,
                };
                let overflow = || MrpError::overflow("相依需求", item_id);
                let quantity = order
                    .quantity
                    .checked_mul(edge.extended_quantity())
                    .ok_or_else(overflow)?;
                let slot = &mut gross[period as usize - 1];
                *slot = slot.checked_add(quantity).ok_or_else(overflow)?;
                pegging.push(PeggingRecord::dependent(period, quantity, order));
            }
        }
        pegging.sort_by_key(|p| p.period);

        let config = self.config_for(item_id);
        let lead_time = self.lead_time_of(item_id);
        let on_hand_start = inventory.on_hand(item_id);
        let receipts = bucketed
            .receipts
            .get(item_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let result = NettingCalculator::calculate(
            item_id,
            &gross,
            receipts,
            on_hand_start,
            lead_time,
            &config,
        )?;

        tracing::debug!(
            "物料 {}（低階碼 {}，提前期 {}）：計劃訂單 {} 筆",
            item_id,
            level,
            lead_time,
            result.planned_orders.len()
        );

        Ok(MrpRecord {
            item_id: item_id.to_string(),
            low_level_code: level,
            lead_time,
            lot_sizing: config.lot_sizing,
            safety_stock: config.safety_stock,
            on_hand_start,
            rows: result.rows,
            planned_orders: result.planned_orders,
            pegging,
        })
    }
}
