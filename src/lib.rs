//! # MRP
//!
//! 物料需求計劃（MRP）與產能需求計劃（CRP）引擎。
//!
//! 引擎是純函數：輸入不可變快照，輸出計劃記錄與行動訊息；
//! 不讀寫任何持久化儲存，相同輸入必得到相同輸出。
//!
//! ```no_run
//! use mrp::{run_mrp, BomEdge, MasterScheduleEntry, PlanningInput, PlanningOptions};
//! use rust_decimal::Decimal;
//!
//! let input = PlanningInput::new(PlanningOptions::new(8))
//!     .with_master_schedule(vec![MasterScheduleEntry::new(6, "BIKE", Decimal::from(50))])
//!     .with_bom(vec![BomEdge::new("BIKE", "WHEEL", Decimal::from(2))]);
//!
//! let plan = run_mrp(&input)?;
//! for record in &plan.records {
//!     println!("{}: {} 筆計劃訂單", record.item_id, record.planned_orders.len());
//! }
//! # Ok::<(), mrp::MrpError>(())
//! ```

use serde::{Deserialize, Serialize};

pub use mrp_calc::{
    ActionMessageGenerator, BomGraph, BucketingCalculator, CriticalPath, DatedQuantity,
    LeadTimeCalculator, MrpCalculator, MrpPlan, PeggedRequirement, PeggingType,
};
pub use mrp_capacity::{CapacityPlanner, CrpResult};
pub use mrp_core::*;
pub use rust_decimal::Decimal;

/// MRP 與 CRP 合併結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPlan {
    /// MRP 結果（行動訊息已含超載）
    pub plan: MrpPlan,

    /// 工作中心負荷
    pub capacity: CrpResult,
}

/// 完整多階 MRP 運算
pub fn run_mrp(input: &PlanningInput) -> Result<MrpPlan> {
    MrpCalculator::from_input(input)?.calculate(
        &input.master_schedule,
        &input.inventory,
        &input.scheduled_receipts,
    )
}

/// 產能需求計劃（可在已有計劃訂單時單獨執行）
pub fn run_crp(
    planned_orders: &[PlannedOrder],
    routings: &[RoutingStep],
    work_centers: &[WorkCenter],
    horizon_periods: u32,
) -> Result<CrpResult> {
    CapacityPlanner::run(planned_orders, routings, work_centers, horizon_periods)
}

/// 先跑 MRP，再以其計劃訂單跑 CRP，並將超載訊息併入行動訊息
pub fn run_mrp_with_capacity(
    input: &PlanningInput,
    routings: &[RoutingStep],
    work_centers: &[WorkCenter],
) -> Result<CapacityPlan> {
    let mut plan = run_mrp(input)?;

    let planned_orders: Vec<PlannedOrder> = plan.planned_orders().cloned().collect();
    let capacity = run_crp(
        &planned_orders,
        routings,
        work_centers,
        input.options.horizon_periods,
    )?;

    plan.action_messages = ActionMessageGenerator::generate(&plan.records, &capacity.loading);
    tracing::info!(
        "合併運算完成：行動訊息 {} 筆（超載 {} 筆）",
        plan.action_messages.len(),
        capacity.overloads.len()
    );

    Ok(CapacityPlan { plan, capacity })
}
