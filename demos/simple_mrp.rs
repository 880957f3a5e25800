//! 簡單 MRP 計算示例：單一物料、期初庫存、提前期 2 期

use mrp::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== 簡單 MRP 計算示例 ===\n");

    let input = PlanningInput::new(PlanningOptions::new(6))
        .with_master_schedule(vec![
            MasterScheduleEntry::new(5, "BIKE-001", Decimal::from(100)).with_source_ref("SO-001")
        ])
        .with_inventory(InventorySnapshot::new().with_balance("BIKE-001", Decimal::from(20)))
        .with_config(MrpConfig::new("BIKE-001", ProcurementType::Make).with_lead_time(2));

    let plan = run_mrp(&input)?;

    for record in &plan.records {
        println!("物料: {}", record.item_id);
        for row in &record.rows {
            println!(
                "  第 {} 期: 毛需求 {}, 預計庫存 {}, 淨需求 {}, 計劃收貨 {}, 計劃下達 {}",
                row.period,
                row.gross_requirements,
                row.projected_on_hand,
                row.net_requirements,
                row.planned_order_receipt,
                row.planned_order_release
            );
        }
    }

    println!("\n輸出 JSON:");
    let json = serde_json::to_string_pretty(&plan)
        .map_err(|e| MrpError::InvalidInput(e.to_string()))?;
    println!("{json}");

    Ok(())
}
