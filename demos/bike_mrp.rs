//! # 腳踏車 MRP + CRP 計算完整範例
//!
//! 這個範例展示完整的計劃流程：
//! - 產品：腳踏車
//! - 零件：車架、輪子、輻條、鋼管
//! - 需求：銷售訂單（以日期表示，依週別分桶）
//! - 批量規則：不同零件使用不同策略
//! - 產能：組裝線與焊接站負荷
//!
//! 執行：`RUST_LOG=debug cargo run --example bike_mrp`

use chrono::NaiveDate;
use mrp::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("🚲 ===== 腳踏車 MRP 計算範例 =====");
    println!();

    // ========== 1. 計劃日曆 ==========
    let start = NaiveDate::from_ymd_opt(2025, 11, 3)
        .ok_or_else(|| MrpError::InvalidInput("計劃起始日無效".to_string()))?;
    let calendar = PlanningCalendar::new(start, BucketSize::Weekly);
    println!("📅 步驟 1: 週別計劃日曆，第 1 期起始 {}", start);

    // ========== 2. 銷售訂單與在途採購 ==========
    let demands = vec![
        DatedQuantity::new("BIKE-001", date(2025, 11, 17)?, Decimal::from(150))
            .with_source_ref("SO-2025-001"),
        DatedQuantity::new("BIKE-001", date(2025, 11, 24)?, Decimal::from(100))
            .with_source_ref("SO-2025-002"),
    ];
    let purchases = vec![
        DatedQuantity::new("FRAME-001", date(2025, 11, 10)?, Decimal::from(50))
            .with_source_ref("PO-2025-100"),
    ];
    println!("📦 步驟 2: 銷售訂單 {} 筆，在途採購 {} 筆", demands.len(), purchases.len());

    // ========== 3. BOM 與物料參數 ==========
    let input = PlanningInput::new(PlanningOptions::new(8).with_parallel(true))
        .with_master_schedule(BucketingCalculator::master_schedule(&calendar, &demands))
        .with_scheduled_receipts(BucketingCalculator::scheduled_receipts(&calendar, &purchases))
        .with_bom(vec![
            BomEdge::new("BIKE-001", "FRAME-001", Decimal::from(1)),
            BomEdge::new("BIKE-001", "WHEEL-001", Decimal::from(2))
                .with_scrap_factor(Decimal::new(105, 2)),
            BomEdge::new("WHEEL-001", "SPOKE-001", Decimal::from(36)),
            BomEdge::new("FRAME-001", "TUBE-001", Decimal::from(3)),
        ])
        .with_inventory(
            InventorySnapshot::new()
                .with_balance("BIKE-001", Decimal::from(10))
                .with_balance("FRAME-001", Decimal::from(30))
                .with_balance("WHEEL-001", Decimal::from(100)),
        )
        .with_config(
            MrpConfig::new("BIKE-001", ProcurementType::Make)
                .with_lead_time(1)
                .with_safety_stock(Decimal::from(5)),
        )
        .with_config(
            MrpConfig::new("FRAME-001", ProcurementType::Make)
                .with_lead_time(2)
                .with_lot_sizing(LotSizingPolicy::FixedOrderQuantity(Decimal::from(100))),
        )
        .with_config(
            MrpConfig::new("WHEEL-001", ProcurementType::Buy)
                .with_lead_time(1)
                .with_minimum_order_qty(Decimal::from(200))
                .with_order_multiple(Decimal::from(50)),
        )
        .with_config(
            MrpConfig::new("SPOKE-001", ProcurementType::Buy)
                .with_lead_time(2)
                .with_lot_sizing(LotSizingPolicy::EconomicOrderQuantity(Decimal::from(5000))),
        )
        .with_config(MrpConfig::new("TUBE-001", ProcurementType::Buy).with_lead_time(1));
    println!("🔧 步驟 3: BOM 關係 {} 筆，物料配置 {} 筆", input.bom.len(), input.configs.len());

    // ========== 4. 途程與工作中心 ==========
    let routings = vec![
        RoutingStep::new("BIKE-001", "WC-ASSY", Decimal::from(4), Decimal::new(25, 2)),
        RoutingStep::new("FRAME-001", "WC-WELD", Decimal::from(6), Decimal::new(4, 1)),
    ];
    let work_centers = vec![
        WorkCenter::new("WC-ASSY", Decimal::from(40)),
        WorkCenter::new("WC-WELD", Decimal::from(40)),
    ];

    // ========== 5. 執行 ==========
    println!("🚀 步驟 4: 執行 MRP + CRP");
    let CapacityPlan { plan, capacity } =
        run_mrp_with_capacity(&input, &routings, &work_centers)?;
    println!();

    // ========== 6. 結果 ==========
    for record in &plan.records {
        println!(
            "物料: {}（低階碼 {}，提前期 {}）",
            record.item_id, record.low_level_code, record.lead_time
        );
        println!("  期別 | 毛需求 | 預計收貨 | 預計庫存 | 淨需求 | 計劃收貨 | 計劃下達");
        for row in &record.rows {
            let week = calendar
                .period_start(row.period)
                .map(|d| d.to_string())
                .unwrap_or_default();
            println!(
                "  {:>2} {} | {} | {} | {} | {} | {} | {}",
                row.period,
                week,
                row.gross_requirements,
                row.scheduled_receipts,
                row.projected_on_hand,
                row.net_requirements,
                row.planned_order_receipt,
                row.planned_order_release
            );
        }
        println!();
    }

    println!("🏭 產能負荷:");
    for row in capacity.loading.iter().filter(|r| r.required_hours > Decimal::ZERO) {
        println!(
            "  {} 第 {} 期: {} / {} 小時{}",
            row.work_center,
            row.period,
            row.required_hours,
            row.available_hours,
            if row.overloaded { " ⚠ 超載" } else { "" }
        );
    }
    println!();

    println!("📣 行動訊息:");
    for message in &plan.action_messages {
        println!("  - {:?}", message);
    }

    if !plan.warnings.is_empty() {
        println!("⚠️  警告訊息:");
        for warning in &plan.warnings {
            println!("  - [{}] {}", warning.item_id, warning.message);
        }
    }

    for path in &plan.critical_paths {
        println!(
            "⏱  {} 累計提前期 {} 期：{}",
            path.item_id,
            path.total_lead_time,
            path.path.join(" -> ")
        );
    }

    println!();
    println!("✅ MRP 計算完成！");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| MrpError::InvalidInput(format!("日期無效: {year}-{month}-{day}")))
}
