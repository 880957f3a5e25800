//! 集成測試

use chrono::NaiveDate;
use mrp::*;
use rstest::rstest;

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

/// 自行車 BOM：
/// BIKE ─┬─ FRAME ×1 ── TUBE ×3
///       └─ WHEEL ×2 ── SPOKE ×36
fn bike_input() -> PlanningInput {
    PlanningInput::new(PlanningOptions::new(8))
        .with_master_schedule(vec![
            MasterScheduleEntry::new(6, "BIKE", d(20)).with_source_ref("SO-100"),
            MasterScheduleEntry::new(8, "BIKE", d(30)).with_source_ref("SO-101"),
        ])
        .with_bom(vec![
            BomEdge::new("BIKE", "FRAME", d(1)).with_lead_time(2),
            BomEdge::new("BIKE", "WHEEL", d(2)).with_lead_time(1),
            BomEdge::new("WHEEL", "SPOKE", d(36)).with_lead_time(2),
            BomEdge::new("FRAME", "TUBE", d(3)).with_lead_time(1),
        ])
        .with_inventory(InventorySnapshot::new().with_balance("WHEEL", d(10)))
        .with_config(MrpConfig::new("BIKE", ProcurementType::Make).with_lead_time(1))
        .with_config(
            MrpConfig::new("SPOKE", ProcurementType::Buy)
                .with_lot_sizing(LotSizingPolicy::FixedOrderQuantity(d(500))),
        )
}

#[test]
fn test_single_level_shortage() {
    let input = PlanningInput::new(PlanningOptions::new(6))
        .with_master_schedule(vec![MasterScheduleEntry::new(5, "TEST-001", d(100))])
        .with_inventory(InventorySnapshot::new().with_balance("TEST-001", d(20)))
        .with_config(MrpConfig::new("TEST-001", ProcurementType::Buy).with_lead_time(2));

    let plan = run_mrp(&input).unwrap();
    let record = plan.record("TEST-001").unwrap();

    assert_eq!(record.rows[4].net_requirements, d(80));
    assert_eq!(record.rows[2].planned_order_release, d(80));
    assert_eq!(record.planned_order_releases(), vec![(3, d(80))]);
    assert!(record.planned_orders[0].is_purchase());
}

#[rstest]
#[case::at_parent_release(DependentDemandTiming::AtParentRelease, 4)]
#[case::at_parent_receipt(DependentDemandTiming::AtParentReceipt, 5)]
fn test_two_level_explosion_with_scrap(
    #[case] timing: DependentDemandTiming,
    #[case] demand_period: usize,
) {
    let input = PlanningInput::new(
        PlanningOptions::new(6).with_dependent_demand_timing(timing),
    )
    .with_master_schedule(vec![MasterScheduleEntry::new(5, "F", d(50))])
    .with_bom(vec![
        BomEdge::new("F", "C", d(2)).with_scrap_factor(Decimal::new(11, 1))
    ])
    .with_config(MrpConfig::new("F", ProcurementType::Make).with_lead_time(1));

    let plan = run_mrp(&input).unwrap();
    let component = plan.record("C").unwrap();

    assert_eq!(plan.record("F").unwrap().rows[3].planned_order_release, d(50));
    assert_eq!(component.rows[demand_period - 1].gross_requirements, d(110));
    assert_eq!(component.total_gross_requirements(), Some(d(110)));
}

#[rstest]
#[case::lot_for_lot(LotSizingPolicy::LotForLot, d(35))]
#[case::fixed_order_quantity(LotSizingPolicy::FixedOrderQuantity(d(20)), d(40))]
#[case::economic_order_quantity(LotSizingPolicy::EconomicOrderQuantity(d(50)), d(50))]
fn test_lot_sizing_through_run(#[case] policy: LotSizingPolicy, #[case] expected: Decimal) {
    let input = PlanningInput::new(PlanningOptions::new(4))
        .with_master_schedule(vec![MasterScheduleEntry::new(3, "P", d(35))])
        .with_config(MrpConfig::new("P", ProcurementType::Buy).with_lot_sizing(policy));

    let plan = run_mrp(&input).unwrap();

    assert_eq!(plan.record("P").unwrap().rows[2].planned_order_receipt, expected);
}

#[test]
fn test_quantity_overflow_is_an_error() {
    let input = PlanningInput::new(PlanningOptions::new(4))
        .with_master_schedule(vec![MasterScheduleEntry::new(3, "F", Decimal::MAX)])
        .with_bom(vec![BomEdge::new("F", "C", d(2))]);

    match run_mrp(&input) {
        Err(MrpError::QuantityOverflow { item, .. }) => assert_eq!(item, "C"),
        other => panic!("expected quantity overflow, got {other:?}"),
    }
}

#[test]
fn test_bike_multi_level_plan() {
    let plan = run_mrp(&bike_input()).unwrap();

    let ids: Vec<_> = plan
        .records
        .iter()
        .map(|r| (r.low_level_code, r.item_id.as_str()))
        .collect();
    assert_eq!(
        ids,
        vec![
            (0, "BIKE"),
            (1, "FRAME"),
            (1, "WHEEL"),
            (2, "SPOKE"),
            (2, "TUBE")
        ]
    );

    // WHEEL：期初 10，第 5 期淨需求 30，第 7 期淨需求 60
    let wheel = plan.record("WHEEL").unwrap();
    assert_eq!(wheel.planned_order_releases(), vec![(4, d(30)), (6, d(60))]);

    // SPOKE：固定批量 500
    let spoke = plan.record("SPOKE").unwrap();
    assert_eq!(spoke.rows[3].gross_requirements, d(1080));
    assert_eq!(spoke.rows[3].planned_order_receipt, d(1500));
    assert_eq!(spoke.rows[5].planned_order_receipt, d(2000));
    assert_eq!(spoke.ending_on_hand(), d(260));
    assert_eq!(spoke.planned_order_releases(), vec![(2, d(1500)), (4, d(2000))]);

    // 關鍵路徑同值時取 BOM 中先出現的子件
    let critical = &plan.critical_paths[0];
    assert_eq!(critical.total_lead_time, 4);
    assert_eq!(critical.path, vec!["BIKE", "FRAME", "TUBE"]);
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_multi_level_pegging_to_sales_order() {
    let plan = run_mrp(&bike_input()).unwrap();
    let spoke = plan.record("SPOKE").unwrap();
    let first_order = &spoke.planned_orders[0];

    let pegging = plan.pegging(PeggingType::MultiLevel);
    let pegged = &pegging[&first_order.id];

    assert_eq!(pegged.len(), 1);
    assert_eq!(pegged[0].quantity, d(1080));
    assert_eq!(pegged[0].path, vec!["BIKE", "WHEEL", "SPOKE"]);
    assert_eq!(pegged[0].source_ref.as_deref(), Some("SO-100"));
}

#[test]
fn test_cyclic_bom_produces_no_records() {
    let input = PlanningInput::new(PlanningOptions::new(4))
        .with_master_schedule(vec![MasterScheduleEntry::new(2, "A", d(1))])
        .with_bom(vec![BomEdge::new("A", "B", d(1)), BomEdge::new("B", "A", d(1))]);

    match run_mrp(&input) {
        Err(MrpError::CyclicBom { path }) => {
            assert!(path.contains(&"A".to_string()));
            assert!(path.contains(&"B".to_string()));
        }
        other => panic!("expected cyclic BOM error, got {other:?}"),
    }
}

#[test]
fn test_crp_overload() {
    let orders = vec![PlannedOrder::new(
        "BIKE",
        d(100),
        3,
        1,
        PlannedOrderType::Production,
    )];
    let routings = vec![RoutingStep::new("BIKE", "WC-ASSY", d(10), Decimal::new(5, 1))];
    let work_centers = vec![WorkCenter::new("WC-ASSY", d(40))];

    let result = run_crp(&orders, &routings, &work_centers, 4).unwrap();
    let row = result.row("WC-ASSY", 2).unwrap();

    assert_eq!(row.required_hours, d(60));
    assert_eq!(row.utilization_pct, Some(d(150)));
    assert!(row.overloaded);
    assert_eq!(
        result.overloads,
        vec![Overload {
            work_center: "WC-ASSY".to_string(),
            period: 2,
            overload_hours: d(20),
        }]
    );
}

#[test]
fn test_crp_tiny_capacity_has_no_utilization() {
    let orders = vec![PlannedOrder::new(
        "BIKE",
        d(1_000_000_000),
        2,
        1,
        PlannedOrderType::Production,
    )];
    let routings = vec![RoutingStep::new("BIKE", "WC-ASSY", Decimal::ZERO, d(1))];
    let work_centers = vec![WorkCenter::new("WC-ASSY", Decimal::new(1, 20))];

    let result = run_crp(&orders, &routings, &work_centers, 2).unwrap();
    let row = result.row("WC-ASSY", 1).unwrap();

    assert_eq!(row.utilization_pct, None);
    assert!(row.overloaded);
    assert!(result.has_overload());
}

#[test]
fn test_mrp_with_capacity_appends_overloads() {
    let input = PlanningInput::new(PlanningOptions::new(4))
        .with_master_schedule(vec![
            MasterScheduleEntry::new(3, "A", d(100)),
            MasterScheduleEntry::new(1, "B", d(5)),
        ])
        .with_config(MrpConfig::new("A", ProcurementType::Make).with_lead_time(1));
    let routings = vec![RoutingStep::new("A", "WC-1", d(10), Decimal::new(5, 1))];
    let work_centers = vec![WorkCenter::new("WC-1", d(40))];

    let result = run_mrp_with_capacity(&input, &routings, &work_centers).unwrap();
    let messages = &result.plan.action_messages;

    assert_eq!(result.capacity.loading.len(), 4);
    assert!(messages
        .iter()
        .any(|m| matches!(m, ActionMessage::Release { item_id, .. } if item_id == "B")));
    assert!(messages.iter().any(|m| matches!(
        m,
        ActionMessage::Overload { work_center, period: 2, .. } if work_center == "WC-1"
    )));
    assert_eq!(messages.iter().filter(|m| m.is_overload()).count(), 1);
}

#[test]
fn test_dated_demand_through_calendar() {
    let calendar = PlanningCalendar::new(
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
        BucketSize::Weekly,
    );
    let demands = vec![DatedQuantity::new(
        "BIKE",
        NaiveDate::from_ymd_opt(2025, 11, 26).unwrap(),
        d(12),
    )];

    let input = PlanningInput::new(PlanningOptions::new(6))
        .with_master_schedule(BucketingCalculator::master_schedule(&calendar, &demands));

    let plan = run_mrp(&input).unwrap();
    let bike = plan.record("BIKE").unwrap();

    assert_eq!(bike.rows[3].gross_requirements, d(12));
    assert_eq!(
        calendar.period_start(4),
        NaiveDate::from_ymd_opt(2025, 11, 24)
    );
}

#[test]
fn test_json_input_and_identical_output() {
    let input = PlanningInput::from_json(
        r#"{
            "master_schedule": [{"period": 4, "item_id": "A", "quantity": "10"}],
            "bom": [{"parent_id": "A", "component_id": "B", "quantity_per": "3", "lead_time": 1}],
            "configs": [{"item_id": "A", "lead_time_periods": 1}],
            "options": {"horizon_periods": 5, "parallel": true}
        }"#,
    )
    .unwrap();

    let first = serde_json::to_string(&run_mrp(&input).unwrap()).unwrap();
    let second = serde_json::to_string(&run_mrp(&input).unwrap()).unwrap();
    assert_eq!(first, second);

    let plan = run_mrp(&input).unwrap();
    assert_eq!(plan.record("B").unwrap().rows[2].gross_requirements, d(30));
}
