//! 性質測試：守恆、非負、批量、提前期位移、冪等

use mrp::*;
use proptest::prelude::*;

const HORIZON: u32 = 8;

/// 三層 BOM：FG ─ SUB ×q1（損耗 1.1）─ RAW ×q2，另有 FG ─ RAW ×q3
fn layered_input(
    demand: Vec<(u32, u32)>,
    quantities: (u32, u32, u32),
    on_hand: u32,
    lead_time: u32,
    raw_lot: Option<u32>,
) -> PlanningInput {
    let (q1, q2, q3) = quantities;
    let raw_config = match raw_lot {
        Some(lot) => MrpConfig::new("RAW", ProcurementType::Buy)
            .with_lot_sizing(LotSizingPolicy::FixedOrderQuantity(Decimal::from(lot))),
        None => MrpConfig::new("RAW", ProcurementType::Buy),
    };

    PlanningInput::new(PlanningOptions::new(HORIZON))
        .with_master_schedule(
            demand
                .into_iter()
                .map(|(period, qty)| MasterScheduleEntry::new(period, "FG", Decimal::from(qty)))
                .collect(),
        )
        .with_bom(vec![
            BomEdge::new("FG", "SUB", Decimal::from(q1)).with_scrap_factor(Decimal::new(11, 1)),
            BomEdge::new("SUB", "RAW", Decimal::from(q2)),
            BomEdge::new("FG", "RAW", Decimal::from(q3)),
        ])
        .with_inventory(
            InventorySnapshot::new()
                .with_balance("SUB", Decimal::from(on_hand))
                .with_balance("RAW", Decimal::from(on_hand)),
        )
        .with_config(MrpConfig::new("FG", ProcurementType::Make).with_lead_time(lead_time))
        .with_config(MrpConfig::new("SUB", ProcurementType::Make).with_lead_time(lead_time))
        .with_config(raw_config.with_lead_time(lead_time))
}

fn input_strategy() -> impl Strategy<Value = PlanningInput> {
    (
        prop::collection::vec((1..=HORIZON, 0u32..200), 1..6),
        (1u32..5, 1u32..5, 1u32..5),
        0u32..300,
        0u32..4,
        prop::option::of(1u32..400),
    )
        .prop_map(|(demand, quantities, on_hand, lead_time, raw_lot)| {
            layered_input(demand, quantities, on_hand, lead_time, raw_lot)
        })
}

proptest! {
    #[test]
    fn gross_requirements_are_conserved(input in input_strategy()) {
        let plan = run_mrp(&input).unwrap();

        for record in &plan.records {
            let independent: Decimal = input
                .master_schedule
                .iter()
                .filter(|e| e.item_id == record.item_id)
                .map(|e| e.quantity)
                .sum();
            let dependent: Decimal = input
                .bom
                .iter()
                .filter(|edge| edge.component_id == record.item_id)
                .filter_map(|edge| plan.record(&edge.parent_id).map(|p| (edge, p)))
                .map(|(edge, parent)| parent.total_planned_receipts().unwrap() * edge.extended_quantity())
                .sum();

            prop_assert_eq!(record.total_gross_requirements(), Some(independent + dependent));
        }
    }

    #[test]
    fn projected_on_hand_is_never_negative(input in input_strategy()) {
        let plan = run_mrp(&input).unwrap();

        for record in &plan.records {
            for row in &record.rows {
                prop_assert!(row.projected_on_hand >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn lot_sizing_is_respected(input in input_strategy()) {
        let plan = run_mrp(&input).unwrap();

        for record in &plan.records {
            for row in record.rows.iter().filter(|r| r.net_requirements > Decimal::ZERO) {
                match record.lot_sizing {
                    LotSizingPolicy::FixedOrderQuantity(lot) => {
                        prop_assert_eq!(row.planned_order_receipt % lot, Decimal::ZERO);
                        prop_assert!(row.planned_order_receipt >= row.net_requirements);
                    }
                    _ => prop_assert_eq!(row.planned_order_receipt, row.net_requirements),
                }
            }
        }
    }

    #[test]
    fn releases_are_offset_by_lead_time(input in input_strategy()) {
        let plan = run_mrp(&input).unwrap();

        for record in &plan.records {
            for row in record.rows.iter().filter(|r| r.planned_order_receipt > Decimal::ZERO) {
                let release = i64::from(row.period) - i64::from(record.lead_time);
                let matching: Vec<_> = record
                    .planned_order_releases()
                    .into_iter()
                    .filter(|(period, _)| *period == release)
                    .collect();

                prop_assert_eq!(matching, vec![(release, row.planned_order_receipt)]);
                if release >= 1 {
                    let release_row = record.row(release as u32).unwrap();
                    prop_assert_eq!(release_row.planned_order_release, row.planned_order_receipt);
                }
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical(input in input_strategy()) {
        let first = serde_json::to_string(&run_mrp(&input).unwrap()).unwrap();
        let second = serde_json::to_string(&run_mrp(&input).unwrap()).unwrap();
        prop_assert_eq!(first, second);

        let mut parallel = input.clone();
        parallel.options = parallel.options.with_parallel(true);
        prop_assert_eq!(run_mrp(&input).unwrap(), run_mrp(&parallel).unwrap());
    }
}
