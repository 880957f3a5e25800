//! 行動訊息產生

use mrp_core::{ActionMessage, CrpLoadRow, MrpRecord};

/// 行動訊息產生器
///
/// 只產生三種訊息：加急、下達、超載。
pub struct ActionMessageGenerator;

impl ActionMessageGenerator {
    /// 由 MRP 記錄產生加急與下達訊息
    pub fn from_records(records: &[MrpRecord]) -> Vec<ActionMessage> {
        let mut messages = Vec::new();

        for record in records {
            for order in &record.planned_orders {
                if order.is_past_due() {
                    messages.push(ActionMessage::Expedite {
                        item_id: order.item_id.clone(),
                        order_id: order.id,
                        release_period: order.release_period,
                        receipt_period: order.receipt_period,
                        quantity: order.quantity,
                    });
                } else if order.release_period == 1 {
                    messages.push(ActionMessage::Release {
                        item_id: order.item_id.clone(),
                        order_id: order.id,
                        receipt_period: order.receipt_period,
                        quantity: order.quantity,
                    });
                }
            }
        }

        messages
    }

    /// 由產能負荷產生超載訊息
    pub fn from_loading(loading: &[CrpLoadRow]) -> Vec<ActionMessage> {
        loading
            .iter()
            .filter(|row| row.overloaded)
            .map(|row| ActionMessage::Overload {
                work_center: row.work_center.clone(),
                period: row.period,
                required_hours: row.required_hours,
                available_hours: row.available_hours,
                overload_hours: row.overload_hours(),
            })
            .collect()
    }

    /// 合併 MRP 與產能訊息
    pub fn generate(records: &[MrpRecord], loading: &[CrpLoadRow]) -> Vec<ActionMessage> {
        let mut messages = Self::from_records(records);
        messages.extend(Self::from_loading(loading));
        messages
    }
}
