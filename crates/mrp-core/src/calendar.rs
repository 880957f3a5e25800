//! 計劃日曆（期別 ↔ 日期）

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::Period;

/// 期別長度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketSize {
    /// 每日一期
    Daily,
    /// 每週一期
    #[default]
    Weekly,
    /// 每月一期（依日曆月）
    Monthly,
}

/// 計劃日曆
///
/// 引擎只認整數期別；日曆負責把呼叫端的日期換算成期別，以及把期別換算回日期供顯示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningCalendar {
    /// 第 1 期的起始日
    pub start_date: NaiveDate,

    /// 期別長度
    #[serde(default)]
    pub bucket: BucketSize,
}

impl PlanningCalendar {
    /// 創建新的計劃日曆
    pub fn new(start_date: NaiveDate, bucket: BucketSize) -> Self {
        Self { start_date, bucket }
    }

    /// 期別起始日
    pub fn period_start(&self, period: Period) -> Option<NaiveDate> {
        let offset = period.checked_sub(1)?;
        match self.bucket {
            BucketSize::Daily => self
                .start_date
                .checked_add_signed(chrono::Duration::days(i64::from(offset))),
            BucketSize::Weekly => self
                .start_date
                .checked_add_signed(chrono::Duration::weeks(i64::from(offset))),
            BucketSize::Monthly => self.start_date.checked_add_months(Months::new(offset)),
        }
    }

    /// 日期所屬期別（早於第 1 期起始日則為 None）
    pub fn period_of(&self, date: NaiveDate) -> Option<Period> {
        if date < self.start_date {
            return None;
        }

        let offset = match self.bucket {
            BucketSize::Daily => (date - self.start_date).num_days(),
            BucketSize::Weekly => (date - self.start_date).num_weeks(),
            BucketSize::Monthly => {
                let months = (date.year() - self.start_date.year()) as i64 * 12
                    + date.month0() as i64
                    - self.start_date.month0() as i64;
                // 未滿一個日曆月時退回上一期
                match self.start_date.checked_add_months(Months::new(months as u32)) {
                    Some(boundary) if boundary > date => months - 1,
                    _ => months,
                }
            }
        };

        Period::try_from(offset + 1).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(BucketSize::Daily, date(2025, 10, 6), Some(1))]
    #[case(BucketSize::Daily, date(2025, 10, 10), Some(5))]
    #[case(BucketSize::Weekly, date(2025, 10, 12), Some(1))]
    #[case(BucketSize::Weekly, date(2025, 10, 13), Some(2))]
    #[case(BucketSize::Monthly, date(2025, 11, 5), Some(1))]
    #[case(BucketSize::Monthly, date(2025, 11, 6), Some(2))]
    #[case(BucketSize::Monthly, date(2026, 1, 31), Some(4))]
    #[case(BucketSize::Weekly, date(2025, 10, 1), None)]
    fn test_period_of(
        #[case] bucket: BucketSize,
        #[case] day: NaiveDate,
        #[case] expected: Option<Period>,
    ) {
        let calendar = PlanningCalendar::new(date(2025, 10, 6), bucket);
        assert_eq!(calendar.period_of(day), expected);
    }

    #[test]
    fn test_period_start_round_trip() {
        let calendar = PlanningCalendar::new(date(2025, 10, 6), BucketSize::Weekly);

        assert_eq!(calendar.period_start(1), Some(date(2025, 10, 6)));
        assert_eq!(calendar.period_start(3), Some(date(2025, 10, 20)));
        assert_eq!(calendar.period_start(0), None);
        assert_eq!(calendar.period_of(calendar.period_start(7).unwrap()), Some(7));
    }

    #[test]
    fn test_monthly_period_start() {
        let calendar = PlanningCalendar::new(date(2025, 1, 31), BucketSize::Monthly);

        // chrono 會把 1/31 + 1 個月收斂到 2/28
        assert_eq!(calendar.period_start(2), Some(date(2025, 2, 28)));
    }
}
