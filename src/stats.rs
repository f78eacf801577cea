use crate::dates::Period;
use crate::models::{
    AppData, Category, CategoryPoint, DailyPoint, DashboardResponse, GridRow, MonthlyStats,
};

pub fn build_dashboard(data: &AppData, period: Period) -> DashboardResponse {
    DashboardResponse {
        year: period.year,
        month: period.month0,
        daily: daily_completion(data, period).collect(),
        categories: category_breakdown(data, period),
        stats: monthly_stats(data, period),
    }
}

/// Share of habits completed on each day of the month, computed lazily.
pub fn daily_completion(data: &AppData, period: Period) -> impl Iterator<Item = DailyPoint> + '_ {
    let habit_count = data.habits.len();
    (1..=period.days()).map(move |day| {
        let completed = period.date(day).map_or(0, |date| {
            data.habits
                .iter()
                .filter(|habit| data.logs.is_completed(&habit.id, date))
                .count()
        });
        let percent = if habit_count == 0 {
            0.0
        } else {
            completed as f64 / habit_count as f64 * 100.0
        };
        DailyPoint {
            day,
            percent,
            completed,
        }
    })
}

pub fn category_breakdown(data: &AppData, period: Period) -> Vec<CategoryPoint> {
    Category::ALL
        .iter()
        .map(|&category| {
            let mut total = 0usize;
            let mut value = 0usize;
            for habit in data.habits.iter().filter(|habit| habit.category == category) {
                for date in period.dates() {
                    total += 1;
                    if data.logs.is_completed(&habit.id, date) {
                        value += 1;
                    }
                }
            }
            CategoryPoint {
                name: category,
                value,
                total,
                percent: rounded_percent(value, total),
            }
        })
        .filter(|point| point.total > 0)
        .collect()
}

/// Counts completed entries across the whole log map by their stored date,
/// including logs of habits that have since been removed.
pub fn monthly_stats(data: &AppData, period: Period) -> MonthlyStats {
    let total_possible = data.habits.len() * period.days() as usize;
    let total_completed = data
        .logs
        .values()
        .filter(|log| log.completed && period.contains(log.date))
        .count();

    MonthlyStats {
        completion_rate: rounded_percent(total_completed, total_possible),
        total_completed,
        total_possible,
    }
}

pub fn habit_grid(data: &AppData, period: Period) -> Vec<GridRow> {
    data.habits
        .iter()
        .map(|habit| GridRow {
            habit: habit.clone(),
            days: period
                .dates()
                .map(|date| data.logs.is_completed(&habit.id, date))
                .collect(),
        })
        .collect()
}

/// `part / whole` as a whole percentage, halves rounded up. Zero when
/// `whole` is zero.
fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}
