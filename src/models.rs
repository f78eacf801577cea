use crate::dates::format_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Spiritual,
    Health,
    Finance,
    Social,
    Work,
    Other,
}

impl Category {
    /// Declaration order, used for every per-category report.
    pub const ALL: [Category; 6] = [
        Category::Spiritual,
        Category::Health,
        Category::Finance,
        Category::Social,
        Category::Work,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Spiritual => "Spiritual",
            Category::Health => "Health",
            Category::Finance => "Finance",
            Category::Social => "Social",
            Category::Work => "Work",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub timestamp: i64,
}

impl HabitLog {
    pub fn key(&self) -> LogKey {
        LogKey::new(self.habit_id.clone(), self.date)
    }
}

/// One log slot per habit and calendar day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogKey {
    pub habit_id: String,
    pub date: NaiveDate,
}

impl LogKey {
    pub fn new(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
        }
    }
}

/// Legacy `habitId-date` string, only used as the JSON object key.
impl fmt::Display for LogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.habit_id, format_date(self.date))
    }
}

/// Sparse log map. A missing entry reads as "not completed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBook {
    entries: BTreeMap<LogKey, HabitLog>,
}

impl LogBook {
    pub fn get(&self, habit_id: &str, date: NaiveDate) -> Option<&HabitLog> {
        // BTreeMap lookups need an owned key here.
        self.entries.get(&LogKey::new(habit_id, date))
    }

    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.get(habit_id, date).is_some_and(|log| log.completed)
    }

    pub fn insert(&mut self, log: HabitLog) -> Option<HabitLog> {
        self.entries.insert(log.key(), log)
    }

    pub fn entry_mut(&mut self, habit_id: &str, date: NaiveDate) -> Option<&mut HabitLog> {
        self.entries.get_mut(&LogKey::new(habit_id, date))
    }

    pub fn values(&self) -> impl Iterator<Item = &HabitLog> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<HabitLog> for LogBook {
    fn from_iter<I: IntoIterator<Item = HabitLog>>(iter: I) -> Self {
        let mut book = LogBook::default();
        for log in iter {
            book.insert(log);
        }
        book
    }
}

impl Serialize for LogBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, log)| (key.to_string(), log)))
    }
}

impl<'de> Deserialize<'de> for LogBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Keys are rebuilt from each record, never by splitting the string key.
        let raw = BTreeMap::<String, HabitLog>::deserialize(deserializer)?;
        Ok(raw.into_values().collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub habits: Vec<Habit>,
    pub logs: LogBook,
}

const DEFAULT_HABITS: [(&str, &str, Category); 18] = [
    ("1", "Wake up", Category::Health),
    ("2", "Journalling", Category::Spiritual),
    ("3", "Squats", Category::Health),
    ("4", "Call", Category::Social),
    ("5", "Insta content", Category::Work),
    ("6", "Bath", Category::Health),
    ("7", "Study 📚", Category::Work),
    ("8", "Drink water", Category::Health),
    ("9", "Self talk", Category::Spiritual),
    ("10", "3 time meal", Category::Health),
    ("11", "Clothes 🧺", Category::Other),
    ("12", "Play games", Category::Social),
    ("13", "Sleep well 😴", Category::Health),
    ("14", "Rest", Category::Health),
    ("15", "Exercise 🏃", Category::Health),
    ("16", "Room clean 🧹", Category::Other),
    ("17", "Nam Jap 🙏", Category::Spiritual),
    ("18", "Water Bottle", Category::Health),
];

/// Habit set used when nothing usable is stored yet.
pub fn default_habits(created_at: i64) -> Vec<Habit> {
    DEFAULT_HABITS
        .iter()
        .map(|(id, name, category)| Habit {
            id: (*id).to_string(),
            name: (*name).to_string(),
            category: *category,
            created_at,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct AddHabitRequest {
    pub name: String,
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct RemoveHabitRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveHabitResponse {
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub habit_id: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct MonthRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize)]
pub struct DayLabel {
    pub day: u32,
    pub date: String,
    pub weekday: String,
}

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub days_in_month: u32,
    pub days: Vec<DayLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub day: u32,
    pub percent: f64,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPoint {
    pub name: Category,
    pub value: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    pub completion_rate: u32,
    pub total_completed: usize,
    pub total_possible: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub year: i32,
    pub month: u32,
    pub daily: Vec<DailyPoint>,
    pub categories: Vec<CategoryPoint>,
    pub stats: MonthlyStats,
}

#[derive(Debug, Serialize)]
pub struct GridRow {
    pub habit: Habit,
    pub days: Vec<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: &str, habit_id: &str, date: &str, completed: bool) -> HabitLog {
        HabitLog {
            id: id.to_string(),
            habit_id: habit_id.to_string(),
            date: crate::dates::parse_date(date).unwrap(),
            completed,
            timestamp: 1_767_225_600_000,
        }
    }

    #[test]
    fn log_book_serializes_with_legacy_keys() {
        let book: LogBook = [log("abc", "7", "2026-03-05", true)].into_iter().collect();
        let json = serde_json::to_value(&book).unwrap();

        let entry = &json["7-2026-03-05"];
        assert_eq!(entry["id"], "abc");
        assert_eq!(entry["habitId"], "7");
        assert_eq!(entry["date"], "2026-03-05");
        assert_eq!(entry["completed"], true);
    }

    #[test]
    fn log_book_keys_come_from_records() {
        // A habit id containing the separator must not confuse key parsing.
        let json = r#"{
            "garbage": {"id":"x","habitId":"a-b","date":"2026-01-02","completed":true,"timestamp":5}
        }"#;
        let book: LogBook = serde_json::from_str(json).unwrap();
        let date = crate::dates::parse_date("2026-01-02").unwrap();

        assert!(book.is_completed("a-b", date));
        assert!(!book.is_completed("a", date));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn app_data_round_trips() {
        let data = AppData {
            habits: default_habits(42),
            logs: [
                log("l1", "1", "2026-03-05", true),
                log("l2", "2", "2026-03-06", false),
            ]
            .into_iter()
            .collect(),
        };

        let habits_json = serde_json::to_string(&data.habits).unwrap();
        let logs_json = serde_json::to_string(&data.logs).unwrap();
        let habits: Vec<Habit> = serde_json::from_str(&habits_json).unwrap();
        let logs: LogBook = serde_json::from_str(&logs_json).unwrap();

        assert_eq!(habits, data.habits);
        assert_eq!(logs, data.logs);
        assert!(habits_json.contains("\"createdAt\":42"));
        assert!(habits_json.contains("\"category\":\"Health\""));
    }

    #[test]
    fn default_habits_have_unique_ids() {
        let habits = default_habits(0);
        assert_eq!(habits.len(), 18);
        let mut ids: Vec<_> = habits.iter().map(|habit| habit.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 18);
    }
}
