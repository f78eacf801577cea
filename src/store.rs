use crate::models::{AppData, Category, Habit, HabitLog, LogBook};
use crate::storage::{load_data, persist_data, KeyValueStorage};
use chrono::{NaiveDate, Utc};
use tracing::{debug, error};
use uuid::Uuid;

pub const REMOVE_PROMPT: &str =
    "Are you sure you want to remove this habit? History for this habit will be hidden.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    HabitAdded(Habit),
    HabitRemoved { id: String },
    LogToggled(HabitLog),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent) + Send>;

/// Authoritative habits and logs. Every effective mutation is written back
/// to storage and then announced to subscribers.
pub struct HabitStore<S> {
    storage: S,
    data: AppData,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> HabitStore<S> {
    pub fn open(storage: S) -> Self {
        Self::open_at(storage, now_ms())
    }

    pub fn open_at(storage: S, now_ms: i64) -> Self {
        let data = load_data(&storage, now_ms);
        debug!(
            habits = data.habits.len(),
            logs = data.logs.len(),
            "habit store loaded"
        );
        Self {
            storage,
            data,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.data.habits
    }

    pub fn logs(&self) -> &LogBook {
        &self.data.logs
    }

    pub fn snapshot(&self) -> &AppData {
        &self.data
    }

    pub fn log(&self, habit_id: &str, date: NaiveDate) -> Option<&HabitLog> {
        self.data.logs.get(habit_id, date)
    }

    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.data.logs.is_completed(habit_id, date)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_habit(&mut self, name: &str, category: Category) -> Option<Habit> {
        self.add_habit_at(name, category, now_ms())
    }

    /// Blank names are ignored without error.
    pub fn add_habit_at(&mut self, name: &str, category: Category, now_ms: i64) -> Option<Habit> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let habit = Habit {
            id: new_id(),
            name: name.to_string(),
            category,
            created_at: now_ms,
        };
        self.data.habits.push(habit.clone());
        debug!(id = %habit.id, name = %habit.name, "habit added");

        self.commit(StoreEvent::HabitAdded(habit.clone()));
        Some(habit)
    }

    /// Soft-deletes a habit once `confirm` accepts [`REMOVE_PROMPT`]. Its
    /// logs stay in storage. Returns whether a habit was removed.
    pub fn remove_habit(&mut self, id: &str, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(REMOVE_PROMPT) {
            return false;
        }

        let before = self.data.habits.len();
        self.data.habits.retain(|habit| habit.id != id);
        if self.data.habits.len() == before {
            return false;
        }
        debug!(id, "habit removed");

        self.commit(StoreEvent::HabitRemoved { id: id.to_string() });
        true
    }

    pub fn toggle_log(&mut self, habit_id: &str, date: NaiveDate) -> HabitLog {
        self.toggle_log_at(habit_id, date, now_ms())
    }

    /// Turning off keeps the entry and its id; turning on always writes a
    /// fresh entry with a new id.
    pub fn toggle_log_at(&mut self, habit_id: &str, date: NaiveDate, now_ms: i64) -> HabitLog {
        let turned_off = match self.data.logs.entry_mut(habit_id, date) {
            Some(existing) if existing.completed => {
                existing.completed = false;
                existing.timestamp = now_ms;
                Some(existing.clone())
            }
            _ => None,
        };

        let log = turned_off.unwrap_or_else(|| {
            let log = HabitLog {
                id: new_id(),
                habit_id: habit_id.to_string(),
                date,
                completed: true,
                timestamp: now_ms,
            };
            self.data.logs.insert(log.clone());
            log
        });
        debug!(habit_id, %date, completed = log.completed, "log toggled");

        self.commit(StoreEvent::LogToggled(log.clone()));
        log
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self, event: StoreEvent) {
        if let Err(err) = persist_data(&mut self.storage, &self.data) {
            error!("failed to persist habit data: {err}");
        }
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::errors::StorageError;
    use crate::models::default_habits;
    use crate::storage::{MemoryStorage, HABITS_KEY, LOGS_KEY};
    use std::sync::{Arc, Mutex};

    fn date(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn empty_store() -> HabitStore<MemoryStorage> {
        let storage = MemoryStorage::new()
            .with_entry(HABITS_KEY, "[]")
            .with_entry(LOGS_KEY, "{}");
        HabitStore::open_at(storage, 0)
    }

    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn open_without_data_uses_default_habits() {
        let store = HabitStore::open_at(MemoryStorage::new(), 11);
        assert_eq!(store.habits(), default_habits(11).as_slice());
        assert!(store.logs().is_empty());
    }

    #[test]
    fn add_habit_ignores_blank_names() {
        let mut store = empty_store();
        assert!(store.add_habit_at("   ", Category::Work, 1).is_none());
        assert!(store.habits().is_empty());

        let habit = store.add_habit_at("  Read  ", Category::Health, 5).unwrap();
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.created_at, 5);
        assert_eq!(store.habits(), &[habit]);
    }

    #[test]
    fn add_habit_allows_duplicate_names() {
        let mut store = empty_store();
        let first = store.add_habit_at("Read", Category::Health, 1).unwrap();
        let second = store.add_habit_at("Read", Category::Health, 2).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.habits().len(), 2);
    }

    #[test]
    fn toggle_off_keeps_id_and_toggle_on_allocates_new_one() {
        let mut store = empty_store();
        let day = date("2026-03-05");

        let on = store.toggle_log_at("h1", day, 10);
        assert!(on.completed);

        let off = store.toggle_log_at("h1", day, 20);
        assert!(!off.completed);
        assert_eq!(off.id, on.id);
        assert_eq!(off.timestamp, 20);
        assert_eq!(store.log("h1", day), Some(&off));

        let on_again = store.toggle_log_at("h1", day, 30);
        assert!(on_again.completed);
        assert_ne!(on_again.id, on.id);
        assert_eq!(store.logs().len(), 1);
    }

    #[test]
    fn toggle_accepts_unknown_habit_ids() {
        let mut store = empty_store();
        let day = date("2026-01-01");
        store.toggle_log_at("ghost", day, 1);
        assert!(store.is_completed("ghost", day));
    }

    #[test]
    fn remove_requires_confirmation() {
        let mut store = empty_store();
        let habit = store.add_habit_at("Read", Category::Health, 1).unwrap();

        let mut prompt = String::new();
        let removed = store.remove_habit(&habit.id, |message| {
            prompt = message.to_string();
            false
        });
        assert!(!removed);
        assert_eq!(prompt, REMOVE_PROMPT);
        assert_eq!(store.habits().len(), 1);

        assert!(store.remove_habit(&habit.id, |_| true));
        assert!(store.habits().is_empty());
        assert!(!store.remove_habit("missing", |_| true));
    }

    #[test]
    fn removed_habit_keeps_logs_and_readd_gets_fresh_history() {
        let mut store = empty_store();
        let day = date("2026-03-05");
        let habit = store.add_habit_at("Read", Category::Health, 1).unwrap();
        store.toggle_log_at(&habit.id, day, 2);

        assert!(store.remove_habit(&habit.id, |_| true));

        let persisted = store.storage().read(LOGS_KEY).unwrap().unwrap();
        let logs: LogBook = serde_json::from_str(&persisted).unwrap();
        assert!(logs.is_completed(&habit.id, day));

        let again = store.add_habit_at("Read", Category::Health, 3).unwrap();
        assert_ne!(again.id, habit.id);
        assert!(!store.is_completed(&again.id, day));
    }

    #[test]
    fn mutations_are_persisted_and_reloadable() {
        let mut store = empty_store();
        let day = date("2026-03-05");
        let habit = store.add_habit_at("Stretch", Category::Health, 1).unwrap();
        let log = store.toggle_log_at(&habit.id, day, 2);

        let reopened = HabitStore::open_at(store.storage().clone(), 99);
        assert_eq!(reopened.habits(), &[habit.clone()]);
        assert_eq!(reopened.log(&habit.id, day), Some(&log));
    }

    #[test]
    fn failed_writes_are_swallowed() {
        let mut store = HabitStore::open_at(FailingStorage, 0);
        let habit = store.add_habit_at("Read", Category::Work, 1).unwrap();
        let log = store.toggle_log_at(&habit.id, date("2026-02-01"), 2);
        assert!(log.completed);
        assert_eq!(store.habits().len(), 19);
    }

    #[test]
    fn subscribers_see_effective_mutations_only() {
        let mut store = empty_store();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        store.add_habit_at("", Category::Other, 1);
        let habit = store.add_habit_at("Walk", Category::Health, 1).unwrap();
        store.remove_habit(&habit.id, |_| false);
        let log = store.toggle_log_at(&habit.id, date("2026-03-01"), 2);
        store.remove_habit(&habit.id, |_| true);

        assert!(store.unsubscribe(id));
        store.add_habit_at("Run", Category::Health, 3);
        assert!(!store.unsubscribe(id));

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                StoreEvent::HabitAdded(habit.clone()),
                StoreEvent::LogToggled(log),
                StoreEvent::HabitRemoved { id: habit.id.clone() },
            ]
        );
    }
}
