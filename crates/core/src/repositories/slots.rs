//! Committed schedule slots.
//!
//! ## Storage Layout
//!
//! Each commit writes one batch file in a sharded directory under `<data_dir>/slots/`:
//!
//! ```text
//! slots/
//!   <s1>/
//!     <s2>/
//!       <batch_id>/
//!         batch.yaml
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the batch id.

use crate::calendar::parse_date;
use crate::config::CoreConfig;
use crate::constants::BATCH_FILENAME;
use crate::error::{SchedulingError, SchedulingResult};
use crate::generator::{ProposedSlot, Shift};
use crate::repositories::shared::{create_record_dir, record_dirs, write_atomically};
use crate::NonEmptyText;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rotation_ids::RecordId;
use rotation_wire::{SlotBatch, SlotBatchData, SlotRecordData};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A slot that has been committed to storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleSlot {
    pub id: RecordId,
    pub batch_id: RecordId,
    pub department_id: NonEmptyText,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub booked_count: u32,
    pub created_at: DateTime<Utc>,
}

impl ScheduleSlot {
    /// The fixed shift these boundaries correspond to; `None` for hand-edited batches whose
    /// times match neither shift.
    pub fn shift(&self) -> Option<Shift> {
        Shift::from_times(self.start_time, self.end_time)
    }
}

/// The result of one successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommittedBatch {
    pub batch_id: RecordId,
    pub committed_at: DateTime<Utc>,
    pub slots: Vec<ScheduleSlot>,
}

/// Optional constraints for listing committed slots. Date bounds are inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub department_id: Option<NonEmptyText>,
}

impl SlotFilter {
    /// Builds a filter from optional text values. Blank values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidDate`] for an unparseable bound and
    /// [`SchedulingError::EndBeforeStart`] when `to` precedes `from`.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        department_id: Option<&str>,
    ) -> SchedulingResult<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        let from = present(from).map(|v| parse_date("from", v)).transpose()?;
        let to = present(to).map(|v| parse_date("to", v)).transpose()?;
        if let (Some(start), Some(end)) = (from, to) {
            if end < start {
                return Err(SchedulingError::EndBeforeStart { start, end });
            }
        }
        let department_id = present(department_id).and_then(|v| NonEmptyText::new(v).ok());

        Ok(Self {
            from,
            to,
            department_id,
        })
    }

    pub fn matches(&self, slot: &ScheduleSlot) -> bool {
        self.from.is_none_or(|from| slot.date >= from)
            && self.to.is_none_or(|to| slot.date <= to)
            && self
                .department_id
                .as_ref()
                .is_none_or(|id| &slot.department_id == id)
    }
}

/// Write side for generated slots.
pub trait SlotPersistence {
    /// Persists `slots` as a single batch, assigning identifiers.
    ///
    /// Either the whole batch is stored or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInput`] for an empty slice, or an internal error
    /// when storage cannot be written.
    fn commit(&self, slots: &[ProposedSlot]) -> SchedulingResult<CommittedBatch>;

    /// Committed slots matching `filter`, ordered by date, start time, then department.
    ///
    /// # Errors
    ///
    /// Implementations may fail when storage cannot be read at all.
    fn list(&self, filter: &SlotFilter) -> SchedulingResult<Vec<ScheduleSlot>>;
}

impl<T: SlotPersistence + ?Sized> SlotPersistence for &T {
    fn commit(&self, slots: &[ProposedSlot]) -> SchedulingResult<CommittedBatch> {
        (**self).commit(slots)
    }

    fn list(&self, filter: &SlotFilter) -> SchedulingResult<Vec<ScheduleSlot>> {
        (**self).list(filter)
    }
}

/// Slot persistence backed by YAML batch files under `<data_dir>/slots/`.
#[derive(Clone, Debug)]
pub struct FileSlotStore {
    slots_dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::at(cfg.slots_dir())
    }

    pub fn at(slots_dir: impl Into<PathBuf>) -> Self {
        Self {
            slots_dir: slots_dir.into(),
        }
    }

    pub fn slots_dir(&self) -> &Path {
        &self.slots_dir
    }

    fn commit_with_id_source(
        &self,
        slots: &[ProposedSlot],
        id_source: impl FnMut() -> RecordId,
    ) -> SchedulingResult<CommittedBatch> {
        if slots.is_empty() {
            return Err(SchedulingError::InvalidInput(
                "no slots to commit".into(),
            ));
        }

        let (batch_id, batch_dir) = create_record_dir(&self.slots_dir, id_source)?;
        let committed_at = Utc::now();
        let data = SlotBatchData {
            batch_id,
            committed_at,
            slots: slots
                .iter()
                .map(|slot| SlotRecordData {
                    id: RecordId::new(),
                    department_id: slot.department_id.clone(),
                    date: slot.date,
                    start_time: slot.start_time(),
                    end_time: slot.end_time(),
                    capacity: slot.capacity,
                    booked_count: slot.booked_count,
                })
                .collect(),
        };

        let result = SlotBatch::render(&data)
            .map_err(SchedulingError::from)
            .and_then(|yaml| {
                write_atomically(&batch_dir.join(BATCH_FILENAME), &yaml)
                    .map_err(SchedulingError::FileWrite)
            });

        if let Err(commit_error) = result {
            return Err(match fs::remove_dir_all(&batch_dir) {
                Ok(()) => commit_error,
                Err(cleanup_error) => SchedulingError::CleanupAfterCommitFailed {
                    path: batch_dir,
                    commit_error: Box::new(commit_error),
                    cleanup_error,
                },
            });
        }

        Ok(CommittedBatch {
            slots: to_schedule_slots(&data),
            batch_id,
            committed_at,
        })
    }
}

impl SlotPersistence for FileSlotStore {
    fn commit(&self, slots: &[ProposedSlot]) -> SchedulingResult<CommittedBatch> {
        let batch = self.commit_with_id_source(slots, RecordId::new)?;
        tracing::debug!(
            batch_id = %batch.batch_id,
            count = batch.slots.len(),
            "wrote slot batch"
        );
        Ok(batch)
    }

    fn list(&self, filter: &SlotFilter) -> SchedulingResult<Vec<ScheduleSlot>> {
        let mut slots = Vec::new();

        for batch_dir in record_dirs(&self.slots_dir) {
            let batch_path = batch_dir.join(BATCH_FILENAME);
            if !batch_path.is_file() {
                continue;
            }

            let contents = match fs::read_to_string(&batch_path) {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("failed to read slot batch {}: {}", batch_path.display(), e);
                    continue;
                }
            };

            match SlotBatch::parse(&contents) {
                Ok(data) => {
                    slots.extend(to_schedule_slots(&data).into_iter().filter(|s| filter.matches(s)))
                }
                Err(e) => {
                    tracing::warn!("failed to parse slot batch {}: {}", batch_path.display(), e);
                }
            }
        }

        slots.sort_by(|a, b| {
            (a.date, a.start_time, &a.department_id, a.id)
                .cmp(&(b.date, b.start_time, &b.department_id, b.id))
        });
        Ok(slots)
    }
}

fn to_schedule_slots(data: &SlotBatchData) -> Vec<ScheduleSlot> {
    data.slots
        .iter()
        .map(|record| ScheduleSlot {
            id: record.id,
            batch_id: data.batch_id,
            department_id: record.department_id.clone(),
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            capacity: record.capacity,
            booked_count: record.booked_count,
            created_at: data.committed_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn proposed(department: &str, day: NaiveDate, shift: Shift) -> ProposedSlot {
        ProposedSlot {
            department_id: NonEmptyText::new(department).unwrap(),
            date: day,
            shift,
            capacity: 6,
            booked_count: 0,
        }
    }

    fn store() -> (TempDir, FileSlotStore) {
        let temp = TempDir::new().unwrap();
        let store = FileSlotStore::at(temp.path().join("slots"));
        (temp, store)
    }

    #[test]
    fn commit_writes_one_batch_file() {
        let (_temp, store) = store();
        let slots = vec![
            proposed("surgery", date(2025, 3, 3), Shift::Morning),
            proposed("surgery", date(2025, 3, 3), Shift::Afternoon),
        ];

        let batch = store.commit(&slots).unwrap();
        assert_eq!(batch.slots.len(), 2);

        let path = batch.batch_id.sharded_dir(store.slots_dir()).join(BATCH_FILENAME);
        let data = SlotBatch::parse(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(data.batch_id, batch.batch_id);
        assert_eq!(data.slots.len(), 2);
        assert_eq!(data.slots[1].start_time, Shift::Afternoon.start_time());
        assert_eq!(data.slots[1].end_time, Shift::Afternoon.end_time());
        assert!(data.slots.iter().all(|s| s.booked_count == 0 && s.capacity == 6));
    }

    #[test]
    fn commit_assigns_distinct_ids() {
        let (_temp, store) = store();
        let slots = vec![
            proposed("surgery", date(2025, 3, 3), Shift::Morning),
            proposed("icu", date(2025, 3, 3), Shift::Morning),
        ];
        let batch = store.commit(&slots).unwrap();

        assert_ne!(batch.slots[0].id, batch.slots[1].id);
        assert!(batch.slots.iter().all(|s| s.batch_id == batch.batch_id));
        assert!(batch.slots.iter().all(|s| s.created_at == batch.committed_at));
    }

    #[test]
    fn empty_commit_is_rejected_and_writes_nothing() {
        let (_temp, store) = store();
        let err = store.commit(&[]).unwrap_err();

        assert!(matches!(err, SchedulingError::InvalidInput(_)));
        assert!(!store.slots_dir().exists());
    }

    #[test]
    fn commit_fails_after_repeated_id_collisions() {
        let (_temp, store) = store();
        let taken = RecordId::new();
        fs::create_dir_all(taken.sharded_dir(store.slots_dir())).unwrap();

        let slots = vec![proposed("surgery", date(2025, 3, 3), Shift::Morning)];
        let err = store.commit_with_id_source(&slots, || taken).unwrap_err();

        assert!(matches!(err, SchedulingError::StorageDirCreation(_)));
        assert!(store.list(&SlotFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn list_orders_by_date_then_time_then_department() {
        let (_temp, store) = store();
        store
            .commit(&[
                proposed("surgery", date(2025, 3, 4), Shift::Morning),
                proposed("surgery", date(2025, 3, 3), Shift::Afternoon),
            ])
            .unwrap();
        store
            .commit(&[
                proposed("icu", date(2025, 3, 3), Shift::Afternoon),
                proposed("icu", date(2025, 3, 3), Shift::Morning),
            ])
            .unwrap();

        let listed: Vec<(NaiveDate, NaiveTime, String)> = store
            .list(&SlotFilter::default())
            .unwrap()
            .into_iter()
            .map(|s| (s.date, s.start_time, s.department_id.into_inner()))
            .collect();

        let morning = Shift::Morning.start_time();
        let afternoon = Shift::Afternoon.start_time();
        assert_eq!(
            listed,
            vec![
                (date(2025, 3, 3), morning, "icu".to_string()),
                (date(2025, 3, 3), afternoon, "icu".to_string()),
                (date(2025, 3, 3), afternoon, "surgery".to_string()),
                (date(2025, 3, 4), morning, "surgery".to_string()),
            ]
        );
    }

    #[test]
    fn list_applies_filter() {
        let (_temp, store) = store();
        store
            .commit(&[
                proposed("surgery", date(2025, 3, 3), Shift::Morning),
                proposed("surgery", date(2025, 3, 5), Shift::Morning),
                proposed("icu", date(2025, 3, 4), Shift::Morning),
            ])
            .unwrap();

        let filter = SlotFilter::parse(Some("2025-03-04"), Some("2025-03-05"), None).unwrap();
        assert_eq!(store.list(&filter).unwrap().len(), 2);

        let filter = SlotFilter::parse(None, None, Some("surgery")).unwrap();
        let slots = store.list(&filter).unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.department_id.as_str() == "surgery"));

        let filter = SlotFilter::parse(Some("2025-03-04"), None, Some("surgery")).unwrap();
        assert_eq!(store.list(&filter).unwrap().len(), 1);
    }

    #[test]
    fn listed_slots_map_back_to_shifts() {
        let (_temp, store) = store();
        store
            .commit(&[
                proposed("surgery", date(2025, 3, 3), Shift::Morning),
                proposed("surgery", date(2025, 3, 3), Shift::Afternoon),
            ])
            .unwrap();

        let shifts: Vec<Option<Shift>> = store
            .list(&SlotFilter::default())
            .unwrap()
            .iter()
            .map(ScheduleSlot::shift)
            .collect();
        assert_eq!(shifts, vec![Some(Shift::Morning), Some(Shift::Afternoon)]);
    }

    #[test]
    fn hand_edited_times_have_no_shift() {
        let (_temp, store) = store();
        let batch = store
            .commit(&[proposed("surgery", date(2025, 3, 3), Shift::Morning)])
            .unwrap();
        let mut slot = batch.slots[0].clone();
        slot.end_time = Shift::Afternoon.end_time();
        assert_eq!(slot.shift(), None);
    }

    #[test]
    fn list_without_storage_is_empty() {
        let (_temp, store) = store();
        assert!(store.list(&SlotFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn list_skips_unreadable_batches() {
        let (_temp, store) = store();
        store
            .commit(&[proposed("surgery", date(2025, 3, 3), Shift::Morning)])
            .unwrap();

        let broken = RecordId::new().sharded_dir(store.slots_dir());
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(BATCH_FILENAME), "not: [valid").unwrap();

        assert_eq!(store.list(&SlotFilter::default()).unwrap().len(), 1);
    }

    #[test]
    fn filter_parse_validates_bounds() {
        assert_eq!(
            SlotFilter::parse(Some(" "), None, Some("")).unwrap(),
            SlotFilter::default()
        );
        assert!(matches!(
            SlotFilter::parse(Some("2025-13-01"), None, None),
            Err(SchedulingError::InvalidDate { field: "from", .. })
        ));
        assert!(matches!(
            SlotFilter::parse(Some("2025-03-05"), Some("2025-03-04"), None),
            Err(SchedulingError::EndBeforeStart { .. })
        ));
    }
}
