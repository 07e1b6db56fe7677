/// View synchronizer
///
/// Computes the visible set for a filter and search term and brings both
/// representations in line with it: the attached map markers and the rows of
/// the list panel. After `sync` returns, the attached marker ids and the row
/// ids are the same set, in store order.

use tracing::debug;

use crate::map::MapSurface;
use crate::state::data::{FacilityId, FacilityRecord};
use crate::state::interaction::Filter;

/// Records passing both the category filter and the (normalized) search term,
/// in store order
pub fn compute_visible<'a>(
    records: &'a [FacilityRecord],
    filter: Filter,
    term: &str,
) -> Vec<&'a FacilityRecord> {
    records
        .iter()
        .filter(|record| filter.accepts(record) && record.matches(term))
        .collect()
}

/// One rendered row of the list panel
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: FacilityId,
    pub name: String,
    pub kind_label: &'static str,
    pub contact: String,
}

impl From<&FacilityRecord> for ListRow {
    fn from(record: &FacilityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            kind_label: record.kind.label(),
            contact: record.contact.clone(),
        }
    }
}

/// The list panel: rows plus the single highlighted row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityList {
    rows: Vec<ListRow>,
    active: Option<FacilityId>,
}

impl FacilityList {
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn active(&self) -> Option<FacilityId> {
        self.active
    }

    #[cfg(test)]
    pub fn ids(&self) -> impl Iterator<Item = FacilityId> + '_ {
        self.rows.iter().map(|row| row.id)
    }

    /// Highlight `id` and only `id`. Ids without a row leave nothing highlighted.
    pub fn highlight(&mut self, id: FacilityId) {
        self.active = self.rows.iter().any(|row| row.id == id).then_some(id);
    }

    /// Replace the rows. Returns false (and keeps the highlight) when the
    /// rows are already identical.
    fn rebuild(&mut self, rows: Vec<ListRow>) -> bool {
        if self.rows == rows {
            return false;
        }
        self.rows = rows;
        // Rebuilt rows carry no highlight
        self.active = None;
        true
    }
}

/// What a single `sync` call changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub visible: usize,
    pub attached: usize,
    pub detached: usize,
    pub list_rebuilt: bool,
}

impl SyncReport {
    #[cfg(test)]
    pub fn is_noop(&self) -> bool {
        self.attached == 0 && self.detached == 0 && !self.list_rebuilt
    }
}

/// Recompute the visible set and apply it to the map and the list
pub fn sync<M: MapSurface>(
    map: &mut M,
    list: &mut FacilityList,
    records: &[FacilityRecord],
    filter: Filter,
    term: &str,
) -> SyncReport {
    let visible = compute_visible(records, filter, term);
    let mut report = SyncReport {
        visible: visible.len(),
        ..Default::default()
    };

    for record in records {
        let wanted = visible.iter().any(|v| v.id == record.id);
        let attached = map.is_attached(record.id);

        if wanted && !attached {
            map.attach(record.id);
            report.attached += 1;
        } else if !wanted && attached {
            map.detach(record.id);
            report.detached += 1;
        }
    }

    let rows = visible.into_iter().map(ListRow::from).collect();
    report.list_rebuilt = list.rebuild(rows);

    debug!(
        ?filter,
        term,
        visible = report.visible,
        attached = report.attached,
        detached = report.detached,
        list_rebuilt = report.list_rebuilt,
        "view synchronized"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::PopupTarget;
    use crate::state::data::{fixtures, Coordinate, FacilityKind};
    use std::collections::BTreeSet;

    /// Map fake that records every call
    #[derive(Default)]
    struct RecordingMap {
        attached: BTreeSet<FacilityId>,
        calls: Vec<String>,
    }

    impl MapSurface for RecordingMap {
        fn is_attached(&self, id: FacilityId) -> bool {
            self.attached.contains(&id)
        }

        fn attach(&mut self, id: FacilityId) {
            self.calls.push(format!("attach {id}"));
            self.attached.insert(id);
        }

        fn detach(&mut self, id: FacilityId) {
            self.calls.push(format!("detach {id}"));
            self.attached.remove(&id);
        }

        fn set_view(&mut self, _center: Coordinate, _zoom: u8) {}
        fn zoom_in(&mut self) {}
        fn zoom_out(&mut self) {}
        fn open_popup(&mut self, _target: PopupTarget) {}
        fn close_popup(&mut self) {}
        fn set_user_marker(&mut self, _position: Option<Coordinate>) {}
    }

    fn ids(visible: &[&FacilityRecord]) -> Vec<FacilityId> {
        visible.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_compute_visible_preserves_store_order() {
        let records = fixtures::sample();
        assert_eq!(ids(&compute_visible(&records, Filter::All, "")), vec![1, 2, 3, 4]);
        assert_eq!(ids(&compute_visible(&records, Filter::All, "maternity")), vec![1, 3]);
    }

    #[test]
    fn test_compute_visible_combines_filter_and_term() {
        let records = fixtures::sample();
        let hospitals = Filter::Kind(FacilityKind::Hospital);

        assert_eq!(ids(&compute_visible(&records, hospitals, "")), vec![1, 2]);
        assert_eq!(ids(&compute_visible(&records, hospitals, "maternity")), vec![1]);
        assert!(compute_visible(&records, hospitals, "dental").is_empty());
    }

    #[test]
    fn test_markers_and_rows_agree_for_every_combination() {
        let records = fixtures::sample();
        let terms = ["", "surgery", "hospital", "kampala", "buganda", "nothing-matches"];

        let mut map = RecordingMap::default();
        let mut list = FacilityList::default();

        for filter in Filter::TABS {
            for term in terms {
                sync(&mut map, &mut list, &records, filter, term);

                let rows: BTreeSet<_> = list.ids().collect();
                assert_eq!(rows, map.attached, "filter {filter:?} term {term:?}");

                let expected: BTreeSet<_> = compute_visible(&records, filter, term)
                    .iter()
                    .map(|r| r.id)
                    .collect();
                assert_eq!(rows, expected);
            }
        }
    }

    #[test]
    fn test_second_sync_is_a_noop() {
        let records = fixtures::sample();
        let mut map = RecordingMap::default();
        let mut list = FacilityList::default();
        let clinics = Filter::Kind(FacilityKind::Clinic);

        let first = sync(&mut map, &mut list, &records, clinics, "");
        assert_eq!(first.attached, 1);
        assert!(first.list_rebuilt);

        let calls_before = map.calls.len();
        let second = sync(&mut map, &mut list, &records, clinics, "");

        assert!(second.is_noop());
        assert_eq!(map.calls.len(), calls_before);
    }

    #[test]
    fn test_rebuild_clears_highlight_but_noop_keeps_it() {
        let records = fixtures::sample();
        let mut map = RecordingMap::default();
        let mut list = FacilityList::default();

        sync(&mut map, &mut list, &records, Filter::All, "");
        list.highlight(2);
        assert_eq!(list.active(), Some(2));

        sync(&mut map, &mut list, &records, Filter::All, "");
        assert_eq!(list.active(), Some(2));

        sync(&mut map, &mut list, &records, Filter::All, "surgery");
        assert_eq!(list.active(), None);
    }

    #[test]
    fn test_highlight_unknown_row_clears() {
        let records = fixtures::sample();
        let mut map = RecordingMap::default();
        let mut list = FacilityList::default();

        sync(&mut map, &mut list, &records, Filter::All, "");
        list.highlight(3);
        list.highlight(99);
        assert_eq!(list.active(), None);
    }
}
