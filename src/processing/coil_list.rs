use std::collections::BTreeMap;

use crate::io::input::CoilRecord;

/// Stable identity of an entry, independent of its display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCoil {
    pub coil: CoilRecord,
    pub quantity: u32,
    /// 1-based sequence number issued when the entry was created.
    pub order: u32,
}

impl SelectedCoil {
    pub fn effective_volume(&self) -> f64 {
        self.coil.effective_volume()
    }

    fn same_coil(&self, coil: &CoilRecord) -> bool {
        self.coil.id == coil.id && self.coil.coil_name == coil.coil_name
    }
}

/// Aggregate volumes and ratios of the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct VerSummary {
    pub aneurysm_volume: f64,
    pub total_effective_volume: f64,
    pub total_pre_swelling_volume: f64,
    pub has_swelling_series: bool,
    /// Number of distinct entries.
    pub entry_count: usize,
    /// Number of coils across all entries.
    pub total_quantity: u64,
    /// Only available while the aneurysm volume is positive.
    pub ver: Option<f64>,
    pub pre_swelling_ver: Option<f64>,
}

impl VerSummary {
    /// Fill level of the 0-50 % progress bar, in percent of the bar.
    pub fn progress_percent(&self) -> Option<f64> {
        self.ver.map(|ver| ver.min(50.0) * 2.0)
    }
}

/// Ordered, quantity-bearing list of coils the user has chosen.
///
/// Entries live in a map keyed by [`EntryKey`]; what the user sees is the
/// entries sorted by `order`, and every index-based operation resolves the
/// display index back to the entry with the same `(id, order)`.
#[derive(Debug, Clone, Default)]
pub struct SelectedCoilList {
    entries: BTreeMap<EntryKey, SelectedCoil>,
    next_key: u64,
}

impl SelectedCoilList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds one coil, merging into an existing entry with the same id and name.
    pub fn add_coil(&mut self, coil: CoilRecord) -> &SelectedCoil {
        let existing = self
            .entries
            .iter()
            .find(|(_, entry)| entry.same_coil(&coil))
            .map(|(key, _)| *key);

        let key = match existing {
            Some(key) => {
                if let Some(entry) = self.entries.get_mut(&key) {
                    entry.quantity = entry.quantity.saturating_add(1);
                    tracing::debug!(coil = %entry.coil.coil_name, quantity = entry.quantity, "incremented coil");
                }
                key
            }
            None => {
                let order = self.next_order();
                let key = EntryKey(self.next_key);
                self.next_key += 1;
                tracing::debug!(coil = %coil.coil_name, order, "added coil");
                self.entries.insert(
                    key,
                    SelectedCoil {
                        coil,
                        quantity: 1,
                        order,
                    },
                );
                key
            }
        };
        &self.entries[&key]
    }

    // len + 1, unless removals left a higher order still in use
    fn next_order(&self) -> u32 {
        let by_length = self.entries.len() as u32 + 1;
        let past_highest = self.entries.values().map(|e| e.order).max().unwrap_or(0) + 1;
        by_length.max(past_highest)
    }

    /// Entries sorted by `order`, as displayed and exported.
    pub fn display_entries(&self) -> Vec<&SelectedCoil> {
        let mut entries: Vec<&SelectedCoil> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.order);
        entries
    }

    fn resolve(&self, display_index: usize) -> Option<EntryKey> {
        let target = *self.display_entries().get(display_index)?;
        self.entries
            .iter()
            .find(|(_, entry)| entry.coil.id == target.coil.id && entry.order == target.order)
            .map(|(key, _)| *key)
    }

    /// Removes the entry shown at `display_index`.
    pub fn remove_entry(&mut self, display_index: usize) -> Option<SelectedCoil> {
        let key = self.resolve(display_index)?;
        let removed = self.entries.remove(&key);
        if let Some(entry) = &removed {
            tracing::debug!(coil = %entry.coil.coil_name, order = entry.order, "removed entry");
        }
        removed
    }

    /// Adjusts the quantity of the entry shown at `display_index`; a result
    /// of zero or less removes the entry and quantities saturate at
    /// `u32::MAX`. Returns `false` for a bad index.
    pub fn change_quantity(&mut self, display_index: usize, delta: i64) -> bool {
        let Some(key) = self.resolve(display_index) else {
            return false;
        };
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };

        let quantity = i64::from(entry.quantity).saturating_add(delta);
        if quantity <= 0 {
            self.entries.remove(&key);
        } else {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn has_swelling_series(&self) -> bool {
        self.entries.values().any(|entry| entry.coil.is_azur_series)
    }

    pub fn total_effective_volume(&self) -> f64 {
        self.entries
            .values()
            .map(|entry| entry.effective_volume() * f64::from(entry.quantity))
            .sum()
    }

    pub fn total_pre_swelling_volume(&self) -> f64 {
        self.entries
            .values()
            .map(|entry| entry.coil.volume_mm3 * f64::from(entry.quantity))
            .sum()
    }

    pub fn summary(&self, aneurysm_volume: f64) -> VerSummary {
        let total_effective_volume = self.total_effective_volume();
        let total_pre_swelling_volume = self.total_pre_swelling_volume();
        let ratio = |total: f64| (aneurysm_volume > 0.0).then(|| total / aneurysm_volume * 100.0);

        VerSummary {
            aneurysm_volume,
            total_effective_volume,
            total_pre_swelling_volume,
            has_swelling_series: self.has_swelling_series(),
            entry_count: self.entries.len(),
            total_quantity: self.entries.values().map(|entry| u64::from(entry.quantity)).sum(),
            ver: ratio(total_effective_volume),
            pre_swelling_ver: ratio(total_pre_swelling_volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{azur_coil, plain_coil};
    use approx::assert_relative_eq;

    fn orders(list: &SelectedCoilList) -> Vec<u32> {
        list.display_entries().iter().map(|e| e.order).collect()
    }

    #[test]
    fn test_duplicate_add_increments_quantity() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "ED Coil 10", 2.0, 4.0, 1.2));
        let entry = list.add_coil(plain_coil(1, "ED Coil 10", 2.0, 4.0, 1.2));
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.order, 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_same_id_different_name_is_new_entry() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "ED Coil 10", 2.0, 4.0, 1.2));
        list.add_coil(plain_coil(1, "ED Coil 14", 2.0, 4.0, 1.2));
        assert_eq!(list.len(), 2);
        assert_eq!(orders(&list), vec![1, 2]);
    }

    #[test]
    fn test_removing_middle_entry_keeps_orders() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.0));
        list.add_coil(plain_coil(2, "B", 2.0, 4.0, 1.0));
        list.add_coil(plain_coil(3, "C", 2.0, 4.0, 1.0));

        let removed = list.remove_entry(1).unwrap();
        assert_eq!(removed.coil.coil_name, "B");
        assert_eq!(orders(&list), vec![1, 3]);
    }

    #[test]
    fn test_orders_stay_unique_after_removal() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.0));
        list.add_coil(plain_coil(2, "B", 2.0, 4.0, 1.0));
        list.add_coil(plain_coil(3, "C", 2.0, 4.0, 1.0));
        list.remove_entry(1);
        list.add_coil(plain_coil(4, "D", 2.0, 4.0, 1.0));
        assert_eq!(orders(&list), vec![1, 3, 4]);

        list.remove_entry(2);
        list.remove_entry(1);
        // only order 1 left: length rule applies again
        list.add_coil(plain_coil(5, "E", 2.0, 4.0, 1.0));
        assert_eq!(orders(&list), vec![1, 2]);
    }

    #[test]
    fn test_change_quantity_by_display_index() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.0));
        list.add_coil(plain_coil(2, "B", 2.0, 4.0, 1.0));

        assert!(list.change_quantity(1, 2));
        assert_eq!(list.display_entries()[1].quantity, 3);
        assert_eq!(list.display_entries()[0].quantity, 1);

        assert!(list.change_quantity(0, -1));
        assert_eq!(list.len(), 1);
        assert_eq!(list.display_entries()[0].coil.coil_name, "B");

        assert!(list.change_quantity(0, -10));
        assert!(list.is_empty());
        assert!(!list.change_quantity(0, 1));
    }

    #[test]
    fn test_huge_quantity_changes_saturate() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.0));
        list.add_coil(plain_coil(2, "B", 2.0, 4.0, 1.0));

        assert!(list.change_quantity(0, i64::MAX));
        assert_eq!(list.display_entries()[0].quantity, u32::MAX);
        let entry = list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.0));
        assert_eq!(entry.quantity, u32::MAX);

        assert!(list.change_quantity(1, 3_000_000_000));
        let summary = list.summary(100.0);
        assert_eq!(summary.total_quantity, u64::from(u32::MAX) + 3_000_000_001);

        assert!(list.change_quantity(0, i64::MIN));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.0));
        assert!(list.remove_entry(3).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_totals_and_ver() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.5));
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.5));
        list.add_coil(azur_coil(2, "AZUR", 4.0, 10.0, 3.0, 9.0));

        let summary = list.summary(60.0);
        assert_relative_eq!(summary.total_effective_volume, 12.0);
        assert_relative_eq!(summary.total_pre_swelling_volume, 6.0);
        assert_relative_eq!(summary.ver.unwrap(), 20.0);
        assert_relative_eq!(summary.pre_swelling_ver.unwrap(), 10.0);
        assert_relative_eq!(summary.progress_percent().unwrap(), 40.0);
        assert!(summary.has_swelling_series);
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.total_quantity, 3);
    }

    #[test]
    fn test_ver_absent_without_aneurysm_volume() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.5));
        let summary = list.summary(0.0);
        assert!(summary.ver.is_none());
        assert!(summary.pre_swelling_ver.is_none());
        assert!(summary.progress_percent().is_none());
        assert!(!summary.has_swelling_series);
        assert_relative_eq!(summary.total_effective_volume, 1.5);
    }

    #[test]
    fn test_progress_is_capped() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 80.0));
        assert_relative_eq!(list.summary(100.0).progress_percent().unwrap(), 100.0);
    }

    #[test]
    fn test_clear_all() {
        let mut list = SelectedCoilList::new();
        list.add_coil(plain_coil(1, "A", 2.0, 4.0, 1.5));
        list.clear_all();
        assert!(list.is_empty());
        assert!(list.display_entries().is_empty());
    }
}
