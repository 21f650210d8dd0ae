//! Per-area eviction index
//!
//! Back references only: the index tracks which order ids live in each area
//! and answers least-fresh queries by recomputing freshness at decision time.
//! A priority queue keyed at insertion time would drift, because the key
//! depends on the current time and the current area. Area sizes are bounded
//! (at most 12), so the scans are constant work.
//!
//! The index holds no locks; it is only touched inside the storage engine's
//! write section.

use crate::storage::{FreshnessPolicy, Residency};
use shared::StorageType;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct EvictionIndex {
    heater: HashSet<String>,
    cooler: HashSet<String>,
    shelf: HashSet<String>,
}

impl EvictionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn area(&self, area: StorageType) -> &HashSet<String> {
        match area {
            StorageType::Heater => &self.heater,
            StorageType::Cooler => &self.cooler,
            StorageType::Shelf => &self.shelf,
        }
    }

    fn area_mut(&mut self, area: StorageType) -> &mut HashSet<String> {
        match area {
            StorageType::Heater => &mut self.heater,
            StorageType::Cooler => &mut self.cooler,
            StorageType::Shelf => &mut self.shelf,
        }
    }

    /// Track an order id as resident in `area`.
    pub fn insert(&mut self, area: StorageType, order_id: impl Into<String>) {
        self.area_mut(area).insert(order_id.into());
    }

    /// Stop tracking an order id in `area`.
    pub fn remove(&mut self, area: StorageType, order_id: &str) {
        self.area_mut(area).remove(order_id);
    }

    /// Number of residents tracked in `area`.
    pub fn count(&self, area: StorageType) -> usize {
        self.area(area).len()
    }

    /// The shelf resident with the lowest freshness at `now`.
    ///
    /// Ties go to the earliest `placed_at`, then the lexicographically
    /// smallest id. `None` when the shelf is empty.
    pub fn least_fresh_on_shelf<'a>(
        &self,
        residents: &'a HashMap<String, Residency>,
        policy: &FreshnessPolicy,
        now_micros: i64,
    ) -> Option<&'a Residency> {
        self.select_min(residents, policy, now_micros, |_| true)
    }

    /// Among shelf residents whose ideal area is `target`, the one with the
    /// lowest freshness at `now`. Same tie-break as `least_fresh_on_shelf`.
    pub fn shelf_candidate_for<'a>(
        &self,
        target: StorageType,
        residents: &'a HashMap<String, Residency>,
        policy: &FreshnessPolicy,
        now_micros: i64,
    ) -> Option<&'a Residency> {
        self.select_min(residents, policy, now_micros, |r| {
            r.order.temperature.ideal_storage() == target
        })
    }

    fn select_min<'a>(
        &self,
        residents: &'a HashMap<String, Residency>,
        policy: &FreshnessPolicy,
        now_micros: i64,
        keep: impl Fn(&Residency) -> bool,
    ) -> Option<&'a Residency> {
        let mut best: Option<(f64, &'a Residency)> = None;
        for id in &self.shelf {
            let Some(residency) = residents.get(id) else {
                debug_assert!(false, "eviction index references unknown order {id}");
                continue;
            };
            if !keep(residency) {
                continue;
            }
            let ratio = policy.ratio(residency, now_micros);
            let better = match &best {
                None => true,
                Some((best_ratio, best_res)) => ratio
                    .total_cmp(best_ratio)
                    .then_with(|| residency.placed_at_micros.cmp(&best_res.placed_at_micros))
                    .then_with(|| residency.order.id.cmp(&best_res.order.id))
                    .is_lt(),
            };
            if better {
                best = Some((ratio, residency));
            }
        }
        best.map(|(_, residency)| residency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Decimal, Order, Temperature};

    fn resident(
        residents: &mut HashMap<String, Residency>,
        index: &mut EvictionIndex,
        id: &str,
        temp: Temperature,
        area: StorageType,
        placed_at: i64,
        budget: u32,
    ) {
        let order = Order::new(id, id, temp, Decimal::ZERO, budget);
        index.insert(area, id);
        residents.insert(id.to_string(), Residency::new(order, area, placed_at));
    }

    #[test]
    fn test_empty_shelf_has_no_candidates() {
        let residents = HashMap::new();
        let index = EvictionIndex::new();
        let policy = FreshnessPolicy::default();

        assert!(index
            .least_fresh_on_shelf(&residents, &policy, 1_000_000)
            .is_none());
        assert!(index
            .shelf_candidate_for(StorageType::Heater, &residents, &policy, 1_000_000)
            .is_none());
    }

    #[test]
    fn test_least_fresh_picks_lowest_ratio() {
        let mut residents = HashMap::new();
        let mut index = EvictionIndex::new();
        let policy = FreshnessPolicy::default();

        // r1 is older and therefore less fresh at t = 10s
        resident(&mut residents, &mut index, "r1", Temperature::Room, StorageType::Shelf, 0, 60);
        resident(&mut residents, &mut index, "r2", Temperature::Room, StorageType::Shelf, 5_000_000, 60);

        let victim = index
            .least_fresh_on_shelf(&residents, &policy, 10_000_000)
            .unwrap();
        assert_eq!(victim.order.id, "r1");
    }

    #[test]
    fn test_tie_breaks_on_entered_at_then_id() {
        let mut residents = HashMap::new();
        let mut index = EvictionIndex::new();
        let policy = FreshnessPolicy::default();

        // Both under one whole second of age, so the ratios tie at 1.0;
        // b entered earlier and wins.
        resident(&mut residents, &mut index, "a", Temperature::Room, StorageType::Shelf, 1_200_000, 60);
        resident(&mut residents, &mut index, "b", Temperature::Room, StorageType::Shelf, 1_000_000, 60);

        let victim = index
            .least_fresh_on_shelf(&residents, &policy, 1_900_000)
            .unwrap();
        assert_eq!(victim.order.id, "b");

        // Identical entered_at: lexicographic id wins
        let mut residents = HashMap::new();
        let mut index = EvictionIndex::new();
        resident(&mut residents, &mut index, "z", Temperature::Room, StorageType::Shelf, 0, 60);
        resident(&mut residents, &mut index, "a", Temperature::Room, StorageType::Shelf, 0, 60);

        let victim = index
            .least_fresh_on_shelf(&residents, &policy, 1_000_000)
            .unwrap();
        assert_eq!(victim.order.id, "a");
    }

    #[test]
    fn test_non_ideal_shelf_residents_rank_lower() {
        let mut residents = HashMap::new();
        let mut index = EvictionIndex::new();
        let policy = FreshnessPolicy::default();

        // Same age and budget, but the hot order degrades at 2x on the shelf
        resident(&mut residents, &mut index, "room", Temperature::Room, StorageType::Shelf, 0, 60);
        resident(&mut residents, &mut index, "hot", Temperature::Hot, StorageType::Shelf, 0, 60);

        let victim = index
            .least_fresh_on_shelf(&residents, &policy, 10_000_000)
            .unwrap();
        assert_eq!(victim.order.id, "hot");
    }

    #[test]
    fn test_shelf_candidate_filters_by_ideal_area() {
        let mut residents = HashMap::new();
        let mut index = EvictionIndex::new();
        let policy = FreshnessPolicy::default();

        resident(&mut residents, &mut index, "room1", Temperature::Room, StorageType::Shelf, 0, 60);
        resident(&mut residents, &mut index, "hot1", Temperature::Hot, StorageType::Shelf, 1_000_000, 60);
        resident(&mut residents, &mut index, "hot2", Temperature::Hot, StorageType::Shelf, 0, 60);
        resident(&mut residents, &mut index, "cold1", Temperature::Cold, StorageType::Shelf, 0, 60);

        let candidate = index
            .shelf_candidate_for(StorageType::Heater, &residents, &policy, 10_000_000)
            .unwrap();
        assert_eq!(candidate.order.id, "hot2");

        let candidate = index
            .shelf_candidate_for(StorageType::Cooler, &residents, &policy, 10_000_000)
            .unwrap();
        assert_eq!(candidate.order.id, "cold1");

        // Residents of other areas never qualify
        resident(&mut residents, &mut index, "heated", Temperature::Hot, StorageType::Heater, 0, 60);
        let candidate = index
            .shelf_candidate_for(StorageType::Heater, &residents, &policy, 10_000_000)
            .unwrap();
        assert_eq!(candidate.order.id, "hot2");
    }
}
