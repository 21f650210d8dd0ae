//! Storage engine
//!
//! Owns the three bounded areas and executes place / pickup atomically behind
//! a single lock. Movement and discard are internal: they only happen as part
//! of a placement decision, and every resulting ledger entry is returned to
//! the caller rather than recorded here.

use crate::storage::{EvictionIndex, FreshnessPolicy, Residency};
use shared::{Action, ActionType, Order, StorageType, Temperature};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Engine invariant violations.
///
/// Any of these aborts the run: they indicate a defect in the caller or the
/// engine itself, never a recoverable runtime condition.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Order {id} is already resident in {area}")]
    DuplicatePlace { id: String, area: StorageType },

    #[error("Cannot place {temperature} order {id} in {area}")]
    IncompatibleArea {
        id: String,
        temperature: Temperature,
        area: StorageType,
    },

    #[error("{area} is at capacity ({capacity}), cannot admit order {id}")]
    CapacityExceeded {
        id: String,
        area: StorageType,
        capacity: usize,
    },

    #[error("Shelf has no resident to evict for order {id}")]
    NoEvictionCandidate { id: String },

    #[error("Eviction index references unknown order {id}")]
    IndexDesync { id: String },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Default)]
struct StorageState {
    residents: HashMap<String, Residency>,
    index: EvictionIndex,
}

impl StorageState {
    fn has_room(&self, area: StorageType) -> bool {
        self.index.count(area) < area.capacity()
    }

    fn attach(&mut self, residency: Residency) {
        self.index.insert(residency.area, residency.order.id.clone());
        self.residents.insert(residency.order.id.clone(), residency);
    }

    fn detach(&mut self, order_id: &str) -> Option<Residency> {
        let residency = self.residents.remove(order_id)?;
        self.index.remove(residency.area, order_id);
        Some(residency)
    }
}

/// Thread-safe storage engine for the kitchen.
///
/// Every operation serializes on one exclusive lock; snapshots take the same
/// lock in shared mode. Nothing outside the lock ever inspects engine state.
#[derive(Debug, Default)]
pub struct StorageManager {
    state: RwLock<StorageState>,
    policy: FreshnessPolicy,
}

impl StorageManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a specific freshness policy (age resolution).
    pub fn with_policy(policy: FreshnessPolicy) -> Self {
        Self {
            state: RwLock::default(),
            policy,
        }
    }

    /// Place a new order.
    ///
    /// Returns the ledger entries the decision produced, in append order; an
    /// eviction or move entry always precedes its paired place entry. The
    /// first satisfied branch wins:
    ///
    /// 1. ideal area has room -> place there
    /// 2. room order, shelf full -> evict least fresh, place on shelf
    /// 3. shelf has room -> place on shelf
    /// 4. shelf full, ideal has room and holds a matching shelf resident ->
    ///    move it to its ideal area, place on shelf
    /// 5. otherwise -> evict least fresh, place on shelf
    pub async fn place(&self, order: Order, now_micros: i64) -> EngineResult<Vec<Action>> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.residents.get(&order.id) {
            return Err(EngineError::DuplicatePlace {
                id: order.id.clone(),
                area: existing.area,
            });
        }

        tracing::info!(
            order_id = %order.id,
            temp = %order.temperature,
            heater = state.index.count(StorageType::Heater),
            cooler = state.index.count(StorageType::Cooler),
            shelf = state.index.count(StorageType::Shelf),
            "Placing order"
        );

        let ideal = order.ideal_storage();
        let mut actions = Vec::with_capacity(2);

        // Ideal area first.
        if state.has_room(ideal) {
            actions.push(self.admit(&mut state, order, ideal, now_micros)?);
            return Ok(actions);
        }

        // A room order's ideal area is the shelf itself: full shelf means
        // something has to go.
        if order.temperature == Temperature::Room {
            actions.push(self.evict_least_fresh(&mut state, now_micros, &order.id)?);
            actions.push(self.admit(&mut state, order, StorageType::Shelf, now_micros)?);
            return Ok(actions);
        }

        // Hot/cold overflow onto the shelf when it has room.
        if state.has_room(StorageType::Shelf) {
            actions.push(self.admit(&mut state, order, StorageType::Shelf, now_micros)?);
            return Ok(actions);
        }

        // Shelf full: free a slot by returning a matching resident to its
        // ideal area, when that area can take it.
        if let Some(moved) = self.relocate_shelf_candidate(&mut state, ideal, now_micros)? {
            actions.push(moved);
            actions.push(self.admit(&mut state, order, StorageType::Shelf, now_micros)?);
            return Ok(actions);
        }

        // No movable resident either: evict the least fresh shelf order.
        actions.push(self.evict_least_fresh(&mut state, now_micros, &order.id)?);
        actions.push(self.admit(&mut state, order, StorageType::Shelf, now_micros)?);
        Ok(actions)
    }

    /// Pick up an order, or discard it if it spoiled in storage.
    ///
    /// An unknown id is not an error (the pickup may have raced a
    /// placement-time eviction): a warning is logged and `None` returned.
    pub async fn pickup(&self, order_id: &str, now_micros: i64) -> Option<Action> {
        let mut state = self.state.write().await;

        let residency = match state.detach(order_id) {
            Some(residency) => residency,
            None => {
                tracing::warn!(order_id = %order_id, "Order not found for pickup");
                return None;
            }
        };

        if self.policy.is_spoiled(&residency, now_micros) {
            tracing::info!(
                order_id = %order_id,
                area = %residency.area,
                remaining = self.policy.remaining_seconds(&residency, now_micros),
                "Order spoiled, discarding"
            );
            return Some(Action::new(
                now_micros,
                order_id,
                ActionType::Discard,
                residency.area,
            ));
        }

        tracing::info!(order_id = %order_id, area = %residency.area, "Order picked up");
        Some(Action::new(
            now_micros,
            order_id,
            ActionType::Pickup,
            residency.area,
        ))
    }

    /// Current resident count per area (shared-mode snapshot).
    pub async fn area_counts(&self) -> [(StorageType, usize); 3] {
        let state = self.state.read().await;
        StorageType::ALL.map(|area| (area, state.index.count(area)))
    }

    /// Add a resident, validating area compatibility and capacity.
    fn admit(
        &self,
        state: &mut StorageState,
        order: Order,
        area: StorageType,
        now_micros: i64,
    ) -> EngineResult<Action> {
        if area != StorageType::Shelf && order.ideal_storage() != area {
            return Err(EngineError::IncompatibleArea {
                id: order.id.clone(),
                temperature: order.temperature,
                area,
            });
        }
        if !state.has_room(area) {
            return Err(EngineError::CapacityExceeded {
                id: order.id.clone(),
                area,
                capacity: area.capacity(),
            });
        }

        let action = Action::new(now_micros, order.id.clone(), ActionType::Place, area);
        tracing::info!(
            order_id = %order.id,
            area = %area,
            fill = state.index.count(area) + 1,
            capacity = area.capacity(),
            "Order placed"
        );
        state.attach(Residency::new(order, area, now_micros));
        Ok(action)
    }

    /// Remove the least fresh shelf resident and return its discard entry.
    fn evict_least_fresh(
        &self,
        state: &mut StorageState,
        now_micros: i64,
        incoming_id: &str,
    ) -> EngineResult<Action> {
        let victim_id = state
            .index
            .least_fresh_on_shelf(&state.residents, &self.policy, now_micros)
            .map(|r| r.order.id.clone())
            .ok_or_else(|| EngineError::NoEvictionCandidate {
                id: incoming_id.to_string(),
            })?;

        let victim = state
            .detach(&victim_id)
            .ok_or(EngineError::IndexDesync { id: victim_id })?;

        tracing::info!(
            order_id = %victim.order.id,
            ratio = self.policy.ratio(&victim, now_micros),
            "Evicting least fresh shelf order"
        );
        Ok(Action::new(
            now_micros,
            victim.order.id,
            ActionType::Discard,
            StorageType::Shelf,
        ))
    }

    /// Move the least fresh matching shelf resident into `target`, freeing a
    /// shelf slot. `None` when `target` is full or no resident matches. The
    /// residency keeps its original entered-at timestamp.
    fn relocate_shelf_candidate(
        &self,
        state: &mut StorageState,
        target: StorageType,
        now_micros: i64,
    ) -> EngineResult<Option<Action>> {
        if !state.has_room(target) {
            return Ok(None);
        }

        let candidate_id = match state
            .index
            .shelf_candidate_for(target, &state.residents, &self.policy, now_micros)
        {
            Some(candidate) => candidate.order.id.clone(),
            None => return Ok(None),
        };

        let residency = state
            .detach(&candidate_id)
            .ok_or(EngineError::IndexDesync { id: candidate_id })?;

        if residency.order.ideal_storage() != target {
            return Err(EngineError::IncompatibleArea {
                id: residency.order.id.clone(),
                temperature: residency.order.temperature,
                area: target,
            });
        }

        tracing::info!(
            order_id = %residency.order.id,
            from = %StorageType::Shelf,
            to = %target,
            "Moving shelf order to its ideal area"
        );
        let action = Action::new(
            now_micros,
            residency.order.id.clone(),
            ActionType::Move,
            target,
        );
        state.attach(Residency {
            area: target,
            ..residency
        });
        Ok(Some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Decimal;

    fn order(id: &str, temp: Temperature, budget: u32) -> Order {
        Order::new(id, id, temp, Decimal::ZERO, budget)
    }

    fn assert_single(actions: &[Action], action: ActionType, target: StorageType) {
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, action);
        assert_eq!(actions[0].target, target);
    }

    #[tokio::test]
    async fn test_place_prefers_ideal_area() {
        let manager = StorageManager::new();

        let actions = manager.place(order("h1", Temperature::Hot, 60), 0).await.unwrap();
        assert_single(&actions, ActionType::Place, StorageType::Heater);

        let actions = manager.place(order("c1", Temperature::Cold, 60), 0).await.unwrap();
        assert_single(&actions, ActionType::Place, StorageType::Cooler);

        let actions = manager.place(order("r1", Temperature::Room, 60), 0).await.unwrap();
        assert_single(&actions, ActionType::Place, StorageType::Shelf);
    }

    #[tokio::test]
    async fn test_duplicate_place_is_an_error() {
        let manager = StorageManager::new();
        manager.place(order("h1", Temperature::Hot, 60), 0).await.unwrap();

        let err = manager
            .place(order("h1", Temperature::Hot, 60), 1_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicatePlace { .. }));
    }

    #[tokio::test]
    async fn test_hot_overflow_goes_to_shelf() {
        let manager = StorageManager::new();
        for i in 0..6 {
            let actions = manager
                .place(order(&format!("h{i}"), Temperature::Hot, 60), 0)
                .await
                .unwrap();
            assert_single(&actions, ActionType::Place, StorageType::Heater);
        }

        let actions = manager.place(order("h6", Temperature::Hot, 60), 0).await.unwrap();
        assert_single(&actions, ActionType::Place, StorageType::Shelf);
    }

    #[tokio::test]
    async fn test_full_shelf_evicts_least_fresh_room_order() {
        let manager = StorageManager::new();
        for i in 0..12 {
            manager
                .place(
                    order(&format!("r{i:02}"), Temperature::Room, 60),
                    i * 1_000_000,
                )
                .await
                .unwrap();
        }

        // r00 entered first and is the least fresh at t = 12s
        let actions = manager
            .place(order("r12", Temperature::Room, 60), 12_000_000)
            .await
            .unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, ActionType::Discard);
        assert_eq!(actions[0].id, "r00");
        assert_eq!(actions[0].target, StorageType::Shelf);
        assert_eq!(actions[0].timestamp, 12_000_000);
        assert_eq!(actions[1].action, ActionType::Place);
        assert_eq!(actions[1].id, "r12");
        assert_eq!(actions[1].target, StorageType::Shelf);
        assert_eq!(actions[1].timestamp, 12_000_000);

        let counts = manager.area_counts().await;
        assert_eq!(counts[2], (StorageType::Shelf, 12));
    }

    #[tokio::test]
    async fn test_full_ideal_and_shelf_falls_through_to_discard() {
        // Branch 4 requires a free slot in the ideal area, which a full
        // heater rules out: the engine must discard instead of move.
        let manager = StorageManager::new();
        for i in 0..6 {
            manager
                .place(order(&format!("h{i:02}"), Temperature::Hot, 300), 0)
                .await
                .unwrap();
        }
        for i in 6..18 {
            manager
                .place(
                    order(&format!("h{i:02}"), Temperature::Hot, 300),
                    (i as i64 - 5) * 1_000_000,
                )
                .await
                .unwrap();
        }

        let actions = manager
            .place(order("h18", Temperature::Hot, 300), 20_000_000)
            .await
            .unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, ActionType::Discard);
        // h06 reached the shelf first and degrades at 2x there
        assert_eq!(actions[0].id, "h06");
        assert_eq!(actions[1].action, ActionType::Place);
        assert_eq!(actions[1].target, StorageType::Shelf);
    }

    #[tokio::test]
    async fn test_freed_heater_slot_does_not_pull_shelf_orders_back() {
        let manager = StorageManager::new();
        for i in 0..6 {
            manager
                .place(order(&format!("h{i}"), Temperature::Hot, 60), 0)
                .await
                .unwrap();
        }
        manager.place(order("h6", Temperature::Hot, 60), 0).await.unwrap();

        // Free a heater slot; h6 must stay on the shelf.
        let action = manager.pickup("h0", 1_000_000).await.unwrap();
        assert_eq!(action.action, ActionType::Pickup);
        assert_eq!(action.target, StorageType::Heater);

        let action = manager.pickup("h6", 2_000_000).await.unwrap();
        assert_eq!(action.target, StorageType::Shelf);
    }

    #[tokio::test]
    async fn test_spoiled_pickup_becomes_discard() {
        let manager = StorageManager::new();
        manager.place(order("r1", Temperature::Room, 5), 0).await.unwrap();

        let action = manager.pickup("r1", 10_000_000).await.unwrap();
        assert_eq!(action.action, ActionType::Discard);
        assert_eq!(action.target, StorageType::Shelf);
        assert_eq!(action.timestamp, 10_000_000);
    }

    #[tokio::test]
    async fn test_pickup_of_unknown_order_returns_none() {
        let manager = StorageManager::new();
        assert!(manager.pickup("ghost", 0).await.is_none());

        // Evicted orders behave the same way when their pickup fires later
        for i in 0..13 {
            manager
                .place(
                    order(&format!("r{i:02}"), Temperature::Room, 60),
                    i * 1_000_000,
                )
                .await
                .unwrap();
        }
        assert!(manager.pickup("r00", 14_000_000).await.is_none());
    }

    #[tokio::test]
    async fn test_relocate_moves_least_fresh_match_and_keeps_entered_at() {
        // Exercises the move machinery directly: a hand-built state where the
        // heater has room while hot orders sit on a full shelf.
        let manager = StorageManager::new();
        let mut state = StorageState::default();

        for i in 0..12 {
            let temp = if i < 2 { Temperature::Hot } else { Temperature::Room };
            manager
                .admit(
                    &mut state,
                    order(&format!("s{i:02}"), temp, 120),
                    StorageType::Shelf,
                    i * 1_000_000,
                )
                .unwrap();
        }

        let moved = manager
            .relocate_shelf_candidate(&mut state, StorageType::Heater, 15_000_000)
            .unwrap()
            .unwrap();
        assert_eq!(moved.action, ActionType::Move);
        assert_eq!(moved.id, "s00");
        assert_eq!(moved.target, StorageType::Heater);

        // The residency kept its original entered-at timestamp
        let residency = state.residents.get("s00").unwrap();
        assert_eq!(residency.area, StorageType::Heater);
        assert_eq!(residency.placed_at_micros, 0);
        assert_eq!(state.index.count(StorageType::Shelf), 11);
        assert_eq!(state.index.count(StorageType::Heater), 1);

        // No cold resident on the shelf: nothing to relocate for the cooler
        assert!(manager
            .relocate_shelf_candidate(&mut state, StorageType::Cooler, 15_000_000)
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_admit_rejects_incompatible_area() {
        let manager = StorageManager::new();
        let mut state = StorageState::default();

        let err = manager
            .admit(&mut state, order("r1", Temperature::Room, 60), StorageType::Heater, 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::IncompatibleArea { .. }));

        let err = manager
            .admit(&mut state, order("h1", Temperature::Hot, 60), StorageType::Cooler, 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::IncompatibleArea { .. }));
    }

    #[tokio::test]
    async fn test_admit_rejects_full_area() {
        let manager = StorageManager::new();
        let mut state = StorageState::default();
        for i in 0..6 {
            manager
                .admit(&mut state, order(&format!("c{i}"), Temperature::Cold, 60), StorageType::Cooler, 0)
                .unwrap();
        }

        let err = manager
            .admit(&mut state, order("c6", Temperature::Cold, 60), StorageType::Cooler, 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { .. }));
    }
}
