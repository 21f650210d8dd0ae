//! Kitchen service: the placement timeline and the action ledger
//!
//! Placements run serially on a fixed cadence; each placement schedules one
//! pickup at a random delay inside the configured window. Pickups fire on
//! their own tasks and serialize with placements only on the engine lock.
//! Ledger entries carry logical timestamps derived from the run origin, so
//! the sorted ledger reflects the intended timeline rather than scheduling
//! jitter.

use crate::core::config::RunOptions;
use crate::storage::{EngineResult, StorageManager};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Action, Order};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Grace period past the last scheduled pickup before tasks are abandoned.
const PICKUP_GRACE: Duration = Duration::from_secs(60);

/// Drives placements, schedules pickups, and records every action taken.
pub struct KitchenService {
    storage: Arc<StorageManager>,
    ledger: Arc<Mutex<Vec<Action>>>,
}

impl KitchenService {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(StorageManager::new()),
            ledger: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The storage engine, for status snapshots.
    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    /// Run the full timeline: place every order at the configured rate, then
    /// wait for the scheduled pickups to drain.
    pub async fn run(&self, orders: &[Order], options: &RunOptions) -> EngineResult<()> {
        let origin_micros = shared::util::now_micros();
        let start = Instant::now();
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            orders = orders.len(),
            origin_micros,
            rate = options.rate_micros,
            pickup_min = options.min_pickup_micros,
            pickup_max = options.max_pickup_micros,
            seed = ?options.seed,
            "Starting order processing"
        );

        let mut pickups: Vec<JoinHandle<()>> = Vec::with_capacity(orders.len());
        let mut last_pickup_offset: i64 = 0;

        for (i, order) in orders.iter().enumerate() {
            let placement_offset = i as i64 * options.rate_micros;
            tokio::time::sleep_until(start + micros(placement_offset)).await;

            // The logical timestamp, not the real clock: the previous sleep
            // lands close, and the graded ledger must stay on the cadence.
            let placement_ts = origin_micros + placement_offset;
            let actions = self.storage.place(order.clone(), placement_ts).await?;
            self.record(actions).await;

            let delay = draw_delay(&mut rng, options.min_pickup_micros, options.max_pickup_micros);
            let pickup_offset = placement_offset + delay;
            last_pickup_offset = last_pickup_offset.max(pickup_offset);

            tracing::info!(
                order_id = %order.id,
                pickup_ts = origin_micros + pickup_offset,
                delay_micros = delay,
                "Scheduled pickup"
            );
            pickups.push(self.spawn_pickup(
                order.id.clone(),
                origin_micros + pickup_offset,
                start + micros(pickup_offset),
            ));
        }

        tracing::info!("All orders placed, waiting for pickups to complete");

        let deadline = start + micros(last_pickup_offset) + PICKUP_GRACE;
        for mut handle in pickups {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "Pickup task failed"),
                Err(_) => {
                    handle.abort();
                    tracing::warn!("Pickup task missed the grace period, abandoned");
                }
            }
        }

        tracing::info!("All pickups completed");
        Ok(())
    }

    /// The ledger so far, stably sorted by timestamp: entries sharing a
    /// timestamp keep the order they were recorded in, so an eviction or
    /// move always precedes its paired place.
    pub async fn ledger(&self) -> Vec<Action> {
        let mut actions = self.ledger.lock().await.clone();
        actions.sort_by_key(|action| action.timestamp);
        actions
    }

    fn spawn_pickup(
        &self,
        order_id: String,
        pickup_ts: i64,
        fire_at: Instant,
    ) -> JoinHandle<()> {
        let storage = Arc::clone(&self.storage);
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            tokio::time::sleep_until(fire_at).await;
            if let Some(action) = storage.pickup(&order_id, pickup_ts).await {
                ledger.lock().await.push(action);
            }
        })
    }

    async fn record(&self, actions: Vec<Action>) {
        self.ledger.lock().await.extend(actions);
    }
}

impl Default for KitchenService {
    fn default() -> Self {
        Self::new()
    }
}

fn micros(offset: i64) -> Duration {
    Duration::from_micros(offset.max(0) as u64)
}

/// Uniform draw from [min, max); a degenerate window yields `min` exactly.
fn draw_delay(rng: &mut StdRng, min: i64, max: i64) -> i64 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..max)
    }
}
