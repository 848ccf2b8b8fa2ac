//! Per-drone scheduler threads
//!
//! Every drone flies on its own thread: wait out the warm-up on the pad,
//! then tick the drone once per tick interval until the swarm-wide stop
//! flag goes up. The flag is checked every interval even during warm-up,
//! so teardown never waits on a thread for more than about one tick.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::trace;

use crate::swarm::unit::Unit;

/// Spawn the scheduler thread for one drone.
pub(crate) fn spawn_scheduler(
    unit: Arc<Unit>,
    stop: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("drone-{}", unit.id()))
        .spawn(move || scheduler_loop(unit, stop))
}

fn scheduler_loop(unit: Arc<Unit>, stop: Arc<AtomicBool>) {
    let config = unit.config();

    if config.pin_unit_threads
        && let Some(cores) = core_affinity::get_core_ids()
        && cores.len() > 1
    {
        // Core 0 is left for the central loop
        let slot = 1 + unit.id() % (cores.len() - 1);
        let _ = core_affinity::set_for_current(cores[slot]);
    }

    let tick = config.tick_interval();
    // Warm-up wait is sliced by the tick so stop stays responsive;
    // never slice by zero
    let slice = tick.max(Duration::from_millis(1));
    let mut waited = Duration::ZERO;
    while waited < config.warmup() {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        thread::sleep(slice);
        waited += slice;
    }

    trace!("drone {} lifting off", unit.id());
    let dt = config.tick_seconds;
    while !stop.load(Ordering::Relaxed) {
        unit.tick(dt);
        thread::sleep(tick);
    }
    trace!("drone {} scheduler stopped", unit.id());
}
