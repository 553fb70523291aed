//! Wave dispatch: how many tickets run concurrently within a wave.

use std::sync::Arc;

use tokio::sync::Semaphore;

/// `round(2 + 3*light_ratio)` clamped to `[2, 5]`, capped at 2 near a
/// milestone boundary where caution outweighs throughput.
pub fn adaptive_parallelism(light_ratio: f64, near_milestone_boundary: bool) -> u8 {
    if near_milestone_boundary {
        return 2;
    }
    let raw = (2.0 + 3.0 * light_ratio.clamp(0.0, 1.0)).round() as i64;
    raw.clamp(2, 5) as u8
}

/// Permits available this wave: the smaller of the configured parallel
/// limit and whatever PR budget remains (a ticket that can't ship a PR
/// shouldn't occupy a dispatch slot).
pub fn permits_for_wave(configured_parallel: u8, pr_budget_remaining: u32) -> usize {
    (configured_parallel as u32).min(pr_budget_remaining.max(1)) as usize
}

pub fn wave_semaphore(permits: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(permits.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_parallelism_clamps_to_range() {
        assert_eq!(adaptive_parallelism(0.0, false), 2);
        assert_eq!(adaptive_parallelism(1.0, false), 5);
    }

    #[test]
    fn adaptive_parallelism_caps_at_two_near_milestone() {
        assert_eq!(adaptive_parallelism(1.0, true), 2);
    }

    #[test]
    fn permits_bounded_by_pr_budget() {
        assert_eq!(permits_for_wave(5, 2), 2);
        assert_eq!(permits_for_wave(2, 10), 2);
    }

    #[tokio::test]
    async fn semaphore_enforces_permit_count() {
        let sem = wave_semaphore(2);
        let _p1 = sem.clone().acquire_owned().await.unwrap();
        let _p2 = sem.clone().acquire_owned().await.unwrap();
        assert_eq!(sem.available_permits(), 0);
    }
}
