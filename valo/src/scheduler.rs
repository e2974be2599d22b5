use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    bounce::DirectLightRenderer,
    capture::CaptureDevice,
    effect::CaptureEffect,
    error::BakeError,
    valo_error, valo_info, valo_warn,
    volume::Volume,
};

/// Lifecycle of a bake.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, Deserialize, Serialize)]
pub enum BakeState {
    Idle,
    CapturingDirect,
    Bouncing,
    Converged,
}

/// The settings for a [`BounceScheduler`].
#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
pub struct BakeSettings {
    /// Fraction of each capture delta folded into the probe estimates.
    pub damping: f32,
    /// Full probe passes after which the bake is declared converged.
    pub max_passes: u32,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            damping: 0.1,
            max_passes: 16,
        }
    }
}

/// Cooperative driver of the bounce iteration.
///
/// Runs on the caller's thread in time slices so a host can interleave
/// baking with its frame loop. Probes are visited in creation order and the
/// cursor persists across slices, so splitting the work over many short
/// budgets lands on the same result as one long run.
pub struct BounceScheduler {
    settings: BakeSettings,
    state: BakeState,
    passes_completed: u32,
    next_probe: usize,
}

impl BounceScheduler {
    pub fn new(settings: BakeSettings) -> Self {
        Self {
            settings,
            state: BakeState::Idle,
            passes_completed: 0,
            next_probe: 0,
        }
    }

    pub fn state(&self) -> BakeState {
        self.state
    }

    pub fn settings(&self) -> BakeSettings {
        self.settings
    }

    pub fn passes_completed(&self) -> u32 {
        self.passes_completed
    }

    pub fn is_converged(&self) -> bool {
        self.state == BakeState::Converged
    }

    /// Seeds the direct lightmaps and arms the bounce loop.
    ///
    /// Only valid from `Idle`. A volume with nothing to bounce, no surfaces
    /// or no participating probes, converges immediately.
    pub fn capture_direct(
        &mut self,
        volume: &mut Volume,
        renderer: &mut dyn DirectLightRenderer,
    ) -> Result<(), BakeError> {
        if self.state != BakeState::Idle {
            return Err(BakeError::InvalidState {
                op: "capture_direct",
                state: self.state,
            });
        }

        self.state = BakeState::CapturingDirect;
        volume.seed_direct(renderer)?;

        if volume.surfaces().is_empty() || volume.participating_probe_count() == 0 {
            valo_info!("Nothing to bounce, bake converged at seed");
            self.state = BakeState::Converged;
        } else {
            self.state = BakeState::Bouncing;
        }
        Ok(())
    }

    /// Advances the bounce iteration for at most `budget` of wall time.
    ///
    /// Returns `true` while work remains. The budget is checked before each
    /// probe, never mid-capture, so a zero budget touches no probe and a
    /// single probe may overshoot the slice by one capture.
    ///
    /// Probe failures are isolated: an allocation failure retires the probe
    /// and a divergent capture discards that probe's delta, but either way
    /// the rest of the pass goes on.
    pub fn run_for(
        &mut self,
        volume: &mut Volume,
        device: &mut dyn CaptureDevice,
        effect: &dyn CaptureEffect,
        budget: Duration,
    ) -> Result<bool, BakeError> {
        if self.state == BakeState::Converged {
            return Ok(false);
        }
        if self.state != BakeState::Bouncing {
            return Err(BakeError::InvalidState {
                op: "run_for",
                state: self.state,
            });
        }

        let start = Instant::now();
        let probe_count = volume.probe_count();
        loop {
            if self.passes_completed >= self.settings.max_passes {
                valo_info!(
                    "Bake converged after {} passes",
                    self.passes_completed
                );
                self.state = BakeState::Converged;
                return Ok(false);
            }
            if start.elapsed() >= budget {
                return Ok(true);
            }

            let index = self.next_probe;
            self.next_probe = (self.next_probe + 1) % probe_count;
            if self.next_probe == 0 {
                self.passes_completed += 1;
            }

            if !volume.probe(index).participates() {
                continue;
            }
            match volume.bounce_probe(index, device, effect, self.settings.damping) {
                Ok(()) => (),
                Err(BakeError::ResourceAllocation(why)) => {
                    valo_warn!("Probe {} retired, capture target lost: {}", index, why);
                }
                Err(BakeError::NumericDivergence) => {
                    valo_error!("Probe {} capture diverged, delta dropped", index);
                }
                Err(why) => {
                    valo_error!("Probe {} bounce failed: {}", index, why);
                }
            }
        }
    }

    /// Runs the bounce loop to convergence without a time budget.
    pub fn run_to_convergence(
        &mut self,
        volume: &mut Volume,
        device: &mut dyn CaptureDevice,
        effect: &dyn CaptureEffect,
    ) -> Result<(), BakeError> {
        while self.run_for(volume, device, effect, Duration::MAX)? {}
        Ok(())
    }
}
