// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-period sampling loop
//!
//! Each tick samples every gate channel, thresholds the samples, drives the
//! IN, OUT and MID gates in that order, then sleeps to the next tick
//! boundary. Cancellation is observed only at the top of a tick, so a tick
//! always runs to completion or aborts on a bus fault before any gate moves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gatecount_config::{ConfigError, GateCountConfig};
use gatecount_gates::{Channel, GateSet, TickCrossings, Timestamp, TriggerFrame, VehicleCount};
use gatecount_hal::{AdcReader, BusError, TimeProvider};
use tracing::{debug, error, info, warn};

use crate::error::EngineResult;

/// ADC inputs and thresholds of the four gate sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateChannels {
    pub entry: Channel,
    pub exit: Channel,
    pub mid_a: Channel,
    pub mid_b: Channel,
}

impl GateChannels {
    pub fn from_config(config: &GateCountConfig) -> Self {
        let channels = &config.channels;
        let default_threshold = channels.default_threshold;
        let channel = |c: gatecount_config::ChannelConfig| {
            Channel::new(c.index, c.effective_threshold(default_threshold))
        };
        Self {
            entry: channel(channels.entry),
            exit: channel(channels.exit),
            mid_a: channel(channels.mid_a),
            mid_b: channel(channels.mid_b),
        }
    }

    /// Check every channel against the converter actually on the bus.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`](crate::EngineError::Config) when an
    /// index is past the converter's last input or a threshold sits at full
    /// scale, where it could never trigger.
    pub fn check_against<R: AdcReader>(&self, reader: &R) -> EngineResult<()> {
        let channel_count = reader.channel_count();
        let max_sample = reader.max_sample();

        for (name, channel) in self.named() {
            if channel.index() >= channel_count {
                return Err(ConfigError::ValidationError(format!(
                    "{} channel {} is outside the converter's inputs (0-{})",
                    name,
                    channel.index(),
                    channel_count.saturating_sub(1)
                ))
                .into());
            }
            if channel.threshold() >= max_sample {
                return Err(ConfigError::ValidationError(format!(
                    "{} threshold {} can never be exceeded (full scale {})",
                    name,
                    channel.threshold(),
                    max_sample
                ))
                .into());
            }
        }
        Ok(())
    }

    fn named(&self) -> [(&'static str, Channel); 4] {
        [
            ("IN", self.entry),
            ("OUT", self.exit),
            ("MID_A", self.mid_a),
            ("MID_B", self.mid_b),
        ]
    }

    /// Read all four channels, then threshold them.
    ///
    /// A failed read returns before any trigger state is produced.
    pub fn sample<R: AdcReader>(&self, reader: &mut R) -> Result<TriggerFrame, BusError> {
        let entry = reader.read(self.entry.index())?;
        let exit = reader.read(self.exit.index())?;
        let mid_a = reader.read(self.mid_a.index())?;
        let mid_b = reader.read(self.mid_b.index())?;

        Ok(TriggerFrame {
            entry: self.entry.is_triggered(entry),
            exit: self.exit.is_triggered(exit),
            mid_a: self.mid_a.is_triggered(mid_a),
            mid_b: self.mid_b.is_triggered(mid_b),
        })
    }
}

/// Counters kept across a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub crossings_in: u64,
    pub crossings_out: u64,
    pub crossings_mid: u64,
    /// Ticks whose work took longer than the tick period
    pub overruns: u64,
}

impl LoopStats {
    fn record(&mut self, crossings: &TickCrossings) {
        self.ticks += 1;
        self.crossings_in += u64::from(crossings.entry.is_some());
        self.crossings_out += u64::from(crossings.exit.is_some());
        self.crossings_mid += u64::from(crossings.mid.is_some());
    }

    pub fn total_crossings(&self) -> u64 {
        self.crossings_in + self.crossings_out + self.crossings_mid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Shutdown flag cleared
    Cancelled,
    /// `max_ticks` reached
    TickLimit,
}

/// Outcome of a run that stopped without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub final_count: i64,
    pub stats: LoopStats,
    pub stop: StopReason,
}

/// Owns the bus, the clock and all gate state for one counting run
pub struct ControlLoop<R: AdcReader, C: TimeProvider> {
    reader: R,
    clock: C,
    channels: GateChannels,
    gates: GateSet,
    count: VehicleCount,
    tick_period: Duration,
    status_interval: Option<Duration>,
    last_status: Timestamp,
    stats: LoopStats,
}

impl<R: AdcReader, C: TimeProvider> ControlLoop<R, C> {
    pub fn new(
        reader: R,
        clock: C,
        channels: GateChannels,
        merge_window: Duration,
        tick_period: Duration,
    ) -> Self {
        let last_status = clock.now();
        Self {
            reader,
            clock,
            channels,
            gates: GateSet::new(merge_window),
            count: VehicleCount::new(),
            tick_period,
            status_interval: None,
            last_status,
            stats: LoopStats::default(),
        }
    }

    /// Build a loop from validated configuration
    ///
    /// The channel map is checked against `reader` before anything is
    /// sampled, so a converter with fewer inputs than the file assumes is a
    /// startup fault rather than a bus error on the first tick.
    pub fn from_config(reader: R, clock: C, config: &GateCountConfig) -> EngineResult<Self> {
        let channels = GateChannels::from_config(config);
        channels.check_against(&reader)?;

        let mut control_loop = Self::new(
            reader,
            clock,
            channels,
            config.gates.merge_window(),
            config.control_loop.tick_period(),
        );
        control_loop.status_interval = config.control_loop.status_interval();
        Ok(control_loop)
    }

    /// Log a status line at this cadence; `None` disables it
    pub fn with_status_interval(mut self, interval: Option<Duration>) -> Self {
        self.status_interval = interval;
        self
    }

    pub fn count(&self) -> i64 {
        self.count.get()
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn gates(&self) -> &GateSet {
        &self.gates
    }

    pub fn channels(&self) -> &GateChannels {
        &self.channels
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run one tick stamped with the clock's current time
    pub fn tick(&mut self) -> EngineResult<TickCrossings> {
        let now = self.clock.now();
        self.tick_at(now)
    }

    fn tick_at(&mut self, now: Timestamp) -> EngineResult<TickCrossings> {
        let frame = self.channels.sample(&mut self.reader)?;
        let crossings = self.gates.drive(&frame, now, &mut self.count);

        for crossing in crossings.iter() {
            info!("{}", crossing);
        }
        self.stats.record(&crossings);
        Ok(crossings)
    }

    /// Tick until `running` is cleared or `max_ticks` ticks have run.
    ///
    /// The bus is released on every exit path. A bus fault ends the run
    /// with [`EngineError::Transport`](crate::EngineError::Transport).
    pub fn run(&mut self, running: &AtomicBool, max_ticks: Option<u64>) -> EngineResult<RunSummary> {
        info!("Starting count: {}", self.count.get());
        debug!(
            "[CONTROL-LOOP] Tick period {:?}, channels IN={} OUT={} MID_A={} MID_B={}",
            self.tick_period,
            self.channels.entry.index(),
            self.channels.exit.index(),
            self.channels.mid_a.index(),
            self.channels.mid_b.index()
        );

        let outcome = self.run_ticks(running, max_ticks);
        let released = self.reader.release();

        match outcome {
            Ok(stop) => {
                released?;
                info!(
                    "[CONTROL-LOOP] Stopped ({:?}) after {} ticks. Final count: {}",
                    stop,
                    self.stats.ticks,
                    self.count.get()
                );
                info!(
                    "[CONTROL-LOOP] Crossings IN={} OUT={} MID={}, overruns {}",
                    self.stats.crossings_in,
                    self.stats.crossings_out,
                    self.stats.crossings_mid,
                    self.stats.overruns
                );
                Ok(RunSummary {
                    final_count: self.count.get(),
                    stats: self.stats,
                    stop,
                })
            }
            Err(e) => {
                if let Err(release_error) = released {
                    warn!("[CONTROL-LOOP] Bus release after fault failed: {}", release_error);
                }
                error!(
                    "[CONTROL-LOOP] Aborted after {} ticks: {}. Count: {}",
                    self.stats.ticks,
                    e,
                    self.count.get()
                );
                Err(e)
            }
        }
    }

    fn run_ticks(&mut self, running: &AtomicBool, max_ticks: Option<u64>) -> EngineResult<StopReason> {
        let mut executed: u64 = 0;

        loop {
            if !running.load(Ordering::SeqCst) {
                info!("[CONTROL-LOOP] Shutdown requested");
                return Ok(StopReason::Cancelled);
            }
            if max_ticks.is_some_and(|max| executed >= max) {
                return Ok(StopReason::TickLimit);
            }

            let start = self.clock.now();
            self.tick_at(start)?;
            executed += 1;

            self.log_status_if_due(start);

            // Sleep to maintain the tick period
            let elapsed = self.clock.now().saturating_sub(start);
            if elapsed < self.tick_period {
                self.clock.sleep(self.tick_period - elapsed);
            } else {
                self.stats.overruns += 1;
                debug!(
                    "[CONTROL-LOOP] Tick overran: {:?} > {:?}",
                    elapsed, self.tick_period
                );
            }
        }
    }

    fn log_status_if_due(&mut self, now: Timestamp) {
        let Some(interval) = self.status_interval else {
            return;
        };
        if now.saturating_sub(self.last_status) < interval {
            return;
        }
        self.last_status = now;
        info!(
            "[CONTROL-LOOP] Status: {} ticks, count {}, crossings {} (IN={} OUT={} MID={}), overruns {}",
            self.stats.ticks,
            self.count.get(),
            self.stats.total_crossings(),
            self.stats.crossings_in,
            self.stats.crossings_out,
            self.stats.crossings_mid,
            self.stats.overruns
        );
    }
}
