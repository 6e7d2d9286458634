use crate::math::constants::{meters_to_feet, meters_to_miles};
use crate::math::stats::RollingMean;
use crate::math::signed_heading_difference;
use crate::prelude::{AnalysisConfig, AnalysisError, AnalysisResult, GoAroundPolicy};
use crate::processing::selection::{cross_track_to_center_line, detect_airport, detect_runway};
use crate::processing::window::{ApproachRecord, ApproachWindow, LandingOutcome, Observation};
use crate::reference::{AirportDirectory, AirportLookup};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use crate::telemetry::sample::{TelemetryFrame, TelemetrySample};
use serde::{Deserialize, Serialize};

/// Number of leading samples inspected for a position fix.
const POSITION_FIX_SAMPLES: usize = 10;

/// Everything the engine derived from one flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightAnalysis {
    pub flight_id: String,
    pub takeoffs: usize,
    pub approaches: Vec<ApproachRecord>,
    pub analyzed_samples: usize,
    pub skipped_samples: usize,
}

impl FlightAnalysis {
    fn empty(flight_id: &str, analyzed_samples: usize, skipped_samples: usize) -> Self {
        Self {
            flight_id: flight_id.to_string(),
            analyzed_samples,
            skipped_samples,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// On the ground after a full stop, waiting for the next departure.
    Ground,
    /// Climbing out after a touch-and-go; no approach can open yet.
    Climbout,
    Airborne,
    Approaching,
    /// Below the approach minimum altitude, heading for the final gate.
    Final,
    /// Ground contact made, outcome not yet decided.
    Landed,
    Stopped,
}

/// Approach/landing detector over one flight's telemetry at a time.
///
/// The engine only reads the reference data and keeps all per-flight state
/// inside [`analyze`](Self::analyze), so one instance can serve many flights,
/// concurrently or in sequence, with approach ids restarting at 0 for each.
pub struct ApproachDetectionEngine<'a, R: AirportLookup + ?Sized = AirportDirectory> {
    reference: &'a R,
    config: AnalysisConfig,
    metrics: Option<&'a MetricsRecorder>,
}

impl<'a, R: AirportLookup + ?Sized> ApproachDetectionEngine<'a, R> {
    pub fn new(reference: &'a R, config: AnalysisConfig) -> AnalysisResult<Self> {
        if reference.airports().is_empty() {
            return Err(AnalysisError::EmptyReferenceData);
        }
        Ok(Self {
            reference,
            config,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: &'a MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs the full scan over one flight and returns its approach records in
    /// order of occurrence.
    pub fn analyze(&self, flight_id: &str, frames: &[TelemetryFrame]) -> AnalysisResult<FlightAnalysis> {
        if frames.is_empty() {
            return Err(AnalysisError::EmptyTelemetry);
        }
        let log = LogManager::for_flight(flight_id);
        if let Some(metrics) = self.metrics {
            metrics.record_flight(frames.len());
        }
        let (indices, samples) = self.validate(frames, &log)?;
        let skipped = frames.len() - samples.len();
        if samples.is_empty() {
            return Err(AnalysisError::EmptyTelemetry);
        }

        let fix_window = &samples[..samples.len().min(POSITION_FIX_SAMPLES)];
        if fix_window.iter().all(TelemetrySample::lacks_position_fix) {
            log.warn("no position fix in leading samples, skipping analysis");
            return Ok(FlightAnalysis::empty(flight_id, samples.len(), skipped));
        }

        let Some(start) = self.find_initial_takeoff(&samples) else {
            log.record("no takeoff found");
            return Ok(FlightAnalysis::empty(flight_id, samples.len(), skipped));
        };
        log.detail(&format!("initial takeoff at sample {}", indices[start]));

        let mut scan = FlightScan::new(self, flight_id, &log);
        for (&index, sample) in indices[start..].iter().zip(&samples[start..]) {
            scan.step(index, sample)?;
            if scan.phase == Phase::Stopped {
                break;
            }
        }
        let last = samples.len() - 1;
        scan.finish(indices[last], &samples[last]);

        let approaches = scan.approaches;
        if let Some(metrics) = self.metrics {
            metrics.record_approaches(approaches.len());
        }
        log.record(&format!(
            "{} approaches, {} takeoffs",
            approaches.len(),
            scan.takeoffs
        ));

        Ok(FlightAnalysis {
            flight_id: flight_id.to_string(),
            takeoffs: scan.takeoffs,
            approaches,
            analyzed_samples: samples.len(),
            skipped_samples: skipped,
        })
    }

    /// Position of the first sample at or above the approach minimum altitude
    /// over the nearest field; taxi and run-up before it are not analysed.
    pub fn find_initial_takeoff(&self, samples: &[TelemetrySample]) -> Option<usize> {
        samples
            .iter()
            .position(|sample| self.field_agl(sample) >= self.config.approach_min_altitude_agl)
    }

    /// Altitude above the nearest airport's field elevation.
    fn field_agl(&self, sample: &TelemetrySample) -> f64 {
        detect_airport(self.reference.airports(), &sample.position)
            .map_or(sample.msl_altitude, |nearest| {
                sample.msl_altitude - nearest.airport.elevation
            })
    }

    /// Splits frames into valid samples (with their row indices) and skips the
    /// rest, aborting once the configured malformed limit is exceeded.
    fn validate(
        &self,
        frames: &[TelemetryFrame],
        log: &LogManager,
    ) -> AnalysisResult<(Vec<usize>, Vec<TelemetrySample>)> {
        let mut indices = Vec::with_capacity(frames.len());
        let mut samples = Vec::with_capacity(frames.len());
        let mut malformed = 0;

        for (index, frame) in frames.iter().enumerate() {
            match frame.validate(index) {
                Ok(sample) => {
                    indices.push(index);
                    samples.push(sample);
                }
                Err(err) => {
                    malformed += 1;
                    log.skipped(&err);
                    if let Some(limit) = self.config.max_malformed_samples {
                        if malformed > limit {
                            if let Some(metrics) = self.metrics {
                                metrics.record_malformed(malformed);
                            }
                            return Err(AnalysisError::TooManyMalformed {
                                count: malformed,
                                limit,
                            });
                        }
                    }
                }
            }
        }

        if malformed > 0 {
            log.warn(&format!("skipped {} malformed samples", malformed));
        }
        if let Some(metrics) = self.metrics {
            metrics.record_malformed(malformed);
        }
        Ok((indices, samples))
    }
}

/// Mutable state of one flight's scan.
struct FlightScan<'e, 'a, R: AirportLookup + ?Sized> {
    engine: &'e ApproachDetectionEngine<'a, R>,
    flight_id: &'e str,
    log: &'e LogManager,
    phase: Phase,
    window: Option<ApproachWindow<'a>>,
    next_approach_id: u32,
    approaches: Vec<ApproachRecord>,
    takeoffs: usize,
    agl_window: RollingMean,
    low_speed_run: usize,
}

impl<'e, 'a, R: AirportLookup + ?Sized> FlightScan<'e, 'a, R> {
    fn new(engine: &'e ApproachDetectionEngine<'a, R>, flight_id: &'e str, log: &'e LogManager) -> Self {
        Self {
            engine,
            flight_id,
            log,
            phase: Phase::Airborne,
            window: None,
            next_approach_id: 0,
            approaches: Vec::new(),
            takeoffs: 1,
            agl_window: RollingMean::new(engine.config.agl_window_samples),
            low_speed_run: 0,
        }
    }

    fn config(&self) -> &'e AnalysisConfig {
        &self.engine.config
    }

    fn step(&mut self, index: usize, sample: &TelemetrySample) -> AnalysisResult<()> {
        match self.phase {
            Phase::Ground | Phase::Climbout => {
                if self.engine.field_agl(sample) >= self.config().approach_min_altitude_agl {
                    if self.phase == Phase::Ground {
                        self.takeoffs += 1;
                        self.log.detail(&format!("takeoff at sample {}", index));
                    }
                    self.phase = Phase::Airborne;
                }
                Ok(())
            }
            Phase::Airborne => match self.try_open(index, sample) {
                Ok(true) => self.track(index, sample),
                Ok(false) => Ok(()),
                Err(err) if err.is_recoverable() => {
                    self.log.skipped(&err);
                    if let Some(metrics) = self.engine.metrics {
                        metrics.record_skipped_candidate();
                    }
                    Ok(())
                }
                Err(err) => Err(err),
            },
            Phase::Approaching | Phase::Final | Phase::Landed => self.track(index, sample),
            Phase::Stopped => Ok(()),
        }
    }

    /// Opens an approach window when every onset gate holds.
    ///
    /// Returns `Ok(false)` when the sample is not an approach candidate at all
    /// and a recoverable error when a candidate has no airport or runway.
    fn try_open(&mut self, index: usize, sample: &TelemetrySample) -> AnalysisResult<bool> {
        let config = self.config();
        if !config.ias_in_range(sample.indicated_airspeed)
            || sample.vertical_airspeed < config.approach_min_vsi
        {
            return Ok(false);
        }

        let nearest = detect_airport(self.engine.reference.airports(), &sample.position)
            .filter(|nearest| nearest.distance_miles <= config.airport_search_radius)
            .ok_or(AnalysisError::NoCandidateAirport { index })?;
        if nearest.distance_miles < config.approach_min_distance {
            return Ok(false);
        }

        let airport = nearest.airport;
        let runway = detect_runway(
            airport,
            &sample.position,
            sample.heading,
            config.runway_selection_indicator,
        )?
        .ok_or_else(|| AnalysisError::NoRunwayMatch {
            airport: airport.code.clone(),
            index,
        })?;

        let agl = sample.msl_altitude - runway.runway.elevation;
        if agl > config.approach_ceiling_agl
            || runway.heading_difference > config.approach_max_heading_error
            || runway.crosstrack_feet.abs() > config.approach_max_crosstrack_error
        {
            return Ok(false);
        }

        let approach_id = self.next_approach_id;
        self.next_approach_id += 1;
        self.log.record(&format!(
            "approach {} to {} ({}, {}) runway {} opened at sample {}",
            approach_id,
            airport.code,
            airport.city,
            airport.state,
            runway.runway.runway_code,
            index
        ));

        self.window = Some(ApproachWindow::open(
            approach_id,
            airport,
            runway.runway,
            index,
            sample.time,
        ));
        self.agl_window.clear();
        self.low_speed_run = 0;
        self.phase = Phase::Approaching;
        Ok(true)
    }

    fn track(&mut self, index: usize, sample: &TelemetrySample) -> AnalysisResult<()> {
        let config = self.config();
        let Some(window) = self.window.as_mut() else {
            self.phase = Phase::Airborne;
            return Ok(());
        };
        let runway = window.runway;
        let airport = window.airport;

        let agl = sample.msl_altitude - runway.elevation;
        let airport_miles = meters_to_miles(sample.position.distance_meters(&airport.center_point));
        let observation = Observation {
            index,
            time: sample.time,
            ias: sample.indicated_airspeed,
            vsi: sample.vertical_airspeed,
            heading_error: signed_heading_difference(runway.magnetic_heading, sample.heading),
            crosstrack: cross_track_to_center_line(&sample.position, runway)?,
            distance: meters_to_feet(sample.position.distance_meters(&runway.center_point)),
            agl,
        };
        self.agl_window.push(agl);
        let slow = sample.groundspeed < config.full_stop_speed_indicator;
        let out_of_range = airport_miles > config.airport_search_radius;

        match self.phase {
            Phase::Approaching => {
                if agl > config.approach_ceiling_agl || out_of_range {
                    self.close(LandingOutcome::GoAround, index, sample.time);
                    return Ok(());
                }
                window.observe(&observation, config);
                if agl < config.approach_min_altitude_agl {
                    self.phase = Phase::Final;
                }
            }
            Phase::Final => {
                if agl >= config.approach_min_altitude_agl || out_of_range {
                    self.close(LandingOutcome::GoAround, index, sample.time);
                    return Ok(());
                }
                let settled = self
                    .agl_window
                    .mean()
                    .is_some_and(|mean| mean <= config.touch_and_go_elevation_indicator);
                let rolling = slow && agl <= config.touch_and_go_elevation_indicator;
                if settled || rolling {
                    window.mark_landing(index);
                    self.log.detail(&format!("ground contact at sample {}", index));
                    self.phase = Phase::Landed;
                    self.low_speed_run = 0;
                    return self.track_rollout(index, sample, agl, slow);
                }
                window.observe(&observation, config);
            }
            Phase::Landed => return self.track_rollout(index, sample, agl, slow),
            _ => {}
        }
        Ok(())
    }

    /// Decides between full stop and touch-and-go after ground contact.
    fn track_rollout(&mut self, index: usize, sample: &TelemetrySample, agl: f64, slow: bool) -> AnalysisResult<()> {
        let config = self.config();
        self.low_speed_run = if slow { self.low_speed_run + 1 } else { 0 };

        if self.low_speed_run >= config.full_stop_confirm_samples.max(1) {
            self.close(LandingOutcome::FullStop, index, sample.time);
            self.phase = if config.continue_after_full_stop {
                Phase::Ground
            } else {
                Phase::Stopped
            };
            return Ok(());
        }

        let airborne_again = agl > config.touch_and_go_elevation_indicator
            && self
                .agl_window
                .mean()
                .is_some_and(|mean| mean > config.touch_and_go_elevation_indicator);
        if airborne_again && self.low_speed_run == 0 {
            self.close(LandingOutcome::TouchAndGo, index, sample.time);
            self.takeoffs += 1;
            self.phase = if config.resume_after_touch_and_go {
                Phase::Climbout
            } else {
                Phase::Stopped
            };
        }
        Ok(())
    }

    /// Closes the open window. A go-around either becomes a record or is
    /// dropped with its id handed back, per the configured policy.
    fn close(&mut self, outcome: LandingOutcome, index: usize, time: f64) {
        let Some(window) = self.window.take() else {
            return;
        };
        self.phase = Phase::Airborne;

        if outcome == LandingOutcome::GoAround && self.config().go_around_policy == GoAroundPolicy::Discard {
            self.log.record(&format!(
                "approach {} abandoned at sample {}, discarded",
                window.approach_id, index
            ));
            self.next_approach_id = window.approach_id;
            return;
        }

        let record = window.close(self.flight_id, outcome, index, time);
        self.log.record(&format!(
            "approach {} to {} runway {}: {}",
            record.approach_id, record.airport_code, record.runway_code, record.outcome
        ));
        self.approaches.push(record);
    }

    /// End of data: a still-open window is closed as incomplete, unless the
    /// aircraft was already rolling out below full-stop speed.
    fn finish(&mut self, index: usize, sample: &TelemetrySample) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let outcome = if window.has_landed()
            && sample.groundspeed < self.config().full_stop_speed_indicator
        {
            LandingOutcome::FullStop
        } else {
            LandingOutcome::Incomplete
        };
        self.close(outcome, index, sample.time);
    }
}
