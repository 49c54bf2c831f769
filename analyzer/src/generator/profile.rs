use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use pollucore::extract::SCALED_PRESSURE_MARKER;
use pollucore::math::STANDARD_SEA_LEVEL_HPA;
use pollucore::model::{parse_timestamp, SampleRow};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ISA_SCALE_M: f64 = 44_330.0;
const ISA_POWER: f64 = 5.255;
const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Configuration for a synthetic balloon ascent.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub ascent_rate_mps: f64,
    pub sample_interval_s: f64,
    pub surface_temperature_c: f64,
    pub lapse_rate_c_per_m: f64,
    pub launch_pressure_hpa: f64,
    pub inversion_base_m: Option<f64>,
    pub inversion_depth_m: f64,
    pub inversion_strength_c: f64,
    pub noise: f64,
    pub seed: u64,
    pub start: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 600,
            ascent_rate_mps: 0.5,
            sample_interval_s: 1.0,
            surface_temperature_c: 28.0,
            lapse_rate_c_per_m: 0.0065,
            launch_pressure_hpa: STANDARD_SEA_LEVEL_HPA,
            inversion_base_m: Some(150.0),
            inversion_depth_m: 10.0,
            inversion_strength_c: 4.0,
            noise: 0.0,
            seed: 0,
            start: "2019-11-20T06:00:00".to_string(),
        }
    }
}

impl GeneratorConfig {
    fn start_time(&self) -> anyhow::Result<NaiveDateTime> {
        parse_timestamp(&self.start)
            .with_context(|| format!("invalid generator start time {:?}", self.start))
    }

    /// Temperature of the undisturbed profile at `altitude`.
    fn temperature_at(&self, altitude: f64) -> f64 {
        let lapse = self.surface_temperature_c - self.lapse_rate_c_per_m * altitude;
        let base = match self.inversion_base_m {
            Some(base) if self.inversion_depth_m > 0.0 => base,
            _ => return lapse,
        };
        let into_layer = (altitude - base).clamp(0.0, self.inversion_depth_m);
        lapse + self.inversion_strength_c * into_layer / self.inversion_depth_m
    }
}

fn pressure_at(altitude: f64, launch_pressure: f64) -> f64 {
    launch_pressure * (1.0 - altitude / ISA_SCALE_M).powf(ISA_POWER)
}

pub fn build_flight_from_config(config: &GeneratorConfig) -> anyhow::Result<Vec<SampleRow>> {
    let start = config.start_time()?;
    let step_ms = (config.sample_interval_s * 1000.0).round() as i64;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut rows = Vec::with_capacity(config.samples);

    for index in 0..config.samples {
        let elapsed_s = index as f64 * config.sample_interval_s;
        let altitude = elapsed_s * config.ascent_rate_mps;
        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        let timestamp = start + Duration::milliseconds(step_ms * index as i64);
        let pressure = pressure_at(altitude, config.launch_pressure_hpa);
        rows.push(
            SampleRow::new(timestamp, altitude, config.temperature_at(altitude) + jitter)
                .with_pressures(Some(pressure), Some(0.0)),
        );
    }

    Ok(rows)
}

pub fn build_flight(seed: u64) -> anyhow::Result<Vec<SampleRow>> {
    let config = GeneratorConfig {
        seed,
        ..Default::default()
    };
    build_flight_from_config(&config)
}

/// Renders rows as a mixed telemetry log: one heartbeat per row followed by a
/// 22-column scaled-pressure record. Altitude is dropped, as in real logs.
pub fn render_scaled_pressure_log(rows: &[SampleRow]) -> String {
    let mut log = String::new();
    for (seq, row) in rows.iter().enumerate() {
        let ts = row.timestamp.format(LOG_TIMESTAMP_FORMAT);
        log.push_str(&format!(
            "{},mavlink_heartbeat_t,type,6,autopilot,8,base_mode,0,system_status,4\n",
            ts
        ));
        log.push_str(&format!(
            "{ts},{marker},time_boot_ms,{boot},sysid,1,compid,1,seq,{seq},len,14,\
             press_abs,{abs:.4},press_diff,{diff:.4},temperature,{temp:.4},crc,0,status,ok\n",
            ts = ts,
            marker = SCALED_PRESSURE_MARKER,
            boot = seq * 1000,
            seq = seq % 256,
            abs = row.pressure_absolute.unwrap_or(f64::NAN),
            diff = row.pressure_differential.unwrap_or(0.0),
            temp = row.temperature,
        ));
    }
    log
}
