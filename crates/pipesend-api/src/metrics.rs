//! Counters and histograms shared across concurrent stage invocations

use std::collections::HashMap;
use std::sync::atomic::{
    AtomicI64,
    Ordering,
};
use std::sync::{
    Arc,
    LazyLock,
    Mutex,
};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    ExportError,
    ExportResult,
};

/// Reservoir size used for histograms unless another is requested
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

static GLOBAL_REGISTRY: LazyLock<Arc<MetricsRegistry>> =
    LazyLock::new(|| Arc::new(MetricsRegistry::new()));

#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self, delta: i64) {
        self.count.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    /// Number of values ever recorded, not just those still sampled
    pub count: u64,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub sum: i64,
    pub values: Vec<i64>,
}

#[derive(Debug)]
struct Reservoir {
    count: u64,
    sum: i64,
    min: i64,
    max: i64,
    values: Vec<i64>,
}

/// Histogram backed by a uniform reservoir sample (Vitter's algorithm R)
#[derive(Debug)]
pub struct Histogram {
    size: usize,
    reservoir: Mutex<Reservoir>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::with_reservoir_size(DEFAULT_RESERVOIR_SIZE)
    }

    pub fn with_reservoir_size(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            reservoir: Mutex::new(Reservoir {
                count: 0,
                sum: 0,
                min: 0,
                max: 0,
                values: Vec::with_capacity(size.min(DEFAULT_RESERVOIR_SIZE)),
            }),
        }
    }

    pub fn update(&self, value: i64) {
        let mut reservoir = self.reservoir.lock().unwrap_or_else(|e| e.into_inner());

        if reservoir.count == 0 {
            reservoir.min = value;
            reservoir.max = value;
        } else {
            reservoir.min = reservoir.min.min(value);
            reservoir.max = reservoir.max.max(value);
        }
        reservoir.count += 1;
        reservoir.sum = reservoir.sum.saturating_add(value);

        if reservoir.values.len() < self.size {
            reservoir.values.push(value);
        } else {
            let slot = rand::rng().random_range(0..reservoir.count);
            if (slot as usize) < self.size {
                reservoir.values[slot as usize] = value;
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.reservoir
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .count
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let reservoir = self.reservoir.lock().unwrap_or_else(|e| e.into_inner());
        let mean = if reservoir.count == 0 {
            0.0
        } else {
            reservoir.sum as f64 / reservoir.count as f64
        };

        HistogramSnapshot {
            count: reservoir.count,
            min: reservoir.min,
            max: reservoir.max,
            mean,
            sum: reservoir.sum,
            values: reservoir.values.clone(),
        }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub enum Instrument {
    Counter(Arc<Counter>),
    Histogram(Arc<Histogram>),
}

impl Instrument {
    pub fn kind(&self) -> &'static str {
        match self {
            Instrument::Counter(_) => "counter",
            Instrument::Histogram(_) => "histogram",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisteredInstrument {
    pub instrument: Instrument,
    pub tags: HashMap<String, String>,
}

/// Named instrument registry
///
/// Registration is a get-or-insert on the name: concurrent first registrations
/// of the same name all receive the single instrument that won the insert.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    instruments: DashMap<String, RegisteredInstrument>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> Arc<MetricsRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    pub fn counter(&self, name: &str, tags: HashMap<String, String>) -> ExportResult<Arc<Counter>> {
        match self.get_or_register(name, tags, || Instrument::Counter(Arc::new(Counter::new())))? {
            Instrument::Counter(counter) => Ok(counter),
            other => Err(kind_mismatch(name, "counter", other.kind())),
        }
    }

    pub fn histogram(
        &self, name: &str, tags: HashMap<String, String>,
    ) -> ExportResult<Arc<Histogram>> {
        match self.get_or_register(name, tags, || {
            Instrument::Histogram(Arc::new(Histogram::new()))
        })? {
            Instrument::Histogram(histogram) => Ok(histogram),
            other => Err(kind_mismatch(name, "histogram", other.kind())),
        }
    }

    pub fn get(&self, name: &str) -> Option<RegisteredInstrument> {
        self.instruments.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instruments.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.instruments.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    fn get_or_register<F>(
        &self, name: &str, tags: HashMap<String, String>, create: F,
    ) -> ExportResult<Instrument>
    where
        F: FnOnce() -> Instrument,
    {
        if name.is_empty() {
            return Err(ExportError::Internal(
                "Metric name cannot be empty".to_string(),
            ));
        }

        if let Some(existing) = self.instruments.get(name) {
            return Ok(existing.instrument.clone());
        }

        let instrument = match self.instruments.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.get().instrument.clone(),
            Entry::Vacant(entry) => {
                let instrument = create();
                entry.insert(RegisteredInstrument {
                    instrument: instrument.clone(),
                    tags,
                });
                instrument
            }
        };
        Ok(instrument)
    }
}

fn kind_mismatch(name: &str, wanted: &str, found: &str) -> ExportError {
    ExportError::Internal(format!(
        "Metric '{}' is already registered as a {}, not a {}",
        name, found, wanted
    ))
}
