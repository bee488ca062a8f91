//! Per-endpoint metrics registry rendered in Prometheus text format.
//!
//! Counters and histograms are keyed by a sorted label vector in a `DashMap`
//! so rendering order is stable regardless of insertion order. Histogram
//! buckets are fixed integer microseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Entries sorted by label key so output is deterministic.
fn sorted_entries<V, T>(map: &DashMap<LabelKey, V>, read: impl Fn(&V) -> T) -> Vec<(LabelKey, T)> {
    let mut rows: Vec<_> = map.iter().map(|r| (r.key().clone(), read(r.value()))).collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for (key, val) in sorted_entries(&self.map, |c| c.load(Ordering::Relaxed)) {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(&key), val);
        }
    }
}

// 1ms, 10ms, 100ms, 500ms, 1s, 2s, 3s, 4s, 5s, 10s
const BUCKETS_MICROS: [u64; 10] = [
    1_000, 10_000, 100_000, 500_000, 1_000_000, 2_000_000, 3_000_000, 4_000_000, 5_000_000,
    10_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration; every bucket at or above the value is bumped.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        let rows = sorted_entries(&self.map, |h| {
            let buckets: Vec<u64> = h.buckets.iter().map(|b| b.load(Ordering::Relaxed)).collect();
            (buckets, h.count.load(Ordering::Relaxed), h.sum.load(Ordering::Relaxed))
        });

        for (key, (buckets, count, sum)) in rows {
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (le, n) in BUCKETS_MICROS.iter().zip(buckets) {
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, n);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

/// A single unlabelled sample computed at scrape time.
pub struct Sample<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub value: i64,
}

#[derive(Default)]
pub struct ServiceMetrics {
    pub http_requests: CounterVec,
    pub root_delay: HistogramVec, // microseconds
}

impl ServiceMetrics {
    /// Render registered metrics followed by caller-supplied samples.
    pub fn render(&self, extra: &[Sample<'_>]) -> String {
        let mut out = String::new();
        self.http_requests.render("podprobe_http_requests_total", &mut out);
        self.root_delay.render("podprobe_root_delay_micros", &mut out);

        for s in extra {
            let _ = writeln!(out, "# TYPE {} {}\n{} {}", s.name, s.kind, s.name, s.value);
        }
        out
    }
}
