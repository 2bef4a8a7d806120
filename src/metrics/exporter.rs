use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::WindowMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for window cache snapshots.
///
/// Writes the Prometheus text exposition format so the output can be served
/// on a scrape endpoint or forwarded to an OpenTelemetry collector.
///
/// ```
/// use seqwindow::metrics::exporter::PrometheusTextExporter;
/// use seqwindow::metrics::snapshot::WindowMetricsSnapshot;
/// use seqwindow::metrics::traits::MetricsExporter;
///
/// let exporter = PrometheusTextExporter::new("inventory", Vec::new());
/// exporter.export(&WindowMetricsSnapshot { fetch_calls: 3, ..Default::default() });
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("inventory_fetch_calls_total 3"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_counter(&self, name: &str, value: u64) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, name: &str, value: f64) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<WindowMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &WindowMetricsSnapshot) {
        self.write_counter(&self.metric_name("get_calls_total"), snapshot.get_calls);
        self.write_counter(&self.metric_name("get_hits_total"), snapshot.get_hits);
        self.write_counter(&self.metric_name("get_misses_total"), snapshot.get_misses);
        self.write_counter(&self.metric_name("fetch_calls_total"), snapshot.fetch_calls);
        self.write_counter(
            &self.metric_name("fetched_entries_total"),
            snapshot.fetched_entries,
        );
        self.write_counter(
            &self.metric_name("window_replacements_total"),
            snapshot.window_replacements,
        );
        self.write_counter(&self.metric_name("not_found_total"), snapshot.not_found);
        self.write_counter(
            &self.metric_name("fetch_failures_total"),
            snapshot.fetch_failures,
        );
        self.write_counter(
            &self.metric_name("decode_failures_total"),
            snapshot.decode_failures,
        );
        self.write_counter(&self.metric_name("peek_calls_total"), snapshot.peek_calls);
        self.write_counter(&self.metric_name("peek_found_total"), snapshot.peek_found);
        self.write_gauge(&self.metric_name("window_len"), snapshot.window_len as f64);
        self.write_gauge(&self.metric_name("batch_size"), snapshot.batch_size as f64);
        self.write_gauge(&self.metric_name("hit_ratio"), snapshot.hit_ratio());
    }
}
