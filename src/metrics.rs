#[cfg(feature = "metrics")]
mod prom {
    use lazy_static::lazy_static;
    use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};
    use tracing::warn;

    lazy_static! {
        pub(super) static ref DECODED_VALUES_COUNT: IntCounter = register_int_counter!(
            "decoded_json_values_total",
            "Total number of top-level JSON values decoded"
        )
        .expect("metric registration");
        pub(super) static ref DECODE_ERROR_COUNT: IntCounter = register_int_counter!(
            "json_decode_errors_total",
            "Total number of JSON values abandoned because of a decode error"
        )
        .expect("metric registration");
        pub(super) static ref QUEUE_DEPTH_GAUGE: IntGauge = register_int_gauge!(
            "decoder_queue_depth",
            "Decoded values waiting for a consumer in the most recently active decoder"
        )
        .expect("metric registration");
        pub(super) static ref RELAYED_EVENTS_COUNT: IntCounter = register_int_counter!(
            "relayed_events_total",
            "Total number of events received from peers and emitted locally"
        )
        .expect("metric registration");
    }

    pub fn gather_metrics() -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        let metric_families = prometheus::gather();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            warn!("Failed to encode metrics: {}", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(feature = "metrics")]
pub use prom::gather_metrics;

pub(crate) fn record_decoded_value() {
    #[cfg(feature = "metrics")]
    prom::DECODED_VALUES_COUNT.inc();
}

pub(crate) fn record_decode_error() {
    #[cfg(feature = "metrics")]
    prom::DECODE_ERROR_COUNT.inc();
}

pub(crate) fn record_relayed_event() {
    #[cfg(feature = "metrics")]
    prom::RELAYED_EVENTS_COUNT.inc();
}

pub(crate) fn set_queue_depth(_depth: usize) {
    #[cfg(feature = "metrics")]
    prom::QUEUE_DEPTH_GAUGE.set(_depth as i64);
}
