//! Logging and metrics setup

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake_agent::{Disposition, TurnOutcome};

pub const SUBMISSIONS: &str = "intake_submissions_total";
pub const SAFETY_REJECTIONS: &str = "intake_safety_rejections_total";
pub const DISQUALIFICATIONS: &str = "intake_disqualifications_total";
pub const LLM_FAILURES: &str = "intake_llm_failures_total";
pub const SESSIONS_CREATED: &str = "intake_sessions_created_total";

/// `RUST_LOG` filter (default `info`), plain or JSON lines
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(SUBMISSIONS, "Non-blank answers submitted");
    describe_counter!(SAFETY_REJECTIONS, "Answers rejected by the safety screen");
    describe_counter!(DISQUALIFICATIONS, "Intakes concluded as disqualified");
    describe_counter!(LLM_FAILURES, "Model or moderation failures absorbed by a default");
    describe_counter!(SESSIONS_CREATED, "Sessions created");

    Ok(handle)
}

pub fn record_session_created() {
    counter!(SESSIONS_CREATED).increment(1);
}

pub fn record_turn(outcome: &TurnOutcome) {
    match &outcome.disposition {
        Disposition::Ignored => return,
        Disposition::Rejected { .. } => counter!(SAFETY_REJECTIONS).increment(1),
        Disposition::Concluded { disqualified: true } => counter!(DISQUALIFICATIONS).increment(1),
        Disposition::Concluded { .. } | Disposition::Continued => {}
    }
    counter!(SUBMISSIONS).increment(1);

    for notice in &outcome.notices {
        counter!(LLM_FAILURES, "step" => notice.kind.as_str()).increment(1);
    }
}
