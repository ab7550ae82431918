#[cfg(target_os = "linux")]
use prometheus::process_collector::ProcessCollector;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::{debug, error};

use crate::{models::plan::PlanStatus, services::plan_api::PlanApiClient};

pub const NAMESPACE: &str = "browserstack_plan";
pub const PLAN_LABEL: &str = "plan";

struct PlanGauge {
    name: &'static str,
    help: &'static str,
    value: fn(&PlanStatus) -> i64,
}

// ── Plan gauges (one series each, labelled with the account) ────────────────
const PLAN_GAUGES: [PlanGauge; 5] = [
    PlanGauge {
        name: "parallel_sessions_running",
        help: "Parallel sessions currently running",
        value: |s| s.parallel_sessions_running,
    },
    PlanGauge {
        name: "team_parallel_sessions_max_allowed",
        help: "Parallel sessions allowed across the team",
        value: |s| s.team_parallel_sessions_max_allowed,
    },
    PlanGauge {
        name: "parallel_sessions_max_allowed",
        help: "Parallel sessions allowed for this account",
        value: |s| s.parallel_sessions_max_allowed,
    },
    PlanGauge {
        name: "queued_sessions",
        help: "Sessions currently queued",
        value: |s| s.queued_sessions,
    },
    PlanGauge {
        name: "queued_sessions_max_allowed",
        help: "Sessions allowed in the queue",
        value: |s| s.queued_sessions_max_allowed,
    },
];

/// A single labelled observation derived from a [`PlanStatus`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub name: &'static str,
    pub plan: String,
    pub value: f64,
}

impl MetricPoint {
    pub fn fq_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.name)
    }
}

/// Outcome of one upstream fetch. `up` is false when `status` is the
/// zero-valued fallback. A body that parsed but had some unusable fields
/// still counts as up; those fields read as zero.
#[derive(Debug, Clone, Default)]
pub struct Scrape {
    pub status: PlanStatus,
    pub up: bool,
}

impl Scrape {
    pub fn metric_points(&self, plan: &str) -> [MetricPoint; 5] {
        PLAN_GAUGES.map(|gauge| MetricPoint {
            name: gauge.name,
            plan: plan.to_string(),
            value: (gauge.value)(&self.status) as f64,
        })
    }

    /// Builds a registry holding only this scrape's series, plus the
    /// exporter's own process metrics where the platform provides them.
    pub fn registry(&self, plan: &str) -> prometheus::Result<Registry> {
        let registry = Registry::new();

        #[cfg(target_os = "linux")]
        registry.register(Box::new(ProcessCollector::for_self()))?;

        for (gauge, point) in PLAN_GAUGES.iter().zip(self.metric_points(plan)) {
            let vec = GaugeVec::new(
                Opts::new(gauge.name, gauge.help).namespace(NAMESPACE),
                &[PLAN_LABEL],
            )?;
            vec.with_label_values(&[point.plan.as_str()]).set(point.value);
            registry.register(Box::new(vec))?;
        }

        let up = GaugeVec::new(
            Opts::new("up", "Whether the last plan status fetch succeeded").namespace(NAMESPACE),
            &[PLAN_LABEL],
        )?;
        up.with_label_values(&[plan]).set(if self.up { 1.0 } else { 0.0 });
        registry.register(Box::new(up))?;

        if self.up {
            let info = GaugeVec::new(
                Opts::new("info", "Automate plan the account is subscribed to").namespace(NAMESPACE),
                &[PLAN_LABEL, "automate_plan"],
            )?;
            info.with_label_values(&[plan, self.status.automate_plan.as_str()]).set(1.0);
            registry.register(Box::new(info))?;
        }

        Ok(registry)
    }

    pub fn encode(&self, plan: &str) -> prometheus::Result<String> {
        let registry = self.registry(plan)?;
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Fetches the plan status on demand and turns it into gauges.
///
/// Holds no per-scrape state, so concurrent scrapes never observe each
/// other's values.
#[derive(Debug, Clone)]
pub struct PlanMetricsCollector {
    api: PlanApiClient,
    identity: String,
}

impl PlanMetricsCollector {
    pub fn new(api: PlanApiClient, identity: impl Into<String>) -> Self {
        Self {
            api,
            identity: identity.into(),
        }
    }

    /// Never fails: fetch errors are logged and reported as a zero-valued
    /// status with `up = false`.
    pub async fn scrape(&self) -> Scrape {
        match self.api.fetch_status().await {
            Ok(status) => {
                debug!("Metrics: fetched plan status from {}", self.api.url());
                Scrape { status, up: true }
            }
            Err(e) => {
                error!("Metrics: plan status fetch failed: {}", e);
                Scrape::default()
            }
        }
    }

    pub async fn render(&self) -> prometheus::Result<String> {
        self.scrape().await.encode(&self.identity)
    }
}
