//! Normalizes `with`-clause option ASTs into [`IRModuleCallOptions`]
//! (`spec.md` §4.8, §6).

use crate::node::NodeId;
use flowc_check::{TypedExpression, TypedOptionEntry, TypedOptionValue};
use flowc_parser::{JoinSpec, WindowSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    Fixed,
    Linear,
    Exponential,
}

impl BackoffStrategy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "fixed" => Some(Self::Fixed),
            "linear" => Some(Self::Linear),
            "exponential" => Some(Self::Exponential),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnErrorStrategy {
    Propagate,
    Skip,
    Log,
    Wrap,
}

impl OnErrorStrategy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "propagate" => Some(Self::Propagate),
            "skip" => Some(Self::Skip),
            "log" => Some(Self::Log),
            "wrap" => Some(Self::Wrap),
            _ => None,
        }
    }
}

/// Per-call metadata normalized from a `with` clause (`spec.md` §3).
#[derive(Debug, Clone, Default)]
pub struct IRModuleCallOptions {
    pub retries: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub delay_ms: Option<u64>,
    pub backoff: Option<BackoffStrategy>,
    pub fallback: Option<NodeId>,
    pub cache_ttl_ms: Option<u64>,
    pub cache_backend: Option<String>,
    pub throttle: Option<(u64, u64)>,
    pub concurrency: Option<u32>,
    pub on_error: Option<OnErrorStrategy>,
    pub lazy: Option<bool>,
    pub priority: Option<u8>,
    pub batch: Option<u32>,
    pub batch_timeout_ms: Option<u64>,
    pub window: Option<String>,
    pub checkpoint_ms: Option<u64>,
    pub join: Option<String>,
}

impl IRModuleCallOptions {
    pub fn is_empty(&self) -> bool {
        let Self {
            retries, timeout_ms, delay_ms, backoff, fallback, cache_ttl_ms, cache_backend, throttle,
            concurrency, on_error, lazy, priority, batch, batch_timeout_ms, window, checkpoint_ms, join,
        } = self;
        retries.is_none()
            && timeout_ms.is_none()
            && delay_ms.is_none()
            && backoff.is_none()
            && fallback.is_none()
            && cache_ttl_ms.is_none()
            && cache_backend.is_none()
            && throttle.is_none()
            && concurrency.is_none()
            && on_error.is_none()
            && lazy.is_none()
            && priority.is_none()
            && batch.is_none()
            && batch_timeout_ms.is_none()
            && window.is_none()
            && checkpoint_ms.is_none()
            && join.is_none()
    }
}

fn priority_from_name(name: &str) -> Option<u8> {
    match name {
        "critical" => Some(100),
        "high" => Some(80),
        "normal" => Some(50),
        "low" => Some(20),
        "background" => Some(0),
        _ => None,
    }
}

fn serialize_window(w: &WindowSpec) -> String {
    match w {
        WindowSpec::Tumbling(ms) => format!("tumbling:{}", ms),
        WindowSpec::Sliding(size_ms, slide_ms) => format!("sliding:{}:{}", size_ms, slide_ms),
        WindowSpec::Count(n) => format!("count:{}", n),
    }
}

fn serialize_join(j: &JoinSpec) -> String {
    match j {
        JoinSpec::CombineLatest => "combine-latest".to_string(),
        JoinSpec::Zip => "zip".to_string(),
        JoinSpec::Buffer(ms) => format!("buffer:{}", ms),
    }
}

/// Converts `with`-clause entries into normalized options; `build_fallback`
/// IR-generates a `fallback` expression in the enclosing graph and returns
/// its node ID (`spec.md` §4.8).
pub fn convert_options(
    entries: &[TypedOptionEntry],
    mut build_fallback: impl FnMut(&TypedExpression) -> NodeId,
) -> IRModuleCallOptions {
    let mut opts = IRModuleCallOptions::default();
    for entry in entries {
        match (entry.name.as_str(), &entry.value) {
            ("retry", TypedOptionValue::Int(n)) => opts.retries = Some(*n as u32),
            ("timeout", TypedOptionValue::Duration(ms)) => opts.timeout_ms = Some(*ms),
            ("delay", TypedOptionValue::Duration(ms)) => opts.delay_ms = Some(*ms),
            ("backoff", TypedOptionValue::Ident(name)) => opts.backoff = BackoffStrategy::parse(name),
            ("fallback", TypedOptionValue::Expr(expr)) => opts.fallback = Some(build_fallback(expr)),
            ("cache", TypedOptionValue::Duration(ms)) => opts.cache_ttl_ms = Some(*ms),
            ("cache_backend", TypedOptionValue::Ident(name)) => opts.cache_backend = Some(name.clone()),
            ("throttle", TypedOptionValue::Throttle(count, per_ms)) => opts.throttle = Some((*count, *per_ms)),
            ("concurrency", TypedOptionValue::Int(n)) => opts.concurrency = Some(*n as u32),
            ("on_error", TypedOptionValue::Ident(name)) => opts.on_error = OnErrorStrategy::parse(name),
            ("lazy", TypedOptionValue::Bool(b)) => opts.lazy = Some(*b),
            ("priority", TypedOptionValue::Int(n)) => opts.priority = Some((*n).clamp(0, 100) as u8),
            ("priority", TypedOptionValue::Ident(name)) => opts.priority = priority_from_name(name),
            ("batch", TypedOptionValue::Int(n)) => opts.batch = Some(*n as u32),
            ("batch_timeout", TypedOptionValue::Duration(ms)) => opts.batch_timeout_ms = Some(*ms),
            ("window", TypedOptionValue::Window(w)) => opts.window = Some(serialize_window(w)),
            ("checkpoint", TypedOptionValue::Duration(ms)) => opts.checkpoint_ms = Some(*ms),
            ("join", TypedOptionValue::Join(j)) => opts.join = Some(serialize_join(j)),
            (name, value) => log::warn!("unrecognized option '{}' with value {:?}", name, value),
        }
    }
    opts
}
