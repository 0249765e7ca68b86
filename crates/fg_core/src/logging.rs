use std::collections::VecDeque;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// A cheap, clonable logging handle carrying nested prefixes.
///
/// Components receive one at construction instead of reaching for a global
/// logger, so tests can hand each component its own.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            prefixes: VecDeque::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: String) -> Self {
        self.prefixes.push_back(prefix);
        self
    }

    /// A child handle with one more prefix, leaving `self` untouched.
    pub fn scoped(&self, prefix: impl Into<String>) -> Self {
        self.clone().with_prefix(prefix.into())
    }

    fn prefixed(&self, message: &str) -> String {
        let prefix = self.prefixes.iter().map(|p| format!("{} ", p)).collect::<String>();
        format!("{}{}", prefix, message)
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", self.prefixed(message));
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", self.prefixed(message));
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}", self.prefixed(message));
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}", self.prefixed(message));
    }
}

/// Installs the fmt subscriber once. Level comes from `RUST_LOG`, default `info`.
pub fn init_logging() -> Logger {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        });
    }
    Logger::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        let logger = Logger::new().with_prefix("[sample]".to_string());
        assert_eq!(logger.prefixed("hello"), "[sample] hello");

        let child = logger.scoped("`Title`");
        assert_eq!(child.prefixed("hello"), "[sample] `Title` hello");
        assert_eq!(logger.prefixed("hello"), "[sample] hello");
    }
}
