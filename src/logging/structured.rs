use std::collections::BTreeMap;
use tracing::{debug, error, info, trace, warn};

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "normalizer", "dedup", "calculator")
    pub component: String,
    /// Offer type being calculated
    pub offer_type: Option<String>,
    /// Delivery point (PDL) the readings belong to
    pub usage_point_id: Option<String>,
    /// Additional context fields
    pub extra_fields: BTreeMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            offer_type: None,
            usage_point_id: None,
            extra_fields: BTreeMap::new(),
        }
    }

    /// Set offer type
    pub fn with_offer_type(mut self, offer_type: &str) -> Self {
        self.offer_type = Some(offer_type.to_string());
        self
    }

    /// Set delivery point identifier
    pub fn with_usage_point_id(mut self, usage_point_id: &str) -> Self {
        self.usage_point_id = Some(usage_point_id.to_string());
        self
    }

    /// Add extra field
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    /// Derive a logger for one offer type, keeping the other fields
    pub fn for_offer_type(&self, offer_type: &str) -> Self {
        Self::new(self.context.clone().with_offer_type(offer_type))
    }

    /// Log an info message with context
    pub fn info(&self, message: &str) {
        let fields = self.format_fields();
        info!(%fields, "{}", message);
    }
    /// Log a warning message with context
    pub fn warn(&self, message: &str) {
        let fields = self.format_fields();
        warn!(%fields, "{}", message);
    }
    /// Log an error message with context
    pub fn error(&self, message: &str) {
        let fields = self.format_fields();
        error!(%fields, "{}", message);
    }
    /// Log a debug message with context
    pub fn debug(&self, message: &str) {
        let fields = self.format_fields();
        debug!(%fields, "{}", message);
    }
    /// Log a trace message with context
    pub fn trace(&self, message: &str) {
        let fields = self.format_fields();
        trace!(%fields, "{}", message);
    }

    /// Format context fields for logging
    fn format_fields(&self) -> String {
        let mut fields = vec![format!("component={}", self.context.component)];
        if let Some(ref offer_type) = self.context.offer_type {
            fields.push(format!("offer_type={}", offer_type));
        }
        if let Some(ref usage_point_id) = self.context.usage_point_id {
            fields.push(format!("usage_point_id={}", usage_point_id));
        }
        for (key, value) in &self.context.extra_fields {
            fields.push(format!("{}={}", key, value));
        }
        fields.join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}
/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context() {
        let context = LogContext::new("test")
            .with_offer_type("TEMPO")
            .with_usage_point_id("12345678901234")
            .with_field("key", "value".to_string());

        assert_eq!(context.component, "test");
        assert_eq!(context.offer_type.as_deref(), Some("TEMPO"));
        assert_eq!(context.usage_point_id.as_deref(), Some("12345678901234"));
        assert_eq!(context.extra_fields.get("key"), Some(&"value".to_string()));
    }

    #[test]
    fn test_format_fields_order() {
        let logger = get_logger_with_context(
            LogContext::new("calculator")
                .with_field("b", "2".to_string())
                .with_field("a", "1".to_string()),
        )
        .for_offer_type("HC_HP");
        assert_eq!(
            logger.format_fields(),
            "component=calculator,offer_type=HC_HP,a=1,b=2"
        );
    }

    #[test]
    fn test_get_logger() {
        let logger = get_logger("test_component");
        assert_eq!(logger.context.component, "test_component");
        // These should not panic without a subscriber
        logger.info("Test info message");
        logger.debug("Test debug message");
    }
}
