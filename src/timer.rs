use std::time::Instant;

/// Logs how long a scope took once it is dropped
pub struct Timer {
    task: &'static str,
    start_time: Instant,
    labels: Vec<(String, String)>,
}

impl Timer {
    /// Create a new timer for the named task
    pub fn new(task: &'static str) -> Self {
        Self {
            task,
            start_time: Instant::now(),
            labels: Vec::new(),
        }
    }

    /// Add a label to the timer
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let elapsed = self.start_time.elapsed();

        if self.labels.is_empty() {
            tracing::debug!(exec_time = ?elapsed, "Time track for '{}'", self.task);
        } else {
            let labels = self
                .labels
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");

            tracing::debug!(
                exec_time = ?elapsed,
                labels = %labels,
                "Time track for '{}'",
                self.task
            );
        }
    }
}
