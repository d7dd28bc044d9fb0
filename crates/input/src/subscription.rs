/// Guard for a host keyboard listener.
///
/// The detach callback runs exactly once: on [`Subscription::detach`] or on drop,
/// whichever comes first, so the listener is released on every exit path.
pub struct Subscription {
    label: &'static str,
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(label: &'static str, detach: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to release (headless hosts, tests).
    pub fn detached(label: &'static str) -> Self {
        Self {
            label,
            detach: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_attached(&self) -> bool {
        self.detach.is_some()
    }

    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            tracing::debug!(label = self.label, "detaching keyboard listener");
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("attached", &self.is_attached())
            .finish()
    }
}
