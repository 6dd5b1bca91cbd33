//! # Resource Data
//!
//! Per-instance state handed to a controller: the remote ID, the declared
//! configuration, and the last state read back from Auth0.

use crate::schema::ResourceSpec;

/// State of one managed resource
///
/// The resource is present while it has an ID. Controllers clear the ID when
/// Auth0 reports the resource missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceData<S> {
    id: Option<String>,
    config: S,
    state: Option<S>,
    new_resource: bool,
}

impl<S: ResourceSpec> ResourceData<S> {
    /// Resource that has not been applied yet
    #[must_use]
    pub fn new(config: S) -> Self {
        Self {
            id: None,
            config,
            state: None,
            new_resource: false,
        }
    }

    /// Resource applied in an earlier run
    #[must_use]
    pub fn with_state(config: S, id: impl Into<String>, state: S) -> Self {
        Self::resume(config, id, Some(state))
    }

    /// Resource applied in an earlier run whose last state may be unknown
    ///
    /// Without a state the next read fills it in and every declared attribute
    /// counts as changed.
    #[must_use]
    pub fn resume(config: S, id: impl Into<String>, state: Option<S>) -> Self {
        Self {
            id: Some(id.into()),
            config,
            state,
            new_resource: false,
        }
    }

    /// Resource known only by its remote ID, to be filled in by a read
    #[must_use]
    pub fn import(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            config: S::default(),
            state: None,
            new_resource: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource absent; the known state goes with it
    pub fn clear_id(&mut self) {
        self.id = None;
        self.state = None;
    }

    /// Whether the resource exists remotely, as far as we know
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &S {
        &self.config
    }

    pub fn set_config(&mut self, config: S) {
        self.config = config;
    }

    #[must_use]
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    pub fn set_state(&mut self, state: S) {
        self.state = Some(state);
    }

    /// Record the declared configuration as the known state
    ///
    /// Called after a successful write, before the read-back, so write-only
    /// attributes survive the read.
    pub fn commit_config(&mut self) {
        self.state = Some(self.config.clone());
    }

    /// Whether the resource was created during the current apply
    #[must_use]
    pub fn is_new_resource(&self) -> bool {
        self.new_resource
    }

    pub fn mark_new_resource(&mut self) {
        self.new_resource = true;
    }

    /// Whether an attribute of the declared configuration differs from the known state
    ///
    /// Without a known state everything counts as changed.
    pub fn has_change<T, F>(&self, field: F) -> bool
    where
        T: PartialEq + ?Sized,
        F: Fn(&S) -> &T,
    {
        match &self.state {
            Some(state) => field(state) != field(&self.config),
            None => true,
        }
    }

    /// Consume into the ID and known state
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Option<S>) {
        (self.id, self.state)
    }
}
