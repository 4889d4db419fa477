//! Registry of every live host.
//!
//! Passed explicitly to the shell so `ssh` and `download` can reach other
//! machines. The first registered host is the player's own.

use crate::error::ShellError;
use crate::host::{Host, HostProfile};
use crate::store::FilesystemStore;
use std::sync::Arc;

/// Index of a host inside a [`Network`].
pub type HostId = usize;

#[derive(Debug, Default)]
pub struct Network {
    hosts: Vec<Host>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open every profile against `store` and register the hosts in order.
    pub fn from_profiles(
        profiles: &[HostProfile],
        store: Arc<dyn FilesystemStore>,
        commands: &[&str],
    ) -> Result<Self, ShellError> {
        let mut network = Self::new();
        for profile in profiles {
            let host = Host::open(profile.clone(), Arc::clone(&store), commands.iter().copied())?;
            network.register(host)?;
        }
        Ok(network)
    }

    /// Add a host. Names and IPs must be unique.
    pub fn register(&mut self, host: Host) -> Result<HostId, ShellError> {
        if self.find_by_ip(host.ip()).is_some() {
            return Err(ShellError::Config(format!(
                "duplicate host address {}",
                host.ip()
            )));
        }
        if self.hosts.iter().any(|h| h.name() == host.name()) {
            return Err(ShellError::Config(format!(
                "duplicate host name {}",
                host.name()
            )));
        }
        tracing::debug!(name = %host.name(), ip = %host.ip(), "registered host");
        self.hosts.push(host);
        Ok(self.hosts.len() - 1)
    }

    pub fn find_by_ip(&self, ip: &str) -> Option<HostId> {
        self.hosts.iter().position(|h| h.ip() == ip)
    }

    pub fn find_by_name(&self, name: &str) -> Option<HostId> {
        self.hosts.iter().position(|h| h.name() == name)
    }

    /// The player's host: the first one registered.
    pub fn player(&self) -> Option<HostId> {
        if self.hosts.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    pub fn host(&self, id: HostId) -> &Host {
        &self.hosts[id]
    }

    pub fn host_mut(&mut self, id: HostId) -> &mut Host {
        &mut self.hosts[id]
    }

    pub fn get(&self, id: HostId) -> Option<&Host> {
        self.hosts.get(id)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
