// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One vacuum session: transport, decoded state, health and background tasks.
//!
//! # Lifecycle
//!
//! 1. [`VacuumSession::open`] builds the transport and resolves the model's
//!    code table, capabilities and fan speeds. An unsupported model or a
//!    missing address leaves the session permanently unavailable.
//! 2. [`VacuumSession::start`] spawns the warm-up and polling task and the
//!    push listener.
//! 3. Commands encode, write, and then trigger one forced refresh.
//! 4. [`VacuumSession::shutdown`] stops the tasks and disables the transport.
//!
//! Every refresh and push decode runs under one per-session lock, so polled,
//! forced and pushed updates never interleave.
//!
//! # Examples
//!
//! ```no_run
//! use robovac_lib::protocol::Transport;
//! use robovac_lib::session::{SessionConfig, VacuumSession};
//!
//! async fn run<T: Transport>(transport: T) -> robovac_lib::Result<()> {
//!     let config = SessionConfig::new("bf7a2c0e51d4c9e2a1xq", "T2267", "f1e2d3c4b5a69788")
//!         .with_host("192.168.1.40");
//!
//!     let session = VacuumSession::connect(config, |_| Ok(transport))?;
//!     let mut states = session.watch_state();
//!
//!     session.start_cleaning().await?;
//!     states.changed().await.ok();
//!     println!("{}", session.activity());
//!
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;

pub use config::SessionConfig;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::attributes;
use crate::capabilities::Capabilities;
use crate::command::{CommandEncoder, VacuumCommand};
use crate::error::{DeviceError, Error, ProtocolError};
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::protocol::{RawSnapshot, Transport};
use crate::scheduler::{ConnectionHealth, FailureClass, RefreshPolicy};
use crate::state::{Activity, Decoder, DeviceState, Status};
use crate::types::FanSpeedTable;

/// Handle to one vacuum session.
///
/// Cloning is cheap; clones share the same session.
pub struct VacuumSession<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for VacuumSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> std::fmt::Debug for VacuumSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VacuumSession")
            .field("device_id", &self.inner.config.device_id)
            .field("health", &*self.inner.health.read())
            .finish_non_exhaustive()
    }
}

/// Everything resolved from the transport at construction.
struct Link<T> {
    transport: T,
    capabilities: Capabilities,
    decoder: Decoder,
    encoder: CommandEncoder,
}

struct Inner<T> {
    config: SessionConfig,
    link: Option<Link<T>>,
    permanent: Option<FailureClass>,
    state: RwLock<DeviceState>,
    health: RwLock<ConnectionHealth>,
    refresh_gate: tokio::sync::Mutex<()>,
    state_tx: watch::Sender<DeviceState>,
    events: EventBus,
    closed: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: Transport> VacuumSession<T> {
    // ========== Construction ==========

    /// Opens a session.
    ///
    /// `open_transport` builds the transport for the configuration. If it
    /// fails with [`DeviceError::UnsupportedModel`] or
    /// [`DeviceError::MissingAddress`], or if no host is configured, the
    /// session is created permanently unavailable: it never polls and rejects
    /// every command with [`Error::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns any other error `open_transport` reports.
    pub fn open<F>(config: SessionConfig, open_transport: F) -> Result<Self, Error>
    where
        F: FnOnce(&SessionConfig) -> Result<T, Error>,
    {
        let device_id = config.device_id.clone();

        let (link, permanent) = match open_transport(&config) {
            Ok(transport) => {
                let link = Self::resolve_link(&config, transport);
                let missing = (!config.has_host()).then_some(FailureClass::MissingAddress);
                (Some(link), missing)
            }
            Err(Error::Device(DeviceError::UnsupportedModel(model))) => {
                tracing::warn!(%device_id, %model, "Model is not supported");
                (None, Some(FailureClass::UnsupportedModel))
            }
            Err(Error::Device(DeviceError::MissingAddress)) => {
                (None, Some(FailureClass::MissingAddress))
            }
            Err(e) => return Err(e),
        };

        if permanent == Some(FailureClass::MissingAddress) {
            tracing::warn!(%device_id, "No network address configured");
        }

        let health = permanent.map_or_else(ConnectionHealth::new, ConnectionHealth::permanent);
        let (state_tx, _) = watch::channel(DeviceState::new());

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                link,
                permanent,
                state: RwLock::new(DeviceState::new()),
                health: RwLock::new(health),
                refresh_gate: tokio::sync::Mutex::new(()),
                state_tx,
                events: EventBus::new(),
                closed: AtomicBool::new(false),
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Opens a session and starts its background tasks.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn connect<F>(config: SessionConfig, open_transport: F) -> Result<Self, Error>
    where
        F: FnOnce(&SessionConfig) -> Result<T, Error>,
    {
        let session = Self::open(config, open_transport)?;
        session.start();
        Ok(session)
    }

    fn resolve_link(config: &SessionConfig, transport: T) -> Link<T> {
        let codes = transport.command_codes();
        let capabilities = Capabilities::resolve(
            transport.platform_features(),
            transport.capability_features(),
        );
        let fan_speeds = FanSpeedTable::from_wire(transport.fan_speeds());

        tracing::debug!(
            device_id = %config.device_id,
            model = config.model(),
            platform = ?capabilities.platform(),
            features = ?capabilities.features(),
            "Resolved model capabilities"
        );

        Link {
            decoder: Decoder::new(
                codes.clone(),
                capabilities.features(),
                Arc::clone(&config.tables),
            ),
            encoder: CommandEncoder::new(codes, capabilities, fan_speeds),
            capabilities,
            transport,
        }
    }

    /// Spawns the warm-up/poll task and the push listener.
    ///
    /// Does nothing for a permanently unavailable, already started, or shut
    /// down session. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let Ok(link) = self.inner.link() else {
            tracing::debug!(
                device_id = %self.inner.config.device_id,
                "Not polling unavailable device"
            );
            return;
        };

        let mut tasks = self.inner.tasks.lock();
        if !tasks.is_empty() || self.inner.is_closed() {
            return;
        }

        let (push_tx, push_rx) = mpsc::unbounded_channel();
        link.transport.set_push_handler(Arc::new(move || {
            // The listener is gone once the session shuts down
            let _ = push_tx.send(());
        }));

        let weak = Arc::downgrade(&self.inner);
        tasks.push(tokio::spawn(run_push_listener(weak.clone(), push_rx)));
        tasks.push(tokio::spawn(run_scheduler(
            weak,
            self.inner.config.policy.clone(),
        )));
    }

    // ========== State Access ==========

    /// Returns the device ID.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.inner.config.device_id
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Returns the current decoded state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.inner.state.read().clone()
    }

    /// Returns the activity derived from the current state.
    #[must_use]
    pub fn activity(&self) -> Activity {
        self.inner.state.read().activity()
    }

    /// Returns the battery percentage, for a companion battery sensor.
    #[must_use]
    pub fn battery_level(&self) -> Option<u8> {
        self.inner.state.read().battery_level()
    }

    /// Returns the connection health.
    #[must_use]
    pub fn health(&self) -> ConnectionHealth {
        self.inner.health.read().clone()
    }

    /// Returns `true` unless the session is unavailable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.health.read().is_available()
    }

    /// Returns the model's capabilities; empty for an unsupported model.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.inner
            .link
            .as_ref()
            .map(|link| link.capabilities)
            .unwrap_or_default()
    }

    /// Returns the fan speed display labels in model order.
    #[must_use]
    pub fn fan_speed_list(&self) -> Vec<String> {
        self.inner
            .link
            .as_ref()
            .map(|link| {
                link.encoder
                    .fan_speeds()
                    .labels()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the extra attributes the host shows for the current state.
    #[must_use]
    pub fn extra_state_attributes(&self) -> BTreeMap<&'static str, serde_json::Value> {
        attributes::project(
            &self.inner.state.read(),
            self.capabilities().features(),
            &self.inner.config.tables,
        )
    }

    /// Returns a receiver that always holds the latest state.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<DeviceState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribes to state and availability events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.inner.events.subscribe()
    }

    // ========== Refresh ==========

    /// Polls the device and publishes the decoded state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` for a permanently unavailable session,
    /// or the transport error of a failed poll (already counted in the
    /// connection health).
    pub async fn refresh(&self) -> Result<(), Error> {
        self.inner.refresh().await
    }

    /// Decodes the transport's latest data after a push.
    ///
    /// Connection health is left untouched.
    pub async fn on_push(&self) {
        self.inner.on_push().await;
    }

    // ========== Commands ==========

    /// Starts automatic cleaning.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn start_cleaning(&self) -> Result<(), Error> {
        self.execute(VacuumCommand::Start).await
    }

    /// Pauses the current run.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn pause(&self) -> Result<(), Error> {
        self.execute(VacuumCommand::Pause).await
    }

    /// Stops the current run.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn stop(&self) -> Result<(), Error> {
        self.execute(VacuumCommand::Stop).await
    }

    /// Sends the vacuum back to its dock.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn return_to_base(&self) -> Result<(), Error> {
        self.execute(VacuumCommand::ReturnToBase).await
    }

    /// Toggles the locate beep.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn locate(&self) -> Result<(), Error> {
        self.execute(VacuumCommand::Locate).await
    }

    /// Cleans around the current spot.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn clean_spot(&self) -> Result<(), Error> {
        self.execute(VacuumCommand::SpotClean).await
    }

    /// Selects a fan speed by display label.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn set_fan_speed(&self, label: &str) -> Result<(), Error> {
        self.execute(VacuumCommand::SetFanSpeed(label.to_string()))
            .await
    }

    /// Sends a named host command.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for malformed parameters, otherwise see
    /// [`execute`](Self::execute).
    pub async fn send_command(&self, name: &str, params: &serde_json::Value) -> Result<(), Error> {
        let command = VacuumCommand::from_name(name, params)?;
        self.execute(command).await
    }

    /// Encodes and sends a command, then schedules one forced refresh.
    ///
    /// Failed writes are logged and not returned: the forced refresh brings
    /// the state back in line with the device.
    ///
    /// # Errors
    ///
    /// - `Error::Unavailable` for a permanently unavailable session
    /// - `Error::Protocol` after [`shutdown`](Self::shutdown)
    /// - any encoding error from [`CommandEncoder::encode`]
    pub async fn execute(&self, command: VacuumCommand) -> Result<(), Error> {
        let link = self.inner.link()?;
        if self.inner.is_closed() {
            return Err(ProtocolError::Disabled.into());
        }

        let device_id = &self.inner.config.device_id;
        let writes = link.encoder.encode(&command, &self.state())?;
        tracing::info!(
            %device_id,
            command = command.name(),
            writes = writes.len(),
            "Sending command"
        );

        for write in writes {
            let key = write.key.clone();
            if let Err(e) = link.transport.set(write.into_snapshot()).await {
                tracing::warn!(%device_id, %key, error = %e, "Failed to write data point");
            }
        }

        self.spawn_forced_refresh();
        Ok(())
    }

    fn spawn_forced_refresh(&self) {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            if let Some(inner) = weak.upgrade() {
                // Failures are already counted in the connection health
                let _ = inner.refresh().await;
            }
        });
    }

    // ========== Teardown ==========

    /// Stops background tasks and disables the transport.
    ///
    /// Waits for a refresh that is already running; refreshes that have not
    /// started yet are skipped. Calling it more than once is harmless.
    pub async fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let tasks: Vec<_> = self.inner.tasks.lock().drain(..).collect();
        for task in tasks {
            task.abort();
        }

        let _gate = self.inner.refresh_gate.lock().await;
        if let Some(link) = &self.inner.link {
            link.transport.disable().await;
        }
        tracing::debug!(device_id = %self.inner.config.device_id, "Session shut down");
    }
}

impl<T: Transport> Inner<T> {
    fn link(&self) -> Result<&Link<T>, Error> {
        match (&self.link, self.permanent) {
            (Some(link), None) => Ok(link),
            (_, failure) => Err(Error::Unavailable(
                failure.unwrap_or(FailureClass::UnsupportedModel),
            )),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn refresh(&self) -> Result<(), Error> {
        let link = self.link()?;
        let _gate = self.refresh_gate.lock().await;
        if self.is_closed() {
            return Err(ProtocolError::Disabled.into());
        }

        match link.transport.get().await {
            Ok(raw) => {
                self.publish(link, &raw);
                self.update_health(ConnectionHealth::record_success);
                Ok(())
            }
            Err(e) => {
                let threshold = self.config.policy.failure_threshold;
                self.update_health(|health| health.record_failure(threshold));
                tracing::warn!(
                    device_id = %self.config.device_id,
                    failures = self.health.read().consecutive_failures(),
                    error = %e,
                    "Refresh failed"
                );
                Err(e.into())
            }
        }
    }

    async fn on_push(&self) {
        let Ok(link) = self.link() else {
            return;
        };
        let _gate = self.refresh_gate.lock().await;
        if self.is_closed() {
            return;
        }

        tracing::debug!(device_id = %self.config.device_id, "Decoding pushed update");
        let raw = link.transport.latest();
        self.publish(link, &raw);
    }

    /// Decodes a snapshot, swaps the state and notifies watchers.
    fn publish(&self, link: &Link<T>, raw: &RawSnapshot) {
        let next = {
            let mut state = self.state.write();
            let next = link.decoder.decode(raw, &state);
            state.clone_from(&next);
            next
        };

        tracing::debug!(
            device_id = %self.config.device_id,
            status = ?next.status().map(Status::label),
            activity = %next.activity(),
            battery = ?next.battery_level(),
            "Decoded state"
        );

        self.state_tx.send_replace(next.clone());
        self.events
            .publish(DeviceEvent::state_updated(self.config.device_id.clone(), next));
    }

    fn update_health(&self, update: impl FnOnce(&mut ConnectionHealth)) {
        let (was_available, health) = {
            let mut health = self.health.write();
            let was_available = health.is_available();
            update(&mut health);
            (was_available, health.clone())
        };

        if was_available == health.is_available() {
            return;
        }

        let device_id = self.config.device_id.clone();
        match health.failure() {
            Some(failure) if !health.is_available() => {
                tracing::warn!(%device_id, %failure, "Device unavailable");
                self.events
                    .publish(DeviceEvent::unavailable(device_id, failure));
            }
            _ => {
                tracing::info!(%device_id, "Device available again");
                self.events.publish(DeviceEvent::available(device_id));
            }
        }
    }
}

/// Warm-up followed by periodic polling.
async fn run_scheduler<T: Transport>(inner: Weak<Inner<T>>, policy: RefreshPolicy) {
    let mut attempt = 0;
    loop {
        let Some(session) = inner.upgrade() else {
            return;
        };
        let device_id = session.config.device_id.clone();

        match session.refresh().await {
            Ok(()) => {
                tracing::debug!(%device_id, attempt = attempt + 1, "Warm-up complete");
                break;
            }
            Err(e) => {
                tracing::debug!(
                    %device_id,
                    attempt = attempt + 1,
                    error = %e,
                    "Warm-up refresh failed"
                );
            }
        }

        attempt += 1;
        if !policy.should_retry_warmup(attempt) {
            session.update_health(ConnectionHealth::warmup_exhausted);
            break;
        }

        drop(session);
        tokio::time::sleep(policy.warmup_delay).await;
    }

    let mut interval = tokio::time::interval_at(
        Instant::now() + policy.refresh_interval,
        policy.refresh_interval,
    );
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(session) = inner.upgrade() else {
            return;
        };
        // Failures are counted in the connection health
        let _ = session.refresh().await;
    }
}

/// Drains push notifications from the transport.
async fn run_push_listener<T: Transport>(
    inner: Weak<Inner<T>>,
    mut push_rx: mpsc::UnboundedReceiver<()>,
) {
    while push_rx.recv().await.is_some() {
        // Coalesce a burst of pushes into one decode
        while push_rx.try_recv().is_ok() {}

        let Some(session) = inner.upgrade() else {
            return;
        };
        session.on_push().await;
    }
}
