//! Protocol engine: builder, command correlation and polling.
//!
//! The [`UbloxBuilder`] provides a fluent API for configuring the engine.
//! The [`Ublox`] engine then:
//! 1. Encodes and writes a request frame
//! 2. Drains the transport through the frame decoder
//! 3. Resolves the request to an outcome once an answer, a rejection or
//!    the timeout arrives
//!
//! Everything runs on the calling thread; waits block for at most the
//! supplied duration.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ubxwire::protocol::{build_frame, MessageId, Packet};
//! use ubxwire::transport::MockTransport;
//! use ubxwire::{Status, Ublox};
//!
//! let mut mock = MockTransport::new();
//! mock.reply_with(build_frame(MessageId::CFG_RATE, &[0xE8, 0x03, 0x01, 0x00, 0x01, 0x00]));
//!
//! let mut gnss = Ublox::builder().build(mock);
//! let mut poll = Packet::new(MessageId::CFG_RATE);
//! let status = gnss.send_command(&mut poll, Duration::from_millis(100), false);
//!
//! assert_eq!(status, Status::DataReceived);
//! assert_eq!(&gnss.response().payload()[..2], &[0xE8, 0x03]);
//! ```

mod nav;
mod values;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::Status;
use crate::lock::{BusLock, LockGuard, NoopLock};
use crate::nav::NavPvt;
use crate::protocol::{ack_outcome, data_outcome, FrameParser, Packet, ACK_PAYLOAD_SIZE};
use crate::settings::EngineConfig;
use crate::transport::{BusKind, Transport};

/// Builder for configuring and creating a [`Ublox`] engine.
pub struct UbloxBuilder {
    config: EngineConfig,
    lock: Arc<dyn BusLock>,
}

impl UbloxBuilder {
    /// Create a builder with default configuration and a no-op lock.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            lock: Arc::new(NoopLock),
        }
    }

    /// Replace the whole configuration.
    ///
    /// The configuration is not checked here; use [`UbloxBuilder::try_build`]
    /// to reject values the engine cannot work with.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the wait used when callers pass [`Ublox::default_max_wait`].
    ///
    /// Default: 1100 ms
    pub fn max_wait(mut self, wait: Duration) -> Self {
        self.config.max_wait_ms = wait.as_millis().max(1) as u64;
        self
    }

    /// Set the pause between transport polls while waiting.
    ///
    /// Default: 500 µs
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_us = interval.as_micros() as u64;
        self
    }

    /// Set the largest declared payload the decoder will buffer.
    ///
    /// Default: 1024 bytes. Values below the 2-byte ACK payload are raised to it.
    pub fn max_payload_size(mut self, size: u16) -> Self {
        self.config.max_payload_size = size.max(ACK_PAYLOAD_SIZE);
        self
    }

    /// Install a bus lock shared with other users of the bus.
    pub fn lock(mut self, lock: Arc<dyn BusLock>) -> Self {
        self.lock = lock;
        self
    }

    /// Validate the configuration, then build the engine on top of `transport`.
    pub fn try_build<T: Transport>(self, transport: T) -> crate::Result<Ublox<T>> {
        self.config.validate()?;
        Ok(self.build(transport))
    }

    /// Build the engine on top of `transport` without validating the configuration.
    pub fn build<T: Transport>(self, transport: T) -> Ublox<T> {
        Ublox {
            transport,
            parser: FrameParser::with_max_payload(self.config.max_payload_size),
            polling_wait: self.config.polling_wait(),
            config: self.config,
            lock: self.lock,
            last_check: None,
            pvt: None,
            pvt_fresh: PvtFresh::default(),
        }
    }
}

impl Default for UbloxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Which cached NAV-PVT fields have not been read since the last decode.
#[derive(Debug, Default, Clone, Copy)]
struct PvtFresh {
    lat: bool,
    lon: bool,
}

/// UBX protocol engine over a [`Transport`].
pub struct Ublox<T> {
    transport: T,
    parser: FrameParser,
    config: EngineConfig,
    lock: Arc<dyn BusLock>,
    /// Current minimum spacing of idle I2C polls.
    polling_wait: Duration,
    last_check: Option<Instant>,
    pvt: Option<NavPvt>,
    pvt_fresh: PvtFresh,
}

impl Ublox<()> {
    /// Create a new engine builder.
    pub fn builder() -> UbloxBuilder {
        UbloxBuilder::new()
    }
}

impl<T: Transport> Ublox<T> {
    /// Create an engine with default configuration.
    pub fn new(transport: T) -> Self {
        UbloxBuilder::new().build(transport)
    }

    /// Configured default wait.
    #[inline]
    pub fn default_max_wait(&self) -> Duration {
        self.config.max_wait()
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current idle polling spacing.
    #[inline]
    pub fn polling_wait(&self) -> Duration {
        self.polling_wait
    }

    /// Response / scratch buffer holding the last command answer.
    #[inline]
    pub fn response(&self) -> &Packet {
        self.parser.response()
    }

    /// Last ACK-class frame.
    #[inline]
    pub fn ack(&self) -> &Packet {
        self.parser.ack()
    }

    /// Borrow the transport.
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Unwrap into the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send `request` and wait up to `max_wait` for its answer.
    ///
    /// With `expect_ack_only` the engine only watches for ACK/NAK and
    /// resolves to `DataSent`; otherwise it waits for a frame with the same
    /// class/id and resolves to `DataReceived`, leaving the frame in
    /// [`Ublox::response`].
    pub fn send_command(
        &mut self,
        request: &mut Packet,
        max_wait: Duration,
        expect_ack_only: bool,
    ) -> Status {
        let Some(_guard) = LockGuard::acquire(self.lock.clone()) else {
            tracing::warn!("Could not take bus lock for {}", request.message_id());
            return Status::Fail;
        };
        self.send_command_locked(request, max_wait, expect_ack_only)
    }

    fn send_command_locked(
        &mut self,
        request: &mut Packet,
        max_wait: Duration,
        expect_ack_only: bool,
    ) -> Status {
        let msg = request.message_id();
        let bytes = request.encode();
        self.parser.begin_request(msg, request.starting_spot);

        tracing::debug!(
            "Sending {} with {} payload bytes (ack only: {})",
            msg,
            request.len,
            expect_ack_only
        );
        let status = match self.transport.write_bytes(&bytes) {
            Ok(()) => self.wait_for_answer(max_wait, expect_ack_only),
            Err(e) => {
                tracing::warn!("Write of {} failed: {}", msg, e);
                e.status(self.transport.bus())
            }
        };

        self.parser.end_request();
        tracing::debug!("Command {} finished: {}", msg, status);
        status
    }

    /// Poll until the outstanding request resolves or `max_wait` elapses.
    fn wait_for_answer(&mut self, max_wait: Duration, expect_ack_only: bool) -> Status {
        let start = Instant::now();
        let interval = self.config.poll_interval();

        loop {
            if let Err(status) = self.drain() {
                return status;
            }

            let flags = self.parser.flags();
            let outcome = if expect_ack_only {
                ack_outcome(&flags)
            } else {
                data_outcome(&flags)
            };
            if let Some(status) = outcome {
                return status;
            }

            let elapsed = start.elapsed();
            if elapsed >= max_wait {
                return Status::Timeout;
            }
            let pause = interval.min(max_wait - elapsed);
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }

    /// Feed every available byte, up to the per-poll cap, through the decoder.
    fn drain(&mut self) -> Result<usize, Status> {
        let bus = self.transport.bus();
        let limit = self.config.max_bytes_per_poll;
        let mut consumed = 0;

        while consumed < limit {
            let available = self.transport.bytes_available().map_err(|e| {
                tracing::warn!("Polling {} transport failed: {}", bus, e);
                e.status(bus)
            })?;
            if available == 0 {
                break;
            }
            for _ in 0..available.min(limit - consumed) {
                let byte = self.transport.read_byte().map_err(|e| {
                    tracing::warn!("Reading {} transport failed: {}", bus, e);
                    e.status(bus)
                })?;
                self.parser.feed(byte);
                consumed += 1;
            }
        }
        Ok(consumed)
    }

    /// Idle poll: process whatever the receiver sent outside of a command.
    ///
    /// On I2C, calls closer together than the polling wait return
    /// `Success` without touching the bus.
    pub fn check_ublox(&mut self) -> Status {
        if self.transport.bus() == BusKind::I2c {
            if let Some(last) = self.last_check {
                if last.elapsed() < self.polling_wait {
                    return Status::Success;
                }
            }
        }

        let Some(_guard) = LockGuard::acquire(self.lock.clone()) else {
            return Status::Fail;
        };
        self.last_check = Some(Instant::now());
        match self.drain() {
            Ok(consumed) => {
                if consumed > 0 {
                    tracing::trace!("Idle poll consumed {} bytes", consumed);
                }
                Status::Success
            }
            Err(status) => status,
        }
    }

    /// Adjust idle polling to a quarter of a `period`, within configured bounds.
    pub(crate) fn retune_polling(&mut self, period: Duration) {
        let floor = Duration::from_millis(1);
        let ceiling = self.config.polling_wait().max(floor);
        self.polling_wait = (period / 4).clamp(floor, ceiling);
    }
}
