//! Navigation solution operations.

use std::time::Duration;

use super::{PvtFresh, Ublox};
use crate::config::{
    Layer, CFG_MSGOUT_UBX_NAV_PVT_I2C, CFG_MSGOUT_UBX_NAV_PVT_SPI, CFG_MSGOUT_UBX_NAV_PVT_UART1,
};
use crate::error::Status;
use crate::nav::NavPvt;
use crate::protocol::{MessageId, Packet};
use crate::transport::{BusKind, Transport};

impl<T: Transport> Ublox<T> {
    /// Enable or disable periodic NAV-PVT output on the active bus.
    ///
    /// When enabled, NAV-PVT frames are captured in their own buffer and
    /// [`Ublox::get_pvt`] stops blocking.
    pub fn set_auto_pvt(&mut self, enabled: bool, layer: Layer, max_wait: Duration) -> bool {
        let key = match self.transport.bus() {
            BusKind::I2c => CFG_MSGOUT_UBX_NAV_PVT_I2C,
            BusKind::Serial => CFG_MSGOUT_UBX_NAV_PVT_UART1,
            BusKind::Spi => CFG_MSGOUT_UBX_NAV_PVT_SPI,
        };
        let ok = self.set_val8(key, u8::from(enabled), layer, max_wait);
        if ok {
            if enabled {
                self.parser.register_auto(MessageId::NAV_PVT);
            } else {
                self.parser.unregister_auto(MessageId::NAV_PVT);
            }
        }
        ok
    }

    /// Check if NAV-PVT is captured automatically.
    #[inline]
    pub fn auto_pvt(&self) -> bool {
        self.parser.is_auto(MessageId::NAV_PVT)
    }

    /// Fetch a new navigation solution.
    ///
    /// With automatic NAV-PVT this never blocks: it drains the transport
    /// and reports whether a new solution arrived. Otherwise it polls
    /// NAV-PVT and waits up to `max_wait`.
    pub fn get_pvt(&mut self, max_wait: Duration) -> bool {
        if self.auto_pvt() {
            if !self.check_ublox().is_success() {
                return false;
            }
            let decoded = self
                .parser
                .take_auto(MessageId::NAV_PVT)
                .and_then(|packet| NavPvt::from_payload(packet.payload()));
            return self.store_pvt(decoded);
        }

        let mut poll = Packet::new(MessageId::NAV_PVT);
        let status = self.send_command(&mut poll, max_wait, false);
        if status != Status::DataReceived {
            tracing::debug!("NAV-PVT poll failed: {}", status);
            return false;
        }
        let response = self.parser.response();
        let decoded = if response.is_trusted() {
            NavPvt::from_payload(response.payload())
        } else {
            None
        };
        self.store_pvt(decoded)
    }

    fn store_pvt(&mut self, decoded: Option<NavPvt>) -> bool {
        match decoded {
            Some(pvt) => {
                self.pvt = Some(pvt);
                self.pvt_fresh = PvtFresh { lat: true, lon: true };
                true
            }
            None => false,
        }
    }

    /// Last decoded navigation solution.
    #[inline]
    pub fn pvt(&self) -> Option<&NavPvt> {
        self.pvt.as_ref()
    }

    /// Latitude in degrees * 1e-7.
    ///
    /// Fetches a new solution if the cached latitude was already read.
    pub fn latitude(&mut self, max_wait: Duration) -> Option<i32> {
        if !self.pvt_fresh.lat {
            self.get_pvt(max_wait);
        }
        self.pvt_fresh.lat = false;
        self.pvt.map(|pvt| pvt.lat)
    }

    /// Longitude in degrees * 1e-7.
    ///
    /// Fetches a new solution if the cached longitude was already read.
    pub fn longitude(&mut self, max_wait: Duration) -> Option<i32> {
        if !self.pvt_fresh.lon {
            self.get_pvt(max_wait);
        }
        self.pvt_fresh.lon = false;
        self.pvt.map(|pvt| pvt.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::tests::sample_payload;
    use crate::protocol::build_frame;
    use crate::transport::MockTransport;

    const WAIT: Duration = Duration::from_millis(50);

    fn engine(mock: MockTransport) -> Ublox<MockTransport> {
        Ublox::builder()
            .poll_interval(Duration::from_micros(100))
            .build(mock)
    }

    #[test]
    fn test_polled_pvt() {
        let mut mock = MockTransport::new();
        mock.reply_with(build_frame(MessageId::NAV_PVT, &sample_payload(100, 200)));
        let mut gnss = engine(mock);

        assert!(gnss.get_pvt(WAIT));
        assert_eq!(gnss.pvt().unwrap().num_sv, 17);
        assert_eq!(gnss.latitude(WAIT), Some(100));
        assert_eq!(gnss.longitude(WAIT), Some(200));
        // Exactly one poll so far: both fields came from the same solution.
        assert_eq!(gnss.transport().writes().len(), 1);
    }

    #[test]
    fn test_latitude_polls_again_once_read() {
        let mut mock = MockTransport::new();
        mock.reply_with(build_frame(MessageId::NAV_PVT, &sample_payload(1, 1)));
        mock.reply_with(build_frame(MessageId::NAV_PVT, &sample_payload(2, 2)));
        let mut gnss = engine(mock);

        assert_eq!(gnss.latitude(WAIT), Some(1));
        assert_eq!(gnss.latitude(WAIT), Some(2));
        assert_eq!(gnss.transport().writes().len(), 2);
    }

    #[test]
    fn test_short_pvt_is_rejected() {
        let mut mock = MockTransport::new();
        mock.reply_with(build_frame(MessageId::NAV_PVT, &[0u8; 20]));
        let mut gnss = engine(mock);

        assert!(!gnss.get_pvt(WAIT));
        assert!(gnss.pvt().is_none());
    }

    #[test]
    fn test_auto_pvt_on_i2c() {
        let mut mock = MockTransport::with_bus(BusKind::I2c);
        mock.reply_with(build_frame(MessageId::ACK_ACK, &[0x06, 0x8A]));
        let mut gnss = engine(mock);

        assert!(gnss.set_auto_pvt(true, Layer::RAM, WAIT));
        assert!(gnss.auto_pvt());

        // The MSGOUT key for I2C went out with rate 1.
        let frame = &gnss.transport().writes()[0];
        assert_eq!(&frame[10..14], &0x2091_0006u32.to_le_bytes());
        assert_eq!(frame[14], 1);

        gnss.transport_mut()
            .push_incoming(&build_frame(MessageId::NAV_PVT, &sample_payload(5, 6)));
        assert!(gnss.get_pvt(WAIT));
        assert_eq!(gnss.pvt().unwrap().lon, 6);
        // No poll was sent for the automatic solution.
        assert_eq!(gnss.transport().writes().len(), 1);
    }

    #[test]
    fn test_auto_pvt_without_new_data() {
        let mut mock = MockTransport::new();
        mock.reply_with(build_frame(MessageId::ACK_ACK, &[0x06, 0x8A]));
        let mut gnss = engine(mock);
        assert!(gnss.set_auto_pvt(true, Layer::RAM, WAIT));

        let start = std::time::Instant::now();
        assert!(!gnss.get_pvt(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_disable_auto_pvt() {
        let mut mock = MockTransport::new();
        mock.reply_with(build_frame(MessageId::ACK_ACK, &[0x06, 0x8A]));
        mock.reply_with(build_frame(MessageId::ACK_ACK, &[0x06, 0x8A]));
        let mut gnss = engine(mock);

        assert!(gnss.set_auto_pvt(true, Layer::RAM, WAIT));
        assert!(gnss.set_auto_pvt(false, Layer::RAM, WAIT));
        assert!(!gnss.auto_pvt());
        assert_eq!(gnss.transport().writes()[1][14], 0);
    }
}
