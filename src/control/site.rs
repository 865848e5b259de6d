//! Site identity and channel-plan lookup tables.
//!
//! [`SiteData`] is immutable per-site identity established at startup; [`IdentityTable`]
//! maps channel IDs to the RF parameters (base frequency, spacing, bandwidth, transmit
//! offset) needed to turn a channel number into an actual frequency.

use std::collections::HashMap;

/// Immutable per-site identity, set once at startup and never mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SiteData {
    pub network_id: u32,
    pub system_id: u16,
    pub rfss_id: u8,
    pub site_id: u8,
    pub channel_id: u8,
    pub channel_number: u16,
    pub service_class: u8,
    pub callsign: String,
}

/// Live, mutable counterpart to [`SiteData`]'s fixed identity: the figures that change
/// call-to-call and get reported out in status broadcasts. Kept separate from
/// `SiteData` so that struct can stay an immutable, set-once identity.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SiteStatus {
    chan_cnt: u16,
}

impl SiteStatus {
    pub fn new() -> Self {
        SiteStatus::default()
    }

    /// Active-grant count currently reported to RFSS/NET status broadcasts.
    pub fn chan_cnt(&self) -> u16 {
        self.chan_cnt
    }

    /// Syncs the reported grant count to the live count from [`super::grant::GrantTable`].
    pub fn set_chan_cnt(&mut self, count: usize) {
        self.chan_cnt = count as u16;
    }
}

impl SiteData {
    pub fn new(
        network_id: u32,
        system_id: u16,
        rfss_id: u8,
        site_id: u8,
        channel_id: u8,
        channel_number: u16,
        service_class: u8,
        callsign: impl Into<String>,
    ) -> Self {
        SiteData {
            network_id,
            system_id,
            rfss_id,
            site_id,
            channel_id,
            channel_number,
            service_class,
            callsign: callsign.into(),
        }
    }
}

/// RF parameters for one channel ID, from which any channel number in that ID's plan
/// can derive an actual transmit/receive frequency.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IdentityEntry {
    /// Base frequency, in Hz.
    pub base_freq_hz: u64,
    /// Channel spacing, in kHz.
    pub channel_spacing_khz: f32,
    /// Channel bandwidth, in kHz.
    pub bandwidth_khz: f32,
    /// Transmit offset, in MHz (negative for a receiver below the transmitter).
    pub tx_offset_mhz: f32,
}

impl IdentityEntry {
    /// Resolves the actual transmit frequency for a channel number within this
    /// identity's plan.
    pub fn frequency_hz(&self, channel_number: u16) -> u64 {
        let spacing_hz = (self.channel_spacing_khz as f64) * 1000.0;
        self.base_freq_hz + (channel_number as f64 * spacing_hz) as u64
    }
}

/// Read-only (after load) channel-ID -> RF-parameters table.
#[derive(Clone, Debug, Default)]
pub struct IdentityTable {
    entries: HashMap<u8, IdentityEntry>,
}

impl IdentityTable {
    pub fn new() -> Self {
        IdentityTable { entries: HashMap::new() }
    }

    pub fn insert(&mut self, channel_id: u8, entry: IdentityEntry) {
        self.entries.insert(channel_id, entry);
    }

    pub fn get(&self, channel_id: u8) -> Option<&IdentityEntry> {
        self.entries.get(&channel_id)
    }

    /// Channel IDs in ascending order, the order `OSP_IDEN_UP` cycles through them.
    pub fn channel_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.entries.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}
