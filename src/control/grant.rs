//! Channel grant and affiliation bookkeeping for the control-channel engine.
//!
//! Two tables, deliberately kept separate: [`GrantTable`] tracks which destination
//! IDs currently hold a channel reservation, and [`AffiliationTable`] tracks which
//! source units have registered with the system and which talkgroups they've
//! affiliated to. The engine consults both on every TSBK it processes.

use std::collections::{HashMap, HashSet};

use crate::error::TrunkingError;

/// One active channel reservation.
struct Grant {
    channel: u16,
    source: u32,
    group: bool,
    net_originated: bool,
    remaining_ms: u32,
}

/// Default grant duration before `touchGrant` extends it, in milliseconds.
pub const GRANT_TIMER_MS: u32 = 15_000;

/// Tracks destination-ID -> channel grants. The set of granted destinations is always
/// a subset of the channels currently reserved in the caller's channel lookup; this
/// table doesn't own channel allocation, only which destination holds which one.
pub struct GrantTable {
    grants: HashMap<u32, Grant>,
}

impl GrantTable {
    pub fn new() -> Self {
        GrantTable { grants: HashMap::new() }
    }

    /// Grants `channel` to `dst` for `duration_ms`, sourced from `src`. `group`
    /// indicates a group (talkgroup) call versus a unit-to-unit call, and
    /// `net_originated` records whether the request came from the peer network rather
    /// than RF. Fails if `dst` already holds a different channel and isn't simply
    /// refreshing the same one.
    pub fn grant(
        &mut self,
        dst: u32,
        src: u32,
        duration_ms: u32,
        group: bool,
        net_originated: bool,
        channel: Option<u16>,
    ) -> Result<u16, TrunkingError> {
        if let Some(existing) = self.grants.get_mut(&dst) {
            existing.remaining_ms = duration_ms;
            existing.source = src;
            existing.net_originated = net_originated;
            return Ok(existing.channel);
        }

        let channel = channel.ok_or(TrunkingError::NoChannelAvailable)?;
        self.grants.insert(dst, Grant { channel, source: src, group, net_originated, remaining_ms: duration_ms });
        Ok(channel)
    }

    /// Resets the grant timer for `dst`, keeping its channel reservation alive.
    pub fn touch_grant(&mut self, dst: u32, duration_ms: u32) {
        if let Some(grant) = self.grants.get_mut(&dst) {
            grant.remaining_ms = duration_ms;
        }
    }

    /// Releases the grant for `dst`. If `all` is set, also releases any other grant
    /// sharing the same channel (used when a call ends and the channel is freed
    /// entirely, not just this destination's claim on it).
    pub fn release_grant(&mut self, dst: u32, all: bool) {
        let channel = self.grants.get(&dst).map(|g| g.channel);
        self.grants.remove(&dst);

        if all {
            if let Some(channel) = channel {
                self.grants.retain(|_, g| g.channel != channel);
            }
        }
    }

    pub fn is_granted(&self, dst: u32) -> bool {
        self.grants.contains_key(&dst)
    }

    pub fn granted_channel(&self, dst: u32) -> Option<u16> {
        self.grants.get(&dst).map(|g| g.channel)
    }

    pub fn granted_source(&self, dst: u32) -> Option<u32> {
        self.grants.get(&dst).map(|g| g.source)
    }

    /// Whether the active grant for `dst` was requested over the peer network rather
    /// than RF.
    pub fn is_net_originated(&self, dst: u32) -> bool {
        self.grants.get(&dst).map_or(false, |g| g.net_originated)
    }

    /// Count of currently active grants, reported to site status broadcasts.
    pub fn active_count(&self) -> usize {
        self.grants.len()
    }

    /// Destination/channel pairs of currently active group-voice grants, advertised in
    /// periodic group-voice update broadcasts so idle subscribers can follow ongoing
    /// calls without waiting to hear the original grant.
    pub fn active_group_channels(&self) -> Vec<(u32, u16)> {
        self.grants.iter()
            .filter(|(_, g)| g.group)
            .map(|(&dst, g)| (dst, g.channel))
            .collect()
    }

    /// Advances all grant timers by `elapsed_ms`, releasing any that expire. Returns
    /// the destinations whose grants were just released by expiry.
    pub fn tick(&mut self, elapsed_ms: u32) -> Vec<u32> {
        let mut expired = Vec::new();

        self.grants.retain(|&dst, grant| {
            if grant.remaining_ms <= elapsed_ms {
                expired.push(dst);
                false
            } else {
                grant.remaining_ms -= elapsed_ms;
                true
            }
        });

        expired
    }
}

impl Default for GrantTable {
    fn default() -> Self {
        GrantTable::new()
    }
}

/// Tracks unit registration and group affiliation independent of channel grants.
pub struct AffiliationTable {
    registered: HashSet<u32>,
    affiliations: HashMap<u32, HashSet<u32>>,
}

impl AffiliationTable {
    pub fn new() -> Self {
        AffiliationTable { registered: HashSet::new(), affiliations: HashMap::new() }
    }

    pub fn unit_reg(&mut self, src: u32) {
        self.registered.insert(src);
    }

    /// Deregisters `src`, clearing any group affiliations it held. Returns whether it
    /// was actually registered.
    pub fn unit_dereg(&mut self, src: u32) -> bool {
        for members in self.affiliations.values_mut() {
            members.remove(&src);
        }
        self.affiliations.retain(|_, members| !members.is_empty());

        self.registered.remove(&src)
    }

    pub fn is_unit_reg(&self, src: u32) -> bool {
        self.registered.contains(&src)
    }

    pub fn group_aff(&mut self, src: u32, dst: u32) {
        self.affiliations.entry(dst).or_default().insert(src);
    }

    pub fn is_group_aff(&self, src: u32, dst: u32) -> bool {
        self.affiliations.get(&dst).map_or(false, |m| m.contains(&src))
    }

    /// Clears affiliations to `dst`. If `all`, clears every group affiliation for
    /// every destination. Returns the sources that were removed, since the caller
    /// must emit a deregistration acknowledgement for each.
    pub fn clear_group_aff(&mut self, dst: u32, all: bool) -> Vec<u32> {
        if all {
            let mut removed: Vec<u32> = self.affiliations.values().flatten().cloned().collect();
            removed.sort_unstable();
            removed.dedup();
            self.affiliations.clear();
            removed
        } else {
            self.affiliations.remove(&dst).map(|m| m.into_iter().collect()).unwrap_or_default()
        }
    }
}

impl Default for AffiliationTable {
    fn default() -> Self {
        AffiliationTable::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grant_without_channel_fails() {
        let mut table = GrantTable::new();
        let err = table.grant(100, 1, GRANT_TIMER_MS, true, false, None).unwrap_err();
        assert_eq!(err, TrunkingError::NoChannelAvailable);
    }

    #[test]
    fn test_grant_and_lookup() {
        let mut table = GrantTable::new();
        let channel = table.grant(100, 1, GRANT_TIMER_MS, true, false, Some(5)).unwrap();

        assert_eq!(channel, 5);
        assert!(table.is_granted(100));
        assert_eq!(table.granted_channel(100), Some(5));
        assert_eq!(table.granted_source(100), Some(1));
        assert_eq!(table.active_count(), 1);
    }

    #[test]
    fn test_regrant_same_dst_keeps_channel() {
        let mut table = GrantTable::new();
        table.grant(100, 1, GRANT_TIMER_MS, true, false, Some(5)).unwrap();
        let channel = table.grant(100, 2, GRANT_TIMER_MS, true, false, None).unwrap();

        assert_eq!(channel, 5);
        assert_eq!(table.granted_source(100), Some(2));
    }

    #[test]
    fn test_release_grant() {
        let mut table = GrantTable::new();
        table.grant(100, 1, GRANT_TIMER_MS, true, false, Some(5)).unwrap();
        table.release_grant(100, false);

        assert!(!table.is_granted(100));
    }

    #[test]
    fn test_release_all_frees_shared_channel() {
        let mut table = GrantTable::new();
        table.grant(100, 1, GRANT_TIMER_MS, true, false, Some(5)).unwrap();
        table.grant(200, 1, GRANT_TIMER_MS, true, false, Some(5)).unwrap();

        table.release_grant(100, true);
        assert!(!table.is_granted(200));
    }

    #[test]
    fn test_grant_expires_on_tick() {
        let mut table = GrantTable::new();
        table.grant(100, 1, 1000, true, false, Some(5)).unwrap();

        assert!(table.tick(999).is_empty());
        assert_eq!(table.tick(1), vec![100]);
        assert!(!table.is_granted(100));
    }

    #[test]
    fn test_touch_grant_extends_timer() {
        let mut table = GrantTable::new();
        table.grant(100, 1, 1000, true, false, Some(5)).unwrap();
        table.tick(999);
        table.touch_grant(100, 1000);

        assert!(table.tick(999).is_empty());
        assert!(table.is_granted(100));
    }

    #[test]
    fn test_net_originated_flag_is_tracked_and_updated_on_regrant() {
        let mut table = GrantTable::new();
        table.grant(100, 1, GRANT_TIMER_MS, true, true, Some(5)).unwrap();
        assert!(table.is_net_originated(100));

        table.grant(100, 2, GRANT_TIMER_MS, true, false, None).unwrap();
        assert!(!table.is_net_originated(100));
    }

    #[test]
    fn test_active_group_channels_excludes_unit_calls() {
        let mut table = GrantTable::new();
        table.grant(100, 1, GRANT_TIMER_MS, true, false, Some(5)).unwrap();
        table.grant(200, 2, GRANT_TIMER_MS, false, false, Some(6)).unwrap();

        let active = table.active_group_channels();
        assert_eq!(active, vec![(100, 5)]);
    }

    #[test]
    fn test_unit_reg_and_dereg() {
        let mut affs = AffiliationTable::new();
        affs.unit_reg(1);
        assert!(affs.is_unit_reg(1));

        assert!(affs.unit_dereg(1));
        assert!(!affs.is_unit_reg(1));
        assert!(!affs.unit_dereg(1));
    }

    #[test]
    fn test_group_affiliation() {
        let mut affs = AffiliationTable::new();
        affs.group_aff(1, 100);
        assert!(affs.is_group_aff(1, 100));
        assert!(!affs.is_group_aff(2, 100));
    }

    #[test]
    fn test_dereg_clears_affiliations() {
        let mut affs = AffiliationTable::new();
        affs.group_aff(1, 100);
        affs.unit_dereg(1);

        assert!(!affs.is_group_aff(1, 100));
    }

    #[test]
    fn test_clear_group_aff_single_dst() {
        let mut affs = AffiliationTable::new();
        affs.group_aff(1, 100);
        affs.group_aff(2, 100);
        affs.group_aff(3, 200);

        let mut removed = affs.clear_group_aff(100, false);
        removed.sort_unstable();
        assert_eq!(removed, vec![1, 2]);
        assert!(affs.is_group_aff(3, 200));
    }

    #[test]
    fn test_clear_group_aff_all() {
        let mut affs = AffiliationTable::new();
        affs.group_aff(1, 100);
        affs.group_aff(3, 200);

        let mut removed = affs.clear_group_aff(0, true);
        removed.sort_unstable();
        assert_eq!(removed, vec![1, 3]);
        assert!(!affs.is_group_aff(1, 100));
        assert!(!affs.is_group_aff(3, 200));
    }
}
