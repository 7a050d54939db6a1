//! Per-switch MAC learning table.

use ofctl_types::{DatapathId, MacAddress, PortNo};
use std::collections::HashMap;
use tracing::debug;

/// Learning counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MacTableStats {
    /// New (switch, MAC) entries
    pub entries_added: u64,
    /// Existing entries that moved to another port
    pub entries_moved: u64,
}

/// Maps each switch's MAC addresses to the port they were last seen on.
///
/// Entries never age out; a later observation on a different port
/// overwrites the earlier one.
#[derive(Debug, Default)]
pub struct MacLearningTable {
    switches: HashMap<DatapathId, HashMap<MacAddress, PortNo>>,
    stats: MacTableStats,
}

impl MacLearningTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `mac` as reachable through `port` on `datapath_id`.
    ///
    /// Returns the port previously recorded for the address, if any.
    pub fn learn(
        &mut self,
        datapath_id: DatapathId,
        mac: MacAddress,
        port: PortNo,
    ) -> Option<PortNo> {
        let previous = self
            .switches
            .entry(datapath_id)
            .or_default()
            .insert(mac, port);

        match previous {
            None => self.stats.entries_added += 1,
            Some(old) if old != port => {
                self.stats.entries_moved += 1;
                debug!(
                    dpid = %datapath_id,
                    mac = %mac,
                    from = %old,
                    to = %port,
                    "station moved"
                );
            }
            Some(_) => {}
        }

        previous
    }

    pub fn lookup(&self, datapath_id: DatapathId, mac: &MacAddress) -> Option<PortNo> {
        self.switches.get(&datapath_id)?.get(mac).copied()
    }

    /// Returns the learned port of `mac`, or [`PortNo::FLOOD`] when unknown.
    pub fn resolve(&self, datapath_id: DatapathId, mac: &MacAddress) -> PortNo {
        self.lookup(datapath_id, mac).unwrap_or(PortNo::FLOOD)
    }

    /// Number of entries learned on one switch.
    pub fn len(&self, datapath_id: DatapathId) -> usize {
        self.switches.get(&datapath_id).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.switches.values().all(HashMap::is_empty)
    }

    pub fn stats(&self) -> &MacTableStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0, 0, 0, 0, 0, last])
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = MacLearningTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(DatapathId::new(1)), 0);
        assert_eq!(table.stats(), &MacTableStats::default());
    }

    #[test]
    fn test_learn_and_lookup() {
        let mut table = MacLearningTable::new();
        let dpid = DatapathId::new(1);

        assert_eq!(table.learn(dpid, mac(1), PortNo::new(1)), None);
        assert_eq!(table.lookup(dpid, &mac(1)), Some(PortNo::new(1)));
        assert_eq!(table.resolve(dpid, &mac(1)), PortNo::new(1));
        assert_eq!(table.stats().entries_added, 1);
    }

    #[test]
    fn test_unknown_resolves_to_flood() {
        let table = MacLearningTable::new();
        assert_eq!(table.resolve(DatapathId::new(1), &mac(9)), PortNo::FLOOD);
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = MacLearningTable::new();
        let dpid = DatapathId::new(1);

        table.learn(dpid, mac(2), PortNo::new(2));
        assert_eq!(table.learn(dpid, mac(2), PortNo::new(5)), Some(PortNo::new(2)));
        assert_eq!(table.lookup(dpid, &mac(2)), Some(PortNo::new(5)));
        assert_eq!(table.len(dpid), 1);
        assert_eq!(table.stats().entries_moved, 1);

        // Re-learning on the same port is not a move.
        table.learn(dpid, mac(2), PortNo::new(5));
        assert_eq!(table.stats().entries_moved, 1);
    }

    #[test]
    fn test_switches_are_isolated() {
        let mut table = MacLearningTable::new();
        table.learn(DatapathId::new(1), mac(1), PortNo::new(1));

        assert_eq!(table.lookup(DatapathId::new(2), &mac(1)), None);
        assert_eq!(table.len(DatapathId::new(1)), 1);
        assert_eq!(table.len(DatapathId::new(2)), 0);
    }
}
