use std::collections::HashMap;

use log::{info, warn};

use verdant_shared::{BalanceEntry, GardenMessage};

/// Peer-local ledger of player balances.
///
/// The controller peer is the sole mutator: every mutation there is
/// followed by a full `BalanceSnapshot` broadcast, and every other peer
/// rebuilds its table verbatim from the snapshot. Role enforcement lives
/// in the peer orchestration; this type holds the data either way.
pub struct EconomyLedger {
    balances: HashMap<String, BalanceEntry>,
    starting_balance: i32,
}

impl EconomyLedger {
    pub fn new(starting_balance: i32) -> Self {
        Self {
            balances: HashMap::new(),
            starting_balance,
        }
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn balance(&self, player_id: &str) -> Option<i32> {
        self.balances.get(player_id).map(|entry| entry.balance)
    }

    /// Adds a player at the starting balance. Returns false (and changes
    /// nothing) if the player is already tracked.
    pub fn register_player(&mut self, player_id: &str, display_name: &str) -> bool {
        if self.balances.contains_key(player_id) {
            return false;
        }
        info!(
            "tracking player '{display_name}' ({player_id}) at starting balance {}",
            self.starting_balance
        );
        self.balances.insert(
            player_id.to_string(),
            BalanceEntry {
                player_id: player_id.to_string(),
                display_name: display_name.to_string(),
                balance: self.starting_balance,
            },
        );
        true
    }

    /// Credits a player's balance. Returns false for an untracked player.
    pub fn add(&mut self, player_id: &str, amount: i32) -> bool {
        let Some(entry) = self.balances.get_mut(player_id) else {
            warn!("add of {amount} for untracked player {player_id}");
            return false;
        };
        entry.balance += amount;
        info!(
            "balance of '{}' is now {}",
            entry.display_name, entry.balance
        );
        true
    }

    /// Deducts from a player's balance. Returns false for an untracked
    /// player.
    pub fn remove(&mut self, player_id: &str, amount: i32) -> bool {
        let Some(entry) = self.balances.get_mut(player_id) else {
            warn!("remove of {amount} for untracked player {player_id}");
            return false;
        };
        entry.balance -= amount;
        info!(
            "balance of '{}' is now {}",
            entry.display_name, entry.balance
        );
        true
    }

    /// The full-table broadcast sent after every controller-side mutation.
    pub fn snapshot(&self) -> GardenMessage {
        let mut entries: Vec<BalanceEntry> = self.balances.values().cloned().collect();
        entries.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        GardenMessage::BalanceSnapshot { entries }
    }

    /// Rebuilds the table verbatim from a received snapshot.
    pub fn apply_snapshot(&mut self, entries: Vec<BalanceEntry>) {
        self.balances.clear();
        for entry in entries {
            self.balances.insert(entry.player_id.clone(), entry);
        }
    }

    /// Display rows sorted by balance, highest first, for the UI
    /// collaborator.
    pub fn display_snapshot(&self) -> (Vec<String>, Vec<i32>) {
        let mut sorted: Vec<&BalanceEntry> = self.balances.values().collect();
        sorted.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        let names = sorted.iter().map(|entry| entry.display_name.clone()).collect();
        let balances = sorted.iter().map(|entry| entry.balance).collect();
        (names, balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_per_player() {
        let mut ledger = EconomyLedger::new(100);
        assert!(ledger.register_player("p1", "Ada"));
        assert!(!ledger.register_player("p1", "Ada"));
        assert_eq!(ledger.balance("p1"), Some(100));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn mutations_require_a_tracked_player() {
        let mut ledger = EconomyLedger::new(0);
        assert!(!ledger.add("ghost", 5));
        assert!(!ledger.remove("ghost", 5));
        ledger.register_player("p1", "Ada");
        assert!(ledger.add("p1", 30));
        assert!(ledger.remove("p1", 10));
        assert_eq!(ledger.balance("p1"), Some(20));
    }

    #[test]
    fn snapshot_rebuilds_an_identical_table() {
        let mut controller = EconomyLedger::new(50);
        controller.register_player("p1", "Ada");
        controller.register_player("p2", "Brin");
        controller.add("p2", 25);

        let mut proxy = EconomyLedger::new(0);
        let GardenMessage::BalanceSnapshot { entries } = controller.snapshot() else {
            panic!("snapshot must be a balance snapshot");
        };
        proxy.apply_snapshot(entries);

        assert_eq!(proxy.balance("p1"), Some(50));
        assert_eq!(proxy.balance("p2"), Some(75));
        assert_eq!(proxy.display_snapshot(), controller.display_snapshot());
    }

    #[test]
    fn display_rows_sort_by_balance_descending() {
        let mut ledger = EconomyLedger::new(10);
        ledger.register_player("p1", "Ada");
        ledger.register_player("p2", "Brin");
        ledger.register_player("p3", "Chen");
        ledger.add("p3", 5);
        ledger.remove("p2", 5);

        let (names, balances) = ledger.display_snapshot();
        assert_eq!(names, vec!["Chen", "Ada", "Brin"]);
        assert_eq!(balances, vec![15, 10, 5]);
    }
}
