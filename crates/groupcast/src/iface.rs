//! Network interface enumeration and rotation.
//!
//! The interface list is re-read from the operating system on every cycle so
//! interfaces added or removed at runtime show up in the rotation within one
//! revolution.

use common::{Error, Result};
use std::collections::HashSet;

/// One host network interface as reported by the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    /// Interface name (e.g., "eth0")
    pub name: String,

    /// Interface index as used for multicast membership
    pub index: u32,
}

/// Enumerate all current host network interfaces.
pub fn enumerate() -> Result<Vec<InterfaceDescriptor>> {
    let interfaces = nix::net::if_::if_nameindex().map_err(Error::interface)?;

    Ok(interfaces
        .iter()
        .map(|ifi| InterfaceDescriptor {
            name: ifi.name().to_string_lossy().into_owned(),
            index: ifi.index(),
        })
        .collect())
}

/// Advance the rotation and select the interface to try next.
///
/// `current` is reduced modulo the list length before use, so a stale
/// position from a longer list stays in bounds. Skip-listed names are passed
/// over, wrapping at most one full revolution. Returns the new rotation
/// position and the selection; `None` when the list is empty or every entry
/// is skip-listed.
pub fn next_interface<'a>(
    interfaces: &'a [InterfaceDescriptor],
    current: usize,
    skip: &HashSet<String>,
) -> (usize, Option<&'a InterfaceDescriptor>) {
    if interfaces.is_empty() {
        return (current, None);
    }

    let mut idx = (current + 1) % interfaces.len();
    for _ in 0..interfaces.len() {
        let candidate = &interfaces[idx];
        if !skip.contains(&candidate.name) {
            return (idx, Some(candidate));
        }
        idx = (idx + 1) % interfaces.len();
    }

    (idx, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(names: &[&str]) -> Vec<InterfaceDescriptor> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| InterfaceDescriptor {
                name: name.to_string(),
                index: i as u32 + 1,
            })
            .collect()
    }

    #[test]
    fn test_enumerate() {
        let interfaces = enumerate().unwrap();
        assert!(!interfaces.is_empty());

        // "lo" (loopback) should always exist on Linux
        assert!(interfaces.iter().any(|ifi| ifi.name == "lo"));
        assert!(interfaces.iter().all(|ifi| ifi.index > 0));
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        let skip = HashSet::new();
        let (idx, selected) = next_interface(&[], 3, &skip);
        assert_eq!(idx, 3);
        assert!(selected.is_none());
    }

    #[test]
    fn test_rotation_order() {
        let interfaces = descriptors(&["eth0", "eth1", "wlan0"]);
        let skip = HashSet::new();

        let (idx, selected) = next_interface(&interfaces, 0, &skip);
        assert_eq!(idx, 1);
        assert_eq!(selected.unwrap().name, "eth1");

        let (idx, selected) = next_interface(&interfaces, idx, &skip);
        assert_eq!(idx, 2);
        assert_eq!(selected.unwrap().name, "wlan0");

        let (idx, selected) = next_interface(&interfaces, idx, &skip);
        assert_eq!(idx, 0);
        assert_eq!(selected.unwrap().name, "eth0");
    }

    #[test]
    fn test_stale_index_revalidated_against_shrunk_list() {
        let interfaces = descriptors(&["eth0", "eth1"]);
        let skip = HashSet::new();

        // Position left over from a longer enumeration
        let (idx, selected) = next_interface(&interfaces, 17, &skip);
        assert!(idx < interfaces.len());
        assert!(selected.is_some());
    }

    #[test]
    fn test_skip_listed_interface_never_selected() {
        let interfaces = descriptors(&["eth0", "docker0", "eth1"]);
        let skip: HashSet<String> = ["docker0".to_string()].into_iter().collect();

        let mut idx = 0;
        for _ in 0..10 {
            let (next, selected) = next_interface(&interfaces, idx, &skip);
            assert!(next < interfaces.len());
            assert_ne!(selected.unwrap().name, "docker0");
            idx = next;
        }
    }

    #[test]
    fn test_fully_skipped_list_selects_nothing() {
        let interfaces = descriptors(&["eth0", "eth1"]);
        let skip: HashSet<String> = interfaces.iter().map(|ifi| ifi.name.clone()).collect();

        let (idx, selected) = next_interface(&interfaces, 0, &skip);
        assert!(idx < interfaces.len());
        assert!(selected.is_none());
    }
}
