// src/catalog.rs

//! Static routine catalog, keyed by OS family.
//!
//! The catalog is fixed at compile time and never mutated. The order of each
//! list is the order in which routines are offered to the user.

use crate::types::OsFamily;

const WINDOWS_ROUTINES: &[&str] = &[
    "windows.pslist",
    "windows.pstree",
    "windows.netscan",
    "windows.dlllist",
    "windows.filescan",
    "windows.handles",
    "windows.hivelist",
    "windows.info",
    "windows.malfind",
    "windows.memmap",
    "windows.modules",
    "windows.mutantscan",
    "windows.privs",
    "windows.psscan",
    "windows.sessions",
    "windows.ssdt",
    "windows.symlinkscan",
    "windows.vadinfo",
    "windows.verinfo",
];

const LINUX_ROUTINES: &[&str] = &["linux.pslist", "linux.pstree"];

const MAC_ROUTINES: &[&str] = &["mac.pslist", "mac.pstree"];

/// Routines offered for a given OS family.
pub fn routines_for(family: OsFamily) -> &'static [&'static str] {
    match family {
        OsFamily::Windows => WINDOWS_ROUTINES,
        OsFamily::Linux => LINUX_ROUTINES,
        OsFamily::Mac => MAC_ROUTINES,
    }
}

/// Routines offered for a family given by name (case-insensitive).
///
/// Unrecognized names yield an empty catalog rather than an error.
pub fn routines_for_name(name: &str) -> &'static [&'static str] {
    match name.parse::<OsFamily>() {
        Ok(family) => routines_for(family),
        Err(_) => &[],
    }
}

/// Whether `routine` is offered for `family`.
pub fn offers(family: OsFamily, routine: &str) -> bool {
    routines_for(family).contains(&routine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_catalog_has_nineteen_entries() {
        let routines = routines_for(OsFamily::Windows);
        assert_eq!(routines.len(), 19);
        assert_eq!(routines.first(), Some(&"windows.pslist"));
        assert_eq!(routines.last(), Some(&"windows.verinfo"));
    }

    #[test]
    fn every_routine_is_prefixed_by_its_family() {
        for family in OsFamily::ALL {
            let prefix = format!("{}.", family.as_str());
            for routine in routines_for(family) {
                assert!(routine.starts_with(&prefix), "{routine} not under {prefix}");
            }
        }
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        assert_eq!(routines_for_name("Linux"), &["linux.pslist", "linux.pstree"]);
        assert_eq!(routines_for_name("MAC"), &["mac.pslist", "mac.pstree"]);
    }

    #[test]
    fn unknown_family_name_yields_empty_catalog() {
        assert!(routines_for_name("freebsd").is_empty());
        assert!(routines_for_name("").is_empty());
    }

    #[test]
    fn offers_checks_membership() {
        assert!(offers(OsFamily::Linux, "linux.pstree"));
        assert!(!offers(OsFamily::Linux, "windows.pslist"));
    }
}
