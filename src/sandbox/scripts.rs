/// Fixed filesystem names shared by every deployed sandbox. These must match
/// the deploy tool exactly; both the lock toggle and the upgrade pipeline
/// consume this table instead of scattering literals.
pub const DATA_DIR_NAME: &str = "data";
pub const DESCRIPTOR_FILE: &str = "sbdescription.json";
pub const NO_UPGRADE_MARKER: &str = "no_upgrade";
pub const UPGRADE_BINARY: &str = "mysql_upgrade";

/// Whether a sandbox directory drives one instance or a coordinated group
/// sharing group-level control scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptRole {
    /// Deletes the sandbox data; renamed aside while a sandbox is locked.
    Clear,
    /// The preserved deletion script of a locked sandbox.
    NoClear,
    Start,
    Stop,
    /// Administrative connector, also runs the engine upgrade procedure.
    Admin,
}

pub fn script_name(topology: Topology, role: ScriptRole) -> &'static str {
    match (topology, role) {
        (Topology::Single, ScriptRole::Clear) => "clear",
        (Topology::Single, ScriptRole::NoClear) => "no_clear",
        (Topology::Single, ScriptRole::Start) => "start",
        (Topology::Single, ScriptRole::Stop) => "stop",
        (Topology::Single, ScriptRole::Admin) => "my",
        (Topology::Multiple, ScriptRole::Clear) => "clear_all",
        (Topology::Multiple, ScriptRole::NoClear) => "no_clear_all",
        (Topology::Multiple, ScriptRole::Start) => "start_all",
        (Topology::Multiple, ScriptRole::Stop) => "stop_all",
        (Topology::Multiple, ScriptRole::Admin) => "use_all",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_names_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for topology in [Topology::Single, Topology::Multiple] {
            for role in [
                ScriptRole::Clear,
                ScriptRole::NoClear,
                ScriptRole::Start,
                ScriptRole::Stop,
                ScriptRole::Admin,
            ] {
                assert!(seen.insert(script_name(topology, role)));
            }
        }
    }

    #[test]
    fn test_lock_pair_names() {
        assert_eq!(script_name(Topology::Single, ScriptRole::Clear), "clear");
        assert_eq!(
            script_name(Topology::Single, ScriptRole::NoClear),
            "no_clear"
        );
        assert_eq!(
            script_name(Topology::Multiple, ScriptRole::Clear),
            "clear_all"
        );
        assert_eq!(
            script_name(Topology::Multiple, ScriptRole::NoClear),
            "no_clear_all"
        );
    }
}
