//! Classification of uncaught errors

/// Subsystem name searched for in uncaught error messages
pub const DIAGRAM_SUBSYSTEM: &str = "mermaid";

/// True when an uncaught error message points at the diagram renderer
pub fn mentions_diagram_subsystem(message: &str) -> bool {
    message.to_lowercase().contains(DIAGRAM_SUBSYSTEM)
}
