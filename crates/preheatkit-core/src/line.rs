//! Structured G-code line classification.
//!
//! Every pass re-derives the classification from the raw text; nothing is
//! cached as a persistent tag on the line.

use std::sync::OnceLock;

use regex::Regex;

/// Literal marker (in a slicer comment) ending the machine-generated start
/// sequence. Lines before it, including thumbnail payload, are never touched.
pub const REGION_START_MARKER: &str = "End Start_gcode";

/// Literal marker (in a slicer comment) opening a toolchange block.
pub const TOOLCHANGE_MARKER: &str = "; CP TOOLCHANGE START";

/// Optional numeric fields of a linear move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionFields {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub e: Option<f64>,
    pub f: Option<f64>,
}

/// Fields of a set-temperature command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempFields {
    /// Requested temperature (S value).
    pub temp: f64,
    /// Target tool for targeted variants (`M104 S220 T1`).
    pub tool: Option<u32>,
}

/// Derived classification of one raw G-code line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// Linear move (`G1 ...`) with optional X/Y/E/F fields.
    Motion(MotionFields),
    /// Set-temperature command (`M104 S<temp> [T<n>]`).
    SetTemp(TempFields),
    /// Standalone tool selection (`T<n>`).
    ToolSelect(u32),
    /// Toolchange-block marker comment.
    ToolchangeMarker,
    /// End-of-start-sequence marker comment.
    RegionStart,
    /// Anything else: comments, other opcodes, blank lines.
    Other,
}

fn field_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

fn capture_f64(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Extract the optional X/Y/E/F fields of a motion line.
///
/// A missing or malformed field yields `None`; the caller falls back to the
/// carried machine state.
pub fn motion_fields(line: &str) -> MotionFields {
    static X_RE: OnceLock<Regex> = OnceLock::new();
    static Y_RE: OnceLock<Regex> = OnceLock::new();
    static E_RE: OnceLock<Regex> = OnceLock::new();
    static F_RE: OnceLock<Regex> = OnceLock::new();

    MotionFields {
        x: capture_f64(field_regex(&X_RE, r"X([-+]?\d*\.?\d+)"), line),
        y: capture_f64(field_regex(&Y_RE, r"Y([-+]?\d*\.?\d+)"), line),
        e: capture_f64(field_regex(&E_RE, r"E([-+]?\d*\.?\d+)"), line),
        f: capture_f64(field_regex(&F_RE, r"F([-+]?\d*\.?\d+)"), line),
    }
}

/// Find a tool id referenced on a line: either a standalone `T<n>` word or
/// the slicer's `; Tool<a> -> Tool<b>` toolchange comment.
pub fn tool_token(line: &str) -> Option<u32> {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    static ARROW_RE: OnceLock<Regex> = OnceLock::new();

    let word = field_regex(&WORD_RE, r"(?:^|\s)T(\d+)\b");
    if let Some(c) = word.captures(line) {
        return c.get(1).and_then(|m| m.as_str().parse().ok());
    }
    let arrow = field_regex(&ARROW_RE, r"; Tool\d+ -> Tool(\d+)");
    arrow
        .captures(line)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Classify one raw line.
pub fn classify(line: &str) -> LineKind {
    static SET_TEMP_RE: OnceLock<Regex> = OnceLock::new();
    static TOOL_SELECT_RE: OnceLock<Regex> = OnceLock::new();

    let trimmed = line.trim();

    if trimmed.contains(REGION_START_MARKER) {
        return LineKind::RegionStart;
    }
    if trimmed.contains(TOOLCHANGE_MARKER) {
        return LineKind::ToolchangeMarker;
    }

    // "G1" followed by a digit would be a different opcode (G10, G17, ...).
    if let Some(rest) = trimmed.strip_prefix("G1") {
        if rest.chars().next().map_or(true, |c| !c.is_ascii_digit()) {
            return LineKind::Motion(motion_fields(trimmed));
        }
    }

    if trimmed.starts_with("M104") {
        let re = field_regex(&SET_TEMP_RE, r"M104\s+S([-+]?\d+(?:\.\d+)?)(?:\s+T(\d+))?");
        if let Some(c) = re.captures(trimmed) {
            if let Some(temp) = c.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                let tool = c.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
                return LineKind::SetTemp(TempFields { temp, tool });
            }
        }
        return LineKind::Other;
    }

    let select = field_regex(&TOOL_SELECT_RE, r"^T(\d+)\s*(?:;.*)?$");
    if let Some(c) = select.captures(trimmed) {
        if let Some(tool) = c.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
            return LineKind::ToolSelect(tool);
        }
    }

    LineKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_classification() {
        let kind = classify("G1 X10.5 Y-2 E0.42 F1200");
        let LineKind::Motion(fields) = kind else {
            panic!("expected motion, got {:?}", kind);
        };
        assert_eq!(fields.x, Some(10.5));
        assert_eq!(fields.y, Some(-2.0));
        assert_eq!(fields.e, Some(0.42));
        assert_eq!(fields.f, Some(1200.0));
    }

    #[test]
    fn test_motion_missing_fields() {
        let LineKind::Motion(fields) = classify("G1 E-0.8") else {
            panic!("expected motion");
        };
        assert_eq!(fields.x, None);
        assert_eq!(fields.y, None);
        assert_eq!(fields.e, Some(-0.8));
    }

    #[test]
    fn test_other_g_opcodes_are_not_motion() {
        assert_eq!(classify("G10"), LineKind::Other);
        assert_eq!(classify("G17"), LineKind::Other);
        assert_eq!(classify("G28 X Y"), LineKind::Other);
    }

    #[test]
    fn test_set_temp_with_and_without_tool() {
        assert_eq!(
            classify("M104 S220 T1"),
            LineKind::SetTemp(TempFields {
                temp: 220.0,
                tool: Some(1)
            })
        );
        assert_eq!(
            classify("M104 S0"),
            LineKind::SetTemp(TempFields {
                temp: 0.0,
                tool: None
            })
        );
        // Malformed S value falls through to Other
        assert_eq!(classify("M104 Sabc"), LineKind::Other);
    }

    #[test]
    fn test_markers() {
        assert_eq!(
            classify(";----- End Start_gcode ------"),
            LineKind::RegionStart
        );
        assert_eq!(classify("; CP TOOLCHANGE START"), LineKind::ToolchangeMarker);
    }

    #[test]
    fn test_tool_select() {
        assert_eq!(classify("T2"), LineKind::ToolSelect(2));
        assert_eq!(classify("T0 ; switch"), LineKind::ToolSelect(0));
        assert_eq!(classify("TOOLS"), LineKind::Other);
    }

    #[test]
    fn test_tool_token() {
        assert_eq!(tool_token("M104 S220 T1"), Some(1));
        assert_eq!(tool_token("T3"), Some(3));
        assert_eq!(tool_token("; Tool0 -> Tool2"), Some(2));
        assert_eq!(tool_token("; CP TOOLCHANGE START"), None);
        assert_eq!(tool_token("G1 X10 Y10"), None);
    }
}
