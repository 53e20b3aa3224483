//! Coarse interconnect delay estimates.
//!
//! Wires are bucketed by the span marker in their name, and each pip gets a
//! fixed delay from the pair of buckets it connects. The numbers are rough
//! placeholders for real timing data and are kept stable so databases built
//! from the same input stay byte-identical.

/// Routing class of a wire, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireClass {
    /// Span-0 wire (`H00`/`V00`).
    X0,
    /// Span-1 wire (`H01`/`V01`).
    X1,
    /// Span-2 wire (`H02`/`V02`).
    X2,
    /// Span-6 wire (`H06`/`V06`).
    X6,
    /// Slice or block RAM port wire.
    Slice,
    /// Any other tile-local wire.
    Local,
}

/// Classifies a wire by its name.
///
/// Span markers take priority over the slice markers.
pub fn classify(name: &str) -> WireClass {
    let has = |a: &str, b: &str| name.contains(a) || name.contains(b);
    if has("H00", "V00") {
        WireClass::X0
    } else if has("H01", "V01") {
        WireClass::X1
    } else if has("H02", "V02") {
        WireClass::X2
    } else if has("H06", "V06") {
        WireClass::X6
    } else if has("SLICE", "_EBR") {
        WireClass::Slice
    } else {
        WireClass::Local
    }
}

/// Estimated delay of a pip from `from` to `to`, by wire name.
pub fn pip_delay(from: &str, to: &str) -> u32 {
    class_delay(classify(from), classify(to))
}

/// Estimated delay of a pip between two wire classes.
pub fn class_delay(from: WireClass, to: WireClass) -> u32 {
    use WireClass::*;

    match (from, to) {
        (X2, X2) => 170,
        (Slice, _) | (_, Slice) => 205,
        (Local | X0, X1 | X2 | X6) => 90,
        (X6, _) | (_, X6) => 200,
        (X1 | X2, Local | X0) => 90,
        _ => 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(classify("H00L0100"), WireClass::X0);
        assert_eq!(classify("V01N0001"), WireClass::X1);
        assert_eq!(classify("H02E0701"), WireClass::X2);
        assert_eq!(classify("V06S0303"), WireClass::X6);
        assert_eq!(classify("JA0_SLICE"), WireClass::Slice);
        assert_eq!(classify("JDIA0_EBR"), WireClass::Slice);
        assert_eq!(classify("SLICE_A"), WireClass::Slice);
        assert_eq!(classify("JF0"), WireClass::Local);
        assert_eq!(classify("H01_SLICE"), WireClass::X1);
    }

    #[test]
    fn reference_delays() {
        assert_eq!(pip_delay("H02A0", "H02B0"), 170);
        assert_eq!(pip_delay("L1", "SLICE_A"), 205);
        assert_eq!(pip_delay("L1", "H01A"), 90);
        assert_eq!(pip_delay("H06A", "H01B"), 200);
        assert_eq!(pip_delay("L1", "L2"), 100);
    }

    #[test]
    fn rule_order() {
        // X2 to X2 wins over every other rule
        assert_eq!(class_delay(WireClass::X2, WireClass::X2), 170);
        // slice beats the span rules
        assert_eq!(class_delay(WireClass::X6, WireClass::Slice), 205);
        assert_eq!(class_delay(WireClass::Slice, WireClass::X0), 205);
        // local onto a span wire
        assert_eq!(class_delay(WireClass::X0, WireClass::X6), 90);
        // span-6 either side
        assert_eq!(class_delay(WireClass::X6, WireClass::Local), 200);
        assert_eq!(class_delay(WireClass::X1, WireClass::X6), 200);
        // span wire back to local
        assert_eq!(class_delay(WireClass::X1, WireClass::Local), 90);
        assert_eq!(class_delay(WireClass::X2, WireClass::X0), 90);
        // span to span
        assert_eq!(class_delay(WireClass::X1, WireClass::X2), 100);
        assert_eq!(class_delay(WireClass::X0, WireClass::X0), 100);
    }
}
