//! The closed gate catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{IrError, IrResult};

/// Names of every gate in the catalog, in canonical form.
pub const CATALOG: &[&str] = &[
    "h", "x", "y", "z", "t", "s", "cnot", "cz", "swap", "rx", "ry", "rz", "zpow",
];

/// A gate kind from the closed catalog.
///
/// The base set carries no parameters. The rotation variants carry a
/// concrete angle in radians; `ZPow(t)` is `Z^t`, a phase of `e^{iπt}` on
/// `|1⟩`, used for dephasing layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateSpec {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// T gate (fourth root of Z).
    T,
    /// S gate (sqrt(Z)).
    S,
    /// Controlled-X gate; first target is the control.
    CNOT,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Rotation around X.
    Rx(f64),
    /// Rotation around Y.
    Ry(f64),
    /// Rotation around Z.
    Rz(f64),
    /// Fractional power of Z.
    ZPow(f64),
}

impl GateSpec {
    /// Canonical lowercase name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateSpec::H => "h",
            GateSpec::X => "x",
            GateSpec::Y => "y",
            GateSpec::Z => "z",
            GateSpec::T => "t",
            GateSpec::S => "s",
            GateSpec::CNOT => "cnot",
            GateSpec::CZ => "cz",
            GateSpec::Swap => "swap",
            GateSpec::Rx(_) => "rx",
            GateSpec::Ry(_) => "ry",
            GateSpec::Rz(_) => "rz",
            GateSpec::ZPow(_) => "zpow",
        }
    }

    /// Number of target qubits.
    #[inline]
    pub fn arity(&self) -> usize {
        match self {
            GateSpec::H
            | GateSpec::X
            | GateSpec::Y
            | GateSpec::Z
            | GateSpec::T
            | GateSpec::S
            | GateSpec::Rx(_)
            | GateSpec::Ry(_)
            | GateSpec::Rz(_)
            | GateSpec::ZPow(_) => 1,

            GateSpec::CNOT | GateSpec::CZ | GateSpec::Swap => 2,
        }
    }

    /// The gate's parameter value, if it is a parametrized variant.
    pub fn parameter(&self) -> Option<f64> {
        match self {
            GateSpec::Rx(v) | GateSpec::Ry(v) | GateSpec::Rz(v) | GateSpec::ZPow(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether applying the gate twice is the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            GateSpec::H
                | GateSpec::X
                | GateSpec::Y
                | GateSpec::Z
                | GateSpec::CNOT
                | GateSpec::CZ
                | GateSpec::Swap
        )
    }

    /// Resolve a catalog name (case-insensitive) into a gate.
    ///
    /// Parametrized kinds read their parameter from `parameters`
    /// (`theta` for rotations, `exponent` for `zpow`).
    pub fn from_name(name: &str, parameters: Option<&BTreeMap<String, f64>>) -> IrResult<Self> {
        let lowered = name.to_ascii_lowercase();
        let gate = match lowered.as_str() {
            "h" => GateSpec::H,
            "x" => GateSpec::X,
            "y" => GateSpec::Y,
            "z" => GateSpec::Z,
            "t" => GateSpec::T,
            "s" => GateSpec::S,
            "cnot" | "cx" => GateSpec::CNOT,
            "cz" => GateSpec::CZ,
            "swap" => GateSpec::Swap,
            "rx" => GateSpec::Rx(required_param(&lowered, "theta", parameters)?),
            "ry" => GateSpec::Ry(required_param(&lowered, "theta", parameters)?),
            "rz" => GateSpec::Rz(required_param(&lowered, "theta", parameters)?),
            "zpow" => GateSpec::ZPow(required_param(&lowered, "exponent", parameters)?),
            _ => return Err(IrError::InvalidGateKind(name.to_string())),
        };
        Ok(gate)
    }

    /// Resolve a catalog name with positional parameters, as used by the
    /// persisted circuit format.
    pub fn from_name_positional(name: &str, params: &[f64]) -> IrResult<Self> {
        let lowered = name.to_ascii_lowercase();
        let key = match lowered.as_str() {
            "rx" | "ry" | "rz" => Some("theta"),
            "zpow" => Some("exponent"),
            _ => None,
        };
        let named = key.and_then(|k| params.first().map(|v| BTreeMap::from([(k.to_string(), *v)])));
        Self::from_name(&lowered, named.as_ref())
    }

    /// Name of the parameter a kind expects, if any.
    pub fn parameter_name(&self) -> Option<&'static str> {
        match self {
            GateSpec::Rx(_) | GateSpec::Ry(_) | GateSpec::Rz(_) => Some("theta"),
            GateSpec::ZPow(_) => Some("exponent"),
            _ => None,
        }
    }
}

fn required_param(
    gate_name: &str,
    key: &str,
    parameters: Option<&BTreeMap<String, f64>>,
) -> IrResult<f64> {
    parameters
        .and_then(|p| p.get(key))
        .copied()
        .ok_or_else(|| IrError::MissingParameter {
            gate_name: gate_name.to_string(),
            parameter: key.to_string(),
        })
}

impl fmt::Display for GateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter() {
            Some(v) => write!(f, "{}({v:.4})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_arity_table() {
        for gate in [GateSpec::H, GateSpec::X, GateSpec::Y, GateSpec::Z, GateSpec::T, GateSpec::S] {
            assert_eq!(gate.arity(), 1);
        }
        for gate in [GateSpec::CNOT, GateSpec::CZ, GateSpec::Swap] {
            assert_eq!(gate.arity(), 2);
        }
        assert_eq!(GateSpec::Rz(PI).arity(), 1);
    }

    #[test]
    fn test_catalog_names_resolve() {
        let params = BTreeMap::from([("theta".to_string(), 0.5), ("exponent".to_string(), 0.1)]);
        for name in CATALOG {
            let gate = GateSpec::from_name(name, Some(&params)).unwrap();
            assert_eq!(gate.name(), *name);
        }
    }

    #[test]
    fn test_from_name_case_and_alias() {
        assert_eq!(GateSpec::from_name("CNOT", None).unwrap(), GateSpec::CNOT);
        assert_eq!(GateSpec::from_name("cx", None).unwrap(), GateSpec::CNOT);
        assert_eq!(GateSpec::from_name("Swap", None).unwrap(), GateSpec::Swap);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            GateSpec::from_name("toffoli", None),
            Err(IrError::InvalidGateKind(name)) if name == "toffoli"
        ));
    }

    #[test]
    fn test_missing_parameter() {
        assert!(matches!(
            GateSpec::from_name("rx", None),
            Err(IrError::MissingParameter { parameter, .. }) if parameter == "theta"
        ));
    }

    #[test]
    fn test_positional() {
        assert_eq!(
            GateSpec::from_name_positional("zpow", &[0.25]).unwrap(),
            GateSpec::ZPow(0.25)
        );
        assert_eq!(GateSpec::from_name_positional("h", &[]).unwrap(), GateSpec::H);
    }

    #[test]
    fn test_display() {
        assert_eq!(GateSpec::H.to_string(), "h");
        assert_eq!(GateSpec::Rz(0.5).to_string(), "rz(0.5000)");
    }
}
