//! Device and mechanism parameters, with file-based overrides.
//!
//! Default values reproduce the literature constants the models were
//! published with (Vattikonda et al., DAC 2006, for the shared device
//! parameters). Override files hold one `key<TAB>value` pair per line with
//! `#` starting a comment; unknown keys and malformed lines warn and are
//! skipped, and a missing file is a warning rather than an error so a run
//! can proceed on defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use oldspot_trace::diag::warn_once;

/// Process parameters shared by every wearout mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceParams {
    /// Channel length (nm).
    pub l: f64,
    /// PMOS threshold voltage (V).
    pub vt0_p: f64,
    /// NMOS threshold voltage (V).
    pub vt0_n: f64,
    /// Oxide thickness (nm).
    pub t_ox: f64,
    /// Oxide capacitance (F/nm^2).
    pub c_ox: f64,
    /// Alpha-power-law delay exponent.
    pub alpha: f64,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            l: 65.0,
            vt0_p: 0.5,
            vt0_n: 0.5,
            t_ox: 1.8,
            c_ox: 1.92e-20,
            alpha: 1.3,
        }
    }
}

impl DeviceParams {
    /// Set a parameter by its file key. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match key {
            "L" => self.l = value,
            "Vt0_p" => self.vt0_p = value,
            "Vt0_n" => self.vt0_n = value,
            "tox" => self.t_ox = value,
            "Cox" => self.c_ox = value,
            "alpha" => self.alpha = value,
            _ => return false,
        }
        true
    }
}

/// NBTI model parameters (Joshi et al., IRPS 2012).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NbtiParams {
    /// Interface-trap generation prefactor.
    pub a: f64,
    /// Hole-trapping prefactor.
    pub b: f64,
    /// Voltage exponent for interface traps.
    pub gamma_it: f64,
    /// Voltage exponent for hole trapping.
    pub gamma_ht: f64,
    /// Forward trap-generation activation energy (eV).
    pub e_akf: f64,
    /// Reverse trap-generation activation energy (eV).
    pub e_akr: f64,
    /// Hydrogen diffusion activation energy (eV).
    pub e_adh2: f64,
    /// Hole-trapping activation energy (eV).
    pub e_aht: f64,
}

impl Default for NbtiParams {
    fn default() -> Self {
        Self {
            a: 5.5e12,
            b: 8e11,
            gamma_it: 4.5,
            gamma_ht: 4.5,
            e_akf: 0.175,
            e_akr: 0.2,
            e_adh2: 0.58,
            e_aht: 0.03,
        }
    }
}

impl NbtiParams {
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match key {
            "A" => self.a = value,
            "B" => self.b = value,
            "Gamma_IT" => self.gamma_it = value,
            "Gamma_HT" => self.gamma_ht = value,
            "E_Akf" => self.e_akf = value,
            "E_Akr" => self.e_akr = value,
            "E_ADH2" => self.e_adh2 = value,
            "E_AHT" => self.e_aht = value,
            _ => return false,
        }
        true
    }
}

/// Electromigration parameters for Black's equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmParams {
    /// Current-density exponent.
    pub n: f64,
    /// Activation energy (eV).
    pub e_a: f64,
    /// Interconnect width (m).
    pub w: f64,
    /// Interconnect height (m).
    pub h: f64,
    /// Empirical prefactor.
    pub a: f64,
}

impl Default for EmParams {
    fn default() -> Self {
        Self {
            n: 2.0,
            e_a: 0.8,
            w: 4.5e-7,
            h: 1.2e-6,
            a: 3.22e21,
        }
    }
}

impl EmParams {
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match key {
            "n" => self.n = value,
            "Ea" => self.e_a = value,
            "w" => self.w = value,
            "h" => self.h = value,
            "A" => self.a = value,
            _ => return false,
        }
        true
    }
}

/// HCI parameters from the ExtraTime model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HciParams {
    /// Oxide field constant (V/nm).
    pub e0: f64,
    /// Technology constant (nm/C^0.5).
    pub k: f64,
    /// Bulk charge factor.
    pub a_bulk: f64,
    /// Trap-generation energy barrier (eV).
    pub phi_it: f64,
    /// Hot-electron mean free path (nm).
    pub lambda: f64,
    /// Pinch-off region width (nm).
    pub l: f64,
    /// Velocity-saturation field (V/nm).
    pub e_sat: f64,
    /// Time exponent.
    pub n: f64,
}

impl Default for HciParams {
    fn default() -> Self {
        Self {
            e0: 0.8,
            k: 1.7e8,
            a_bulk: 0.005,
            phi_it: 3.7,
            lambda: 7.8,
            l: 17.0,
            e_sat: 0.011,
            n: 0.45,
        }
    }
}

impl HciParams {
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match key {
            "E0" => self.e0 = value,
            "K" => self.k = value,
            "A_bulk" => self.a_bulk = value,
            "phi_it" => self.phi_it = value,
            "lambda" => self.lambda = value,
            "l" => self.l = value,
            "Esat" => self.e_sat = value,
            "n" => self.n = value,
            _ => return false,
        }
        true
    }
}

/// TDDB parameters (Srinivasan et al., ISCA 2004).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TddbParams {
    /// Voltage exponent constant.
    pub a: f64,
    /// Voltage exponent temperature coefficient (1/K).
    pub b: f64,
    /// Activation energy constant (eV).
    pub x: f64,
    /// Activation energy 1/T coefficient (eV K).
    pub y: f64,
    /// Activation energy T coefficient (eV/K).
    pub z: f64,
}

impl Default for TddbParams {
    fn default() -> Self {
        Self {
            a: 78.0,
            b: -0.081,
            x: 0.759,
            y: -66.8,
            z: -8.37e-4,
        }
    }
}

impl TddbParams {
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match key {
            "a" => self.a = value,
            "b" => self.b = value,
            "X" => self.x = value,
            "Y" => self.y = value,
            "Z" => self.z = value,
            _ => return false,
        }
        true
    }
}

/// Read a parameter override file into key/value pairs.
///
/// Problems are reported as deduplicated warnings and never abort the run:
/// the models fall back to their built-in defaults for anything the file
/// does not supply.
pub fn read_params(path: impl AsRef<Path>) -> Vec<(String, f64)> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => parse_params(&contents, &path.display().to_string()),
        Err(_) => {
            warn_once(format!("{}: file not found", path.display()));
            Vec::new()
        }
    }
}

/// Parse parameter override contents; `origin` names the source in
/// diagnostics.
pub fn parse_params(contents: &str, origin: &str) -> Vec<(String, f64)> {
    let mut params = Vec::new();
    for line in contents.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let parsed = match (fields.next(), fields.next(), fields.next()) {
            (Some(key), Some(value), None) => value
                .trim()
                .parse::<f64>()
                .ok()
                .map(|value| (key.to_string(), value)),
            _ => None,
        };
        match parsed {
            Some(pair) => params.push(pair),
            None => warn_once(format!("{origin}: {line}: unable to parse line")),
        }
    }
    params
}
