//! Session configuration
//!
//! Loaded from YAML; every field is optional:
//!
//! ```yaml
//! seed: "0x2a2a2a..."      # up to 64 hex digits, omitted = random
//! topology: ClusterBased
//! latency_min_secs: 0.5
//! latency_max_secs: 2.5
//! pause: true              # actually sleep through latency actions
//! panel_log_entries: 10
//! ```

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Deserialize;

use crate::ds_interface::{SimError, TopologyKind, LATENCY_RANGE_SECS, PANEL_LOG_ENTRIES};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Hex encoded seed (None = generate random)
    pub seed: Option<String>,

    /// Topology selected when the session starts
    pub topology: String,

    pub latency_min_secs: f64,
    pub latency_max_secs: f64,

    /// Whether front ends sleep through sampled delays
    pub pause: bool,

    /// Log entries shown by the metrics panel
    pub panel_log_entries: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            topology: TopologyKind::ClientServer.name().to_string(),
            latency_min_secs: LATENCY_RANGE_SECS.0,
            latency_max_secs: LATENCY_RANGE_SECS.1,
            pause: true,
            panel_log_entries: PANEL_LOG_ENTRIES,
        }
    }
}

impl SimConfig {
    /// Read and validate a YAML config file
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let content = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig =
            serde_yaml::from_str(&content).map_err(|source| SimError::ConfigParse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let (low, high) = (self.latency_min_secs, self.latency_max_secs);
        if !(low.is_finite() && high.is_finite()) || low <= 0.0 || low > high {
            return Err(SimError::InvalidConfig(format!(
                "latency range must satisfy 0 < min <= max, got {}..={}",
                low, high
            )));
        }
        self.topology_kind()?;
        if let Some(ref seed) = self.seed {
            parse_seed_hex(seed)?;
        }
        Ok(())
    }

    pub fn topology_kind(&self) -> Result<TopologyKind, SimError> {
        self.topology.parse()
    }

    pub fn latency_range(&self) -> (f64, f64) {
        (self.latency_min_secs, self.latency_max_secs)
    }

    /// Configured seed, or a fresh one from entropy
    pub fn resolve_seed(&self) -> Result<[u8; 32], SimError> {
        match self.seed {
            Some(ref hex) => parse_seed_hex(hex),
            None => {
                let mut seed = [0u8; 32];
                StdRng::from_entropy().fill_bytes(&mut seed);
                Ok(seed)
            }
        }
    }
}

/// Parse a hex seed with optional `0x` prefix. Shorter inputs fill the leading bytes.
pub fn parse_seed_hex(hex: &str) -> Result<[u8; 32], SimError> {
    let digits = hex.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() || digits.len() > 64 {
        return Err(SimError::InvalidSeed(format!(
            "expected 1 to 64 hex digits, got {}",
            digits.len()
        )));
    }

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SimError::InvalidSeed(format!("{}: not a hex string", hex)));
    }

    let mut seed = [0u8; 32];
    for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
        let byte_str = std::str::from_utf8(chunk)
            .map_err(|_| SimError::InvalidSeed(hex.to_string()))?;
        seed[i] = u8::from_str_radix(byte_str, 16)
            .map_err(|e| SimError::InvalidSeed(format!("{}: {}", hex, e)))?;
    }

    Ok(seed)
}

/// Hex form accepted back by `parse_seed_hex`
pub fn format_seed(seed: &[u8; 32]) -> String {
    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for byte in seed {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.latency_range(), (0.5, 2.5));
        assert_eq!(config.topology_kind().unwrap(), TopologyKind::ClientServer);
        assert!(config.pause);
        assert_eq!(config.panel_log_entries, 10);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = "topology: Peer-to-Peer\npause: false\nlatency_max_secs: 1.5\n";
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.topology_kind().unwrap(), TopologyKind::PeerToPeer);
        assert!(!config.pause);
        assert_eq!(config.latency_range(), (0.5, 1.5));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SimConfig, _> = serde_yaml::from_str("rounds: 5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_latency_range() {
        let config = SimConfig {
            latency_min_secs: 3.0,
            latency_max_secs: 2.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let zero = SimConfig {
            latency_min_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_topology_in_config() {
        let config = SimConfig {
            topology: "Mesh".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::UnknownTopologyKind(_))
        ));
    }

    #[test]
    fn test_seed_round_trip() {
        let seed = [0xABu8; 32];
        assert_eq!(parse_seed_hex(&format_seed(&seed)).unwrap(), seed);
    }

    #[test]
    fn test_short_seed_fills_leading_bytes() {
        let seed = parse_seed_hex("0x0102").unwrap();
        assert_eq!(seed[0], 1);
        assert_eq!(seed[1], 2);
        assert!(seed[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_seed_rejects_signs_and_accepts_upper_prefix() {
        assert!(matches!(parse_seed_hex("+f"), Err(SimError::InvalidSeed(_))));
        assert!(matches!(parse_seed_hex("-1"), Err(SimError::InvalidSeed(_))));
        assert!(matches!(parse_seed_hex("0x+f"), Err(SimError::InvalidSeed(_))));
        assert_eq!(parse_seed_hex("0X2a").unwrap()[0], 0x2a);
    }

    #[test]
    fn test_bad_seeds() {
        assert!(matches!(parse_seed_hex(""), Err(SimError::InvalidSeed(_))));
        assert!(matches!(parse_seed_hex("0xzz"), Err(SimError::InvalidSeed(_))));
        let too_long = "1".repeat(65);
        assert!(matches!(parse_seed_hex(&too_long), Err(SimError::InvalidSeed(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load(Path::new("/nonexistent/topology-sim.yaml")).unwrap_err();
        assert!(matches!(err, SimError::ConfigIo { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("ds_sim_config_{}.yaml", std::process::id()));
        fs::write(&path, "seed: \"0x2a\"\ntopology: CloudModel\n").unwrap();
        let config = SimConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.topology_kind().unwrap(), TopologyKind::CloudModel);
        assert_eq!(config.resolve_seed().unwrap()[0], 0x2a);
    }
}
