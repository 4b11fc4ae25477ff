use std::fmt;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tfl_gate::{AccessRule, AccessTable, GateError};
use tfl_store::StateKey;
use tfl_types::OrganizationId;

use crate::acl;

// ---------------------------------------------------------------------------
// ConfigKey
// ---------------------------------------------------------------------------

/// Flat ledger keys written by `init` and read by the workflows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    TradeContractId,
    TradeChannel,
    ShippingChannel,
    ShipmentContractId,
    Carrier,
    Regulator,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TradeContractId => "tradeContractId",
            Self::TradeChannel => "tradechannel",
            Self::ShippingChannel => "shippingchannel",
            Self::ShipmentContractId => "shipmentContractId",
            Self::Carrier => "carrierMSP",
            Self::Regulator => "regulatoryAuthorityMSP",
        }
    }

    pub fn state_key(&self) -> StateKey {
        StateKey::flat(self.as_str())
    }

    /// Human-readable name used in "not recorded" errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::TradeContractId => "trade contract id",
            Self::TradeChannel => "trade channel name",
            Self::ShippingChannel => "shipping channel name",
            Self::ShipmentContractId => "shipment contract id",
            Self::Carrier => "carrier",
            Self::Regulator => "approver",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Deployment sections
// ---------------------------------------------------------------------------

/// Arguments of the export-license `init` operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLicenseSetup {
    pub trade_channel: String,
    pub trade_contract_id: String,
    pub carrier: OrganizationId,
    pub regulator: OrganizationId,
}

impl ExportLicenseSetup {
    pub fn init_args(&self) -> Vec<String> {
        vec![
            self.trade_channel.clone(),
            self.trade_contract_id.clone(),
            self.carrier.to_string(),
            self.regulator.to_string(),
        ]
    }
}

/// Opening state of one bank account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSetup {
    pub organization: OrganizationId,
    pub bank: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Arguments of the letter-of-credit `init` operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterOfCreditSetup {
    pub trade_contract_id: String,
    pub shipping_channel: String,
    pub shipment_contract_id: String,
    pub exporter: AccountSetup,
    pub importer: AccountSetup,
}

impl LetterOfCreditSetup {
    pub fn init_args(&self) -> Vec<String> {
        vec![
            self.trade_contract_id.clone(),
            self.shipping_channel.clone(),
            self.shipment_contract_id.clone(),
            self.exporter.organization.to_string(),
            self.exporter.bank.clone(),
            self.exporter.balance.to_string(),
            self.importer.organization.to_string(),
            self.importer.bank.clone(),
            self.importer.balance.to_string(),
        ]
    }
}

/// Optional replacements for the built-in access tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_license: Option<Vec<AccessRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_of_credit: Option<Vec<AccessRule>>,
}

// ---------------------------------------------------------------------------
// DeploymentConfig
// ---------------------------------------------------------------------------

/// Errors from loading a deployment description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid deployment config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid access rules: {0}")]
    Acl(#[from] GateError),
}

/// One deployment of the two contracts, as described in TOML.
///
/// ```toml
/// [export_license]
/// trade_channel = "tradechannel"
/// trade_contract_id = "trade"
/// carrier = "CarrierOrgMSP"
/// regulator = "RegulatorOrgMSP"
///
/// [[acl.export_license]]
/// organization = "ExporterOrgMSP"
/// role = "any"
/// operations = ["init"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_license: Option<ExportLicenseSetup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_of_credit: Option<LetterOfCreditSetup>,
    #[serde(default)]
    pub acl: AclOverrides,
}

impl DeploymentConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.export_license_acl()?;
        config.letter_of_credit_acl()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), "deployment config loaded");
        Ok(config)
    }

    /// The export-license access table: the override if present, else the preset.
    pub fn export_license_acl(&self) -> Result<AccessTable, ConfigError> {
        match &self.acl.export_license {
            Some(rules) => Ok(AccessTable::from_rules(rules.clone())?),
            None => Ok(acl::export_license_table()),
        }
    }

    /// The letter-of-credit access table: the override if present, else the preset.
    pub fn letter_of_credit_acl(&self) -> Result<AccessTable, ConfigError> {
        match &self.acl.letter_of_credit {
            Some(rules) => Ok(AccessTable::from_rules(rules.clone())?),
            None => Ok(acl::letter_of_credit_table()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    const DEPLOYMENT: &str = r#"
[export_license]
trade_channel = "tradechannel"
trade_contract_id = "trade"
carrier = "CarrierOrgMSP"
regulator = "RegulatorOrgMSP"

[letter_of_credit]
trade_contract_id = "trade"
shipping_channel = "shippingchannel"
shipment_contract_id = "shipment"

[letter_of_credit.exporter]
organization = "ExporterOrgMSP"
bank = "ExporterBank"
balance = 100000

[letter_of_credit.importer]
organization = "ImporterOrgMSP"
bank = "ImporterBank"
balance = 200000.0
"#;

    #[test]
    fn config_keys_match_ledger_names() {
        assert_eq!(ConfigKey::TradeChannel.as_str(), "tradechannel");
        assert_eq!(ConfigKey::Regulator.state_key(), StateKey::flat("regulatoryAuthorityMSP"));
        assert_eq!(ConfigKey::TradeContractId.describe(), "trade contract id");
    }

    #[test]
    fn parses_full_deployment() {
        let config = DeploymentConfig::from_toml_str(DEPLOYMENT).unwrap();
        let el = config.export_license.as_ref().unwrap();
        assert_eq!(el.init_args(), vec!["tradechannel", "trade", "CarrierOrgMSP", "RegulatorOrgMSP"]);

        let lc = config.letter_of_credit.as_ref().unwrap();
        assert_eq!(lc.importer.balance, Decimal::from_str("200000").unwrap());
        let args = lc.init_args();
        assert_eq!(args.len(), 9);
        assert_eq!(args[3], "ExporterOrgMSP");
        assert_eq!(Decimal::from_str(&args[5]).unwrap(), Decimal::from(100000));
    }

    #[test]
    fn presets_apply_without_overrides() {
        let config = DeploymentConfig::from_toml_str(DEPLOYMENT).unwrap();
        assert_eq!(config.export_license_acl().unwrap(), acl::export_license_table());
        assert_eq!(config.letter_of_credit_acl().unwrap(), acl::letter_of_credit_table());
    }

    #[test]
    fn acl_override_replaces_preset() {
        let input = r#"
[[acl.export_license]]
organization = "ExporterOrgMSP"
role = "any"
operations = ["init", "getExportLicense"]
"#;
        let config = DeploymentConfig::from_toml_str(input).unwrap();
        let table = config.export_license_acl().unwrap();
        assert_eq!(table.len(), 1);
        assert!(config.export_license.is_none());
    }

    #[test]
    fn duplicate_acl_subject_is_rejected() {
        let input = r#"
[[acl.letter_of_credit]]
organization = "ImporterOrgMSP"
role = "importer"
operations = ["getAccountBalance"]

[[acl.letter_of_credit]]
organization = "ImporterOrgMSP"
role = "importer"
operations = ["requestLetterOfCredit"]
"#;
        let err = DeploymentConfig::from_toml_str(input).unwrap_err();
        assert!(matches!(err, ConfigError::Acl(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = DeploymentConfig::from_toml_str("[export_license]\ncarrier = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEPLOYMENT.as_bytes()).unwrap();
        let config = DeploymentConfig::load(file.path()).unwrap();
        assert!(config.letter_of_credit.is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeploymentConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
