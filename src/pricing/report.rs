//! Risk report for a priced instrument

use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{info, trace};

use super::contract::ContractRecord;
use super::error::PricingError;
use super::greeks::Greeks;

/// Contract projection and risk measures of one instrument on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Valuation date
    pub as_of_date: NaiveDate,

    /// The instrument as priced
    pub instrument: ContractRecord,

    /// Price, resolved volatility and Greeks
    pub risk: Greeks,
}

impl RiskReport {
    /// Creates a report.
    pub fn new(as_of_date: NaiveDate, instrument: ContractRecord, risk: Greeks) -> Self {
        Self {
            as_of_date,
            instrument,
            risk,
        }
    }

    /// Flattened name/value pairs: the date, the instrument fields, the risk
    /// fields, then theta per calendar day.
    pub fn flat_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("as_of_date", self.as_of_date.format("%Y-%m-%d").to_string())];
        fields.extend(self.instrument.fields());
        fields.extend(
            self.risk
                .fields()
                .into_iter()
                .map(|(name, value)| (name, value.to_string())),
        );
        fields.push(("theta_per_day", self.risk.theta_per_day().to_string()));
        trace!("flat_fields: {:?}", fields);
        fields
    }

    /// Writes the report as a single-row CSV file with a header, creating
    /// missing parent directories.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), PricingError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let fields = self.flat_fields();

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|error| csv_error(path, error))?;
        writer
            .write_record(fields.iter().map(|(name, _)| *name))
            .map_err(|error| csv_error(path, error))?;
        writer
            .write_record(fields.iter().map(|(_, value)| value.as_str()))
            .map_err(|error| csv_error(path, error))?;
        writer.flush()?;

        info!("Risk report written to {}", path.display());
        Ok(())
    }
}

fn csv_error(path: &Path, error: csv::Error) -> PricingError {
    PricingError::Io {
        message: format!("{}: {error}", path.display()),
    }
}

/// Format version used for checksum-enabled risk reports.
pub const REPORT_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for `RiskReport` instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReportPackage {
    /// Version of the report schema.
    pub version: u32,
    /// Report payload.
    pub report: RiskReport,
    /// Hex-encoded SHA-256 of the serialized report.
    pub checksum: String,
}

impl RiskReportPackage {
    /// Creates a package computing the checksum of the report contents.
    pub fn new(report: RiskReport) -> Result<Self, PricingError> {
        let checksum = Self::compute_checksum(&report)?;

        Ok(Self {
            version: REPORT_FORMAT_VERSION,
            report,
            checksum,
        })
    }

    /// Serializes the package to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PricingError> {
        serde_json::to_string_pretty(self).map_err(|error| PricingError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, PricingError> {
        serde_json::from_str(data).map_err(|error| PricingError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the version and checksum.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.version != REPORT_FORMAT_VERSION {
            return Err(PricingError::UnsupportedReportVersion {
                found: self.version,
                expected: REPORT_FORMAT_VERSION,
            });
        }

        let computed = Self::compute_checksum(&self.report)?;
        if computed != self.checksum {
            return Err(PricingError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated report.
    pub fn into_report(self) -> Result<RiskReport, PricingError> {
        self.validate()?;
        Ok(self.report)
    }

    fn compute_checksum(report: &RiskReport) -> Result<String, PricingError> {
        let payload =
            serde_json::to_vec(report).map_err(|error| PricingError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);
        Ok(format!("{:x}", hasher.finalize()))
    }
}
