//! Optimizer settings and server environment configuration.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Rect;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Log file used by the server when `LOG_FILE` is unset.
pub const DEFAULT_LOG_FILE: &str = "development.log";

/// Deadline for a single optimization request when `OPTIMIZE_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest sheet, in cells, a request may ask for.
pub const MAX_SHEET_CELLS: u64 = 16_777_216;

/// Largest sheet cap a request may ask for.
pub const MAX_SHEETS: u32 = 1_000;

/// Largest number of piece units after expansion.
pub const MAX_UNITS: u64 = 100_000;

/// Largest number of grid cells across all sheets of one run.
pub const MAX_TOTAL_CELLS: u64 = 33_554_432;

/// Upper bounds on the memory one optimization run may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_sheet_cells: u64,
    pub max_sheets: u32,
    pub max_units: u64,
    pub max_total_cells: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_sheet_cells: MAX_SHEET_CELLS,
            max_sheets: MAX_SHEETS,
            max_units: MAX_UNITS,
            max_total_cells: MAX_TOTAL_CELLS,
        }
    }
}

impl Limits {
    /// How many sheets of `sheet` fit in the cell budget.
    pub fn sheet_budget(&self, sheet: Rect) -> u64 {
        self.max_total_cells / sheet.area().max(1)
    }
}

/// Which orientations count when deciding whether a piece can fit a sheet at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Declared orientation, or rotated when rotation is allowed.
    #[default]
    RotationAware,
    /// Declared orientation only.
    DeclaredOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeConfig {
    pub sheet: Rect,
    /// Hard cap on the number of sheets. `None` lets the pool grow as needed.
    pub sheet_quantity: Option<NonZeroU32>,
    pub allow_rotate: bool,
    pub validation: ValidationPolicy,
    pub limits: Limits,
}

impl OptimizeConfig {
    pub fn new(sheet: Rect) -> Self {
        Self {
            sheet,
            sheet_quantity: None,
            allow_rotate: true,
            validation: ValidationPolicy::default(),
            limits: Limits::default(),
        }
    }

    pub fn with_sheet_quantity(mut self, cap: Option<NonZeroU32>) -> Self {
        self.sheet_quantity = cap;
        self
    }

    pub fn with_rotation(mut self, allow_rotate: bool) -> Self {
        self.allow_rotate = allow_rotate;
        self
    }

    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Builds a config from raw transport values. A present quantity of zero
    /// is rejected rather than read as "no cap".
    pub fn from_raw(
        sheet_length: u32,
        sheet_width: u32,
        sheet_quantity: Option<u32>,
    ) -> Result<Self> {
        if sheet_length == 0 || sheet_width == 0 {
            return Err(Error::InvalidInput(
                "sheet dimensions must be non-zero".to_string(),
            ));
        }
        let cap = match sheet_quantity {
            Some(n) => Some(NonZeroU32::new(n).ok_or_else(|| {
                Error::InvalidInput("sheet quantity must be non-zero when given".to_string())
            })?),
            None => None,
        };
        Ok(Self::new(Rect::new(sheet_length, sheet_width)).with_sheet_quantity(cap))
    }
}

/// Settings for the HTTP server, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub log_file: String,
    pub sentry_dsn: Option<String>,
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_file: DEFAULT_LOG_FILE.to_string(),
            sentry_dsn: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| Error::InvalidInput(format!("invalid PORT '{port}'")))?;
        }
        if let Some(log_file) = get("LOG_FILE") {
            config.log_file = log_file;
        }
        config.sentry_dsn = get("SENTRY_DSN");
        if let Some(secs) = get("OPTIMIZE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("invalid OPTIMIZE_TIMEOUT_SECS '{secs}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
