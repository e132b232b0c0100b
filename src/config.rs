use crate::error::Error;

use std::str::FromStr;

/// One `account:asset` pair of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMapping {
    pub account_id: String,
    pub asset_id: i64,
}

impl FromStr for AccountMapping {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (account_id, asset_id) = value.trim().rsplit_once(':').ok_or_else(|| {
            Error::new_config(format!("mapping {value:?} must look like account:asset"))
        })?;
        let account_id = account_id.trim();
        if account_id.is_empty() {
            return Err(Error::new_config(format!(
                "mapping {value:?} has an empty account id"
            )));
        }
        let asset_id: i64 = asset_id.trim().parse().map_err(|error| {
            Error::new_config(format!("mapping {value:?} has an invalid asset id : {error}"))
        })?;
        if asset_id <= 0 {
            return Err(Error::new_config(format!(
                "mapping {value:?} must use a positive asset id"
            )));
        }
        Ok(Self {
            account_id: account_id.to_string(),
            asset_id,
        })
    }
}

/// Clap value parser for a single mapping entry.
pub fn parse_mapping(value: &str) -> Result<AccountMapping, String> {
    value.parse().map_err(|error: Error| error.message)
}
