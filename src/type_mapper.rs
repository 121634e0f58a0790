use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{trace, warn};

use crate::error::Result;
use crate::traits::Driver;
use crate::types::{GenericType, SqlValue};

/// Resolves vendor type codes and raw values to [`GenericType`]s by asking
/// the driver.
///
/// Successful vendor type code lookups are memoized when enabled; value
/// probes are never cached since they depend on the value itself.
pub struct TypeMapper<D: Driver> {
    driver: D,
    memoize: bool,
    known: RwLock<HashMap<D::VendorType, GenericType>>,
}

impl<D: Driver> TypeMapper<D> {
    pub fn new(driver: D) -> Self {
        Self::with_memoization(driver, true)
    }

    pub fn with_memoization(driver: D, memoize: bool) -> Self {
        Self {
            driver,
            memoize,
            known: RwLock::new(HashMap::new()),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Map a vendor type code to its generic type.
    /// Returns `None` when the driver has no mapping for it.
    pub fn map_vendor_type(&self, vendor_type: &D::VendorType) -> Option<GenericType> {
        self.try_map_vendor_type(vendor_type).ok()
    }

    /// Like [`map_vendor_type`](Self::map_vendor_type), keeping the driver's
    /// reason on failure.
    pub fn try_map_vendor_type(&self, vendor_type: &D::VendorType) -> Result<GenericType> {
        if let Some(hit) = self.cached(vendor_type) {
            trace!(?vendor_type, generic_type = %hit, "vendor type mapping cache hit");
            return Ok(hit);
        }

        let generic_type = self.driver.probe_vendor_type(vendor_type)?;

        if self.memoize {
            // A poisoned cache only costs us the memo.
            if let Ok(mut known) = self.known.write() {
                known.insert(vendor_type.clone(), generic_type);
            }
        }
        Ok(generic_type)
    }

    /// Infer the generic type the driver would bind `value` as.
    /// Returns `None` when the value is not representable.
    pub fn map_value(&self, value: &SqlValue) -> Option<GenericType> {
        self.driver.probe_value_type(value).ok()
    }

    /// Infer the generic type of `value`, degrading to
    /// [`GenericType::String`] and the value's string rendering when the
    /// driver cannot type it. `Null` stays `Null`.
    pub fn resolve_value(&self, value: SqlValue) -> (SqlValue, GenericType) {
        match self.driver.probe_value_type(&value) {
            Ok(generic_type) => (value, generic_type),
            Err(err) => {
                warn!(
                    value_type = value.type_name(),
                    error = %err,
                    "value has no generic type mapping, binding as string"
                );
                (value.into_text(), GenericType::String)
            }
        }
    }

    fn cached(&self, vendor_type: &D::VendorType) -> Option<GenericType> {
        if !self.memoize {
            return None;
        }
        self.known
            .read()
            .ok()
            .and_then(|known| known.get(vendor_type).copied())
    }
}
