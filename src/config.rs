/// Prefix of every generated parameter name. The zero-based position of the
/// value in the call's value list is appended to it.
pub const PARAMETER_NAME_PREFIX: &str = "@AntiSQLiParam";

/// Knobs for parameterization.
///
/// # Example
/// ```
/// use antisqli::ParameterizeConfig;
///
/// let config = ParameterizeConfig::default().require_all_values_referenced(false);
/// assert!(!config.requires_all_values_referenced());
/// assert!(config.memoizes_vendor_types());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterizeConfig {
    require_all_values_referenced: bool,
    memoize_vendor_types: bool,
}

impl ParameterizeConfig {
    /// When set, a value whose placeholder never appears in the template
    /// fails substitution. When cleared, extra values are still bound but
    /// not referenced.
    pub fn require_all_values_referenced(mut self, on: bool) -> Self {
        self.require_all_values_referenced = on;
        self
    }

    /// When set, successful vendor type code probes are remembered for the
    /// lifetime of the type mapper.
    pub fn memoize_vendor_types(mut self, on: bool) -> Self {
        self.memoize_vendor_types = on;
        self
    }

    pub fn requires_all_values_referenced(&self) -> bool {
        self.require_all_values_referenced
    }

    pub fn memoizes_vendor_types(&self) -> bool {
        self.memoize_vendor_types
    }
}

impl Default for ParameterizeConfig {
    fn default() -> Self {
        Self {
            require_all_values_referenced: true,
            memoize_vendor_types: true,
        }
    }
}

/// Generated name for the parameter at `index`.
pub fn parameter_name(index: usize) -> String {
    format!("{PARAMETER_NAME_PREFIX}{index}")
}
