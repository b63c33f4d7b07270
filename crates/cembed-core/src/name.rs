//! Symbol naming for generated code.

/// Name of the static array holding the Nth embedded file (0-indexed, in
/// spec order)
pub fn variable_name(file_index: usize) -> String {
    format!("file_data_{}", file_index)
}

/// Name of the exported lookup function for the given API prefix
pub fn find_function_name(api_prefix: &str) -> String {
    format!("cembed_{}_find", api_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name(0), "file_data_0");
        assert_eq!(variable_name(42), "file_data_42");
    }

    #[test]
    fn test_find_function_name() {
        assert_eq!(find_function_name("default"), "cembed_default_find");
        assert_eq!(find_function_name("assets"), "cembed_assets_find");
    }
}
