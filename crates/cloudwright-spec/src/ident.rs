/// An IaC-safe identifier matches `^[A-Za-z_][A-Za-z0-9_-]*$`: safe to emit
/// as a Terraform resource name.
pub fn is_iac_safe(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_ids() {
        assert!(is_iac_safe("web"));
        assert!(is_iac_safe("web_1"));
        assert!(is_iac_safe("web-1"));
        assert!(is_iac_safe("_private"));
    }

    #[test]
    fn rejects_bad_ids() {
        assert!(!is_iac_safe(""));
        assert!(!is_iac_safe("1web"));
        assert!(!is_iac_safe("web.1"));
        assert!(!is_iac_safe("web 1"));
    }
}
