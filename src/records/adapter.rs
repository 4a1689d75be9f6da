//! Adapter layer: convert record DTOs to id -> display name pairs.
//!
//! This is the ONLY place where record DTOs are interpreted. Records without
//! an id or without a usable name are skipped.

use super::dto;

/// Display name for a company, keyed by its id.
pub fn company_entry(company: &dto::Company) -> Option<(i64, String)> {
    let id = company.id?;
    let name = company.company_name.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    Some((id, name.to_string()))
}

/// Display name for a resource: `"{firstName} {lastName}"`, trimmed.
pub fn resource_name(resource: &dto::Resource) -> Option<String> {
    let first = resource.first_name.as_deref().unwrap_or_default();
    let last = resource.last_name.as_deref().unwrap_or_default();
    let name = format!("{} {}", first, last).trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// Display name for a resource, keyed by its id.
pub fn resource_entry(resource: &dto::Resource) -> Option<(i64, String)> {
    Some((resource.id?, resource_name(resource)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(first: Option<&str>, last: Option<&str>) -> dto::Resource {
        dto::Resource {
            id: Some(7),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            email: None,
            is_active: Some(true),
        }
    }

    #[test]
    fn test_resource_name_joins_and_trims() {
        assert_eq!(
            resource_name(&resource(Some("Ada"), Some("Lovelace"))).as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(resource_name(&resource(Some("Cher"), Some(""))).as_deref(), Some("Cher"));
        assert_eq!(resource_name(&resource(None, None)), None);
        assert_eq!(resource_name(&resource(Some("  "), Some(" "))), None);
    }

    #[test]
    fn test_company_entry_requires_id_and_name() {
        let named = dto::Company {
            id: Some(100),
            company_name: Some("Acme Co".to_string()),
            is_active: None,
        };
        assert_eq!(company_entry(&named), Some((100, "Acme Co".to_string())));

        let unnamed = dto::Company {
            company_name: Some(String::new()),
            ..named.clone()
        };
        assert_eq!(company_entry(&unnamed), None);

        let no_id = dto::Company { id: None, ..named };
        assert_eq!(company_entry(&no_id), None);
    }
}
