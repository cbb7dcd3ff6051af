//! Check-then-create primitive shared by the provisioners

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Make sure a resource exists: query first, create only when absent.
///
/// `kind` and `name` only feed the progress messages.
pub fn ensure_exists<X, C>(kind: &str, name: &str, exists: X, create: C) -> Result<EnsureOutcome>
where
    X: FnOnce() -> Result<bool>,
    C: FnOnce() -> Result<()>,
{
    if exists()? {
        println!("✓ {} '{}' already exists", kind, name);
        return Ok(EnsureOutcome::AlreadyExists);
    }

    println!("Creating {} '{}'...", kind, name);
    create()?;
    println!("✓ {} '{}' created", kind, name);
    Ok(EnsureOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_present_resource_is_not_created() {
        let created = Cell::new(false);
        let outcome = ensure_exists(
            "Project",
            "demo",
            || Ok(true),
            || {
                created.set(true);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(outcome, EnsureOutcome::AlreadyExists);
        assert!(!created.get());
    }

    #[test]
    fn test_absent_resource_is_created() {
        let created = Cell::new(false);
        let outcome = ensure_exists(
            "Cluster",
            "blue",
            || Ok(false),
            || {
                created.set(true);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(outcome, EnsureOutcome::Created);
        assert!(created.get());
    }

    #[test]
    fn test_errors_propagate() {
        let result = ensure_exists(
            "Cluster",
            "blue",
            || anyhow::bail!("permission denied"),
            || Ok(()),
        );
        assert!(result.is_err());

        let result = ensure_exists("Cluster", "blue", || Ok(false), || anyhow::bail!("quota"));
        assert_eq!(result.unwrap_err().to_string(), "quota");
    }
}
