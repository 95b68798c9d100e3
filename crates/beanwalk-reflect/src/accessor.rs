//! Accessor index
//!
//! Classifies declared methods by name: `get*`/`is*` are getters, `set*` are
//! setters. Nothing else about the method is checked here; a `get` method that
//! takes arguments is still indexed. Value access only ever goes through the
//! field index, which re-derives the matching field.

use std::sync::Arc;

use crate::cache::AccessorMap;
use crate::descriptor::{MethodDesc, TypeKey};
use crate::error::ReflectResult;
use crate::Reflector;

/// Role of an accessor method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorRole {
    /// `getX()` / `isX()`
    Getter,
    /// `setX(value)`
    Setter,
}

/// Classified accessor method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorEntry {
    /// Raw method name, e.g. `getUserName`
    pub name: String,
    /// Getter or setter
    pub role: AccessorRole,
    /// Logical property name, e.g. `userName`
    pub property: String,
    /// Type that declares the method
    pub declaring_type: TypeKey,
    /// Parameter count
    pub params: usize,
}

impl AccessorEntry {
    /// Classify a declared method, `None` if it is not accessor-shaped
    pub fn classify(method: &MethodDesc, declaring_type: TypeKey) -> Option<Self> {
        let (role, rest) = split_accessor(&method.name)?;
        Some(Self {
            name: method.name.clone(),
            role,
            property: decapitalize(rest),
            declaring_type,
            params: method.params,
        })
    }
}

fn split_accessor(name: &str) -> Option<(AccessorRole, &str)> {
    if let Some(rest) = name.strip_prefix("get") {
        Some((AccessorRole::Getter, rest))
    } else if let Some(rest) = name.strip_prefix("is") {
        Some((AccessorRole::Getter, rest))
    } else {
        name.strip_prefix("set").map(|rest| (AccessorRole::Setter, rest))
    }
}

/// Property name an accessor method refers to: `setUserName` -> `userName`.
///
/// Returns `None` for names that are neither getters nor setters.
pub fn property_name(method: &str) -> Option<String> {
    split_accessor(method).map(|(_, rest)| decapitalize(rest))
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Reflector {
    /// All getter-shaped methods of `ty` and its ancestors, keyed by method name
    pub fn getters(&self, ty: TypeKey) -> ReflectResult<Arc<AccessorMap>> {
        self.cache
            .getters
            .get_or_try_insert(ty, || self.index_accessors(ty, AccessorRole::Getter))
    }

    /// All setter-shaped methods of `ty` and its ancestors, keyed by method name
    pub fn setters(&self, ty: TypeKey) -> ReflectResult<Arc<AccessorMap>> {
        self.cache
            .setters
            .get_or_try_insert(ty, || self.index_accessors(ty, AccessorRole::Setter))
    }

    fn index_accessors(&self, ty: TypeKey, role: AccessorRole) -> ReflectResult<AccessorMap> {
        let mut index = AccessorMap::default();
        for level in self.lineage(ty)? {
            let declaring = level.desc.key();
            for method in level.desc.methods() {
                match AccessorEntry::classify(method, declaring) {
                    Some(entry) if entry.role == role => {
                        index.insert(entry.name.clone(), entry);
                    }
                    _ => {}
                }
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeBuilder;

    struct Base;
    struct Derived {
        base: Base,
    }

    fn registered() -> Reflector {
        let reflector = Reflector::new();
        reflector
            .register(
                TypeBuilder::<Base>::class("Base")
                    .getter("id")
                    .setter("id")
                    .method("getLabel", 0)
                    .method("compute", 2)
                    .build(),
            )
            .unwrap();
        reflector
            .register(
                TypeBuilder::<Derived>::class("Derived")
                    .extends::<Base>(|d| &d.base, |d| &mut d.base)
                    .getter("name")
                    .setter("name")
                    .bool_getter("enabled")
                    .method("getLabel", 1)
                    .build(),
            )
            .unwrap();
        reflector
    }

    #[test]
    fn test_property_name() {
        assert_eq!(property_name("setUserName").as_deref(), Some("userName"));
        assert_eq!(property_name("getId").as_deref(), Some("id"));
        assert_eq!(property_name("isActive").as_deref(), Some("active"));
        assert_eq!(property_name("get").as_deref(), Some(""));
        assert_eq!(property_name("compute"), None);
    }

    #[test]
    fn test_classify() {
        let method = MethodDesc {
            name: "isEnabled".to_string(),
            params: 0,
        };
        let entry = AccessorEntry::classify(&method, TypeKey::of::<Base>()).unwrap();
        assert_eq!(entry.role, AccessorRole::Getter);
        assert_eq!(entry.property, "enabled");

        let method = MethodDesc {
            name: "reset".to_string(),
            params: 0,
        };
        assert!(AccessorEntry::classify(&method, TypeKey::of::<Base>()).is_none());
    }

    #[test]
    fn test_getters_include_inherited() {
        let reflector = registered();
        let getters = reflector.getters(TypeKey::of::<Derived>()).unwrap();

        let mut names: Vec<&str> = getters.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["getId", "getLabel", "getName", "isEnabled"]);
    }

    #[test]
    fn test_setters_include_inherited() {
        let reflector = registered();
        let setters = reflector.setters(TypeKey::of::<Derived>()).unwrap();

        let mut names: Vec<&str> = setters.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["setId", "setName"]);
        assert!(setters.values().all(|e| e.role == AccessorRole::Setter));
    }

    #[test]
    fn test_derived_declaration_wins() {
        let reflector = registered();
        let getters = reflector.getters(TypeKey::of::<Derived>()).unwrap();

        let label = &getters["getLabel"];
        assert_eq!(label.declaring_type, TypeKey::of::<Derived>());
        assert_eq!(label.params, 1);
        assert_eq!(getters["getId"].declaring_type, TypeKey::of::<Base>());
    }

    #[test]
    fn test_accessors_cached() {
        let reflector = registered();
        let first = reflector.getters(TypeKey::of::<Base>()).unwrap();
        let second = reflector.getters(TypeKey::of::<Base>()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reflector.cache_stats().getters, 1);
    }
}
