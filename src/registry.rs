use std::collections::HashMap;

use thiserror::Error;

/// Backend operation a registered method maps to. The registry stays a pure
/// name-to-descriptor table; invoking the operation is the dispatcher's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolOp {
    VolList,
    VolCreate,
    VolDestroy,
    PoolList,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    pub name: &'static str,
    /// Required parameter names. Calls must supply exactly this set.
    pub params: &'static [&'static str],
    pub op: PoolOp,
}

const BUILTIN_METHODS: &[MethodSpec] = &[
    MethodSpec {
        name: "vol_list",
        params: &[],
        op: PoolOp::VolList,
    },
    MethodSpec {
        name: "vol_create",
        params: &["name", "size"],
        op: PoolOp::VolCreate,
    },
    MethodSpec {
        name: "vol_destroy",
        params: &["name"],
        op: PoolOp::VolDestroy,
    },
    MethodSpec {
        name: "pool_list",
        params: &[],
        op: PoolOp::PoolList,
    },
];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate method registration: {0}")]
    Duplicate(&'static str),
}

/// Immutable method table, built once at startup. A duplicate name is a
/// fatal construction error; there is no way to add or remove entries later.
#[derive(Debug)]
pub struct Registry {
    methods: HashMap<&'static str, MethodSpec>,
}

impl Registry {
    pub fn with_builtin_methods() -> Result<Self, RegistryError> {
        Self::from_specs(BUILTIN_METHODS)
    }

    fn from_specs(specs: &[MethodSpec]) -> Result<Self, RegistryError> {
        let mut methods = HashMap::with_capacity(specs.len());
        for spec in specs {
            if methods.insert(spec.name, *spec).is_some() {
                return Err(RegistryError::Duplicate(spec.name));
            }
        }
        Ok(Self { methods })
    }

    pub fn resolve(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.get(name)
    }
}
